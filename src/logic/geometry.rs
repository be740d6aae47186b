use crate::models::{LatLng, Polygon};

pub const ACRES_PER_SQUARE_METER: f64 = 0.000247105;
const HECTARES_PER_ACRE: f64 = 0.404686;

/// Convert an area in square meters to acres, rounded to 2 decimals.
pub fn square_meters_to_acres(square_meters: f64) -> f64 {
    round2(square_meters * ACRES_PER_SQUARE_METER)
}

pub fn acres_to_hectares(acres: f64) -> f64 {
    round2(acres * HECTARES_PER_ACRE)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build a closed GeoJSON polygon from map vertices.
///
/// Returns `None` for an empty vertex list.
pub fn lat_lngs_to_polygon(points: &[LatLng]) -> Option<Polygon> {
    let first = points.first()?;
    let ring: Vec<[f64; 2]> = points
        .iter()
        .chain(std::iter::once(first))
        .map(|p| [p.lng, p.lat])
        .collect();
    Some(Polygon::new(vec![ring]))
}

/// Outer ring vertices without the closing point.
pub fn polygon_to_lat_lngs(polygon: &Polygon) -> Vec<LatLng> {
    let ring = polygon.outer_ring();
    let open = match ring.split_last() {
        Some((_, rest)) => rest,
        None => ring,
    };
    open.iter().map(|[lng, lat]| LatLng::new(*lat, *lng)).collect()
}

/// A ring needs three distinct vertices plus the closing point, and must end
/// where it starts. Self-intersection is not checked.
pub fn is_closed_ring(ring: &[[f64; 2]]) -> bool {
    if ring.len() < 4 {
        return false;
    }
    ring.first() == ring.last()
}

/// Display color for a crop category.
pub fn crop_color(category: Option<&str>) -> &'static str {
    match category {
        Some("Vegetable") => "#10b981",
        Some("Fruit") => "#ef4444",
        Some("Herb") => "#8b5cf6",
        Some("Grain") => "#f59e0b",
        Some("Legume") => "#06b6d4",
        _ => "#3b82f6",
    }
}
