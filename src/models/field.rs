use super::PlantingRecord;
use crate::logic::geometry::acres_to_hectares;
use crate::logic::rotation::score_rotation_compliance;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FIELD_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SoilType {
    Sandy,
    Loamy,
    Clay,
    Silty,
    SandyLoam,
    ClayLoam,
    Peaty,
    Chalky,
}

impl SoilType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Sandy => "Sandy",
            SoilType::Loamy => "Loamy",
            SoilType::Clay => "Clay",
            SoilType::Silty => "Silty",
            SoilType::SandyLoam => "Sandy Loam",
            SoilType::ClayLoam => "Clay Loam",
            SoilType::Peaty => "Peaty",
            SoilType::Chalky => "Chalky",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "sandy" | "sand" => Some(SoilType::Sandy),
            "loamy" | "loam" => Some(SoilType::Loamy),
            "clay" => Some(SoilType::Clay),
            "silty" | "silt" => Some(SoilType::Silty),
            "sandyloam" => Some(SoilType::SandyLoam),
            "clayloam" => Some(SoilType::ClayLoam),
            "peaty" | "peat" => Some(SoilType::Peaty),
            "chalky" | "chalk" => Some(SoilType::Chalky),
            _ => None,
        }
    }
}

impl TryFrom<String> for SoilType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SoilType::from_str(&value).ok_or_else(|| format!("unknown soil type '{}'", value))
    }
}

impl From<SoilType> for String {
    fn from(value: SoilType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IrrigationType {
    Drip,
    Sprinkler,
    Flood,
    Furrow,
    CenterPivot,
    RainFed,
    None,
}

impl IrrigationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationType::Drip => "Drip",
            IrrigationType::Sprinkler => "Sprinkler",
            IrrigationType::Flood => "Flood",
            IrrigationType::Furrow => "Furrow",
            IrrigationType::CenterPivot => "Center Pivot",
            IrrigationType::RainFed => "Rain-fed",
            IrrigationType::None => "None",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "drip" => Some(IrrigationType::Drip),
            "sprinkler" => Some(IrrigationType::Sprinkler),
            "flood" => Some(IrrigationType::Flood),
            "furrow" => Some(IrrigationType::Furrow),
            "centerpivot" | "pivot" => Some(IrrigationType::CenterPivot),
            "rainfed" => Some(IrrigationType::RainFed),
            "none" => Some(IrrigationType::None),
            _ => None,
        }
    }
}

impl TryFrom<String> for IrrigationType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        IrrigationType::from_str(&value)
            .ok_or_else(|| format!("unknown irrigation type '{}'", value))
    }
}

impl From<IrrigationType> for String {
    fn from(value: IrrigationType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for IrrigationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DrainageQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl DrainageQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrainageQuality::Excellent => "Excellent",
            DrainageQuality::Good => "Good",
            DrainageQuality::Fair => "Fair",
            DrainageQuality::Poor => "Poor",
            DrainageQuality::VeryPoor => "Very Poor",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "excellent" => Some(DrainageQuality::Excellent),
            "good" => Some(DrainageQuality::Good),
            "fair" => Some(DrainageQuality::Fair),
            "poor" => Some(DrainageQuality::Poor),
            "verypoor" => Some(DrainageQuality::VeryPoor),
            _ => None,
        }
    }
}

impl TryFrom<String> for DrainageQuality {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DrainageQuality::from_str(&value)
            .ok_or_else(|| format!("unknown drainage quality '{}'", value))
    }
}

impl From<DrainageQuality> for String {
    fn from(value: DrainageQuality) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for DrainageQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// GeoJSON polygon. Positions are `[lng, lat]`; the first ring is the outer boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(rename = "type", default = "Polygon::geojson_type")]
    pub kind: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl Polygon {
    pub fn new(coordinates: Vec<Vec<[f64; 2]>>) -> Self {
        Self {
            kind: Self::geojson_type(),
            coordinates,
        }
    }

    fn geojson_type() -> String {
        "Polygon".to_string()
    }

    pub fn outer_ring(&self) -> &[[f64; 2]] {
        self.coordinates.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

fn default_color() -> String {
    DEFAULT_FIELD_COLOR.to_string()
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub name: String,
    pub size_acres: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<SoilType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_ph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organic_matter_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irrigation_type: Option<IrrigationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drainage_quality: Option<DrainageQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_soil_test_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<Polygon>,
    /// Plantings that happened, in any order.
    #[serde(default)]
    pub history: Vec<PlantingRecord>,
    /// Plantings on the rotation plan that have not happened yet.
    #[serde(default)]
    pub planned: Vec<PlantingRecord>,
}

impl Field {
    pub fn new(id: &str, name: &str, size_acres: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            size_acres,
            soil_type: None,
            soil_ph: None,
            organic_matter_percent: None,
            irrigation_type: None,
            drainage_quality: None,
            last_soil_test_date: None,
            notes: None,
            color: default_color(),
            is_active: true,
            boundary: None,
            history: Vec::new(),
            planned: Vec::new(),
        }
    }

    pub fn with_planting(mut self, record: PlantingRecord) -> Self {
        self.history.push(record);
        self
    }

    pub fn with_planned(mut self, record: PlantingRecord) -> Self {
        self.planned.push(record);
        self
    }

    pub fn size_hectares(&self) -> f64 {
        acres_to_hectares(self.size_acres)
    }

    /// The planting for `year`, preferring what was recorded over what was planned.
    pub fn planting_for(&self, year: i32) -> Option<&PlantingRecord> {
        self.history
            .iter()
            .find(|r| r.year == year)
            .or_else(|| self.planned.iter().find(|r| r.year == year))
    }

    /// Only recorded plantings count as the current crop.
    pub fn current_crop(&self, year: i32) -> Option<&PlantingRecord> {
        self.history.iter().find(|r| r.year == year)
    }

    /// Latest planting (recorded or planned) strictly before `year`.
    pub fn latest_planting_before(&self, year: i32) -> Option<&PlantingRecord> {
        self.history
            .iter()
            .chain(self.planned.iter())
            .filter(|r| r.year < year)
            .max_by_key(|r| r.year)
    }

    /// History sorted newest first, as shown on the field detail view.
    pub fn history_newest_first(&self) -> Vec<&PlantingRecord> {
        let mut records: Vec<_> = self.history.iter().collect();
        records.sort_by(|a, b| b.year.cmp(&a.year));
        records
    }

    pub fn compliance_score(&self) -> u8 {
        score_rotation_compliance(&self.history)
    }
}
