use super::check_rotation;
use crate::models::PlantingRecord;
use tracing::debug;

/// Percentage (0-100) of consecutive plantings in `history` that follow the
/// rotation rules.
///
/// The history may arrive in any order; it is scored in ascending year order,
/// with plantings that share a year kept in the order given. Warnings and
/// errors both count as violations.
pub fn score_rotation_compliance(history: &[PlantingRecord]) -> u8 {
    if history.len() < 2 {
        return 100;
    }

    let mut sorted: Vec<&PlantingRecord> = history.iter().collect();
    sorted.sort_by_key(|r| r.year);

    let pairs = sorted.len() - 1;
    let violations = sorted
        .windows(2)
        .filter(|pair| {
            let result = check_rotation(Some(&pair[0].crop()), &pair[1].crop());
            if !result.valid {
                debug!(
                    from_year = pair[0].year,
                    to_year = pair[1].year,
                    prev = %pair[0].crop_name,
                    next = %pair[1].crop_name,
                    "Rotation violation"
                );
            }
            !result.valid
        })
        .count();

    let ratio = (pairs - violations) as f64 / pairs as f64;
    (ratio * 100.0).round() as u8
}
