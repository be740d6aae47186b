use super::rotation::{check_rotation, classify_rotation_group};
use crate::models::{CropIdentity, Field, RotationCheckResult, RotationGroup};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Scores below this should review their rotation pattern.
pub const REVIEW_THRESHOLD: u8 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl ComplianceStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            100.. => ComplianceStatus::Excellent,
            90..=99 => ComplianceStatus::Good,
            REVIEW_THRESHOLD..=89 => ComplianceStatus::Fair,
            _ => ComplianceStatus::NeedsImprovement,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Excellent => "excellent",
            ComplianceStatus::Good => "good",
            ComplianceStatus::Fair => "fair",
            ComplianceStatus::NeedsImprovement => "needs improvement",
        }
    }

    pub fn needs_review(&self) -> bool {
        *self == ComplianceStatus::NeedsImprovement
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dashboard summary over the active fields of a farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmStats {
    pub year: i32,
    pub total_fields: usize,
    pub total_acres: f64,
    pub planted_acres: f64,
    pub fallow_acres: f64,
    pub crop_diversity: usize,
    pub rotation_compliance: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropShare {
    pub crop: String,
    pub acres: f64,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCompliance {
    pub field_id: String,
    pub field: String,
    pub score: u8,
    pub status: ComplianceStatus,
}

/// One recorded planting with the verdict on how it followed the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantingReview {
    pub year: i32,
    pub crop: String,
    pub group: RotationGroup,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_display: Option<String>,
    pub check: RotationCheckResult,
}

fn active(fields: &[Field]) -> impl Iterator<Item = &Field> {
    fields.iter().filter(|f| f.is_active)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn farm_stats(fields: &[Field], year: i32) -> FarmStats {
    let total_fields = active(fields).count();
    let total_acres: f64 = active(fields).map(|f| f.size_acres).sum();
    let planted_acres: f64 = active(fields)
        .filter(|f| f.current_crop(year).is_some())
        .map(|f| f.size_acres)
        .sum();

    let crop_diversity = active(fields)
        .flat_map(|f| f.history.iter())
        .map(|r| r.crop_name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect::<HashSet<_>>()
        .len();

    let rotation_compliance = if total_fields == 0 {
        100
    } else {
        let sum: u32 = active(fields).map(|f| f.compliance_score() as u32).sum();
        (sum as f64 / total_fields as f64).round() as u8
    };

    FarmStats {
        year,
        total_fields,
        total_acres: round2(total_acres),
        planted_acres: round2(planted_acres),
        fallow_acres: round2(total_acres - planted_acres),
        crop_diversity,
        rotation_compliance,
    }
}

/// Acreage per crop planted in `year`, largest first.
///
/// Crops are grouped case-insensitively and reported under the first
/// spelling seen. Ties in acreage are ordered by name.
pub fn crop_distribution(fields: &[Field], year: i32) -> Vec<CropShare> {
    let mut acres_by_crop: BTreeMap<String, (String, f64)> = BTreeMap::new();
    for field in active(fields) {
        if let Some(record) = field.current_crop(year) {
            let entry = acres_by_crop
                .entry(record.crop_name.to_lowercase())
                .or_insert_with(|| (record.crop_name.clone(), 0.0));
            entry.1 += field.size_acres;
        }
    }

    let planted: f64 = acres_by_crop.values().map(|(_, acres)| acres).sum();
    let mut shares: Vec<CropShare> = acres_by_crop
        .into_values()
        .map(|(crop, acres)| CropShare {
            crop,
            acres: round2(acres),
            percentage: if planted > 0.0 {
                (acres / planted * 100.0).round() as u8
            } else {
                0
            },
        })
        .collect();

    // BTreeMap iteration already ordered by name; the stable sort keeps it for ties
    shares.sort_by(|a, b| b.acres.total_cmp(&a.acres));
    shares
}

/// Per-field rotation compliance, in field order.
pub fn field_compliance(fields: &[Field]) -> Vec<FieldCompliance> {
    active(fields)
        .map(|f| {
            let score = f.compliance_score();
            FieldCompliance {
                field_id: f.id.clone(),
                field: f.name.clone(),
                score,
                status: ComplianceStatus::from_score(score),
            }
        })
        .collect()
}

/// Recorded history in year order, each planting checked against the one before it.
///
/// Uses the same ordering as the compliance score, so the number of invalid
/// entries here matches the violations behind `Field::compliance_score`.
pub fn review_history(field: &Field) -> Vec<PlantingReview> {
    let mut sorted: Vec<_> = field.history.iter().collect();
    sorted.sort_by_key(|r| r.year);

    let mut previous: Option<CropIdentity> = None;
    sorted
        .into_iter()
        .map(|record| {
            let crop = record.crop();
            let review = PlantingReview {
                year: record.year,
                crop: record.crop_name.clone(),
                group: classify_rotation_group(&crop.name, crop.category.as_deref()),
                yield_display: record.yield_display(),
                check: check_rotation(previous.as_ref(), &crop),
            };
            previous = Some(crop);
            review
        })
        .collect()
}
