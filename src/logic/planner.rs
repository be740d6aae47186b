use super::rotation::{check_rotation, classify_rotation_group, suggest_next_crops};
use crate::error::{FieldMapError, Result};
use crate::models::{CropIdentity, Field, RotationCheckResult, RotationGroup, SuggestionEntry};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_HORIZON_YEARS: u32 = 4;
/// Longest window the planner will lay out.
pub const MAX_HORIZON_YEARS: u32 = 100;

/// One year of one field on the planning timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanCell {
    pub year: i32,
    pub crop: Option<String>,
    pub group: Option<RotationGroup>,
    /// True when the crop comes from the plan rather than recorded history.
    pub planned: bool,
    /// Succession check against the latest earlier planting; `None` for empty cells.
    pub check: Option<RotationCheckResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTimeline {
    pub field_id: String,
    pub field: String,
    pub size_acres: f64,
    pub cells: Vec<PlanCell>,
    /// First year in the window with nothing planted or planned.
    pub next_open_year: Option<i32>,
    /// Crop the suggestions follow, if the field has any earlier planting.
    pub after_crop: Option<String>,
    pub suggestions: Vec<SuggestionEntry>,
}

impl FieldTimeline {
    pub fn has_violations(&self) -> bool {
        self.cells
            .iter()
            .filter_map(|c| c.check.as_ref())
            .any(|check| !check.valid)
    }
}

/// Lays out a multi-year rotation window for fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPlanner {
    pub start_year: i32,
    pub horizon: u32,
}

impl RotationPlanner {
    /// Horizons outside `1..=MAX_HORIZON_YEARS` are clamped into range.
    pub fn new(start_year: i32, horizon: u32) -> Self {
        let clamped = horizon.clamp(1, MAX_HORIZON_YEARS);
        if clamped != horizon {
            warn!(horizon, clamped, "Planner horizon out of range, clamping");
        }
        Self {
            start_year,
            horizon: clamped,
        }
    }

    /// Like `new`, but rejects an out-of-range horizon.
    pub fn try_new(start_year: i32, horizon: u32) -> Result<Self> {
        if !(1..=MAX_HORIZON_YEARS).contains(&horizon) {
            return Err(FieldMapError::InvalidData(format!(
                "planner horizon must be between 1 and {} years, got {}",
                MAX_HORIZON_YEARS, horizon
            )));
        }
        Ok(Self::new(start_year, horizon))
    }

    /// Years in the window. Stops early rather than overflow past `i32::MAX`.
    pub fn years(&self) -> Vec<i32> {
        (0..self.horizon.min(MAX_HORIZON_YEARS))
            .map_while(|i| {
                i32::try_from(i)
                    .ok()
                    .and_then(|i| self.start_year.checked_add(i))
            })
            .collect()
    }

    pub fn plan_field(&self, field: &Field, catalog: &[CropIdentity]) -> FieldTimeline {
        let cells: Vec<PlanCell> = self
            .years()
            .into_iter()
            .map(|year| match field.planting_for(year) {
                Some(record) => {
                    let crop = record.crop();
                    let prev = field.latest_planting_before(year).map(|r| r.crop());
                    PlanCell {
                        year,
                        crop: Some(record.crop_name.clone()),
                        group: Some(classify_rotation_group(
                            &crop.name,
                            crop.category.as_deref(),
                        )),
                        planned: field.current_crop(year).is_none(),
                        check: Some(check_rotation(prev.as_ref(), &crop)),
                    }
                }
                None => PlanCell {
                    year,
                    crop: None,
                    group: None,
                    planned: false,
                    check: None,
                },
            })
            .collect();

        let next_open_year = cells.iter().find(|c| c.crop.is_none()).map(|c| c.year);

        let (after_crop, suggestions) = match next_open_year {
            Some(year) => {
                let prev = field.latest_planting_before(year).map(|r| r.crop());
                let names: Vec<&str> = catalog.iter().map(|c| c.name.as_str()).collect();
                (
                    prev.as_ref().map(|p| p.name.clone()),
                    suggest_next_crops(prev.as_ref(), &names),
                )
            }
            None => (None, Vec::new()),
        };

        FieldTimeline {
            field_id: field.id.clone(),
            field: field.name.clone(),
            size_acres: field.size_acres,
            cells,
            next_open_year,
            after_crop,
            suggestions,
        }
    }

    pub fn plan_farm(&self, fields: &[Field], catalog: &[CropIdentity]) -> Vec<FieldTimeline> {
        fields
            .iter()
            .filter(|f| f.is_active)
            .map(|f| self.plan_field(f, catalog))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlantingRecord, Severity};

    fn catalog() -> Vec<CropIdentity> {
        ["Peas", "Corn", "Broccoli", "Carrots", "Wheat"]
            .iter()
            .map(|n| CropIdentity::new(*n))
            .collect()
    }

    fn south_field() -> Field {
        Field::new("2", "South Field", 18.2)
            .with_planting(PlantingRecord::new("Potatoes", 2023))
            .with_planting(PlantingRecord::new("Tomatoes", 2024))
            .with_planned(PlantingRecord::new("Peas", 2025))
    }

    #[test]
    fn years_cover_the_horizon() {
        assert_eq!(RotationPlanner::new(2024, 4).years(), vec![2024, 2025, 2026, 2027]);
        assert_eq!(RotationPlanner::new(2024, 0).years(), vec![2024]);
    }

    #[test]
    fn huge_horizon_is_clamped_not_emptied() {
        let planner = RotationPlanner::new(2024, 3_000_000_000);
        assert_eq!(planner.horizon, MAX_HORIZON_YEARS);

        let years = planner.years();
        assert_eq!(years.len(), MAX_HORIZON_YEARS as usize);
        assert_eq!(years[0], 2024);
        assert_eq!(years[99], 2123);

        // built directly, bypassing the clamp
        let unchecked = RotationPlanner {
            start_year: 2024,
            horizon: u32::MAX,
        };
        assert_eq!(unchecked.years().len(), MAX_HORIZON_YEARS as usize);
    }

    #[test]
    fn years_stop_at_the_end_of_the_calendar() {
        let years = RotationPlanner::new(i32::MAX - 1, 4).years();
        assert_eq!(years, vec![i32::MAX - 1, i32::MAX]);
    }

    #[test]
    fn try_new_rejects_out_of_range_horizons() {
        assert!(matches!(
            RotationPlanner::try_new(2024, 0),
            Err(FieldMapError::InvalidData(_))
        ));
        assert!(matches!(
            RotationPlanner::try_new(2024, 3_000_000_000),
            Err(FieldMapError::InvalidData(_))
        ));
        assert_eq!(
            RotationPlanner::try_new(2024, MAX_HORIZON_YEARS)
                .map(|p| p.horizon)
                .ok(),
            Some(MAX_HORIZON_YEARS)
        );
    }

    #[test]
    fn cells_mark_recorded_planned_and_empty_years() {
        let timeline = RotationPlanner::new(2024, 4).plan_field(&south_field(), &catalog());

        assert_eq!(timeline.cells.len(), 4);

        let tomatoes = &timeline.cells[0];
        assert_eq!(tomatoes.crop.as_deref(), Some("Tomatoes"));
        assert_eq!(tomatoes.group, Some(RotationGroup::HeavyFeeder));
        assert!(!tomatoes.planned);
        // Potatoes precede it from outside the window
        assert!(tomatoes.check.as_ref().unwrap().valid);

        let peas = &timeline.cells[1];
        assert!(peas.planned);
        assert_eq!(peas.group, Some(RotationGroup::Legume));

        assert!(timeline.cells[2].crop.is_none());
        assert!(timeline.cells[2].check.is_none());
        assert!(!timeline.has_violations());
    }

    #[test]
    fn suggestions_follow_latest_planting_before_open_year() {
        let timeline = RotationPlanner::new(2024, 4).plan_field(&south_field(), &catalog());

        assert_eq!(timeline.next_open_year, Some(2026));
        assert_eq!(timeline.after_crop.as_deref(), Some("Peas"));
        // legume -> heavy feeders and brassicas first
        let crops: Vec<&str> = timeline.suggestions.iter().map(|s| s.crop.as_str()).collect();
        assert_eq!(crops, vec!["Corn", "Broccoli", "Peas", "Carrots", "Wheat"]);
    }

    #[test]
    fn planned_violation_is_flagged() {
        let field = south_field().with_planned(PlantingRecord::new("Peas", 2026));
        let timeline = RotationPlanner::new(2024, 4).plan_field(&field, &catalog());

        let repeat = timeline.cells[2].check.as_ref().unwrap();
        assert!(!repeat.valid);
        assert_eq!(repeat.severity, Some(Severity::Error));
        assert!(timeline.has_violations());
        assert_eq!(timeline.next_open_year, Some(2027));
    }

    #[test]
    fn empty_field_gets_first_planting_suggestions() {
        let field = Field::new("4", "West Field", 12.5);
        let timeline = RotationPlanner::new(2024, 4).plan_field(&field, &catalog());

        assert_eq!(timeline.next_open_year, Some(2024));
        assert!(timeline.after_crop.is_none());
        assert_eq!(timeline.suggestions.len(), 5);
        assert!(timeline.suggestions.iter().all(|s| s.score == 1));
    }

    #[test]
    fn full_window_has_no_suggestions() {
        let field = Field::new("1", "North Field", 25.5)
            .with_planting(PlantingRecord::new("Corn", 2024))
            .with_planned(PlantingRecord::new("Soybeans", 2025));
        let timeline = RotationPlanner::new(2024, 2).plan_field(&field, &catalog());

        assert!(timeline.next_open_year.is_none());
        assert!(timeline.suggestions.is_empty());
    }

    #[test]
    fn plan_farm_skips_inactive_fields() {
        let mut inactive = Field::new("9", "Retired", 3.0);
        inactive.is_active = false;
        let fields = vec![south_field(), inactive];

        let timelines = RotationPlanner::new(2024, 4).plan_farm(&fields, &catalog());
        assert_eq!(timelines.len(), 1);
        assert_eq!(timelines[0].field, "South Field");
    }
}
