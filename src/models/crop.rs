use serde::{Deserialize, Serialize};

/// Horticultural bucket used to decide which crops may follow each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationGroup {
    Legume,
    HeavyFeeder,
    LightFeeder,
    Brassica,
    Solanaceae,
    Cucurbit,
    Allium,
    RootVegetable,
}

impl RotationGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationGroup::Legume => "legume",
            RotationGroup::HeavyFeeder => "heavy_feeder",
            RotationGroup::LightFeeder => "light_feeder",
            RotationGroup::Brassica => "brassica",
            RotationGroup::Solanaceae => "solanaceae",
            RotationGroup::Cucurbit => "cucurbit",
            RotationGroup::Allium => "allium",
            RotationGroup::RootVegetable => "root_vegetable",
        }
    }

    /// Legend label shown next to planner cells.
    pub fn label(&self) -> &'static str {
        match self {
            RotationGroup::Legume => "Legumes (N-Fixers)",
            RotationGroup::HeavyFeeder => "Heavy Feeders",
            RotationGroup::LightFeeder => "Light Feeders",
            RotationGroup::Brassica => "Brassicas",
            RotationGroup::Solanaceae => "Nightshades",
            RotationGroup::Cucurbit => "Cucurbits",
            RotationGroup::Allium => "Alliums",
            RotationGroup::RootVegetable => "Root Vegetables",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "legume" | "legumes" => Some(RotationGroup::Legume),
            "heavyfeeder" | "heavyfeeders" => Some(RotationGroup::HeavyFeeder),
            "lightfeeder" | "lightfeeders" => Some(RotationGroup::LightFeeder),
            "brassica" | "brassicas" => Some(RotationGroup::Brassica),
            "solanaceae" | "nightshade" | "nightshades" => Some(RotationGroup::Solanaceae),
            "cucurbit" | "cucurbits" => Some(RotationGroup::Cucurbit),
            "allium" | "alliums" => Some(RotationGroup::Allium),
            "rootvegetable" | "rootvegetables" => Some(RotationGroup::RootVegetable),
            _ => None,
        }
    }

    pub fn all() -> &'static [RotationGroup] {
        &[
            RotationGroup::Legume,
            RotationGroup::HeavyFeeder,
            RotationGroup::LightFeeder,
            RotationGroup::Brassica,
            RotationGroup::Solanaceae,
            RotationGroup::Cucurbit,
            RotationGroup::Allium,
            RotationGroup::RootVegetable,
        ]
    }
}

impl std::fmt::Display for RotationGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "fall" | "autumn" => Some(Season::Fall),
            "winter" => Some(Season::Winter),
            _ => None,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The crop of one planting event. Names match case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropIdentity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CropIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn same_crop(&self, other: &CropIdentity) -> bool {
        self.name.to_lowercase() == other.name.to_lowercase()
    }
}

/// One season's crop on a field, as recorded or planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantingRecord {
    pub crop_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_category: Option<String>,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_unit: Option<String>,
}

impl PlantingRecord {
    pub fn new(crop_name: &str, year: i32) -> Self {
        Self {
            crop_name: crop_name.to_string(),
            crop_category: None,
            year,
            season: None,
            yield_amount: None,
            yield_unit: None,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.crop_category = Some(category.to_string());
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_yield(mut self, amount: f64, unit: &str) -> Self {
        self.yield_amount = Some(amount);
        self.yield_unit = Some(unit.to_string());
        self
    }

    pub fn crop(&self) -> CropIdentity {
        CropIdentity {
            name: self.crop_name.clone(),
            category: self.crop_category.clone(),
        }
    }

    pub fn yield_display(&self) -> Option<String> {
        let amount = self.yield_amount?;
        Some(match &self.yield_unit {
            Some(unit) => format!("{} {}", amount, unit),
            None => amount.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_group_from_str_valid() {
        assert_eq!(
            RotationGroup::from_str("heavy_feeder"),
            Some(RotationGroup::HeavyFeeder)
        );
        assert_eq!(
            RotationGroup::from_str("Heavy Feeders"),
            Some(RotationGroup::HeavyFeeder)
        );
        assert_eq!(
            RotationGroup::from_str("root-vegetable"),
            Some(RotationGroup::RootVegetable)
        );
        assert_eq!(
            RotationGroup::from_str("Nightshades"),
            Some(RotationGroup::Solanaceae)
        );
    }

    #[test]
    fn rotation_group_from_str_invalid() {
        assert_eq!(RotationGroup::from_str(""), None);
        assert_eq!(RotationGroup::from_str("grain"), None);
    }

    #[test]
    fn rotation_group_as_str_parses_back() {
        for group in RotationGroup::all() {
            assert_eq!(
                RotationGroup::from_str(group.as_str()),
                Some(*group),
                "as_str did not parse back for {:?}",
                group
            );
        }
    }

    #[test]
    fn rotation_group_serializes_snake_case() {
        let json = serde_json::to_string(&RotationGroup::RootVegetable).unwrap();
        assert_eq!(json, "\"root_vegetable\"");
        let group: RotationGroup = serde_json::from_str("\"heavy_feeder\"").unwrap();
        assert_eq!(group, RotationGroup::HeavyFeeder);
    }

    #[test]
    fn same_crop_ignores_case() {
        let a = CropIdentity::new("Sweet Corn");
        let b = CropIdentity::new("sweet CORN").with_category("Grain");
        assert!(a.same_crop(&b));
        assert!(!a.same_crop(&CropIdentity::new("Corn")));
    }

    #[test]
    fn planting_record_builder_pattern() {
        let record = PlantingRecord::new("Corn", 2024)
            .with_category("Grain")
            .with_season(Season::Spring)
            .with_yield(180.0, "bu/acre");

        assert_eq!(record.year, 2024);
        assert_eq!(record.crop_category.as_deref(), Some("Grain"));
        assert_eq!(record.season, Some(Season::Spring));
        assert_eq!(record.yield_display().as_deref(), Some("180 bu/acre"));
        assert_eq!(record.crop().name, "Corn");
    }

    #[test]
    fn planting_record_yaml_optional_fields() {
        let record: PlantingRecord =
            serde_yaml::from_str("crop_name: Wheat\nyear: 2022\nseason: fall\n").unwrap();
        assert_eq!(record.crop_name, "Wheat");
        assert_eq!(record.season, Some(Season::Fall));
        assert!(record.crop_category.is_none());
        assert!(record.yield_display().is_none());
    }
}
