use crate::error::{FieldMapError, Result};
use crate::logic::geometry::is_closed_ring;
use crate::logic::planner::{RotationPlanner, DEFAULT_HORIZON_YEARS, MAX_HORIZON_YEARS};
use crate::models::{
    CropIdentity, DrainageQuality, Farm, Field, IrrigationType, PlantingRecord, Season, SoilType,
};
use chrono::{Datelike, Local, NaiveDate};
use dialoguer::Input;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub farm: Farm,
    #[serde(default)]
    pub planner: PlannerConfig,
    /// Crops offered as rotation candidates.
    #[serde(default = "default_catalog")]
    pub crops: Vec<CropIdentity>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlannerConfig {
    /// First planner year; the current year when unset.
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default = "default_horizon")]
    pub horizon_years: u32,
}

fn default_horizon() -> u32 {
    DEFAULT_HORIZON_YEARS
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            start_year: None,
            horizon_years: DEFAULT_HORIZON_YEARS,
        }
    }
}

impl PlannerConfig {
    pub fn planner(&self) -> RotationPlanner {
        let start = self.start_year.unwrap_or_else(|| Local::now().year());
        RotationPlanner::new(start, self.horizon_years)
    }
}

fn default_catalog() -> Vec<CropIdentity> {
    [
        ("Corn", "Grain"),
        ("Soybeans", "Legume"),
        ("Wheat", "Grain"),
        ("Peas", "Legume"),
        ("Beans", "Legume"),
        ("Tomatoes", "Vegetable"),
        ("Peppers", "Vegetable"),
        ("Potatoes", "Vegetable"),
        ("Squash", "Vegetable"),
        ("Cabbage", "Vegetable"),
        ("Broccoli", "Vegetable"),
        ("Kale", "Vegetable"),
        ("Carrots", "Vegetable"),
        ("Beets", "Vegetable"),
        ("Cucumbers", "Vegetable"),
        ("Onions", "Vegetable"),
        ("Garlic", "Herb"),
    ]
    .iter()
    .map(|(name, category)| CropIdentity::new(*name).with_category(category))
    .collect()
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(FieldMapError::Config(format!(
                "Config file not found at {:?}. Run `fieldmap init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| FieldMapError::Config(format!("Failed to read config: {}", e)))?;

        let config = Self::from_yaml_str(&config_str)?;
        info!(
            path = %config_path.display(),
            fields = config.fields.len(),
            "Loaded farm configuration"
        );
        Ok(config)
    }

    /// Parse YAML after substituting `${VAR}` environment references.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Search for a config file in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/fieldmap.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let default_path = Self::default_config_path()?;
        Ok(default_path)
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/fieldmap/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FieldMapError::Config("Cannot determine config directory".into()))?
            .join("fieldmap");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive(config_override: Option<PathBuf>) -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up FieldMap!");
        println!();

        println!("Farm");
        let farm_name: String = Input::new()
            .with_prompt("  Farm name")
            .default("Green Acres".into())
            .interact_text()
            .map_err(|e| FieldMapError::Config(format!("Input error: {}", e)))?;

        let address: String = Input::new()
            .with_prompt("  Address (optional)")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| FieldMapError::Config(format!("Input error: {}", e)))?;

        let latitude: f64 = Input::new()
            .with_prompt("  Latitude")
            .default(41.59)
            .interact_text()
            .map_err(|e| FieldMapError::Config(format!("Input error: {}", e)))?;

        let longitude: f64 = Input::new()
            .with_prompt("  Longitude")
            .default(-93.62)
            .interact_text()
            .map_err(|e| FieldMapError::Config(format!("Input error: {}", e)))?;

        println!();

        println!("Rotation planner");
        let horizon_years: u32 = Input::new()
            .with_prompt("  Years to plan ahead")
            .default(DEFAULT_HORIZON_YEARS)
            .validate_with(|years: &u32| -> std::result::Result<(), String> {
                if (1..=MAX_HORIZON_YEARS).contains(years) {
                    Ok(())
                } else {
                    Err(format!("Enter 1 to {} years", MAX_HORIZON_YEARS))
                }
            })
            .interact_text()
            .map_err(|e| FieldMapError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            farm: Farm {
                name: farm_name,
                address: if address.is_empty() {
                    None
                } else {
                    Some(address)
                },
                latitude: Some(latitude),
                longitude: Some(longitude),
            },
            planner: PlannerConfig {
                start_year: None,
                horizon_years,
            },
            ..Config::default()
        };

        let config_path = match config_override {
            Some(p) => p,
            None => Self::default_config_path()?,
        };
        config.write(&config_path)?;

        println!("Configuration saved to {}", config_path.display());
        println!("Sample fields were added; edit the file to describe your own.");
        println!();

        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)?;

        let content = format!(
            "# FieldMap Configuration\n# Generated by `fieldmap init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, content)?;
        info!(path = %path.display(), "Wrote farm configuration");
        Ok(())
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        let re = match regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
            Ok(re) => re,
            Err(e) => {
                warn!("Env var pattern failed to compile: {}", e);
                return result;
            }
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn field(&self, id_or_name: &str) -> Result<&Field> {
        self.fields
            .iter()
            .find(|f| f.id == id_or_name || f.name.eq_ignore_ascii_case(id_or_name))
            .ok_or_else(|| FieldMapError::NotFound(format!("field '{}'", id_or_name)))
    }

    /// Problems that make the farm data unreliable. Empty when the config is sound.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen_ids = HashSet::new();

        if self.farm.name.trim().is_empty() {
            problems.push("farm name is empty".to_string());
        }
        if !(1..=MAX_HORIZON_YEARS).contains(&self.planner.horizon_years) {
            problems.push(format!(
                "planner.horizon_years must be between 1 and {}, got {}",
                MAX_HORIZON_YEARS, self.planner.horizon_years
            ));
        }
        if self.crops.iter().any(|c| c.name.trim().is_empty()) {
            problems.push("crop catalog contains an entry with an empty name".to_string());
        }

        for field in &self.fields {
            let label = if field.name.is_empty() {
                format!("field {}", field.id)
            } else {
                format!("field '{}'", field.name)
            };

            if !seen_ids.insert(field.id.as_str()) {
                problems.push(format!("{}: duplicate id '{}'", label, field.id));
            }
            if field.name.trim().is_empty() {
                problems.push(format!("{}: name is empty", label));
            }
            if field.size_acres.is_nan() || field.size_acres <= 0.0 {
                problems.push(format!("{}: size_acres must be positive", label));
            }
            if let Some(ph) = field.soil_ph {
                if !(0.0..=14.0).contains(&ph) {
                    problems.push(format!("{}: soil_ph {} is outside 0-14", label, ph));
                }
            }
            if let Some(boundary) = &field.boundary {
                if !is_closed_ring(boundary.outer_ring()) {
                    problems.push(format!("{}: boundary is not a closed polygon", label));
                }
            }
            for record in field.history.iter().chain(field.planned.iter()) {
                if record.crop_name.trim().is_empty() {
                    problems.push(format!("{}: planting in {} has no crop", label, record.year));
                }
            }
        }

        problems
    }
}

impl Default for Config {
    /// The sample farm shipped with `fieldmap init`.
    fn default() -> Self {
        let this_year = Local::now().year();

        let mut north = Field::new("1", "North Field", 25.5)
            .with_planting(
                PlantingRecord::new("Corn", this_year - 3)
                    .with_category("Grain")
                    .with_yield(175.0, "bu/acre"),
            )
            .with_planting(
                PlantingRecord::new("Soybeans", this_year - 2)
                    .with_category("Legume")
                    .with_yield(55.0, "bu/acre"),
            )
            .with_planting(
                PlantingRecord::new("Wheat", this_year - 1)
                    .with_category("Grain")
                    .with_yield(65.0, "bu/acre"),
            )
            .with_planting(PlantingRecord::new("Corn", this_year).with_category("Grain"))
            .with_planned(PlantingRecord::new("Soybeans", this_year + 1).with_category("Legume"))
            .with_planned(PlantingRecord::new("Wheat", this_year + 2).with_category("Grain"));
        north.soil_type = Some(SoilType::Loamy);
        north.soil_ph = Some(6.8);
        north.organic_matter_percent = Some(3.5);
        north.irrigation_type = Some(IrrigationType::Drip);
        north.drainage_quality = Some(DrainageQuality::Good);
        north.last_soil_test_date = NaiveDate::from_ymd_opt(this_year - 1, 3, 15);
        north.notes = Some("Prime location for heavy feeders".into());

        let mut south = Field::new("2", "South Field", 18.2)
            .with_planting(
                PlantingRecord::new("Potatoes", this_year - 1)
                    .with_category("Vegetable")
                    .with_season(Season::Spring),
            )
            .with_planting(
                PlantingRecord::new("Tomatoes", this_year)
                    .with_category("Vegetable")
                    .with_season(Season::Summer),
            )
            .with_planned(PlantingRecord::new("Peas", this_year + 1).with_category("Legume"));
        south.soil_type = Some(SoilType::SandyLoam);
        south.irrigation_type = Some(IrrigationType::Sprinkler);
        south.color = "#10b981".into();

        // Two heavy feeders in a row keep this one below the review threshold
        let mut east = Field::new("3", "East Field", 32.8)
            .with_planting(PlantingRecord::new("Squash", this_year - 2).with_category("Vegetable"))
            .with_planting(PlantingRecord::new("Corn", this_year - 1).with_category("Grain"))
            .with_planting(PlantingRecord::new("Soybeans", this_year).with_category("Legume"));
        east.soil_type = Some(SoilType::ClayLoam);
        east.irrigation_type = Some(IrrigationType::CenterPivot);
        east.color = "#f59e0b".into();

        let mut west = Field::new("4", "West Field", 12.5);
        west.soil_type = Some(SoilType::Silty);
        west.irrigation_type = Some(IrrigationType::RainFed);
        west.drainage_quality = Some(DrainageQuality::Fair);
        west.color = "#8b5cf6".into();
        west.notes = Some("Fallow this year".into());

        Self {
            farm: Farm {
                name: "Green Acres".into(),
                address: None,
                latitude: Some(41.59),
                longitude: Some(-93.62),
            },
            planner: PlannerConfig::default(),
            crops: default_catalog(),
            fields: vec![north, south, east, west],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Polygon;

    const SAMPLE: &str = r#"
farm:
  name: Willow Creek
planner:
  start_year: 2025
fields:
  - id: "1"
    name: North Field
    size_acres: 25.5
    soil_type: Loamy
    history:
      - crop_name: Corn
        year: 2023
      - crop_name: Soybeans
        crop_category: Legume
        year: 2024
    planned:
      - crop_name: Wheat
        year: 2025
"#;

    #[test]
    fn parses_yaml_with_defaults() {
        let config = Config::from_yaml_str(SAMPLE).unwrap();

        assert_eq!(config.farm.name, "Willow Creek");
        assert_eq!(config.planner.start_year, Some(2025));
        assert_eq!(config.planner.horizon_years, DEFAULT_HORIZON_YEARS);
        assert_eq!(config.planner.planner().years(), vec![2025, 2026, 2027, 2028]);
        assert!(!config.crops.is_empty());
        assert_eq!(config.fields.len(), 1);
        assert_eq!(config.fields[0].history.len(), 2);
        assert_eq!(config.fields[0].planned[0].crop_name, "Wheat");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn substitutes_environment_variables() {
        std::env::set_var("FIELDMAP_TEST_FARM_NAME", "Env Farm");
        let yaml = "farm:\n  name: ${FIELDMAP_TEST_FARM_NAME}\n";
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.farm.name, "Env Farm");
    }

    #[test]
    fn leaves_unset_variables_in_place() {
        let yaml = "farm:\n  name: ${FIELDMAP_TEST_SURELY_UNSET_VAR}\n";
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.farm.name, "${FIELDMAP_TEST_SURELY_UNSET_VAR}");
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = Config::from_yaml_str("farm: [unterminated").unwrap_err();
        assert!(matches!(err, FieldMapError::Yaml(_)));
        assert!(err.to_string().starts_with("YAML parsing error"));
    }

    #[test]
    fn validate_rejects_out_of_range_horizon() {
        let mut config = Config::default();
        config.planner.horizon_years = 3_000_000_000;
        let problems = config.validate();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("horizon_years"));

        config.planner.horizon_years = 0;
        assert_eq!(config.validate().len(), 1);

        config.planner.horizon_years = MAX_HORIZON_YEARS;
        assert!(config.validate().is_empty());
    }

    #[test]
    fn load_reports_missing_file() {
        let missing = std::env::temp_dir().join("fieldmap-definitely-missing.yaml");
        let err = Config::load(Some(missing)).unwrap_err();
        assert!(err.to_string().contains("fieldmap init"));
    }

    #[test]
    fn write_then_load_preserves_fields() {
        let path = std::env::temp_dir()
            .join(format!("fieldmap-test-{}", std::process::id()))
            .join("config.yaml");
        let config = Config::default();
        config.write(&path).unwrap();

        let loaded = Config::load(Some(path.clone())).unwrap();
        assert_eq!(loaded.fields, config.fields);
        assert_eq!(loaded.crops, config.crops);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.fields.len(), 4);
        assert!(config.validate().is_empty());
        assert_eq!(config.fields[0].compliance_score(), 100);
        assert_eq!(config.fields[2].compliance_score(), 50);
    }

    #[test]
    fn field_lookup_by_id_or_name() {
        let config = Config::default();
        assert_eq!(config.field("2").unwrap().name, "South Field");
        assert_eq!(config.field("east field").unwrap().id, "3");
        assert!(matches!(
            config.field("Back Forty"),
            Err(FieldMapError::NotFound(_))
        ));
    }

    #[test]
    fn validate_reports_problems() {
        let mut config = Config::default();
        config.fields[1].id = "1".into();
        config.fields[2].size_acres = 0.0;
        config.fields[3].soil_ph = Some(15.0);
        config.fields[3].boundary = Some(Polygon::new(vec![vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
        ]]));
        config.fields[0].planned.push(PlantingRecord::new(" ", 2040));

        let problems = config.validate();
        assert_eq!(problems.len(), 5, "{:?}", problems);
        assert!(problems.iter().any(|p| p.contains("duplicate id")));
        assert!(problems.iter().any(|p| p.contains("size_acres")));
        assert!(problems.iter().any(|p| p.contains("soil_ph")));
        assert!(problems.iter().any(|p| p.contains("closed polygon")));
        assert!(problems.iter().any(|p| p.contains("2040")));
    }
}
