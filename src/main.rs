mod cli;
mod report;

use chrono::{Datelike, Local};
use clap::Parser;
use cli::{Cli, Commands};
use fieldmap::config::Config;
use fieldmap::error::Result;
use fieldmap::logic::analytics::{crop_distribution, farm_stats, field_compliance, review_history};
use fieldmap::logic::rotation::{
    check_rotation, classify_rotation_group, suggest_next_crops,
};
use fieldmap::logic::RotationPlanner;
use fieldmap::models::CropIdentity;
use report::Dashboard;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Stats { year: None });
    let this_year = Local::now().year();

    match command {
        Commands::Init => {
            Config::setup_interactive(cli.config)?;
        }
        Commands::Check => {
            let config = Config::load(cli.config)?;
            let problems = config.validate();
            if cli.json {
                print_json(&problems)?;
            } else {
                print!("{}", report::problems(&problems));
            }
            if !problems.is_empty() {
                std::process::exit(2);
            }
        }
        Commands::Classify { crop, category } => {
            let group = classify_rotation_group(&crop, category.as_deref());
            if cli.json {
                print_json(&serde_json::json!({ "crop": crop, "group": group }))?;
            } else {
                print!("{}", report::classification(&crop, group));
            }
        }
        Commands::Rotate { next, after } => {
            let prev = after.as_deref().map(CropIdentity::new);
            let check = check_rotation(prev.as_ref(), &CropIdentity::new(next.as_str()));
            if cli.json {
                print_json(&check)?;
            } else {
                print!("{}", report::rotation_check(after.as_deref(), &next, &check));
            }
        }
        Commands::Suggest { after, candidates } => {
            let candidates = if candidates.is_empty() {
                let config = load_or_default(cli.config)?;
                config.crops.into_iter().map(|c| c.name).collect()
            } else {
                candidates
            };
            let prev = after.as_deref().map(CropIdentity::new);
            let entries = suggest_next_crops(prev.as_ref(), &candidates);
            if cli.json {
                print_json(&entries)?;
            } else {
                print!("{}", report::suggestions(after.as_deref(), &entries));
            }
        }
        Commands::Score { field } => {
            let config = Config::load(cli.config)?;
            let rows = match field {
                Some(id) => {
                    let field = config.field(&id)?;
                    field_compliance(std::slice::from_ref(field))
                }
                None => field_compliance(&config.fields),
            };
            if cli.json {
                print_json(&rows)?;
            } else {
                print!("{}", report::compliance_table(&rows));
            }
        }
        Commands::Fields => {
            let config = Config::load(cli.config)?;
            if cli.json {
                print_json(&config.fields)?;
            } else {
                print!("{}", report::field_list(&config.fields, this_year));
            }
        }
        Commands::Field { field } => {
            let config = Config::load(cli.config)?;
            let field = config.field(&field)?;
            let history = review_history(field);
            if cli.json {
                print_json(&serde_json::json!({
                    "field": field,
                    "size_hectares": field.size_hectares(),
                    "history": history,
                    "compliance": field.compliance_score(),
                }))?;
            } else {
                print!("{}", report::field_detail(field, &history, this_year));
            }
        }
        Commands::Plan { start, years } => {
            let config = Config::load(cli.config)?;
            let configured = config.planner.planner();
            let start = start.unwrap_or(configured.start_year);
            let planner = match years {
                Some(years) => RotationPlanner::try_new(start, years)?,
                None => RotationPlanner::new(start, configured.horizon),
            };
            let timelines = planner.plan_farm(&config.fields, &config.crops);
            if cli.json {
                print_json(&timelines)?;
            } else {
                print!("{}", report::plan(&planner.years(), &timelines));
            }
        }
        Commands::Stats { year } => {
            let config = Config::load(cli.config)?;
            let year = year.unwrap_or(this_year);
            let dashboard = Dashboard {
                farm: config.farm.name.clone(),
                stats: farm_stats(&config.fields, year),
                distribution: crop_distribution(&config.fields, year),
                compliance: field_compliance(&config.fields),
            };
            if cli.json {
                print_json(&dashboard)?;
            } else {
                print!("{}", report::dashboard(&dashboard));
            }
        }
    }

    Ok(())
}

/// Crop catalog lookups work without a config file; fall back to the sample farm.
fn load_or_default(config_override: Option<std::path::PathBuf>) -> Result<Config> {
    if Config::exists(config_override.as_ref()) {
        Config::load(config_override)
    } else {
        tracing::warn!("No config found, using the built-in crop catalog");
        Ok(Config::default())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
