use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fieldmap",
    version,
    about = "Farm field mapping and crop rotation planner"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the farm config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive setup; writes a config with sample fields
    Init,
    /// Validate the farm config
    Check,
    /// Show the rotation group of a crop
    Classify {
        crop: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// Validate planting NEXT after the previous crop
    Rotate {
        next: String,
        /// Previous crop on the field; omit for a first planting
        #[arg(long)]
        after: Option<String>,
    },
    /// Rank follow-up crops
    Suggest {
        /// Previous crop on the field; omit for a first planting
        #[arg(long)]
        after: Option<String>,
        /// Candidate crops; defaults to the config's crop catalog
        candidates: Vec<String>,
    },
    /// Rotation compliance per field
    Score {
        /// Field id or name; all fields when omitted
        field: Option<String>,
    },
    /// List fields
    Fields,
    /// Field detail with planting history
    Field { field: String },
    /// Multi-year rotation timeline with suggestions
    Plan {
        #[arg(long)]
        start: Option<i32>,
        #[arg(long)]
        years: Option<u32>,
    },
    /// Farm dashboard and analytics
    Stats {
        #[arg(long)]
        year: Option<i32>,
    },
}
