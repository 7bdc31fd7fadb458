use clap::{Parser, Subcommand};
use travelmap_core::Mode;

/// CLI arguments for travelmap-cli
#[derive(Debug, Parser)]
#[command(
    name = "travelmap",
    version,
    about = "CLI for registering and inspecting a personal travel log"
)]
pub struct CliArgs {
    /// Directory holding the JSON store files (default: ./data)
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Directory holding codes.json, china_cities.csv and the geojson
    /// boundary files (default: ./assets)
    #[arg(short = 'a', long = "assets-dir", global = true)]
    pub assets_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the store contents
    Stats,

    /// List all records, newest first
    List,

    /// Show one record by id
    Show {
        /// Record id
        id: i64,
    },

    /// Register a new record
    Register {
        /// Date of the visit (YYYY-MM-DD)
        #[arg(long)]
        date: chrono::NaiveDate,

        /// Title of the record
        #[arg(long)]
        title: String,

        /// Location string, e.g. "上海、中国"
        #[arg(long)]
        location: String,

        /// Free-form memo
        #[arg(long, default_value = "")]
        memo: String,

        /// Answer yes to the unmapped-city prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Edit an existing record; omitted fields keep their stored values
    Edit {
        /// Record id
        id: i64,

        #[arg(long)]
        date: Option<chrono::NaiveDate>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        memo: Option<String>,
    },

    /// Delete a record (and its cached geocode entry)
    Delete {
        /// Record id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Describe what a map render would draw (world, china or japan)
    Map {
        /// Map mode
        #[arg(default_value = "world")]
        mode: Mode,
    },
}
