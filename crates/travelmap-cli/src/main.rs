//! travelmap-cli — Command-line interface for travelmap-core
//!
//! This binary drives the travel-log store from a terminal: registering
//! visits, editing and deleting records, and describing what the map
//! renderer would draw for each mode.
//!
//! Usage examples
//! --------------
//!
//! - Show overall stats
//!   $ travelmap-cli stats
//!
//! - List all records, newest first
//!   $ travelmap-cli list
//!
//! - Register a visit (prompts if the city is not in the mapping)
//!   $ travelmap-cli register --date 2024-05-01 --title 出張 --location 上海、中国
//!
//! - Edit a record (omitted flags keep the stored values)
//!   $ travelmap-cli edit 1700000000000 --memo "rewritten"
//!
//! - Delete a record
//!   $ travelmap-cli delete 1700000000000 --yes
//!
//! - Describe a render pass
//!   $ travelmap-cli map china
//!
//! Data locations
//! --------------
//!
//! Records, the city mapping cache and the geocode cache live as JSON
//! files under `--data-dir` (default `./data`). Static assets (country
//! codes, the China city CSV and the geojson boundary files) are read
//! from `--assets-dir` (default `./assets`); missing assets degrade the
//! related features instead of failing startup.
mod args;

use crate::args::{CliArgs, Commands};
use clap::Parser;
use std::io::{self, BufRead, Write};
use travelmap_core::{
    App, Bounds, Config, Coordinates, EditOutcome, FeatureStyle, LogChanges, MapCanvas,
    MarkerStyle, Nominatim, RegistrationForm, SubmitOutcome, UserPrompt,
};

/// Prompt backed by stdin/stderr.
struct TermPrompt {
    assume_yes: bool,
}

impl UserPrompt for TermPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{message} [y/N] ");
        let _ = io::stderr().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim(), "y" | "Y" | "yes")
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Canvas that narrates draw calls instead of drawing.
#[derive(Default)]
struct TextCanvas {
    features: usize,
    markers: usize,
}

impl MapCanvas for TextCanvas {
    fn clear_layers(&mut self) {
        self.features = 0;
        self.markers = 0;
    }

    fn add_base_layer(&mut self, attribution: &str) {
        println!("base layer ({attribution})");
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        println!("view: [{}, {}] zoom {}", center.lat, center.lon, zoom);
    }

    fn draw_feature(&mut self, key: &str, style: &FeatureStyle, clickable: bool) {
        self.features += 1;
        if clickable {
            println!("feature {key}: visited ({})", style.fill_color);
        }
    }

    fn draw_marker(&mut self, at: Coordinates, style: &MarkerStyle, label: Option<&str>) {
        self.markers += 1;
        let label = label.unwrap_or("-");
        println!(
            "marker [{}, {}] r{} {label}",
            at.lat, at.lon, style.radius
        );
    }

    fn fit_bounds(&mut self, bounds: &Bounds) {
        if let Some(center) = bounds.center() {
            println!("fit bounds around [{}, {}]", center.lat, center.lon);
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travelmap=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();

    let data_dir = args.data_dir.as_deref().unwrap_or("data");
    let assets_dir = args.assets_dir.as_deref().unwrap_or("assets");
    let config = Config::new(data_dir, assets_dir);
    let mut app = App::open(&config)?;

    match args.command {
        Commands::Stats => {
            let stats = app.stats();
            println!("Store statistics:");
            println!("  Records: {}", stats.logs);
            println!("  Mapped cities: {}", stats.mapped_cities);
            println!("  Cached locations: {}", stats.cached_locations);
            println!("  Country codes: {}", stats.country_codes);
        }

        Commands::List => {
            for log in app.logs().sorted_by_date_desc() {
                println!(
                    "{}  {}  {}  [{}] {}",
                    log.id, log.date, log.country, log.location, log.title
                );
            }
        }

        Commands::Show { id } => match app.find_log(id).cloned() {
            Some(log) => {
                println!("Id: {}", log.id);
                println!("Date: {}", log.date);
                println!("Title: {}", log.title);
                println!("Location: {}", log.location);
                println!("Country: {}", log.country);
                println!("Province: {:?} / {:?}", log.province_zh, log.province_en);
                println!("Memo: {}", log.memo);

                let geocoder = Nominatim::new()?;
                match app.locate(&log.location, &geocoder) {
                    Some(at) => println!("Map pin: [{}, {}]", at.lat, at.lon),
                    None => println!("No map data for this location"),
                }
            }
            None => eprintln!("Record not found: {id}"),
        },

        Commands::Register {
            date,
            title,
            location,
            memo,
            yes,
        } => {
            let geocoder = Nominatim::new()?;
            let mut prompt = TermPrompt { assume_yes: yes };
            let form = RegistrationForm {
                date,
                title,
                location,
                memo,
            };
            match app.submit(form, &geocoder, &mut prompt)? {
                SubmitOutcome::Saved(id) => println!("Registered record {id}"),
                SubmitOutcome::Declined => println!("Nothing saved"),
            }
        }

        Commands::Edit {
            id,
            date,
            title,
            location,
            memo,
        } => {
            let mut prompt = TermPrompt { assume_yes: false };
            let changes = LogChanges {
                date,
                title,
                location,
                memo,
            };
            match app.edit(id, changes, &mut prompt)? {
                EditOutcome::Saved => println!("Record {id} updated"),
                EditOutcome::Rejected => println!("Nothing saved"),
            }
        }

        Commands::Delete { id, yes } => {
            let mut prompt = TermPrompt { assume_yes: false };
            if app.delete(id, &mut prompt, yes)? {
                println!("Record {id} deleted");
            } else {
                println!("Nothing deleted");
            }
        }

        Commands::Map { mode } => {
            let geocoder = Nominatim::new()?;
            let mut canvas = TextCanvas::default();
            app.render(mode, &mut canvas, &geocoder);
            println!(
                "{}: {} features, {} markers",
                mode.as_str(),
                canvas.features,
                canvas.markers
            );
        }
    }

    Ok(())
}
