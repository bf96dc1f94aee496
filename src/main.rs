use clap::{Parser, Subcommand};
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;

use sat_o_view::cancel::CancelToken;
use sat_o_view::catalog::{CatalogManager, Category};
use sat_o_view::geo::ObserverLocation;
use sat_o_view::track::{self, DEFAULT_DURATION_MINUTES, DEFAULT_INTERVAL_MINUTES};
use sat_o_view::visibility::{find_visible, VisibilityQuery, DEFAULT_MIN_ELEVATION_DEG};
use sat_o_view::web::{self, Config};

#[derive(Parser)]
#[command(name = "sat-o-view")]
#[command(about = "Satellite catalog, visibility and ground tracks")]
struct Cli {
    /// YAML configuration file; built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API and the background refresher
    Serve,
    /// Refresh one category and report what was loaded
    Refresh { category: String },
    /// List satellites above an observer right now
    Visible {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Metres above the ellipsoid
        #[arg(long, default_value_t = 0.0)]
        alt: f64,
        #[arg(long, default_value_t = DEFAULT_MIN_ELEVATION_DEG, allow_hyphen_values = true)]
        min_elevation: f64,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value = "active")]
        category: String,
    },
    /// Print the ground track of one satellite starting now
    Track {
        id: u32,
        #[arg(long, default_value_t = DEFAULT_DURATION_MINUTES)]
        duration: u32,
        #[arg(long, default_value_t = DEFAULT_INTERVAL_MINUTES)]
        interval: u32,
        #[arg(long, default_value = "active")]
        category: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let catalog = match config.catalog.build_catalog() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Error creating element source: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Serve => serve(config, catalog).await,
        Commands::Refresh { category } => refresh(&catalog, Category::from_key(&category)).await,
        Commands::Visible {
            lat,
            lon,
            alt,
            min_elevation,
            limit,
            category,
        } => {
            let observer = match (lat, lon) {
                (Some(lat), Some(lon)) => ObserverLocation::new(lat, lon, alt),
                _ => match config.default_observer() {
                    Some(observer) => Ok(observer),
                    None => {
                        eprintln!("--lat and --lon are required without a configured observer");
                        return ExitCode::FAILURE;
                    }
                },
            };
            let observer = match observer {
                Ok(o) => o,
                Err(e) => {
                    eprintln!("Invalid observer: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            visible(
                &catalog,
                Category::from_key(&category),
                observer,
                min_elevation,
                limit,
            )
            .await
        }
        Commands::Track {
            id,
            duration,
            interval,
            category,
        } => print_track(&catalog, Category::from_key(&category), id, duration, interval).await,
    }
}

async fn serve(config: Config, catalog: Arc<CatalogManager>) -> ExitCode {
    match web::run_server(config, catalog).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn refresh(catalog: &CatalogManager, category: Category) -> ExitCode {
    match catalog.refresh(category).await {
        Ok(report) => {
            println!(
                "Loaded {} satellites into {} ({} skipped)",
                report.installed,
                report.category,
                report.skipped.len()
            );
            for skip in &report.skipped {
                println!("  line {}: {}", skip.line, skip.reason);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Refresh of {} failed: {}", category, e);
            ExitCode::FAILURE
        }
    }
}

async fn visible(
    catalog: &CatalogManager,
    category: Category,
    observer: ObserverLocation,
    min_elevation: f64,
    limit: Option<usize>,
) -> ExitCode {
    if let Err(e) = catalog.refresh(category).await {
        eprintln!("Refresh of {} failed: {}", category, e);
        return ExitCode::FAILURE;
    }
    // evaluated at the moment the elements are in hand, not before the fetch
    let query = VisibilityQuery::new(observer, chrono::Utc::now())
        .min_elevation(min_elevation)
        .limit(limit);
    let snapshot = match catalog.snapshot(Some(category)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match find_visible(&snapshot, &query, &CancelToken::new()) {
        Ok(report) => print_json(&report),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn print_track(
    catalog: &CatalogManager,
    category: Category,
    id: u32,
    duration: u32,
    interval: u32,
) -> ExitCode {
    if let Err(e) = catalog.refresh(category).await {
        eprintln!("Refresh of {} failed: {}", category, e);
        return ExitCode::FAILURE;
    }

    match track::sample(catalog, id, chrono::Utc::now(), duration, interval) {
        Ok(ground_track) => {
            let points: Vec<_> = ground_track.points().collect();
            print_json(&serde_json::json!({
                "catalog_id": ground_track.catalog_id(),
                "name": ground_track.name(),
                "color": ground_track.color(),
                "points": points,
            }))
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error encoding output: {}", e);
            ExitCode::FAILURE
        }
    }
}
