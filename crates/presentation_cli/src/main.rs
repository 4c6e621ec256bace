//! LogiRoute CLI
//!
//! Command-line front end for routing, tour sequencing, network optimization
//! and geocoding. Every command prints pretty JSON on stdout; logs go to
//! stderr.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use anyhow::Context;
use application::{ParsedInput, parse_input};
use clap::{Parser, Subcommand};
use domain::{GeoPoint, OptimizationObjective, RoutePreference, TransportMode};
use infrastructure::{AppConfig, NetworkFile, Services, init_logging, load_network, save_network};
use serde::Serialize;
use tracing::info;

/// LogiRoute CLI
#[derive(Parser)]
#[command(name = "logiroute")]
#[command(author, version, about = "Multi-modal logistics routing and optimization", long_about = None)]
struct Cli {
    /// Verbosity level (overrides the configured log filter)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ./logiroute.toml if present)
    #[arg(short, long, global = true, env = "LOGIROUTE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a costed route between two points
    ///
    /// Example: logiroute route "12.9767,77.5713" "12.9698,77.75" --mode lcv
    Route {
        /// Start as "lat,lng"
        #[arg(value_parser = parse_point, allow_hyphen_values = true)]
        start: GeoPoint,

        /// End as "lat,lng"
        #[arg(value_parser = parse_point, allow_hyphen_values = true)]
        end: GeoPoint,

        /// Vehicle class (hgv, lcv, bicycle, walking)
        #[arg(short, long, default_value = "hgv")]
        mode: TransportMode,

        /// Backend route profile (fastest, shortest, recommended)
        #[arg(short, long, default_value = "recommended")]
        preference: RoutePreference,
    },

    /// Order stops into a nearest-neighbor tour starting at the first stop
    Tour {
        /// Stops as "lat,lng"
        #[arg(required = true, value_parser = parse_point, allow_hyphen_values = true)]
        stops: Vec<GeoPoint>,

        /// Vehicle class used for time and cost totals
        #[arg(short, long, default_value = "hgv")]
        mode: TransportMode,
    },

    /// Recommend a transport mode for every edge of a network file
    ///
    /// Example: logiroute optimize network.json --objective balanced --apply optimized.json
    Optimize {
        /// Network file (.json or .toml) with nodes and edges
        network: PathBuf,

        /// Optimization goal (cost, time, distance, balanced)
        #[arg(short, long, default_value = "balanced")]
        objective: OptimizationObjective,

        /// Apply the recommendations and write the updated network here
        #[arg(long)]
        apply: Option<PathBuf>,
    },

    /// Resolve free text into places
    Geocode {
        /// Address, landmark or postal code
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u8>,

        /// Include matches outside the operating region
        #[arg(long)]
        unbounded: bool,
    },

    /// Resolve a coordinate into an address
    Reverse {
        /// Latitude
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Longitude
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },

    /// Suggestions for partially typed input
    Suggest {
        /// Typed text
        text: String,
    },

    /// Classify input as coordinates, postal code or address
    Parse {
        /// Typed text
        text: String,
    },

    /// Check whether a coordinate lies in the operating region
    InRegion {
        /// Latitude
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Longitude
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },

    /// List transport modes with their cost and speed profiles
    Modes,

    /// Probe the routing and geocoding backends
    Status,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Parse "lat,lng" (comma or whitespace separated) into a validated point
fn parse_point(s: &str) -> Result<GeoPoint, String> {
    match parse_input(s) {
        ParsedInput::Coordinates(point) => Ok(point),
        _ => Err(format!(
            "expected \"lat,lng\" with latitude in [-90, 90] and longitude in [-180, 180], got {s:?}"
        )),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct TourOutput {
    #[serde(flatten)]
    plan: application::TourPlan,
    stops: Vec<GeoPoint>,
}

#[derive(Serialize)]
struct ModeOutput<'a> {
    mode: TransportMode,
    #[serde(flatten)]
    profile: &'a domain::TransportModeConfig,
}

#[derive(Serialize)]
struct StatusOutput {
    routing: bool,
    geocoding: bool,
}

#[derive(Serialize)]
struct RegionOutput {
    lat: f64,
    lng: f64,
    within_region: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    let mut logging = config.logging.clone();
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        logging.filter = filter.to_string();
    }
    init_logging(&logging)?;

    let services = Services::from_config(&config)?;

    match cli.command {
        Commands::Route {
            start,
            end,
            mode,
            preference,
        } => {
            let outcome = services
                .routes
                .calculate_route(start, end, mode, preference)
                .await;
            print_json(&outcome)?;
        },

        Commands::Tour { stops, mode } => {
            let plan = services.tours.optimize_route(&stops, mode);
            let ordered = plan.order.iter().map(|&i| stops[i]).collect();
            print_json(&TourOutput {
                plan,
                stops: ordered,
            })?;
        },

        Commands::Optimize {
            network,
            objective,
            apply,
        } => {
            let NetworkFile { nodes, edges } = load_network(&network)
                .with_context(|| format!("failed to load network {}", network.display()))?;

            let report = services
                .optimizer
                .optimize_transport_modes(&edges, &nodes, objective)
                .await;

            if let Some(output) = apply {
                let edges = services
                    .optimizer
                    .apply_optimization(&report.recommendations, &edges, &nodes)
                    .await;
                save_network(&output, &NetworkFile { nodes, edges })
                    .with_context(|| format!("failed to write network {}", output.display()))?;
                info!(path = %output.display(), "Optimized network written");
            }

            print_json(&report)?;
        },

        Commands::Geocode {
            query,
            limit,
            unbounded,
        } => {
            let mut options = services.geocoder.default_options();
            if let Some(limit) = limit {
                options = options.with_limit(limit);
            }
            options.bounded = !unbounded;
            print_json(&services.geocoder.geocode(&query, options).await)?;
        },

        Commands::Reverse { lat, lng } => {
            print_json(&services.geocoder.reverse_geocode(lat, lng).await)?;
        },

        Commands::Suggest { text } => {
            print_json(&services.geocoder.get_suggestions(&text).await)?;
        },

        Commands::Parse { text } => {
            print_json(&parse_input(&text))?;
        },

        Commands::InRegion { lat, lng } => {
            print_json(&RegionOutput {
                lat,
                lng,
                within_region: services.geocoder.is_within_region(lat, lng),
            })?;
        },

        Commands::Modes => {
            let modes: Vec<ModeOutput<'_>> = services
                .routes
                .registry()
                .iter()
                .map(|(mode, profile)| ModeOutput { mode, profile })
                .collect();
            print_json(&modes)?;
        },

        Commands::Status => {
            let (routing, geocoding) =
                tokio::join!(services.routing_available(), services.geocoding_available());
            print_json(&StatusOutput { routing, geocoding })?;
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_filter_verbosity() {
        assert_eq!(log_filter_from_verbosity(0), None);
        assert_eq!(log_filter_from_verbosity(1), Some("info"));
        assert_eq!(log_filter_from_verbosity(2), Some("debug"));
        assert_eq!(log_filter_from_verbosity(10), Some("trace"));
    }

    #[test]
    fn parse_point_accepts_comma_and_space() {
        let point = parse_point("12.9716, 77.5946").unwrap();
        assert!((point.lat() - 12.9716).abs() < f64::EPSILON);
        assert!(parse_point("-33.86 151.21").is_ok());
    }

    #[test]
    fn parse_point_rejects_out_of_range_and_text() {
        assert!(parse_point("95.0,10.0").is_err());
        assert!(parse_point("MG Road").is_err());
    }

    #[test]
    fn route_command_parses_aliases() {
        let cli = Cli::try_parse_from([
            "logiroute",
            "route",
            "12.9767,77.5713",
            "12.9698,77.75",
            "--mode",
            "bike",
            "--preference",
            "shortest",
        ])
        .unwrap();
        let Commands::Route {
            mode, preference, ..
        } = cli.command
        else {
            panic!("expected route command");
        };
        assert_eq!(mode, TransportMode::Bicycle);
        assert_eq!(preference, RoutePreference::Shortest);
    }

    #[test]
    fn optimize_command_defaults_to_balanced() {
        let cli = Cli::try_parse_from(["logiroute", "optimize", "network.json"]).unwrap();
        let Commands::Optimize {
            objective, apply, ..
        } = cli.command
        else {
            panic!("expected optimize command");
        };
        assert_eq!(objective, OptimizationObjective::Balanced);
        assert!(apply.is_none());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let result = Cli::try_parse_from([
            "logiroute", "tour", "12.9,77.5", "13.0,77.6", "--mode", "zeppelin",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn reverse_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["logiroute", "reverse", "-33.86", "151.21"]).unwrap();
        assert!(matches!(cli.command, Commands::Reverse { lat, .. } if lat < 0.0));
    }
}
