//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod nearby;
pub mod pick;
pub mod search;
pub mod serve;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::ip_location::IpLocator;
use crate::geo::osm::OsmPlaces;
use crate::place::Coordinates;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Pick a place near you from a live list of nearby places
#[derive(Parser)]
#[command(name = "place-picker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactively pick a place
    Pick(pick::PickArgs),

    /// Search places by name or address
    Search(search::SearchArgs),

    /// List places around a location
    Nearby(nearby::NearbyArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Where to center a command
#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// Latitude
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Named location (geocoded)
    #[arg(long, conflicts_with_all = ["lat", "lng", "here"])]
    pub location: Option<String>,

    /// Use current location (IP geolocation)
    #[arg(long, conflicts_with_all = ["lat", "lng", "location"])]
    pub here: bool,
}

impl LocationArgs {
    /// Whether IP geolocation should supply the location
    pub fn use_ip(&self, config: &Config) -> bool {
        self.here || (self.is_empty() && config.location.default_here)
    }

    fn is_empty(&self) -> bool {
        self.lat.is_none() && self.lng.is_none() && self.location.is_none() && !self.here
    }

    /// Resolve to a coordinate, or `None` when no location was given
    pub async fn resolve(&self, config: &Config, places: &OsmPlaces) -> Result<Option<Coordinates>> {
        let center = if self.use_ip(config) {
            let location = IpLocator::new().locate().await?;
            eprintln!("Using IP location: {}", location.display_name);
            location.coordinate
        } else if let Some(query) = &self.location {
            match places.text().geocode(query).await? {
                Some(place) => {
                    eprintln!("Geocoded to: {}", place.title());
                    place.coordinate
                }
                None => {
                    return Err(Error::LocationUnavailable(format!(
                        "could not geocode '{}'",
                        query
                    )))
                }
            }
        } else if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            Coordinates::new(lat, lng)
        } else {
            return Ok(None);
        };

        center.validate()?;
        Ok(Some(center))
    }
}

/// Initialize logging on stderr, `info` unless RUST_LOG says otherwise
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Pick(args) => pick::run(args).await,
        Commands::Search(args) => search::run(args).await,
        Commands::Nearby(args) => nearby::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Write command output to a file or stdout
pub(crate) fn emit_output(output: &str, path: Option<&str>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, output)?;
            eprintln!("Output written to {}", path);
        }
        None => println!("{}", output.trim_end()),
    }
    Ok(())
}

/// Look up a formatter by name, falling back to the configured default
pub(crate) fn formatter(
    name: Option<String>,
    config: &Config,
) -> Result<Box<dyn crate::format::OutputFormatter>> {
    let name = name.unwrap_or_else(|| config.output.format.clone());
    crate::format::get_formatter(&name)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", name)))
}

/// Print available output formats
pub(crate) fn list_formats() {
    println!("Available output formats:");
    for format in crate::format::available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_pick_with_coordinates() {
        let cli = Cli::try_parse_from(["place-picker", "pick", "--lat", "51.5", "--lng", "-0.12"])
            .unwrap();
        match cli.command {
            Commands::Pick(args) => {
                assert_eq!(args.location.lat, Some(51.5));
                assert_eq!(args.location.lng, Some(-0.12));
            }
            _ => panic!("expected pick"),
        }
    }

    #[test]
    fn test_cli_rejects_conflicting_locations() {
        let result =
            Cli::try_parse_from(["place-picker", "nearby", "--here", "--location", "Paris"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_use_ip() {
        let mut config = Config::default();
        let args = LocationArgs::default();
        assert!(!args.use_ip(&config));

        config.location.default_here = true;
        assert!(args.use_ip(&config));

        let explicit = LocationArgs {
            lat: Some(1.0),
            lng: Some(2.0),
            ..Default::default()
        };
        assert!(!explicit.use_ip(&config));
    }

    #[test]
    fn test_unknown_format() {
        let config = Config::default();
        assert!(formatter(Some("csv".to_string()), &config).is_err());
        assert_eq!(formatter(None, &config).unwrap().name(), "text");
    }
}
