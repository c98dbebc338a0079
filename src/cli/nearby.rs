//! Nearby command handler
//!
//! Lists points of interest around a location, nearest first.

use crate::cli::{emit_output, formatter, list_formats, LocationArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::{get_places_search, PlacesSearch, SearchRequest};
use crate::place::Region;
use clap::Args;

/// Nearby command arguments
#[derive(Args)]
pub struct NearbyArgs {
    #[command(flatten)]
    pub location: LocationArgs,

    /// Region size in meters
    #[arg(long, short = 'r')]
    pub radius: Option<f64>,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the nearby command
pub async fn run(args: NearbyArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let formatter = formatter(args.format.clone(), &config)?;
    let places = get_places_search(&config);

    let center = args.location.resolve(&config, &places).await?.ok_or_else(|| {
        Error::Config("No location specified. Use --lat/--lng, --location, or --here".into())
    })?;

    let radius = args.radius.unwrap_or(config.picker.nearby_radius_meters);
    if !(radius.is_finite() && radius > 0.0) {
        return Err(Error::Config(format!("Radius must be positive: {}", radius)));
    }

    let request = SearchRequest::Nearby {
        region: Region::around(center, radius),
        limit: args.limit.unwrap_or(config.search.nearby_limit),
    };
    let results = places.search(&request).await?;

    let output = formatter.format_places(&results, &config)?;
    emit_output(&output, args.output.as_deref())
}
