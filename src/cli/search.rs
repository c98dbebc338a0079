//! Search command handler
//!
//! Runs one text search and prints the ranked places.

use crate::cli::{emit_output, formatter, list_formats, LocationArgs};
use crate::config::Config;
use crate::error::Result;
use crate::geo::{get_places_search, PlacesSearch, SearchRequest};
use crate::place::Region;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Name or address to look for
    #[arg(required_unless_present = "list_formats")]
    pub query: Option<String>,

    /// Bias results to this location
    #[command(flatten)]
    pub location: LocationArgs,

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

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let formatter = formatter(args.format.clone(), &config)?;
    let places = get_places_search(&config);

    let span = config.picker.query_span_degrees;
    let region = args
        .location
        .resolve(&config, &places)
        .await?
        .map(|center| Region::with_span(center, span, span));

    let request = SearchRequest::Text {
        query: args.query.unwrap_or_default(),
        region,
        limit: args.limit.unwrap_or(config.search.query_limit),
    };
    let results = places.search(&request).await?;

    let output = formatter.format_places(&results, &config)?;
    emit_output(&output, args.output.as_deref())
}
