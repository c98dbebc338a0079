//! Output formatters
//!
//! Provides trait-based output formatting for picks and place lists.

pub mod gpx;
pub mod json;
pub mod text;
pub mod url;

use crate::config::Config;
use crate::error::Result;
use crate::picker::PickOutcome;
use crate::place::Place;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format the result of a picker session
    ///
    /// # Arguments
    /// * `outcome` - The confirmed place, or a cancelled outcome
    /// * `config` - Application config (for url providers, etc.)
    fn format(&self, outcome: &PickOutcome, config: &Config) -> Result<String>;

    /// Format a ranked list of places, as returned by a search
    fn format_places(&self, places: &[Place], config: &Config) -> Result<String>;
}

/// Names accepted by `get_formatter`, in listing order
pub const FORMAT_NAMES: [&str; 4] = ["text", "json", "gpx", "url"];

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        "url" => Some(Box::new(url::UrlFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    FORMAT_NAMES
        .iter()
        .filter_map(|name| get_formatter(name))
        .map(|f| FormatInfo {
            name: f.name().to_string(),
            description: f.description().to_string(),
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_places() -> Vec<Place> {
    use crate::place::Coordinates;

    vec![
        Place::new(
            "node/1",
            "Café Nero",
            Coordinates::new(51.5074, -0.1278),
            "Strand 1, London",
        ),
        Place::new("way/2", "", Coordinates::new(51.5080, -0.1281), "Strand, London"),
    ]
}
