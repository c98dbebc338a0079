//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::picker::PickOutcome;
use crate::place::Place;

/// JSON formatter - outputs pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON output"
    }

    fn format(&self, outcome: &PickOutcome, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(outcome)?)
    }

    fn format_places(&self, places: &[Place], _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(places)?)
    }
}
