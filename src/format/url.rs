//! URL output formatter

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::OutputFormatter;
use crate::picker::PickOutcome;
use crate::place::Place;

/// URL formatter - outputs a map URL per place
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URL for one place with optional provider override
    pub fn format_with_provider(
        &self,
        place: &Place,
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        config.format_url(
            provider,
            place.coordinate.lat,
            place.coordinate.lng,
            place.title(),
        )
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL for each place"
    }

    fn format(&self, outcome: &PickOutcome, config: &Config) -> Result<String> {
        match &outcome.place {
            Some(place) => self.format_with_provider(place, config, None),
            None => Err(Error::Config("No place picked".to_string())),
        }
    }

    fn format_places(&self, places: &[Place], config: &Config) -> Result<String> {
        let urls = places
            .iter()
            .map(|p| self.format_with_provider(p, config, None))
            .collect::<Result<Vec<_>>>()?;
        Ok(urls.join("\n"))
    }
}
