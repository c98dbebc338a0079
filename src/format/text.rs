//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::picker::PickOutcome;
use crate::place::Place;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

fn place_line(place: &Place) -> String {
    let mut line = format!(
        "{} ({:.6}, {:.6})",
        place.title(),
        place.coordinate.lat,
        place.coordinate.lng
    );
    if !place.name.is_empty() && !place.address.is_empty() {
        line.push_str(&format!(" - {}", place.address));
    }
    line
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, outcome: &PickOutcome, _config: &Config) -> Result<String> {
        let Some(place) = &outcome.place else {
            return Ok("No place picked\n".to_string());
        };

        let mut output = String::new();
        output.push_str(&format!("Picked: {}\n", place.title()));
        if !place.name.is_empty() && !place.address.is_empty() {
            output.push_str(&format!("Address: {}\n", place.address));
        }
        output.push_str(&format!(
            "Location: ({:.6}, {:.6})\n",
            place.coordinate.lat, place.coordinate.lng
        ));
        output.push_str(&format!("Id: {}\n", place.id));
        output.push_str(&format!("At: {}\n", outcome.picked_at.to_rfc3339()));

        Ok(output)
    }

    fn format_places(&self, places: &[Place], _config: &Config) -> Result<String> {
        if places.is_empty() {
            return Ok("No places found\n".to_string());
        }

        let mut output = String::new();
        for (i, place) in places.iter().enumerate() {
            output.push_str(&format!("{:>3}. {}\n", i + 1, place_line(place)));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::sample_places;

    #[test]
    fn test_text_format() {
        let outcome = PickOutcome::picked(sample_places().remove(0));
        let output = TextFormatter.format(&outcome, &Config::default()).unwrap();

        assert!(output.contains("Picked: Café Nero"));
        assert!(output.contains("Address: Strand 1, London"));
        assert!(output.contains("(51.507400, -0.127800)"));
        assert!(output.contains("Id: node/1"));
    }

    #[test]
    fn test_text_unnamed_place_uses_address() {
        let outcome = PickOutcome::picked(sample_places().remove(1));
        let output = TextFormatter.format(&outcome, &Config::default()).unwrap();

        assert!(output.contains("Picked: Strand, London"));
        assert!(!output.contains("Address:"));
    }

    #[test]
    fn test_text_cancelled() {
        let output = TextFormatter
            .format(&PickOutcome::cancelled(), &Config::default())
            .unwrap();
        assert_eq!(output, "No place picked\n");
    }

    #[test]
    fn test_text_places() {
        let config = Config::default();
        let output = TextFormatter.format_places(&sample_places(), &config).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. Café Nero"));
        assert!(lines[1].starts_with("  2. Strand, London"));

        let empty = TextFormatter.format_places(&[], &config).unwrap();
        assert_eq!(empty, "No places found\n");
    }
}
