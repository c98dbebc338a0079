//! GPX output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::picker::PickOutcome;
use crate::place::Place;

/// GPX formatter - outputs GPX waypoint file
pub struct GpxFormatter;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_waypoint(gpx: &mut String, place: &Place) {
    gpx.push_str(&format!(
        r#"  <wpt lat="{}" lon="{}">"#,
        place.coordinate.lat, place.coordinate.lng
    ));
    gpx.push('\n');
    gpx.push_str(&format!("    <name>{}</name>\n", escape(place.title())));
    if !place.name.is_empty() && !place.address.is_empty() {
        gpx.push_str(&format!("    <desc>{}</desc>\n", escape(&place.address)));
    }
    gpx.push_str("  </wpt>\n");
}

fn document(name: &str, time: Option<String>, places: &[Place]) -> String {
    let mut gpx = String::new();

    gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    gpx.push('\n');
    gpx.push_str(r#"<gpx version="1.1" creator="place-picker">"#);
    gpx.push('\n');

    gpx.push_str("  <metadata>\n");
    gpx.push_str(&format!("    <name>{}</name>\n", escape(name)));
    if let Some(time) = time {
        gpx.push_str(&format!("    <time>{}</time>\n", time));
    }
    gpx.push_str("  </metadata>\n");

    for place in places {
        push_waypoint(&mut gpx, place);
    }

    gpx.push_str("</gpx>\n");
    gpx
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoint file"
    }

    fn format(&self, outcome: &PickOutcome, _config: &Config) -> Result<String> {
        let places: Vec<Place> = outcome.place.iter().cloned().collect();
        Ok(document(
            "place-picker pick",
            Some(outcome.picked_at.to_rfc3339()),
            &places,
        ))
    }

    fn format_places(&self, places: &[Place], _config: &Config) -> Result<String> {
        Ok(document("place-picker search", None, places))
    }
}
