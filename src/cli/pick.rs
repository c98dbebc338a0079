//! Pick command handler
//!
//! Runs a `LocationPicker` in the terminal. Events are rendered to stderr,
//! lines typed on stdin become picker commands, and the confirmed place is
//! written to stdout in the chosen format.

use crate::cli::{emit_output, formatter, list_formats, LocationArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::fixed::FixedLocation;
use crate::geo::osm::OsmPlaces;
use crate::geo::{get_ip_locator, get_places_search, GeolocationSource};
use crate::picker::{LocationPicker, PickOutcome, PickerCommand, PickerEvent, PickerSettings};
use crate::place::{Place, PlaceId};
use crate::selection::Origin;
use clap::Args;
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

const HELP: &str = "\
Type to search, a number to pick from the list shown last.
  :ok      confirm the selection
  :pin     re-select the pinned place
  :clear   dismiss search results
  :refresh reload location and nearby places
  :quit    leave without picking";

/// Pick command arguments
#[derive(Args)]
pub struct PickArgs {
    #[command(flatten)]
    pub location: LocationArgs,

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

/// Run the pick command
pub async fn run(args: PickArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let formatter = formatter(args.format.clone(), &config)?;
    let places = Arc::new(get_places_search(&config));
    let settings = PickerSettings::from_config(&config);

    let outcome = if args.location.use_ip(&config) {
        session(places, get_ip_locator(), settings).await?
    } else {
        let center = args.location.resolve(&config, &places).await?.ok_or_else(|| {
            Error::Config("No location specified. Use --lat/--lng, --location, or --here".into())
        })?;
        session(places, FixedLocation::exact(center), settings).await?
    };

    if outcome.is_cancelled() {
        eprintln!("No place picked");
        std::process::exit(1);
    }

    let output = formatter.format(&outcome, &config)?;
    emit_output(&output, args.output.as_deref())
}

/// Drive one picker session from the terminal
async fn session<G>(places: Arc<OsmPlaces>, source: G, settings: PickerSettings) -> Result<PickOutcome>
where
    G: GeolocationSource + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, mut events) = mpsc::unbounded_channel();
    let picker = tokio::spawn(LocationPicker::new(places, source, settings, event_tx).run(command_rx));

    eprintln!("{}", HELP);
    let mut input = spawn_stdin_reader();
    let mut commands = Some(command_tx);
    let mut view = View::default();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    for line in view.apply(event) {
                        eprintln!("{}", line);
                    }
                }
                // The picker has finished
                None => break,
            },
            line = input.recv(), if commands.is_some() => match line {
                Some(line) => match view.parse(&line) {
                    Input::Command(command) => {
                        if let Some(tx) = &commands {
                            if tx.send(command).await.is_err() {
                                debug!("picker stopped accepting commands");
                            }
                        }
                    }
                    Input::Help => eprintln!("{}", HELP),
                    Input::Invalid(message) => eprintln!("{}", message),
                    Input::Empty => {}
                },
                // End of input closes the picker
                None => commands = None,
            },
        }
    }

    picker.await.map_err(std::io::Error::from).map_err(Error::from)
}

/// Read stdin lines on a plain thread so a pending read never holds up exit
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// One line of user input
#[derive(Debug, PartialEq)]
enum Input {
    Command(PickerCommand),
    Help,
    Invalid(String),
    Empty,
}

/// What the terminal currently shows
#[derive(Debug, Default)]
struct View {
    results: Vec<Place>,
    secondary: Vec<Place>,
    selection: Option<PlaceId>,
}

impl View {
    /// Record an event and return the lines to print for it
    fn apply(&mut self, event: PickerEvent) -> Vec<String> {
        match event {
            PickerEvent::ResultsChanged { places } => {
                self.results = places;
                if self.secondary.is_empty() {
                    self.list("Nearby places:", &self.results)
                } else {
                    Vec::new()
                }
            }
            PickerEvent::SecondaryResultsChanged { places } => {
                let had_results = !self.secondary.is_empty();
                self.secondary = places;
                if !self.secondary.is_empty() {
                    self.list("Search results:", &self.secondary)
                } else if had_results {
                    self.list("Nearby places:", &self.results)
                } else {
                    Vec::new()
                }
            }
            PickerEvent::SelectionChanged { place, annotation } => {
                self.selection = Some(place.id);
                match annotation.subtitle.filter(|s| !s.is_empty()) {
                    Some(subtitle) => vec![format!("Selected: {} ({})", annotation.title, subtitle)],
                    None => vec![format!("Selected: {}", annotation.title)],
                }
            }
            PickerEvent::CameraMoved { region } => vec![format!(
                "Map centered on ({:.5}, {:.5})",
                region.center.lat, region.center.lng
            )],
            PickerEvent::LocationFailed { message } => {
                vec![format!("Location unavailable: {}", message)]
            }
            PickerEvent::SearchFailed { message } => vec![format!("Search failed: {}", message)],
            PickerEvent::Dismiss { .. } | PickerEvent::Closed => Vec::new(),
        }
    }

    fn list(&self, heading: &str, places: &[Place]) -> Vec<String> {
        let mut lines = vec![heading.to_string()];
        if places.is_empty() {
            lines.push("  (none)".to_string());
        }
        for (i, place) in places.iter().enumerate() {
            let marker = if self.selection.as_ref() == Some(&place.id) {
                '*'
            } else {
                ' '
            };
            lines.push(format!("{}{:>3}. {}", marker, i + 1, place.title()));
        }
        lines
    }

    /// Turn a typed line into a picker command
    ///
    /// Numbers pick from the search results while they are shown, otherwise
    /// from the nearby list. Anything that is not a number or a `:` command is
    /// a search query.
    fn parse(&self, line: &str) -> Input {
        let line = line.trim();

        if line.is_empty() {
            return Input::Empty;
        }

        if let Some(command) = line.strip_prefix(':') {
            return match command {
                "ok" | "confirm" => Input::Command(PickerCommand::Confirm),
                "pin" => Input::Command(PickerCommand::TapMapAnnotation),
                "clear" => Input::Command(PickerCommand::QueryChanged {
                    text: String::new(),
                }),
                "r" | "refresh" => Input::Command(PickerCommand::Refresh),
                "q" | "quit" => Input::Command(PickerCommand::Close),
                "h" | "help" => Input::Help,
                _ => Input::Invalid(format!("Unknown command: :{}", command)),
            };
        }

        if let Ok(n) = line.parse::<usize>() {
            let (places, origin) = if self.secondary.is_empty() {
                (&self.results, Origin::Primary)
            } else {
                (&self.secondary, Origin::Secondary)
            };
            return match n.checked_sub(1).and_then(|i| places.get(i)) {
                Some(place) => Input::Command(PickerCommand::TapListItem {
                    id: place.id.clone(),
                    origin,
                }),
                None => Input::Invalid(format!("No place numbered {}", n)),
            };
        }

        Input::Command(PickerCommand::QueryChanged {
            text: line.to_string(),
        })
    }
}
