//! Location picker screen controller
//!
//! `LocationPicker` owns a `SelectionCoordinator` and drives it from three
//! asynchronous inputs: presentation commands, location events and search
//! completions. All of them are multiplexed onto the single task running
//! `LocationPicker::run`, so the coordinator is only ever mutated from one
//! control flow. Changes are reported on an event channel.

pub mod event;

pub use event::{PickOutcome, PickerCommand, PickerEvent};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::{GeolocationSource, LocationEvent, LocationUpdate, PlacesSearch, SearchRequest};
use crate::place::{Place, PlaceId, Region};
use crate::search::SearchSlot;
use crate::selection::{Origin, SelectionCoordinator};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Location events buffered between a source and the picker
const LOCATION_CHANNEL_CAPACITY: usize = 16;

/// Tuning for one picker session
#[derive(Debug, Clone, PartialEq)]
pub struct PickerSettings {
    pub max_results: usize,
    pub nearby_radius_meters: f64,
    pub desired_accuracy_meters: f64,
    pub min_query_len: usize,
    pub query_span_degrees: f64,
    pub nearby_limit: usize,
    pub query_limit: usize,
}

impl PickerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_results: config.picker.max_results,
            nearby_radius_meters: config.picker.nearby_radius_meters,
            desired_accuracy_meters: config.picker.desired_accuracy_meters,
            min_query_len: config.picker.min_query_len,
            query_span_degrees: config.picker.query_span_degrees,
            nearby_limit: config.search.nearby_limit,
            query_limit: config.search.query_limit,
        }
    }
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

enum Step {
    Command(Option<PickerCommand>),
    Location(LocationEvent),
    Nearby(Result<Vec<Place>>),
    Query(Result<Vec<Place>>),
}

/// The location picker
pub struct LocationPicker<S, G> {
    settings: PickerSettings,
    coordinator: SelectionCoordinator,
    /// Search results shown while the user types a query
    secondary: Vec<Place>,
    last_location: Option<LocationUpdate>,
    /// Set once a fix is accurate enough; later updates are ignored
    located: bool,
    centered: bool,
    search: Arc<S>,
    source: G,
    nearby: SearchSlot,
    query: SearchSlot,
    location_tx: mpsc::Sender<LocationEvent>,
    location_rx: mpsc::Receiver<LocationEvent>,
    events: mpsc::UnboundedSender<PickerEvent>,
}

impl<S, G> LocationPicker<S, G>
where
    S: PlacesSearch + 'static,
    G: GeolocationSource,
{
    pub fn new(
        search: Arc<S>,
        source: G,
        settings: PickerSettings,
        events: mpsc::UnboundedSender<PickerEvent>,
    ) -> Self {
        let (location_tx, location_rx) = mpsc::channel(LOCATION_CHANNEL_CAPACITY);

        Self {
            coordinator: SelectionCoordinator::with_max_results(settings.max_results),
            settings,
            secondary: Vec::new(),
            last_location: None,
            located: false,
            centered: false,
            search,
            source,
            nearby: SearchSlot::new("nearby"),
            query: SearchSlot::new("query"),
            location_tx,
            location_rx,
            events,
        }
    }

    pub fn coordinator(&self) -> &SelectionCoordinator {
        &self.coordinator
    }

    /// Run until the user confirms, closes, or drops the command channel
    pub async fn run(mut self, mut commands: mpsc::Receiver<PickerCommand>) -> PickOutcome {
        info!("location picker started");
        self.source.start(self.location_tx.clone());

        loop {
            let step = tokio::select! {
                command = commands.recv() => Step::Command(command),
                Some(event) = self.location_rx.recv() => Step::Location(event),
                result = self.nearby.completed() => Step::Nearby(result),
                result = self.query.completed() => Step::Query(result),
            };

            match step {
                Step::Command(Some(command)) => {
                    if let Some(outcome) = self.handle_command(command) {
                        return outcome;
                    }
                }
                Step::Command(None) => {
                    debug!("command channel closed");
                    return self.shutdown(PickOutcome::cancelled());
                }
                Step::Location(event) => self.handle_location(event),
                Step::Nearby(result) => self.handle_nearby_results(result),
                Step::Query(result) => self.handle_query_results(result),
            }
        }
    }

    fn emit(&self, event: PickerEvent) {
        if self.events.send(event).is_err() {
            debug!("event receiver dropped");
        }
    }

    fn handle_command(&mut self, command: PickerCommand) -> Option<PickOutcome> {
        debug!(?command, "command");

        match command {
            PickerCommand::TapListItem { id, origin } => self.tap_list_item(&id, origin),
            PickerCommand::TapMapAnnotation => {
                if let Some(place) = self.coordinator.current_selection().cloned() {
                    self.select(place, Origin::Primary);
                }
            }
            PickerCommand::QueryChanged { text } => self.query_changed(&text),
            PickerCommand::Confirm => match self.coordinator.confirm() {
                Some(place) => {
                    info!(id = %place.id, name = %place.name, "selection confirmed");
                    let outcome = PickOutcome::picked(place);
                    self.emit(PickerEvent::Dismiss {
                        outcome: outcome.clone(),
                    });
                    return Some(self.shutdown(outcome));
                }
                None => debug!("confirm ignored without a selection"),
            },
            PickerCommand::Refresh => self.refresh(),
            PickerCommand::Close => {
                self.emit(PickerEvent::Closed);
                return Some(self.shutdown(PickOutcome::cancelled()));
            }
        }

        None
    }

    fn tap_list_item(&mut self, id: &PlaceId, origin: Origin) {
        let place = match origin {
            Origin::Primary => self.coordinator.current_results().get(id).cloned(),
            Origin::Secondary => self.secondary.iter().find(|p| &p.id == id).cloned(),
        };

        let Some(place) = place else {
            warn!(%id, %origin, "tapped place is not in the list");
            return;
        };

        if origin == Origin::Secondary {
            self.clear_secondary();
        }
        self.select(place, origin);
    }

    fn select(&mut self, place: Place, origin: Origin) {
        let change = self.coordinator.select(place, origin);
        let region = Region::around(
            change.selection.coordinate,
            self.settings.nearby_radius_meters,
        );

        self.emit(PickerEvent::SelectionChanged {
            annotation: change.selection.annotation(),
            place: change.selection,
        });
        self.emit(PickerEvent::CameraMoved { region });
        self.emit(PickerEvent::ResultsChanged {
            places: change.results,
        });
    }

    fn query_changed(&mut self, text: &str) {
        let query = text.trim();

        if query.is_empty() {
            self.clear_secondary();
            return;
        }

        if query.chars().count() < self.settings.min_query_len {
            debug!(query, "query too short");
            return;
        }

        let span = self.settings.query_span_degrees;
        let region = self
            .last_location
            .map(|l| Region::with_span(l.coordinate, span, span));

        self.query.issue(
            &self.search,
            SearchRequest::Text {
                query: query.to_string(),
                region,
                limit: self.settings.query_limit,
            },
        );
    }

    /// Dismiss the search-results list
    fn clear_secondary(&mut self) {
        self.query.cancel();
        self.secondary.clear();
        self.emit(PickerEvent::SecondaryResultsChanged { places: Vec::new() });
    }

    fn refresh(&mut self) {
        info!("refreshing location and results");
        self.clear_secondary();
        self.nearby.cancel();
        self.source.stop();

        self.coordinator.replace_results(Vec::new());
        self.emit(PickerEvent::ResultsChanged { places: Vec::new() });

        self.located = false;
        self.source.start(self.location_tx.clone());
    }

    fn handle_location(&mut self, event: LocationEvent) {
        match event {
            LocationEvent::Update(update) => {
                if self.located {
                    debug!("location update ignored after accurate fix");
                    return;
                }
                debug!(
                    lat = update.coordinate.lat,
                    lng = update.coordinate.lng,
                    accuracy = update.accuracy_meters,
                    "location update"
                );
                self.last_location = Some(update);

                if update.accuracy_meters < self.settings.desired_accuracy_meters {
                    self.located = true;
                    self.source.stop();
                }

                let region = Region::around(update.coordinate, self.settings.nearby_radius_meters);

                if !self.centered {
                    self.centered = true;
                    self.emit(PickerEvent::CameraMoved { region });
                }

                self.nearby.issue(
                    &self.search,
                    SearchRequest::Nearby {
                        region,
                        limit: self.settings.nearby_limit,
                    },
                );
            }
            LocationEvent::Failure(e) => {
                warn!("location failed: {}", e);
                self.emit(PickerEvent::LocationFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    fn handle_nearby_results(&mut self, result: Result<Vec<Place>>) {
        match result {
            Ok(places) => {
                self.coordinator.replace_results(places);
                self.emit(PickerEvent::ResultsChanged {
                    places: self.coordinator.current_results().to_vec(),
                });
            }
            Err(e) => self.report_search_error(e),
        }
    }

    fn handle_query_results(&mut self, result: Result<Vec<Place>>) {
        match result {
            Ok(places) => {
                debug!(count = places.len(), "query results");
                self.secondary = places;
                self.emit(PickerEvent::SecondaryResultsChanged {
                    places: self.secondary.clone(),
                });
            }
            Err(e) => self.report_search_error(e),
        }
    }

    /// Superseded searches never get here; their results are dropped with
    /// the slot's receiver
    fn report_search_error(&self, e: Error) {
        warn!("search failed: {}", e);
        self.emit(PickerEvent::SearchFailed {
            message: e.to_string(),
        });
    }

    fn shutdown(&mut self, outcome: PickOutcome) -> PickOutcome {
        self.source.stop();
        self.nearby.cancel();
        self.query.cancel();
        info!(cancelled = outcome.is_cancelled(), "location picker finished");
        outcome
    }
}
