//! Messages between the picker and its presentation layer

use crate::place::{Annotation, Place, PlaceId, Region};
use crate::selection::Origin;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User intent forwarded by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PickerCommand {
    /// A row in one of the two lists was tapped
    TapListItem { id: PlaceId, origin: Origin },
    /// The pin for the current selection was tapped
    TapMapAnnotation,
    /// The search field text changed
    QueryChanged { text: String },
    /// The user accepted the current selection
    Confirm,
    /// Discard results and re-acquire the location
    Refresh,
    /// Leave without choosing
    Close,
}

/// State changes the presentation layer should render
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PickerEvent {
    /// The main list, in display order
    ResultsChanged { places: Vec<Place> },
    /// The search-results list, in display order
    SecondaryResultsChanged { places: Vec<Place> },
    SelectionChanged { place: Place, annotation: Annotation },
    CameraMoved { region: Region },
    LocationFailed { message: String },
    SearchFailed { message: String },
    /// Fired once, when the user confirms a selection
    Dismiss { outcome: PickOutcome },
    /// The user left without choosing
    Closed,
}

/// What the picker hands back to its caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickOutcome {
    /// The confirmed place, or `None` if the picker was closed
    pub place: Option<Place>,
    pub picked_at: DateTime<Utc>,
}

impl PickOutcome {
    pub fn picked(place: Place) -> Self {
        Self {
            place: Some(place),
            picked_at: Utc::now(),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            place: None,
            picked_at: Utc::now(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.place.is_none()
    }
}
