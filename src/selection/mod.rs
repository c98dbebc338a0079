//! Place selection and list ordering
//!
//! `SelectionCoordinator` owns the displayed result list and the current
//! selection. Its mutators are the only way either changes:
//! - `replace_results` swaps in a fresh result set
//! - `select` records a pick and reorders the list most-recent-first
//! - `confirm` hands the final choice to the caller, once
//!
//! All operations are total; the coordinator never fails.

pub mod list;

pub use list::ResultList;

use crate::constants::picker::MAX_RESULTS;
use crate::place::Place;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which displayed list a pick came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The main list of nearby places
    Primary,
    /// The search-results list shown while typing a query
    Secondary,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

impl std::str::FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primary" | "p" => Ok(Self::Primary),
            "secondary" | "s" => Ok(Self::Secondary),
            _ => Err(format!("Unknown origin: {}", s)),
        }
    }
}

/// Outcome of a `select` call, for driving highlight, camera and list refresh
#[derive(Debug, Clone)]
pub struct SelectionChange {
    pub selection: Place,
    pub results: Vec<Place>,
    /// Whether the list order changed
    pub reordered: bool,
}

/// Coordinates user picks into one canonical selection
#[derive(Debug, Clone)]
pub struct SelectionCoordinator {
    results: ResultList,
    selection: Option<Place>,
    confirmed: bool,
}

impl SelectionCoordinator {
    /// Create a coordinator with the default result cap
    pub fn new() -> Self {
        Self::with_max_results(MAX_RESULTS)
    }

    /// Create a coordinator whose result list holds at most `max_results`
    pub fn with_max_results(max_results: usize) -> Self {
        Self {
            results: ResultList::new(max_results),
            selection: None,
            confirmed: false,
        }
    }

    /// Discard the current results and store `places` in order
    ///
    /// The selection is left untouched even if it is not in the new list.
    pub fn replace_results(&mut self, places: Vec<Place>) {
        let dropped = self.results.replace(places);
        if dropped > 0 {
            debug!(dropped, "dropped duplicate places from result set");
        }
        debug!(count = self.results.len(), "result list replaced");
    }

    /// Make `place` the current selection and reorder the list
    ///
    /// Secondary picks are inserted at the front (replacing any entry with the
    /// same identity). Primary picks move the matching entry to the front, or
    /// leave the order alone when there is no match.
    pub fn select(&mut self, place: Place, origin: Origin) -> SelectionChange {
        let before = self.results.ids().into_iter().cloned().collect::<Vec<_>>();

        match origin {
            Origin::Secondary => self.results.insert_front(place.clone()),
            Origin::Primary => {
                if !self.results.move_to_front(&place.id) {
                    debug!(id = %place.id, "primary pick not in result list");
                }
            }
        }

        let reordered = self
            .results
            .iter()
            .map(|p| &p.id)
            .ne(before.iter());

        debug!(id = %place.id, %origin, reordered, "selection changed");
        self.selection = Some(place.clone());

        SelectionChange {
            selection: place,
            results: self.results.to_vec(),
            reordered,
        }
    }

    /// Hand the current selection to the caller
    ///
    /// Returns `Some` exactly once per coordinator, and only when there is a
    /// selection.
    pub fn confirm(&mut self) -> Option<Place> {
        if self.confirmed {
            return None;
        }
        let place = self.selection.clone()?;
        self.confirmed = true;
        Some(place)
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn current_selection(&self) -> Option<&Place> {
        self.selection.as_ref()
    }

    pub fn current_results(&self) -> &ResultList {
        &self.results
    }
}

impl Default for SelectionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
