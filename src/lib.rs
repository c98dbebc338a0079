//! place-picker: pick a place from a live list of nearby places
//!
//! A library and CLI tool built around a location-picker screen controller.
//!
//! ## Features
//!
//! - Nearby points of interest around the user's location (Overpass)
//! - Free-text place search biased to the current area (Nominatim)
//! - Most-recent-first result list with a single canonical selection
//! - Last-request-wins search handling: superseded results are never shown
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use place_picker::place::{Coordinates, Place};
//! use place_picker::selection::{Origin, SelectionCoordinator};
//!
//! let mut coordinator = SelectionCoordinator::new();
//! coordinator.replace_results(vec![
//!     Place::new("node/1", "Bakery", Coordinates::new(48.85, 2.35), "Rue A"),
//!     Place::new("node/2", "Library", Coordinates::new(48.86, 2.34), "Rue B"),
//! ]);
//!
//! let library = coordinator.current_results().as_slice()[1].clone();
//! let change = coordinator.select(library, Origin::Primary);
//! assert_eq!(change.results[0].name, "Library");
//!
//! let confirmed = coordinator.confirm().unwrap();
//! println!("Picked: {}", confirmed.title());
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod geo;
pub mod picker;
pub mod place;
pub mod search;
pub mod selection;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use picker::{LocationPicker, PickOutcome, PickerCommand, PickerEvent, PickerSettings};
pub use place::{Coordinates, Place, PlaceId, Region};
pub use selection::{Origin, SelectionCoordinator};
