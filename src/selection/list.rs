//! Ordered, duplicate-free result list
//!
//! Display order is recency/priority order: index 0 is shown first.

use crate::place::{Place, PlaceId};
use std::collections::HashSet;

/// An ordered sequence of places with unique identities and a length cap
#[derive(Debug, Clone)]
pub struct ResultList {
    max_len: usize,
    places: Vec<Place>,
}

impl ResultList {
    /// Create an empty list holding at most `max_len` places
    ///
    /// A cap of zero is treated as one so a selection always fits.
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len: max_len.max(1),
            places: Vec::new(),
        }
    }

    /// Replace the contents wholesale
    ///
    /// Duplicate identities keep their first occurrence; the result is
    /// truncated to the cap. Returns the number of duplicates dropped.
    pub fn replace(&mut self, places: Vec<Place>) -> usize {
        let incoming = places.len();
        let mut seen = HashSet::with_capacity(incoming);
        self.places = places
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();
        let dropped = incoming - self.places.len();
        self.places.truncate(self.max_len);
        dropped
    }

    /// Relocate the entry with `id` to index 0, keeping the relative order of
    /// everything else
    ///
    /// Returns false if no entry matches.
    pub fn move_to_front(&mut self, id: &PlaceId) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.places[..=idx].rotate_right(1);
                true
            }
            None => false,
        }
    }

    /// Insert `place` at index 0, removing any entry with the same identity
    /// first and evicting from the tail when over the cap
    pub fn insert_front(&mut self, place: Place) {
        if let Some(idx) = self.position(&place.id) {
            self.places.remove(idx);
        }
        self.places.insert(0, place);
        self.places.truncate(self.max_len);
    }

    pub fn position(&self, id: &PlaceId) -> Option<usize> {
        self.places.iter().position(|p| &p.id == id)
    }

    pub fn get(&self, id: &PlaceId) -> Option<&Place> {
        self.places.iter().find(|p| &p.id == id)
    }

    pub fn clear(&mut self) {
        self.places.clear();
    }

    pub fn as_slice(&self) -> &[Place] {
        &self.places
    }

    pub fn to_vec(&self) -> Vec<Place> {
        self.places.clone()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Place> {
        self.places.iter()
    }

    /// Identities in display order
    pub fn ids(&self) -> Vec<&PlaceId> {
        self.places.iter().map(|p| &p.id).collect()
    }
}

impl<'a> IntoIterator for &'a ResultList {
    type Item = &'a Place;
    type IntoIter = std::slice::Iter<'a, Place>;

    fn into_iter(self) -> Self::IntoIter {
        self.places.iter()
    }
}
