use crate::models::{Coordinate, GeoBounds, Place};

/// A point marker on the map with its popup text.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub popup: String,
    pub popup_open: bool,
}

impl Marker {
    pub fn new(coordinate: Coordinate, popup: impl Into<String>) -> Self {
        Self {
            coordinate,
            popup: popup.into(),
            popup_open: false,
        }
    }

    pub fn for_place(place: &Place) -> Self {
        Self::new(place.coordinate, format!("{}\n{}", place.name, place.address))
    }
}

/// Markers currently on the map: one per displayed result, plus at most
/// one marker for the user's own position.
#[derive(Debug, Default)]
pub struct MarkerStore {
    results: Vec<Marker>,
    user: Option<Marker>,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every result marker, then adds one per place.
    /// The user marker is left alone.
    pub fn replace_result_markers(&mut self, places: &[Place]) {
        self.clear_results();
        self.results.extend(places.iter().map(Marker::for_place));
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
    }

    /// Replaces the user marker. Its popup starts open.
    pub fn set_user_marker(&mut self, coordinate: Coordinate) {
        let mut marker = Marker::new(coordinate, "You are here");
        marker.popup_open = true;
        for m in &mut self.results {
            m.popup_open = false;
        }
        self.user = Some(marker);
    }

    pub fn result_markers(&self) -> &[Marker] {
        &self.results
    }

    pub fn user_marker(&self) -> Option<&Marker> {
        self.user.as_ref()
    }

    /// Opens one result marker's popup and closes every other popup.
    /// Returns `false` if `index` is out of range.
    pub fn open_popup(&mut self, index: usize) -> bool {
        if index >= self.results.len() {
            return false;
        }
        if let Some(user) = self.user.as_mut() {
            user.popup_open = false;
        }
        for (i, m) in self.results.iter_mut().enumerate() {
            m.popup_open = i == index;
        }
        true
    }

    pub fn open_popup_marker(&self) -> Option<&Marker> {
        self.results
            .iter()
            .chain(self.user.iter())
            .find(|m| m.popup_open)
    }

    /// Box around every result marker and the user marker, if any.
    /// `None` while no result markers exist.
    pub fn bounds(&self) -> Option<GeoBounds> {
        if self.results.is_empty() {
            return None;
        }
        GeoBounds::from_points(
            self.results
                .iter()
                .chain(self.user.iter())
                .map(|m| m.coordinate),
        )
    }
}
