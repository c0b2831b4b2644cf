use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Returns `None` unless both values are finite and inside the
    /// latitude [-90, 90] / longitude [-180, 180] ranges.
    pub fn try_new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Place categories understood by the nearby-places endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Hotel,
    Transport,
    #[default]
    Attraction,
    Restaurant,
    Hospital,
    Temple,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Hotel,
        Category::Transport,
        Category::Attraction,
        Category::Restaurant,
        Category::Hospital,
        Category::Temple,
    ];

    /// Wire value sent as the `category` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hotel => "HOTEL",
            Category::Transport => "TRANSPORT",
            Category::Attraction => "ATTRACTION",
            Category::Restaurant => "RESTAURANT",
            Category::Hospital => "HOSPITAL",
            Category::Temple => "TEMPLE",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values applied when a search input is left empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchDefaults {
    pub radius_km: f64,
    pub max_radius_km: f64,
    pub category: Category,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            radius_km: 2.0,
            max_radius_km: 50.0,
            category: Category::Attraction,
        }
    }
}

/// One nearby-places request. Built fresh per search and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub origin: Coordinate,
    pub radius_km: f64,
    pub category: Category,
}

impl SearchQuery {
    /// Applies defaults for absent inputs and checks preconditions.
    ///
    /// A missing origin fails with [`SearchError::MissingOrigin`]. Radii are
    /// capped at `defaults.max_radius_km`; if the resulting radius is not a
    /// positive finite number the query fails with
    /// [`SearchError::InvalidInput`].
    pub fn from_inputs(
        origin: Option<Coordinate>,
        radius_km: Option<f64>,
        category: Option<Category>,
        defaults: &SearchDefaults,
    ) -> Result<Self, SearchError> {
        let origin = origin.ok_or(SearchError::MissingOrigin)?;
        let requested = radius_km.unwrap_or(defaults.radius_km);
        let radius_km = requested.min(defaults.max_radius_km);
        let positive = |r: f64| r.is_finite() && r > 0.0;
        if !positive(requested) || !positive(radius_km) {
            return Err(SearchError::InvalidInput(format!(
                "Radius must be a positive number of kilometres (got {}).",
                if positive(requested) { radius_km } else { requested }
            )));
        }

        Ok(Self {
            origin,
            radius_km,
            category: category.unwrap_or(defaults.category),
        })
    }
}

/// A place returned by the backend. Read-only on the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
    pub rating: Option<f64>,
    pub source: String,
}

impl Place {
    /// External turn-by-turn directions link for this place.
    pub fn navigation_url(&self) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            self.coordinate.latitude, self.coordinate.longitude
        )
    }
}

/// Ordered results of one search; replaced wholesale by the next one.
pub type ResultSet = Vec<Place>;

/// Wire shape of a single entry in the `results` array.
#[derive(Debug, Deserialize)]
pub struct PlaceRecord {
    pub name: Option<String>,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub rating: Option<f64>,
    pub source: Option<String>,
}

impl PlaceRecord {
    /// Drops records whose coordinate cannot be placed on the map.
    pub fn into_place(self) -> Option<Place> {
        let Some(coordinate) = Coordinate::try_new(self.lat, self.lng) else {
            debug!("Dropping place with invalid coordinate ({}, {})", self.lat, self.lng);
            return None;
        };

        Some(Place {
            name: self.name.unwrap_or_else(|| "Unnamed Place".to_string()),
            address: self.address.unwrap_or_else(|| "Nearby Area".to_string()),
            coordinate,
            rating: self.rating,
            source: self.source.unwrap_or_else(|| "Unknown".to_string()),
        })
    }
}

/// Body of the nearby-places endpoint: `{"results": [...]}` or `{"error": "..."}`.
#[derive(Debug, Default, Deserialize)]
pub struct NearbyResponse {
    #[serde(default)]
    pub results: Option<Vec<PlaceRecord>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl NearbyResponse {
    /// An explicit `error` field wins over any `results` in the same body.
    pub fn into_result_set(self) -> Result<ResultSet, SearchError> {
        if let Some(message) = self.error {
            return Err(SearchError::ServerError(message));
        }

        Ok(self
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(PlaceRecord::into_place)
            .collect())
    }
}

/// Axis-aligned lat/lng box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn around(point: Coordinate) -> Self {
        Self {
            south: point.latitude,
            west: point.longitude,
            north: point.latitude,
            east: point.longitude,
        }
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::around(first), |mut bounds, point| {
            bounds.extend(point);
            bounds
        }))
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.south = self.south.min(point.latitude);
        self.north = self.north.max(point.latitude);
        self.west = self.west.min(point.longitude);
        self.east = self.east.max(point.longitude);
    }

    /// Grows each side by `ratio` of the box's span on that axis.
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_buffer = (self.north - self.south) * ratio;
        let lng_buffer = (self.east - self.west) * ratio;
        Self {
            south: self.south - lat_buffer,
            west: self.west - lng_buffer,
            north: self.north + lat_buffer,
            east: self.east + lng_buffer,
        }
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            latitude: (self.south + self.north) / 2.0,
            longitude: (self.west + self.east) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_rejects_out_of_range_and_non_finite() {
        assert!(Coordinate::try_new(20.0, 78.0).is_some());
        assert!(Coordinate::try_new(90.0, -180.0).is_some());
        assert!(Coordinate::try_new(90.5, 0.0).is_none());
        assert!(Coordinate::try_new(0.0, 180.1).is_none());
        assert!(Coordinate::try_new(f64::NAN, 0.0).is_none());
        assert!(Coordinate::try_new(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn query_applies_defaults_for_empty_inputs() {
        let origin = Coordinate::try_new(20.0, 78.0);
        let query =
            SearchQuery::from_inputs(origin, None, None, &SearchDefaults::default()).unwrap();
        assert_eq!(query.radius_km, 2.0);
        assert_eq!(query.category, Category::Attraction);
    }

    #[test]
    fn query_without_origin_is_missing_origin() {
        let err = SearchQuery::from_inputs(None, Some(5.0), None, &SearchDefaults::default())
            .unwrap_err();
        assert!(matches!(err, SearchError::MissingOrigin));
    }

    #[test]
    fn query_rejects_non_positive_radius_and_caps_large_ones() {
        let origin = Coordinate::try_new(20.0, 78.0);
        let defaults = SearchDefaults::default();
        assert!(matches!(
            SearchQuery::from_inputs(origin, Some(0.0), None, &defaults),
            Err(SearchError::InvalidInput(_))
        ));
        let capped = SearchQuery::from_inputs(origin, Some(500.0), None, &defaults).unwrap();
        assert_eq!(capped.radius_km, 50.0);
    }

    #[test]
    fn query_radius_stays_positive_under_bad_defaults() {
        let origin = Coordinate::try_new(20.0, 78.0);
        let negative_default = SearchDefaults {
            radius_km: -3.0,
            ..SearchDefaults::default()
        };
        assert!(matches!(
            SearchQuery::from_inputs(origin, None, None, &negative_default),
            Err(SearchError::InvalidInput(_))
        ));

        let zero_cap = SearchDefaults {
            max_radius_km: 0.0,
            ..SearchDefaults::default()
        };
        assert!(matches!(
            SearchQuery::from_inputs(origin, Some(5.0), None, &zero_cap),
            Err(SearchError::InvalidInput(_))
        ));
        assert!(matches!(
            SearchQuery::from_inputs(origin, Some(f64::NAN), None, &SearchDefaults::default()),
            Err(SearchError::InvalidInput(_))
        ));
    }

    #[test]
    fn category_cycles_both_ways() {
        assert_eq!(Category::Temple.next(), Category::Hotel);
        assert_eq!(Category::Hotel.prev(), Category::Temple);
        assert_eq!(Category::Attraction.next().prev(), Category::Attraction);
    }

    #[test]
    fn response_error_field_wins() {
        let body = r#"{"error": "invalid radius", "results": []}"#;
        let response: NearbyResponse = serde_json::from_str(body).unwrap();
        match response.into_result_set() {
            Err(SearchError::ServerError(msg)) => assert_eq!(msg, "invalid radius"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn response_results_fill_missing_fields_and_drop_bad_coordinates() {
        let body = r#"{"results": [
            {"name": "Fort", "address": "Old Town", "lat": 20.01, "lng": 78.02, "rating": 4.5, "source": "Google Places"},
            {"name": null, "address": null, "lat": 20.02, "lng": 78.03, "rating": null, "source": "OpenStreetMap"},
            {"name": "Nowhere", "address": "x", "lat": 123.0, "lng": 78.0, "source": "OpenStreetMap"}
        ]}"#;
        let response: NearbyResponse = serde_json::from_str(body).unwrap();
        let places = response.into_result_set().unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].rating, Some(4.5));
        assert_eq!(places[1].name, "Unnamed Place");
        assert_eq!(places[1].address, "Nearby Area");
        assert_eq!(places[1].rating, None);
    }

    #[test]
    fn navigation_url_targets_place_coordinate() {
        let place = Place {
            name: "Fort".into(),
            address: "Old Town".into(),
            coordinate: Coordinate::try_new(20.5, 78.25).unwrap(),
            rating: None,
            source: "OpenStreetMap".into(),
        };
        assert_eq!(
            place.navigation_url(),
            "https://www.google.com/maps/dir/?api=1&destination=20.5,78.25"
        );
    }

    #[test]
    fn bounds_cover_points_and_pad_by_span() {
        let pts = [(20.0, 78.0), (21.0, 79.0), (20.5, 77.0)]
            .into_iter()
            .filter_map(|(lat, lng)| Coordinate::try_new(lat, lng));
        let bounds = GeoBounds::from_points(pts).unwrap();
        assert_eq!(bounds.south, 20.0);
        assert_eq!(bounds.north, 21.0);
        assert_eq!(bounds.west, 77.0);
        assert_eq!(bounds.east, 79.0);

        let padded = bounds.pad(0.1);
        assert!((padded.south - 19.9).abs() < 1e-9);
        assert!((padded.east - 79.2).abs() < 1e-9);
        assert!(GeoBounds::from_points(std::iter::empty()).is_none());
    }
}
