//! Turning a result set into map and list state.
//!
//! [`plan`] is a pure function from a [`ResultSet`] to an ordered list of
//! [`RenderCommand`]s; [`apply`] executes them against a [`Scene`]. The order
//! of the plan is the ordering guarantee of one render: clear, then add, then
//! fit the viewport.

use crate::markers::MarkerStore;
use crate::models::{Coordinate, GeoBounds, Place};

/// Shown in the results region when a search comes back empty.
pub const EMPTY_RESULTS_MESSAGE: &str =
    "No places found in this radius. Try increasing the distance.";

/// Padding ratio applied around the fitted markers.
pub const FIT_PADDING: f64 = 0.1;

/// Zoom used when the user activates a list entry.
pub const FOCUS_ZOOM: f64 = 15.0;

/// Smallest box (degrees per axis) the viewport will fit to.
const MIN_FIT_SPAN: f64 = 0.005;

/// Map viewport: either a center + zoom, or a fitted box.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: f64,
    fitted: Option<GeoBounds>,
}

impl MapView {
    pub fn new(center: Coordinate, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            fitted: None,
        }
    }

    pub fn set_view(&mut self, center: Coordinate, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
        self.fitted = None;
    }

    /// Fits the viewport to `bounds` grown by `padding` of its span.
    pub fn fit_bounds(&mut self, bounds: GeoBounds, padding: f64) {
        let mut padded = bounds.pad(padding);
        let center = padded.center();
        if padded.north - padded.south < MIN_FIT_SPAN {
            padded.south = center.latitude - MIN_FIT_SPAN / 2.0;
            padded.north = center.latitude + MIN_FIT_SPAN / 2.0;
        }
        if padded.east - padded.west < MIN_FIT_SPAN {
            padded.west = center.longitude - MIN_FIT_SPAN / 2.0;
            padded.east = center.longitude + MIN_FIT_SPAN / 2.0;
        }
        self.center = center;
        self.fitted = Some(padded);
    }

    pub fn fitted_bounds(&self) -> Option<GeoBounds> {
        self.fitted
    }

    /// The lat/lng box the canvas should draw.
    pub fn visible_bounds(&self) -> GeoBounds {
        if let Some(bounds) = self.fitted {
            return bounds;
        }
        // Web-mercator style: each zoom level halves the visible span.
        let lng_span = (360.0 / 2f64.powf(self.zoom)).min(360.0);
        let lat_span = (lng_span / 2.0).min(180.0);
        GeoBounds {
            south: (self.center.latitude - lat_span / 2.0).max(-90.0),
            north: (self.center.latitude + lat_span / 2.0).min(90.0),
            west: (self.center.longitude - lng_span / 2.0).max(-180.0),
            east: (self.center.longitude + lng_span / 2.0).min(180.0),
        }
    }
}

/// One card in the results list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub source: String,
    pub navigation_url: String,
    pub coordinate: Coordinate,
    /// Result marker focused when the entry is activated.
    pub on_click: Option<usize>,
}

impl From<&Place> for ListEntry {
    fn from(place: &Place) -> Self {
        Self {
            name: place.name.clone(),
            address: place.address.clone(),
            rating: place.rating,
            source: place.source.clone(),
            navigation_url: place.navigation_url(),
            coordinate: place.coordinate,
            on_click: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    ClearResults,
    ShowEmpty(String),
    ReplaceResultMarkers(Vec<Place>),
    AddListEntry(ListEntry),
    BindClick { entry: usize, marker: usize },
    /// Fit to every marker on the map, the user marker included.
    FitBounds { padding: f64 },
}

/// Everything a render or a search outcome can touch.
#[derive(Debug)]
pub struct Scene {
    pub map: MapView,
    pub markers: MarkerStore,
    pub entries: Vec<ListEntry>,
    pub empty_message: Option<String>,
    pub loading: bool,
}

impl Scene {
    pub fn new(map: MapView) -> Self {
        Self {
            map,
            markers: MarkerStore::new(),
            entries: Vec::new(),
            empty_message: None,
            loading: false,
        }
    }

    /// Empties the results region and removes every result marker.
    pub fn clear_results(&mut self) {
        self.markers.clear_results();
        self.entries.clear();
        self.empty_message = None;
        self.loading = false;
    }

    /// List-entry click: center on the place and open its popup.
    pub fn activate(&mut self, entry: usize) -> bool {
        let Some(item) = self.entries.get(entry) else {
            return false;
        };
        let (coordinate, marker) = (item.coordinate, item.on_click);
        self.map.set_view(coordinate, FOCUS_ZOOM);
        marker.map_or(false, |m| self.markers.open_popup(m))
    }
}

/// Plans the render of `results`.
pub fn plan(results: &[Place]) -> Vec<RenderCommand> {
    let mut commands = vec![RenderCommand::ClearResults];

    if results.is_empty() {
        commands.push(RenderCommand::ShowEmpty(EMPTY_RESULTS_MESSAGE.to_string()));
        return commands;
    }

    commands.push(RenderCommand::ReplaceResultMarkers(results.to_vec()));
    for (i, place) in results.iter().enumerate() {
        commands.push(RenderCommand::AddListEntry(ListEntry::from(place)));
        commands.push(RenderCommand::BindClick { entry: i, marker: i });
    }
    commands.push(RenderCommand::FitBounds {
        padding: FIT_PADDING,
    });
    commands
}

pub fn apply(commands: Vec<RenderCommand>, scene: &mut Scene) {
    for command in commands {
        match command {
            RenderCommand::ClearResults => scene.clear_results(),
            RenderCommand::ShowEmpty(message) => scene.empty_message = Some(message),
            RenderCommand::ReplaceResultMarkers(places) => {
                scene.markers.replace_result_markers(&places)
            }
            RenderCommand::AddListEntry(entry) => scene.entries.push(entry),
            RenderCommand::BindClick { entry, marker } => {
                if let Some(item) = scene.entries.get_mut(entry) {
                    item.on_click = Some(marker);
                }
            }
            RenderCommand::FitBounds { padding } => {
                if let Some(bounds) = scene.markers.bounds() {
                    scene.map.fit_bounds(bounds, padding);
                }
            }
        }
    }
}

/// Replaces whatever the scene shows with `results`.
pub fn render(results: &[Place], scene: &mut Scene) {
    apply(plan(results), scene);
}
