use crate::config::Config;
use crate::error::{LocateError, SearchError};
use crate::models::{Category, Coordinate, ResultSet, SearchDefaults};
use crate::render::{self, MapView, Scene, EMPTY_RESULTS_MESSAGE};
use crate::status::StatusReporter;
use crossterm::event::{KeyCode, KeyEvent};

/// Zoom applied when the map is centered on a detected location.
pub const LOCATE_ZOOM: f64 = 13.0;

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Where the explorer is in its detect → search cycle.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum Phase {
    #[default]
    Idle,
    Detecting,
    LocationKnown,
    Searching,
    ResultsShown,
    Error,
}

/// Editable inputs of the search form.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Field {
    Latitude,
    Longitude,
    Radius,
    Category,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Latitude => Field::Longitude,
            Field::Longitude => Field::Radius,
            Field::Radius => Field::Category,
            Field::Category => Field::Latitude,
        }
    }

    fn prev(self) -> Self {
        match self {
            Field::Latitude => Field::Category,
            Field::Longitude => Field::Latitude,
            Field::Radius => Field::Longitude,
            Field::Category => Field::Radius,
        }
    }
}

/// Parsed form values, handed unchanged to `ResultsFetcher::search`,
/// which applies defaults and the radius checks.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub origin: Option<Coordinate>,
    pub radius_km: Option<f64>,
    pub category: Option<Category>,
}

/// Async work the main loop must start on the app's behalf.
#[derive(Debug, PartialEq)]
pub enum Action {
    Detect,
    Search(SearchRequest),
}

/// Raw text of the search form. Empty text means "not given".
#[derive(Debug, Default, Clone)]
pub struct SearchInputs {
    pub latitude: String,
    pub longitude: String,
    pub radius: String,
    pub category: Option<Category>,
}

impl SearchInputs {
    /// `Ok(None)` until both coordinate fields hold something.
    pub fn origin(&self) -> Result<Option<Coordinate>, SearchError> {
        let (lat, lng) = (self.latitude.trim(), self.longitude.trim());
        if lat.is_empty() || lng.is_empty() {
            return Ok(None);
        }

        let parse = |text: &str, label: &str| {
            text.parse::<f64>().map_err(|_| {
                SearchError::InvalidInput(format!("{} must be a number (got '{}').", label, text))
            })
        };
        let (lat, lng) = (parse(lat, "Latitude")?, parse(lng, "Longitude")?);

        Coordinate::try_new(lat, lng).map(Some).ok_or_else(|| {
            SearchError::InvalidInput(format!("Coordinates ({}, {}) are out of range.", lat, lng))
        })
    }

    pub fn radius(&self) -> Result<Option<f64>, SearchError> {
        let text = self.radius.trim();
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<f64>().map(Some).map_err(|_| {
            SearchError::InvalidInput(format!("Radius must be a number (got '{}').", text))
        })
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Latitude => Some(&mut self.latitude),
            Field::Longitude => Some(&mut self.longitude),
            Field::Radius => Some(&mut self.radius),
            Field::Category => None,
        }
    }
}

/// Owns all view state; every mutation goes through here on the main loop.
pub struct App {
    pub config: Config,
    pub defaults: SearchDefaults,
    pub inputs: SearchInputs,
    pub scene: Scene,
    pub status: StatusReporter,
    pub phase: Phase,
    pub focus: Option<Field>,
    pub selected_index: usize,
    pub tick_count: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let map = MapView::new(
            config.location.initial_center(),
            config.location.initial_zoom,
        );

        Self {
            defaults: config.search.defaults(),
            config,
            inputs: SearchInputs::default(),
            scene: Scene::new(map),
            status: StatusReporter::new(),
            phase: Phase::Idle,
            focus: None,
            selected_index: 0,
            tick_count: 0,
            should_quit: false,
        }
    }

    pub fn on_tick(&mut self) {
        self.tick_count += 1;
    }

    /// Animation frame shown while a detection or search is pending.
    pub fn spinner(&self) -> Option<&'static str> {
        matches!(self.phase, Phase::Detecting | Phase::Searching)
            .then(|| SPINNER[self.tick_count % SPINNER.len()])
    }

    /// Starts a location detection. Repeated requests are not queued;
    /// whichever completion arrives last wins.
    pub fn request_detect(&mut self) -> Action {
        self.phase = Phase::Detecting;
        self.status.info("Detecting your location...");
        Action::Detect
    }

    pub fn on_location_resolved(&mut self, outcome: Result<Coordinate, LocateError>) {
        match outcome {
            Ok(coord) => {
                self.inputs.latitude = coord.latitude.to_string();
                self.inputs.longitude = coord.longitude.to_string();
                self.scene.map.set_view(coord, LOCATE_ZOOM);
                self.scene.markers.set_user_marker(coord);
                self.phase = Phase::LocationKnown;
                self.status.info(format!(
                    "Location detected: {}. Press 's' to search nearby.",
                    coord
                ));
            }
            Err(e) => {
                self.phase = Phase::Error;
                self.status.error(e.to_string());
            }
        }
    }

    /// Parses the form. Without a position there is nothing to search
    /// around, so that case is reported here and no task is started.
    fn build_request(&self) -> Result<SearchRequest, SearchError> {
        let origin = self.inputs.origin()?;
        if origin.is_none() {
            return Err(SearchError::MissingOrigin);
        }
        Ok(SearchRequest {
            origin,
            radius_km: self.inputs.radius()?,
            category: self.inputs.category,
        })
    }

    /// Returns the search to run, or reports why the form can't be searched.
    pub fn request_search(&mut self) -> Option<Action> {
        match self.build_request() {
            Ok(request) => {
                self.phase = Phase::Searching;
                self.scene.loading = true;
                self.status.info("Searching nearby...");
                Some(Action::Search(request))
            }
            Err(e) => {
                self.phase = Phase::Error;
                self.status.error(e.to_string());
                None
            }
        }
    }

    pub fn on_search_completed(&mut self, outcome: Result<ResultSet, SearchError>) {
        match outcome {
            Ok(places) => {
                render::render(&places, &mut self.scene);
                self.selected_index = 0;
                self.phase = Phase::ResultsShown;
                if places.is_empty() {
                    self.status.info(EMPTY_RESULTS_MESSAGE);
                } else {
                    self.status.success(format!("Found {} results!", places.len()));
                }
            }
            Err(e @ SearchError::ServerError(_)) => {
                // The backend rejected the query; nothing valid is left to show.
                self.scene.clear_results();
                self.phase = Phase::Error;
                self.status.error(e.to_string());
            }
            Err(e) => {
                self.scene.loading = false;
                self.phase = Phase::Error;
                self.status.error(e.to_string());
            }
        }
    }

    /// List-entry click for the highlighted result.
    pub fn activate_selected(&mut self) {
        if self.scene.activate(self.selected_index) {
            if let Some(entry) = self.scene.entries.get(self.selected_index) {
                self.status.info(format!("Showing {} on the map.", entry.name));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if let Some(field) = self.focus {
            return self.handle_form_key(field, key);
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('d') => return Some(self.request_detect()),
            KeyCode::Char('s') => return self.request_search(),
            KeyCode::Tab => self.focus = Some(Field::Latitude),
            KeyCode::Char('c') => {
                let current = self.inputs.category.unwrap_or(self.defaults.category);
                self.inputs.category = Some(current.next());
            }
            KeyCode::Enter => self.activate_selected(),
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.scene.entries.len();
                if len > 0 {
                    self.selected_index = (self.selected_index + 1) % len;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let len = self.scene.entries.len();
                if len > 0 {
                    self.selected_index = self.selected_index.checked_sub(1).unwrap_or(len - 1);
                }
            }
            _ => {}
        }
        None
    }

    fn handle_form_key(&mut self, field: Field, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => self.focus = None,
            KeyCode::Tab => self.focus = Some(field.next()),
            KeyCode::BackTab => self.focus = Some(field.prev()),
            KeyCode::Enter => {
                self.focus = None;
                return self.request_search();
            }
            KeyCode::Left if field == Field::Category => {
                let current = self.inputs.category.unwrap_or(self.defaults.category);
                self.inputs.category = Some(current.prev());
            }
            KeyCode::Right if field == Field::Category => {
                let current = self.inputs.category.unwrap_or(self.defaults.category);
                self.inputs.category = Some(current.next());
            }
            KeyCode::Backspace if field == Field::Category => self.inputs.category = None,
            KeyCode::Backspace => {
                if let Some(text) = self.inputs.text_mut(field) {
                    text.pop();
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                if let Some(text) = self.inputs.text_mut(field) {
                    text.push(c);
                }
            }
            _ => {}
        }
        None
    }
}
