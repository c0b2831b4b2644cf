use async_trait::async_trait;
use nearby_tui::api::{NearbyBackend, ResultsFetcher};
use nearby_tui::app::{Action, App, Phase, SearchRequest};
use nearby_tui::config::Config;
use nearby_tui::error::{LocateError, SearchError};
use nearby_tui::location::{GeoLocator, PositionSource};
use nearby_tui::models::{Category, Coordinate, NearbyResponse, ResultSet, SearchQuery};
use nearby_tui::status::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct FixedPosition(Coordinate);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinate, LocateError> {
        Ok(self.0)
    }
}

/// Answers every query with a canned JSON body and counts requests.
struct CannedBackend {
    body: &'static str,
    calls: AtomicUsize,
}

impl CannedBackend {
    fn new(body: &'static str) -> Self {
        Self {
            body,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl NearbyBackend for CannedBackend {
    async fn nearby(&self, _query: &SearchQuery) -> Result<NearbyResponse, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        serde_json::from_str(self.body).map_err(|e| SearchError::NetworkError(e.to_string()))
    }
}

const TWO_PLACES: &str = r#"{"results": [
    {"name": "Sun Temple", "address": "Hill Road", "lat": 20.01, "lng": 78.02, "rating": 4.6, "source": "Google Places"},
    {"name": "City Museum", "address": "Nearby Area", "lat": 19.98, "lng": 77.97, "rating": null, "source": "OpenStreetMap"}
]}"#;

fn fetcher(body: &'static str) -> ResultsFetcher<CannedBackend> {
    ResultsFetcher::new(CannedBackend::new(body), Config::default().search.defaults())
}

/// Runs a search the way the main loop dispatches one.
async fn run(
    fetcher: &ResultsFetcher<CannedBackend>,
    request: SearchRequest,
) -> Result<ResultSet, SearchError> {
    fetcher
        .search(request.origin, request.radius_km, request.category)
        .await
}

#[tokio::test]
async fn detect_then_search_shows_results_and_fits_all_markers() {
    let mut app = App::new(Config::default());
    let here = Coordinate::try_new(20.0, 78.0).unwrap();
    let locator = GeoLocator::new(Some(FixedPosition(here)), true, Duration::from_secs(1));
    let fetcher = fetcher(TWO_PLACES);

    assert_eq!(app.request_detect(), Action::Detect);
    app.on_location_resolved(locator.detect().await);
    assert_eq!(app.phase, Phase::LocationKnown);

    app.inputs.radius = "2".into();
    app.inputs.category = Some(Category::Attraction);
    let Some(Action::Search(request)) = app.request_search() else {
        panic!("search should be issued once a location is known");
    };
    assert_eq!(request.origin, Some(here));
    assert_eq!(request.radius_km, Some(2.0));

    app.on_search_completed(run(&fetcher, request).await);

    assert_eq!(fetcher_calls(&fetcher), 1);
    assert_eq!(app.phase, Phase::ResultsShown);
    assert_eq!(app.scene.entries.len(), 2);
    assert_eq!(app.scene.markers.result_markers().len(), 2);
    assert!(app.scene.markers.user_marker().is_some());
    assert!(!app.scene.loading);
    assert_eq!(app.status.current().severity, Severity::Success);

    let fitted = app.scene.map.fitted_bounds().expect("viewport should be fitted");
    assert!(fitted.contains(here));
    for marker in app.scene.markers.result_markers() {
        assert!(fitted.contains(marker.coordinate));
    }
}

#[tokio::test]
async fn search_without_location_sends_nothing() {
    let mut app = App::new(Config::default());
    let fetcher = fetcher(TWO_PLACES);

    assert_eq!(app.request_search(), None);
    assert_eq!(
        fetcher.search(None, None, None).await,
        Err(SearchError::MissingOrigin)
    );

    assert_eq!(fetcher_calls(&fetcher), 0);
    assert_eq!(app.status.current().severity, Severity::Error);
    assert!(app.status.current().message.contains("detect your location first"));
}

#[tokio::test]
async fn backend_error_is_shown_verbatim_and_clears_results() {
    let mut app = App::new(Config::default());
    app.on_location_resolved(Ok(Coordinate::try_new(20.0, 78.0).unwrap()));

    let first = fetcher(TWO_PLACES);
    let Some(Action::Search(request)) = app.request_search() else {
        panic!("expected a search");
    };
    app.on_search_completed(run(&first, request).await);
    assert_eq!(app.scene.markers.result_markers().len(), 2);

    let failing = fetcher(r#"{"error": "invalid radius"}"#);
    let Some(Action::Search(request)) = app.request_search() else {
        panic!("expected a search");
    };
    app.on_search_completed(run(&failing, request).await);

    assert_eq!(app.status.current().message, "invalid radius");
    assert_eq!(app.status.current().severity, Severity::Error);
    assert!(app.scene.entries.is_empty());
    assert!(app.scene.markers.result_markers().is_empty());
    assert!(app.scene.markers.user_marker().is_some());
}

#[tokio::test]
async fn empty_results_show_empty_state() {
    let mut app = App::new(Config::default());
    app.on_location_resolved(Ok(Coordinate::try_new(20.0, 78.0).unwrap()));
    let fetcher = fetcher(r#"{"results": []}"#);

    let Some(Action::Search(request)) = app.request_search() else {
        panic!("expected a search");
    };
    app.on_search_completed(run(&fetcher, request).await);

    assert!(app.scene.markers.result_markers().is_empty());
    assert!(app.scene.entries.is_empty());
    assert!(app.scene.empty_message.is_some());
    assert_eq!(app.status.current().severity, Severity::Info);
}

#[tokio::test]
async fn zero_radius_is_rejected_without_a_request() {
    let mut app = App::new(Config::default());
    app.on_location_resolved(Ok(Coordinate::try_new(20.0, 78.0).unwrap()));
    let fetcher = fetcher(TWO_PLACES);

    app.inputs.radius = "0".into();
    let Some(Action::Search(request)) = app.request_search() else {
        panic!("expected a search");
    };
    assert!(app.scene.loading);

    let outcome = run(&fetcher, request).await;
    assert!(matches!(outcome, Err(SearchError::InvalidInput(_))));
    app.on_search_completed(outcome);

    assert_eq!(fetcher_calls(&fetcher), 0);
    assert!(!app.scene.loading);
    assert_eq!(app.phase, Phase::Error);
    assert_eq!(app.status.current().severity, Severity::Error);
    assert!(app.status.current().message.contains("Radius"));
}

fn fetcher_calls(fetcher: &ResultsFetcher<CannedBackend>) -> usize {
    fetcher.backend().calls.load(Ordering::SeqCst)
}
