use color_eyre::Result;
use nearby_tui::{
    api::{PlacesProvider, ResultsFetcher},
    app::{Action, App},
    config::Config,
    events::{Event, EventHandler},
    location::{GeoLocator, IpLocator},
    logging, ui,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Instrumentation and safety
    let _log_guard = logging::initialize_logging("logs");
    color_eyre::install()?;
    install_panic_hook();

    let config = Config::load();
    let locator = Arc::new(GeoLocator::from_config(&config.location));
    let fetcher = Arc::new(ResultsFetcher::new(
        PlacesProvider::new(&config.api)?,
        config.search.defaults(),
    ));
    info!("Using nearby-places endpoint {}", config.api.endpoint);

    // Ready terminal and state
    let mut terminal = setup_terminal()?;
    let mut app = App::new(config);
    let mut events = EventHandler::new(app.config.ui.tick_rate_ms);

    // Main loop
    while !app.should_quit {
        terminal.draw(|f| ui::render(f, &app))?;

        let Some(event) = events.next().await else {
            break;
        };
        let action = match event {
            Event::Tick => {
                app.on_tick();
                None
            }
            Event::Input(key) => app.handle_key(key),
            Event::LocationResolved(outcome) => {
                app.on_location_resolved(outcome);
                None
            }
            Event::SearchCompleted(outcome) => {
                app.on_search_completed(outcome);
                None
            }
        };

        if let Some(action) = action {
            dispatch(action, &locator, &fetcher, &events.tx);
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Runs an action on its own task; the outcome comes back as an event.
/// Overlapping searches are neither cancelled nor deduplicated.
fn dispatch(
    action: Action,
    locator: &Arc<GeoLocator<IpLocator>>,
    fetcher: &Arc<ResultsFetcher<PlacesProvider>>,
    tx: &UnboundedSender<Event>,
) {
    let tx = tx.clone();
    match action {
        Action::Detect => {
            let locator = Arc::clone(locator);
            tokio::spawn(async move {
                let outcome = locator.detect().await;
                let _ = tx.send(Event::LocationResolved(outcome));
            });
        }
        Action::Search(request) => {
            debug!("Dispatching search {:?}", request);
            let fetcher = Arc::clone(fetcher);
            tokio::spawn(async move {
                let outcome = fetcher
                    .search(request.origin, request.radius_km, request.category)
                    .await;
                let _ = tx.send(Event::SearchCompleted(outcome));
            });
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen, crossterm::cursor::Hide)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show)?;
    Ok(())
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Force terminal cleanup!
        crossterm::terminal::disable_raw_mode().ok();
        crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show).ok();
        original_hook(panic_info);
    }));
}
