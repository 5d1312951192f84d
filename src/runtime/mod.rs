use std::env;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::catalog::{Fetcher, load_catalog};
use crate::config::default_prefs_path;
use crate::logging;
use crate::lyrics::LyricLoader;
use crate::mpris::{ControlCmd, spawn_mpris};
use crate::player::{Controller, RodioTransport};
use crate::prefs::{JsonFileStore, MemoryStore, PreferenceStore};

mod event_loop;
mod keymap;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = settings::load_settings();

    // The first argument overrides where the catalog comes from.
    if let Some(source) = env::args().nth(1) {
        settings.catalog.source = source;
    }

    let log_path = logging::init(&settings.logging);
    info!(version = env!("CARGO_PKG_VERSION"), log = ?log_path, "starting");

    let fetcher = Fetcher::for_catalog(&settings.catalog.source, settings.catalog.base.as_deref())?;
    let catalog = load_catalog(&fetcher, &settings.catalog.source);

    let prefs: Box<dyn PreferenceStore> = match settings.prefs.path.clone().or_else(default_prefs_path) {
        Some(path) => {
            let store = JsonFileStore::open(path);
            info!(path = %store.path().display(), "preferences");
            Box::new(store)
        }
        None => {
            warn!("no preference location available, preferences will not persist");
            Box::new(MemoryStore::default())
        }
    };

    let transport = RodioTransport::open(
        fetcher.clone(),
        Duration::from_millis(settings.audio.quit_fade_out_ms),
    )?;
    let mut controller = Controller::new(
        transport,
        prefs,
        &catalog,
        startup::controller_options(&settings),
    );

    let mut app = App::new(catalog, Duration::from_millis(settings.ui.toast_ms));
    startup::apply_ui_defaults(&mut app, &controller, &settings);

    let lyrics = LyricLoader::new(fetcher.clone());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = spawn_mpris(control_tx, Some(fetcher));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut controller,
        &lyrics,
        &mpris,
        &control_rx,
        &mut state,
    );

    controller.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("bye");
    run_result
}
