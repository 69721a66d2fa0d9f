use std::env;
use std::path::PathBuf;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info, warn};

use crate::app::NavigationController;
use crate::config;
use crate::library::{self, Library};
use crate::player::PlayerSession;

mod event_loop;
mod keymap;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();
    logging::init(&settings.log);
    if let Some(msg) = config_warning {
        warn!("{msg}");
        eprintln!("allegro: {msg}");
    }

    let config_path = config::resolve_config_path();
    let cli_root = env::args_os().nth(1).map(PathBuf::from);
    let root = startup::resolve_library_root(cli_root, &settings.library, config_path.as_deref())?;

    println!("Indexing music library at {}...", root.display());
    let report = library::spawn_index(root.clone(), settings.library.clone())?
        .join()
        .map_err(|_| "library indexing thread panicked")?;
    println!(
        "Indexed {} albums with {} tracks",
        report.album_count(),
        report.track_count()
    );
    if report.album_count() == 0 {
        println!("No albums found. Albums are directories of audio files, ideally named \"Artist - Album\".");
    }
    let library = Library::from_report(root, &report);
    info!(
        albums = library.album_count(),
        artists = library.artists().len(),
        dropped = report.dropped_files.len(),
        known_secs = library.total_duration().as_secs(),
        "library ready"
    );
    for artist in library.artists() {
        debug!(artist = %artist, albums = library.by_artist(&artist).len(), "artist indexed");
    }

    let mut session = PlayerSession::new(settings.player.clone());
    let mut nav = NavigationController::new(library, &settings);
    if let Err(e) = session.start() {
        eprintln!("allegro: playback unavailable: {e}");
        nav.set_notice(format!("Playback unavailable: {e}"));
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(&mut terminal, &settings, &mut nav, &mut session, &mut state)
    })();

    session.stop();
    info!(phase = ?session.phase(), "player stopped");

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
