use std::io;
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

use crate::app::NavigationController;
use crate::config;
use crate::library::{self, Library, ScanReport};
use crate::player::PlayerSession;
use crate::runtime::keymap::{Action, action_for_key};
use crate::ui;

/// How long to wait for a key before checking on background work.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// A re-index running in the background.
    rescan: Option<JoinHandle<ScanReport>>,
}

/// Main terminal event loop: reads keys, drives the controller and hands
/// finished re-index results over to it. Returns `Ok(())` on quit.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &config::Settings,
    nav: &mut NavigationController,
    session: &mut PlayerSession,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        collect_rescan(nav, state);

        let model = nav.render(session);
        terminal.draw(|f| ui::draw(f, &model))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match action_for_key(key, nav.mode()) {
            Some(Action::Quit) => return Ok(()),
            Some(Action::Redraw) => terminal.clear()?,
            Some(Action::Rescan) => start_rescan(nav, settings, state),
            Some(Action::Intent(intent)) => nav.handle(intent, session),
            None => {}
        }
    }
}

fn start_rescan(
    nav: &mut NavigationController,
    settings: &config::Settings,
    state: &mut EventLoopState,
) {
    if state.rescan.is_some() {
        nav.set_notice("Re-index already running");
        return;
    }
    let root = nav.library().root().to_path_buf();
    info!(root = %root.display(), "re-index requested");
    match library::spawn_index(root, settings.library.clone()) {
        Ok(handle) => {
            state.rescan = Some(handle);
            nav.set_notice("Re-indexing library...");
        }
        Err(e) => {
            warn!(error = %e, "could not start re-index");
            nav.set_notice(format!("Re-index failed to start: {e}"));
        }
    }
}

fn collect_rescan(nav: &mut NavigationController, state: &mut EventLoopState) {
    if !state.rescan.as_ref().is_some_and(JoinHandle::is_finished) {
        return;
    }
    let Some(handle) = state.rescan.take() else {
        return;
    };
    match handle.join() {
        Ok(report) => {
            let root = nav.library().root().to_path_buf();
            let library = Library::from_report(root, &report);
            nav.replace_library(library);
            nav.set_notice(format!(
                "Indexed {} albums with {} tracks",
                report.album_count(),
                report.track_count()
            ));
        }
        Err(_) => {
            error!("re-index thread panicked");
            nav.set_notice("Re-index failed");
        }
    }
}
