//! Application model types: `ViewMode`, `Intent` and `NavigationController`.
//!
//! The controller holds the current library, the active view and its
//! selection, and forwards playback intents to a `PlayerSession`.

use std::sync::Arc;

use tracing::debug;

use crate::config::Settings;
use crate::library::{Album, AlbumList, Library};
use crate::player::PlayerSession;

use super::render::{self, RenderModel};

/// The three views of the browser.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Albums,
    Tracks,
    Search,
}

/// A user intent, already decoded from the raw key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Up,
    Down,
    /// Open the selected album, play the selected track, or commit a search.
    Select,
    /// Leave the track list, cancel a search, or drop a committed filter.
    Back,
    Search,
    Input(char),
    Backspace,
    /// Play the selected album (Albums) or the open album (Tracks).
    Play,
    Shuffle,
    Advance,
    TogglePause,
    VolumeUp,
    VolumeDown,
}

/// What is on screen right now.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub mode: ViewMode,
    /// Album list backing the Albums and Search views.
    pub albums: AlbumList,
    /// The album open in the Tracks view.
    pub album: Option<Arc<Album>>,
    pub selected: usize,
    /// Query buffer while searching.
    pub query: String,
    /// Search committed with Select; stays applied until cleared.
    pub filter: Option<String>,
}

impl ViewState {
    fn albums(albums: AlbumList) -> Self {
        Self {
            mode: ViewMode::Albums,
            albums,
            album: None,
            selected: 0,
            query: String::new(),
            filter: None,
        }
    }

    /// Length of whichever list is active.
    pub fn len(&self) -> usize {
        match self.mode {
            ViewMode::Tracks => self.album.as_ref().map_or(0, |a| a.tracks.len()),
            ViewMode::Albums | ViewMode::Search => self.albums.len(),
        }
    }

    fn selected_album(&self) -> Option<&Arc<Album>> {
        self.albums.get(self.selected)
    }
}

/// The three-state view machine driving the browser.
///
/// Mutated only from the interactive loop; the session it drives is passed
/// in per call.
pub struct NavigationController {
    library: Library,
    view: ViewState,
    volume_step: i32,
    header_text: String,
    window_rows: usize,
    window_lead: usize,
    notice: Option<String>,
}

impl NavigationController {
    pub fn new(library: Library, settings: &Settings) -> Self {
        let view = ViewState::albums(library.albums().clone());
        Self {
            library,
            view,
            volume_step: settings.player.volume_step,
            header_text: settings.ui.header_text.clone(),
            window_rows: settings.ui.window_rows,
            window_lead: settings.ui.window_lead,
            notice: None,
        }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    #[cfg(test)]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn mode(&self) -> ViewMode {
        self.view.mode
    }

    #[cfg(test)]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Swap in a freshly indexed library and return to the full album list.
    pub fn replace_library(&mut self, library: Library) {
        self.library = library;
        self.view = ViewState::albums(self.library.albums().clone());
    }

    /// Apply one intent.
    pub fn handle(&mut self, intent: Intent, session: &mut PlayerSession) {
        match intent {
            Intent::Up => self.move_up(),
            Intent::Down => self.move_down(),
            Intent::Select => self.select(session),
            Intent::Back => self.back(),
            Intent::Search => self.enter_search(),
            Intent::Input(c) => self.push_query_char(c),
            Intent::Backspace => self.pop_query_char(),
            Intent::Play => self.play(session),
            Intent::Shuffle => {
                if self.view.mode == ViewMode::Albums {
                    session.play_shuffle_all(self.library.root());
                }
            }
            Intent::Advance => self.advance(session),
            Intent::TogglePause => session.toggle_pause(),
            Intent::VolumeUp => session.adjust_volume(self.volume_step),
            Intent::VolumeDown => session.adjust_volume(-self.volume_step),
        }
    }

    /// Build the render model for the current view.
    pub fn render(&self, session: &PlayerSession) -> RenderModel {
        render::build(
            &self.view,
            session.state(),
            &render::Frame {
                title: &self.header_text,
                rows: self.window_rows,
                lead: self.window_lead,
            },
            self.notice.as_deref(),
            &self.library,
        )
    }

    /// Move selection up; stops at the first row.
    fn move_up(&mut self) {
        self.view.selected = self.view.selected.saturating_sub(1);
    }

    /// Move selection down; stops at the last row.
    fn move_down(&mut self) {
        if self.view.selected + 1 < self.view.len() {
            self.view.selected += 1;
        }
    }

    fn select(&mut self, session: &mut PlayerSession) {
        match self.view.mode {
            ViewMode::Albums => {
                let Some(album) = self.view.selected_album().cloned() else {
                    return;
                };
                debug!(album = %album.short_name(), "opening album");
                self.view.mode = ViewMode::Tracks;
                self.view.album = Some(album);
                self.view.selected = 0;
            }
            ViewMode::Tracks => {
                let Some(album) = self.view.album.clone() else {
                    return;
                };
                if let Some(track) = album.tracks.get(self.view.selected) {
                    session.play_track(track, &album, self.view.selected);
                }
            }
            ViewMode::Search => self.commit_search(),
        }
    }

    fn back(&mut self) {
        match self.view.mode {
            ViewMode::Tracks => {
                self.view.mode = ViewMode::Albums;
                self.view.album = None;
                self.view.selected = 0;
            }
            ViewMode::Search => {
                self.view = ViewState::albums(self.library.albums().clone());
            }
            ViewMode::Albums => {
                if self.view.filter.is_some() {
                    self.view = ViewState::albums(self.library.albums().clone());
                }
            }
        }
    }

    fn enter_search(&mut self) {
        if self.view.mode != ViewMode::Albums {
            return;
        }
        self.view.mode = ViewMode::Search;
        self.view.query.clear();
        self.view.filter = None;
        self.view.albums = self.library.albums().clone();
        self.view.selected = 0;
    }

    fn push_query_char(&mut self, c: char) {
        if self.view.mode != ViewMode::Search {
            return;
        }
        self.view.query.push(c);
        self.refresh_search();
    }

    fn pop_query_char(&mut self) {
        if self.view.mode != ViewMode::Search {
            return;
        }
        self.view.query.pop();
        self.refresh_search();
    }

    fn refresh_search(&mut self) {
        self.view.albums = self.library.search(&self.view.query);
        self.view.selected = 0;
    }

    fn commit_search(&mut self) {
        let query = std::mem::take(&mut self.view.query);
        self.view.mode = ViewMode::Albums;
        self.view.filter = if query.trim().is_empty() {
            None
        } else {
            Some(query)
        };
        if self.view.selected >= self.view.albums.len() {
            self.view.selected = 0;
        }
    }

    fn play(&mut self, session: &mut PlayerSession) {
        let album = match self.view.mode {
            ViewMode::Albums => self.view.selected_album().cloned(),
            ViewMode::Tracks => self.view.album.clone(),
            ViewMode::Search => None,
        };
        if let Some(album) = album {
            session.play_album(&album);
        }
    }

    fn advance(&mut self, session: &mut PlayerSession) {
        let Some(index) = session.next(&self.library) else {
            return;
        };
        // Keep the highlight on the audible track when its album is open.
        if self.view.mode == ViewMode::Tracks {
            if let Some(album) = &self.view.album {
                if session.state().is_album(album) {
                    self.view.selected = index;
                }
            }
        }
    }
}
