//! Terminal-independent render model.
//!
//! The presentation layer draws a `RenderModel` as-is; nothing here knows
//! about terminal geometry.

use crate::library::Library;
use crate::player::{PlaybackMode, PlaybackState};

use super::model::{ViewMode, ViewState};

/// One visible list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub text: String,
    pub selected: bool,
    /// The album or track last started.
    pub playing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    /// Fixed banner text.
    pub title: String,
    /// Mode header, e.g. `Albums` or the open album's name.
    pub header: String,
    /// Windowed slice of the active list.
    pub rows: Vec<Row>,
    /// Index of the active list's first visible row.
    pub offset: usize,
    /// Length of the active list.
    pub total: usize,
    pub status: String,
    /// The literal query buffer, only in Search mode.
    pub query: Option<String>,
    pub notice: Option<String>,
    /// Library size, e.g. `12 albums, 140 tracks`.
    pub summary: String,
}

/// Fixed presentation parameters.
pub(crate) struct Frame<'a> {
    pub title: &'a str,
    pub rows: usize,
    pub lead: usize,
}

pub(crate) fn build(
    view: &ViewState,
    state: &PlaybackState,
    frame: &Frame<'_>,
    notice: Option<&str>,
    library: &Library,
) -> RenderModel {
    let total = view.len();
    let (offset, end) = window(view.selected, total, frame.rows, frame.lead);

    let rows = match (view.mode, &view.album) {
        (ViewMode::Tracks, Some(album)) => (offset..end)
            .map(|i| Row {
                text: album.tracks[i].display_name(),
                selected: i == view.selected,
                playing: state.is_track(album, i),
            })
            .collect(),
        (ViewMode::Tracks, None) => Vec::new(),
        (ViewMode::Albums | ViewMode::Search, _) => view.albums[offset..end]
            .iter()
            .enumerate()
            .map(|(k, album)| Row {
                text: album.display_name(),
                selected: offset + k == view.selected,
                playing: state.mode != PlaybackMode::Stopped && state.is_album(album),
            })
            .collect(),
    };

    RenderModel {
        title: frame.title.to_string(),
        header: header(view),
        rows,
        offset,
        total,
        status: status_line(state, library),
        query: (view.mode == ViewMode::Search).then(|| view.query.clone()),
        notice: notice.map(str::to_string),
        summary: format!(
            "{} albums, {} tracks",
            library.album_count(),
            library.track_count()
        ),
    }
}

/// Visible `[start, end)` range: start is `selected - lead` (floored at 0),
/// and at most `rows` rows are shown.
pub fn window(selected: usize, total: usize, rows: usize, lead: usize) -> (usize, usize) {
    let start = selected.saturating_sub(lead).min(total);
    let end = (start + rows).min(total);
    (start, end)
}

fn header(view: &ViewState) -> String {
    match view.mode {
        ViewMode::Albums => match &view.filter {
            Some(filter) => format!("Albums matching \"{filter}\""),
            None => "Albums".to_string(),
        },
        ViewMode::Tracks => match &view.album {
            Some(album) => format!("Album: {}", album.short_name()),
            None => "Album".to_string(),
        },
        ViewMode::Search => "Search albums".to_string(),
    }
}

/// One-line summary of the last commanded playback state.
///
/// The album is resolved in `library`; a key that is no longer indexed
/// falls back to the last started label.
pub fn status_line(state: &PlaybackState, library: &Library) -> String {
    let verb = if state.paused { "Paused" } else { "Playing" };
    let label = state.now_playing.as_deref().unwrap_or_default();
    let album = state.album.as_deref().and_then(|path| library.album(path));
    match state.mode {
        PlaybackMode::Stopped => "Stopped".to_string(),
        PlaybackMode::ShuffleAll => format!("{verb}: {label}"),
        PlaybackMode::PlayingAlbum => match album {
            Some(album) => format!("{verb} album: {}", album.display_name()),
            None => format!("{verb} album: {label}"),
        },
        PlaybackMode::PlayingTrack => match album {
            Some(album) => format!("{verb}: {label} ({})", album.short_name()),
            None => format!("{verb}: {label}"),
        },
    }
}
