//! Session lifecycle and playback state types.

use std::path::PathBuf;

use crate::library::Album;

/// Lifecycle of the player process and its control channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Starting,
    Ready,
    /// Bootstrap failed; every control intent is ignored.
    Degraded,
    Closed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    #[default]
    Stopped,
    PlayingTrack,
    PlayingAlbum,
    ShuffleAll,
}

/// Last commanded playback state.
///
/// This reflects what was most recently sent to the player, never a
/// confirmed player state: there is no feedback channel.
#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    pub mode: PlaybackMode,
    /// Directory of the album being played. It is looked up in whichever
    /// library is current, so it stays valid across a re-index.
    pub album: Option<PathBuf>,
    /// Index within `album`; only set in `PlayingTrack`/`PlayingAlbum`.
    pub index: Option<usize>,
    pub paused: bool,
    /// Label of what was last started (a track name or `Shuffle Mode`).
    pub now_playing: Option<String>,
}

impl PlaybackState {
    /// Whether `album` is the album this state refers to.
    pub fn is_album(&self, album: &Album) -> bool {
        self.album.as_deref() == Some(album.path.as_path())
    }

    /// Whether the given row of `album` is the track last started.
    pub fn is_track(&self, album: &Album, index: usize) -> bool {
        matches!(
            self.mode,
            PlaybackMode::PlayingTrack | PlaybackMode::PlayingAlbum
        ) && self.index == Some(index)
            && self.is_album(album)
    }
}
