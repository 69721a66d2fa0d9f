use std::path::PathBuf;
use std::time::Duration;

/// Artist used when nothing better can be inferred.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// `0` when the filename carries no number.
    pub track_number: u32,
    /// Always `None` today: durations would need tag reading.
    pub duration: Option<Duration>,
}

impl Track {
    /// `NN - Title`, or the file stem when the title is empty.
    pub fn display_name(&self) -> String {
        if self.title.is_empty() {
            self.path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            format!("{:02} - {}", self.track_number, self.title)
        }
    }
}

/// One directory that directly contains supported audio files.
///
/// `tracks` keep filename sort order, which is not necessarily track-number order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub path: PathBuf,
    pub name: String,
    pub artist: String,
    pub tracks: Vec<Track>,
}

impl Album {
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Sum of the known track durations.
    pub fn total_duration(&self) -> Duration {
        self.tracks.iter().filter_map(|t| t.duration).sum()
    }

    fn has_known_artist(&self) -> bool {
        !self.artist.is_empty() && self.artist != UNKNOWN_ARTIST
    }

    /// `Artist - Name`, or just `Name` for an unknown artist.
    pub fn short_name(&self) -> String {
        if self.has_known_artist() {
            format!("{} - {}", self.artist, self.name)
        } else {
            self.name.clone()
        }
    }

    /// `short_name` followed by the track count, as shown in album lists.
    pub fn display_name(&self) -> String {
        format!("{} [{} tracks]", self.short_name(), self.track_count())
    }
}
