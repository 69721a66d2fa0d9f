use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::model::{Album, Track};
use super::scan::{ScanReport, sort_albums};

/// Shared, read-only list of albums. Cloning it is a reference-count bump.
pub type AlbumList = Arc<Vec<Arc<Album>>>;

/// The indexed album collection of one library root.
///
/// The list itself is never mutated: a re-index builds a complete new list
/// and swaps it in, so holders of an older `AlbumList` keep a consistent view.
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
    albums: AlbumList,
}

impl Library {
    /// Build a library from already indexed albums.
    ///
    /// Empty albums are dropped and the (artist, name) ordering is enforced.
    pub fn new(root: PathBuf, albums: Vec<Arc<Album>>) -> Self {
        let mut albums: Vec<Arc<Album>> =
            albums.into_iter().filter(|a| !a.tracks.is_empty()).collect();
        sort_albums(&mut albums);
        Self {
            root,
            albums: Arc::new(albums),
        }
    }

    pub fn from_report(root: PathBuf, report: &ScanReport) -> Self {
        Self::new(root, report.albums.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn albums(&self) -> &AlbumList {
        &self.albums
    }

    pub fn album_count(&self) -> usize {
        self.albums.len()
    }

    pub fn track_count(&self) -> usize {
        self.all_tracks().count()
    }

    /// Sum of the known durations of every album.
    pub fn total_duration(&self) -> Duration {
        self.albums.iter().map(|a| a.total_duration()).sum()
    }

    /// The album whose directory is `path`.
    pub fn album(&self, path: &Path) -> Option<&Arc<Album>> {
        self.albums.iter().find(|a| a.path == path)
    }

    /// Albums whose name, artist or any track title contains `term`, ignoring case.
    ///
    /// A blank term returns the shared full list itself rather than a copy.
    pub fn search(&self, term: &str) -> AlbumList {
        if term.trim().is_empty() {
            return Arc::clone(&self.albums);
        }
        let needle = term.to_lowercase();
        self.filter(|album| {
            contains_ignore_case(&album.name, &needle)
                || contains_ignore_case(&album.artist, &needle)
                || album
                    .tracks
                    .iter()
                    .any(|t| contains_ignore_case(&t.title, &needle))
        })
    }

    /// Like [`Library::search`], restricted to the album artist.
    pub fn by_artist(&self, term: &str) -> AlbumList {
        if term.trim().is_empty() {
            return Arc::clone(&self.albums);
        }
        let needle = term.to_lowercase();
        self.filter(|album| contains_ignore_case(&album.artist, &needle))
    }

    /// Distinct album artists, sorted.
    pub fn artists(&self) -> Vec<String> {
        let mut artists: Vec<String> = self.albums.iter().map(|a| a.artist.clone()).collect();
        artists.sort();
        artists.dedup();
        artists
    }

    /// Every track in album order.
    pub fn all_tracks(&self) -> impl Iterator<Item = &Track> {
        self.albums.iter().flat_map(|a| a.tracks.iter())
    }

    fn filter(&self, keep: impl Fn(&Album) -> bool) -> AlbumList {
        Arc::new(
            self.albums
                .iter()
                .filter(|a| keep(a))
                .cloned()
                .collect(),
        )
    }
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
