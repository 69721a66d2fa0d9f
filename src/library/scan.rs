use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::heuristics::{clean_track_title, extract_track_number, split_directory_name};
use super::model::{Album, Track, UNKNOWN_ARTIST};

/// What happened to one directory during a scan.
#[derive(Debug)]
pub enum DirectoryOutcome {
    /// The directory became an album with this many tracks.
    Album { path: PathBuf, tracks: usize },
    /// Readable, but holds no supported audio files of its own.
    NoAudio { path: PathBuf },
    /// Access was denied; the subtree was pruned without complaint.
    Skipped { path: PathBuf },
    /// Any other read error; the subtree was abandoned.
    Failed { path: PathBuf, error: walkdir::Error },
}

#[cfg(test)]
impl DirectoryOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Album { path, .. }
            | Self::NoAudio { path }
            | Self::Skipped { path }
            | Self::Failed { path, .. } => path,
        }
    }
}

/// Result of indexing one library root.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Albums sorted by artist then name, case-insensitively.
    pub albums: Vec<Arc<Album>>,
    /// One entry per visited directory, in walk order.
    pub outcomes: Vec<DirectoryOutcome>,
    /// Audio files that could not be read or turned into a track.
    pub dropped_files: Vec<PathBuf>,
}

impl ScanReport {
    pub fn album_count(&self) -> usize {
        self.albums.len()
    }

    pub fn track_count(&self) -> usize {
        self.albums.iter().map(|a| a.track_count()).sum()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|o| match o {
            DirectoryOutcome::Skipped { path } => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &walkdir::Error)> {
        self.outcomes.iter().filter_map(|o| match o {
            DirectoryOutcome::Failed { path, error } => Some((path.as_path(), error)),
            _ => None,
        })
    }
}

enum DirStatus {
    Read,
    Skipped,
    Failed(walkdir::Error),
}

struct DirectoryScan {
    path: PathBuf,
    files: Vec<PathBuf>,
    status: DirStatus,
}

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_permission_denied(err: &walkdir::Error) -> bool {
    err.io_error()
        .map(|e| e.kind() == io::ErrorKind::PermissionDenied)
        .unwrap_or(false)
}

/// Walk `root` depth-first and build one album per directory that directly
/// contains supported audio files.
///
/// Directories holding only subdirectories are never albums themselves, but
/// an album directory may contain further albums. Scan errors never abort
/// the walk: they are recorded as [`DirectoryOutcome`]s and sibling subtrees
/// are still visited.
pub fn index(root: &Path, settings: &LibrarySettings) -> ScanReport {
    info!(root = %root.display(), "indexing library");

    let extensions = normalized_extensions(settings);
    let mut report = ScanReport::default();
    let mut dirs: Vec<DirectoryScan> = Vec::new();
    let mut by_path: HashMap<PathBuf, usize> = HashMap::new();

    let walker = WalkDir::new(root)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_dir() {
                    by_path.insert(path.to_path_buf(), dirs.len());
                    dirs.push(DirectoryScan {
                        path: path.to_path_buf(),
                        files: Vec::new(),
                        status: DirStatus::Read,
                    });
                } else if is_audio_file(path, &extensions) {
                    let slot = path.parent().and_then(|p| by_path.get(p)).copied();
                    if let Some(i) = slot {
                        dirs[i].files.push(path.to_path_buf());
                    }
                }
            }
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                let slot = by_path.get(&path).copied();

                // A directory is yielded before its listing is read, so a
                // listing error names a known directory. Only the root can
                // fail before it is yielded. Anything else is a single entry,
                // such as a dangling link or a link loop.
                if slot.is_none() && err.depth() > 0 {
                    if is_audio_file(&path, &extensions) {
                        debug!(path = %path.display(), error = %err, "dropping unreadable file");
                        report.dropped_files.push(path);
                    } else {
                        debug!(path = %path.display(), error = %err, "ignoring unreadable entry");
                    }
                    continue;
                }

                let status = if is_permission_denied(&err) {
                    debug!(path = %path.display(), "access denied, skipping directory");
                    DirStatus::Skipped
                } else {
                    warn!(path = %path.display(), error = %err, "failed to read directory");
                    DirStatus::Failed(err)
                };
                match slot {
                    Some(i) => dirs[i].status = status,
                    None => dirs.push(DirectoryScan {
                        path,
                        files: Vec::new(),
                        status,
                    }),
                }
            }
        }
    }

    for dir in dirs {
        let outcome = match dir.status {
            DirStatus::Skipped => DirectoryOutcome::Skipped { path: dir.path },
            DirStatus::Failed(error) => DirectoryOutcome::Failed {
                path: dir.path,
                error,
            },
            DirStatus::Read if dir.files.is_empty() => DirectoryOutcome::NoAudio { path: dir.path },
            DirStatus::Read => {
                let album = build_album(&dir.path, dir.files, &mut report.dropped_files);
                match album {
                    Some(album) => {
                        let outcome = DirectoryOutcome::Album {
                            path: dir.path,
                            tracks: album.track_count(),
                        };
                        report.albums.push(Arc::new(album));
                        outcome
                    }
                    None => DirectoryOutcome::NoAudio { path: dir.path },
                }
            }
        };
        report.outcomes.push(outcome);
    }

    sort_albums(&mut report.albums);

    info!(
        albums = report.album_count(),
        tracks = report.track_count(),
        skipped = report.skipped().count(),
        failed = report.failed().count(),
        "library indexed"
    );
    report
}

/// Run [`index`] on a dedicated thread.
pub fn spawn_index(root: PathBuf, settings: LibrarySettings) -> io::Result<JoinHandle<ScanReport>> {
    thread::Builder::new()
        .name("library-index".to_string())
        .spawn(move || index(&root, &settings))
}

/// Stable sort by (artist, name), ignoring case.
pub(crate) fn sort_albums(albums: &mut [Arc<Album>]) {
    albums.sort_by_cached_key(|a| (a.artist.to_lowercase(), a.name.to_lowercase()));
}

fn directory_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn build_album(dir: &Path, mut files: Vec<PathBuf>, dropped: &mut Vec<PathBuf>) -> Option<Album> {
    let dir_name = directory_name(dir);

    // Lexicographic, so "10 - x" sorts before "2 - y".
    files.sort();

    let mut tracks = Vec::with_capacity(files.len());
    for file in files {
        match track_from_path(&file, &dir_name) {
            Some(track) => tracks.push(track),
            None => {
                debug!(path = %file.display(), "dropping file with unusable name");
                dropped.push(file);
            }
        }
    }

    if tracks.is_empty() {
        return None;
    }

    let mut artist = majority_artist(&tracks).unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
    let mut name = dir_name;
    if let Some((dir_artist, dir_album)) = split_directory_name(&name) {
        artist = dir_artist;
        name = dir_album;
    }

    Some(Album {
        path: dir.to_path_buf(),
        name,
        artist,
        tracks,
    })
}

fn track_from_path(path: &Path, album_name: &str) -> Option<Track> {
    let stem = path.file_stem()?.to_str()?;
    Some(Track {
        path: path.to_path_buf(),
        title: clean_track_title(stem),
        artist: UNKNOWN_ARTIST.to_string(),
        album: album_name.to_string(),
        track_number: extract_track_number(stem),
        duration: None,
    })
}

/// Most frequent track artist; ties go to the one seen first.
pub(crate) fn majority_artist(tracks: &[Track]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for track in tracks {
        match counts.iter().position(|(artist, _)| *artist == track.artist) {
            Some(i) => counts[i].1 += 1,
            None => counts.push((track.artist.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (artist, n) in counts {
        if best.map(|(_, m)| n > m).unwrap_or(true) {
            best = Some((artist, n));
        }
    }
    best.map(|(artist, _)| artist.to_string())
}
