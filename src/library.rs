//! Library indexing: turns a directory tree into sorted albums.
//!
//! Everything is inferred from directory and file names. `scan` walks the
//! tree, `heuristics` reads names, and `index::Library` holds the result and
//! answers searches.

mod heuristics;
mod index;
mod model;
mod scan;

pub use index::{AlbumList, Library};
pub use model::{Album, Track};
#[cfg(test)]
pub(crate) use model::UNKNOWN_ARTIST;
pub use scan::{ScanReport, spawn_index};
