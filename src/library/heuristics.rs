//! Filename and directory-name heuristics.
//!
//! No tags are read anywhere in the indexer; everything a `Track` or `Album`
//! knows about itself is inferred here from names alone. All functions are
//! pure and return best-effort defaults instead of failing.

/// Track number used when a filename carries none.
pub const UNKNOWN_TRACK_NUMBER: u32 = 0;

/// Separators tried (earliest occurrence wins) when stripping a leading
/// track number from a title.
const TITLE_SEPARATORS: [&str; 2] = [" - ", ". "];

/// Parse the leading track number of a file stem such as `03 - Intro`.
///
/// The stem is split on spaces, hyphens and periods; if the first non-empty
/// token is an integer it is returned, otherwise `UNKNOWN_TRACK_NUMBER`.
pub fn extract_track_number(stem: &str) -> u32 {
    stem.split([' ', '-', '.'])
        .find(|token| !token.is_empty())
        .and_then(|token| token.parse::<u32>().ok())
        .unwrap_or(UNKNOWN_TRACK_NUMBER)
}

/// Strip a leading track number (and its separator) from a file stem.
///
/// `03 - Intro` and `03. Intro` become `Intro`. Stems without a leading
/// number are returned unchanged.
pub fn clean_track_title(stem: &str) -> String {
    if let Some((head, rest)) = split_once_any(stem, &TITLE_SEPARATORS) {
        if is_number(head.trim()) && !rest.is_empty() {
            return rest.to_string();
        }
    }

    // Looser layouts like `03 Intro` or `03-Intro`.
    let digits = stem.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        let rest = stem[digits..].trim_start_matches([' ', '-', '.']);
        if rest.len() < stem.len() - digits && !rest.is_empty() {
            return rest.to_string();
        }
    }

    stem.to_string()
}

/// Split an `Artist - Album` directory name at its first ` - `.
///
/// Both halves are trimmed. Returns `None` when the name has no separator.
pub fn split_directory_name(name: &str) -> Option<(String, String)> {
    name.split_once(" - ")
        .map(|(artist, album)| (artist.trim().to_string(), album.trim().to_string()))
}

fn split_once_any<'a>(s: &'a str, separators: &[&str]) -> Option<(&'a str, &'a str)> {
    separators
        .iter()
        .filter_map(|sep| s.find(sep).map(|pos| (pos, sep.len())))
        .min_by_key(|&(pos, _)| pos)
        .map(|(pos, len)| (&s[..pos], &s[pos + len..]))
}

fn is_number(s: &str) -> bool {
    s.parse::<u32>().is_ok()
}
