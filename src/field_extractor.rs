//! Derive search guesses, summaries and basic data from a [`TagSet`].

use std::path::Path;

use crate::tag_adapter::{TagSet, TextField};

/// What the local files are matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Album,
    Song,
}

/// Format-agnostic projection of a tag's core fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicTrackData {
    pub album: String,
    pub artist: String,
    pub album_artist: String,
    pub title: String,
    pub track: Option<u32>,
    pub total_tracks: Option<u32>,
    pub disc: Option<u32>,
    pub total_discs: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicAlbumData {
    pub name: String,
    pub artist: String,
    pub total_tracks: Option<u32>,
}

/// Legacy report encoding of an unknown number.
pub fn sentinel(value: Option<u32>) -> i64 {
    value.map_or(-1, i64::from)
}

/// Split `"7/12"` into its number and total.
pub fn parse_position(raw: Option<&str>) -> (Option<u32>, Option<u32>) {
    let Some(raw) = raw else { return (None, None) };
    let mut parts = raw.trim().splitn(2, '/');
    let number = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    let total = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    (number, total)
}

/// First non-empty of the two fields.
fn either(tags: &TagSet, first: TextField, second: TextField) -> Option<String> {
    tags.text(first).or_else(|| tags.text(second))
}

/// Build `(summary, guess)` for the search prompt.
///
/// Album mode: `"albumArtist - album (N tracks)"`, comparing the embedded
/// total against `file_count`.  Song mode: `"artist - title (#7/12)"`.
pub fn guess_and_info(tags: &TagSet, mode: SearchMode, file_count: usize) -> (String, String) {
    let (head, tail) = match mode {
        SearchMode::Album => (
            either(tags, TextField::AlbumArtist, TextField::Artist),
            tags.text(TextField::Album),
        ),
        SearchMode::Song => (
            either(tags, TextField::Artist, TextField::AlbumArtist),
            either(tags, TextField::Title, TextField::Album),
        ),
    };

    let mut guess = head.unwrap_or_default();
    if let Some(tail) = tail {
        guess.push_str(&format!(" - {}", tail));
    }

    let mut summary = guess.clone();
    match mode {
        SearchMode::Album => {
            let position = tags.track_position();
            let total = position
                .as_deref()
                .filter(|p| p.contains('/'))
                .and_then(|p| parse_position(Some(p)).1);
            match total {
                Some(total) if total as usize == file_count => {
                    summary.push_str(&format!(" ({} tracks)", total))
                }
                Some(total) => {
                    summary.push_str(&format!(" ({} tracks, {} files)", total, file_count))
                }
                None => summary.push_str(&format!(" ({} files)", file_count)),
            }
        }
        SearchMode::Song => {
            if let Some(position) = tags.track_position() {
                summary.push_str(&format!(" (#{})", position));
            }
        }
    }

    (summary, guess)
}

/// Pad a numeric component to 2 digits, or right-align raw text.
fn pad_component(raw: &str) -> String {
    match raw.trim().parse::<u32>() {
        Ok(n) => format!("{:02}", n),
        Err(_) => format!("{:>2}", raw),
    }
}

/// One line per file: `"(07/12) artist - title"`.
///
/// Returns `""` when the tag has nothing to show so callers can use the
/// file name instead.
pub fn track_summary(tags: &TagSet) -> String {
    let mut line = match tags.track_position() {
        Some(raw) => match raw.split_once('/') {
            Some((number, total)) => {
                format!("({}/{}) ", pad_component(number), pad_component(total))
            }
            None => format!("({}/ ?) ", pad_component(&raw)),
        },
        None => "( ?/? ) ".to_string(),
    };

    match either(tags, TextField::Artist, TextField::AlbumArtist) {
        Some(artist) => line.push_str(&artist),
        None => line.push_str("  "),
    }

    if let Some(title) = tags.text(TextField::Title) {
        line.push_str(&format!(" - {}", title));
    }

    if line.trim() == "( ?/? )" {
        return String::new();
    }
    line
}

pub fn basic_track_data(tags: &TagSet) -> BasicTrackData {
    let (track, total_tracks) = parse_position(tags.track_position().as_deref());
    let (disc, total_discs) = parse_position(tags.disc_position().as_deref());

    BasicTrackData {
        album: tags.text(TextField::Album).unwrap_or_default(),
        artist: either(tags, TextField::Artist, TextField::AlbumArtist).unwrap_or_default(),
        album_artist: either(tags, TextField::AlbumArtist, TextField::Artist).unwrap_or_default(),
        title: tags.text(TextField::Title).unwrap_or_default(),
        track,
        total_tracks,
        disc,
        total_discs,
    }
}

pub fn basic_album_data(tags: &TagSet) -> BasicAlbumData {
    let (_, total_tracks) = parse_position(tags.track_position().as_deref());
    BasicAlbumData {
        name: tags.text(TextField::Album).unwrap_or_default(),
        artist: either(tags, TextField::AlbumArtist, TextField::Artist).unwrap_or_default(),
        total_tracks,
    }
}

/// Query fallback when the tags yield nothing: the file stem for a song,
/// the containing directory for an album.
pub fn file_name_guess(path: &Path, mode: SearchMode) -> String {
    let name = match mode {
        SearchMode::Song => path.file_stem(),
        SearchMode::Album => path.parent().and_then(|p| p.file_name()),
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
