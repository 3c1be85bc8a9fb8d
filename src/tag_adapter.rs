//! Uniform read/write model over the two supported tag containers.
//!
//! A [`TagSet`] is a tagged union holding the native tag of one file:
//!
//! * `.mp3` → [`TagSet::Id3`], keyed by four-letter frame ids (`TIT2`, `TRCK`, …)
//! * `.m4a` → [`TagSet::Mp4`], keyed by atom codes (`©nam`, `trkn`, …)
//!
//! The format is chosen from the file extension only.  Field access and
//! mutation are dispatched to [`crate::tag_id3`] or [`crate::tag_mp4`] by
//! matching on the variant, so a setter can never touch a foreign key.

use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::tag_id3;
use crate::tag_mp4;

/// Disc position written after a clean wipe; players treat a missing one as broken.
pub const DEFAULT_DISC_POSITION: (u32, u32) = (1, 1);

/// Longest value shown in reports before truncation.
pub const REPORT_VALUE_WIDTH: usize = 50;
pub const TRUNCATION_MARKER: &str = "... ... ...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFormat {
    Id3,
    Mp4,
}

impl TagFormat {
    /// Select the container by extension: `.mp3` is ID3, `.m4a` is MPEG-4.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("mp3") => Ok(TagFormat::Id3),
            Some("m4a") => Ok(TagFormat::Mp4),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TagFormat::Id3 => "mp3",
            TagFormat::Mp4 => "mp4",
        }
    }
}

/// Text fields every container can answer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Artist,
    AlbumArtist,
    Album,
    Date,
    Genre,
    Publisher,
}

/// The embedded tag of one file.
#[derive(Debug, Clone)]
pub enum TagSet {
    Id3(id3::Tag),
    Mp4(mp4ameta::Tag),
}

impl TagSet {
    /// An empty tag of the given format.
    pub fn empty(format: TagFormat) -> Self {
        match format {
            TagFormat::Id3 => TagSet::Id3(id3::Tag::new()),
            TagFormat::Mp4 => TagSet::Mp4(mp4ameta::Tag::default()),
        }
    }

    pub fn format(&self) -> TagFormat {
        match self {
            TagSet::Id3(_) => TagFormat::Id3,
            TagSet::Mp4(_) => TagFormat::Mp4,
        }
    }

    /// Non-empty text value of a field, if present.
    pub fn text(&self, field: TextField) -> Option<String> {
        let value = match self {
            TagSet::Id3(tag) => tag_id3::text(tag, field),
            TagSet::Mp4(tag) => tag_mp4::text(tag, field),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Raw track position as stored, e.g. `"07/12"` or `"7"`.
    pub fn track_position(&self) -> Option<String> {
        match self {
            TagSet::Id3(tag) => tag_id3::track_position(tag),
            TagSet::Mp4(tag) => tag_mp4::track_position(tag),
        }
        .filter(|v| !v.trim().is_empty())
    }

    /// Raw disc position as stored, e.g. `"1/2"`.
    pub fn disc_position(&self) -> Option<String> {
        match self {
            TagSet::Id3(tag) => tag_id3::disc_position(tag),
            TagSet::Mp4(tag) => tag_mp4::disc_position(tag),
        }
        .filter(|v| !v.trim().is_empty())
    }

    /// Every entry as (format-specific key, display value), in container order.
    pub fn entries(&self) -> Vec<(String, String)> {
        match self {
            TagSet::Id3(tag) => tag_id3::entries(tag),
            TagSet::Mp4(tag) => tag_mp4::entries(tag),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Sparse set of field updates.  `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdate {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub album: Option<String>,
    pub track: Option<u32>,
    pub total_tracks: Option<u32>,
    pub disc: Option<u32>,
    pub total_discs: Option<u32>,
    pub date: Option<String>,
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub catalog_id: Option<u64>,
    pub artist_id: Option<u64>,
    pub album_id: Option<u64>,
}

impl FieldUpdate {
    /// Artist and album artist after mutual auto-fill: whichever one is
    /// given fills the other when that one is absent.
    pub fn artist_pair(&self) -> (Option<&str>, Option<&str>) {
        let artist = self.artist.as_deref().or(self.album_artist.as_deref());
        let album_artist = self.album_artist.as_deref().or(self.artist.as_deref());
        (artist, album_artist)
    }

    /// Names and display values of every field this update sets.
    pub fn set_fields(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let (artist, album_artist) = self.artist_pair();
        if let Some(v) = &self.title {
            out.push(("title", v.clone()));
        }
        if let Some(v) = artist {
            out.push(("artist", v.to_string()));
        }
        if let Some(v) = album_artist {
            out.push(("albumArtist", v.to_string()));
        }
        if let Some(v) = &self.album {
            out.push(("album", v.clone()));
        }
        if let Some(track) = self.track {
            out.push(("track", format_track_position(track, self.total_tracks)));
        }
        if let Some(disc) = self.disc {
            out.push(("disc", format_disc_position(disc, self.total_discs)));
        }
        if let Some(v) = &self.date {
            out.push(("date", year_of(v).to_string()));
        }
        if let Some(v) = &self.genre {
            out.push(("genre", v.clone()));
        }
        if let Some(v) = &self.publisher {
            out.push(("publisher", v.clone()));
        }
        if let Some(v) = self.catalog_id {
            out.push(("catalogId", v.to_string()));
        }
        if let Some(v) = self.artist_id {
            out.push(("artistId", v.to_string()));
        }
        if let Some(v) = self.album_id {
            out.push(("albumId", v.to_string()));
        }
        out
    }
}

/// `"N/M"` zero-padded to 2 digits, or 3 when the total exceeds 99.
/// Without a total the track alone is padded to 2 digits.
pub fn format_track_position(track: u32, total: Option<u32>) -> String {
    match total {
        Some(total) if total > 99 => format!("{:03}/{:03}", track, total),
        Some(total) => format!("{:02}/{:02}", track, total),
        None => format!("{:02}", track),
    }
}

/// `"D/T"` or `"D"`, never padded.
pub fn format_disc_position(disc: u32, total: Option<u32>) -> String {
    match total {
        Some(total) => format!("{}/{}", disc, total),
        None => disc.to_string(),
    }
}

/// Year part of a release date (`"2017-10-27T07:00:00Z"` → `"2017"`).
pub fn year_of(date: &str) -> &str {
    match date.char_indices().nth(4) {
        Some((idx, _)) => &date[..idx],
        None => date,
    }
}

/// Shorten a value for reports, marking the cut.
pub fn truncate_for_report(value: &str) -> String {
    if value.chars().count() > REPORT_VALUE_WIDTH {
        let head: String = value.chars().take(REPORT_VALUE_WIDTH).collect();
        format!("{}{}", head, TRUNCATION_MARKER)
    } else {
        value.to_string()
    }
}

/// Read the tag of one file.
pub fn read(path: &Path) -> Result<TagSet> {
    let tags = match TagFormat::from_path(path)? {
        TagFormat::Id3 => TagSet::Id3(tag_id3::read(path)?),
        TagFormat::Mp4 => TagSet::Mp4(tag_mp4::read(path)?),
    };
    debug!("Read {} tag from {}", tags.format().name(), path.display());
    Ok(tags)
}

/// First of `paths` whose tag can be read.  Unreadable files are logged
/// and skipped.
pub fn read_first<P: AsRef<Path>>(paths: &[P]) -> Option<(usize, TagSet)> {
    for (index, path) in paths.iter().enumerate() {
        match read(path.as_ref()) {
            Ok(tags) => return Some((index, tags)),
            Err(e) => warn!("{}", e),
        }
    }
    None
}

/// Like [`read_first`], but falls back to an empty tag for the first path
/// when nothing reads.  The empty tag takes its format from that path's
/// extension, or ID3 if it has none.
pub fn read_first_or_empty<P: AsRef<Path>>(paths: &[P]) -> (usize, TagSet) {
    read_first(paths).unwrap_or_else(|| {
        warn!("No readable tags in any file");
        let format = paths
            .first()
            .and_then(|p| TagFormat::from_path(p.as_ref()).ok())
            .unwrap_or(TagFormat::Id3);
        (0, TagSet::empty(format))
    })
}

/// Apply field updates in memory.  With `clean` all existing entries are
/// dropped first and the default disc position is re-established.
pub fn apply(tags: &mut TagSet, fields: &FieldUpdate, artwork: Option<&[u8]>, clean: bool) {
    match tags {
        TagSet::Id3(tag) => tag_id3::apply(tag, fields, artwork, clean),
        TagSet::Mp4(tag) => tag_mp4::apply(tag, fields, artwork, clean),
    }
}

/// Apply field updates and save them to `path`.  Returns the saved tag.
pub fn write(
    path: &Path,
    mut tags: TagSet,
    fields: &FieldUpdate,
    artwork: Option<&[u8]>,
    clean: bool,
) -> Result<TagSet> {
    if TagFormat::from_path(path)? != tags.format() {
        return Err(Error::UnsupportedFormat(path.to_path_buf()));
    }

    apply(&mut tags, fields, artwork, clean);
    save(path, &tags)?;
    Ok(tags)
}

/// Save a tag as is.  Failures are reported as [`Error::WriteFailed`].
pub fn save(path: &Path, tags: &TagSet) -> Result<()> {
    match tags {
        TagSet::Id3(tag) => tag_id3::save(tag, path)?,
        TagSet::Mp4(tag) => tag_mp4::save(tag, path)?,
    }
    debug!("Saved {} tag to {}", tags.format().name(), path.display());
    Ok(())
}
