//! Apply a resolved catalog record to local files.
//!
//! Album-level values are shared by every file; track values are taken by
//! position from the aligned track list.  A failing file is reported and
//! the batch carries on.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::catalog::{RemoteAlbum, RemoteSong, RemoteTrack};
use crate::error::Error;
use crate::field_extractor::basic_track_data;
use crate::matcher::{align, Alignment};
use crate::tag_adapter::{self, truncate_for_report, FieldUpdate, TagSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Save to disk.  Otherwise updates are applied in memory and only reported.
    pub write: bool,
    /// Wipe existing tags before writing.
    pub clean: bool,
}

/// What was done to one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: PathBuf,
    /// Fields set by the update, values truncated for display.
    pub fields: Vec<(String, String)>,
    /// Every entry of the resulting tag, values truncated for display.
    pub entries: Vec<(String, String)>,
    /// `"NN - artist - title"`, when the track number is known.
    pub rename: Option<String>,
    pub saved: bool,
}

#[derive(Debug)]
pub enum FileOutcome {
    Written(FileReport),
    Failed { path: PathBuf, error: Error },
}

#[derive(Debug)]
pub struct WriteReport {
    pub outcomes: Vec<FileOutcome>,
    pub alignment: Alignment,
}

impl WriteReport {
    pub fn written(&self) -> impl Iterator<Item = &FileReport> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Written(report) => Some(report),
            FileOutcome::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Failed { path, error } => Some((path.as_path(), error)),
            FileOutcome::Written(_) => None,
        })
    }
}

/// Field update for one track of a resolved album.
pub fn album_payload(album: &RemoteAlbum, track: &RemoteTrack) -> FieldUpdate {
    FieldUpdate {
        title: Some(track.name.clone()),
        artist: Some(track.artist.clone()),
        album_artist: Some(album.artist.clone()),
        album: Some(album.name.clone()),
        track: Some(track.track_number),
        total_tracks: Some(album.total_tracks),
        disc: track.disc_number,
        total_discs: track.total_discs,
        date: Some(album.release_date.clone()),
        genre: Some(album.genre.clone()),
        publisher: album.publisher.clone(),
        catalog_id: Some(track.track_id),
        artist_id: album.artist_id,
        album_id: Some(album.collection_id),
    }
}

/// Field update for a single resolved song.
pub fn song_payload(song: &RemoteSong) -> FieldUpdate {
    FieldUpdate {
        title: Some(song.name.clone()),
        artist: Some(song.artist.clone()),
        album_artist: song.album_artist.clone(),
        album: Some(song.album.clone()),
        track: Some(song.track),
        total_tracks: Some(song.total_tracks),
        disc: song.disc,
        total_discs: song.total_discs,
        date: Some(song.release_date.clone()),
        genre: Some(song.genre.clone()),
        publisher: None,
        catalog_id: Some(song.track_id),
        artist_id: song.artist_id,
        album_id: Some(song.collection_id),
    }
}

/// `"NN - artist - title"` from a tag, if it has a track number.
pub fn rename_suggestion(tags: &TagSet) -> Option<String> {
    let data = basic_track_data(tags);
    let track = data.track?;
    Some(format!("{:02} - {} - {}", track, data.artist, data.title))
}

fn truncated(pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .map(|(k, v)| (k, truncate_for_report(&v)))
        .collect()
}

/// Read, update and (optionally) save one file.
pub fn write_file(
    path: &Path,
    fields: &FieldUpdate,
    artwork: Option<&[u8]>,
    options: WriteOptions,
) -> Result<FileReport, Error> {
    write_file_with(path, fields, artwork, options, tag_adapter::save)
}

fn write_file_with<S>(
    path: &Path,
    fields: &FieldUpdate,
    artwork: Option<&[u8]>,
    options: WriteOptions,
    save: S,
) -> Result<FileReport, Error>
where
    S: Fn(&Path, &TagSet) -> Result<(), Error>,
{
    let mut tags = tag_adapter::read(path)?;
    tag_adapter::apply(&mut tags, fields, artwork, options.clean);
    if options.write {
        save(path, &tags)?;
    }

    let mut set: Vec<(String, String)> = fields
        .set_fields()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    if let Some(data) = artwork {
        set.push(("artwork".to_string(), format!("image/jpeg, {} bytes", data.len())));
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        fields: truncated(set),
        entries: truncated(tags.entries()),
        rename: rename_suggestion(&tags),
        saved: options.write,
    })
}

fn outcome(path: &Path, result: Result<FileReport, Error>) -> FileOutcome {
    match result {
        Ok(report) => {
            info!("{} {}", if report.saved { "Wrote" } else { "Prepared" }, path.display());
            FileOutcome::Written(report)
        }
        Err(error) => {
            warn!("{}", error);
            FileOutcome::Failed {
                path: path.to_path_buf(),
                error,
            }
        }
    }
}

/// Tag every aligned file with its positional track.  Files or tracks past
/// the shorter side are left alone; the alignment is part of the report.
pub fn write_album(
    files: &[PathBuf],
    album: &RemoteAlbum,
    tracks: &[RemoteTrack],
    artwork: Option<&[u8]>,
    options: WriteOptions,
) -> WriteReport {
    write_album_with(files, album, tracks, artwork, options, tag_adapter::save)
}

fn write_album_with<S>(
    files: &[PathBuf],
    album: &RemoteAlbum,
    tracks: &[RemoteTrack],
    artwork: Option<&[u8]>,
    options: WriteOptions,
    save: S,
) -> WriteReport
where
    S: Fn(&Path, &TagSet) -> Result<(), Error>,
{
    let alignment = align(files.len(), tracks);
    if alignment.is_mismatch() {
        warn!(
            "Found {} files and {} tracks, tagging the first {}",
            alignment.file_count,
            alignment.track_count,
            alignment.pairs.len()
        );
    }

    let outcomes = alignment
        .pairs
        .iter()
        .map(|&(file_index, track_index)| {
            let path = &files[file_index];
            let fields = album_payload(album, &tracks[track_index]);
            outcome(path, write_file_with(path, &fields, artwork, options, &save))
        })
        .collect();

    WriteReport { outcomes, alignment }
}

/// Tag one file with a resolved song.
pub fn write_song(
    path: &Path,
    song: &RemoteSong,
    artwork: Option<&[u8]>,
    options: WriteOptions,
) -> FileOutcome {
    let fields = song_payload(song);
    outcome(path, write_file(path, &fields, artwork, options))
}
