//! MPEG-4 `ilst` strategy for [`TagSet::Mp4`](crate::tag_adapter::TagSet).

use std::path::Path;

use log::warn;
use mp4ameta::{Data, DataIdent, Fourcc, FreeformIdent, Tag};

use crate::error::{Error, Result};
use crate::tag_adapter::{year_of, FieldUpdate, TextField, DEFAULT_DISC_POSITION};

const TITLE: Fourcc = Fourcc(*b"\xa9nam");
const ARTIST: Fourcc = Fourcc(*b"\xa9ART");
const ALBUM_ARTIST: Fourcc = Fourcc(*b"aART");
const ALBUM: Fourcc = Fourcc(*b"\xa9alb");
const YEAR: Fourcc = Fourcc(*b"\xa9day");
const GENRE: Fourcc = Fourcc(*b"\xa9gen");
const COPYRIGHT: Fourcc = Fourcc(*b"cprt");
const TRACK: Fourcc = Fourcc(*b"trkn");
const DISC: Fourcc = Fourcc(*b"disk");
const ARTWORK: Fourcc = Fourcc(*b"covr");
const CATALOG_ID: Fourcc = Fourcc(*b"cnID");
const ARTIST_ID: Fourcc = Fourcc(*b"atID");
const ALBUM_ID: Fourcc = Fourcc(*b"plID");

const ITUNES_MEAN: &str = "com.apple.iTunes";
/// Free-text copy of the total track count.  Written only, never read back.
const TOTAL_TRACKS_NAME: &str = "TOTALTRACKS";

fn atom(field: TextField) -> Fourcc {
    match field {
        TextField::Title => TITLE,
        TextField::Artist => ARTIST,
        TextField::AlbumArtist => ALBUM_ARTIST,
        TextField::Album => ALBUM,
        TextField::Date => YEAR,
        TextField::Genre => GENRE,
        TextField::Publisher => COPYRIGHT,
    }
}

pub(crate) fn read(path: &Path) -> Result<Tag> {
    Tag::read_from_path(path).map_err(|e| Error::CorruptFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub(crate) fn save(tag: &Tag, path: &Path) -> Result<()> {
    tag.write_to_path(path).map_err(|e| Error::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub(crate) fn text(tag: &Tag, field: TextField) -> Option<String> {
    tag.strings_of(&atom(field)).next().map(|s| s.to_string())
}

fn pair_text(number: Option<u16>, total: Option<u16>) -> Option<String> {
    match (number, total) {
        (Some(n), Some(t)) => Some(format!("{}/{}", n, t)),
        (Some(n), None) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn track_position(tag: &Tag) -> Option<String> {
    pair_text(tag.track_number(), tag.total_tracks())
}

pub(crate) fn disc_position(tag: &Tag) -> Option<String> {
    pair_text(tag.disc_number(), tag.total_discs())
}

/// Atom code as shown to users, `©` included.
fn fourcc_name(fourcc: &Fourcc) -> String {
    fourcc.0.iter().map(|&b| b as char).collect()
}

fn ident_name(ident: &DataIdent) -> String {
    match ident {
        DataIdent::Fourcc(f) => fourcc_name(f),
        DataIdent::Freeform { mean, name } => format!("----:{}:{}", mean, name),
    }
}

/// Decode a big-endian signed integer of any width up to 8 bytes.
fn be_signed(bytes: &[u8]) -> i64 {
    let negative = bytes.first().map_or(false, |b| b & 0x80 != 0);
    let mut v: i64 = if negative { -1 } else { 0 };
    for &b in bytes {
        v = (v << 8) | b as i64;
    }
    v
}

pub(crate) fn entries(tag: &Tag) -> Vec<(String, String)> {
    tag.data()
        .map(|(ident, data)| {
            let key = ident_name(ident);
            let value = match ident {
                DataIdent::Fourcc(f) if *f == TRACK => track_position(tag).unwrap_or_default(),
                DataIdent::Fourcc(f) if *f == DISC => disc_position(tag).unwrap_or_default(),
                _ => match data {
                    Data::Utf8(s) | Data::Utf16(s) => s.clone(),
                    Data::Jpeg(b) => format!("Cover (image/jpeg, {} bytes)", b.len()),
                    Data::Png(b) => format!("Cover (image/png, {} bytes)", b.len()),
                    Data::BeSigned(b) => be_signed(b).to_string(),
                    _ => "<binary>".to_string(),
                },
            };
            (key, value)
        })
        .collect()
}

fn clear(tag: &mut Tag) {
    let idents: Vec<DataIdent> = tag.data().map(|(ident, _)| ident.clone()).collect();
    for ident in idents {
        tag.remove_data_of(&ident);
    }
}

fn set_text(tag: &mut Tag, fourcc: Fourcc, value: &str) {
    tag.set_data(fourcc, Data::Utf8(value.to_string()));
}

/// `cnID` and `atID` are 32-bit by convention, `plID` 64-bit.  A 32-bit id
/// that does not fit `i32` is widened to 8 bytes rather than wrapped.
fn id_data(fourcc: Fourcc, id: u64) -> Option<Data> {
    if fourcc != ALBUM_ID {
        if let Ok(narrow) = i32::try_from(id) {
            return Some(Data::BeSigned(narrow.to_be_bytes().to_vec()));
        }
    }
    i64::try_from(id)
        .ok()
        .map(|wide| Data::BeSigned(wide.to_be_bytes().to_vec()))
}

fn to_u16(n: u32) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

pub(crate) fn apply(tag: &mut Tag, fields: &FieldUpdate, artwork: Option<&[u8]>, clean: bool) {
    if clean {
        clear(tag);
        let (disc, total) = DEFAULT_DISC_POSITION;
        tag.set_disc(to_u16(disc), to_u16(total));
    }

    if let Some(title) = &fields.title {
        set_text(tag, TITLE, title);
    }

    let (artist, album_artist) = fields.artist_pair();
    if let Some(artist) = artist {
        set_text(tag, ARTIST, artist);
    }
    if let Some(album_artist) = album_artist {
        set_text(tag, ALBUM_ARTIST, album_artist);
    }

    if let Some(album) = &fields.album {
        set_text(tag, ALBUM, album);
    }

    if let Some(track) = fields.track {
        match fields.total_tracks {
            Some(total) => {
                tag.set_track(to_u16(track), to_u16(total));
                tag.set_data(
                    FreeformIdent::new(ITUNES_MEAN, TOTAL_TRACKS_NAME),
                    Data::Utf8(total.to_string()),
                );
            }
            None => {
                tag.remove_data_of(&TRACK);
                tag.set_track_number(to_u16(track));
            }
        }
    }

    if let Some(disc) = fields.disc {
        match fields.total_discs {
            Some(total) => tag.set_disc(to_u16(disc), to_u16(total)),
            None => {
                tag.remove_data_of(&DISC);
                tag.set_disc_number(to_u16(disc));
            }
        }
    }

    if let Some(date) = &fields.date {
        set_text(tag, YEAR, year_of(date));
    }
    if let Some(genre) = &fields.genre {
        set_text(tag, GENRE, genre);
    }
    if let Some(publisher) = &fields.publisher {
        set_text(tag, COPYRIGHT, publisher);
    }

    for (fourcc, id) in [
        (CATALOG_ID, fields.catalog_id),
        (ARTIST_ID, fields.artist_id),
        (ALBUM_ID, fields.album_id),
    ] {
        if let Some(id) = id {
            match id_data(fourcc, id) {
                Some(data) => tag.set_data(fourcc, data),
                None => warn!(
                    "{} {} does not fit a signed integer, not written",
                    fourcc_name(&fourcc),
                    id
                ),
            }
        }
    }

    if let Some(data) = artwork {
        tag.set_data(ARTWORK, Data::Jpeg(data.to_vec()));
    }
}
