//! ID3v2 strategy for [`TagSet::Id3`](crate::tag_adapter::TagSet).

use std::path::Path;

use id3::frame::{Content, ExtendedText, Picture, PictureType};
use id3::{ErrorKind, Tag, TagLike, Version};

use crate::error::{Error, Result};
use crate::tag_adapter::{
    format_disc_position, format_track_position, year_of, FieldUpdate, TextField,
    DEFAULT_DISC_POSITION,
};

pub const CATALOG_ID_DESC: &str = "ITUNESCATALOGID";
pub const ARTIST_ID_DESC: &str = "ITUNESARTISTID";
pub const ALBUM_ID_DESC: &str = "ITUNESALBUMID";

fn frame_id(field: TextField) -> &'static str {
    match field {
        TextField::Title => "TIT2",
        TextField::Artist => "TPE1",
        TextField::AlbumArtist => "TPE2",
        TextField::Album => "TALB",
        TextField::Date => "TDRC",
        TextField::Genre => "TCON",
        TextField::Publisher => "TPUB",
    }
}

/// Read the tag; a file without any ID3 tag gives an empty one.
pub(crate) fn read(path: &Path) -> Result<Tag> {
    match Tag::read_from_path(path) {
        Ok(tag) => Ok(tag),
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => Ok(Tag::new()),
        Err(e) => Err(Error::CorruptFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

pub(crate) fn save(tag: &Tag, path: &Path) -> Result<()> {
    tag.write_to_path(path, Version::Id3v24)
        .map_err(|e| Error::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn text_frame(tag: &Tag, id: &str) -> Option<String> {
    tag.get(id)
        .and_then(|f| f.content().text())
        .map(|s| s.to_string())
}

pub(crate) fn text(tag: &Tag, field: TextField) -> Option<String> {
    let value = text_frame(tag, frame_id(field));
    if field == TextField::Date {
        // v2.3 files carry the year in TYER
        return value.or_else(|| text_frame(tag, "TYER"));
    }
    value
}

pub(crate) fn track_position(tag: &Tag) -> Option<String> {
    text_frame(tag, "TRCK")
}

pub(crate) fn disc_position(tag: &Tag) -> Option<String> {
    text_frame(tag, "TPOS")
}

pub(crate) fn entries(tag: &Tag) -> Vec<(String, String)> {
    tag.frames()
        .map(|frame| {
            let id = frame.id().to_string();
            match frame.content() {
                Content::Text(s) => (id, s.replace('\0', "; ")),
                Content::Link(s) => (id, s.clone()),
                Content::ExtendedText(t) => (format!("{}:{}", id, t.description), t.value.clone()),
                Content::Comment(c) => (id, c.text.clone()),
                Content::Lyrics(l) => (id, l.text.clone()),
                Content::Picture(p) => (
                    id,
                    format!("{:?} ({}, {} bytes)", p.picture_type, p.mime_type, p.data.len()),
                ),
                _ => (id, "<binary>".to_string()),
            }
        })
        .collect()
}

fn set_extended(tag: &mut Tag, description: &str, value: String) {
    tag.remove_extended_text(Some(description), None);
    tag.add_frame(ExtendedText {
        description: description.to_string(),
        value,
    });
}

pub(crate) fn apply(tag: &mut Tag, fields: &FieldUpdate, artwork: Option<&[u8]>, clean: bool) {
    if clean {
        *tag = Tag::new();
        let (disc, total) = DEFAULT_DISC_POSITION;
        tag.set_text("TPOS", format_disc_position(disc, Some(total)));
    }

    if let Some(title) = &fields.title {
        tag.set_text("TIT2", title.clone());
    }

    let (artist, album_artist) = fields.artist_pair();
    if let Some(artist) = artist {
        tag.set_text("TPE1", artist);
    }
    if let Some(album_artist) = album_artist {
        tag.set_text("TPE2", album_artist);
    }

    if let Some(album) = &fields.album {
        tag.set_text("TALB", album.clone());
    }

    if let Some(track) = fields.track {
        tag.set_text("TRCK", format_track_position(track, fields.total_tracks));
    }
    if let Some(disc) = fields.disc {
        tag.set_text("TPOS", format_disc_position(disc, fields.total_discs));
    }

    if let Some(date) = &fields.date {
        tag.set_text("TDRC", year_of(date));
    }
    if let Some(genre) = &fields.genre {
        tag.set_text("TCON", genre.clone());
    }
    if let Some(publisher) = &fields.publisher {
        tag.set_text("TPUB", publisher.clone());
    }

    if let Some(id) = fields.catalog_id {
        set_extended(tag, CATALOG_ID_DESC, id.to_string());
    }
    if let Some(id) = fields.artist_id {
        set_extended(tag, ARTIST_ID_DESC, id.to_string());
    }
    if let Some(id) = fields.album_id {
        set_extended(tag, ALBUM_ID_DESC, id.to_string());
    }

    if let Some(data) = artwork {
        tag.remove_all_pictures();
        tag.add_frame(Picture {
            mime_type: "image/jpeg".to_string(),
            picture_type: PictureType::CoverFront,
            description: String::new(),
            data: data.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_update() -> FieldUpdate {
        FieldUpdate {
            title: Some("Love No Friends".into()),
            artist: Some("Damian Marley".into()),
            album: Some("Stony Hill".into()),
            track: Some(7),
            total_tracks: Some(12),
            disc: Some(1),
            total_discs: Some(1),
            date: Some("2017-07-21T07:00:00Z".into()),
            genre: Some("Reggae".into()),
            publisher: Some("℗ 2017 Republic Records".into()),
            catalog_id: Some(1244722851),
            artist_id: Some(2223459),
            album_id: Some(1244722577),
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_sets_frames() {
        let mut tag = Tag::new();
        apply(&mut tag, &full_update(), Some(&[0xFF, 0xD8, 0xFF]), false);

        assert_eq!(text_frame(&tag, "TIT2").as_deref(), Some("Love No Friends"));
        assert_eq!(text_frame(&tag, "TPE1").as_deref(), Some("Damian Marley"));
        assert_eq!(text_frame(&tag, "TPE2").as_deref(), Some("Damian Marley"));
        assert_eq!(text_frame(&tag, "TRCK").as_deref(), Some("07/12"));
        assert_eq!(text_frame(&tag, "TPOS").as_deref(), Some("1/1"));
        assert_eq!(text_frame(&tag, "TDRC").as_deref(), Some("2017"));
        assert_eq!(text_frame(&tag, "TPUB").as_deref(), Some("℗ 2017 Republic Records"));

        let catalog = tag
            .extended_texts()
            .find(|t| t.description == CATALOG_ID_DESC)
            .map(|t| t.value.clone());
        assert_eq!(catalog.as_deref(), Some("1244722851"));

        let pictures: Vec<_> = tag.pictures().collect();
        assert_eq!(pictures.len(), 1);
        assert_eq!(pictures[0].picture_type, PictureType::CoverFront);
        assert_eq!(pictures[0].mime_type, "image/jpeg");
    }

    #[test]
    fn test_artwork_replaces_previous() {
        let mut tag = Tag::new();
        apply(&mut tag, &FieldUpdate::default(), Some(&[1, 2, 3]), false);
        apply(&mut tag, &FieldUpdate::default(), Some(&[4, 5]), false);
        let pictures: Vec<_> = tag.pictures().collect();
        assert_eq!(pictures.len(), 1);
        assert_eq!(pictures[0].data, vec![4, 5]);
    }

    #[test]
    fn test_clean_with_title_only() {
        let mut tag = Tag::new();
        apply(&mut tag, &full_update(), None, false);
        tag.set_text("TCOM", "Someone");

        let title_only = FieldUpdate {
            title: Some("Only Title".into()),
            ..Default::default()
        };
        apply(&mut tag, &title_only, None, true);

        let ids: Vec<String> = tag.frames().map(|f| f.id().to_string()).collect();
        assert_eq!(ids.len(), 2, "unexpected frames: {:?}", ids);
        assert_eq!(text_frame(&tag, "TIT2").as_deref(), Some("Only Title"));
        assert_eq!(text_frame(&tag, "TPOS").as_deref(), Some("1/1"));
        assert!(text_frame(&tag, "TPE1").is_none());
        assert!(text_frame(&tag, "TCOM").is_none());
    }

    #[test]
    fn test_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("07.mp3");
        std::fs::write(&path, [0u8; 128]).unwrap();

        let tag = read(&path).unwrap();
        assert_eq!(tag.frames().count(), 0);

        let mut tag = tag;
        apply(&mut tag, &full_update(), None, false);
        save(&tag, &path).unwrap();

        let back = read(&path).unwrap();
        assert_eq!(track_position(&back).as_deref(), Some("07/12"));
        assert_eq!(text(&back, TextField::Album).as_deref(), Some("Stony Hill"));
        assert_eq!(text(&back, TextField::Date).as_deref(), Some("2017"));
    }

    #[test]
    fn test_entries_keys() {
        let mut tag = Tag::new();
        apply(&mut tag, &full_update(), None, false);
        let entries = entries(&tag);
        assert!(entries.iter().any(|(k, v)| k == "TIT2" && v == "Love No Friends"));
        assert!(entries
            .iter()
            .any(|(k, v)| k == "TXXX:ITUNESALBUMID" && v == "1244722577"));
    }
}
