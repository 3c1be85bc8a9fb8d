//! iTunes Store Search API client.
//!
//! Search: `https://itunes.apple.com/search?term=…&country=…&entity=album|song`
//! Lookup: `https://itunes.apple.com/lookup?id=…&entity=song&country=…`
//!
//! Both return `{"resultCount": n, "results": [...]}`.  Lookup results mix the
//! collection itself with its tracks; only `wrapperType == "track"` entries
//! are kept.

use std::cell::RefCell;
use std::io::Read;

use log::{debug, warn};
use serde::Deserialize;

use crate::catalog::{artwork_url, sort_tracks, Catalog, RemoteAlbum, RemoteSong, RemoteTrack};
use crate::error::{Error, Result};
use crate::rate_limiter::RateLimiter;

const SEARCH_URL: &str = "https://itunes.apple.com/search";
const LOOKUP_URL: &str = "https://itunes.apple.com/lookup";
const USER_AGENT: &str = "albumtag/0.1";

/// Upper bound for any response body, cover images included.
const MAX_BODY_BYTES: u64 = 20 * 1024 * 1024;

// ── API response types ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    results: Vec<ApiItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiItem {
    #[serde(default)]
    wrapper_type: Option<String>,
    collection_id: Option<u64>,
    artist_id: Option<u64>,
    track_id: Option<u64>,
    #[serde(default)]
    artist_name: String,
    #[serde(default)]
    collection_name: String,
    collection_artist_name: Option<String>,
    #[serde(default)]
    track_name: String,
    #[serde(default)]
    primary_genre_name: String,
    #[serde(default)]
    release_date: String,
    track_count: Option<u32>,
    track_number: Option<u32>,
    disc_number: Option<u32>,
    disc_count: Option<u32>,
    copyright: Option<String>,
    #[serde(default)]
    artwork_url100: String,
}

impl ApiItem {
    fn is_track(&self) -> bool {
        self.wrapper_type.as_deref() == Some("track")
    }

    fn into_album(self, artwork_size: u32) -> Option<RemoteAlbum> {
        Some(RemoteAlbum {
            collection_id: self.collection_id?,
            artist_id: self.artist_id,
            artist: self.artist_name,
            name: self.collection_name,
            genre: self.primary_genre_name,
            release_date: self.release_date,
            total_tracks: self.track_count.unwrap_or(0),
            publisher: self.copyright,
            artwork_url: artwork_url(&self.artwork_url100, artwork_size),
        })
    }

    fn into_song(self, artwork_size: u32) -> Option<RemoteSong> {
        Some(RemoteSong {
            track_id: self.track_id?,
            collection_id: self.collection_id?,
            artist_id: self.artist_id,
            name: self.track_name,
            artist: self.artist_name,
            album: self.collection_name,
            album_artist: self.collection_artist_name,
            genre: self.primary_genre_name,
            release_date: self.release_date,
            track: self.track_number.unwrap_or(0),
            total_tracks: self.track_count.unwrap_or(0),
            disc: self.disc_number,
            total_discs: self.disc_count,
            artwork_url: artwork_url(&self.artwork_url100, artwork_size),
        })
    }

    fn into_track(self) -> Option<RemoteTrack> {
        Some(RemoteTrack {
            track_id: self.track_id?,
            name: self.track_name,
            artist: self.artist_name,
            track_number: self.track_number.unwrap_or(0),
            disc_number: self.disc_number,
            total_discs: self.disc_count,
        })
    }
}

fn parse_albums(body: &str, artwork_size: u32) -> Result<Vec<RemoteAlbum>> {
    let api: ApiResponse = serde_json::from_str(body)?;
    Ok(api
        .results
        .into_iter()
        .filter_map(|item| item.into_album(artwork_size))
        .collect())
}

fn parse_songs(body: &str, artwork_size: u32) -> Result<Vec<RemoteSong>> {
    let api: ApiResponse = serde_json::from_str(body)?;
    Ok(api
        .results
        .into_iter()
        .filter(ApiItem::is_track)
        .filter_map(|item| item.into_song(artwork_size))
        .collect())
}

fn parse_tracks(body: &str) -> Result<Vec<RemoteTrack>> {
    let api: ApiResponse = serde_json::from_str(body)?;
    let mut tracks: Vec<RemoteTrack> = api
        .results
        .into_iter()
        .filter(ApiItem::is_track)
        .filter_map(ApiItem::into_track)
        .collect();
    sort_tracks(&mut tracks);
    Ok(tracks)
}

// ── Client ───────────────────────────────────────────────────────────────────

pub struct ItunesCatalog {
    artwork_size: u32,
    rate_limiter: RefCell<RateLimiter>,
}

impl ItunesCatalog {
    pub fn new(artwork_size: u32) -> Self {
        ItunesCatalog {
            artwork_size,
            rate_limiter: RefCell::new(RateLimiter::from_millis("iTunes", 3000)),
        }
    }

    /// Feed the outcome of a request into the backoff.
    fn record<T>(&self, result: Result<T>) -> Result<T> {
        let mut limiter = self.rate_limiter.borrow_mut();
        match &result {
            Ok(_) => limiter.report_success(),
            Err(e) => {
                warn!("iTunes request failed: {}", e);
                limiter.report_failure();
            }
        }
        result
    }

    /// Issue one rate-limited request and return the body bytes.
    fn send(&self, request: ureq::Request) -> Result<Vec<u8>> {
        self.rate_limiter.borrow_mut().wait_if_needed();
        debug!("GET {}", request.url());

        let result = request
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(Error::from)
            .and_then(|response| read_body(response.into_reader()));
        self.record(result)
    }

    fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<String> {
        let mut request = ureq::get(url);
        for (key, value) in params {
            request = request.query(key, value);
        }
        let body = self.send(request)?;
        String::from_utf8(body)
            .map_err(|e| Error::RemoteUnavailable(format!("response is not UTF-8: {}", e)))
    }
}

/// Read a response body, capped at [`MAX_BODY_BYTES`].  A connection that
/// drops mid-body is a remote failure, not a local one.
fn read_body<R: Read>(reader: R) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| Error::RemoteUnavailable(format!("reading response: {}", e)))?;
    Ok(bytes)
}

impl Default for ItunesCatalog {
    fn default() -> Self {
        Self::new(crate::catalog::DEFAULT_ARTWORK_SIZE)
    }
}

impl Catalog for ItunesCatalog {
    fn name(&self) -> &str {
        "iTunes"
    }

    fn search_albums(&self, query: &str, locale: &str) -> Result<Vec<RemoteAlbum>> {
        let body = self.get(
            SEARCH_URL,
            &[("term", query), ("country", locale), ("entity", "album")],
        )?;
        parse_albums(&body, self.artwork_size)
    }

    fn search_songs(&self, query: &str, locale: &str) -> Result<Vec<RemoteSong>> {
        let body = self.get(
            SEARCH_URL,
            &[("term", query), ("country", locale), ("entity", "song")],
        )?;
        parse_songs(&body, self.artwork_size)
    }

    fn album_tracks(&self, collection_id: u64, locale: &str) -> Result<Vec<RemoteTrack>> {
        let id = collection_id.to_string();
        let body = self.get(
            LOOKUP_URL,
            &[("id", id.as_str()), ("entity", "song"), ("country", locale)],
        )?;
        parse_tracks(&body)
    }

    fn fetch_artwork(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self.send(ureq::get(url))?;
        if bytes.is_empty() {
            return Err(Error::RemoteUnavailable(format!("empty artwork from {}", url)));
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALBUM_SEARCH: &str = r#"{
        "resultCount": 2,
        "results": [
            {"wrapperType": "collection", "collectionType": "Album",
             "artistId": 2223459, "collectionId": 1244722577,
             "artistName": "Damian Marley", "collectionName": "Stony Hill",
             "artworkUrl100": "https://is1.mzstatic.com/image/thumb/x/100x100bb.jpg",
             "trackCount": 18, "copyright": "℗ 2017 Republic Records",
             "country": "USA", "releaseDate": "2017-07-21T07:00:00Z",
             "primaryGenreName": "Reggae"},
            {"wrapperType": "collection", "artistName": "No Id"}
        ]
    }"#;

    const LOOKUP: &str = r#"{
        "resultCount": 4,
        "results": [
            {"wrapperType": "collection", "collectionId": 1, "trackCount": 3},
            {"wrapperType": "track", "trackId": 13, "trackName": "Third",
             "artistName": "A", "trackNumber": 3, "discNumber": 1, "discCount": 1},
            {"wrapperType": "track", "trackId": 11, "trackName": "First",
             "artistName": "A", "trackNumber": 1, "discNumber": 1, "discCount": 1},
            {"wrapperType": "track", "trackId": 12, "trackName": "Second",
             "artistName": "A feat. B", "trackNumber": 2, "discNumber": 1, "discCount": 1}
        ]
    }"#;

    #[test]
    fn test_parse_albums() {
        let albums = parse_albums(ALBUM_SEARCH, 600).unwrap();
        assert_eq!(albums.len(), 1);
        let album = &albums[0];
        assert_eq!(album.collection_id, 1244722577);
        assert_eq!(album.artist_id, Some(2223459));
        assert_eq!(album.name, "Stony Hill");
        assert_eq!(album.total_tracks, 18);
        assert_eq!(album.genre, "Reggae");
        assert_eq!(album.publisher.as_deref(), Some("℗ 2017 Republic Records"));
        assert_eq!(album.artwork_url, "https://is1.mzstatic.com/image/thumb/x/600x600bb.jpg");
    }

    #[test]
    fn test_parse_tracks_filters_and_sorts() {
        let tracks = parse_tracks(LOOKUP).unwrap();
        let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
        assert_eq!(tracks[1].artist, "A feat. B");
        assert_eq!(tracks[0].disc_number, Some(1));
    }

    #[test]
    fn test_parse_songs() {
        let body = r#"{"results": [
            {"wrapperType": "track", "kind": "song", "trackId": 5, "collectionId": 9,
             "artistName": "Artist", "collectionName": "LP", "trackName": "Song",
             "collectionArtistName": "Various Artists", "primaryGenreName": "Pop",
             "releaseDate": "1999-01-01T08:00:00Z", "trackNumber": 4, "trackCount": 12,
             "discNumber": 1, "discCount": 2,
             "artworkUrl100": "https://x/100x100bb.jpg"},
            {"wrapperType": "audiobook", "collectionId": 10}
        ]}"#;
        let songs = parse_songs(body, 300).unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].album_artist.as_deref(), Some("Various Artists"));
        assert_eq!(songs[0].track, 4);
        assert_eq!(songs[0].total_discs, Some(2));
        assert_eq!(songs[0].artwork_url, "https://x/300x300bb.jpg");
    }

    struct DroppedConnection;

    impl Read for DroppedConnection {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer"))
        }
    }

    #[test]
    fn test_body_failure_is_remote() {
        assert!(matches!(read_body(DroppedConnection), Err(Error::RemoteUnavailable(_))));
        assert_eq!(read_body(&b"{}"[..]).unwrap(), b"{}".to_vec());
    }

    #[test]
    fn test_failures_back_off() {
        let catalog = ItunesCatalog::new(600);
        let base = catalog.rate_limiter.borrow().current_interval();

        let failed: Result<()> = Err(Error::RemoteUnavailable("404".into()));
        assert!(catalog.record(failed).is_err());
        assert_eq!(catalog.rate_limiter.borrow().current_interval(), base * 2);

        assert_eq!(catalog.record(Ok(5)).unwrap(), 5);
    }

    #[test]
    fn test_malformed_response() {
        assert!(matches!(parse_tracks("<html>"), Err(Error::RemoteUnavailable(_))));
    }
}
