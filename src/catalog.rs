//! Remote catalog contract and record types.
//!
//! The [`Catalog`] trait is the seam between the matcher and the transport.
//! [`crate::itunes::ItunesCatalog`] talks to the iTunes Store; tests use an
//! in-memory implementation.

use crate::error::Result;

/// Resolution requested when artwork URLs are rewritten.
pub const DEFAULT_ARTWORK_SIZE: u32 = 600;

/// An album search hit.  Immutable once fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteAlbum {
    pub collection_id: u64,
    pub artist_id: Option<u64>,
    pub artist: String,
    pub name: String,
    pub genre: String,
    pub release_date: String,
    pub total_tracks: u32,
    /// Copyright line of the release.
    pub publisher: Option<String>,
    pub artwork_url: String,
}

/// A song search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSong {
    pub track_id: u64,
    pub collection_id: u64,
    pub artist_id: Option<u64>,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub album_artist: Option<String>,
    pub genre: String,
    pub release_date: String,
    pub track: u32,
    pub total_tracks: u32,
    pub disc: Option<u32>,
    pub total_discs: Option<u32>,
    pub artwork_url: String,
}

/// One track of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteTrack {
    pub track_id: u64,
    pub name: String,
    pub artist: String,
    pub track_number: u32,
    pub disc_number: Option<u32>,
    pub total_discs: Option<u32>,
}

/// Blocking request/response access to the catalog.
pub trait Catalog {
    /// Short display name, e.g. "iTunes".
    fn name(&self) -> &str;

    /// Album search in the remote's own ranking order.
    fn search_albums(&self, query: &str, locale: &str) -> Result<Vec<RemoteAlbum>>;

    /// Song search in the remote's own ranking order.
    fn search_songs(&self, query: &str, locale: &str) -> Result<Vec<RemoteSong>>;

    /// Tracks of a collection, sorted ascending by track number.
    fn album_tracks(&self, collection_id: u64, locale: &str) -> Result<Vec<RemoteTrack>>;

    /// Raw image bytes behind an artwork URL.
    fn fetch_artwork(&self, url: &str) -> Result<Vec<u8>>;
}

/// Rewrite a `…/100x100bb.jpg` artwork URL to another square size.
pub fn artwork_url(url_100: &str, size: u32) -> String {
    url_100.replace("100x100bb.jpg", &format!("{}x{}bb.jpg", size, size))
}

/// Stable order for track listings.
pub fn sort_tracks(tracks: &mut [RemoteTrack]) {
    tracks.sort_by_key(|t| (t.track_number, t.disc_number.unwrap_or(0)));
}
