//! Catalog resolution session.
//!
//! A [`MatchSession`] walks one local collection (or one file) through
//!
//! ```text
//! AwaitingQuery → Searching → PresentingCandidates → AwaitingSelection → Resolved
//!       ↑              │                                    │
//!       └── no match ──┘            quit / empty query ──→ Aborted
//! ```
//!
//! The session locale is part of the state: a locale change is accepted in
//! `AwaitingQuery` and `AwaitingSelection` and restarts at `AwaitingQuery`.
//! Candidates keep the catalog's order; they are only annotated with which
//! fields literally equal the local tags.
//!
//! After an album is resolved, [`MatchSession::resolve_tracks`] fetches its
//! track list and walks the fallback locales when the count disagrees with
//! the album's advertised total.

use std::fmt;

use log::{debug, info, warn};

use crate::catalog::{Catalog, RemoteAlbum, RemoteSong, RemoteTrack};
use crate::error::{Error, Result};
use crate::field_extractor::{BasicTrackData, SearchMode};

pub const DEFAULT_LOCALE: &str = "us";

/// Stores tried, in order, when a track listing is incomplete.
pub const FALLBACK_LOCALES: &[&str] = &[
    "us", "gb", "ca", "au", "de", "fr", "jp", "nl", "se", "it", "es", "br", "mx",
];

const QUIT: &str = "q";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingQuery,
    Searching,
    PresentingCandidates,
    AwaitingSelection,
    Resolved,
    Aborted,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::AwaitingQuery => "awaiting query",
            SessionState::Searching => "searching",
            SessionState::PresentingCandidates => "presenting candidates",
            SessionState::AwaitingSelection => "awaiting selection",
            SessionState::Resolved => "resolved",
            SessionState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Album(RemoteAlbum),
    Song(RemoteSong),
}

/// Which candidate fields literally equal the local values.  Display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Highlights {
    pub artist: bool,
    pub name: bool,
    pub album: bool,
    pub album_artist: bool,
    pub track: bool,
    pub total_tracks: bool,
}

impl Highlights {
    fn for_candidate(candidate: &Candidate, local: &BasicTrackData) -> Self {
        match candidate {
            Candidate::Album(album) => Highlights {
                artist: album.artist == local.album_artist,
                name: album.name == local.album,
                total_tracks: local.total_tracks == Some(album.total_tracks),
                ..Default::default()
            },
            Candidate::Song(song) => Highlights {
                artist: song.artist == local.artist,
                name: song.name == local.title,
                album: song.album == local.album,
                album_artist: song.album_artist.as_deref() == Some(local.album_artist.as_str()),
                track: local.track == Some(song.track),
                total_tracks: local.total_tracks == Some(song.total_tracks),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedCandidate<'s> {
    /// 1-based number the user types to select this candidate.
    pub number: usize,
    pub candidate: &'s Candidate,
    pub highlights: Highlights,
}

/// Outcome of a track listing fetch after locale reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackListing {
    pub tracks: Vec<RemoteTrack>,
    pub locale: String,
    /// True when a fallback locale supplied the listing.
    pub fell_back: bool,
    /// True when the listing length equals the album's advertised total.
    pub complete: bool,
}

/// Positional pairing of local files with remote tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// (file index, track index), always equal, for the overlapping prefix.
    pub pairs: Vec<(usize, usize)>,
    pub file_count: usize,
    pub track_count: usize,
}

impl Alignment {
    pub fn is_mismatch(&self) -> bool {
        self.file_count != self.track_count
    }

    /// Files beyond the last remote track.
    pub fn unmatched_files(&self) -> std::ops::Range<usize> {
        self.pairs.len()..self.file_count
    }

    /// Remote tracks beyond the last local file.
    pub fn unused_tracks(&self) -> std::ops::Range<usize> {
        self.pairs.len()..self.track_count
    }
}

/// Pair file `i` with track `i` for every `i` both sides have.
pub fn align(file_count: usize, tracks: &[RemoteTrack]) -> Alignment {
    let n = file_count.min(tracks.len());
    Alignment {
        pairs: (0..n).map(|i| (i, i)).collect(),
        file_count,
        track_count: tracks.len(),
    }
}

/// Collapse dashes and double spaces the way searches are typed.
pub fn normalize_query(input: &str) -> String {
    input
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_quit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(QUIT)
}

pub struct MatchSession<'c, C: Catalog + ?Sized> {
    catalog: &'c C,
    mode: SearchMode,
    local: BasicTrackData,
    locale: String,
    fallback_locales: Vec<String>,
    query: String,
    candidates: Vec<Candidate>,
    selected: Option<usize>,
    state: SessionState,
}

impl<'c, C: Catalog + ?Sized> MatchSession<'c, C> {
    /// `local` is the basic data of the first (or only) local file.
    pub fn new(catalog: &'c C, mode: SearchMode, local: BasicTrackData) -> Self {
        MatchSession {
            catalog,
            mode,
            local,
            locale: DEFAULT_LOCALE.to_string(),
            fallback_locales: FALLBACK_LOCALES.iter().map(|l| l.to_string()).collect(),
            query: String::new(),
            candidates: Vec::new(),
            selected: None,
            state: SessionState::AwaitingQuery,
        }
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        if locale.chars().count() == 2 {
            self.locale = locale.to_ascii_lowercase();
        }
        self
    }

    pub fn with_fallback_locales(mut self, locales: &[String]) -> Self {
        self.fallback_locales = locales.iter().map(|l| l.to_ascii_lowercase()).collect();
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.selected.and_then(|i| self.candidates.get(i))
    }

    fn expect_state(&self, allowed: &[SessionState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(Error::InvalidState(self.state.to_string()))
        }
    }

    /// Run a search.  Empty input or `q` aborts the session.
    pub fn submit_query(&mut self, input: &str) -> Result<SessionState> {
        self.expect_state(&[SessionState::AwaitingQuery])?;

        let query = normalize_query(input);
        if query.is_empty() || is_quit(&query) {
            self.state = SessionState::Aborted;
            return Ok(self.state);
        }

        self.query = query;
        self.candidates.clear();
        self.selected = None;
        self.state = SessionState::Searching;
        debug!("Searching {:?} '{}' in [{}]", self.mode, self.query, self.locale);

        let found: Result<Vec<Candidate>> = match self.mode {
            SearchMode::Album => self
                .catalog
                .search_albums(&self.query, &self.locale)
                .map(|v| v.into_iter().map(Candidate::Album).collect()),
            SearchMode::Song => self
                .catalog
                .search_songs(&self.query, &self.locale)
                .map(|v| v.into_iter().map(Candidate::Song).collect()),
        };

        let found = match found {
            Ok(found) => found,
            Err(e) => {
                self.state = SessionState::AwaitingQuery;
                return Err(e);
            }
        };

        if found.is_empty() {
            self.state = SessionState::AwaitingQuery;
            return Err(Error::NoMatch {
                query: self.query.clone(),
                locale: self.locale.clone(),
            });
        }

        info!("{} result(s) for '{}' in [{}]", found.len(), self.query, self.locale);
        self.candidates = found;
        self.state = SessionState::PresentingCandidates;
        Ok(self.state)
    }

    /// Candidates in catalog order with their highlights.  Moves the
    /// session on to reading a selection.
    pub fn present(&mut self) -> Result<Vec<AnnotatedCandidate<'_>>> {
        self.expect_state(&[SessionState::PresentingCandidates, SessionState::AwaitingSelection])?;
        self.state = SessionState::AwaitingSelection;

        let local = &self.local;
        Ok(self
            .candidates
            .iter()
            .enumerate()
            .map(|(i, candidate)| AnnotatedCandidate {
                number: i + 1,
                candidate,
                highlights: Highlights::for_candidate(candidate, local),
            })
            .collect())
    }

    /// `1..=n` resolves, `q` aborts, anything else is rejected in place.
    pub fn select(&mut self, input: &str) -> Result<SessionState> {
        self.expect_state(&[SessionState::AwaitingSelection])?;

        if is_quit(input) {
            self.state = SessionState::Aborted;
            return Ok(self.state);
        }

        match input.trim().parse::<usize>() {
            Ok(n) if (1..=self.candidates.len()).contains(&n) => {
                self.selected = Some(n - 1);
                self.state = SessionState::Resolved;
                Ok(self.state)
            }
            Ok(n) => Err(Error::AmbiguousInput(format!(
                "{} is not between 1 and {}",
                n,
                self.candidates.len()
            ))),
            Err(_) => Err(Error::AmbiguousInput(format!("'{}' is not a number", input.trim()))),
        }
    }

    /// Switch store.  Codes must be exactly two characters; anything else
    /// resets the locale to the default and is reported as invalid.  The
    /// session restarts at the query prompt either way.
    pub fn change_locale(&mut self, code: &str) -> Result<()> {
        self.expect_state(&[SessionState::AwaitingQuery, SessionState::AwaitingSelection])?;

        self.candidates.clear();
        self.selected = None;
        self.state = SessionState::AwaitingQuery;

        let code = code.trim();
        if code.chars().count() == 2 {
            self.locale = code.to_ascii_lowercase();
            info!("Store changed to [{}]", self.locale);
            Ok(())
        } else {
            self.locale = DEFAULT_LOCALE.to_string();
            Err(Error::AmbiguousInput(format!(
                "invalid country code '{}', using default: {}",
                code, DEFAULT_LOCALE
            )))
        }
    }

    pub fn abort(&mut self) {
        self.state = SessionState::Aborted;
    }

    pub fn selected_album(&self) -> Option<&RemoteAlbum> {
        match self.selected() {
            Some(Candidate::Album(album)) => Some(album),
            _ => None,
        }
    }

    pub fn selected_song(&self) -> Option<&RemoteSong> {
        match self.selected() {
            Some(Candidate::Song(song)) => Some(song),
            _ => None,
        }
    }

    /// Track listing of the resolved album, reconciled across locales.
    ///
    /// When the session locale returns a different number of tracks than
    /// the album advertises, the fallback locales are tried in order and
    /// the first one with a matching count becomes the session locale.
    /// If none matches, the session locale's listing is kept; if that is
    /// empty the session is aborted with [`Error::NoTracks`].
    pub fn resolve_tracks(&mut self) -> Result<TrackListing> {
        self.expect_state(&[SessionState::Resolved])?;
        let album = match self.selected_album() {
            Some(album) => album.clone(),
            None => return Err(Error::InvalidState("resolved without an album".to_string())),
        };

        let expected = album.total_tracks as usize;
        let primary = self.catalog.album_tracks(album.collection_id, &self.locale)?;
        if primary.len() == expected {
            return Ok(TrackListing {
                tracks: primary,
                locale: self.locale.clone(),
                fell_back: false,
                complete: true,
            });
        }

        warn!(
            "[{}] store lists {} of {} tracks for '{}', trying other stores",
            self.locale,
            primary.len(),
            expected,
            album.name
        );

        for locale in &self.fallback_locales {
            if *locale == self.locale {
                continue;
            }
            match self.catalog.album_tracks(album.collection_id, locale) {
                Ok(tracks) if tracks.len() == expected => {
                    info!("Found {} tracks in [{}] store", tracks.len(), locale);
                    self.locale = locale.clone();
                    return Ok(TrackListing {
                        tracks,
                        locale: self.locale.clone(),
                        fell_back: true,
                        complete: true,
                    });
                }
                Ok(tracks) => debug!("[{}] store lists {} tracks", locale, tracks.len()),
                Err(e) => debug!("[{}] store lookup failed: {}", locale, e),
            }
        }

        if primary.is_empty() {
            self.state = SessionState::Aborted;
            return Err(Error::NoTracks {
                collection_id: album.collection_id,
                locale: self.locale.clone(),
            });
        }

        Ok(TrackListing {
            tracks: primary,
            locale: self.locale.clone(),
            fell_back: false,
            complete: false,
        })
    }

    /// Track listing of any collection in the session locale.
    pub fn album_tracks(&self, collection_id: u64) -> Result<Vec<RemoteTrack>> {
        self.catalog.album_tracks(collection_id, &self.locale)
    }

    /// Artwork of the resolved candidate.
    pub fn fetch_artwork(&self) -> Result<Vec<u8>> {
        let url = match self.selected() {
            Some(Candidate::Album(album)) => &album.artwork_url,
            Some(Candidate::Song(song)) => &song.artwork_url,
            None => return Err(Error::InvalidState(self.state.to_string())),
        };
        debug!("Fetching artwork [{}] {}", self.locale, url);
        self.catalog.fetch_artwork(url)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory catalog keyed by locale.
    #[derive(Default)]
    pub(crate) struct FakeCatalog {
        pub albums: Vec<RemoteAlbum>,
        pub songs: Vec<RemoteSong>,
        pub tracks_by_locale: HashMap<String, usize>,
        pub lookups: RefCell<Vec<String>>,
    }

    pub(crate) fn album(id: u64, artist: &str, name: &str, total: u32) -> RemoteAlbum {
        RemoteAlbum {
            collection_id: id,
            artist_id: Some(7),
            artist: artist.to_string(),
            name: name.to_string(),
            genre: "Reggae".to_string(),
            release_date: "2017-07-21T07:00:00Z".to_string(),
            total_tracks: total,
            publisher: Some("℗ 2017 Label".to_string()),
            artwork_url: "https://x/600x600bb.jpg".to_string(),
        }
    }

    pub(crate) fn tracks(n: usize) -> Vec<RemoteTrack> {
        (1..=n as u32)
            .map(|i| RemoteTrack {
                track_id: 100 + i as u64,
                name: format!("Track {}", i),
                artist: "Artist".to_string(),
                track_number: i,
                disc_number: Some(1),
                total_discs: Some(1),
            })
            .collect()
    }

    impl Catalog for FakeCatalog {
        fn name(&self) -> &str {
            "fake"
        }

        fn search_albums(&self, query: &str, _locale: &str) -> Result<Vec<RemoteAlbum>> {
            if query == "offline" {
                return Err(Error::RemoteUnavailable("connection refused".into()));
            }
            Ok(self
                .albums
                .iter()
                .filter(|a| query.contains(&a.artist) || query == "all")
                .cloned()
                .collect())
        }

        fn search_songs(&self, _query: &str, _locale: &str) -> Result<Vec<RemoteSong>> {
            Ok(self.songs.clone())
        }

        fn album_tracks(&self, _collection_id: u64, locale: &str) -> Result<Vec<RemoteTrack>> {
            self.lookups.borrow_mut().push(locale.to_string());
            Ok(tracks(self.tracks_by_locale.get(locale).copied().unwrap_or(0)))
        }

        fn fetch_artwork(&self, _url: &str) -> Result<Vec<u8>> {
            Ok(vec![0xFF, 0xD8, 0xFF])
        }
    }

    fn three_albums() -> FakeCatalog {
        FakeCatalog {
            albums: vec![
                album(1, "Damian Marley", "Stony Hill", 18),
                album(2, "Damian Marley", "Welcome to Jamrock", 13),
                album(3, "Damian Marley", "Halfway Tree", 16),
            ],
            ..Default::default()
        }
    }

    fn session(catalog: &FakeCatalog) -> MatchSession<'_, FakeCatalog> {
        let local = BasicTrackData {
            artist: "Damian Marley".into(),
            album_artist: "Damian Marley".into(),
            album: "Welcome to Jamrock".into(),
            total_tracks: Some(13),
            ..Default::default()
        };
        MatchSession::new(catalog, SearchMode::Album, local)
    }

    fn awaiting_selection(catalog: &FakeCatalog) -> MatchSession<'_, FakeCatalog> {
        let mut s = session(catalog);
        assert_eq!(s.submit_query("Damian Marley - all").unwrap(), SessionState::PresentingCandidates);
        s.present().unwrap();
        s
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Damian Marley - Stony  Hill "), "Damian Marley Stony Hill");
        assert_eq!(normalize_query("---"), "");
    }

    #[test]
    fn test_empty_and_quit_abort() {
        let catalog = three_albums();
        let mut s = session(&catalog);
        assert_eq!(s.submit_query("").unwrap(), SessionState::Aborted);

        let mut s = session(&catalog);
        assert_eq!(s.submit_query(" q ").unwrap(), SessionState::Aborted);
        assert!(matches!(s.submit_query("again"), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_no_match_returns_to_query() {
        let catalog = three_albums();
        let mut s = session(&catalog);
        let err = s.submit_query("Nobody Known").unwrap_err();
        assert!(matches!(err, Error::NoMatch { .. }));
        assert_eq!(s.state(), SessionState::AwaitingQuery);
    }

    #[test]
    fn test_remote_failure_surfaces() {
        let catalog = three_albums();
        let mut s = session(&catalog);
        assert!(matches!(s.submit_query("offline"), Err(Error::RemoteUnavailable(_))));
        assert_eq!(s.state(), SessionState::AwaitingQuery);
    }

    #[test]
    fn test_selection_validation() {
        let catalog = three_albums();
        for input in ["1", "2", "3"] {
            let mut s = awaiting_selection(&catalog);
            assert_eq!(s.select(input).unwrap(), SessionState::Resolved);
            let n: usize = input.parse().unwrap();
            assert_eq!(s.selected_album().unwrap().collection_id, n as u64);
        }

        let mut s = awaiting_selection(&catalog);
        for input in ["0", "4", "abc"] {
            assert!(matches!(s.select(input), Err(Error::AmbiguousInput(_))));
            assert_eq!(s.state(), SessionState::AwaitingSelection);
        }
        assert_eq!(s.select("q").unwrap(), SessionState::Aborted);
    }

    #[test]
    fn test_candidates_keep_remote_order() {
        let catalog = three_albums();
        let mut s = session(&catalog);
        s.submit_query("Damian Marley").unwrap();
        let shown = s.present().unwrap();
        let ids: Vec<u64> = shown
            .iter()
            .map(|c| match c.candidate {
                Candidate::Album(a) => a.collection_id,
                Candidate::Song(_) => 0,
            })
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(shown[0].number, 1);

        assert!(shown[0].highlights.artist);
        assert!(!shown[0].highlights.name);
        assert!(!shown[0].highlights.total_tracks);
        assert!(shown[1].highlights.name);
        assert!(shown[1].highlights.total_tracks);
    }

    #[test]
    fn test_change_locale() {
        let catalog = three_albums();
        let mut s = awaiting_selection(&catalog);
        s.change_locale("DE").unwrap();
        assert_eq!(s.locale(), "de");
        assert_eq!(s.state(), SessionState::AwaitingQuery);
        assert!(s.candidates().is_empty());

        assert!(matches!(s.change_locale("deu"), Err(Error::AmbiguousInput(_))));
        assert_eq!(s.locale(), DEFAULT_LOCALE);
        assert_eq!(s.state(), SessionState::AwaitingQuery);

        s.submit_query("Damian Marley").unwrap();
        assert!(matches!(s.change_locale("fr"), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_locale_fallback_adopts_third_entry() {
        let mut catalog = three_albums();
        catalog.albums = vec![album(1, "Damian Marley", "Stony Hill", 10)];
        catalog.tracks_by_locale =
            HashMap::from([("us".to_string(), 8), ("gb".to_string(), 9), ("de".to_string(), 7), ("jp".to_string(), 10)]);

        let fallback: Vec<String> = ["gb", "de", "jp", "fr"].iter().map(|s| s.to_string()).collect();
        let mut s = session(&catalog).with_fallback_locales(&fallback);
        s.submit_query("Damian Marley").unwrap();
        s.present().unwrap();
        s.select("1").unwrap();

        let listing = s.resolve_tracks().unwrap();
        assert_eq!(listing.tracks.len(), 10);
        assert!(listing.fell_back);
        assert!(listing.complete);
        assert_eq!(listing.locale, "jp");
        assert_eq!(s.locale(), "jp");
        assert_eq!(*catalog.lookups.borrow(), vec!["us", "gb", "de", "jp"]);

        s.album_tracks(1).unwrap();
        assert_eq!(catalog.lookups.borrow().last().map(String::as_str), Some("jp"));
    }

    #[test]
    fn test_fallback_exhausted_keeps_primary() {
        let mut catalog = three_albums();
        catalog.albums = vec![album(1, "Damian Marley", "Stony Hill", 10)];
        catalog.tracks_by_locale = HashMap::from([("us".to_string(), 8)]);

        let mut s = session(&catalog).with_fallback_locales(&["gb".to_string()]);
        s.submit_query("Damian Marley").unwrap();
        s.present().unwrap();
        s.select("1").unwrap();

        let listing = s.resolve_tracks().unwrap();
        assert_eq!(listing.tracks.len(), 8);
        assert!(!listing.complete);
        assert_eq!(s.locale(), "us");
    }

    #[test]
    fn test_zero_tracks_everywhere_aborts() {
        let mut catalog = three_albums();
        catalog.albums = vec![album(1, "Damian Marley", "Stony Hill", 10)];

        let mut s = session(&catalog).with_fallback_locales(&["gb".to_string(), "de".to_string()]);
        s.submit_query("Damian Marley").unwrap();
        s.present().unwrap();
        s.select("1").unwrap();

        assert!(matches!(s.resolve_tracks(), Err(Error::NoTracks { collection_id: 1, .. })));
        assert_eq!(s.state(), SessionState::Aborted);
    }

    #[test]
    fn test_alignment_is_positional() {
        let alignment = align(5, &tracks(7));
        assert_eq!(alignment.pairs, vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);
        assert!(alignment.is_mismatch());
        assert_eq!(alignment.unused_tracks(), 5..7);
        assert!(alignment.unmatched_files().is_empty());

        let alignment = align(3, &tracks(2));
        assert_eq!(alignment.pairs.len(), 2);
        assert_eq!(alignment.unmatched_files(), 2..3);

        assert!(!align(4, &tracks(4)).is_mismatch());
    }

    #[test]
    fn test_song_highlights() {
        let song = RemoteSong {
            track_id: 5,
            collection_id: 9,
            artist_id: None,
            name: "Song".into(),
            artist: "Artist".into(),
            album: "LP".into(),
            album_artist: None,
            genre: "Pop".into(),
            release_date: "1999".into(),
            track: 4,
            total_tracks: 12,
            disc: None,
            total_discs: None,
            artwork_url: String::new(),
        };
        let catalog = FakeCatalog {
            songs: vec![song],
            ..Default::default()
        };
        let local = BasicTrackData {
            artist: "Artist".into(),
            title: "Song".into(),
            album: "Other".into(),
            track: Some(4),
            total_tracks: Some(11),
            ..Default::default()
        };
        let mut s = MatchSession::new(&catalog, SearchMode::Song, local);
        s.submit_query("Artist Song").unwrap();
        let shown = s.present().unwrap();
        let h = shown[0].highlights;
        assert!(h.artist && h.name && h.track);
        assert!(!h.album && !h.total_tracks && !h.album_artist);

        s.select("1").unwrap();
        assert_eq!(s.selected_song().unwrap().track_id, 5);
        assert_eq!(s.fetch_artwork().unwrap(), vec![0xFF, 0xD8, 0xFF]);
    }
}
