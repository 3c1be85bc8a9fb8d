pub mod catalog;
pub mod cli;
pub mod config;
pub mod cover_cache;
pub mod error;
pub mod field_extractor;
pub mod itunes;
pub mod matcher;
pub mod rate_limiter;
pub mod tag_adapter;
pub mod tag_id3;
pub mod tag_mp4;
pub mod tag_writer;

pub use catalog::{Catalog, RemoteAlbum, RemoteSong, RemoteTrack};
pub use config::Config;
pub use error::{Error, Result};
pub use field_extractor::{
    basic_album_data, basic_track_data, guess_and_info, track_summary, BasicAlbumData,
    BasicTrackData, SearchMode,
};
pub use itunes::ItunesCatalog;
pub use matcher::{align, Alignment, Candidate, MatchSession, SessionState, TrackListing};
pub use tag_adapter::{FieldUpdate, TagFormat, TagSet};
pub use tag_writer::{write_album, write_song, FileOutcome, FileReport, WriteOptions, WriteReport};
