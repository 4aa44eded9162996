//! Finds song and album mentions in free-form text.
//!
//! Quoted titles are looked up in a media catalog and the candidates are
//! disambiguated with artist names mentioned nearby, then by popularity.

pub mod backends;
pub mod config;
pub mod credentials;
pub mod error;
pub mod input;
pub mod media;
pub mod report;
pub mod resolve;

pub use backends::{KindLookup, MediaCatalog, MediaLookup};
pub use error::{Error, Result};
pub use media::{Contributor, MediaItem, MediaKind};
pub use resolve::{find_albums, find_in_file, find_in_text, find_media_items, find_songs, ResultSet};
