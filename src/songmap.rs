//! This crate provides a generic hash table map with chained buckets and automatic
//! growth, and a word index over song records built on top of it.
//!
//! [`HashtableMap`] keeps one slot per bucket, each holding the `(key, value)`
//! entries whose hash lands there. The bucket array doubles whenever an insert
//! brings the load factor to 80%. Keys are unique and inserting never overwrites.
//!
//! [`SongIndex`] maps each word of a song title to the songs containing it and
//! answers title, artist and per-year queries by word.
//!
//! ```
//! use songmap::{Song, SongIndex};
//!
//! let songs = vec![Song::new("Blue Moon", "A", 1990)];
//! let index: SongIndex = songs.iter().collect();
//! assert_eq!(index.find_titles("Blue"), Some(vec!["Blue Moon"]));
//! assert_eq!(index.find_artists("Moon"), Some(vec!["A"]));
//! assert_eq!(index.find_number_of_songs_in_year("Blue", 1991), 0);
//! assert_eq!(index.find_titles("Nonexistent"), None);
//! ```
#![cfg_attr(all(feature = "no_std_support", not(test)), no_std)]

extern crate alloc;

pub mod error;
pub mod hashtablemap;
pub mod song;
pub mod songindex;

pub use crate::error::MapError;
pub use crate::hashtablemap::HashtableMap;
pub use crate::song::Song;
pub use crate::songindex::SongIndex;

#[cfg(test)]
static TEST_LOGGER: std::sync::Once = std::sync::Once::new();

/// Installs `env_logger` for the test run. Later calls do nothing.
#[cfg(test)]
pub(crate) fn init_test_logger() {
  TEST_LOGGER.call_once_force(|_| {
    let _ = env_logger::Builder::new()
    .filter_level(log::LevelFilter::Info)
    .filter_module("songmap", log::LevelFilter::Debug)
    .format_timestamp_millis()
    .parse_default_env()
    .try_init();
  });
}
