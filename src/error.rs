//! Error types returned by the map and the song interchange helpers.

use thiserror::Error;

#[cfg(feature = "serde_support")]
use alloc::string::String;

/// Failures reported by [`HashtableMap`](crate::hashtablemap::HashtableMap).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
  /// No entry with an equal key exists in the key's bucket.
  #[error("key not found")]
  NotFound,
  /// The key is already present. Inserting never overwrites.
  #[error("key already present")]
  DuplicateKey,
}

/// Failures while reading songs from JSON.
#[cfg(feature = "serde_support")]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SongError {
  #[error("invalid JSON: {0}")]
  Json(String),
  #[error("missing or invalid field '{0}'")]
  InvalidField(&'static str),
}
