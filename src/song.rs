//! This module defines `Song`, the record the index is built over.

use alloc::string::String;
use core::fmt;

#[cfg(feature = "serde_support")]
use alloc::string::ToString;
#[cfg(feature = "serde_support")]
use alloc::vec::Vec;
#[cfg(feature = "serde_support")]
use serde_json::{json, Value};

#[cfg(feature = "serde_support")]
use crate::error::SongError;

/// A song's title, artist and publication year.
///
/// Two songs are equal when all three fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Song {
  title: String,
  artist: String,
  year_published: i32,
}

impl Song {
  pub fn new(title: impl Into<String>, artist: impl Into<String>, year_published: i32) -> Self {
    Song {
      title: title.into(),
      artist: artist.into(),
      year_published,
    }
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn artist(&self) -> &str {
    &self.artist
  }

  pub fn year_published(&self) -> i32 {
    self.year_published
  }

  /// Returns the words of the title, split on whitespace, repeats included.
  pub fn title_words(&self) -> impl Iterator<Item = &str> {
    self.title.split_whitespace()
  }

  // --- Serialization / Deserialization ---
  #[cfg(feature = "serde_support")]
  pub fn to_json(&self) -> Value {
    json!({
      "title": self.title,
      "artist": self.artist,
      "year": self.year_published,
    })
  }

  /// Reads a song from a JSON object with `title`, `artist` and `year` fields.
  #[cfg(feature = "serde_support")]
  pub fn from_json(value: &Value) -> Result<Self, SongError> {
    let title = value
    .get("title")
    .and_then(Value::as_str)
    .ok_or(SongError::InvalidField("title"))?;
    let artist = value
    .get("artist")
    .and_then(Value::as_str)
    .ok_or(SongError::InvalidField("artist"))?;
    let year = value
    .get("year")
    .and_then(Value::as_i64)
    .and_then(|year| i32::try_from(year).ok())
    .ok_or(SongError::InvalidField("year"))?;
    Ok(Song::new(title, artist, year))
  }

  /// Reads a JSON array of song objects.
  #[cfg(feature = "serde_support")]
  pub fn list_from_string(s: &str) -> Result<Vec<Song>, SongError> {
    let value: Value = serde_json::from_str(s).map_err(|e| SongError::Json(e.to_string()))?;
    value
    .as_array()
    .ok_or_else(|| SongError::Json(String::from("expected an array of songs")))?
    .iter()
    .map(Song::from_json)
    .collect()
  }
}

impl fmt::Display for Song {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "\"{}\" by {} ({})", self.title, self.artist, self.year_published)
  }
}
