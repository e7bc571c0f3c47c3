//! This module defines `SongIndex`, an inverted index from title words to the
//! songs whose titles contain them, stored in a [`HashtableMap`].

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::iter::FromIterator;

#[cfg(not(feature = "no_std_support"))]
use std::println;

use log::trace;

use crate::hashtablemap::{HashtableMap, DEFAULT_CAPACITY};
use crate::song::Song;

/// Word index over songs borrowed from their owner.
///
/// Every whitespace-separated word of a title is a key; its value lists the
/// indexed songs containing that word, in the order they were added. A title that
/// repeats a word lists the song once per occurrence.
#[derive(Debug)]
pub struct SongIndex<'a> {
  words: HashtableMap<String, Vec<&'a Song>>,
}

impl<'a> SongIndex<'a> {
  /// Creates an empty index whose map starts with [`DEFAULT_CAPACITY`] buckets.
  pub fn new() -> Self {
    Self::with_capacity(DEFAULT_CAPACITY)
  }

  /// Creates an empty index whose map starts with `capacity` buckets.
  pub fn with_capacity(capacity: usize) -> Self {
    SongIndex {
      words: HashtableMap::with_capacity(capacity),
    }
  }

  /// Creates an index with `capacity` buckets and adds every song, in order.
  pub fn with_songs<I>(capacity: usize, songs: I) -> Self
  where
    I: IntoIterator<Item = &'a Song>,
  {
    let mut index = Self::with_capacity(capacity);
    index.extend(songs);
    index
  }

  /// Indexes `song` under every word of its title.
  pub fn add_song(&mut self, song: &'a Song) {
    for word in song.title_words() {
      match self.words.get_mut(word) {
        Some(songs) => songs.push(song),
        None => {
          trace!("SongIndex: new word '{}'", word);
          self.words.insert(word.to_string(), alloc::vec![song]);
        }
      }
    }
  }

  /// Returns `true` if a song equal to `song` is listed under the first word of
  /// its title. Other words are not consulted, so a song whose first word was
  /// removed from the index reads as absent.
  pub fn contains_song(&self, song: &Song) -> bool {
    song
    .title_words()
    .next()
    .and_then(|first| self.words.get(first))
    .map_or(false, |songs| songs.iter().any(|listed| *listed == song))
  }

  /// Returns the title of every song listed under `word`, in list order, or
  /// `None` if the word was never indexed.
  pub fn find_titles(&self, word: &str) -> Option<Vec<&'a str>> {
    let songs = self.words.get(word)?;
    Some(songs.iter().map(|&song| song.title()).collect())
  }

  /// Returns the distinct artists of the songs listed under `word`, in the order
  /// first seen, or `None` if the word was never indexed.
  pub fn find_artists(&self, word: &str) -> Option<Vec<&'a str>> {
    let songs = self.words.get(word)?;
    let mut artists: Vec<&'a str> = Vec::new();
    for &song in songs {
      if !artists.contains(&song.artist()) {
        artists.push(song.artist());
      }
    }
    Some(artists)
  }

  /// Counts the songs listed under `word` that were published in `year`.
  /// A word that was never indexed counts zero.
  pub fn find_number_of_songs_in_year(&self, word: &str, year: i32) -> usize {
    self.words.get(word).map_or(0, |songs| {
      songs.iter().filter(|song| song.year_published() == year).count()
    })
  }

  /// Returns the number of distinct indexed words.
  pub fn word_count(&self) -> usize {
    self.words.len()
  }

  /// Takes `word` out of the index, returning the songs that were listed under it.
  pub fn remove_word(&mut self, word: &str) -> Option<Vec<&'a Song>> {
    self.words.remove(word)
  }

  /// Forgets every indexed word.
  pub fn clear(&mut self) {
    self.words.clear();
  }

  /// Prints each indexed word with the titles listed under it.
  #[cfg(not(feature = "no_std_support"))]
  pub fn print_index(&self) {
    println!("------------ INDEX -----------");
    for (word, songs) in &self.words {
      let titles: Vec<&str> = songs.iter().map(|song| song.title()).collect();
      println!("{}: {:?}", word, titles);
    }
    println!("------------------------------");
  }
}

impl Default for SongIndex<'_> {
  fn default() -> Self {
    Self::new()
  }
}

impl<'a> Extend<&'a Song> for SongIndex<'a> {
  fn extend<I: IntoIterator<Item = &'a Song>>(&mut self, songs: I) {
    for song in songs {
      self.add_song(song);
    }
  }
}

impl<'a> FromIterator<&'a Song> for SongIndex<'a> {
  fn from_iter<I: IntoIterator<Item = &'a Song>>(songs: I) -> Self {
    Self::with_songs(DEFAULT_CAPACITY, songs)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use alloc::vec;

  fn library() -> Vec<Song> {
    vec![
      Song::new("Blue Moon", "A", 1990),
      Song::new("Moon River", "B", 1961),
      Song::new("Blue Velvet", "C", 1963),
      Song::new("Blue Moon", "D", 1990),
      Song::new("Harvest Moon", "A", 1992),
    ]
  }

  #[test]
  fn test_single_song_queries() {
    let song = Song::new("Blue Moon", "A", 1990);
    let mut index = SongIndex::new();
    index.add_song(&song);

    assert_eq!(index.find_titles("Blue"), Some(vec!["Blue Moon"]));
    assert_eq!(index.find_artists("Moon"), Some(vec!["A"]));
    assert_eq!(index.find_number_of_songs_in_year("Blue", 1990), 1);
    assert_eq!(index.find_number_of_songs_in_year("Blue", 1991), 0);
    assert_eq!(index.find_titles("Nonexistent"), None);
    assert_eq!(index.word_count(), 2);
  }

  #[test]
  fn test_titles_keep_order_and_duplicates() {
    let songs = library();
    let index = SongIndex::with_songs(20, &songs);

    assert_eq!(
      index.find_titles("Moon"),
      Some(vec!["Blue Moon", "Moon River", "Blue Moon", "Harvest Moon"])
    );
    assert_eq!(index.find_titles("Blue"), Some(vec!["Blue Moon", "Blue Velvet", "Blue Moon"]));
    assert_eq!(index.find_titles("River"), Some(vec!["Moon River"]));
  }

  #[test]
  fn test_artists_are_distinct_in_first_seen_order() {
    let songs = library();
    let index: SongIndex = songs.iter().collect();

    assert_eq!(index.find_artists("Moon"), Some(vec!["A", "B", "D"]));
    assert_eq!(index.find_artists("Blue"), Some(vec!["A", "C", "D"]));
    assert_eq!(index.find_artists("Sun"), None);
  }

  #[test]
  fn test_missing_word_counts_zero() {
    let songs = library();
    let index = SongIndex::with_songs(4, &songs);

    assert_eq!(index.find_number_of_songs_in_year("Moon", 1990), 2);
    assert_eq!(index.find_number_of_songs_in_year("Moon", 1961), 1);
    assert_eq!(index.find_number_of_songs_in_year("Sun", 1990), 0);
  }

  #[test]
  fn test_repeated_word_in_title() {
    let song = Song::new("Moon Moon Moon", "E", 2005);
    let mut index = SongIndex::new();
    index.add_song(&song);

    assert_eq!(index.word_count(), 1);
    assert_eq!(index.find_titles("Moon"), Some(vec!["Moon Moon Moon"; 3]));
    assert_eq!(index.find_artists("Moon"), Some(vec!["E"]));
    assert_eq!(index.find_number_of_songs_in_year("Moon", 2005), 3);
  }

  #[test]
  fn test_words_are_case_sensitive() {
    let song = Song::new("Blue Moon", "A", 1990);
    let index: SongIndex = core::iter::once(&song).collect();
    assert_eq!(index.find_titles("blue"), None);
  }

  #[test]
  fn test_contains_song() {
    let songs = library();
    let index = SongIndex::with_songs(20, &songs);

    assert!(index.contains_song(&Song::new("Blue Moon", "D", 1990)));
    assert!(index.contains_song(&songs[1]));
    assert!(!index.contains_song(&Song::new("Blue Moon", "D", 1991)));
    assert!(!index.contains_song(&Song::new("Moon", "A", 1990)));
    assert!(!index.contains_song(&Song::new("   ", "A", 1990)));
  }

  #[test]
  fn test_contains_song_uses_first_word_only() {
    let songs = library();
    let mut index = SongIndex::with_songs(20, &songs);

    let removed = index.remove_word("Harvest").unwrap();
    assert_eq!(removed, vec![&songs[4]]);

    // still listed under "Moon", but its first word is gone
    assert_eq!(index.find_number_of_songs_in_year("Moon", 1992), 1);
    assert!(!index.contains_song(&songs[4]));
    assert_eq!(index.remove_word("Harvest"), None);
  }

  #[test]
  fn test_growth_while_indexing() {
    crate::init_test_logger();
    let owned: Vec<Song> = (0..100).map(|i| Song::new(alloc::format!("Track{} Common", i), "F", 2000 + i % 3)).collect();
    let index = SongIndex::with_songs(2, &owned);

    assert_eq!(index.word_count(), 101);
    assert!(index.words.capacity() > 101);
    assert_eq!(index.find_titles("Track57"), Some(vec!["Track57 Common"]));
    assert_eq!(index.find_titles("Common").map(|titles| titles.len()), Some(100));
    assert_eq!(index.find_number_of_songs_in_year("Common", 2001), 33);
    for song in &owned {
      assert!(index.contains_song(song));
    }
  }

  #[test]
  fn test_clear() {
    let songs = library();
    let mut index = SongIndex::with_songs(20, &songs);
    index.clear();

    assert_eq!(index.word_count(), 0);
    assert_eq!(index.find_titles("Blue"), None);
    assert!(!index.contains_song(&songs[0]));

    index.add_song(&songs[0]);
    assert_eq!(index.find_titles("Blue"), Some(vec!["Blue Moon"]));
  }

  #[cfg(not(feature = "no_std_support"))]
  #[test]
  fn test_print_index() {
    let songs = library();
    let index = SongIndex::with_songs(20, &songs);
    index.print_index();
  }
}
