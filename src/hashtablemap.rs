// --- Imports ---
use alloc::vec::{Vec, IntoIter as VecIntoIter};

use core::borrow::Borrow;
use core::fmt::{self, Debug};
use core::hash::{BuildHasher, Hash};
use core::iter::{Flatten, FromIterator};
use core::mem;
use core::ops::Index;
use core::slice;

use log::debug;

use crate::error::MapError;

/// Hash builder used when none is given: std's randomly seeded `RandomState`.
#[cfg(not(feature = "no_std_support"))]
pub type DefaultHashBuilder = std::collections::hash_map::RandomState;

/// Hash builder used when none is given: hashbrown's default builder, which needs no std.
#[cfg(feature = "no_std_support")]
pub type DefaultHashBuilder = hashbrown::hash_map::DefaultHashBuilder;

/// Number of buckets a map starts with when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 20;

// Growth triggers once len / capacity >= 4 / 5.
const LOAD_FACTOR_NUMERATOR: usize = 4;
const LOAD_FACTOR_DENOMINATOR: usize = 5;

/// Entries sharing one hash slot, in insertion order.
type Bucket<K, V> = Vec<(K, V)>;

/// Maps a hash to a bucket of a table with `capacity` buckets.
///
/// The hash is unsigned, so the reduction is a plain remainder with no sign to
/// strip and nothing that can overflow. `capacity` must be non-zero.
#[inline]
pub fn bucket_index(hash: u64, capacity: usize) -> usize {
  (hash % capacity as u64) as usize
}

/// A hash table map resolving collisions by chaining.
///
/// Each slot of the bucket array is `None` until the first key hashing to it is
/// inserted, and then holds every `(key, value)` entry of that slot. When an insert
/// brings the load factor (`len / capacity`) to 80% or more, the bucket array
/// doubles and every entry is moved into its bucket for the new capacity.
///
/// Keys are unique: inserting a key that is already present fails and leaves the
/// stored value alone.
pub struct HashtableMap<K, V, S = DefaultHashBuilder> {
  /// Bucket array. Its length is the capacity, and it is never empty.
  buckets: Vec<Option<Bucket<K, V>>>,
  /// The number of live entries.
  count: usize,
  hash_builder: S,
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Option<Bucket<K, V>>> {
  let mut buckets = Vec::with_capacity(capacity);
  buckets.resize_with(capacity, || None);
  buckets
}

impl<K, V> HashtableMap<K, V, DefaultHashBuilder> {
  /// Creates an empty map with [`DEFAULT_CAPACITY`] buckets.
  ///
  /// # Examples
  ///
  /// ```
  /// use songmap::hashtablemap::{HashtableMap, DEFAULT_CAPACITY};
  /// let map: HashtableMap<String, i32> = HashtableMap::new();
  /// assert_eq!(map.len(), 0);
  /// assert_eq!(map.capacity(), DEFAULT_CAPACITY);
  /// ```
  pub fn new() -> Self {
    Self::with_capacity(DEFAULT_CAPACITY)
  }

  /// Creates an empty map with `capacity` buckets. A capacity of zero is raised
  /// to one.
  ///
  /// # Examples
  ///
  /// ```
  /// use songmap::hashtablemap::HashtableMap;
  /// let map: HashtableMap<&str, i32> = HashtableMap::with_capacity(8);
  /// assert_eq!(map.capacity(), 8);
  /// ```
  pub fn with_capacity(capacity: usize) -> Self {
    Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
  }
}

impl<K, V, S> HashtableMap<K, V, S> {
  /// Creates an empty map with [`DEFAULT_CAPACITY`] buckets that hashes keys with `hash_builder`.
  pub fn with_hasher(hash_builder: S) -> Self {
    Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hash_builder)
  }

  /// Creates an empty map with `capacity` buckets (at least one) that hashes keys
  /// with `hash_builder`.
  pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
    HashtableMap {
      buckets: empty_buckets(capacity.max(1)),
      count: 0,
      hash_builder,
    }
  }

  /// Returns the number of buckets, which is not the number of entries.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.buckets.len()
  }

  /// Returns the number of entries currently stored in the map.
  ///
  /// # Examples
  ///
  /// ```
  /// use songmap::hashtablemap::HashtableMap;
  /// let mut map = HashtableMap::new();
  /// map.insert("a", 1);
  /// map.insert("b", 2);
  /// assert_eq!(map.len(), 2);
  /// map.remove("a");
  /// assert_eq!(map.len(), 1);
  /// ```
  #[inline]
  pub fn len(&self) -> usize {
    self.count
  }

  /// Returns `true` if the map holds no entries.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.count == 0
  }

  /// Returns `len / capacity`.
  pub fn load_factor(&self) -> f64 {
    self.count as f64 / self.buckets.len() as f64
  }

  /// Removes every entry. The number of buckets stays the same.
  ///
  /// # Examples
  ///
  /// ```
  /// use songmap::hashtablemap::HashtableMap;
  /// let mut map = HashtableMap::with_capacity(10);
  /// map.insert(1, "one");
  /// map.clear();
  /// assert!(map.is_empty());
  /// assert!(!map.contains_key(&1));
  /// assert_eq!(map.capacity(), 10);
  /// ```
  pub fn clear(&mut self) {
    self.buckets.iter_mut().for_each(|slot| *slot = None);
    self.count = 0;
  }

  /// Returns an iterator over all entries, in bucket order.
  pub fn iter(&self) -> Iter<'_, K, V> {
    Iter {
      buckets: self.buckets.iter(),
      entries: None,
      remaining: self.count,
    }
  }

  /// Returns an iterator over all keys, in bucket order.
  pub fn keys(&self) -> impl Iterator<Item = &K> {
    self.iter().map(|(key, _)| key)
  }

  /// Returns an iterator over all values, in bucket order.
  pub fn values(&self) -> impl Iterator<Item = &V> {
    self.iter().map(|(_, value)| value)
  }
}

impl<K, V, S> HashtableMap<K, V, S>
where
  K: Hash + Eq,
  S: BuildHasher,
{
  fn bucket_of<Q>(&self, key: &Q) -> usize
  where
    Q: ?Sized + Hash,
  {
    bucket_index(self.hash_builder.hash_one(key), self.buckets.len())
  }

  /// Finds `(bucket, slot)` of the entry whose key equals `key`.
  fn position<Q>(&self, key: &Q) -> Option<(usize, usize)>
  where
    K: Borrow<Q>,
    Q: ?Sized + Hash + Eq,
  {
    let index = self.bucket_of(key);
    let bucket = self.buckets[index].as_ref()?;
    bucket
    .iter()
    .position(|(k, _)| k.borrow() == key)
    .map(|slot| (index, slot))
  }

  /// Inserts `value` under `key`, returning `false` (and changing nothing) if
  /// the key is already present.
  ///
  /// Growth happens inside this call, so the map is always observed either
  /// entirely at the old capacity or entirely at the new one.
  ///
  /// # Examples
  ///
  /// ```
  /// use songmap::hashtablemap::HashtableMap;
  /// let mut map = HashtableMap::new();
  /// assert!(map.insert("blue", 1));
  /// assert!(!map.insert("blue", 2));
  /// assert_eq!(map.lookup("blue"), Ok(&1));
  /// ```
  pub fn insert(&mut self, key: K, value: V) -> bool {
    self.try_insert(key, value).is_ok()
  }

  /// Like [`insert`](Self::insert), but reports a present key as
  /// [`MapError::DuplicateKey`].
  pub fn try_insert(&mut self, key: K, value: V) -> Result<(), MapError> {
    let index = self.bucket_of(&key);
    let bucket = self.buckets[index].get_or_insert_with(Vec::new);
    if bucket.iter().any(|(k, _)| *k == key) {
      return Err(MapError::DuplicateKey);
    }
    bucket.push((key, value));
    self.count += 1;

    if self.count.saturating_mul(LOAD_FACTOR_DENOMINATOR)
      >= self.buckets.len().saturating_mul(LOAD_FACTOR_NUMERATOR)
    {
      self.grow();
    }
    Ok(())
  }

  /// Doubles the bucket array and moves every entry to its new bucket.
  fn grow(&mut self) {
    let old_capacity = self.buckets.len();
    let new_capacity = old_capacity.saturating_mul(2);
    let mut buckets = empty_buckets(new_capacity);

    let mut moved = 0;
    for (key, value) in mem::take(&mut self.buckets).into_iter().flatten().flatten() {
      let index = bucket_index(self.hash_builder.hash_one(&key), new_capacity);
      buckets[index].get_or_insert_with(Vec::new).push((key, value));
      moved += 1;
    }
    assert_eq!(
      moved, self.count,
      "HashtableMap logic error: rehash moved {} entries but {} were live",
      moved, self.count
    );

    self.buckets = buckets;
    debug!("HashtableMap grew from {} to {} buckets, {} entries rehashed", old_capacity, new_capacity, moved);
  }

  /// Returns the value stored under `key`, or [`MapError::NotFound`].
  ///
  /// # Examples
  ///
  /// ```
  /// use songmap::hashtablemap::HashtableMap;
  /// use songmap::error::MapError;
  /// let mut map = HashtableMap::new();
  /// map.insert(String::from("moon"), 7);
  /// assert_eq!(map.lookup("moon"), Ok(&7));
  /// assert_eq!(map.lookup("sun"), Err(MapError::NotFound));
  /// ```
  pub fn lookup<Q>(&self, key: &Q) -> Result<&V, MapError>
  where
    K: Borrow<Q>,
    Q: ?Sized + Hash + Eq,
  {
    self.get(key).ok_or(MapError::NotFound)
  }

  /// Returns a mutable reference to the value stored under `key`, or [`MapError::NotFound`].
  pub fn lookup_mut<Q>(&mut self, key: &Q) -> Result<&mut V, MapError>
  where
    K: Borrow<Q>,
    Q: ?Sized + Hash + Eq,
  {
    self.get_mut(key).ok_or(MapError::NotFound)
  }

  /// Returns the value stored under `key`, if any.
  pub fn get<Q>(&self, key: &Q) -> Option<&V>
  where
    K: Borrow<Q>,
    Q: ?Sized + Hash + Eq,
  {
    let (index, slot) = self.position(key)?;
    self.buckets[index].as_ref().map(|bucket| &bucket[slot].1)
  }

  /// Returns a mutable reference to the value stored under `key`, if any.
  pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
  where
    K: Borrow<Q>,
    Q: ?Sized + Hash + Eq,
  {
    let (index, slot) = self.position(key)?;
    self.buckets[index].as_mut().map(|bucket| &mut bucket[slot].1)
  }

  /// Returns `true` if an entry with a key equal to `key` exists.
  pub fn contains_key<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: ?Sized + Hash + Eq,
  {
    self.position(key).is_some()
  }

  /// Removes the entry stored under `key` and returns its value.
  ///
  /// # Examples
  ///
  /// ```
  /// use songmap::hashtablemap::HashtableMap;
  /// let mut map = HashtableMap::new();
  /// map.insert(3, "three");
  /// assert_eq!(map.remove(&3), Some("three"));
  /// assert_eq!(map.remove(&3), None);
  /// assert!(map.is_empty());
  /// ```
  pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: ?Sized + Hash + Eq,
  {
    let (index, slot) = self.position(key)?;
    let bucket = self.buckets[index].as_mut()?;
    let (_, value) = bucket.remove(slot);
    if bucket.is_empty() {
      self.buckets[index] = None;
    }
    self.count -= 1;
    Some(value)
  }
}

/// Iterator over the entries of a [`HashtableMap`], created by [`HashtableMap::iter`].
pub struct Iter<'a, K, V> {
  buckets: slice::Iter<'a, Option<Bucket<K, V>>>,
  entries: Option<slice::Iter<'a, (K, V)>>,
  remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
  type Item = (&'a K, &'a V);

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      if let Some((key, value)) = self.entries.as_mut().and_then(|entries| entries.next()) {
        self.remaining -= 1;
        return Some((key, value));
      }
      match self.buckets.next()? {
        Some(bucket) => self.entries = Some(bucket.iter()),
        None => continue,
      }
    }
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// An iterator that consumes a [`HashtableMap`] and yields its entries.
pub struct HashtableMapIntoIter<K, V> {
  inner: Flatten<Flatten<VecIntoIter<Option<Bucket<K, V>>>>>,
}

impl<K, V> Iterator for HashtableMapIntoIter<K, V> {
  type Item = (K, V);

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.inner.next()
  }
}

impl<K, V, S> IntoIterator for HashtableMap<K, V, S> {
  type Item = (K, V);
  type IntoIter = HashtableMapIntoIter<K, V>;

  fn into_iter(self) -> Self::IntoIter {
    HashtableMapIntoIter {
      inner: self.buckets.into_iter().flatten().flatten(),
    }
  }
}

impl<'a, K, V, S> IntoIterator for &'a HashtableMap<K, V, S> {
  type Item = (&'a K, &'a V);
  type IntoIter = Iter<'a, K, V>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// Implements `map[&key]`.
///
/// # Panics
///
/// Panics if no entry is stored under `key`. For non-panicking access, use
/// [`get`](HashtableMap::get) or [`lookup`](HashtableMap::lookup).
impl<K, V, S, Q> Index<&Q> for HashtableMap<K, V, S>
where
  K: Borrow<Q> + Hash + Eq,
  Q: ?Sized + Hash + Eq,
  S: BuildHasher,
{
  type Output = V;

  #[inline]
  fn index(&self, key: &Q) -> &V {
    match self.get(key) {
      Some(value) => value,
      None => panic!("HashtableMap: no entry found for key"),
    }
  }
}

impl<K: Debug, V: Debug, S> Debug for HashtableMap<K, V, S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.iter()).finish()
  }
}

impl<K, V, S: Default> Default for HashtableMap<K, V, S> {
  fn default() -> Self {
    Self::with_capacity_and_hasher(DEFAULT_CAPACITY, S::default())
  }
}

/// Inserts every pair in order. Pairs whose key is already present are dropped.
impl<K, V, S> Extend<(K, V)> for HashtableMap<K, V, S>
where
  K: Hash + Eq,
  S: BuildHasher,
{
  fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
    for (key, value) in iter {
      self.insert(key, value);
    }
  }
}

impl<K, V, S> FromIterator<(K, V)> for HashtableMap<K, V, S>
where
  K: Hash + Eq,
  S: BuildHasher + Default,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut map = Self::default();
    map.extend(iter);
    map
  }
}
