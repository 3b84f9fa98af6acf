//! Keyed entity maps in frozen and working form.
//!
//! The cache keeps every entity category in a map from typed identifier to
//! record. Each map exists in two representations sharing one capability set:
//! [`FrozenMap`], the read-only form published inside a snapshot, and
//! [`WorkingMap`], the mutable form a builder edits during one update cycle.
//! Conversions between the two are full copies in both directions; a frozen
//! map is never a view into the working map that produced it, so later
//! mutation of one can not affect the other.
//!
//! A missing key is a normal absent value, never an error. For nested maps
//! (per-channel messages, per-channel typing stamps, per-guild bans) the
//! frozen side treats an absent outer key as an empty inner map, and the
//! working side auto-creates the inner map on first write.

use std::collections::HashMap;

use murmur_model::Id;

/// Read-only keyed map, as published inside a [`crate::CacheSnapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenMap<T, V> {
    entries: HashMap<Id<T>, V>,
}

impl<T, V> FrozenMap<T, V> {
    /// An empty frozen map.
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Look up an entry.
    pub fn get(&self, key: Id<T>) -> Option<&V> {
        self.entries.get(&key)
    }

    /// Look up an entry, falling back to a detached default value.
    ///
    /// This is the frozen-side read of a nested map's absent outer key: the
    /// caller gets an owned empty inner map and the receiver stays untouched.
    pub fn get_or_default(&self, key: Id<T>) -> V
    where
        V: Clone + Default,
    {
        self.entries.get(&key).cloned().unwrap_or_default()
    }

    /// Whether an entry exists for `key`.
    pub fn contains_key(&self, key: Id<T>) -> bool {
        self.entries.contains_key(&key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &V)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    /// Produce a new map holding `f(key, value)` for every entry where `f`
    /// returns a value, omitting entries where it returns `None`.
    ///
    /// The receiver is not mutated.
    pub fn modify_or_remove<F>(&self, mut f: F) -> Self
    where
        F: FnMut(Id<T>, &V) -> Option<V>,
    {
        Self {
            entries: self
                .entries
                .iter()
                .filter_map(|(key, value)| f(*key, value).map(|next| (*key, next)))
                .collect(),
        }
    }

    /// Full copy into the mutable representation.
    pub fn thaw(&self) -> WorkingMap<T, V>
    where
        V: Clone,
    {
        WorkingMap { entries: self.entries.clone() }
    }

    /// Full copy into the mutable representation, converting each value.
    ///
    /// Used by nested maps, whose inner maps must be converted too.
    pub fn thaw_with<U, F>(&self, mut f: F) -> WorkingMap<T, U>
    where
        F: FnMut(&V) -> U,
    {
        WorkingMap {
            entries: self.entries.iter().map(|(key, value)| (*key, f(value))).collect(),
        }
    }
}

impl<T, V> Default for FrozenMap<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V> FromIterator<(Id<T>, V)> for FrozenMap<T, V> {
    fn from_iter<I: IntoIterator<Item = (Id<T>, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// Mutable keyed map, private to one [`crate::CacheBuilder`] for the duration
/// of an update cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingMap<T, V> {
    entries: HashMap<Id<T>, V>,
}

impl<T, V> WorkingMap<T, V> {
    /// An empty working map.
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Look up an entry.
    pub fn get(&self, key: Id<T>) -> Option<&V> {
        self.entries.get(&key)
    }

    /// Look up an entry mutably.
    pub fn get_mut(&mut self, key: Id<T>) -> Option<&mut V> {
        self.entries.get_mut(&key)
    }

    /// Look up an entry, falling back to a detached default value.
    pub fn get_or_default(&self, key: Id<T>) -> V
    where
        V: Clone + Default,
    {
        self.entries.get(&key).cloned().unwrap_or_default()
    }

    /// The entry for `key`, inserted as `V::default()` first when absent.
    ///
    /// This is the working-side write to a nested map: the inner map for a
    /// previously-absent outer key comes into existence on first use.
    pub fn entry_or_default(&mut self, key: Id<T>) -> &mut V
    where
        V: Default,
    {
        self.entries.entry(key).or_default()
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: Id<T>, value: V) {
        self.entries.insert(key, value);
    }

    /// Delete an entry if present; a missing key is a no-op.
    pub fn remove(&mut self, key: Id<T>) -> Option<V> {
        self.entries.remove(&key)
    }

    /// Whether an entry exists for `key`.
    pub fn contains_key(&self, key: Id<T>) -> bool {
        self.entries.contains_key(&key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &V)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    /// Visit every entry in place, keeping those where `f` returns `true`.
    ///
    /// The mutable twin of [`FrozenMap::modify_or_remove`]: `f` may rewrite
    /// the value through the mutable reference and decides per entry whether
    /// it survives. This is the garbage collector's single-pass sweep.
    pub fn modify_or_remove<F>(&mut self, mut f: F)
    where
        F: FnMut(Id<T>, &mut V) -> bool,
    {
        self.entries.retain(|key, value| f(*key, value));
    }

    /// Full copy into the immutable representation.
    pub fn freeze(&self) -> FrozenMap<T, V>
    where
        V: Clone,
    {
        FrozenMap { entries: self.entries.clone() }
    }

    /// Full copy into the immutable representation, converting each value.
    pub fn freeze_with<U, F>(&self, mut f: F) -> FrozenMap<T, U>
    where
        F: FnMut(&V) -> U,
    {
        FrozenMap {
            entries: self.entries.iter().map(|(key, value)| (*key, f(value))).collect(),
        }
    }
}

impl<T, V> Default for WorkingMap<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V> FromIterator<(Id<T>, V)> for WorkingMap<T, V> {
    fn from_iter<I: IntoIterator<Item = (Id<T>, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use murmur_model::{
        Id,
        id::marker::{ChannelMarker, MessageMarker},
    };

    use super::{FrozenMap, WorkingMap};

    #[test]
    fn insert_then_get_then_remove() {
        let mut map: WorkingMap<MessageMarker, &str> = WorkingMap::new();
        map.insert(Id::new(1), "a");
        map.insert(Id::new(1), "b");

        assert_eq!(map.get(Id::new(1)), Some(&"b"));
        assert_eq!(map.len(), 1);

        assert_eq!(map.remove(Id::new(1)), Some("b"));
        assert_eq!(map.get(Id::new(1)), None);
        assert_eq!(map.remove(Id::new(1)), None);
    }

    #[test]
    fn frozen_modify_or_remove_leaves_the_receiver_untouched() {
        let map: FrozenMap<MessageMarker, u32> =
            [(Id::new(1), 10), (Id::new(2), 25)].into_iter().collect();

        let kept = map.modify_or_remove(|_, value| (*value < 20).then_some(value + 1));

        assert_eq!(kept.get(Id::new(1)), Some(&11));
        assert!(!kept.contains_key(Id::new(2)));
        // Original still holds both entries, unmodified.
        assert_eq!(map.get(Id::new(1)), Some(&10));
        assert_eq!(map.get(Id::new(2)), Some(&25));
    }

    #[test]
    fn working_modify_or_remove_rewrites_in_place() {
        let mut map: WorkingMap<MessageMarker, u32> =
            [(Id::new(1), 10), (Id::new(2), 25)].into_iter().collect();

        map.modify_or_remove(|_, value| {
            *value += 1;
            *value < 20
        });

        assert_eq!(map.get(Id::new(1)), Some(&11));
        assert!(!map.contains_key(Id::new(2)));
    }

    #[test]
    fn modify_or_remove_on_empty_map_is_a_noop() {
        let map: FrozenMap<MessageMarker, u32> = FrozenMap::new();
        assert!(map.modify_or_remove(|_, value| Some(*value)).is_empty());

        let mut map: WorkingMap<MessageMarker, u32> = WorkingMap::new();
        map.modify_or_remove(|_, _| true);
        assert!(map.is_empty());
    }

    #[test]
    fn nested_read_of_absent_outer_key_is_a_detached_empty_map() {
        let outer: FrozenMap<ChannelMarker, FrozenMap<MessageMarker, u32>> = FrozenMap::new();

        let inner = outer.get_or_default(Id::new(7));
        assert!(inner.is_empty());
        // Reading did not vivify anything.
        assert!(outer.is_empty());
    }

    #[test]
    fn nested_write_vivifies_exactly_one_outer_key() {
        let mut outer: WorkingMap<ChannelMarker, WorkingMap<MessageMarker, u32>> =
            WorkingMap::new();

        outer.entry_or_default(Id::new(7)).insert(Id::new(70), 1);

        assert_eq!(outer.len(), 1);
        let inner = outer.get(Id::new(7)).map(WorkingMap::len);
        assert_eq!(inner, Some(1));
    }

    #[test]
    fn freeze_and_thaw_are_independent_copies() {
        let mut working: WorkingMap<MessageMarker, String> = WorkingMap::new();
        working.insert(Id::new(1), "one".to_owned());

        let frozen = working.freeze();
        working.insert(Id::new(2), "two".to_owned());
        working.remove(Id::new(1));

        assert_eq!(frozen.len(), 1);
        assert_eq!(frozen.get(Id::new(1)).map(String::as_str), Some("one"));

        let thawed = frozen.thaw();
        assert_eq!(thawed.get(Id::new(1)).map(String::as_str), Some("one"));
    }
}
