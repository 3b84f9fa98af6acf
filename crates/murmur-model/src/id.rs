//! Typed entity identifiers.
//!
//! Every remote entity is named by a 64-bit identifier, but identifiers of
//! different kinds are never interchangeable: a channel id where a guild id is
//! expected is a bug the compiler should catch, not a runtime surprise. [`Id`]
//! carries a zero-sized marker type for the entity kind and exposes no
//! cross-kind conversion.

use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Entity-kind marker types for [`Id`].
///
/// Markers are uninhabited-by-convention unit types; they only ever appear in
/// the phantom parameter of an identifier.
pub mod marker {
    /// Marker for user identifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct UserMarker;

    /// Marker for guild identifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct GuildMarker;

    /// Marker for channel identifiers (DM, group DM, and guild channels).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct ChannelMarker;

    /// Marker for message identifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct MessageMarker;
}

/// Opaque identifier for an entity of kind `T`.
///
/// Equality, ordering, and hashing are defined on the numeric value only. The
/// marker is purely a compile-time tag; two identifiers of different kinds do
/// not compare at all (the program does not type-check).
pub struct Id<T> {
    value: u64,
    kind: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Wrap a raw identifier value.
    pub const fn new(value: u64) -> Self {
        Self { value, kind: PhantomData }
    }

    /// The raw numeric value.
    pub const fn get(self) -> u64 {
        self.value
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<T> From<u64> for Id<T> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::{Id, marker::UserMarker};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equality_and_hash_follow_the_numeric_value() {
        let a: Id<UserMarker> = Id::new(42);
        let b: Id<UserMarker> = Id::new(42);
        let c: Id<UserMarker> = Id::new(43);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_eq!(a.get(), 42);
    }

    #[test]
    fn display_is_the_bare_number() {
        let id: Id<UserMarker> = Id::new(9_007_199_254_740_993);
        assert_eq!(id.to_string(), "9007199254740993");
        assert_eq!(format!("{id:?}"), "Id(9007199254740993)");
    }
}
