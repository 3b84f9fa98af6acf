//! Property-based tests for the cache's keyed maps and snapshot lifecycle.
//!
//! These verify invariants that must hold for all inputs: map algebra,
//! modify-or-remove equivalence, frozen/working round trips, and isolation
//! between snapshot generations.

use std::collections::HashMap;

use murmur_cache::{CacheBuilder, FrozenMap, WorkingMap};
use murmur_model::{
    Id, Message, Timestamp, UpdateEvent, User,
    id::marker::{ChannelMarker, MessageMarker},
};
use proptest::prelude::*;

fn bot() -> User {
    User { id: Id::new(1), username: "bot".to_owned(), discriminator: 1, avatar: None, bot: true }
}

fn message(id: u64, channel: u64) -> Message {
    Message {
        id: Id::new(id),
        channel_id: Id::new(channel),
        author: bot(),
        content: format!("msg-{id}"),
        timestamp: Timestamp::from_unix_millis(id),
        edited_timestamp: None,
        reactions: Vec::new(),
    }
}

/// Entries for an arbitrary small map keyed by message id.
fn entries() -> impl Strategy<Value = HashMap<u64, u32>> {
    prop::collection::hash_map(any::<u64>(), any::<u32>(), 0..32)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: get after put returns the put value; get after remove is
    /// absent; unrelated keys are unaffected.
    #[test]
    fn prop_put_get_remove_algebra(
        entries in entries(),
        key in any::<u64>(),
        value in any::<u32>()
    ) {
        let mut map: WorkingMap<MessageMarker, u32> =
            entries.iter().map(|(k, v)| (Id::new(*k), *v)).collect();

        map.insert(Id::new(key), value);
        prop_assert_eq!(map.get(Id::new(key)), Some(&value));

        map.remove(Id::new(key));
        prop_assert_eq!(map.get(Id::new(key)), None);

        for (k, v) in &entries {
            if *k != key {
                prop_assert_eq!(map.get(Id::new(*k)), Some(v));
            }
        }
    }

    /// Property: modify_or_remove on a frozen map is exactly filter-map over
    /// its entries, and the receiver is untouched.
    #[test]
    fn prop_frozen_modify_or_remove_is_filter_map(entries in entries()) {
        let map: FrozenMap<MessageMarker, u32> =
            entries.iter().map(|(k, v)| (Id::new(*k), *v)).collect();

        // Keep even values, doubling them; drop odd values.
        let swept = map.modify_or_remove(|_, v| (v % 2 == 0).then_some(v * 2));

        let expected: HashMap<u64, u32> = entries
            .iter()
            .filter(|(_, v)| *v % 2 == 0)
            .map(|(k, v)| (*k, v * 2))
            .collect();

        prop_assert_eq!(swept.len(), expected.len());
        for (k, v) in &expected {
            prop_assert_eq!(swept.get(Id::new(*k)), Some(v));
        }
        // Receiver unchanged.
        prop_assert_eq!(map.len(), entries.len());
    }

    /// Property: a function that always returns absent empties the map; the
    /// identity function preserves it.
    #[test]
    fn prop_modify_or_remove_extremes(entries in entries()) {
        let map: FrozenMap<MessageMarker, u32> =
            entries.iter().map(|(k, v)| (Id::new(*k), *v)).collect();

        prop_assert!(map.modify_or_remove(|_, _| None).is_empty());

        let kept = map.modify_or_remove(|_, v| Some(*v));
        prop_assert_eq!(kept, map);
    }

    /// Property: freeze then thaw (and thaw then freeze) preserve every
    /// entry exactly.
    #[test]
    fn prop_freeze_thaw_round_trip(entries in entries()) {
        let working: WorkingMap<MessageMarker, u32> =
            entries.iter().map(|(k, v)| (Id::new(*k), *v)).collect();

        let frozen = working.freeze();
        prop_assert_eq!(frozen.thaw(), working.clone());

        let refrozen = working.freeze().thaw().freeze();
        prop_assert_eq!(refrozen, frozen);
    }

    /// Property: builder-to-snapshot freezing copies structurally; mutating
    /// the builder afterwards never alters an already-frozen generation.
    #[test]
    fn prop_generations_are_isolated(ids in prop::collection::hash_set(any::<u64>(), 1..16)) {
        let mut builder = CacheBuilder::seed(bot());
        for id in &ids {
            builder.apply(&UpdateEvent::MessageCreate(message(*id, 5)))?;
        }

        let snapshot = builder.freeze();
        let mut next = snapshot.to_builder();
        for id in &ids {
            next.apply(&UpdateEvent::MessageDelete { channel_id: Id::new(5), id: Id::new(*id) })?;
        }

        // The older generation still holds every message.
        let inner: Option<usize> = snapshot.messages().get(Id::new(5)).map(FrozenMap::len);
        prop_assert_eq!(inner, Some(ids.len()));
        for id in &ids {
            prop_assert!(snapshot.message(Id::new(5), Id::new(*id)).is_some());
        }
    }

    /// Property: each freeze advances the sequence by exactly one,
    /// regardless of how many events the cycle applied.
    #[test]
    fn prop_sequence_advances_by_one(batches in prop::collection::vec(0usize..8, 1..6)) {
        let mut snapshot = CacheBuilder::seed(bot()).freeze();
        prop_assert_eq!(snapshot.sequence(), 1);

        let mut expected = 1u64;
        let mut next_id = 0u64;
        for batch in batches {
            let mut builder = snapshot.to_builder();
            for _ in 0..batch {
                builder.apply(&UpdateEvent::MessageCreate(message(next_id, 5)))?;
                next_id += 1;
            }
            snapshot = builder.freeze();
            expected += 1;
            prop_assert_eq!(snapshot.sequence(), expected);
        }
    }
}

#[test]
fn channel_marker_maps_and_message_marker_maps_do_not_mix() {
    // Compile-time property: a channel-keyed map cannot be read with a
    // message id. Uncomment to verify the type error:
    // let map: FrozenMap<ChannelMarker, u32> = FrozenMap::new();
    // let _ = map.get(Id::<MessageMarker>::new(1));
    let map: FrozenMap<ChannelMarker, u32> = FrozenMap::new();
    assert!(map.get(Id::new(1)).is_none());
}
