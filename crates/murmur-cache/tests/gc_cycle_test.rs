//! End-to-end update-cycle tests over a hand-stepped clock.
//!
//! Drives a [`Cache`] the way a gateway task would: batches of decoded
//! events, one cycle per batch, with a garbage-collecting processor left in
//! place. The manual clock makes retention sweeps deterministic.

use std::{sync::Arc, time::Duration};

use murmur_cache::{Cache, CacheSnapshot, ManualClock, Processor};
use murmur_model::{Id, Message, Timestamp, UpdateEvent, User};

const START: Timestamp = Timestamp::from_unix_millis(1_700_000_000_000);

fn bot() -> User {
    User { id: Id::new(1), username: "bot".to_owned(), discriminator: 1, avatar: None, bot: true }
}

fn message_record(id: u64, channel: u64, timestamp: Timestamp) -> Message {
    Message {
        id: Id::new(id),
        channel_id: Id::new(channel),
        author: bot(),
        content: format!("msg-{id}"),
        timestamp,
        edited_timestamp: None,
        reactions: Vec::new(),
    }
}

fn message_at(id: u64, channel: u64, timestamp: Timestamp) -> UpdateEvent {
    UpdateEvent::MessageCreate(message_record(id, channel, timestamp))
}

/// A cache whose sweep runs on every single cycle, so retention behavior is
/// observable without pumping the countdown.
fn eager_cache(clock: ManualClock) -> Cache<ManualClock> {
    let processor = Processor::CleanGarbage {
        keep_messages: Duration::from_secs(30 * 60),
        keep_typing: Duration::from_secs(5 * 60),
    };
    Cache::from_snapshot(clock, CacheSnapshot::seed_with(bot(), processor))
}

#[test]
fn stale_messages_are_swept_and_empty_channels_collapsed() {
    let clock = ManualClock::new(START);
    let mut cache = eager_cache(clock.clone());
    clock.advance(Duration::from_secs(40 * 60));
    let minutes_ago = |minutes: u64| START.saturating_add(Duration::from_secs((40 - minutes) * 60));

    cache
        .update(&[
            message_at(70, 5, minutes_ago(40)),
            message_at(71, 5, minutes_ago(10)),
            message_at(80, 6, minutes_ago(40)),
        ])
        .unwrap();

    let snapshot = cache.snapshot();
    // Channel 5 keeps only the fresh message.
    assert!(snapshot.message(Id::new(5), Id::new(70)).is_none());
    assert!(snapshot.message(Id::new(5), Id::new(71)).is_some());
    // Channel 6 lost its only message, so its outer entry is gone entirely.
    assert!(!snapshot.messages().contains_key(Id::new(6)));
}

#[test]
fn an_edit_refreshes_a_message_for_retention() {
    let clock = ManualClock::new(START);
    let mut cache = eager_cache(clock.clone());
    clock.advance(Duration::from_secs(40 * 60));

    // Stale by creation time, fresh by edit time.
    let mut message = message_record(70, 5, START);
    message.edited_timestamp = Some(START.saturating_add(Duration::from_secs(35 * 60)));
    cache.update(&[UpdateEvent::MessageCreate(message)]).unwrap();

    assert!(cache.snapshot().message(Id::new(5), Id::new(70)).is_some());
}

#[test]
fn typing_stamps_expire_on_their_own_window() {
    let clock = ManualClock::new(START);
    let mut cache = eager_cache(clock.clone());
    clock.advance(Duration::from_secs(6 * 60));

    cache
        .update(&[
            UpdateEvent::TypingStart {
                channel_id: Id::new(5),
                user_id: Id::new(2),
                timestamp: START,
            },
            UpdateEvent::TypingStart {
                channel_id: Id::new(5),
                user_id: Id::new(3),
                timestamp: START.saturating_add(Duration::from_secs(5 * 60)),
            },
        ])
        .unwrap();

    let snapshot = cache.snapshot();
    assert!(snapshot.typing_started(Id::new(5), Id::new(2)).is_none());
    assert!(snapshot.typing_started(Id::new(5), Id::new(3)).is_some());
}

#[test]
fn the_periodic_processor_fires_after_its_countdown() {
    let clock = ManualClock::new(START);
    let processor =
        Processor::clean_every(3, Duration::from_secs(30 * 60), Duration::from_secs(5 * 60));
    let mut cache =
        Cache::from_snapshot(clock.clone(), CacheSnapshot::seed_with(bot(), processor));

    // A message that is stale by the time sweeps run; it survives until the
    // countdown actually fires.
    cache.update(&[message_at(70, 5, START)]).unwrap();
    clock.advance(Duration::from_secs(3600));

    // Second and third cycles only count down.
    for _ in 0..2 {
        cache.update(&[]).unwrap();
        assert!(cache.snapshot().message(Id::new(5), Id::new(70)).is_some());
    }

    // Fourth cycle: the sweep fires and the stale message goes.
    cache.update(&[]).unwrap();
    assert!(cache.snapshot().message(Id::new(5), Id::new(70)).is_none());
}

#[test]
fn readers_of_older_generations_see_no_interference() {
    let mut cache = eager_cache(ManualClock::new(START));
    cache.update(&[message_at(70, 5, START)]).unwrap();
    let older: Arc<CacheSnapshot> = cache.snapshot();

    // A reader thread holds the older generation while the driver keeps
    // cycling.
    let reader = std::thread::spawn({
        let older = Arc::clone(&older);
        move || {
            for _ in 0..100 {
                assert!(older.message(Id::new(5), Id::new(70)).is_some());
            }
        }
    });

    cache
        .update(&[UpdateEvent::MessageDelete { channel_id: Id::new(5), id: Id::new(70) }])
        .unwrap();
    reader.join().unwrap();

    assert!(cache.snapshot().message(Id::new(5), Id::new(70)).is_none());
    assert!(older.message(Id::new(5), Id::new(70)).is_some());
}
