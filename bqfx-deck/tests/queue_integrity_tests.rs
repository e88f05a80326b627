//! Integration tests for queue, effect stack, and history behavior
//!
//! Drives the public DeckEngine operations with a fast tick interval so
//! playback runs complete in milliseconds.

use std::time::Duration;

use bqfx_common::config::DeckConfig;
use bqfx_common::{Effect, Song};
use bqfx_deck::engine::DeckEngine;
use bqfx_deck::error::Error;
use bqfx_deck::state::PlaybackState;

fn test_config() -> DeckConfig {
    DeckConfig {
        tick_interval_ms: 5,
        ..DeckConfig::default()
    }
}

async fn wait_for_idle(engine: &DeckEngine) {
    for _ in 0..1000 {
        if engine.playback_state().await == PlaybackState::Idle {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("playback did not finish in time");
}

#[tokio::test]
async fn test_play_next_follows_enqueue_order() {
    let engine = DeckEngine::new(&test_config());

    // Zero-length songs so each playback completes almost immediately
    engine.enqueue(Song::new("A", "X", 0)).await;
    engine.enqueue(Song::new("B", "Y", 0)).await;
    engine.enqueue(Song::new("C", "Z", 0)).await;
    assert_eq!(engine.queue_snapshot().await.len(), 3);

    for expected in ["A", "B", "C"] {
        let entry = engine.play_next().await.unwrap();
        assert_eq!(entry.song.title, expected);
        wait_for_idle(&engine).await;
    }

    assert!(engine.queue_snapshot().await.is_empty());
}

#[tokio::test]
async fn test_play_next_empty_queue() {
    let engine = DeckEngine::new(&test_config());

    assert!(matches!(engine.play_next().await, Err(Error::QueueEmpty)));

    // Queue state unchanged, still idle
    assert_eq!(engine.playback_state().await, PlaybackState::Idle);
    assert!(engine.history_snapshot().await.is_empty());
}

#[tokio::test]
async fn test_play_next_while_playing_rejected() {
    let engine = DeckEngine::new(&test_config());

    engine.enqueue(Song::new("A", "X", 3)).await;
    engine.enqueue(Song::new("B", "Y", 5)).await;

    let first = engine.play_next().await.unwrap();
    assert_eq!(first.song.title, "A");

    // A is still running; a second activation is rejected without touching
    // the queue
    assert!(matches!(engine.play_next().await, Err(Error::AlreadyPlaying)));
    assert_eq!(engine.queue_snapshot().await.len(), 1);

    wait_for_idle(&engine).await;

    let second = engine.play_next().await.unwrap();
    assert_eq!(second.song.title, "B");
    wait_for_idle(&engine).await;
}

#[tokio::test]
async fn test_history_records_each_activation() {
    let engine = DeckEngine::new(&test_config());

    let titles = ["A", "B", "C"];
    for title in titles {
        engine.enqueue(Song::new(title, "X", 0)).await;
    }

    for _ in titles {
        engine.play_next().await.unwrap();
        wait_for_idle(&engine).await;
    }

    let history = engine.history_snapshot().await;
    assert_eq!(history.len(), titles.len());
    for (song, expected) in history.iter().zip(titles) {
        assert_eq!(song.title, expected);
    }
}

#[tokio::test]
async fn test_effect_stack_lifo_and_duplicates() {
    let engine = DeckEngine::new(&test_config());

    let active = engine.push_effect(Effect::Reverb).await;
    assert_eq!(active, vec![Effect::Reverb]);

    let active = engine.push_effect(Effect::Delay).await;
    assert_eq!(active, vec![Effect::Delay, Effect::Reverb]);

    // Duplicate push changes neither length nor order
    let active = engine.push_effect(Effect::Reverb).await;
    assert_eq!(active, vec![Effect::Delay, Effect::Reverb]);
    assert_eq!(
        engine.effect_stack().await,
        vec![Effect::Reverb, Effect::Delay]
    );

    assert_eq!(engine.pop_effect().await.unwrap(), Effect::Delay);
    assert_eq!(engine.pop_effect().await.unwrap(), Effect::Reverb);
}

#[tokio::test]
async fn test_pop_empty_effect_stack() {
    let engine = DeckEngine::new(&test_config());

    assert!(matches!(
        engine.pop_effect().await,
        Err(Error::EffectStackEmpty)
    ));

    // Popping again yields the same signal with no further state change
    assert!(matches!(
        engine.pop_effect().await,
        Err(Error::EffectStackEmpty)
    ));
    assert!(engine.active_effects().await.is_empty());
}

#[tokio::test]
async fn test_effect_stack_resets_on_activation() {
    let engine = DeckEngine::new(&test_config());

    engine.enqueue(Song::new("A", "X", 2)).await;
    engine.enqueue(Song::new("B", "Y", 0)).await;

    engine.play_next().await.unwrap();
    engine.push_effect(Effect::Reverb).await;
    engine.push_effect(Effect::Delay).await;
    wait_for_idle(&engine).await;

    // Effects survive the end of the song...
    assert_eq!(
        engine.active_effects().await,
        vec![Effect::Delay, Effect::Reverb]
    );

    // ...and are cleared when the next song becomes active
    engine.play_next().await.unwrap();
    assert!(engine.active_effects().await.is_empty());
    wait_for_idle(&engine).await;
}

#[tokio::test]
async fn test_unparseable_duration_defaults_to_eight() {
    let engine = DeckEngine::new(&test_config());

    let song = Song::from_input("Mystery", None, "abc").unwrap();
    engine.enqueue(song).await;

    let queue = engine.queue_snapshot().await;
    assert_eq!(queue[0].song.duration_secs, 8);
    assert_eq!(queue[0].song.artist, "Unknown");
}

#[tokio::test]
async fn test_now_playing_label() {
    let engine = DeckEngine::new(&test_config());
    assert_eq!(engine.now_playing_label().await, "No song playing");

    engine.enqueue(Song::new("Tension", "Aria", 3)).await;
    engine.play_next().await.unwrap();
    assert_eq!(engine.now_playing_label().await, "Playing: Tension — Aria");

    wait_for_idle(&engine).await;
    assert_eq!(engine.now_playing_label().await, "No song playing");
}
