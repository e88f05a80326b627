//! Event types and broadcast bus for the BQFX event system
//!
//! The deck uses hybrid communication in the same shape as the rest of the
//! codebase:
//! - **EventBus** (tokio::broadcast): one-to-many event broadcasting to the
//!   presentation layer
//! - **Shared state** (RwLock): read-heavy snapshot access

use crate::{Effect, Song};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Queue entry information carried by queue events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntryInfo {
    pub entry_id: Uuid,
    pub song: Song,
}

/// BQFX event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeckEvent {
    /// A song was appended to the queue
    SongEnqueued {
        entry_id: Uuid,
        song: Song,
        queue_len: usize,
        timestamp: DateTime<Utc>,
    },

    /// Queue contents changed (full snapshot in play order)
    QueueChanged {
        queue: Vec<QueueEntryInfo>,
        timestamp: DateTime<Utc>,
    },

    /// A queued song became the active song
    PlaybackStarted {
        entry_id: Uuid,
        song: Song,
        duration_secs: u32,
        timestamp: DateTime<Utc>,
    },

    /// Progress update for the active song (one per simulated second)
    PlaybackProgress {
        entry_id: Uuid,
        elapsed_secs: u32,
        duration_secs: u32,
        /// Fraction 0.0–1.0, clamped; exactly 1.0 on the final tick
        progress: f64,
        timestamp: DateTime<Utc>,
    },

    /// The active song ran to completion
    PlaybackFinished {
        entry_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// An effect was layered on the active song
    EffectPushed {
        effect: Effect,
        /// Stack contents in application order (most recently pushed first)
        active_effects: Vec<Effect>,
        timestamp: DateTime<Utc>,
    },

    /// The most recently layered effect was removed
    EffectPopped {
        effect: Effect,
        active_effects: Vec<Effect>,
        timestamp: DateTime<Utc>,
    },
}

impl DeckEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            DeckEvent::SongEnqueued { .. } => "SongEnqueued",
            DeckEvent::QueueChanged { .. } => "QueueChanged",
            DeckEvent::PlaybackStarted { .. } => "PlaybackStarted",
            DeckEvent::PlaybackProgress { .. } => "PlaybackProgress",
            DeckEvent::PlaybackFinished { .. } => "PlaybackFinished",
            DeckEvent::EffectPushed { .. } => "EffectPushed",
            DeckEvent::EffectPopped { .. } => "EffectPopped",
        }
    }

    pub fn song_enqueued(entry_id: Uuid, song: Song, queue_len: usize) -> Self {
        DeckEvent::SongEnqueued {
            entry_id,
            song,
            queue_len,
            timestamp: Utc::now(),
        }
    }

    pub fn queue_changed(queue: Vec<QueueEntryInfo>) -> Self {
        DeckEvent::QueueChanged {
            queue,
            timestamp: Utc::now(),
        }
    }

    pub fn playback_started(entry_id: Uuid, song: Song) -> Self {
        let duration_secs = song.duration_secs;
        DeckEvent::PlaybackStarted {
            entry_id,
            song,
            duration_secs,
            timestamp: Utc::now(),
        }
    }

    pub fn playback_progress(
        entry_id: Uuid,
        elapsed_secs: u32,
        duration_secs: u32,
        progress: f64,
    ) -> Self {
        DeckEvent::PlaybackProgress {
            entry_id,
            elapsed_secs,
            duration_secs,
            progress,
            timestamp: Utc::now(),
        }
    }

    pub fn playback_finished(entry_id: Uuid) -> Self {
        DeckEvent::PlaybackFinished {
            entry_id,
            timestamp: Utc::now(),
        }
    }

    pub fn effect_pushed(effect: Effect, active_effects: Vec<Effect>) -> Self {
        DeckEvent::EffectPushed {
            effect,
            active_effects,
            timestamp: Utc::now(),
        }
    }

    pub fn effect_popped(effect: Effect, active_effects: Vec<Effect>) -> Self {
        DeckEvent::EffectPopped {
            effect,
            active_effects,
            timestamp: Utc::now(),
        }
    }
}

/// Broadcast bus for deck events
///
/// Wraps tokio::broadcast, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DeckEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// `capacity` is the number of events buffered per subscriber before the
    /// oldest are dropped.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<DeckEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: DeckEvent,
    ) -> Result<usize, broadcast::error::SendError<DeckEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Used for non-critical notifications like progress ticks where it is
    /// acceptable if no component is currently listening.
    pub fn emit_lossy(&self, event: DeckEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_song() -> Song {
        Song::new("Tension", "Aria", 240)
    }

    #[test]
    fn test_eventbus_new() {
        let bus = EventBus::new(100);
        assert_eq!(bus.capacity(), 100);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_eventbus_subscribe() {
        let bus = EventBus::new(100);
        let _rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_eventbus_emit_no_subscribers() {
        let bus = EventBus::new(100);
        let event = DeckEvent::playback_finished(Uuid::new_v4());

        // Should return error when no subscribers
        assert!(bus.emit(event).is_err());
    }

    #[tokio::test]
    async fn test_eventbus_emit_with_subscriber() {
        let bus = EventBus::new(100);
        let mut rx = bus.subscribe();

        let entry_id = Uuid::new_v4();
        assert!(bus
            .emit(DeckEvent::playback_started(entry_id, sample_song()))
            .is_ok());

        let received = rx.recv().await.unwrap();
        match received {
            DeckEvent::PlaybackStarted {
                entry_id: received_id,
                duration_secs,
                ..
            } => {
                assert_eq!(received_id, entry_id);
                assert_eq!(duration_secs, 240);
            }
            _ => panic!("Wrong event type received"),
        }
    }

    #[test]
    fn test_eventbus_emit_lossy() {
        let bus = EventBus::new(100);

        // Should not panic even without subscribers
        bus.emit_lossy(DeckEvent::playback_progress(Uuid::new_v4(), 3, 10, 0.3));
    }

    #[test]
    fn test_event_type_names() {
        let entry_id = Uuid::new_v4();
        assert_eq!(
            DeckEvent::song_enqueued(entry_id, sample_song(), 1).event_type(),
            "SongEnqueued"
        );
        assert_eq!(
            DeckEvent::playback_finished(entry_id).event_type(),
            "PlaybackFinished"
        );
        assert_eq!(
            DeckEvent::effect_pushed(Effect::Reverb, vec![Effect::Reverb]).event_type(),
            "EffectPushed"
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = DeckEvent::playback_progress(Uuid::new_v4(), 3, 10, 0.3);

        let json = serde_json::to_string(&event).expect("serialization should succeed");
        assert!(json.contains("\"type\":\"PlaybackProgress\""));
        assert!(json.contains("\"elapsed_secs\":3"));

        let deserialized: DeckEvent =
            serde_json::from_str(&json).expect("deserialization should succeed");
        match deserialized {
            DeckEvent::PlaybackProgress {
                elapsed_secs,
                duration_secs,
                progress,
                ..
            } => {
                assert_eq!(elapsed_secs, 3);
                assert_eq!(duration_secs, 10);
                assert_eq!(progress, 0.3);
            }
            _ => panic!("Wrong event type deserialized"),
        }
    }
}
