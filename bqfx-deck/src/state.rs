//! Shared playback state
//!
//! Thread-safe shared state coordinating the engine, the playback ticker,
//! and presentation-layer observers.

use bqfx_common::events::{DeckEvent, EventBus};
use bqfx_common::Song;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// Playback state
///
/// At most one song is active system-wide at any instant; `Playing` cannot
/// be entered while already `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    Playing,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Playing => write!(f, "playing"),
        }
    }
}

/// The currently active song and its elapsed playback time
#[derive(Debug, Clone)]
pub struct CurrentPlayback {
    /// Queue entry that was activated
    pub entry_id: Uuid,

    /// The active song
    pub song: Song,

    /// Simulated seconds elapsed since activation
    pub elapsed_secs: u32,
}

/// Shared state accessible by all components
///
/// Uses RwLock for concurrent read access with rare writes. The ticker task
/// is the only writer of elapsed time while a playback is running; the
/// engine writes only on the Idle -> Playing and Playing -> Idle transitions.
pub struct SharedState {
    playback: RwLock<Playback>,
    event_bus: EventBus,
}

#[derive(Debug)]
struct Playback {
    state: PlaybackState,
    current: Option<CurrentPlayback>,
}

impl SharedState {
    /// Create new shared state with an event channel of the given capacity
    pub fn new(event_capacity: usize) -> Self {
        Self {
            playback: RwLock::new(Playback {
                state: PlaybackState::Idle,
                current: None,
            }),
            event_bus: EventBus::new(event_capacity),
        }
    }

    /// Broadcast an event to all subscribers (no receivers is OK)
    pub fn broadcast_event(&self, event: DeckEvent) {
        self.event_bus.emit_lossy(event);
    }

    /// Subscribe to the event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<DeckEvent> {
        self.event_bus.subscribe()
    }

    /// Get current playback state
    pub async fn playback_state(&self) -> PlaybackState {
        self.playback.read().await.state
    }

    /// Get the currently active song, if any
    pub async fn current_playback(&self) -> Option<CurrentPlayback> {
        self.playback.read().await.current.clone()
    }

    /// Transition Idle -> Playing with the newly activated song.
    ///
    /// The engine serializes activations; at most one playback may be begun
    /// at a time.
    pub async fn begin_playback(&self, entry_id: Uuid, song: Song) {
        let mut playback = self.playback.write().await;
        playback.state = PlaybackState::Playing;
        playback.current = Some(CurrentPlayback {
            entry_id,
            song,
            elapsed_secs: 0,
        });
    }

    /// Advance elapsed time for the active song.
    ///
    /// Elapsed time never moves backwards: a stale update is absorbed rather
    /// than rewinding what observers have already seen.
    pub async fn set_elapsed(&self, elapsed_secs: u32) {
        let mut playback = self.playback.write().await;
        if let Some(current) = playback.current.as_mut() {
            current.elapsed_secs = current.elapsed_secs.max(elapsed_secs);
        }
    }

    /// Transition Playing -> Idle once the active song's clock is exhausted
    pub async fn finish_playback(&self) {
        let mut playback = self.playback.write().await;
        playback.state = PlaybackState::Idle;
        playback.current = None;
    }

    /// Playback progress as a 0.0–1.0 fraction (0.0 when idle)
    pub async fn progress(&self) -> f64 {
        let playback = self.playback.read().await;
        match playback.current.as_ref() {
            Some(current) if current.song.duration_secs > 0 => {
                (current.elapsed_secs as f64 / current.song.duration_secs as f64).min(1.0)
            }
            // Zero-length active song: finished as soon as it started
            Some(_) => 1.0,
            None => 0.0,
        }
    }
}
