//! Deck engine
//!
//! Owns the pending-song queue, the active-song effect stack, the playback
//! history, and the playback state. Every mutation funnels through the
//! public operations here, and each state change is published on the event
//! bus for the presentation layer.

use crate::effects::EffectStack;
use crate::error::{Error, Result};
use crate::history::PlayHistory;
use crate::queue::{QueueEntry, SongQueue};
use crate::scheduler;
use crate::state::{CurrentPlayback, PlaybackState, SharedState};
use bqfx_common::config::DeckConfig;
use bqfx_common::events::{DeckEvent, QueueEntryInfo};
use bqfx_common::{Effect, Song};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// The deck engine
///
/// Cheap to share behind an `Arc`; all operations take `&self` and guard
/// their state with async locks.
pub struct DeckEngine {
    queue: RwLock<SongQueue>,
    effects: RwLock<EffectStack>,
    history: RwLock<PlayHistory>,
    state: Arc<SharedState>,
    tick_interval: Duration,
}

impl DeckEngine {
    /// Create a new engine from bootstrap configuration
    pub fn new(config: &DeckConfig) -> Self {
        Self {
            queue: RwLock::new(SongQueue::new()),
            effects: RwLock::new(EffectStack::new()),
            history: RwLock::new(PlayHistory::new()),
            state: Arc::new(SharedState::new(config.event_capacity)),
            tick_interval: config.tick_interval(),
        }
    }

    /// Append a song to the tail of the queue, returning its entry id
    pub async fn enqueue(&self, song: Song) -> Uuid {
        let mut queue = self.queue.write().await;
        let entry_id = queue.enqueue(song.clone());
        let queue_len = queue.len();
        let snapshot = queue_info(&queue);
        drop(queue);

        debug!("enqueued {} ({} pending)", song, queue_len);
        self.state
            .broadcast_event(DeckEvent::song_enqueued(entry_id, song, queue_len));
        self.state.broadcast_event(DeckEvent::queue_changed(snapshot));
        entry_id
    }

    /// Activate the next queued song and start its simulated playback.
    ///
    /// The engine itself rejects a second activation while a playback is in
    /// progress, so callers cannot race two songs into the Playing state.
    /// On success the head song moves to the history, the effect stack is
    /// reset, and the background ticker is spawned.
    pub async fn play_next(&self) -> Result<QueueEntry> {
        // The queue write lock also serializes activations, so the busy
        // check and the Idle -> Playing transition below cannot interleave
        // with another play_next call.
        let mut queue = self.queue.write().await;

        if self.state.playback_state().await == PlaybackState::Playing {
            return Err(Error::AlreadyPlaying);
        }

        let entry = queue.dequeue().ok_or(Error::QueueEmpty)?;
        let snapshot = queue_info(&queue);

        self.state
            .begin_playback(entry.entry_id, entry.song.clone())
            .await;
        self.history.write().await.append(entry.song.clone());
        self.effects.write().await.clear();
        drop(queue);

        info!("now playing: {}", entry.song);
        self.state.broadcast_event(DeckEvent::playback_started(
            entry.entry_id,
            entry.song.clone(),
        ));
        self.state.broadcast_event(DeckEvent::queue_changed(snapshot));
        scheduler::spawn_ticker(self.state.clone(), entry.clone(), self.tick_interval);

        Ok(entry)
    }

    /// Layer an effect on the playing song.
    ///
    /// Pushing an effect that is already on the stack is a no-op. Returns
    /// the stack in application order after the push.
    pub async fn push_effect(&self, effect: Effect) -> Vec<Effect> {
        let mut effects = self.effects.write().await;
        let added = effects.push(effect);
        let active = effects.application_order();
        drop(effects);

        if added {
            debug!("effect pushed: {}", effect);
            self.state
                .broadcast_event(DeckEvent::effect_pushed(effect, active.clone()));
        }
        active
    }

    /// Remove the most recently layered effect
    pub async fn pop_effect(&self) -> Result<Effect> {
        let mut effects = self.effects.write().await;
        let effect = effects.pop().ok_or(Error::EffectStackEmpty)?;
        let active = effects.application_order();
        drop(effects);

        debug!("effect popped: {}", effect);
        self.state
            .broadcast_event(DeckEvent::effect_popped(effect, active));
        Ok(effect)
    }

    /// Pending queue entries in play order
    pub async fn queue_snapshot(&self) -> Vec<QueueEntry> {
        self.queue.read().await.snapshot()
    }

    /// Effect stack in insertion order (bottom of the stack first)
    pub async fn effect_stack(&self) -> Vec<Effect> {
        self.effects.read().await.insertion_order()
    }

    /// Effect stack in application order (most recently pushed first)
    pub async fn active_effects(&self) -> Vec<Effect> {
        self.effects.read().await.application_order()
    }

    /// Playback history in activation order
    pub async fn history_snapshot(&self) -> Vec<Song> {
        self.history.read().await.snapshot()
    }

    /// Current playback state
    pub async fn playback_state(&self) -> PlaybackState {
        self.state.playback_state().await
    }

    /// The currently active song, if any
    pub async fn current_playback(&self) -> Option<CurrentPlayback> {
        self.state.current_playback().await
    }

    /// Playback progress as a 0.0–1.0 fraction (0.0 when idle)
    pub async fn progress(&self) -> f64 {
        self.state.progress().await
    }

    /// Human-readable "now playing" line for a presentation layer
    pub async fn now_playing_label(&self) -> String {
        match self.state.current_playback().await {
            Some(current) => format!("Playing: {} — {}", current.song.title, current.song.artist),
            None => "No song playing".to_string(),
        }
    }

    /// Subscribe to the engine's event stream
    pub fn subscribe(&self) -> broadcast::Receiver<DeckEvent> {
        self.state.subscribe_events()
    }
}

fn queue_info(queue: &SongQueue) -> Vec<QueueEntryInfo> {
    queue
        .snapshot()
        .into_iter()
        .map(|entry| QueueEntryInfo {
            entry_id: entry.entry_id,
            song: entry.song,
        })
        .collect()
}
