//! Simulated playback ticker
//!
//! Advances a logical clock for the active song without blocking callers:
//! one simulated second per tick, with progress published after every tick.
//! This is the only component that sleeps; every other engine operation
//! completes in effectively immediate time.

use crate::queue::QueueEntry;
use crate::state::SharedState;
use bqfx_common::events::DeckEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info};

/// Spawn the background ticker for a newly activated song.
///
/// At most one ticker is alive at a time: `DeckEngine::play_next` refuses a
/// new activation while a playback is in progress. The ticker runs to
/// completion; there is no cancellation of an in-progress playback.
pub fn spawn_ticker(
    state: Arc<SharedState>,
    entry: QueueEntry,
    tick_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(run_ticker(state, entry, tick_interval))
}

/// Drive the simulated playback of one song to completion.
///
/// Ticks run sequentially in this single task, so every progress update is
/// applied and published before the next tick begins and elapsed time never
/// decreases. A song of duration `d` produces `d + 1` ticks (elapsed
/// 0..=d), ending on exactly 100% before the finished transition.
async fn run_ticker(state: Arc<SharedState>, entry: QueueEntry, tick_interval: Duration) {
    let duration_secs = entry.song.duration_secs;

    if duration_secs == 0 {
        // Zero-length song: instantly finished, no division by zero
        state.broadcast_event(DeckEvent::playback_progress(entry.entry_id, 0, 0, 1.0));
        finish(&state, &entry).await;
        return;
    }

    let mut interval = time::interval(tick_interval);
    // The first interval tick completes immediately; consume it so every
    // progress update below waits one full tick.
    interval.tick().await;

    for elapsed in 0..=duration_secs {
        interval.tick().await;
        state.set_elapsed(elapsed).await;
        let progress = (f64::from(elapsed) / f64::from(duration_secs)).min(1.0);
        state.broadcast_event(DeckEvent::playback_progress(
            entry.entry_id,
            elapsed,
            duration_secs,
            progress,
        ));
        debug!("tick: {}/{}s", elapsed, duration_secs);
    }

    finish(&state, &entry).await;
}

async fn finish(state: &Arc<SharedState>, entry: &QueueEntry) {
    state.finish_playback().await;
    state.broadcast_event(DeckEvent::playback_finished(entry.entry_id));
    info!("playback finished: {}", entry.song.title);
}
