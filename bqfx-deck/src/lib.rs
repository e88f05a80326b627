//! # BQFX Deck Library (bqfx-deck)
//!
//! Core deck engine for the BQFX queue console.
//!
//! **Purpose:** Manage the pending-song queue (FIFO), the active-song effect
//! stack (LIFO), the playback history, and the simulated playback clock, and
//! publish state changes to a presentation layer over the event bus.
//!
//! **Architecture:** One engine owning all mutable state behind async locks,
//! plus at most one background ticker task driving the active song's clock.

pub mod effects;
pub mod engine;
pub mod error;
pub mod history;
pub mod queue;
pub mod scheduler;
pub mod state;

pub use engine::DeckEngine;
pub use error::{Error, Result};
