//! Error types for bqfx-deck
//!
//! Defines engine-specific error types using thiserror for clear error
//! propagation. Every variant is an expected, recoverable condition reported
//! synchronously to the caller; none is fatal to the process.

use thiserror::Error;

/// Main error type for the deck engine
#[derive(Error, Debug)]
pub enum Error {
    /// Activation attempted with no pending songs
    #[error("queue is empty")]
    QueueEmpty,

    /// Activation attempted while a playback is in progress
    #[error("a song is already playing")]
    AlreadyPlaying,

    /// Pop attempted with no stacked effects
    #[error("effect stack is empty")]
    EffectStackEmpty,

    /// Errors from the shared common crate (input validation, config)
    #[error(transparent)]
    Common(#[from] bqfx_common::Error),
}

/// Convenience Result type using the deck Error
pub type Result<T> = std::result::Result<T, Error>;
