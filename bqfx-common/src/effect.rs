//! The fixed effect set for the active-song effect stack

use crate::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The six effects a user can layer on the playing song.
///
/// The set is closed: an identifier outside it is unrepresentable, and
/// textual input fails at parse time instead of reaching the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Reverb,
    Delay,
    Echo,
    Pitch,
    Flanger,
    Distortion,
}

impl Effect {
    /// All selectable effects, in the order a selector presents them
    pub const ALL: [Effect; 6] = [
        Effect::Reverb,
        Effect::Delay,
        Effect::Echo,
        Effect::Pitch,
        Effect::Flanger,
        Effect::Distortion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Reverb => "Reverb",
            Effect::Delay => "Delay",
            Effect::Echo => "Echo",
            Effect::Pitch => "Pitch",
            Effect::Flanger => "Flanger",
            Effect::Distortion => "Distortion",
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Effect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reverb" => Ok(Effect::Reverb),
            "delay" => Ok(Effect::Delay),
            "echo" => Ok(Effect::Echo),
            "pitch" => Ok(Effect::Pitch),
            "flanger" => Ok(Effect::Flanger),
            "distortion" => Ok(Effect::Distortion),
            other => Err(Error::InvalidInput(format!("unknown effect: {}", other))),
        }
    }
}
