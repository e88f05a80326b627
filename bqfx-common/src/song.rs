//! Song model and input-boundary defaulting

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Artist used when the user supplies none
pub const DEFAULT_ARTIST: &str = "Unknown";

/// Duration used when the raw duration input cannot be parsed as seconds
pub const DEFAULT_DURATION_SECS: u32 = 8;

/// An immutable song value
///
/// Constructed once at the input boundary and shared by clone afterwards;
/// nothing mutates a `Song` after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Song title (non-empty)
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Duration in whole seconds
    pub duration_secs: u32,
}

impl Song {
    /// Create a song from already-validated parts
    pub fn new(title: impl Into<String>, artist: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            duration_secs,
        }
    }

    /// Build a song from raw presentation-layer input.
    ///
    /// Boundary defaults:
    /// - an empty or whitespace-only title is rejected
    /// - a missing or empty artist becomes "Unknown"
    /// - a duration that does not parse as whole seconds becomes 8
    pub fn from_input(title: &str, artist: Option<&str>, duration_raw: &str) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput(
                "song title must not be empty".to_string(),
            ));
        }

        let artist = match artist.map(str::trim) {
            Some(artist) if !artist.is_empty() => artist.to_string(),
            _ => DEFAULT_ARTIST.to_string(),
        };

        let duration_secs = duration_raw
            .trim()
            .parse::<u32>()
            .unwrap_or(DEFAULT_DURATION_SECS);

        Ok(Self {
            title: title.to_string(),
            artist,
            duration_secs,
        })
    }
}

impl std::fmt::Display for Song {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} — {} ({}s)", self.title, self.artist, self.duration_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let song = Song::new("Nightdrive", "Kavinsky", 182);
        assert_eq!(song.to_string(), "Nightdrive — Kavinsky (182s)");
    }

    #[test]
    fn test_from_input_valid() {
        let song = Song::from_input("Tension", Some("Aria"), "240").unwrap();
        assert_eq!(song.title, "Tension");
        assert_eq!(song.artist, "Aria");
        assert_eq!(song.duration_secs, 240);
    }

    #[test]
    fn test_from_input_trims_whitespace() {
        let song = Song::from_input("  Tension ", Some(" Aria "), " 240 ").unwrap();
        assert_eq!(song.title, "Tension");
        assert_eq!(song.artist, "Aria");
        assert_eq!(song.duration_secs, 240);
    }

    #[test]
    fn test_from_input_empty_title_rejected() {
        assert!(Song::from_input("", None, "10").is_err());
        assert!(Song::from_input("   ", None, "10").is_err());
    }

    #[test]
    fn test_from_input_missing_artist_defaults() {
        let song = Song::from_input("Tension", None, "10").unwrap();
        assert_eq!(song.artist, DEFAULT_ARTIST);

        let song = Song::from_input("Tension", Some(""), "10").unwrap();
        assert_eq!(song.artist, DEFAULT_ARTIST);
    }

    #[test]
    fn test_from_input_unparseable_duration_defaults() {
        let song = Song::from_input("Tension", None, "abc").unwrap();
        assert_eq!(song.duration_secs, DEFAULT_DURATION_SECS);

        // Negative values do not parse as u32 and fall back as well
        let song = Song::from_input("Tension", None, "-5").unwrap();
        assert_eq!(song.duration_secs, DEFAULT_DURATION_SECS);
    }

    #[test]
    fn test_from_input_zero_duration_allowed() {
        // Zero parses fine; the playback ticker special-cases it
        let song = Song::from_input("Sting", None, "0").unwrap();
        assert_eq!(song.duration_secs, 0);
    }
}
