#![deny(warnings)]

//! Core domain models and invariants for Hitmaker.
//!
//! This crate defines the serializable game state shared by every other
//! crate, the closed balance tables, and validation helpers that guard the
//! state's invariants when it is loaded from untrusted storage.

pub mod model;
pub mod tuning;
pub mod validation;

pub use model::{
    ActiveBoost, Artist, EntityId, GameState, LegacyArtist, OwnedPlatform, PhysicalRelease,
    ProgressionFlags, QueuedSong, Song, Tour, Trend,
};
pub use tuning::{BoostKind, BoostSpec, Feature, Genre, PlatformKind, PlatformSpec, Upgrade};
pub use validation::{validate_state, ValidationError};

/// Milliseconds to fractional seconds.
pub fn ms_to_secs(ms: f64) -> f64 {
    ms / 1_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_secs() {
        assert_eq!(ms_to_secs(1_500.0), 1.5);
        assert_eq!(ms_to_secs(0.0), 0.0);
    }
}
