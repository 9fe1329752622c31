//! Structural validation of a [`GameState`].
//!
//! Presence and primitive types are enforced by deserialization; these
//! helpers check finiteness, signs, bounded ranges and cross-field limits so
//! a corrupt snapshot is rejected before it is used.

use crate::model::{GameState, Song};
use crate::tuning::{LEGACY_CAPACITY, MAX_CONTROL, MAX_PHASE, MAX_TIER, SUB_TIERS_PER_TIER};
use thiserror::Error;

/// Validation errors for state invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Numeric field must be finite.
    #[error("non-finite value in field `{0}`")]
    NonFinite(&'static str),
    /// Numeric field must be non-negative.
    #[error("negative value in field `{0}`")]
    Negative(&'static str),
    /// Phase outside `1..=MAX_PHASE`.
    #[error("phase {0} is out of range [1, {max}]", max = MAX_PHASE)]
    PhaseOutOfRange(u8),
    /// Tier outside `1..=MAX_TIER`.
    #[error("tier {0} is out of range [1, {max}]", max = MAX_TIER)]
    TierOutOfRange(u8),
    /// Sub-tier outside `0..SUB_TIERS_PER_TIER`.
    #[error("sub-tier {0} is out of range [0, {max})", max = SUB_TIERS_PER_TIER)]
    SubTierOutOfRange(u8),
    /// Control score outside `0..=MAX_CONTROL`.
    #[error("control score {0} is out of range [0, {max}]", max = MAX_CONTROL)]
    ControlOutOfRange(f64),
    /// Experience multiplier must be at least 1.
    #[error("experience multiplier {0} is below 1")]
    ExperienceBelowOne(f64),
    /// More legacy artists than the retained capacity.
    #[error("{0} legacy artists exceed capacity {max}", max = LEGACY_CAPACITY)]
    LegacyOverCapacity(usize),
    /// Artist name must not be blank.
    #[error("artist name is empty")]
    EmptyArtistName,
}

fn finite_non_negative(value: f64, field: &'static str) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite(field));
    }
    if value < 0.0 {
        return Err(ValidationError::Negative(field));
    }
    Ok(())
}

/// Validate a finished song's snapshotted rates.
pub fn validate_song(song: &Song) -> Result<(), ValidationError> {
    finite_non_negative(song.income_per_second, "songs.income_per_second")?;
    finite_non_negative(song.fans_per_second, "songs.fans_per_second")?;
    Ok(())
}

/// Validate bounded ordinal fields.
pub fn validate_ranges(state: &GameState) -> Result<(), ValidationError> {
    let phase = state.progression.phase;
    if !(1..=MAX_PHASE).contains(&phase) {
        return Err(ValidationError::PhaseOutOfRange(phase));
    }
    if !(1..=MAX_TIER).contains(&state.tier) {
        return Err(ValidationError::TierOutOfRange(state.tier));
    }
    if state.sub_tier >= SUB_TIERS_PER_TIER {
        return Err(ValidationError::SubTierOutOfRange(state.sub_tier));
    }
    if !(0.0..=MAX_CONTROL).contains(&state.control_score) {
        return Err(ValidationError::ControlOutOfRange(state.control_score));
    }
    if state.legacy_artists.len() > LEGACY_CAPACITY {
        return Err(ValidationError::LegacyOverCapacity(
            state.legacy_artists.len(),
        ));
    }
    Ok(())
}

/// Validate the whole state, including every owned entity.
pub fn validate_state(state: &GameState) -> Result<(), ValidationError> {
    validate_ranges(state)?;
    finite_non_negative(state.money, "money")?;
    finite_non_negative(state.fans, "fans")?;
    finite_non_negative(state.total_money_earned, "total_money_earned")?;
    finite_non_negative(state.artist.peak_fans, "artist.peak_fans")?;
    if !state.experience_multiplier.is_finite() {
        return Err(ValidationError::NonFinite("experience_multiplier"));
    }
    if state.experience_multiplier < 1.0 {
        return Err(ValidationError::ExperienceBelowOne(
            state.experience_multiplier,
        ));
    }
    if state.artist.name.trim().is_empty() {
        return Err(ValidationError::EmptyArtistName);
    }
    for song in &state.songs {
        validate_song(song)?;
    }
    for queued in &state.song_queue {
        finite_non_negative(queued.progress_ms, "song_queue.progress_ms")?;
    }
    for boost in &state.boosts {
        finite_non_negative(boost.income_multiplier, "boosts.income_multiplier")?;
        finite_non_negative(boost.fan_multiplier, "boosts.fan_multiplier")?;
        if boost.duration_ms < 0 {
            return Err(ValidationError::Negative("boosts.duration_ms"));
        }
    }
    for legacy in &state.legacy_artists {
        finite_non_negative(legacy.peak_fans, "legacy_artists.peak_fans")?;
        finite_non_negative(legacy.income_per_second, "legacy_artists.income_per_second")?;
    }
    for release in &state.physical_releases {
        finite_non_negative(release.payout, "physical_releases.payout")?;
    }
    Ok(())
}
