//! Legacy artists: passive income and cross-promotion from retired cohorts.

use sim_core::tuning::LEGACY_FAN_TRANSFER_PER_SEC;
use sim_core::GameState;

/// Fixed passive income of every retained legacy artist.
pub fn legacy_income_per_second(state: &GameState) -> f64 {
    state
        .legacy_artists
        .iter()
        .map(|l| l.income_per_second)
        .sum()
}

/// Fans per second transferred from legacy artists to the active one.
/// Uncapped; grows with each retained artist's peak.
pub fn cross_promotion_fans_per_second(state: &GameState) -> f64 {
    state
        .legacy_artists
        .iter()
        .map(|l| l.peak_fans * LEGACY_FAN_TRANSFER_PER_SEC)
        .sum()
}
