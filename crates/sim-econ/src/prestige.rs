//! Prestige: retire the active artist into the legacy roster and start over.
//!
//! Transient resources (money, songs, queue, fans) reset, and the release
//! counter restarts with the new catalog. Tier, upgrades, platforms, control,
//! release history, tours and running boosts carry over.

use crate::names::Namer;
use crate::ActionError;
use sim_core::tuning::{LEGACY_CAPACITY, LEGACY_INCOME_SHARE, PRESTIGE_MIN_TIER, STARTING_MONEY};
use sim_core::{Artist, Feature, GameState, LegacyArtist};
use tracing::info;

/// Checks every precondition without touching the state.
pub fn check_prestige(state: &GameState) -> Result<(), ActionError> {
    if !state.is_unlocked(Feature::Prestige) {
        return Err(ActionError::FeatureLocked(Feature::Prestige));
    }
    if state.tier < PRESTIGE_MIN_TIER {
        return Err(ActionError::TierTooLow {
            required: PRESTIGE_MIN_TIER,
            current: state.tier,
        });
    }
    Ok(())
}

pub fn can_prestige(state: &GameState) -> bool {
    check_prestige(state).is_ok()
}

/// Passive income the active artist would keep after retiring now.
pub fn retirement_income(state: &GameState) -> f64 {
    state.song_income_per_second() * LEGACY_INCOME_SHARE
}

/// Retires the active artist and returns the new legacy record.
///
/// The roster keeps the most recent [`LEGACY_CAPACITY`] artists; the oldest
/// is evicted first.
pub fn prestige(
    state: &mut GameState,
    now: i64,
    namer: &mut dyn Namer,
) -> Result<LegacyArtist, ActionError> {
    check_prestige(state)?;

    let legacy = LegacyArtist {
        id: state.artist.id,
        name: state.artist.name.clone(),
        peak_fans: state.artist.peak_fans.max(state.fans),
        song_count: state.songs.len(),
        income_per_second: retirement_income(state),
        retired_at: now,
    };
    state.legacy_artists.push(legacy.clone());
    while state.legacy_artists.len() > LEGACY_CAPACITY {
        let evicted = state.legacy_artists.remove(0);
        info!(name = %evicted.name, "legacy artist evicted");
    }

    let id = state.allocate_id();
    state.artist = Artist {
        id,
        name: namer.artist_name(),
        started_at: now,
        peak_fans: 0.0,
    };
    state.money = STARTING_MONEY;
    state.fans = 0.0;
    state.songs.clear();
    state.song_queue.clear();
    state.last_release_song_count = 0;

    state.prestige_count += 1;
    let experience = state.recompute_experience();
    info!(
        retired = %legacy.name,
        peak_fans = legacy.peak_fans,
        prestige_count = state.prestige_count,
        experience,
        "prestige complete"
    );
    Ok(legacy)
}
