//! Tier upgrades, feature upgrades and trend research.

use crate::{ensure_funds, ActionError};
use sim_core::tuning::{
    self, MAX_TIER, SUB_TIERS_PER_TIER, TIER_UPGRADE_BASE_COST, TIER_UPGRADE_COST_GROWTH,
    TREND_RESEARCH_COST_PER_TIER,
};
use sim_core::{Feature, GameState, Genre, Trend, Upgrade};
use tracing::{debug, info};

/// Cost of the next tier/sub-tier step, or `None` when fully upgraded.
pub fn tier_upgrade_cost(state: &GameState) -> Option<f64> {
    if state.tier >= MAX_TIER && state.sub_tier + 1 >= SUB_TIERS_PER_TIER {
        return None;
    }
    let level = tuning::upgrade_level(state.tier, state.sub_tier);
    Some(TIER_UPGRADE_BASE_COST * TIER_UPGRADE_COST_GROWTH.powi(level as i32))
}

/// Buys one sub-tier step. The last sub-tier rolls over into the next tier.
/// Returns the new `(tier, sub_tier)`.
pub fn purchase_tier_upgrade(state: &mut GameState) -> Result<(u8, u8), ActionError> {
    let cost = tier_upgrade_cost(state).ok_or(ActionError::MaxTierReached)?;
    ensure_funds(state, cost)?;

    state.money -= cost;
    if state.sub_tier + 1 >= SUB_TIERS_PER_TIER {
        state.tier += 1;
        state.sub_tier = 0;
        info!(tier = state.tier, "production tier advanced");
    } else {
        state.sub_tier += 1;
        debug!(tier = state.tier, sub_tier = state.sub_tier, "sub-tier advanced");
    }
    Ok((state.tier, state.sub_tier))
}

/// Buys a one-time feature upgrade. The feature itself unlocks once the
/// progression thresholds are met as well.
pub fn purchase_upgrade(state: &mut GameState, upgrade: Upgrade) -> Result<(), ActionError> {
    if state.has_upgrade(upgrade) {
        return Err(ActionError::UpgradeOwned(upgrade));
    }
    if state.tier < upgrade.min_tier() {
        return Err(ActionError::TierTooLow {
            required: upgrade.min_tier(),
            current: state.tier,
        });
    }
    let cost = upgrade.cost();
    ensure_funds(state, cost)?;

    state.money -= cost;
    state.upgrades.insert(upgrade);
    info!(?upgrade, cost, "upgrade purchased");
    Ok(())
}

/// Genre given to songs queued from now on. Free.
pub fn select_genre(state: &mut GameState, genre: Genre) {
    state.selected_genre = genre;
}

pub fn trend_research_cost(state: &GameState) -> f64 {
    TREND_RESEARCH_COST_PER_TIER * f64::from(state.tier)
}

/// Researches a trend: songs of `genre` finished from now on get a fading
/// affinity bonus. Replaces any previous trend and selects the genre.
pub fn research_trend(state: &mut GameState, genre: Genre, now: i64) -> Result<(), ActionError> {
    if !state.is_unlocked(Feature::TrendResearch) {
        return Err(ActionError::FeatureLocked(Feature::TrendResearch));
    }
    let cost = trend_research_cost(state);
    ensure_funds(state, cost)?;

    state.money -= cost;
    state.trend = Some(Trend {
        genre,
        started_at: now,
    });
    state.selected_genre = genre;
    debug!(?genre, cost, "trend researched");
    Ok(())
}
