//! Progression state machine: feature flags and the ordinal phase.
//!
//! Flags and phase only ever move forward. A feature unlocks once its gating
//! upgrade is owned and its threshold holds; the phase advances by at most
//! one step per evaluation.

use sim_core::tuning::{
    phase_requirements, ACCELERATOR_UNLOCK_TIER, MAX_PHASE, MONOPOLY_UNLOCK_CONTROL,
    PLATFORMS_UNLOCK_COMPLETED_TOURS, PRESTIGE_UNLOCK_PHASE, RELEASES_UNLOCK_FANS,
    TOURS_UNLOCK_FANS, TOURS_UNLOCK_RELEASES,
};
use sim_core::{Feature, GameState};
use tracing::info;

/// A progression transition produced by [`evaluate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unlock {
    Feature(Feature),
    /// The phase that was just entered.
    Phase(u8),
}

/// Order in which feature flags are evaluated.
pub const FEATURE_ORDER: [Feature; 7] = [
    Feature::PhysicalReleases,
    Feature::Tours,
    Feature::Platforms,
    Feature::Monopoly,
    Feature::TrendResearch,
    Feature::Prestige,
    Feature::Accelerator,
];

fn threshold_met(state: &GameState, feature: Feature) -> bool {
    match feature {
        Feature::PhysicalReleases => state.fans >= RELEASES_UNLOCK_FANS,
        Feature::Tours => {
            state.physical_releases.len() >= TOURS_UNLOCK_RELEASES
                && state.fans >= TOURS_UNLOCK_FANS
        }
        Feature::Platforms => state.completed_tours() >= PLATFORMS_UNLOCK_COMPLETED_TOURS,
        Feature::Monopoly => state.control_score >= MONOPOLY_UNLOCK_CONTROL,
        Feature::TrendResearch => true,
        Feature::Prestige => state.phase() >= PRESTIGE_UNLOCK_PHASE,
        Feature::Accelerator => state.tier >= ACCELERATOR_UNLOCK_TIER,
    }
}

/// Whether `feature` may unlock now: upgrade owned and threshold met.
pub fn feature_ready(state: &GameState, feature: Feature) -> bool {
    state.has_upgrade(feature.gating_upgrade()) && threshold_met(state, feature)
}

/// Whether every requirement for entering `target` holds.
pub fn phase_ready(state: &GameState, target: u8) -> bool {
    let Some(req) = phase_requirements(target) else {
        return false;
    };
    state.fans >= req.min_fans
        && state.tier >= req.min_tier
        && state.physical_releases.len() >= req.min_releases
        && state.money >= req.min_money
        && state.completed_tours() >= req.min_completed_tours
        && state.platforms.len() >= req.min_platforms
}

/// Re-evaluates every flag, then tries one phase step. Returns the
/// transitions made, in evaluation order.
pub fn evaluate(state: &mut GameState) -> Vec<Unlock> {
    let mut unlocks = Vec::new();
    for feature in FEATURE_ORDER {
        if !state.is_unlocked(feature)
            && feature_ready(state, feature)
            && state.progression.unlock(feature)
        {
            info!(?feature, "feature unlocked");
            unlocks.push(Unlock::Feature(feature));
        }
    }

    let current = state.progression.phase;
    if current < MAX_PHASE && phase_ready(state, current + 1) {
        state.progression.phase = current + 1;
        info!(phase = current + 1, "phase advanced");
        unlocks.push(Unlock::Phase(current + 1));
    }
    unlocks
}
