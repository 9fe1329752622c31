//! Tours: paid, time-boxed income that scales with fans and catalog size.

use crate::error::InvariantError;
use crate::{ensure_funds, ActionError};
use sim_core::tuning::{
    self, TOUR_COST_PER_TIER, TOUR_DURATION_MS, TOUR_INCOME_PER_FAN, TOUR_INCOME_PER_SONG,
};
use sim_core::{EntityId, Feature, GameState, Tour};
use tracing::info;

pub fn tour_cost(state: &GameState) -> f64 {
    TOUR_COST_PER_TIER * f64::from(state.tier)
}

/// Income per second of one running tour at the current scale.
pub fn income_per_tour(state: &GameState) -> f64 {
    state.fans * TOUR_INCOME_PER_FAN + state.songs.len() as f64 * TOUR_INCOME_PER_SONG
}

/// Combined income of every running tour.
pub fn tour_income_per_second(state: &GameState) -> f64 {
    income_per_tour(state) * state.active_tours() as f64
}

fn check_can_start(state: &GameState) -> Result<(), ActionError> {
    if !state.is_unlocked(Feature::Tours) {
        return Err(ActionError::FeatureLocked(Feature::Tours));
    }
    let limit = tuning::max_concurrent_tours(state.tier);
    let active = state.active_tours();
    if active >= limit {
        return Err(ActionError::TourLimitReached { active, limit });
    }
    Ok(())
}

/// Pays for and starts a tour.
pub fn start_tour(state: &mut GameState, now: i64) -> Result<EntityId, ActionError> {
    check_can_start(state)?;
    let cost = tour_cost(state);
    ensure_funds(state, cost)?;

    let id = launch(state, now)?;
    state.money -= cost;
    info!(id, cost, "tour started");
    Ok(id)
}

/// Records a running tour. Callers must have checked the gate and the cap.
fn launch(state: &mut GameState, now: i64) -> Result<EntityId, InvariantError> {
    if !state.is_unlocked(Feature::Tours) {
        return Err(InvariantError::TourPreconditions("tours are locked"));
    }
    if state.active_tours() >= tuning::max_concurrent_tours(state.tier) {
        return Err(InvariantError::TourPreconditions("concurrency cap exceeded"));
    }
    let id = state.allocate_id();
    state.tours.push(Tour {
        id,
        started_at: now,
        completed_at: None,
    });
    Ok(id)
}

/// Marks every tour whose duration has elapsed as completed. A tour
/// completes exactly once. Returns the ids completed by this call.
pub fn update_tours(state: &mut GameState, now: i64) -> Vec<EntityId> {
    let mut finished = Vec::new();
    for tour in state.tours.iter_mut().filter(|t| t.is_active()) {
        if now.saturating_sub(tour.started_at) >= TOUR_DURATION_MS {
            tour.completed_at = Some(now);
            finished.push(tour.id);
        }
    }
    if !finished.is_empty() {
        info!(?finished, "tours completed");
    }
    finished
}
