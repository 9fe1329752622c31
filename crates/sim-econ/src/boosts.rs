//! Boost ledger: paid, time-boxed multipliers.

use crate::{ensure_funds, ActionError};
use sim_core::{ActiveBoost, BoostKind, GameState};
use tracing::debug;

/// Price of the next activation of `kind`; grows with each purchase.
pub fn boost_cost(state: &GameState, kind: BoostKind) -> f64 {
    let spec = kind.spec();
    let uses = state.boost_usage.get(&kind).copied().unwrap_or(0);
    spec.base_cost * spec.cost_growth.powi(uses as i32)
}

/// Whether an unexpired boost of `kind` exists at `now`.
pub fn is_boost_active(state: &GameState, kind: BoostKind, now: i64) -> bool {
    state.boosts.iter().any(|b| b.kind == kind && !b.is_expired(now))
}

/// Buys and starts a boost.
///
/// Rejected when the phase is too low, the same kind is still running, or
/// funds are short. Distinct kinds may run at the same time.
pub fn activate_boost(
    state: &mut GameState,
    kind: BoostKind,
    now: i64,
) -> Result<ActiveBoost, ActionError> {
    let spec = kind.spec();
    if state.phase() < spec.min_phase {
        return Err(ActionError::PhaseTooLow {
            required: spec.min_phase,
            current: state.phase(),
        });
    }
    if is_boost_active(state, kind, now) {
        return Err(ActionError::AlreadyActive(kind));
    }
    let cost = boost_cost(state, kind);
    ensure_funds(state, cost)?;

    state.money -= cost;
    *state.boost_usage.entry(kind).or_insert(0) += 1;
    // An expired entry of the same kind may still await the sweep.
    state.boosts.retain(|b| b.kind != kind);
    let boost = ActiveBoost {
        kind,
        activated_at: now,
        duration_ms: spec.duration_ms,
        income_multiplier: spec.income_multiplier,
        fan_multiplier: spec.fan_multiplier,
    };
    state.boosts.push(boost.clone());
    debug!(?kind, cost, "boost activated");
    Ok(boost)
}

/// Removes every boost whose window has closed. Running boosts are never removed.
pub fn sweep_expired(state: &mut GameState, now: i64) -> Vec<BoostKind> {
    let mut expired = Vec::new();
    state.boosts.retain(|b| {
        if !b.is_expired(now) {
            true
        } else {
            expired.push(b.kind);
            false
        }
    });
    if !expired.is_empty() {
        debug!(?expired, "boosts expired");
    }
    expired
}
