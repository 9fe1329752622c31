//! The per-tick pipeline and offline catch-up.
//!
//! One call to [`advance`] runs, in order: production queue, tour
//! completion and release publishing, rate aggregation, crediting
//! `rate * seconds`, boost expiry, progression. Boosts are credited only
//! for the part of the interval their window covers, so the result does not
//! depend on how time is sliced into ticks.

use crate::config::TickConfig;
use crate::progression::{self, Unlock};
use sim_core::{ms_to_secs, BoostKind, EntityId, GameState, PhysicalRelease, Song};
use sim_econ::names::Namer;
use sim_econ::{compute_interval_rates, maybe_publish_release, process_queue, sweep_expired, update_tours};
use tracing::info;

/// Everything one pipeline step changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub delta_ms: f64,
    pub money_earned: f64,
    pub fans_gained: f64,
    pub songs_completed: Vec<Song>,
    pub tours_completed: Vec<EntityId>,
    pub release: Option<PhysicalRelease>,
    pub boosts_expired: Vec<BoostKind>,
    pub unlocks: Vec<Unlock>,
}

/// Advances `state` by `delta_ms` ending at `now`.
///
/// Negative or non-finite deltas count as zero. The caller applies any
/// upper ceiling.
pub fn advance(
    state: &mut GameState,
    delta_ms: f64,
    now: i64,
    namer: &mut dyn Namer,
) -> TickReport {
    let delta_ms = if delta_ms.is_finite() {
        delta_ms.max(0.0)
    } else {
        0.0
    };
    let interval_start = now.saturating_sub(delta_ms.round() as i64);

    let songs_completed = process_queue(state, delta_ms, now, namer);
    let tours_completed = update_tours(state, now);
    let release = maybe_publish_release(state, now);

    let rates = compute_interval_rates(state, interval_start, now);
    let secs = ms_to_secs(delta_ms);
    let money_earned = rates.income_per_second() * secs;
    let fans_gained = rates.fans_per_second() * secs;
    state.earn(money_earned);
    state.gain_fans(fans_gained);

    let boosts_expired = sweep_expired(state, now);
    let unlocks = progression::evaluate(state);
    state.last_update = now;

    TickReport {
        delta_ms,
        money_earned,
        fans_gained,
        songs_completed,
        tours_completed,
        release,
        boosts_expired,
        unlocks,
    }
}

/// Summary of credited offline time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OfflineReport {
    /// Milliseconds actually simulated, after the offline ceiling.
    pub credited_ms: i64,
    pub money_earned: f64,
    pub fans_gained: f64,
    pub songs_completed: usize,
    pub unlocks: Vec<Unlock>,
}

/// Credits the time since `state.last_update`, capped at
/// `config.max_offline_ms`, by running [`advance`] in chunks of at most
/// `config.max_delta_ms`. A clock that went backwards credits nothing.
pub fn apply_offline_progress(
    state: &mut GameState,
    now: i64,
    config: &TickConfig,
    namer: &mut dyn Namer,
) -> OfflineReport {
    let away = now.saturating_sub(state.last_update).max(0);
    let credited = away.min(config.max_offline_ms.max(0));
    let chunk = config.max_delta_ms.max(1);

    let mut report = OfflineReport {
        credited_ms: credited,
        ..OfflineReport::default()
    };
    let mut t = now - credited;
    while t < now {
        let step = chunk.min(now - t);
        t += step;
        let tick = advance(state, step as f64, t, namer);
        report.money_earned += tick.money_earned;
        report.fans_gained += tick.fans_gained;
        report.songs_completed += tick.songs_completed.len();
        report.unlocks.extend(tick.unlocks);
    }
    state.last_update = now;

    if credited > 0 {
        info!(
            away_ms = away,
            credited_ms = credited,
            money = report.money_earned,
            fans = report.fans_gained,
            songs = report.songs_completed,
            "offline progress applied"
        );
    }
    report
}
