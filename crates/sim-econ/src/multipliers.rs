//! Multiplier composition.
//!
//! Songs use the snapshot model: the tier, experience and trend multipliers
//! are baked into a song's rates once, at creation ([`song_rates`]). At
//! aggregation time only the boost ledger applies ([`boost_multipliers`],
//! or [`interval_multipliers`] when crediting a span of time).
//! Re-applying creation-time multipliers during aggregation would count them
//! twice.

use sim_core::tuning::{self, BASE_SONG_FANS, BASE_SONG_INCOME, TREND_BONUS, TREND_FADE_MS};
use sim_core::{GameState, Genre};

/// Aggregate multipliers on the two production axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Multipliers {
    pub income: f64,
    pub fans: f64,
}

impl Multipliers {
    pub const IDENTITY: Multipliers = Multipliers {
        income: 1.0,
        fans: 1.0,
    };
}

impl Default for Multipliers {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Running product of every unexpired boost, seeded at 1.0.
pub fn boost_multipliers(state: &GameState, now: i64) -> Multipliers {
    state
        .boosts
        .iter()
        .filter(|b| b.is_active(now))
        .fold(Multipliers::IDENTITY, |acc, b| Multipliers {
            income: acc.income * b.income_multiplier,
            fans: acc.fans * b.fan_multiplier,
        })
}

/// Boost multipliers averaged over `[start, end)`.
///
/// Each boost counts only for the milliseconds its window overlaps the
/// interval, so crediting `rate * average * span` matches crediting every
/// millisecond separately. An empty interval yields the value at `start`.
pub fn interval_multipliers(state: &GameState, start: i64, end: i64) -> Multipliers {
    if end <= start {
        return boost_multipliers(state, start);
    }
    let mut cuts = vec![start, end];
    for boost in &state.boosts {
        for edge in [boost.activated_at, boost.expires_at()] {
            if edge > start && edge < end {
                cuts.push(edge);
            }
        }
    }
    cuts.sort_unstable();
    cuts.dedup();

    let span = (end - start) as f64;
    cuts.windows(2).fold(
        Multipliers {
            income: 0.0,
            fans: 0.0,
        },
        |acc, pair| {
            let m = boost_multipliers(state, pair[0]);
            let share = (pair[1] - pair[0]) as f64 / span;
            Multipliers {
                income: acc.income + m.income * share,
                fans: acc.fans + m.fans * share,
            }
        },
    )
}

/// Trend affinity bonus for a song of `genre` finished at `now`.
///
/// Full strength right after research, fading linearly to 1.0 over
/// [`TREND_FADE_MS`].
pub fn trend_bonus(state: &GameState, genre: Genre, now: i64) -> f64 {
    match &state.trend {
        Some(trend) if trend.genre == genre => {
            let elapsed = now.saturating_sub(trend.started_at).max(0) as f64;
            let remaining = (1.0 - elapsed / TREND_FADE_MS as f64).max(0.0);
            1.0 + TREND_BONUS * remaining
        }
        _ => 1.0,
    }
}

/// Product of every multiplier baked into a song at creation.
pub fn snapshot_multiplier(state: &GameState, genre: Genre, now: i64) -> f64 {
    tuning::tier_multiplier(state.tier, state.sub_tier)
        * state.experience_multiplier
        * trend_bonus(state, genre, now)
}

/// Income and fan rates for a song completed right now.
pub fn song_rates(state: &GameState, genre: Genre, now: i64) -> (f64, f64) {
    let m = snapshot_multiplier(state, genre, now);
    (BASE_SONG_INCOME * m, BASE_SONG_FANS * m)
}
