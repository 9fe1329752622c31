//! Per-second rate aggregation across every income and fan source.

use crate::legacy::{cross_promotion_fans_per_second, legacy_income_per_second};
use crate::multipliers::{boost_multipliers, interval_multipliers, Multipliers};
use crate::platforms::platform_income_per_second;
use crate::tours::tour_income_per_second;
use sim_core::GameState;

/// Breakdown of the rates in effect for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rates {
    /// Sum of snapshotted song income, before boosts.
    pub song_income: f64,
    /// Sum of snapshotted song fan gain, before boosts.
    pub song_fans: f64,
    /// Boost multipliers, instantaneous or averaged over a credited interval.
    pub boosts: Multipliers,
    pub tour_income: f64,
    pub platform_income: f64,
    pub legacy_income: f64,
    pub legacy_fans: f64,
}

impl Rates {
    /// Total money per second.
    pub fn income_per_second(&self) -> f64 {
        self.song_income * self.boosts.income
            + self.tour_income
            + self.platform_income
            + self.legacy_income
    }

    /// Total fans per second.
    pub fn fans_per_second(&self) -> f64 {
        self.song_fans * self.boosts.fans + self.legacy_fans
    }
}

/// Rates at `now`. Boosts only scale song output; the other sources are flat.
pub fn compute_rates(state: &GameState, now: i64) -> Rates {
    with_boosts(state, boost_multipliers(state, now))
}

/// Average rates over `[start, end)`. A boost that starts or expires inside
/// the interval is credited only for the part it covers.
pub fn compute_interval_rates(state: &GameState, start: i64, end: i64) -> Rates {
    with_boosts(state, interval_multipliers(state, start, end))
}

fn with_boosts(state: &GameState, boosts: Multipliers) -> Rates {
    Rates {
        song_income: state.song_income_per_second(),
        song_fans: state.song_fans_per_second(),
        boosts,
        tour_income: tour_income_per_second(state),
        platform_income: platform_income_per_second(state),
        legacy_income: legacy_income_per_second(state),
        legacy_fans: cross_promotion_fans_per_second(state),
    }
}
