//! A simple greedy player used by the headless driver.
//!
//! Each call spends money in a fixed priority order while keeping a cash
//! reserve, so the label keeps growing without player input.

use sim_core::tuning::TREND_FADE_MS;
use sim_core::{BoostKind, Feature, GameState, PlatformKind, Upgrade};
use sim_econ::names::Namer;
use sim_econ::{boosts, platforms, prestige, queue, tours, upgrades};
use std::fmt;
use tracing::debug;

/// Songs kept waiting in the production queue.
const QUEUE_TARGET: usize = 3;
/// Share of the balance a single purchase may use.
const SPEND_SHARE: f64 = 0.5;
/// Share of the balance a boost may use.
const BOOST_SHARE: f64 = 0.2;
/// Peak fans the active artist must reach, per prior prestige, before retiring.
const PRESTIGE_PEAK_STEP: f64 = 250_000.0;

/// One decision taken by [`step`].
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    Prestige,
    Upgrade(Upgrade),
    TierUp { tier: u8, sub_tier: u8 },
    Platform(PlatformKind),
    Tour,
    Trend,
    Boost(BoostKind),
    Queue(u32),
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Prestige => write!(f, "prestige"),
            Decision::Upgrade(upgrade) => write!(f, "upgrade {upgrade:?}"),
            Decision::TierUp { tier, sub_tier } => write!(f, "tier up to {tier}.{sub_tier}"),
            Decision::Platform(kind) => write!(f, "platform {kind:?}"),
            Decision::Tour => write!(f, "tour"),
            Decision::Trend => write!(f, "trend research"),
            Decision::Boost(kind) => write!(f, "boost {kind:?}"),
            Decision::Queue(count) => write!(f, "queue {count} songs"),
        }
    }
}

fn affordable(state: &GameState, cost: f64, share: f64) -> bool {
    cost <= state.money * share
}

/// Takes every action the strategy wants right now.
pub fn step(state: &mut GameState, now: i64, namer: &mut dyn Namer) -> Vec<Decision> {
    let mut taken = Vec::new();

    let goal = PRESTIGE_PEAK_STEP * f64::from(state.prestige_count + 1);
    if prestige::can_prestige(state)
        && state.artist.peak_fans >= goal
        && prestige::prestige(state, now, namer).is_ok()
    {
        taken.push(Decision::Prestige);
    }

    for upgrade in Upgrade::ALL {
        if !state.has_upgrade(upgrade)
            && state.tier >= upgrade.min_tier()
            && affordable(state, upgrade.cost(), SPEND_SHARE)
            && upgrades::purchase_upgrade(state, upgrade).is_ok()
        {
            taken.push(Decision::Upgrade(upgrade));
        }
    }

    if let Some(cost) = upgrades::tier_upgrade_cost(state) {
        if affordable(state, cost, SPEND_SHARE) {
            if let Ok((tier, sub_tier)) = upgrades::purchase_tier_upgrade(state) {
                taken.push(Decision::TierUp { tier, sub_tier });
            }
        }
    }

    if state.is_unlocked(Feature::Platforms) {
        let next = PlatformKind::ALL
            .into_iter()
            .find(|kind| !state.owns_platform(*kind));
        if let Some(kind) = next {
            if affordable(state, kind.spec().cost, SPEND_SHARE)
                && platforms::purchase_platform(state, kind, now).is_ok()
            {
                taken.push(Decision::Platform(kind));
            }
        }
    }

    if state.is_unlocked(Feature::Tours)
        && affordable(state, tours::tour_cost(state), SPEND_SHARE)
        && tours::start_tour(state, now).is_ok()
    {
        taken.push(Decision::Tour);
    }

    let trend_stale = state
        .trend
        .as_ref()
        .map_or(true, |t| now.saturating_sub(t.started_at) >= TREND_FADE_MS);
    if state.is_unlocked(Feature::TrendResearch)
        && trend_stale
        && affordable(state, upgrades::trend_research_cost(state), SPEND_SHARE)
    {
        let genre = state.selected_genre;
        if upgrades::research_trend(state, genre, now).is_ok() {
            taken.push(Decision::Trend);
        }
    }

    for kind in BoostKind::ALL {
        if state.phase() >= kind.spec().min_phase
            && !boosts::is_boost_active(state, kind, now)
            && affordable(state, boosts::boost_cost(state, kind), BOOST_SHARE)
            && boosts::activate_boost(state, kind, now).is_ok()
        {
            taken.push(Decision::Boost(kind));
        }
    }

    let missing = QUEUE_TARGET.saturating_sub(state.song_queue.len());
    let cost = queue::song_cost(state);
    let can_pay = if cost > 0.0 {
        (state.money / cost).floor() as usize
    } else {
        missing
    };
    let count = missing.min(can_pay) as u32;
    if count > 0 && queue::queue_songs(state, count, now).is_ok() {
        taken.push(Decision::Queue(count));
    }

    for decision in &taken {
        debug!(%decision, "autopilot");
    }
    taken
}
