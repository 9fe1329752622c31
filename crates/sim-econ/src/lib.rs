#![deny(warnings)]

//! Economy of the label: every action a player can take and every income
//! source the tick pipeline aggregates.
//!
//! Modules:
//! - `multipliers` / `rates`: boost composition and per-second aggregation
//! - `queue`: the sequential song production queue
//! - `boosts`: paid, time-boxed multipliers
//! - `releases`, `tours`, `platforms`, `legacy`: secondary income sources
//! - `upgrades`: tier upgrades, feature upgrades and trend research
//! - `prestige`: retiring the active artist into the legacy roster
//! - `names`: injectable song/artist naming
//!
//! Every mutating action either succeeds or returns an [`ActionError`] with
//! the state left exactly as it was.

pub mod boosts;
pub mod error;
pub mod legacy;
pub mod multipliers;
pub mod names;
pub mod platforms;
pub mod prestige;
pub mod queue;
pub mod rates;
pub mod releases;
pub mod tours;
pub mod upgrades;

pub use boosts::{activate_boost, boost_cost, is_boost_active, sweep_expired};
pub use error::{ActionError, InvariantError};
pub use multipliers::Multipliers;
pub use names::{NameGenerator, Namer, SequentialNamer};
pub use platforms::purchase_platform;
pub use prestige::{can_prestige, prestige};
pub use queue::{process_queue, queue_songs, song_cost};
pub use rates::{compute_interval_rates, compute_rates, Rates};
pub use releases::maybe_publish_release;
pub use tours::{start_tour, update_tours};
pub use upgrades::{purchase_tier_upgrade, purchase_upgrade, research_trend, select_genre};

use sim_core::GameState;

/// Rejects a purchase of `cost` the balance cannot cover.
pub(crate) fn ensure_funds(state: &GameState, cost: f64) -> Result<(), ActionError> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(InvariantError::NonFinite("cost").into());
    }
    if cost > state.money {
        return Err(ActionError::InsufficientFunds {
            needed: cost,
            available: state.money,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn funds_check_is_inclusive() {
        let mut s = GameState::new("Nova", 0);
        s.money = 50.0;
        assert!(ensure_funds(&s, 50.0).is_ok());
        assert_eq!(
            ensure_funds(&s, 50.5),
            Err(ActionError::InsufficientFunds {
                needed: 50.5,
                available: 50.0
            })
        );
    }

    #[test]
    fn non_finite_cost_is_fatal() {
        let s = GameState::new("Nova", 0);
        let err = ensure_funds(&s, f64::NAN).unwrap_err();
        assert!(err.is_fatal());
        assert!(!ensure_funds(&s, 1e9).unwrap_err().is_fatal());
    }
}
