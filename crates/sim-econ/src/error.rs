use sim_core::{BoostKind, Feature, PlatformKind, Upgrade};
use thiserror::Error;

/// Rejected player actions. The state is untouched when one of these is returned.
#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    /// Not enough money for the requested purchase.
    #[error("insufficient funds: need {needed:.2}, have {available:.2}")]
    InsufficientFunds { needed: f64, available: f64 },
    /// The feature has not been unlocked yet.
    #[error("feature {0:?} is locked")]
    FeatureLocked(Feature),
    /// The production tier is too low for this action.
    #[error("requires tier {required}, current tier is {current}")]
    TierTooLow { required: u8, current: u8 },
    /// The progression phase is too low for this action.
    #[error("requires phase {required}, current phase is {current}")]
    PhaseTooLow { required: u8, current: u8 },
    /// A boost of this kind is still running.
    #[error("boost {0:?} is already active")]
    AlreadyActive(BoostKind),
    /// One-time upgrade already purchased.
    #[error("upgrade {0:?} already purchased")]
    UpgradeOwned(Upgrade),
    /// One-time platform already owned.
    #[error("platform {0:?} already owned")]
    PlatformOwned(PlatformKind),
    /// Tier and sub-tier are both at their maximum.
    #[error("production tier is already maxed")]
    MaxTierReached,
    /// The tier-gated tour concurrency cap is reached.
    #[error("tour limit reached: {active} of {limit} running")]
    TourLimitReached { active: usize, limit: usize },
    /// A request for zero units.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    /// An internal invariant was broken; not a player mistake.
    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

impl ActionError {
    /// Whether the error signals a bug rather than a rejected request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ActionError::Invariant(_))
    }
}

/// Broken internal invariants. These indicate a programming error.
#[derive(Debug, Error, PartialEq)]
pub enum InvariantError {
    /// A tour was launched while its gate or cap did not allow it.
    #[error("tour launched with preconditions bypassed: {0}")]
    TourPreconditions(&'static str),
    /// A computed amount was NaN or infinite.
    #[error("non-finite {0} computed")]
    NonFinite(&'static str),
}
