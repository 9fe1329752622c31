//! Platforms: permanent purchases adding passive income and industry control.

use crate::{ensure_funds, ActionError};
use sim_core::tuning::MONOPOLY_PLATFORM_MULTIPLIER;
use sim_core::{Feature, GameState, OwnedPlatform, PlatformKind};
use tracing::info;

/// Buys `kind` and recomputes the control score. Each kind is owned at most once.
pub fn purchase_platform(
    state: &mut GameState,
    kind: PlatformKind,
    now: i64,
) -> Result<f64, ActionError> {
    if !state.is_unlocked(Feature::Platforms) {
        return Err(ActionError::FeatureLocked(Feature::Platforms));
    }
    if state.owns_platform(kind) {
        return Err(ActionError::PlatformOwned(kind));
    }
    let cost = kind.spec().cost;
    ensure_funds(state, cost)?;

    state.money -= cost;
    state.platforms.push(OwnedPlatform {
        kind,
        acquired_at: now,
    });
    let control = state.recompute_control();
    info!(?kind, cost, control, "platform acquired");
    Ok(control)
}

/// Passive income from owned platforms, doubled under a monopoly.
pub fn platform_income_per_second(state: &GameState) -> f64 {
    let base: f64 = state
        .platforms
        .iter()
        .map(|p| p.kind.spec().income_per_second)
        .sum();
    if state.is_unlocked(Feature::Monopoly) {
        base * MONOPOLY_PLATFORM_MULTIPLIER
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::tuning::MAX_CONTROL;

    fn dealing() -> GameState {
        let mut s = GameState::new("Nova", 0);
        s.money = 1e12;
        s.progression.platforms = true;
        s
    }

    #[test]
    fn purchase_adds_income_and_control() {
        let mut s = dealing();
        let control = purchase_platform(&mut s, PlatformKind::IndieStreaming, 5).unwrap();
        assert_eq!(control, 10.0);
        assert_eq!(platform_income_per_second(&s), 200.0);
    }

    #[test]
    fn duplicate_purchase_is_rejected() {
        let mut s = dealing();
        purchase_platform(&mut s, PlatformKind::RadioNetwork, 0).unwrap();
        assert_eq!(
            purchase_platform(&mut s, PlatformKind::RadioNetwork, 0),
            Err(ActionError::PlatformOwned(PlatformKind::RadioNetwork))
        );
        assert_eq!(s.platforms.len(), 1);
    }

    #[test]
    fn locked_platforms_are_rejected() {
        let mut s = dealing();
        s.progression.platforms = false;
        assert_eq!(
            purchase_platform(&mut s, PlatformKind::IndieStreaming, 0),
            Err(ActionError::FeatureLocked(Feature::Platforms))
        );
    }

    #[test]
    fn control_clamps_at_max() {
        let mut s = dealing();
        for kind in PlatformKind::ALL {
            purchase_platform(&mut s, kind, 0).unwrap();
        }
        assert_eq!(s.control_score, MAX_CONTROL);
    }

    #[test]
    fn monopoly_doubles_platform_income() {
        let mut s = dealing();
        purchase_platform(&mut s, PlatformKind::IndieStreaming, 0).unwrap();
        s.progression.monopoly = true;
        assert_eq!(platform_income_per_second(&s), 400.0);
    }
}
