//! Physical releases: lump-sum payouts published automatically as the
//! catalog grows.

use sim_core::tuning::{
    self, RELEASE_CATALOG_CAP, RELEASE_COOLDOWN_MS, RELEASE_EVERY_SONGS, RELEASE_VALUE_PER_FAN,
    RELEASE_VALUE_PER_SONG,
};
use sim_core::{Feature, GameState, PhysicalRelease};
use tracing::info;

/// Payout a release would earn right now.
pub fn release_payout(state: &GameState) -> f64 {
    let catalog = state.songs.len().min(RELEASE_CATALOG_CAP) as f64;
    let variants = f64::from(tuning::release_variants(state.fans));
    (catalog * RELEASE_VALUE_PER_SONG + state.fans * RELEASE_VALUE_PER_FAN) * variants
}

/// Whether a release would be published at `now`.
pub fn release_due(state: &GameState, now: i64) -> bool {
    if !state.is_unlocked(Feature::PhysicalReleases) {
        return false;
    }
    let grown = state.songs.len().saturating_sub(state.last_release_song_count);
    if grown < RELEASE_EVERY_SONGS {
        return false;
    }
    match state.last_release_at {
        Some(at) => now.saturating_sub(at) >= RELEASE_COOLDOWN_MS,
        None => true,
    }
}

/// Publishes a release if one is due and credits its payout.
///
/// At most one release per call; the cooldown keeps a burst of completed
/// songs from printing several releases in the same tick.
pub fn maybe_publish_release(state: &mut GameState, now: i64) -> Option<PhysicalRelease> {
    if !release_due(state, now) {
        return None;
    }
    let payout = release_payout(state);
    let release = PhysicalRelease {
        id: state.allocate_id(),
        released_at: now,
        song_count: state.songs.len(),
        variants: tuning::release_variants(state.fans),
        payout,
    };
    state.earn(payout);
    state.last_release_song_count = state.songs.len();
    state.last_release_at = Some(now);
    state.physical_releases.push(release.clone());
    info!(
        songs = release.song_count,
        variants = release.variants,
        payout,
        "physical release published"
    );
    Some(release)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::{Genre, Song};

    fn with_songs(n: usize) -> GameState {
        let mut s = GameState::new("Nova", 0);
        s.progression.physical_releases = true;
        for i in 0..n {
            s.songs.push(Song {
                id: 1_000 + i as u64,
                name: format!("S{i}"),
                genre: Genre::Pop,
                created_at: 0,
                income_per_second: 1.0,
                fans_per_second: 0.5,
            });
        }
        s
    }

    #[test]
    fn no_release_while_locked() {
        let mut s = with_songs(20);
        s.progression.physical_releases = false;
        assert!(maybe_publish_release(&mut s, 0).is_none());
    }

    #[test]
    fn publishes_after_threshold_and_credits_payout() {
        let mut s = with_songs(RELEASE_EVERY_SONGS - 1);
        assert!(maybe_publish_release(&mut s, 0).is_none());

        let mut s = with_songs(RELEASE_EVERY_SONGS);
        let money = s.money;
        let r = maybe_publish_release(&mut s, 0).unwrap();
        assert_eq!(r.payout, RELEASE_EVERY_SONGS as f64 * RELEASE_VALUE_PER_SONG);
        assert_eq!(s.money, money + r.payout);
        assert_eq!(s.total_money_earned, r.payout);
        assert_eq!(s.physical_releases.len(), 1);
    }

    #[test]
    fn cooldown_prevents_back_to_back_releases() {
        let mut s = with_songs(3 * RELEASE_EVERY_SONGS);
        assert!(maybe_publish_release(&mut s, 0).is_some());
        // Catalog did not grow since the release.
        assert!(maybe_publish_release(&mut s, RELEASE_COOLDOWN_MS).is_none());

        let mut s = with_songs(RELEASE_EVERY_SONGS);
        maybe_publish_release(&mut s, 0).unwrap();
        let extra = with_songs(RELEASE_EVERY_SONGS).songs;
        s.songs.extend(extra);
        assert!(maybe_publish_release(&mut s, RELEASE_COOLDOWN_MS - 1).is_none());
        assert!(maybe_publish_release(&mut s, RELEASE_COOLDOWN_MS).is_some());
    }

    #[test]
    fn payout_caps_catalog_and_multiplies_variants() {
        let mut s = with_songs(RELEASE_CATALOG_CAP + 50);
        s.fans = 100_000.0;
        let expected =
            (RELEASE_CATALOG_CAP as f64 * RELEASE_VALUE_PER_SONG + 100_000.0 * RELEASE_VALUE_PER_FAN)
                * 3.0;
        assert!((release_payout(&s) - expected).abs() < 1e-6);
    }
}
