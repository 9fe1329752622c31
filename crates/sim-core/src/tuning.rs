//! Balance tables and closed identity enums.
//!
//! Every boost, upgrade, platform and feature is a variant of a closed enum
//! and its numbers come from an exhaustive `match`, so adding a variant
//! forces every table to be updated.

use serde::{Deserialize, Serialize};

/// Money a fresh game (or a freshly prestiged artist) starts with.
pub const STARTING_MONEY: f64 = 100.0;

/// Per-second income of a tier 1 song before any multiplier.
pub const BASE_SONG_INCOME: f64 = 1.0;
/// Per-second fan gain of a tier 1 song before any multiplier.
pub const BASE_SONG_FANS: f64 = 0.5;
/// Cost of one queued song at tier 1.
pub const SONG_BASE_COST: f64 = 10.0;
/// Song cost growth per tier.
pub const SONG_COST_TIER_GROWTH: f64 = 2.5;

/// Highest production tier.
pub const MAX_TIER: u8 = 5;
/// Sub-tiers per tier; valid sub-tier values are `0..SUB_TIERS_PER_TIER`.
pub const SUB_TIERS_PER_TIER: u8 = 3;
/// Multiplier gained per tier step.
pub const TIER_MULTIPLIER_BASE: f64 = 3.0;
/// Additive bonus per sub-tier within a tier.
pub const SUB_TIER_BONUS: f64 = 0.25;
/// Cost of the first tier upgrade.
pub const TIER_UPGRADE_BASE_COST: f64 = 250.0;
/// Tier upgrade cost growth per upgrade level.
pub const TIER_UPGRADE_COST_GROWTH: f64 = 4.0;

/// Song generation time at upgrade level 0.
pub const BASE_GENERATION_MS: f64 = 5_000.0;
/// Generation time factor per upgrade level.
pub const GENERATION_SPEEDUP_PER_LEVEL: f64 = 0.85;
/// Floor for generation time.
pub const MIN_GENERATION_MS: f64 = 500.0;
/// Generation time divisor once the accelerator is unlocked.
pub const ACCELERATOR_SPEEDUP: f64 = 2.0;

/// Peak extra multiplier for songs matching the researched trend.
pub const TREND_BONUS: f64 = 0.5;
/// Time for the trend bonus to fade to nothing.
pub const TREND_FADE_MS: i64 = 300_000;
/// Trend research cost per tier.
pub const TREND_RESEARCH_COST_PER_TIER: f64 = 500.0;

/// Experience multiplier gained per prestige.
pub const EXPERIENCE_PER_PRESTIGE: f64 = 0.1;
/// Minimum tier required to prestige.
pub const PRESTIGE_MIN_TIER: u8 = 2;
/// Maximum number of retained legacy artists.
pub const LEGACY_CAPACITY: usize = 5;
/// Share of total song income a retiring artist keeps as passive income.
pub const LEGACY_INCOME_SHARE: f64 = 0.1;
/// Fraction of a legacy artist's peak fans transferred per second.
pub const LEGACY_FAN_TRANSFER_PER_SEC: f64 = 0.001;

/// New songs required between physical releases.
pub const RELEASE_EVERY_SONGS: usize = 10;
/// Minimum time between two physical releases.
pub const RELEASE_COOLDOWN_MS: i64 = 30_000;
/// Catalog size counted towards a release payout.
pub const RELEASE_CATALOG_CAP: usize = 100;
/// Release payout per catalog song.
pub const RELEASE_VALUE_PER_SONG: f64 = 25.0;
/// Release payout per fan.
pub const RELEASE_VALUE_PER_FAN: f64 = 0.05;
/// Fan counts at which a release gains one more variant.
pub const RELEASE_VARIANT_THRESHOLDS: [f64; 4] = [10_000.0, 100_000.0, 1_000_000.0, 10_000_000.0];

/// How long a tour runs.
pub const TOUR_DURATION_MS: i64 = 120_000;
/// Tour cost per tier.
pub const TOUR_COST_PER_TIER: f64 = 5_000.0;
/// Tour income per fan per second.
pub const TOUR_INCOME_PER_FAN: f64 = 0.02;
/// Tour income per catalog song per second.
pub const TOUR_INCOME_PER_SONG: f64 = 5.0;

/// Upper bound of the control score.
pub const MAX_CONTROL: f64 = 100.0;
/// Platform income multiplier while the monopoly is unlocked.
pub const MONOPOLY_PLATFORM_MULTIPLIER: f64 = 2.0;

/// Highest progression phase.
pub const MAX_PHASE: u8 = 5;

// Feature unlock thresholds, checked once the gating upgrade is owned.
pub const RELEASES_UNLOCK_FANS: f64 = 5_000.0;
pub const TOURS_UNLOCK_RELEASES: usize = 2;
pub const TOURS_UNLOCK_FANS: f64 = 25_000.0;
pub const PLATFORMS_UNLOCK_COMPLETED_TOURS: usize = 1;
/// Control score at which the monopoly opens.
pub const MONOPOLY_UNLOCK_CONTROL: f64 = 50.0;
pub const PRESTIGE_UNLOCK_PHASE: u8 = 3;
pub const ACCELERATOR_UNLOCK_TIER: u8 = 4;

/// Musical genre of a song. Trend research targets one genre.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Genre {
    Pop,
    Rock,
    HipHop,
    Electronic,
    Country,
    Jazz,
}

impl Genre {
    /// All genres in display order.
    pub const ALL: [Genre; 6] = [
        Genre::Pop,
        Genre::Rock,
        Genre::HipHop,
        Genre::Electronic,
        Genre::Country,
        Genre::Jazz,
    ];
}

/// Static parameters of a boost kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoostSpec {
    /// Cost of the first activation.
    pub base_cost: f64,
    /// Factor applied to the cost after each activation.
    pub cost_growth: f64,
    /// Active window length.
    pub duration_ms: i64,
    /// Income axis multiplier.
    pub income_multiplier: f64,
    /// Fan axis multiplier.
    pub fan_multiplier: f64,
    /// Lowest phase at which the boost can be bought.
    pub min_phase: u8,
}

/// Purchasable time-boxed boost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BoostKind {
    RadioPush,
    ViralCampaign,
    StreamingBlitz,
    PlaylistPlacement,
}

impl BoostKind {
    pub const ALL: [BoostKind; 4] = [
        BoostKind::RadioPush,
        BoostKind::ViralCampaign,
        BoostKind::StreamingBlitz,
        BoostKind::PlaylistPlacement,
    ];

    pub const fn spec(self) -> BoostSpec {
        match self {
            BoostKind::RadioPush => BoostSpec {
                base_cost: 250.0,
                cost_growth: 1.4,
                duration_ms: 60_000,
                income_multiplier: 2.0,
                fan_multiplier: 1.0,
                min_phase: 1,
            },
            BoostKind::ViralCampaign => BoostSpec {
                base_cost: 500.0,
                cost_growth: 1.5,
                duration_ms: 30_000,
                income_multiplier: 1.0,
                fan_multiplier: 3.0,
                min_phase: 1,
            },
            BoostKind::StreamingBlitz => BoostSpec {
                base_cost: 2_000.0,
                cost_growth: 1.6,
                duration_ms: 45_000,
                income_multiplier: 3.0,
                fan_multiplier: 1.5,
                min_phase: 2,
            },
            BoostKind::PlaylistPlacement => BoostSpec {
                base_cost: 5_000.0,
                cost_growth: 1.75,
                duration_ms: 120_000,
                income_multiplier: 1.5,
                fan_multiplier: 2.0,
                min_phase: 3,
            },
        }
    }
}

/// Capability gated by progression. Each feature has exactly one gating upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feature {
    TrendResearch,
    PhysicalReleases,
    Tours,
    Platforms,
    Monopoly,
    Prestige,
    Accelerator,
}

impl Feature {
    pub const ALL: [Feature; 7] = [
        Feature::TrendResearch,
        Feature::PhysicalReleases,
        Feature::Tours,
        Feature::Platforms,
        Feature::Monopoly,
        Feature::Prestige,
        Feature::Accelerator,
    ];

    /// The upgrade that must be owned before the feature can unlock.
    pub const fn gating_upgrade(self) -> Upgrade {
        match self {
            Feature::TrendResearch => Upgrade::TrendResearch,
            Feature::PhysicalReleases => Upgrade::PhysicalReleases,
            Feature::Tours => Upgrade::TourBooking,
            Feature::Platforms => Upgrade::PlatformDeals,
            Feature::Monopoly => Upgrade::Monopoly,
            Feature::Prestige => Upgrade::LegacyProgram,
            Feature::Accelerator => Upgrade::Accelerator,
        }
    }
}

/// One-time purchasable upgrade that opens a feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Upgrade {
    TrendResearch,
    PhysicalReleases,
    TourBooking,
    PlatformDeals,
    LegacyProgram,
    Accelerator,
    Monopoly,
}

impl Upgrade {
    pub const ALL: [Upgrade; 7] = [
        Upgrade::TrendResearch,
        Upgrade::PhysicalReleases,
        Upgrade::TourBooking,
        Upgrade::PlatformDeals,
        Upgrade::LegacyProgram,
        Upgrade::Accelerator,
        Upgrade::Monopoly,
    ];

    pub const fn cost(self) -> f64 {
        match self {
            Upgrade::TrendResearch => 1_000.0,
            Upgrade::PhysicalReleases => 5_000.0,
            Upgrade::TourBooking => 25_000.0,
            Upgrade::PlatformDeals => 100_000.0,
            Upgrade::LegacyProgram => 50_000.0,
            Upgrade::Accelerator => 500_000.0,
            Upgrade::Monopoly => 10_000_000.0,
        }
    }

    /// Minimum production tier required to buy the upgrade.
    pub const fn min_tier(self) -> u8 {
        match self {
            Upgrade::TrendResearch => 1,
            Upgrade::PhysicalReleases | Upgrade::TourBooking | Upgrade::LegacyProgram => 2,
            Upgrade::PlatformDeals => 3,
            Upgrade::Accelerator | Upgrade::Monopoly => 4,
        }
    }
}

/// Static parameters of a platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformSpec {
    pub cost: f64,
    pub income_per_second: f64,
    pub control: f64,
}

/// Permanently ownable distribution platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlatformKind {
    IndieStreaming,
    RadioNetwork,
    RecordLabel,
    ConcertPromoter,
    StreamingGiant,
}

impl PlatformKind {
    pub const ALL: [PlatformKind; 5] = [
        PlatformKind::IndieStreaming,
        PlatformKind::RadioNetwork,
        PlatformKind::RecordLabel,
        PlatformKind::ConcertPromoter,
        PlatformKind::StreamingGiant,
    ];

    pub const fn spec(self) -> PlatformSpec {
        match self {
            PlatformKind::IndieStreaming => PlatformSpec {
                cost: 50_000.0,
                income_per_second: 200.0,
                control: 10.0,
            },
            PlatformKind::RadioNetwork => PlatformSpec {
                cost: 250_000.0,
                income_per_second: 800.0,
                control: 15.0,
            },
            PlatformKind::RecordLabel => PlatformSpec {
                cost: 1_000_000.0,
                income_per_second: 3_000.0,
                control: 25.0,
            },
            PlatformKind::ConcertPromoter => PlatformSpec {
                cost: 5_000_000.0,
                income_per_second: 10_000.0,
                control: 20.0,
            },
            PlatformKind::StreamingGiant => PlatformSpec {
                cost: 25_000_000.0,
                income_per_second: 40_000.0,
                control: 40.0,
            },
        }
    }
}

/// Requirements for entering a phase.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseRequirements {
    pub min_fans: f64,
    pub min_tier: u8,
    pub min_releases: usize,
    pub min_money: f64,
    pub min_completed_tours: usize,
    pub min_platforms: usize,
}

/// Requirements for entering `phase`, or `None` for phase 1 and anything
/// beyond [`MAX_PHASE`].
pub fn phase_requirements(phase: u8) -> Option<PhaseRequirements> {
    let base = PhaseRequirements::default();
    match phase {
        2 => Some(PhaseRequirements {
            min_fans: 1_000.0,
            min_tier: 2,
            ..base
        }),
        3 => Some(PhaseRequirements {
            min_fans: 50_000.0,
            min_tier: 3,
            min_releases: 3,
            ..base
        }),
        4 => Some(PhaseRequirements {
            min_fans: 500_000.0,
            min_tier: 4,
            min_money: 1_000_000.0,
            min_completed_tours: 2,
            ..base
        }),
        5 => Some(PhaseRequirements {
            min_fans: 10_000_000.0,
            min_tier: 5,
            min_platforms: 3,
            ..base
        }),
        _ => None,
    }
}

/// Flat upgrade level combining tier and sub-tier, starting at 0.
pub fn upgrade_level(tier: u8, sub_tier: u8) -> u32 {
    u32::from(tier.saturating_sub(1)) * u32::from(SUB_TIERS_PER_TIER) + u32::from(sub_tier)
}

/// Multiplier baked into songs produced at `tier` / `sub_tier`.
pub fn tier_multiplier(tier: u8, sub_tier: u8) -> f64 {
    let tier_steps = i32::from(tier.saturating_sub(1));
    TIER_MULTIPLIER_BASE.powi(tier_steps) * (1.0 + SUB_TIER_BONUS * f64::from(sub_tier))
}

/// Experience multiplier for a given number of prestiges.
pub fn experience_multiplier(prestige_count: u32) -> f64 {
    1.0 + EXPERIENCE_PER_PRESTIGE * f64::from(prestige_count)
}

/// Number of physical release variants printed at `fans`.
pub fn release_variants(fans: f64) -> u32 {
    let passed = RELEASE_VARIANT_THRESHOLDS
        .iter()
        .filter(|&&threshold| fans >= threshold)
        .count();
    1 + passed as u32
}

/// Number of tours that may run at once at `tier`.
pub fn max_concurrent_tours(tier: u8) -> usize {
    match tier {
        0..=3 => 1,
        4 => 2,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_multiplier_grows_with_tier_and_sub_tier() {
        assert_eq!(tier_multiplier(1, 0), 1.0);
        assert_eq!(tier_multiplier(1, 2), 1.5);
        assert_eq!(tier_multiplier(2, 0), 3.0);
        assert_eq!(tier_multiplier(3, 1), 9.0 * 1.25);
    }

    #[test]
    fn upgrade_level_is_flat_index() {
        assert_eq!(upgrade_level(1, 0), 0);
        assert_eq!(upgrade_level(1, 2), 2);
        assert_eq!(upgrade_level(2, 0), 3);
        assert_eq!(upgrade_level(5, 2), 14);
    }

    #[test]
    fn variants_step_up_at_fan_thresholds() {
        assert_eq!(release_variants(0.0), 1);
        assert_eq!(release_variants(9_999.0), 1);
        assert_eq!(release_variants(10_000.0), 2);
        assert_eq!(release_variants(2_000_000.0), 4);
        assert_eq!(release_variants(1e9), 5);
    }

    #[test]
    fn every_feature_has_a_distinct_gating_upgrade() {
        let mut seen: Vec<Upgrade> = Feature::ALL.iter().map(|f| f.gating_upgrade()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), Feature::ALL.len());
    }

    #[test]
    fn phase_table_covers_two_through_max() {
        assert!(phase_requirements(1).is_none());
        for phase in 2..=MAX_PHASE {
            assert!(phase_requirements(phase).is_some(), "phase {phase}");
        }
        assert!(phase_requirements(MAX_PHASE + 1).is_none());
    }

    #[test]
    fn platform_control_sum_exceeds_cap() {
        let total: f64 = PlatformKind::ALL.iter().map(|p| p.spec().control).sum();
        assert!(total > MAX_CONTROL);
    }
}
