//! Serializable game state and the entities it owns.

use crate::tuning::{
    self, BoostKind, Feature, Genre, PlatformKind, Upgrade, MAX_CONTROL, STARTING_MONEY,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Identifier handed out by [`GameState::allocate_id`].
pub type EntityId = u64;

/// A finished song. Rates are a snapshot taken at creation and never change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: EntityId,
    pub name: String,
    pub genre: Genre,
    /// Completion timestamp (epoch ms).
    pub created_at: i64,
    /// Money per second, all creation-time multipliers included.
    pub income_per_second: f64,
    /// Fans per second, all creation-time multipliers included.
    pub fans_per_second: f64,
}

/// A paid-for song waiting in (or at the front of) the production queue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueuedSong {
    pub id: EntityId,
    pub genre: Genre,
    /// Accumulated generation time in ms. Only the front entry advances.
    pub progress_ms: f64,
    pub queued_at: i64,
}

/// A time-boxed multiplicative modifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveBoost {
    pub kind: BoostKind,
    pub activated_at: i64,
    pub duration_ms: i64,
    pub income_multiplier: f64,
    pub fan_multiplier: f64,
}

impl ActiveBoost {
    /// Whether the boost applies at `now`: `[activated_at, expires_at)`.
    pub fn is_active(&self, now: i64) -> bool {
        now >= self.activated_at && !self.is_expired(now)
    }

    /// Whether the window has closed for good.
    pub fn is_expired(&self, now: i64) -> bool {
        now.saturating_sub(self.activated_at) >= self.duration_ms
    }

    pub fn expires_at(&self) -> i64 {
        self.activated_at.saturating_add(self.duration_ms)
    }

    /// Milliseconds left before expiry, zero once expired.
    pub fn remaining_ms(&self, now: i64) -> i64 {
        (self.duration_ms - now.saturating_sub(self.activated_at)).max(0)
    }
}

/// The artist currently being developed (the active cohort).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: EntityId,
    pub name: String,
    pub started_at: i64,
    /// Highest fan count reached by this artist.
    pub peak_fans: f64,
}

/// Snapshot of a retired artist, captured once at prestige time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyArtist {
    pub id: EntityId,
    pub name: String,
    pub peak_fans: f64,
    pub song_count: usize,
    /// Fixed passive income contributed from now on.
    pub income_per_second: f64,
    pub retired_at: i64,
}

/// A platform bought by the label. Never removed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OwnedPlatform {
    pub kind: PlatformKind,
    pub acquired_at: i64,
}

/// A tour. Earns while `completed_at` is `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub id: EntityId,
    pub started_at: i64,
    pub completed_at: Option<i64>,
}

impl Tour {
    pub fn is_active(&self) -> bool {
        self.completed_at.is_none()
    }
}

/// An auto-published physical release.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalRelease {
    pub id: EntityId,
    pub released_at: i64,
    /// Catalog size at release time.
    pub song_count: usize,
    pub variants: u32,
    pub payout: f64,
}

/// The genre currently favoured by the market.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub genre: Genre,
    pub started_at: i64,
}

/// Monotonic progression state: an ordinal phase plus one flag per feature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionFlags {
    pub phase: u8,
    pub trend_research: bool,
    pub physical_releases: bool,
    pub tours: bool,
    pub platforms: bool,
    pub monopoly: bool,
    pub prestige: bool,
    pub accelerator: bool,
}

impl Default for ProgressionFlags {
    fn default() -> Self {
        Self {
            phase: 1,
            trend_research: false,
            physical_releases: false,
            tours: false,
            platforms: false,
            monopoly: false,
            prestige: false,
            accelerator: false,
        }
    }
}

impl ProgressionFlags {
    pub fn is_unlocked(&self, feature: Feature) -> bool {
        match feature {
            Feature::TrendResearch => self.trend_research,
            Feature::PhysicalReleases => self.physical_releases,
            Feature::Tours => self.tours,
            Feature::Platforms => self.platforms,
            Feature::Monopoly => self.monopoly,
            Feature::Prestige => self.prestige,
            Feature::Accelerator => self.accelerator,
        }
    }

    /// Sets the flag for `feature`. Returns `true` if it was previously unset.
    /// Flags are never cleared.
    pub fn unlock(&mut self, feature: Feature) -> bool {
        let slot = match feature {
            Feature::TrendResearch => &mut self.trend_research,
            Feature::PhysicalReleases => &mut self.physical_releases,
            Feature::Tours => &mut self.tours,
            Feature::Platforms => &mut self.platforms,
            Feature::Monopoly => &mut self.monopoly,
            Feature::Prestige => &mut self.prestige,
            Feature::Accelerator => &mut self.accelerator,
        };
        let newly = !*slot;
        *slot = true;
        newly
    }
}

/// The whole persistent game state. Exactly one instance is mutated per tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Spendable balance.
    pub money: f64,
    /// Current fans of the active artist.
    pub fans: f64,
    /// Lifetime money earned, never reset.
    pub total_money_earned: f64,
    /// Production tier in `1..=MAX_TIER`.
    pub tier: u8,
    /// Sub-tier in `0..SUB_TIERS_PER_TIER`.
    pub sub_tier: u8,
    /// Genre assigned to newly queued songs.
    pub selected_genre: Genre,
    pub trend: Option<Trend>,
    pub songs: Vec<Song>,
    pub song_queue: VecDeque<QueuedSong>,
    pub boosts: Vec<ActiveBoost>,
    /// Number of times each boost kind has been bought; drives its cost.
    pub boost_usage: BTreeMap<BoostKind, u32>,
    pub upgrades: BTreeSet<Upgrade>,
    pub progression: ProgressionFlags,
    pub artist: Artist,
    /// Retired artists, oldest first. Never longer than `LEGACY_CAPACITY`.
    pub legacy_artists: Vec<LegacyArtist>,
    pub prestige_count: u32,
    pub experience_multiplier: f64,
    pub platforms: Vec<OwnedPlatform>,
    /// Industry control in `0..=MAX_CONTROL`, derived from owned platforms.
    pub control_score: f64,
    pub tours: Vec<Tour>,
    pub physical_releases: Vec<PhysicalRelease>,
    /// Catalog size when the last release was published.
    pub last_release_song_count: usize,
    pub last_release_at: Option<i64>,
    /// Next free entity id.
    pub next_id: EntityId,
    /// Timestamp of the last applied tick.
    pub last_update: i64,
    pub created_at: i64,
}

impl GameState {
    /// A fresh game whose first artist is called `artist_name`.
    pub fn new(artist_name: impl Into<String>, now: i64) -> Self {
        Self {
            money: STARTING_MONEY,
            fans: 0.0,
            total_money_earned: 0.0,
            tier: 1,
            sub_tier: 0,
            selected_genre: Genre::Pop,
            trend: None,
            songs: Vec::new(),
            song_queue: VecDeque::new(),
            boosts: Vec::new(),
            boost_usage: BTreeMap::new(),
            upgrades: BTreeSet::new(),
            progression: ProgressionFlags::default(),
            artist: Artist {
                id: 1,
                name: artist_name.into(),
                started_at: now,
                peak_fans: 0.0,
            },
            legacy_artists: Vec::new(),
            prestige_count: 0,
            experience_multiplier: 1.0,
            platforms: Vec::new(),
            control_score: 0.0,
            tours: Vec::new(),
            physical_releases: Vec::new(),
            last_release_song_count: 0,
            last_release_at: None,
            next_id: 2,
            last_update: now,
            created_at: now,
        }
    }

    /// Hands out a fresh entity id.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    pub fn phase(&self) -> u8 {
        self.progression.phase
    }

    pub fn is_unlocked(&self, feature: Feature) -> bool {
        self.progression.is_unlocked(feature)
    }

    pub fn has_upgrade(&self, upgrade: Upgrade) -> bool {
        self.upgrades.contains(&upgrade)
    }

    pub fn owns_platform(&self, kind: PlatformKind) -> bool {
        self.platforms.iter().any(|p| p.kind == kind)
    }

    pub fn active_tours(&self) -> usize {
        self.tours.iter().filter(|t| t.is_active()).count()
    }

    pub fn completed_tours(&self) -> usize {
        self.tours.iter().filter(|t| !t.is_active()).count()
    }

    /// Sum of every song's snapshotted income.
    pub fn song_income_per_second(&self) -> f64 {
        self.songs.iter().map(|s| s.income_per_second).sum()
    }

    /// Sum of every song's snapshotted fan gain.
    pub fn song_fans_per_second(&self) -> f64 {
        self.songs.iter().map(|s| s.fans_per_second).sum()
    }

    /// Credits earned money, keeping the lifetime total in sync.
    pub fn earn(&mut self, amount: f64) {
        self.money += amount;
        self.total_money_earned += amount;
    }

    /// Adds fans and tracks the active artist's peak.
    pub fn gain_fans(&mut self, amount: f64) {
        self.fans += amount;
        if self.fans > self.artist.peak_fans {
            self.artist.peak_fans = self.fans;
        }
    }

    /// Pure recomputation of the control score from owned platforms.
    pub fn recompute_control(&mut self) -> f64 {
        let total: f64 = self.platforms.iter().map(|p| p.kind.spec().control).sum();
        self.control_score = total.min(MAX_CONTROL);
        self.control_score
    }

    /// Recomputes the experience multiplier from the prestige counter.
    pub fn recompute_experience(&mut self) -> f64 {
        self.experience_multiplier = tuning::experience_multiplier(self.prestige_count);
        self.experience_multiplier
    }
}
