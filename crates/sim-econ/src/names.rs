//! Song and artist naming.
//!
//! The simulation only needs a `String` per song or artist; callers inject
//! any [`Namer`]. [`NameGenerator`] is a small seeded default that keeps its
//! own de-duplication cache instead of a process-wide one.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim_core::GameState;
use std::collections::VecDeque;

/// Source of display names for new songs and artists.
pub trait Namer {
    fn song_name(&mut self) -> String;
    fn artist_name(&mut self) -> String;
}

const ADJECTIVES: &[&str] = &[
    "Neon", "Golden", "Electric", "Silent", "Midnight", "Velvet", "Broken", "Crimson", "Lucky",
    "Paper", "Wild", "Hollow", "Silver", "Static", "Lonely", "Burning",
];

const NOUNS: &[&str] = &[
    "Hearts", "Highway", "Echo", "Summer", "Satellite", "River", "Mirror", "Skyline", "Thunder",
    "Garden", "Signal", "Dream", "Ocean", "Comet", "Avenue", "Fever",
];

const ARTIST_SUFFIXES: &[&str] = &["Kids", "Collective", "Club", "Society", "Machine", "Union"];

/// How many attempts are made to avoid a recently used name.
const MAX_ATTEMPTS: usize = 8;

/// Seeded name generator with a bounded recent-names cache.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    rng: ChaCha8Rng,
    recent: VecDeque<String>,
    capacity: usize,
}

impl NameGenerator {
    /// Default number of remembered names.
    pub const DEFAULT_CAPACITY: usize = 50;

    pub fn new(seed: u64) -> Self {
        Self::with_capacity(seed, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(seed: u64, capacity: usize) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            recent: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Generator for a game being resumed. The seed mixes `salt` with the
    /// creation time and the id counter, which grows with every song, so each
    /// session draws a different sequence. The cache is primed with the
    /// newest catalog names and the active artist.
    pub fn resuming(state: &GameState, salt: u64) -> Self {
        let seed = (state.created_at as u64).rotate_left(32)
            ^ state.next_id.wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ salt;
        let mut generator = Self::new(seed);
        let skip = state.songs.len().saturating_sub(generator.capacity.saturating_sub(1));
        for song in state.songs.iter().skip(skip) {
            generator.remember(song.name.clone());
        }
        generator.remember(state.artist.name.clone());
        generator
    }

    /// Names currently remembered, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().map(String::as_str)
    }

    fn pick(&mut self, words: &'static [&'static str]) -> &'static str {
        words.choose(&mut self.rng).copied().unwrap_or("Untitled")
    }

    fn remember(&mut self, name: String) -> String {
        if self.capacity > 0 {
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(name.clone());
        }
        name
    }

    fn fresh(&mut self, mut build: impl FnMut(&mut Self) -> String) -> String {
        let mut candidate = build(self);
        for _ in 1..MAX_ATTEMPTS {
            if !self.recent.contains(&candidate) {
                break;
            }
            candidate = build(self);
        }
        self.remember(candidate)
    }
}

impl Namer for NameGenerator {
    fn song_name(&mut self) -> String {
        self.fresh(|g| {
            let adjective = g.pick(ADJECTIVES);
            let noun = g.pick(NOUNS);
            format!("{adjective} {noun}")
        })
    }

    fn artist_name(&mut self) -> String {
        self.fresh(|g| {
            let noun = g.pick(NOUNS);
            let suffix = g.pick(ARTIST_SUFFIXES);
            format!("The {noun} {suffix}")
        })
    }
}

/// Namer that returns numbered placeholder names. Deterministic and cheap.
#[derive(Debug, Clone, Default)]
pub struct SequentialNamer {
    songs: u64,
    artists: u64,
}

impl Namer for SequentialNamer {
    fn song_name(&mut self) -> String {
        self.songs += 1;
        format!("Track {}", self.songs)
    }

    fn artist_name(&mut self) -> String {
        self.artists += 1;
        format!("Artist {}", self.artists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_names() {
        let mut a = NameGenerator::new(7);
        let mut b = NameGenerator::new(7);
        for _ in 0..10 {
            assert_eq!(a.song_name(), b.song_name());
        }
        assert_eq!(a.artist_name(), b.artist_name());
    }

    #[test]
    fn cache_is_bounded_and_per_instance() {
        let mut a = NameGenerator::with_capacity(1, 4);
        for _ in 0..10 {
            a.song_name();
        }
        assert_eq!(a.recent().count(), 4);
        let b = NameGenerator::with_capacity(1, 4);
        assert_eq!(b.recent().count(), 0);
    }

    #[test]
    fn recent_names_are_mostly_unique() {
        let mut g = NameGenerator::new(99);
        let names: Vec<String> = (0..20).map(|_| g.song_name()).collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert!(unique.len() >= 18, "too many repeats: {names:?}");
    }

    #[test]
    fn resumed_sessions_draw_new_sequences() {
        let mut state = GameState::new("Nova", 1_000);
        let first: Vec<String> = {
            let mut g = NameGenerator::resuming(&state, 0);
            (0..6).map(|_| g.song_name()).collect()
        };
        let mut again = NameGenerator::resuming(&state, 0);
        let replay: Vec<String> = (0..6).map(|_| again.song_name()).collect();
        assert_eq!(first, replay);

        state.next_id += 40;
        let mut later = NameGenerator::resuming(&state, 0);
        let next: Vec<String> = (0..6).map(|_| later.song_name()).collect();
        assert_ne!(first, next);
    }

    #[test]
    fn resuming_primes_cache_with_catalog() {
        let mut state = GameState::new("Nova", 0);
        for i in 0..80u64 {
            state.songs.push(sim_core::Song {
                id: 100 + i,
                name: format!("Song {i}"),
                genre: sim_core::Genre::Pop,
                created_at: 0,
                income_per_second: 1.0,
                fans_per_second: 0.5,
            });
        }
        let g = NameGenerator::resuming(&state, 3);
        let recent: Vec<&str> = g.recent().collect();
        assert_eq!(recent.len(), NameGenerator::DEFAULT_CAPACITY);
        assert_eq!(recent.first().copied(), Some("Song 31"));
        assert_eq!(recent[recent.len() - 2], "Song 79");
        assert_eq!(recent.last().copied(), Some("Nova"));
    }

    #[test]
    fn sequential_namer_counts() {
        let mut n = SequentialNamer::default();
        assert_eq!(n.song_name(), "Track 1");
        assert_eq!(n.song_name(), "Track 2");
        assert_eq!(n.artist_name(), "Artist 1");
    }
}
