//! Sequential single-slot production queue.
//!
//! Only the front entry accumulates progress. When it reaches the current
//! generation duration it becomes a [`Song`] with rates snapshotted at that
//! moment, and the leftover time flows into the next entry within the same
//! call, so a long delta can complete several songs.

use crate::multipliers::song_rates;
use crate::names::Namer;
use crate::{ensure_funds, ActionError};
use sim_core::tuning::{
    self, ACCELERATOR_SPEEDUP, BASE_GENERATION_MS, GENERATION_SPEEDUP_PER_LEVEL,
    MIN_GENERATION_MS, SONG_BASE_COST, SONG_COST_TIER_GROWTH,
};
use sim_core::{Feature, GameState, QueuedSong, Song};
use tracing::debug;

/// Price of one queued song at the current tier.
pub fn song_cost(state: &GameState) -> f64 {
    SONG_BASE_COST * SONG_COST_TIER_GROWTH.powi(i32::from(state.tier.saturating_sub(1)))
}

/// Time needed to finish one song with the current upgrades.
pub fn generation_duration_ms(state: &GameState) -> f64 {
    let level = tuning::upgrade_level(state.tier, state.sub_tier);
    let mut duration =
        (BASE_GENERATION_MS * GENERATION_SPEEDUP_PER_LEVEL.powi(level as i32)).max(MIN_GENERATION_MS);
    if state.is_unlocked(Feature::Accelerator) {
        duration /= ACCELERATOR_SPEEDUP;
    }
    duration
}

/// Pays for and enqueues `count` songs of the selected genre.
///
/// All or nothing: if the total cost exceeds the balance nothing is queued
/// and nothing is charged. Returns the amount paid.
pub fn queue_songs(state: &mut GameState, count: u32, now: i64) -> Result<f64, ActionError> {
    if count == 0 {
        return Err(ActionError::ZeroQuantity);
    }
    let total = song_cost(state) * f64::from(count);
    ensure_funds(state, total)?;

    state.money -= total;
    for _ in 0..count {
        let id = state.allocate_id();
        state.song_queue.push_back(QueuedSong {
            id,
            genre: state.selected_genre,
            progress_ms: 0.0,
            queued_at: now,
        });
    }
    debug!(count, total, queued = state.song_queue.len(), "songs queued");
    Ok(total)
}

/// Advances the front of the queue by `delta_ms` and returns the songs
/// completed during this call, in completion order.
pub fn process_queue(
    state: &mut GameState,
    delta_ms: f64,
    now: i64,
    namer: &mut dyn Namer,
) -> Vec<Song> {
    let mut carry = if delta_ms.is_finite() {
        delta_ms.max(0.0)
    } else {
        0.0
    };
    let mut completed = Vec::new();

    loop {
        let duration = generation_duration_ms(state);
        let Some(front) = state.song_queue.front_mut() else {
            break;
        };
        front.progress_ms += carry;
        if front.progress_ms < duration {
            break;
        }
        carry = front.progress_ms - duration;
        let Some(finished) = state.song_queue.pop_front() else {
            break;
        };
        let song = finish_song(state, &finished, now, namer);
        completed.push(song);
    }

    if !completed.is_empty() {
        debug!(
            completed = completed.len(),
            remaining = state.song_queue.len(),
            "songs completed"
        );
    }
    completed
}

fn finish_song(state: &mut GameState, queued: &QueuedSong, now: i64, namer: &mut dyn Namer) -> Song {
    let (income_per_second, fans_per_second) = song_rates(state, queued.genre, now);
    let song = Song {
        id: queued.id,
        name: namer.song_name(),
        genre: queued.genre,
        created_at: now,
        income_per_second,
        fans_per_second,
    };
    state.songs.push(song.clone());
    song
}
