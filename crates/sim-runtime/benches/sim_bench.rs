use criterion::{criterion_group, criterion_main, Criterion};
use sim_core::{GameState, Genre, Song};
use sim_econ::SequentialNamer;

fn catalog(songs: usize) -> GameState {
    let mut state = GameState::new("Bench", 0);
    state.money = 1e12;
    for i in 0..songs {
        state.songs.push(Song {
            id: 10 + i as u64,
            name: format!("Track {i}"),
            genre: Genre::ALL[i % Genre::ALL.len()],
            created_at: 0,
            income_per_second: 1.0 + i as f64,
            fans_per_second: 0.5,
        });
    }
    state.next_id = 10 + songs as u64;
    state
}

fn bench_ticks(c: &mut Criterion) {
    let mut state = catalog(1_000);
    let mut namer = SequentialNamer::default();
    let mut now = 0;
    c.bench_function("tick_1000_songs", |b| {
        b.iter(|| {
            now += 100;
            sim_runtime::advance(&mut state, 100.0, now, &mut namer)
        })
    });

    let config = sim_runtime::TickConfig::default();
    c.bench_function("offline_one_hour", |b| {
        b.iter(|| {
            let mut state = catalog(100);
            sim_runtime::apply_offline_progress(&mut state, 3_600_000, &config, &mut namer)
        })
    });
}

criterion_group!(benches, bench_ticks);
criterion_main!(benches);
