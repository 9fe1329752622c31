#![deny(warnings)]

//! Headless driver: loads or creates a label, credits offline time, runs
//! the scheduler with the autopilot and saves on exit.

mod autopilot;

use anyhow::{bail, Context, Result};
use persistence::{FileStorage, SaveManager};
use sim_core::GameState;
use sim_econ::{NameGenerator, Namer};
use sim_runtime::{Clock, ManualClock, Scheduler, SystemClock, TickConfig, Unlock};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq)]
struct Args {
    /// Simulated seconds to run.
    seconds: u64,
    save_dir: PathBuf,
    config: Option<PathBuf>,
    seed: u64,
    /// Advance a manual clock instead of sleeping.
    fast: bool,
    /// Delete any existing save and start over.
    new_game: bool,
    autopilot: bool,
    export: Option<PathBuf>,
    import: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seconds: 60,
            save_dir: PathBuf::from("./saves"),
            config: None,
            seed: 42,
            fast: false,
            new_game: false,
            autopilot: true,
            export: None,
            import: None,
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--seconds" => {
                let value = it.next().context("--seconds needs a value")?;
                parsed.seconds = value
                    .parse()
                    .with_context(|| format!("invalid --seconds value `{value}`"))?;
            }
            "--seed" => {
                let value = it.next().context("--seed needs a value")?;
                parsed.seed = value
                    .parse()
                    .with_context(|| format!("invalid --seed value `{value}`"))?;
            }
            "--save-dir" => parsed.save_dir = it.next().context("--save-dir needs a path")?.into(),
            "--config" => parsed.config = Some(it.next().context("--config needs a path")?.into()),
            "--export" => parsed.export = Some(it.next().context("--export needs a path")?.into()),
            "--import" => parsed.import = Some(it.next().context("--import needs a path")?.into()),
            "--fast" => parsed.fast = true,
            "--new" => parsed.new_game = true,
            "--manual" => parsed.autopilot = false,
            other => bail!("unknown argument `{other}`"),
        }
    }
    Ok(parsed)
}

fn load_config(args: &Args) -> Result<TickConfig> {
    match &args.config {
        Some(path) => TickConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(TickConfig::default()),
    }
}

/// Picks the starting state: an imported save, the stored save, or a new game.
fn initial_state(args: &Args, namer: &mut dyn Namer, now: i64) -> Result<GameState> {
    let mut saves = SaveManager::new(FileStorage::new(&args.save_dir));
    if let Some(path) = &args.import {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let state = saves.import(&text).context("importing save")?;
        info!(path = %path.display(), "save imported");
        return Ok(state);
    }
    if args.new_game {
        saves.clear().context("clearing previous save")?;
    } else if let Some(state) = saves.load() {
        return Ok(state);
    }
    let state = GameState::new(namer.artist_name(), now);
    info!(artist = %state.artist.name, "new game");
    Ok(state)
}

fn run<C: Clock>(args: &Args, config: TickConfig, clock: C) -> Result<GameState> {
    let mut namer = NameGenerator::new(args.seed);
    let state = initial_state(args, &mut namer, clock.now_ms())?;
    let namer = NameGenerator::resuming(&state, args.seed);

    let saves = SaveManager::new(FileStorage::new(&args.save_dir));
    let mut scheduler = Scheduler::with_save_manager(state, clock, config, saves);
    scheduler.set_namer(Box::new(namer));
    scheduler.on_unlock(|unlock| match unlock {
        Unlock::Feature(feature) => println!("Unlocked | {feature:?}"),
        Unlock::Phase(phase) => println!("Phase {phase} reached"),
    });

    let offline = scheduler.catch_up();
    if offline.credited_ms > 0 {
        println!(
            "Welcome back | away: {}s | money: +{:.0} | fans: +{:.0} | songs: +{}",
            offline.credited_ms / 1_000,
            offline.money_earned,
            offline.fans_gained,
            offline.songs_completed
        );
    }

    let ticks = args.seconds * 1_000 / scheduler.config().tick_interval_ms.max(1) as u64;
    scheduler.start();
    for _ in 0..ticks {
        scheduler.run_for(1);
        if args.autopilot {
            scheduler.act(autopilot::step);
        }
    }
    scheduler.stop();
    Ok(scheduler.into_state())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = load_config(&args)?;
    info!(git_sha = env!("GIT_SHA"), ?args, "starting hitmaker");

    let state = if args.fast {
        run(&args, config, ManualClock::new(SystemClock.now_ms()))?
    } else {
        run(&args, config, SystemClock)?
    };

    println!(
        "Label | artist: {} | phase: {} | tier: {}.{} | prestige: {}",
        state.artist.name,
        state.phase(),
        state.tier,
        state.sub_tier,
        state.prestige_count
    );
    println!(
        "KPI | money: {:.0} | earned: {:.0} | fans: {:.0} | songs: {} | releases: {} | tours: {} | platforms: {} | legacy: {}",
        state.money,
        state.total_money_earned,
        state.fans,
        state.songs.len(),
        state.physical_releases.len(),
        state.completed_tours(),
        state.platforms.len(),
        state.legacy_artists.len()
    );

    if let Some(path) = &args.export {
        let saves = SaveManager::new(FileStorage::new(&args.save_dir));
        let text = saves.export().context("exporting save")?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "save exported");
    }
    Ok(())
}
