//! Fixed-interval tick scheduler owning one game state.
//!
//! The scheduler is a plain synchronous object: a host timer calls
//! [`Scheduler::fire`] at the nominal interval, or [`Scheduler::run_for`]
//! drives it in a blocking loop. A firing never re-enters itself.

use crate::clock::Clock;
use crate::config::TickConfig;
use crate::progression::Unlock;
use crate::step::{self, OfflineReport, TickReport};
use persistence::{PersistError, SaveManager, Storage};
use sim_core::GameState;
use sim_econ::names::{NameGenerator, Namer};
use tracing::{debug, info, warn};

/// Called after every tick with the state and the effective delta.
pub type TickObserver = Box<dyn FnMut(&GameState, f64)>;
/// Persists the state; the second argument is the current time.
pub type SaveHandler = Box<dyn FnMut(&GameState, i64) -> Result<(), PersistError>>;
/// Fire-and-forget notification of progression transitions.
pub type UnlockAnnouncer = Box<dyn FnMut(Unlock)>;

/// Applies the clock-jump policy to a raw wall-clock delta.
///
/// Negative deltas and deltas above the clock-change threshold are replaced
/// with the nominal interval; anything else is clamped to the ceiling.
pub fn effective_delta(raw_ms: i64, config: &TickConfig) -> i64 {
    if raw_ms < 0 || raw_ms > config.clock_change_threshold_ms {
        config.tick_interval_ms
    } else {
        raw_ms.min(config.max_delta_ms)
    }
}

pub struct Scheduler<C: Clock> {
    state: GameState,
    clock: C,
    config: TickConfig,
    namer: Box<dyn Namer>,
    running: bool,
    visible: bool,
    last_tick: i64,
    since_save_ms: i64,
    ticks: u64,
    observer: Option<TickObserver>,
    save_handler: Option<SaveHandler>,
    announcer: Option<UnlockAnnouncer>,
}

impl<C: Clock> Scheduler<C> {
    /// A stopped scheduler with no save handler.
    pub fn new(state: GameState, clock: C, config: TickConfig) -> Self {
        let namer = NameGenerator::resuming(&state, 0);
        let last_tick = clock.now_ms();
        Self {
            state,
            clock,
            config,
            namer: Box::new(namer),
            running: false,
            visible: true,
            last_tick,
            since_save_ms: 0,
            ticks: 0,
            observer: None,
            save_handler: None,
            announcer: None,
        }
    }

    /// A stopped scheduler that saves through `saves`.
    pub fn with_save_manager<S>(
        state: GameState,
        clock: C,
        config: TickConfig,
        mut saves: SaveManager<S>,
    ) -> Self
    where
        S: Storage + 'static,
    {
        let mut scheduler = Self::new(state, clock, config);
        scheduler.on_save(move |state, now| saves.save(state, now).map(|_| ()));
        scheduler
    }

    pub fn set_namer(&mut self, namer: Box<dyn Namer>) {
        self.namer = namer;
    }

    pub fn on_tick(&mut self, observer: impl FnMut(&GameState, f64) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn on_save(
        &mut self,
        handler: impl FnMut(&GameState, i64) -> Result<(), PersistError> + 'static,
    ) {
        self.save_handler = Some(Box::new(handler));
    }

    pub fn on_unlock(&mut self, announcer: impl FnMut(Unlock) + 'static) {
        self.announcer = Some(Box::new(announcer));
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks fired since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs a player action against the state at the current time.
    pub fn act<R>(&mut self, action: impl FnOnce(&mut GameState, i64, &mut dyn Namer) -> R) -> R {
        let now = self.clock.now_ms();
        action(&mut self.state, now, self.namer.as_mut())
    }

    /// Credits time spent away since the state's last update.
    pub fn catch_up(&mut self) -> OfflineReport {
        let now = self.clock.now_ms();
        let report =
            step::apply_offline_progress(&mut self.state, now, &self.config, self.namer.as_mut());
        self.announce(&report.unlocks);
        report
    }

    /// Starts ticking. Idempotent.
    pub fn start(&mut self) {
        if self.running {
            debug!("scheduler already running");
            return;
        }
        self.running = true;
        self.last_tick = self.clock.now_ms();
        self.since_save_ms = 0;
        info!(
            interval_ms = self.config.tick_interval_ms,
            "scheduler started"
        );
    }

    /// Stops ticking, flushes a final save and detaches the tick observer
    /// and unlock announcer. Idempotent.
    pub fn stop(&mut self) {
        if !self.running {
            debug!("scheduler already stopped");
            return;
        }
        self.running = false;
        self.save_now();
        self.observer = None;
        self.announcer = None;
        info!(ticks = self.ticks, "scheduler stopped");
    }

    /// Visibility change from the host. Becoming visible resets the tick
    /// baseline so hidden time is not replayed as one huge delta.
    pub fn set_visible(&mut self, visible: bool) {
        if !self.running {
            return;
        }
        if visible && !self.visible {
            self.last_tick = self.clock.now_ms();
            debug!("resumed, tick baseline reset");
        }
        self.visible = visible;
    }

    /// Timer handler: one tick. Returns `None` while stopped.
    pub fn fire(&mut self) -> Option<TickReport> {
        if !self.running {
            return None;
        }
        let now = self.clock.now_ms();
        let raw = now.saturating_sub(self.last_tick);
        self.last_tick = now;
        let delta = effective_delta(raw, &self.config);
        if delta != raw {
            debug!(raw, delta, "tick delta adjusted");
        }

        let report = step::advance(&mut self.state, delta as f64, now, self.namer.as_mut());
        self.ticks += 1;
        self.announce(&report.unlocks);
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.state, report.delta_ms);
        }

        self.since_save_ms += delta;
        if self.since_save_ms >= self.config.autosave_interval_ms {
            self.since_save_ms = 0;
            self.save_now();
        }
        Some(report)
    }

    /// Blocking driver: waits one interval on the clock, then fires, up to
    /// `ticks` times or until stopped. Returns the number of ticks fired.
    pub fn run_for(&mut self, ticks: u64) -> u64 {
        let mut fired = 0;
        while fired < ticks && self.running {
            self.clock.sleep_ms(self.config.tick_interval_ms);
            if self.fire().is_some() {
                fired += 1;
            }
        }
        fired
    }

    /// Saves through the handler if one is set. Failures are logged.
    pub fn save_now(&mut self) -> bool {
        let now = self.clock.now_ms();
        let Some(handler) = self.save_handler.as_mut() else {
            return false;
        };
        match handler(&self.state, now) {
            Ok(()) => {
                debug!("state saved");
                true
            }
            Err(e) => {
                warn!(error = %e, "save failed");
                false
            }
        }
    }

    fn announce(&mut self, unlocks: &[Unlock]) {
        if let Some(announcer) = self.announcer.as_mut() {
            for unlock in unlocks {
                announcer(*unlock);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use persistence::MemoryStorage;
    use sim_core::{Genre, Song, Upgrade};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn earning_state() -> GameState {
        let mut s = GameState::new("Nova", 0);
        s.songs.push(Song {
            id: 100,
            name: "Steady".into(),
            genre: Genre::Pop,
            created_at: 0,
            income_per_second: 10.0,
            fans_per_second: 0.0,
        });
        s
    }

    fn counting_saves(scheduler: &mut Scheduler<ManualClock>) -> Rc<RefCell<u32>> {
        let saves = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&saves);
        scheduler.on_save(move |_, _| {
            *counter.borrow_mut() += 1;
            Ok(())
        });
        saves
    }

    #[test]
    fn delta_policy() {
        let c = TickConfig::default();
        assert_eq!(effective_delta(100, &c), 100);
        assert_eq!(effective_delta(5_000, &c), 1_000);
        assert_eq!(effective_delta(60_000, &c), 1_000);
        assert_eq!(effective_delta(60_001, &c), 100);
        assert_eq!(effective_delta(-1, &c), 100);
    }

    #[test]
    fn fire_is_noop_while_stopped() {
        let clock = ManualClock::new(0);
        let mut s = Scheduler::new(earning_state(), clock, TickConfig::default());
        assert!(s.fire().is_none());
        assert_eq!(s.ticks(), 0);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let clock = ManualClock::new(0);
        let mut s = Scheduler::new(earning_state(), clock, TickConfig::default());
        let saves = counting_saves(&mut s);
        s.start();
        s.start();
        assert!(s.is_running());
        s.stop();
        s.stop();
        assert!(!s.is_running());
        assert_eq!(*saves.borrow(), 1);
    }

    #[test]
    fn clock_jump_uses_nominal_interval() {
        let clock = ManualClock::new(0);
        let mut s = Scheduler::new(earning_state(), clock.clone(), TickConfig::default());
        s.start();
        clock.advance(3_600_000);
        let r = s.fire().unwrap();
        assert_eq!(r.delta_ms, 100.0);
        clock.advance(-5_000);
        let r = s.fire().unwrap();
        assert_eq!(r.delta_ms, 100.0);
        assert_eq!(s.state().last_update, 3_595_000);
    }

    #[test]
    fn resume_resets_baseline() {
        let clock = ManualClock::new(0);
        let mut s = Scheduler::new(earning_state(), clock.clone(), TickConfig::default());
        s.start();
        s.set_visible(false);
        clock.advance(30_000);
        s.set_visible(true);
        clock.advance(100);
        assert_eq!(s.fire().unwrap().delta_ms, 100.0);
    }

    #[test]
    fn autosave_after_interval() {
        let clock = ManualClock::new(0);
        let mut s = Scheduler::new(earning_state(), clock, TickConfig::default());
        let saves = counting_saves(&mut s);
        s.start();
        assert_eq!(s.run_for(99), 99);
        assert_eq!(*saves.borrow(), 0);
        s.run_for(1);
        assert_eq!(*saves.borrow(), 1);
        s.run_for(100);
        assert_eq!(*saves.borrow(), 2);
    }

    #[test]
    fn observer_and_announcer_receive_events_until_stop() {
        let clock = ManualClock::new(0);
        let mut state = earning_state();
        state.upgrades.insert(Upgrade::TrendResearch);
        let mut s = Scheduler::new(state, clock, TickConfig::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let deltas = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        s.on_unlock(move |u| sink.borrow_mut().push(u));
        let sink = Rc::clone(&deltas);
        s.on_tick(move |_, d| sink.borrow_mut().push(d));

        s.start();
        s.run_for(2);
        assert_eq!(
            *seen.borrow(),
            vec![Unlock::Feature(sim_core::Feature::TrendResearch)]
        );
        assert_eq!(*deltas.borrow(), vec![100.0, 100.0]);

        s.stop();
        s.start();
        s.run_for(1);
        assert_eq!(deltas.borrow().len(), 2);
    }

    #[test]
    fn resumed_game_does_not_replay_names() {
        let clock = ManualClock::new(0);
        let mut state = earning_state();
        let mut first = Scheduler::new(state.clone(), clock.clone(), TickConfig::default());
        let names = |s: &mut Scheduler<ManualClock>| -> Vec<String> {
            (0..5).map(|_| s.act(|_, _, namer| namer.song_name())).collect()
        };
        let before = names(&mut first);

        state.next_id += 25;
        let mut resumed = Scheduler::new(state, clock, TickConfig::default());
        assert_ne!(names(&mut resumed), before);
    }

    #[test]
    fn failed_save_does_not_stop_ticking() {
        let clock = ManualClock::new(0);
        let mut s = Scheduler::with_save_manager(
            earning_state(),
            clock,
            TickConfig::default(),
            SaveManager::new(MemoryStorage::with_quota(8)),
        );
        s.start();
        assert!(!s.save_now());
        assert_eq!(s.run_for(150), 150);
    }

    #[test]
    fn save_handler_runs_on_stop() {
        let clock = ManualClock::new(0);
        let storage = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&storage);
        let mut s = Scheduler::new(earning_state(), clock, TickConfig::default());
        let mut manager = SaveManager::new(MemoryStorage::new());
        s.on_save(move |state, now| {
            manager.save(state, now)?;
            *slot.borrow_mut() = manager.load();
            Ok(())
        });
        s.start();
        s.run_for(10);
        s.stop();
        assert_eq!(storage.borrow().as_ref(), Some(s.state()));
    }
}
