#![deny(warnings)]

//! Runtime for the label simulation: the per-tick pipeline, progression,
//! offline catch-up and the fixed-interval scheduler that drives them.

pub mod clock;
pub mod config;
pub mod progression;
pub mod scheduler;
pub mod step;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, TickConfig};
pub use progression::{evaluate, Unlock};
pub use scheduler::{effective_delta, Scheduler};
pub use step::{advance, apply_offline_progress, OfflineReport, TickReport};
