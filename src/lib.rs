//! Nevera - a decorative typewriter terminal
//!
//! Fetches a list of code snippets once at startup and types a random one
//! out, character by character, every few seconds, next to a status light
//! and a clock.
//!
//! - **Snippets**: one fail-soft fetch from an HTTP endpoint
//! - **Animator**: typewriter state machine over a bounded line buffer
//! - **Scheduler**: clock, cycle and keystroke timers as plain deadlines
//! - **TUI**: ratatui widget with a single update entry point
//! - **Server**: the development endpoint the widget reads from
//!
//! # Quick Start
//!
//! ```ignore
//! use nevera::animator::{ScriptedDice, Typewriter};
//! use nevera::config::Config;
//!
//! let config = Config::load(None)?;
//! let mut typewriter = Typewriter::from_config(&config.animation);
//! typewriter.start_cycle(&["a=1".to_string()], &mut ScriptedDice::new());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

pub mod animator;
pub mod cli;
pub mod config;
pub mod errors;
pub mod headless;
pub mod scheduler;
pub mod server;
pub mod snippets;
pub mod telemetry;
pub mod tui;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Ask every long-running loop to wind down.
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

pub fn is_shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}
