//! Widget state and its single update entry point.
//!
//! `App::update` takes a message and returns a command for the runtime. It
//! performs no I/O and never reads the wall clock, so every transition can
//! be driven from tests.

use chrono::{DateTime, Local};
use crossterm::event::Event;
use std::time::Duration;
use tracing::debug;

use crate::animator::{Dice, Keystroke, LineBuffer, Typewriter};
use crate::config::{Config, Status};
use crate::telemetry::sanitize_for_log;

/// Inputs to the state machine
#[derive(Debug, Clone)]
pub enum Msg {
    /// Clock timer fired
    Clock(DateTime<Local>),
    /// Snippet cycle timer fired
    Cycle,
    /// Keystroke timer fired
    Keystroke,
    /// The startup fetch finished (an empty list on failure)
    SnippetsLoaded(Vec<String>),
    /// Terminal input
    Input(Event),
}

/// Side effects for the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    None,
    /// Arm the keystroke timer
    ScheduleKeystroke(Duration),
    Quit,
}

pub struct App {
    pub typewriter: Typewriter,
    pub snippets: Vec<String>,
    pub clock: DateTime<Local>,
    pub clock_format: String,
    pub status: Status,
    /// Set once the startup fetch has reported back
    pub loaded: bool,
    pub quit: bool,
}

impl App {
    pub fn new(config: &Config, now: DateTime<Local>) -> Self {
        Self {
            typewriter: Typewriter::from_config(&config.animation),
            snippets: Vec::new(),
            clock: now,
            clock_format: config.ui.clock_format.clone(),
            status: config.ui.status,
            loaded: false,
            quit: false,
        }
    }

    pub fn buffer(&self) -> &LineBuffer {
        self.typewriter.buffer()
    }

    /// Formatted header clock
    pub fn clock_text(&self) -> String {
        self.clock.format(&self.clock_format).to_string()
    }

    pub fn update<D: Dice + ?Sized>(&mut self, msg: Msg, dice: &mut D) -> Cmd {
        match msg {
            Msg::Clock(now) => {
                self.clock = now;
                Cmd::None
            }

            Msg::Cycle => match self.typewriter.start_cycle(&self.snippets, dice) {
                Some(delay) => {
                    if let Some(snippet) = self.typewriter.current() {
                        debug!("Typing: {}", sanitize_for_log(&snippet));
                    }
                    Cmd::ScheduleKeystroke(delay)
                }
                None => Cmd::None,
            },

            Msg::Keystroke => {
                let step = self.typewriter.keystroke(dice);
                if step.keystroke == Keystroke::Finished {
                    debug!(lines = self.buffer().len(), "Snippet complete");
                }
                match step.next {
                    Some(delay) => Cmd::ScheduleKeystroke(delay),
                    None => Cmd::None,
                }
            }

            Msg::SnippetsLoaded(snippets) => {
                // The list is fixed after the first fetch
                if !self.loaded {
                    self.snippets = snippets;
                    self.loaded = true;
                }
                Cmd::None
            }

            Msg::Input(event) => {
                if super::is_quit(&event) {
                    self.quit = true;
                    Cmd::Quit
                } else {
                    Cmd::None
                }
            }
        }
    }
}
