//! Typing Animator
//!
//! The typewriter is an explicit state machine. It never sleeps or spawns
//! anything itself: each call reports the delay until it wants to be called
//! again, and the caller (the TUI runtime or the headless writer) owns the
//! timers.
//!
//! ```text
//! Idle --cycle--> Typing --keystroke*--> (line complete) --> Idle
//! ```

mod buffer;
mod dice;

pub use buffer::LineBuffer;
pub use dice::{Dice, ScriptedDice};

use std::time::Duration;

use crate::config::{AnimationConfig, InterruptPolicy};

/// Timing and behaviour knobs, usually taken from [`AnimationConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct TypingSettings {
    pub char_delay: Duration,
    pub stall_delay: Duration,
    pub stall_probability: f64,
    pub on_interrupt: InterruptPolicy,
}

impl Default for TypingSettings {
    fn default() -> Self {
        Self::from(&AnimationConfig::default())
    }
}

impl From<&AnimationConfig> for TypingSettings {
    fn from(config: &AnimationConfig) -> Self {
        Self {
            char_delay: config.char_delay(),
            stall_delay: config.stall_delay(),
            stall_probability: config.stall_probability,
            on_interrupt: config.on_interrupt,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Typing {
        chars: Vec<char>,
        index: usize,
        partial: String,
    },
}

/// What a single keystroke did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    /// Nothing is being typed
    Idle,
    /// A character was appended to the last line
    Typed(char),
    /// The keystroke was skipped; the same character is retried later
    Stalled,
    /// The snippet is done and a fresh empty line was appended
    Finished,
}

/// Outcome of a keystroke plus when the next one is due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub keystroke: Keystroke,
    pub next: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    buffer: LineBuffer,
    phase: Phase,
    settings: TypingSettings,
}

impl Typewriter {
    pub fn new(settings: TypingSettings, max_lines: usize) -> Self {
        Self {
            buffer: LineBuffer::new(max_lines),
            phase: Phase::Idle,
            settings,
        }
    }

    pub fn from_config(config: &AnimationConfig) -> Self {
        Self::new(TypingSettings::from(config), config.max_lines)
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn settings(&self) -> &TypingSettings {
        &self.settings
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.phase, Phase::Typing { .. })
    }

    /// Snippet currently being typed, if any
    pub fn current(&self) -> Option<String> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Typing { chars, .. } => Some(chars.iter().collect()),
        }
    }

    /// Handle a cycle tick: pick a snippet and start typing it.
    ///
    /// Returns the delay before the first keystroke, or `None` when the list
    /// is empty and the animator stays as it is.
    pub fn start_cycle<D: Dice + ?Sized>(
        &mut self,
        snippets: &[String],
        dice: &mut D,
    ) -> Option<Duration> {
        if snippets.is_empty() {
            return None;
        }
        let index = dice.pick(snippets.len());
        self.begin(&snippets[index]);
        Some(Duration::ZERO)
    }

    /// Start typing `snippet` from its first character.
    pub fn begin(&mut self, snippet: &str) {
        if let Phase::Typing { partial, .. } = &self.phase {
            match self.settings.on_interrupt {
                InterruptPolicy::Discard => self.buffer.set_last(""),
                InterruptPolicy::Commit if !partial.is_empty() => self.buffer.push_line(""),
                InterruptPolicy::Commit => {}
            }
        }
        self.phase = Phase::Typing {
            chars: snippet.chars().collect(),
            index: 0,
            partial: String::new(),
        };
    }

    /// Handle a keystroke tick.
    pub fn keystroke<D: Dice + ?Sized>(&mut self, dice: &mut D) -> Step {
        let Phase::Typing {
            chars,
            index,
            partial,
        } = &mut self.phase
        else {
            return Step {
                keystroke: Keystroke::Idle,
                next: None,
            };
        };

        if let Some(&c) = chars.get(*index) {
            if dice.stall(self.settings.stall_probability) {
                return Step {
                    keystroke: Keystroke::Stalled,
                    next: Some(self.settings.stall_delay),
                };
            }
            partial.push(c);
            *index += 1;
            self.buffer.set_last(partial.as_str());
            return Step {
                keystroke: Keystroke::Typed(c),
                next: Some(self.settings.char_delay),
            };
        }

        self.buffer.push_line("");
        self.phase = Phase::Idle;
        Step {
            keystroke: Keystroke::Finished,
            next: None,
        }
    }
}
