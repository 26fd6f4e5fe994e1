//! Configuration Management
//!
//! Loads widget configuration from TOML files. Every key has a default, so
//! an empty file (or no file at all) yields the stock widget:
//! - Snippet source (endpoint, request timeout)
//! - Animation cadence (cycle period, keystroke delays, stall probability)
//! - Display (status indicator, clock format)
//! - Development snippet server

use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::NeveraError;

/// Status shown in the widget header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Scanning,
    Processing,
    Analyzing,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Active => write!(f, "ACTIVE"),
            Status::Scanning => write!(f, "SCANNING"),
            Status::Processing => write!(f, "PROCESSING"),
            Status::Analyzing => write!(f, "ANALYZING"),
        }
    }
}

/// What a cycle tick does to a snippet that is still being typed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterruptPolicy {
    /// Throw the partial line away and type the new snippet in its place
    #[default]
    Discard,
    /// Keep the partial line and start the new snippet on a fresh line
    Commit,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub snippets: SnippetsConfig,

    #[serde(default)]
    pub animation: AnimationConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetsConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SnippetsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Period between snippet selections
    #[serde(default = "default_cycle_ms")]
    pub cycle_ms: u64,
    /// Delay after a typed character
    #[serde(default = "default_char_delay_ms")]
    pub char_delay_ms: u64,
    /// Delay after a stalled keystroke
    #[serde(default = "default_stall_delay_ms")]
    pub stall_delay_ms: u64,
    /// Chance that a keystroke stalls instead of typing; 0 is deterministic
    #[serde(default = "default_stall_probability")]
    pub stall_probability: f64,
    /// Maximum number of lines kept on screen
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
    #[serde(default)]
    pub on_interrupt: InterruptPolicy,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            cycle_ms: default_cycle_ms(),
            char_delay_ms: default_char_delay_ms(),
            stall_delay_ms: default_stall_delay_ms(),
            stall_probability: default_stall_probability(),
            max_lines: default_max_lines(),
            on_interrupt: InterruptPolicy::default(),
        }
    }
}

impl AnimationConfig {
    pub fn cycle_period(&self) -> Duration {
        Duration::from_millis(self.cycle_ms)
    }

    pub fn char_delay(&self) -> Duration {
        Duration::from_millis(self.char_delay_ms)
    }

    pub fn stall_delay(&self) -> Duration {
        Duration::from_millis(self.stall_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub status: Status,
    /// chrono format string for the header clock
    #[serde(default = "default_clock_format")]
    pub clock_format: String,
    #[serde(default = "default_clock_ms")]
    pub clock_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            status: Status::default(),
            clock_format: default_clock_format(),
            clock_ms: default_clock_ms(),
        }
    }
}

impl UiConfig {
    pub fn clock_period(&self) -> Duration {
        Duration::from_millis(self.clock_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_server_snippets")]
    pub snippets: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            snippets: default_server_snippets(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:5000/api/functions".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_cycle_ms() -> u64 {
    4000
}
fn default_char_delay_ms() -> u64 {
    35
}
fn default_stall_delay_ms() -> u64 {
    100
}
fn default_stall_probability() -> f64 {
    0.1
}
fn default_max_lines() -> usize {
    50
}
fn default_clock_format() -> String {
    "%H:%M:%S".to_string()
}
fn default_clock_ms() -> u64 {
    1000
}
fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}
fn default_server_snippets() -> Vec<String> {
    vec![
        "function example1() { console.log('Example 1'); }".to_string(),
        "function example2() { console.log('Example 2'); }".to_string(),
        "function example3() { console.log('Example 3'); }".to_string(),
    ]
}

/// File names tried, in order, when no `--config` is given
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("nevera.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("nevera").join("config.toml"));
    }
    paths
}

impl Config {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config = match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config from {}", p))?;
                Self::from_toml_str(&content)?
            }
            None => {
                let mut found = None;
                for p in default_config_paths() {
                    if let Ok(content) = std::fs::read_to_string(&p) {
                        tracing::debug!("Loading config from {}", p.display());
                        found = Some(Self::from_toml_str(&content)?);
                        break;
                    }
                }
                found.unwrap_or_else(|| {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                })
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| NeveraError::Config(e.to_string()))
            .context("Failed to parse config")
    }

    /// Reject values the animator cannot run with.
    pub fn validate(&self) -> std::result::Result<(), NeveraError> {
        let anim = &self.animation;
        if !(0.0..=1.0).contains(&anim.stall_probability) {
            return Err(NeveraError::Config(format!(
                "animation.stall_probability must be within 0..=1, got {}",
                anim.stall_probability
            )));
        }
        for (name, value) in [
            ("animation.cycle_ms", anim.cycle_ms),
            ("animation.char_delay_ms", anim.char_delay_ms),
            ("animation.stall_delay_ms", anim.stall_delay_ms),
            ("ui.clock_ms", self.ui.clock_ms),
        ] {
            if value == 0 {
                return Err(NeveraError::Config(format!("{} must be greater than 0", name)));
            }
        }
        if anim.max_lines == 0 {
            return Err(NeveraError::Config(
                "animation.max_lines must be at least 1".to_string(),
            ));
        }
        if StrftimeItems::new(&self.ui.clock_format).any(|item| item == Item::Error) {
            return Err(NeveraError::Config(format!(
                "ui.clock_format is not a valid format string: {:?}",
                self.ui.clock_format
            )));
        }
        if self.snippets.endpoint.trim().is_empty() {
            return Err(NeveraError::Config("snippets.endpoint is empty".to_string()));
        }
        Ok(())
    }
}
