//! Nevera command line
//!
//! `nevera` with no subcommand opens the full-screen widget.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::animator::Typewriter;
use crate::config::{Config, Status};
use crate::errors::NeveraError;
use crate::headless::{type_snippets, Pace};
use crate::server::SnippetServer;
use crate::snippets::{load_snippets, HttpSnippetSource, SnippetSource, StaticSnippetSource};
use crate::telemetry::init_tracing;
use crate::tui;

#[derive(Parser)]
#[command(name = "nevera")]
#[command(about = "A decorative terminal that types out code snippets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Snippet endpoint (overrides snippets.endpoint)
    #[arg(long, value_name = "URL", global = true)]
    endpoint: Option<String>,

    /// Use the built-in snippet list instead of fetching
    #[arg(long, global = true)]
    offline: bool,

    /// Seed for snippet selection and typing stalls
    #[arg(long, value_name = "SEED", global = true)]
    seed: Option<u64>,

    /// Status shown in the header (overrides ui.status)
    #[arg(long, value_enum, global = true)]
    status: Option<Status>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the terminal widget (default)
    Run,

    /// Fetch the snippet list once and print it
    Fetch {
        /// Print the list as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Type snippets to stdout without taking over the screen
    Type {
        /// How many snippets to type
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Skip all delays
        #[arg(long)]
        fast: bool,
    },

    /// Serve the configured snippets at /api/functions
    Serve {
        /// Address to listen on (overrides server.bind)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_tracing(cli.log_file.as_deref());

    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    let config_path: Option<String> = cli.config.as_ref().map(|p| expand_home(p));
    let mut config = Config::load(config_path.as_deref())?;
    if let Some(endpoint) = &cli.endpoint {
        config.snippets.endpoint = endpoint.clone();
    }
    if let Some(status) = cli.status {
        config.ui.status = status;
    }
    config.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            if !std::io::stdout().is_terminal() {
                return Err(NeveraError::Terminal(std::io::Error::other(
                    "the widget needs an interactive terminal; try `nevera type`",
                ))
                .into());
            }
            let source = snippet_source(&config, cli.offline)?;
            tui::runner::run(&config, source, cli.seed).await
        }

        Commands::Fetch { json } => {
            let source = snippet_source(&config, cli.offline)?;
            let snippets = source
                .fetch()
                .await
                .map_err(NeveraError::from)
                .with_context(|| format!("Failed to fetch snippets from {}", source.describe()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&snippets)?);
            } else {
                for (i, snippet) in snippets.iter().enumerate() {
                    println!("{} {}", format!("{:>3}", i + 1).dimmed(), snippet);
                }
            }
            if !cli.quiet {
                eprintln!(
                    "{} snippets from {}",
                    snippets.len().to_string().bold(),
                    source.describe()
                );
            }
            Ok(())
        }

        Commands::Type { count, fast } => {
            let source = snippet_source(&config, cli.offline)?;
            let snippets = load_snippets(source.as_ref()).await;
            let mut typewriter = Typewriter::from_config(&config.animation);
            let mut rng = match cli.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let pace = if fast {
                Pace::Instant
            } else {
                Pace::RealTime {
                    cycle: config.animation.cycle_period(),
                }
            };

            let mut stdout = std::io::stdout().lock();
            let typed = type_snippets(
                &mut stdout,
                &mut typewriter,
                &snippets,
                count,
                pace,
                &mut rng,
            )
            .await?;
            if typed == 0 && !cli.quiet {
                eprintln!("{}", "Nothing to type: the snippet list is empty".yellow());
            }
            Ok(())
        }

        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let server = SnippetServer::bind(&bind, config.server.snippets.clone()).await?;
            if !cli.quiet {
                println!(
                    "Serving {} snippets at {}",
                    config.server.snippets.len().to_string().bold(),
                    server.snippets_url().cyan()
                );
            }

            let mut poll = tokio::time::interval(Duration::from_millis(200));
            while !crate::is_shutdown_requested() {
                poll.tick().await;
            }
            server.stop().await;
            Ok(())
        }
    }
}

fn snippet_source(config: &Config, offline: bool) -> Result<Arc<dyn SnippetSource>> {
    if offline {
        return Ok(Arc::new(StaticSnippetSource::new(
            config.server.snippets.clone(),
        )));
    }
    let source = HttpSnippetSource::from_config(config).map_err(NeveraError::from)?;
    Ok(Arc::new(source))
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> String {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|h| h.join(rest).to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string()),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["nevera"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["nevera", "type", "-n", "3", "--offline", "--seed", "9"])
            .unwrap();
        assert!(cli.offline);
        assert_eq!(cli.seed, Some(9));
        assert!(matches!(cli.command, Some(Commands::Type { count: 3, fast: false })));
    }

    #[test]
    fn test_status_flag() {
        let cli = Cli::try_parse_from(["nevera", "--status", "scanning"]).unwrap();
        assert_eq!(cli.status, Some(Status::Scanning));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("nevera.toml"), "nevera.toml");
        if let Some(home) = dirs::home_dir() {
            let expanded = expand_home("~/x.toml");
            assert_eq!(PathBuf::from(expanded), home.join("x.toml"));
        }
    }
}
