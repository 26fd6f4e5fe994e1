//! Event loop for the full-screen widget.
//!
//! One task owns [`App`] and the [`Scheduler`]. Everything that happens
//! (timer ticks, the fetch result, key presses) becomes a [`Msg`] fed to
//! `App::update`, and the screen is redrawn after each wake-up.

use anyhow::Result;
use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{read_event, render, App, Cmd, Msg, TuiTerminal};
use crate::animator::Dice;
use crate::config::Config;
use crate::errors::NeveraError;
use crate::scheduler::{Scheduler, Tick};
use crate::snippets::{load_snippets, SnippetSource};

/// Input poll interval; bounds how long the reader takes to notice shutdown
const INPUT_POLL_MS: u64 = 100;

/// Run the widget until a quit key or a shutdown signal.
pub async fn run(config: &Config, source: Arc<dyn SnippetSource>, seed: Option<u64>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut tui = TuiTerminal::new().map_err(terminal_unavailable)?;
    let mut app = App::new(config, Local::now());
    let mut scheduler = Scheduler::new(
        config.ui.clock_period(),
        config.animation.cycle_period(),
        Instant::now(),
    );

    let (tx, mut rx) = mpsc::channel::<Msg>(64);

    let fetch_tx = tx.clone();
    let fetch = tokio::spawn(async move {
        let snippets = load_snippets(source.as_ref()).await;
        let _ = fetch_tx.send(Msg::SnippetsLoaded(snippets)).await;
    });

    let stop = Arc::new(AtomicBool::new(false));
    let input = tokio::task::spawn_blocking({
        let stop = Arc::clone(&stop);
        move || input_loop(tx, stop)
    });

    info!("Widget started");
    let result = event_loop(&mut tui, &mut app, &mut scheduler, &mut rx, &mut rng).await;

    // Tear down every timer and task before handing the terminal back
    stop.store(true, Ordering::Relaxed);
    fetch.abort();
    drop(scheduler);
    if let Err(e) = input.await {
        warn!("Input reader ended abnormally: {}", e);
    }
    tui.restore()?;
    info!("Widget stopped");

    result
}

async fn event_loop(
    tui: &mut TuiTerminal,
    app: &mut App,
    scheduler: &mut Scheduler,
    rx: &mut mpsc::Receiver<Msg>,
    dice: &mut impl Dice,
) -> Result<()> {
    tui.terminal().draw(|f| render(app, f))?;

    loop {
        let deadline = tokio::time::Instant::from_std(scheduler.next_deadline());

        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => {
                let now = Instant::now();
                while let Some(tick) = scheduler.pop_due(now) {
                    let msg = match tick {
                        Tick::Clock => Msg::Clock(Local::now()),
                        Tick::Cycle => Msg::Cycle,
                        Tick::Keystroke => Msg::Keystroke,
                    };
                    dispatch(app, scheduler, msg, dice, now);
                }
            }
            Some(msg) = rx.recv() => {
                dispatch(app, scheduler, msg, dice, Instant::now());
            }
        }

        if app.quit || crate::is_shutdown_requested() {
            debug!("Leaving event loop");
            return Ok(());
        }

        tui.terminal().draw(|f| render(app, f))?;
    }
}

fn terminal_unavailable(e: std::io::Error) -> anyhow::Error {
    anyhow::Error::from(NeveraError::Terminal(e)).context("Failed to initialize terminal")
}

/// Apply one message and carry out the command it returns.
pub fn dispatch<D: Dice + ?Sized>(
    app: &mut App,
    scheduler: &mut Scheduler,
    msg: Msg,
    dice: &mut D,
    now: Instant,
) {
    match app.update(msg, dice) {
        Cmd::ScheduleKeystroke(delay) => scheduler.schedule_keystroke(now, Some(delay)),
        Cmd::None | Cmd::Quit => {}
    }
}

/// Blocking reader forwarding terminal events until `stop` is set.
fn input_loop(tx: mpsc::Sender<Msg>, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::Relaxed) {
        match read_event(INPUT_POLL_MS) {
            Ok(Some(event)) => {
                if tx.blocking_send(Msg::Input(event)).is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to read terminal event: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::ScriptedDice;
    use std::time::Duration;

    /// Step the scheduler and app together over simulated time
    fn simulate(app: &mut App, scheduler: &mut Scheduler, start: Instant, until_ms: u64) {
        let mut dice = ScriptedDice::new();
        for ms in 0..=until_ms {
            let now = start + Duration::from_millis(ms);
            while let Some(tick) = scheduler.pop_due(now) {
                let msg = match tick {
                    Tick::Clock => Msg::Clock(Local::now()),
                    Tick::Cycle => Msg::Cycle,
                    Tick::Keystroke => Msg::Keystroke,
                };
                dispatch(app, scheduler, msg, &mut dice, now);
            }
        }
    }

    fn test_app() -> App {
        let mut config = Config::default();
        config.animation.stall_probability = 0.0;
        App::new(&config, Local::now())
    }

    #[test]
    fn test_terminal_setup_failure_exit_code() {
        let err = terminal_unavailable(std::io::Error::other("not a tty"));
        assert_eq!(
            crate::errors::get_exit_code(&err),
            crate::errors::EXIT_TERMINAL_ERROR
        );
        assert!(err.to_string().contains("Failed to initialize terminal"));
    }

    #[test]
    fn test_first_snippet_typed_after_one_cycle() {
        let start = Instant::now();
        let mut app = test_app();
        let mut scheduler = Scheduler::new(Duration::from_secs(1), Duration::from_secs(4), start);
        dispatch(
            &mut app,
            &mut scheduler,
            Msg::SnippetsLoaded(vec!["a=1".into()]),
            &mut ScriptedDice::new(),
            start,
        );

        simulate(&mut app, &mut scheduler, start, 3999);
        assert_eq!(app.buffer().last(), Some(""));

        // Cycle at 4000ms types 'a' at once, then one char every 35ms
        simulate(&mut app, &mut scheduler, start, 4000);
        assert_eq!(app.buffer().last(), Some("a"));

        simulate(&mut app, &mut scheduler, start, 4070);
        let lines: Vec<&str> = app.buffer().lines().collect();
        assert_eq!(lines, vec!["a=1"]);

        simulate(&mut app, &mut scheduler, start, 4105);
        let lines: Vec<&str> = app.buffer().lines().collect();
        assert_eq!(lines, vec!["a=1", ""]);
        assert!(!scheduler.keystroke_pending());
    }

    #[test]
    fn test_empty_list_never_arms_keystroke() {
        let start = Instant::now();
        let mut app = test_app();
        let mut scheduler = Scheduler::new(Duration::from_secs(1), Duration::from_secs(4), start);
        simulate(&mut app, &mut scheduler, start, 12_000);
        assert!(!scheduler.keystroke_pending());
        assert_eq!(app.buffer().len(), 1);
    }
}
