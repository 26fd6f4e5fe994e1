//! Headless typewriter: the same animation written straight to a stream.
//!
//! Used by `nevera type` when there is no screen to own, e.g. piping into
//! another program or recording a demo.

use anyhow::Result;
use crossterm::{
    cursor::MoveToColumn,
    queue,
    terminal::{Clear, ClearType},
};
use std::io::Write;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::animator::{Dice, Keystroke, Typewriter};
use crate::config::InterruptPolicy;

/// Sleep between keystrokes and snippets, or run flat out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// Snippets start on a fixed `cycle` period, like the widget
    RealTime { cycle: Duration },
    Instant,
}

/// Type `count` randomly chosen snippets to `out`, one per line.
///
/// In real time the n-th snippet starts `n * cycle` after the first one. A
/// snippet still being typed when its successor is due is cut short and
/// handled by the typewriter's interrupt policy. Returns the number of
/// snippets started. An empty list types nothing.
pub async fn type_snippets<W: Write, D: Dice + ?Sized>(
    out: &mut W,
    typewriter: &mut Typewriter,
    snippets: &[String],
    count: usize,
    pace: Pace,
    dice: &mut D,
) -> Result<usize> {
    if snippets.is_empty() {
        warn!("No snippets to type");
        return Ok(0);
    }

    let mut typed = 0;
    let mut cycle_start = Instant::now();
    while typed < count && !crate::is_shutdown_requested() {
        let Some(mut delay) = typewriter.start_cycle(snippets, dice) else {
            break;
        };
        let next_cycle = match pace {
            Pace::RealTime { cycle } if typed + 1 < count => Some(cycle_start + cycle),
            _ => None,
        };

        let mut interrupted = false;
        loop {
            if let Some(deadline) = next_cycle {
                if Instant::now() + delay > deadline {
                    interrupted = true;
                    break;
                }
            }
            wait(pace, delay).await;
            if crate::is_shutdown_requested() {
                writeln!(out)?;
                return Ok(typed);
            }
            let step = typewriter.keystroke(dice);
            match step.keystroke {
                Keystroke::Typed(c) => {
                    write!(out, "{}", c)?;
                    out.flush()?;
                }
                Keystroke::Stalled => {}
                Keystroke::Finished => {
                    writeln!(out)?;
                    out.flush()?;
                    break;
                }
                Keystroke::Idle => break,
            }
            match step.next {
                Some(next) => delay = next,
                None => break,
            }
        }

        if interrupted {
            let policy = typewriter.settings().on_interrupt;
            debug!("Snippet overran the cycle, applying {:?}", policy);
            end_interrupted_line(out, policy)?;
        }

        typed += 1;
        if let Some(deadline) = next_cycle {
            tokio::time::sleep_until(deadline).await;
            cycle_start = deadline;
        }
    }

    Ok(typed)
}

/// Close a line cut short by the next cycle.
fn end_interrupted_line<W: Write>(out: &mut W, policy: InterruptPolicy) -> Result<()> {
    match policy {
        InterruptPolicy::Discard => queue!(out, Clear(ClearType::CurrentLine), MoveToColumn(0))?,
        InterruptPolicy::Commit => writeln!(out)?,
    }
    out.flush()?;
    Ok(())
}

async fn wait(pace: Pace, delay: Duration) {
    if let Pace::RealTime { .. } = pace {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
