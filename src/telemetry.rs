//! Logging setup
//!
//! The widget owns the whole screen while it runs, so log lines must never
//! reach the terminal it draws on. Output therefore goes to:
//! - a file, when `--log-file` is given (non-blocking writer)
//! - stderr, only when `RUST_LOG` is explicitly set
//! - nowhere otherwise

use std::path::Path;
use std::sync::Once;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// as long as logging is wanted.
pub fn init_tracing(log_file: Option<&Path>) -> Option<WorkerGuard> {
    match log_file {
        Some(path) => init_file_tracing(path, &filter_from_env("info")),
        None => {
            // Keep the terminal clean unless RUST_LOG asks for output
            if let Ok(filter) = std::env::var("RUST_LOG") {
                init_stderr_tracing(&filter);
            }
            None
        }
    }
}

fn filter_from_env(fallback: &str) -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| fallback.to_string())
}

/// Initialize with a custom filter string, writing to stderr
pub fn init_stderr_tracing(filter: &str) {
    INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_level(true)
            .compact()
            .with_writer(std::io::stderr);

        let filter_layer = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init();
    });
}

fn init_file_tracing(path: &Path, filter: &str) -> Option<WorkerGuard> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name()?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let mut installed = false;
    INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer);

        let filter_layer = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

        installed = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init()
            .is_ok();
    });

    installed.then_some(guard)
}

/// Escape control characters so snippet text cannot forge log lines.
pub fn sanitize_for_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x1b' => out.push_str("\\e"),
            '\x00' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}
