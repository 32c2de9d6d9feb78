//! Log output for a generation run
//!
//! The subscriber is built once at startup and handed out as a [`Dispatch`];
//! callers install it around the work with [`tracing::dispatcher::with_default`]
//! instead of registering a process-wide global.

use std::io::IsTerminal;

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

/// Build the dispatcher for this run.
///
/// `RUST_LOG` takes precedence; otherwise `info`, or `debug` when verbose.
/// Lines go to stdout as `LEVEL message`, without timestamps or targets, and
/// are only colored when stdout is a terminal.
pub fn dispatch(verbose: bool) -> Dispatch {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
    );

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(false)
        .without_time()
        .finish();

    Dispatch::new(subscriber)
}
