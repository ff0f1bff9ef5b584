//! Tracing setup for the bootstrap CLI.
//!
//! Log lines go to stderr without timestamps or targets so they read like
//! plain progress messages. Prompts and the start/finish banners are printed
//! to stdout separately and are unaffected by verbosity.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Map net verbosity (`1 + verbose - quiet`) to a level filter.
///
/// `1` (no flags) shows info, each `-v` goes one level more detailed and
/// each `-q` one level quieter.
pub fn level_for(verbosity: i32) -> LevelFilter {
    match verbosity {
        i32::MIN..=-1 => LevelFilter::ERROR,
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// Initialize the global subscriber.
///
/// `RUST_LOG`, when set, takes precedence over the CLI verbosity.
pub fn init(verbosity: i32) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_for(verbosity).into()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false)
                .compact(),
        )
        .init();
}
