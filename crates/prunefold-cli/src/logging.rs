use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing::Subscriber;
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    fmt,
    prelude::*,
    registry::LookupSpan,
};

/// Target prefix shared by the library and this binary.
const SEARCH_TARGET: &str = "prunefold";

fn verbosity_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Console filter: search events follow `-v`, everything else stays at warnings.
fn console_targets(verbosity: u8, quiet: bool) -> Targets {
    if quiet {
        return Targets::new().with_default(LevelFilter::OFF);
    }
    Targets::new()
        .with_default(LevelFilter::WARN)
        .with_target(SEARCH_TARGET, verbosity_level(verbosity))
}

/// File filter: the log file always keeps the per-level search trace, even with `--quiet`.
fn file_targets(verbosity: u8) -> Targets {
    let search_level = if verbosity >= 3 {
        LevelFilter::TRACE
    } else {
        LevelFilter::DEBUG
    };
    Targets::new()
        .with_default(LevelFilter::INFO)
        .with_target(SEARCH_TARGET, search_level)
}

fn file_layer<S>(file: File, verbosity: u8) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(file_targets(verbosity))
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
        .with_filter(console_targets(verbosity, quiet));

    let subscriber = tracing_subscriber::registry().with(console_layer);

    match log_file {
        Some(path) => {
            let file = File::create(path).map_err(CliError::Io)?;
            subscriber.with(file_layer(file, verbosity)).init();
        }
        None => subscriber.init(),
    }

    Ok(())
}
