//! Logger initialisation for the binary.
//!
//! Lines look like `2026-10-17T12:00:00Z | INFO  | bedrock_db_sync::client | message`.
//! `RUST_LOG` overrides the level chosen on the command line.

use log::LevelFilter;
use std::io::Write;

/// Map `-v` / `-q` flags to a level filter.
#[must_use]
pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger. Later calls are ignored.
pub fn init(level: LevelFilter) {
    let result = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} | {:<5} | {} | {}",
                buf.timestamp(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
    if result.is_err() {
        // A logger is already installed.
    }
}
