//! Bedrock database bot entrypoint.
//!
//! Runs the configured number of polling cycles, or rebuilds the version
//! catalog from the stored sequences.

use bedrock_db_bot::cli::{Cli, Command};
use bedrock_db_bot::config::{BotConfig, ResolvedPaths};
use bedrock_db_bot::cycle::{rebuild, run_cycle};
use bedrock_db_bot::dirs::SystemBaseDirs;
use bedrock_db_bot::error::Result;
use bedrock_db_bot::logging;
use bedrock_db_bot::repository::GitRepository;
use bedrock_db_bot::schedule::run_schedule;
use bedrock_db_sync::client::SyncClient;
use bedrock_db_sync::cookie::FileCookieStore;
use bedrock_db_sync::transport::HttpTransport;
use clap::Parser;
use log::info;
use std::io::Write;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();
    logging::init(logging::level_for(cli.verbosity, cli.quiet));
    let mut stderr = std::io::stderr();
    let exit_code = exit_code_for_run_result(run(&cli), &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let dirs = SystemBaseDirs;
    let config = BotConfig::discover(cli.config.as_deref(), &dirs)?;
    let paths = config.resolve_paths(&dirs)?;

    match cli.command() {
        Command::Rebuild => {
            let repository = open_repository(&config, &paths)?;
            let report = rebuild(&repository, &config.repository, cli.dry_run)?;
            info!(
                "rebuild finished: {} updated, {} skipped",
                report.accepted.len(),
                report.skipped.len()
            );
            Ok(())
        }
        Command::Run => {
            run_polling(cli, &config, &paths);
            Ok(())
        }
    }
}

fn run_polling(cli: &Cli, config: &BotConfig, paths: &ResolvedPaths) {
    let transport = HttpTransport::new(config.service.timeout());
    let cookies = FileCookieStore::new(paths.cookie.clone());
    let client = SyncClient::new(&transport, &cookies, config.service.sync_settings());
    let cycles = cli.cycles.unwrap_or(config.schedule.cycles);
    let interval = cli
        .interval
        .map_or_else(|| config.schedule.interval(), Duration::from_secs);

    info!("starting {cycles} cycles");
    let summary = run_schedule(cycles, interval, std::thread::sleep, || {
        let repository = open_repository(config, paths)?;
        run_cycle(&client, &repository, &config.repository, cli.dry_run)
    });
    info!(
        "finished: {} published, {} unchanged, {} failed",
        summary.published, summary.unchanged, summary.failed
    );
}

fn open_repository(config: &BotConfig, paths: &ResolvedPaths) -> Result<GitRepository> {
    GitRepository::open(
        &paths.repository,
        config.repository.remote.as_deref(),
        &config.repository.branch,
        config.repository.token_file.as_deref(),
    )
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedrock_db_bot::error::BotError;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(BotError::DataDirUnavailable), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("could not determine a data directory"));
    }
}
