use std::process::ExitCode;

use clap::Parser;

use ruff_sync::commands::sync::{self, SyncStatus};
use ruff_sync::fetch::HttpFetcher;
use ruff_sync::{cli, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);
    let log = logging::Logger::new();

    let code = match sync::run(&args.sync, &HttpFetcher::new(), &log) {
        Ok(status) => {
            log.stage(match status {
                SyncStatus::Updated => "Done",
                SyncStatus::UpToDate => "Nothing to do",
                SyncStatus::DryRun => "Dry run complete",
            });
            ExitCode::SUCCESS
        }
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    };

    let warnings = log.warning_count();
    if warnings > 0 {
        log.info(&format!("{warnings} warning(s)"));
    }
    code
}
