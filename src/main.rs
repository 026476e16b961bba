//! Code push config — resolve and report the server configuration.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Snapshot the environment, overlaying `--env-file` if given
//!   3. Resolve config
//!   4. Init logger from the resolved log settings
//!   5. Report the active storage backend
//!   6. Optionally print the redacted config as JSON

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use codepush_config::config::{self, RawEnv, SharedConfig};
use codepush_config::error::AppError;
use codepush_config::logger;

struct CliArgs {
    env_file: Option<PathBuf>,
    print: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let mut raw = RawEnv::from_process();
    if let Some(path) = &args.env_file {
        raw = raw.with_env_file(path)?;
    }

    // An explicit LOG_LEVEL beats RUST_LOG; otherwise RUST_LOG beats the default.
    let prefer_level = raw.get("LOG_LEVEL").is_some();
    let config: SharedConfig = Arc::new(config::load_from(&raw));

    logger::init(&config.log, prefer_level)?;

    info!(
        environment = %config.environment,
        storage_type = %config.common.storage_type,
        "use config"
    );

    if config.jwt.uses_placeholder_secret() {
        warn!("TOKEN_SECRET is not set, tokens are signed with the placeholder secret");
    }

    report_storage(&config);

    if args.print {
        let json = serde_json::to_string_pretty(config.as_ref())
            .map_err(|e| AppError::Config(format!("cannot serialize config: {e}")))?;
        println!("{json}");
    }

    Ok(())
}

fn report_storage(config: &SharedConfig) {
    let active = match config.active_storage() {
        Ok(active) => active,
        Err(e) => {
            warn!(error = %e, "storage backend cannot be dispatched");
            return;
        }
    };

    match active.require_download_url() {
        Ok(url) => info!(backend = %active.kind(), download_url = %url, "storage backend selected"),
        Err(e) => warn!(backend = %active.kind(), error = %e, "storage backend selected"),
    }
}

fn parse_cli_args() -> CliArgs {
    let mut env_file = None;
    let mut print = false;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: codepush-config [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -e, --env-file <PATH>      Extra dotenv file (process env wins)");
                println!("      --print                Print the resolved config as JSON, secrets redacted");
                std::process::exit(0);
            }
            "-e" | "--env-file" => {
                if let Some(path) = iter.next() {
                    env_file = Some(PathBuf::from(path));
                } else {
                    eprintln!("error: -e/--env-file requires a path argument");
                    std::process::exit(1);
                }
            }
            "--print" => print = true,
            _ => {}
        }
    }

    CliArgs { env_file, print }
}
