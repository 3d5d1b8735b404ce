mod db;
mod import;
mod run;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    init_logging(args.iter().any(|a| a == "--verbose" || a == "-v"));

    if args.len() < 2 {
        run::print_usage();
        return Ok(());
    }
    run::as_cli(&args)
}

/// RUST_LOG wins, then `--verbose`, then warnings only. Logs go to stderr so
/// `--json` output on stdout stays machine-readable.
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "cashlens", "cashlens")
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

pub(crate) fn get_db_path() -> Result<std::path::PathBuf> {
    let proj_dirs = project_dirs()?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("budgets.db"))
}

/// `config.toml` in the platform config directory, whether or not it exists.
pub(crate) fn get_config_path() -> Result<std::path::PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}
