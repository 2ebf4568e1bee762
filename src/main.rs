mod backup;
mod config;
mod display;
mod ledger;
mod models;
mod run;
mod summary;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (file_flag, args) = config::split_file_flag(&args)?;
    let path = config::ledger_path(file_flag.as_deref())?;

    run::as_cli(&args, &path)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
