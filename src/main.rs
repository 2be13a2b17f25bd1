use anyhow::Result;
use clap::Parser;
use outbreak_brief::{cli, launch};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let (config, command) = args.into_config()?;

    let default_level = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = config.validate() {
        eprintln!("❌ {:#}", err);
        std::process::exit(2);
    }

    launch(&config, command).await
}
