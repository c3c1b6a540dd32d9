mod apply;
mod cli;

use crate::cli::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_subscriber(&cli.log_filter)?;
    match cli.command {
        Commands::Apply(args) => apply::apply(args).await?,
        Commands::Diff(args) => apply::diff(args).await?,
    };
    Ok(())
}

fn setup_subscriber(filter: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(filter)?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}
