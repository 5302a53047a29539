use clap::Parser;
use h2h_tools::cli::{Cli, Command};
use h2h_tools::commands;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Update(args) => commands::update::run(args).await,
        Command::MigrateRounds(args) => commands::migrate::run(args),
        Command::Churn(args) => commands::churn::run(args).await,
    }
}
