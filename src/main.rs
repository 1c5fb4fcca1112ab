use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use puk360_events::cli::{self, Cli};
use puk360_events::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "puk360_events=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    tracing::debug!("Using events API at {}", config.api.base_url);

    cli::run(args, &config).await?;
    Ok(())
}
