use aggregator_core::config::Config;
use aggregator_core::snapshot::load_snapshot;
use aggregator_core::{SystemClock, render_feed};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aggregator_core=debug,aggregator=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(sort = %config.default_sort, "Configuration loaded successfully");

    let snapshot = load_snapshot(&config.snapshot_path).await?;

    let feed = render_feed(&snapshot, &config, &SystemClock)?;
    tracing::info!(posts = feed.posts.len(), "Feed rendered");

    println!("{}", serde_json::to_string_pretty(&feed)?);

    Ok(())
}
