use std::sync::Arc;

use catalog_http_client::CatalogClient;
use clap::Parser;
use eyre::WrapErr;
use models::config::ProviderConfig;
use models::TargetSong;
use stream_matcher::{MatchConfig, StreamSelector};

#[derive(Parser, Debug)]
#[command(name = "stream-lookup")]
#[command(about = "Find the best audio stream for a song via the catalog gateway", long_about = None)]
struct Args {
    #[arg(long)]
    title: String,

    #[arg(long)]
    artist: String,

    #[arg(long)]
    album: Option<String>,

    #[arg(long)]
    album_artist: Option<String>,

    /// Song length in milliseconds; 0 when unknown
    #[arg(long, default_value_t = 0)]
    duration_ms: u64,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stream_matcher=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let provider_config =
        ProviderConfig::from_env().wrap_err("failed to load provider config from env vars")?;
    let match_config =
        MatchConfig::from_env().wrap_err("failed to load match config from env vars")?;
    tracing::debug!("Provider config: {:?}", provider_config);

    let client = Arc::new(CatalogClient::new(&provider_config)?);
    let selector = StreamSelector::new(client.clone(), client, match_config);

    let song = TargetSong {
        title: args.title,
        album: args.album,
        artist: args.artist,
        album_artist: args.album_artist,
        duration_ms: args.duration_ms,
    };

    let selection = selector.select_stream(&song).await;
    let json = serde_json::to_string_pretty(&selection).wrap_err("serialize selection")?;
    println!("{json}");

    Ok(())
}
