use clap::{Parser, Subcommand};
use eyre::Context;
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use youtube_data::{Config, ResourceKind, YouTubeClient};

/// Query the YouTube Data API from the command line.
///
/// Credentials and cache settings are read from `YOUTUBE_*` environment variables, optionally
/// layered over a JSON config file.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// JSON config file; environment variables override its fields.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch a video by ID, URL or search terms.
    Video { input: String },
    /// Fetch a channel by ID, URL, handle or search terms.
    Channel { input: String },
    /// Fetch a playlist by ID, URL or search terms.
    Playlist { input: String },
    /// List the videos in a playlist.
    PlaylistItems {
        input: String,
        /// At most this many items; 0 fetches every page.
        #[arg(long, default_value_t = 0)]
        max: i64,
    },
    /// List the comment threads on a video.
    Comments {
        input: String,
        #[arg(long, default_value_t = 20)]
        max: i64,
    },
    /// Search for videos, channels or playlists.
    Search {
        /// video, channel or playlist.
        kind: ResourceKind,
        term: String,
        /// Between 1 and 50 hits [default: 10].
        #[arg(long)]
        max: Option<u32>,
    },
    /// Print the ID that INPUT resolves to.
    Resolve {
        /// video, channel, playlist, comment, subscription or category.
        kind: ResourceKind,
        input: String,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path).await?.merge_env()?,
        None => Config::from_env()?,
    };
    if config.api_key.is_none() && config.access_token.is_none() {
        tracing::warn!("neither YOUTUBE_API_KEY nor YOUTUBE_ACCESS_TOKEN is set");
    }
    let yt = YouTubeClient::from_config(&config).context("set up YouTube client")?;

    match args.command {
        Command::Video { input } => print(&yt.get_video(&input).await?),
        Command::Channel { input } => print(&yt.get_channel(&input).await?),
        Command::Playlist { input } => print(&yt.get_playlist(&input).await?),
        Command::PlaylistItems { input, max } => {
            print(&yt.get_playlist_items(&input, max).await?)
        }
        Command::Comments { input, max } => print(&yt.get_video_comments(&input, max).await?),
        Command::Search { kind, term, max } => print(&yt.search(kind, &term, max).await?),
        Command::Resolve { kind, input } => print(&yt.resolve_id(&input, kind).await?),
    }
}

fn print(value: &impl Serialize) -> eyre::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output as JSON")?;
    println!("{json}");
    Ok(())
}
