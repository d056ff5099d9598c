//! 3DPornDude scraper CLI
//!
//! Queries the site and prints video metadata as text or JSON.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use porndude::{
    Catalog, VideoInfo,
    error::Result,
    models::Config,
};

/// Number of tags shown in a text summary.
const SUMMARY_TAGS: usize = 5;

/// Number of entries shown in a text listing.
const LIST_LIMIT: usize = 10;

/// porndude - 3DPornDude video metadata scraper
#[derive(Parser, Debug)]
#[command(name = "porndude", version, about = "3DPornDude video metadata scraper")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Proxy URL, overrides the config file
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Request timeout in seconds, overrides the config file
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show details of one video
    Video {
        /// Video id or full video URL
        id: String,
    },

    /// List videos under a tag
    Tag {
        tag: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Search videos
    Search {
        query: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// List the newest videos
    Latest {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// List the most viewed videos
    Popular {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Pick a random video
    Random,

    /// List well-known tags
    Tags,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Plain text summary of one video.
fn format_video(info: &VideoInfo) -> String {
    let mut lines = vec![info.display_title().to_string()];

    if !info.duration.is_empty() {
        lines.push(format!("Duration: {}", info.duration));
    }
    if !info.views.is_empty() {
        lines.push(format!("Views: {}", info.views));
    }
    if info.has_rating() {
        lines.push(format!("Rating: {}", info.rating));
    } else if info.likes > 0 || info.dislikes > 0 {
        lines.push(format!("Likes: {}", info.likes));
    }
    if !info.uploader.is_empty() {
        lines.push(format!("Uploader: {}", info.uploader));
    }
    if !info.upload_date.is_empty() {
        lines.push(format!("Date: {}", info.upload_date));
    }
    if !info.tags.is_empty() {
        let mut tags = info
            .tags
            .iter()
            .take(SUMMARY_TAGS)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if info.tags.len() > SUMMARY_TAGS {
            tags.push_str(&format!(" (+{})", info.tags.len() - SUMMARY_TAGS));
        }
        lines.push(format!("Tags: {tags}"));
    }
    lines.push(info.url.clone());

    lines.join("\n")
}

/// Plain text listing.
fn format_list(videos: &[VideoInfo], title: &str) -> String {
    if videos.is_empty() {
        return format!("{title}: no videos found");
    }

    let mut lines = vec![format!("{title} ({} results):", videos.len())];
    for (i, video) in videos.iter().take(LIST_LIMIT).enumerate() {
        let duration = if video.duration.is_empty() {
            String::new()
        } else {
            format!(" [{}]", video.duration)
        };
        lines.push(format!("{}. {}{}", i + 1, video.display_title(), duration));
        lines.push(format!("   ID: {}", video.video_id));
    }
    if videos.len() > LIST_LIMIT {
        lines.push(format!("... {} more", videos.len() - LIST_LIMIT));
    }

    lines.join("\n")
}

fn print_video(info: &VideoInfo, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(info)?);
    } else {
        println!("{}", format_video(info));
    }
    Ok(())
}

fn print_list(videos: &[VideoInfo], title: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(videos)?);
    } else {
        println!("{}", format_list(videos, title));
    }
    Ok(())
}

/// Check the configuration without touching the network.
fn run_validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");
    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }
    log::info!(
        "✓ Config OK ({} tags, root {})",
        config.tags.len(),
        config.client.root()
    );
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config);
    init_logging(cli.verbose, &config.logging.level);

    if let Some(proxy) = cli.proxy {
        config.client.proxy = Some(proxy);
    }
    if let Some(timeout) = cli.timeout {
        config.client.timeout_secs = timeout;
    }

    if let Command::Validate = cli.command {
        return run_validate(&config);
    }

    let catalog = Catalog::new(&config)?;
    log::debug!("Using site root {}", catalog.root_url());

    match cli.command {
        Command::Video { id } => {
            let info = catalog.video(&id)?.into_info().await?;
            print_video(&info, cli.json)?;
        }

        Command::Tag { tag, page } => {
            let videos = catalog.by_tag(&tag, page).await?;
            print_list(&videos, &format!("Tag: {tag} (page {page})"), cli.json)?;
        }

        Command::Search { query, page } => {
            let videos = catalog.search(&query, page).await?;
            print_list(&videos, &format!("Search: {query} (page {page})"), cli.json)?;
        }

        Command::Latest { page } => {
            let videos = catalog.latest(page).await?;
            print_list(&videos, &format!("Latest (page {page})"), cli.json)?;
        }

        Command::Popular { page } => {
            let videos = catalog.popular(page).await?;
            print_list(&videos, &format!("Popular (page {page})"), cli.json)?;
        }

        Command::Random => {
            let info = catalog.random_video().await?;
            print_video(&info, cli.json)?;
        }

        Command::Tags => {
            let tags = catalog.available_tags();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tags)?);
            } else {
                for tag in tags {
                    println!("- {tag}");
                }
            }
        }

        // Handled before the client is built.
        Command::Validate => {}
    }

    Ok(())
}
