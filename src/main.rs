use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod arxiv;
mod config;
mod extractor;
mod fetch;
mod forum;
mod input;
mod normalize;
mod pdf;
mod store;
mod telemetry;
mod util;
mod youtube;

#[derive(Parser)]
#[command(name = "scrape", about = "Fetch forum posts, arXiv papers and video metadata into text/JSON")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Forum(forum::ForumCmd),
    Arxiv(arxiv::ArxivCmd),
    Youtube(youtube::YoutubeCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and SCRAPE_LOG_FORMAT
    telemetry::config::init_tracing();
    let cfg = config::ScrapeConfig::from_env();

    match cli.command {
        Commands::Forum(args) => forum::run(&cfg, args).await?,
        Commands::Arxiv(args) => arxiv::run(&cfg, args).await?,
        Commands::Youtube(args) => youtube::run(&cfg, args).await?,
    }

    Ok(())
}
