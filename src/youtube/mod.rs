use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::config::ScrapeConfig;
use crate::store::write_json_pretty;
use crate::telemetry::{self};
use crate::telemetry::ops::youtube::Phase as YoutubePhase;
use crate::{input, util::paths};

pub mod ytdlp;

/// scrape youtube: collect basic video metadata through yt-dlp
#[derive(Args)]
pub struct YoutubeCmd {
    #[command(flatten)]
    pub src: input::UrlArgs,
    /// Output JSON file (default: <output dir>/metadata/youtube.json)
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Delay between requests in seconds
    #[arg(long, default_value_t = 1.0)]
    pub delay: f64,
    /// yt-dlp executable to invoke
    #[arg(long, default_value = "yt-dlp")]
    pub ytdlp: String,
}

#[derive(Serialize, Default)]
struct YoutubeSummary {
    processed: usize,
    collected: usize,
    errors: usize,
    output: Option<String>,
}

pub async fn run(cfg: &ScrapeConfig, args: YoutubeCmd) -> Result<()> {
    let log = telemetry::youtube();
    let output = args.output.clone().unwrap_or_else(|| cfg.out_path(paths::YOUTUBE_META_FILE));
    let batch = args.src.file.is_some();
    let urls = args.src.urls()?;
    let _g = log.root_span_kv([
        ("urls", urls.len().to_string()),
        ("delay", args.delay.to_string()),
        ("output", output.display().to_string()),
    ]).entered();
    let t0 = Instant::now();
    let delay = Duration::try_from_secs_f64(args.delay.max(0.0)).context("invalid --delay")?;

    if batch { log.info(format!("Processing {} URLs...", urls.len())); }

    let mut summary = YoutubeSummary::default();
    let mut all_metadata: Vec<ytdlp::VideoMeta> = Vec::new();
    let total = urls.len();
    for (i, url) in urls.iter().enumerate() {
        let _item = log.span_kv(&YoutubePhase::Item, [("url", url.clone())]).entered();
        summary.processed += 1;
        if batch { log.info(format!("Processing URL {}/{}: {}", i + 1, total, url)); }

        let fetched = { let _s = log.span(&YoutubePhase::RunYtDlp).entered(); ytdlp::fetch_metadata(&args.ytdlp, url).await };
        match fetched {
            Ok(meta) => all_metadata.push(meta),
            Err(e) => {
                log.error_kv("Error extracting metadata", [("url", url.clone()), ("error", e.to_string())]);
                summary.errors += 1;
            }
        }

        if i + 1 < total {
            let _s = log.span(&YoutubePhase::Delay).entered();
            tokio::time::sleep(delay).await;
        }
    }

    summary.collected = all_metadata.len();
    if all_metadata.is_empty() {
        log.warn("No metadata was extracted");
    } else {
        let _s = log.span(&YoutubePhase::SaveList).entered();
        write_json_pretty(&output, &all_metadata).with_context(|| format!("saving metadata to {}", output.display()))?;
        log.info(format!("Metadata saved to {}", output.display()));
        log.info(format!("Successfully processed {} videos", all_metadata.len()));
        summary.output = Some(output.display().to_string());
    }

    log.totals(summary.processed, summary.collected, 0, summary.errors);
    if telemetry::config::json_mode() { log.result(&summary, t0.elapsed().as_millis())?; }
    Ok(())
}
