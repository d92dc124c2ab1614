use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Subcommand};
use reqwest::Client;

use crate::config::ScrapeConfig;
use crate::extractor::{self, Source, forum};
use crate::store::{JsonStore, LoadOutcome};
use crate::telemetry::{self};
use crate::telemetry::ops::forum::Phase as ForumPhase;
use crate::{fetch, input, util::paths};

pub mod types;

/// scrape forum extract/meta
#[derive(Args)]
pub struct ForumCmd {
    #[command(subcommand)]
    pub cmd: ForumSub,
}

#[derive(Subcommand)]
pub enum ForumSub {
    /// Write each post as a plain-text dump
    Extract {
        #[command(flatten)]
        src: input::UrlArgs,
    },
    /// Merge post metadata into the JSON store
    Meta {
        #[arg(long, conflicts_with = "file")]
        url: Option<String>,
        #[arg(long, default_value = paths::FORUM_DEFAULT_URL_LIST)]
        file: PathBuf,
    },
}

pub async fn run(cfg: &ScrapeConfig, args: ForumCmd) -> Result<()> {
    let client = fetch::build_client(cfg)?;
    match args.cmd {
        ForumSub::Extract { src } => {
            let urls = src.urls()?;
            extract_all(cfg, &client, &urls).await
        }
        ForumSub::Meta { url, file } => {
            let urls = input::resolve(url, Some(file.as_path()))?;
            meta_all(cfg, &client, &urls).await
        }
    }
}

async fn extract_all(cfg: &ScrapeConfig, client: &Client, urls: &[String]) -> Result<()> {
    let log = telemetry::forum();
    let _g = log.root_span_kv([("mode", "extract".to_string()), ("urls", urls.len().to_string())]).entered();
    let t0 = Instant::now();

    let mut summary = types::ExtractSummary::default();
    for url in urls {
        let _item = log.span_kv(&ForumPhase::Item, [("url", url.clone()), ("host", extractor::host_of(url))]).entered();
        summary.processed += 1;
        if !Source::Forum.accepts(url) {
            log.error(format!("Error: URL {url} is not from {}", Source::Forum.label()));
            summary.skipped += 1;
            continue;
        }
        match extract_one(cfg, client, url).await {
            Ok(Some(path)) => {
                log.info_kv("💾 saved", [("path", path.display().to_string())]);
                summary.written.push(path.display().to_string());
            }
            Ok(None) => {
                log.warn_kv("No content extracted", [("url", url.clone())]);
                summary.skipped += 1;
            }
            Err(e) => {
                log.error_kv("Error processing", [("url", url.clone()), ("error", format!("{e:#}"))]);
                summary.errors += 1;
            }
        }
    }

    log.totals(summary.processed, summary.written.len(), summary.skipped, summary.errors);
    if telemetry::config::json_mode() { log.result(&summary, t0.elapsed().as_millis())?; }
    Ok(())
}

async fn extract_one(cfg: &ScrapeConfig, client: &Client, url: &str) -> Result<Option<PathBuf>> {
    let log = telemetry::forum();
    let html = { let _s = log.span(&ForumPhase::Fetch).entered(); fetch::fetch_page(client, url).await? };
    let content = { let _s = log.span(&ForumPhase::Extract).entered(); forum::extract_article(&html).render() };
    if content.trim().is_empty() { return Ok(None); }

    let _s = log.span(&ForumPhase::WriteText).entered();
    let path = cfg.out_path(paths::FORUM_EXTRACT_DIR).join(paths::post_filename(url));
    paths::write_text(&path, &content).map(Some)
}

async fn meta_all(cfg: &ScrapeConfig, client: &Client, urls: &[String]) -> Result<()> {
    let log = telemetry::forum();
    let _g = log.root_span_kv([("mode", "meta".to_string()), ("urls", urls.len().to_string())]).entered();
    let t0 = Instant::now();

    let (mut store, loaded) = JsonStore::<forum::ForumPostMeta>::open(cfg.out_path(paths::FORUM_META_FILE));
    match loaded {
        LoadOutcome::Loaded(n) => log.info_kv("loaded existing metadata", [("entries", n.to_string())]),
        LoadOutcome::Corrupt(reason) => log.warn_kv("existing metadata unreadable; starting empty", [("path", store.path().display().to_string()), ("error", reason)]),
        LoadOutcome::Missing => {}
    }

    let mut summary = types::MetaSummary::default();
    for url in urls {
        let _item = log.span_kv(&ForumPhase::Item, [("url", url.clone())]).entered();
        summary.processed += 1;
        if !Source::Forum.accepts(url) {
            log.error(format!("Error: URL {url} is not from {}", Source::Forum.label()));
            summary.skipped += 1;
            continue;
        }
        log.info_kv("Processing URL", [("url", url.clone())]);
        let (post_id, meta) = match meta_one(client, url).await {
            Ok(pair) => pair,
            Err(e) => {
                log.error_kv("Error processing", [("url", url.clone()), ("error", format!("{e:#}"))]);
                summary.errors += 1;
                continue;
            }
        };
        if store.upsert(post_id.clone(), meta) { summary.inserted += 1; } else { summary.updated += 1; }
        summary.keys.push(post_id);

        let _s = log.span(&ForumPhase::SaveStore).entered();
        store.save()?;
    }

    summary.store_size = store.len();
    log.totals(summary.processed, summary.inserted + summary.updated, summary.skipped, summary.errors);
    if telemetry::config::json_mode() { log.result(&summary, t0.elapsed().as_millis())?; }
    Ok(())
}

async fn meta_one(client: &Client, url: &str) -> Result<(String, forum::ForumPostMeta)> {
    let log = telemetry::forum();
    let html = { let _s = log.span(&ForumPhase::Fetch).entered(); fetch::fetch_page(client, url).await? };
    let post_id = forum::post_id(url).ok_or_else(|| anyhow!("no post id in url")).context("resolving post id")?;
    let _s = log.span(&ForumPhase::Extract).entered();
    Ok((post_id.to_string(), forum::extract_meta(&html, url)))
}
