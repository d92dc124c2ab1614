use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Result, bail};
use bytes::Bytes;
use clap::{Args, Subcommand};
use reqwest::Client;

use crate::config::ScrapeConfig;
use crate::extractor::{Source, arxiv as abs};
use crate::normalize::pdf::{ColumnPolicy, clean_text};
use crate::pdf::{self, Backend, DEFAULT_X_TOLERANCE, PageTextSource};
use crate::store::{JsonStore, LoadOutcome, write_json_pretty};
use crate::telemetry::{self};
use crate::telemetry::ops::arxiv::Phase as ArxivPhase;
use crate::{fetch, input, util::paths};

pub mod render;
pub mod types;

/// Exactly one of `--url`, `--file` or `--id`.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct PaperArgs {
    /// Abstract or PDF URL, or an `arxiv:<id>` reference
    #[arg(long)]
    pub url: Option<String>,
    /// File with one URL per line
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Bare arXiv id, e.g. 1706.03762
    #[arg(long)]
    pub id: Option<String>,
}

impl PaperArgs {
    fn batch(&self) -> bool { self.file.is_some() }

    fn urls(self) -> Result<Vec<String>> {
        match self.id {
            Some(id) => Ok(vec![abs::abs_url(&id)]),
            None => input::resolve(self.url, self.file.as_deref()),
        }
    }
}

/// scrape arxiv extract/meta
#[derive(Args)]
pub struct ArxivCmd {
    #[command(subcommand)]
    pub cmd: ArxivSub,
}

#[derive(Subcommand)]
pub enum ArxivSub {
    /// Write each paper (metadata, abstract, optional full text) as plain text
    Extract {
        #[command(flatten)]
        src: PaperArgs,
        /// Skip downloading and extracting the PDF
        #[arg(long, default_value_t = false)]
        no_full_text: bool,
        #[arg(long, value_enum, default_value_t = Backend::Pdftotext)]
        pdf_backend: Backend,
        /// Character pitch handed to the layout extractor
        #[arg(long, default_value_t = DEFAULT_X_TOLERANCE)]
        x_tolerance: f64,
        /// Leading spaces that mark a column continuation line
        #[arg(long, default_value_t = 4)]
        indent_width: usize,
    },
    /// Merge paper metadata into the JSON store
    Meta {
        #[command(flatten)]
        src: PaperArgs,
    },
}

struct PdfOptions {
    backend: Backend,
    x_tolerance: f64,
    policy: ColumnPolicy,
}

pub async fn run(cfg: &ScrapeConfig, args: ArxivCmd) -> Result<()> {
    let client = fetch::build_client(cfg)?;
    match args.cmd {
        ArxivSub::Extract { src, no_full_text, pdf_backend, x_tolerance, indent_width } => {
            let batch = src.batch();
            let urls = src.urls()?;
            let opts = (!no_full_text).then_some(PdfOptions {
                backend: pdf_backend,
                x_tolerance,
                policy: ColumnPolicy { indent_width },
            });
            extract_all(cfg, &client, &urls, opts.as_ref(), batch).await
        }
        ArxivSub::Meta { src } => {
            let urls = src.urls()?;
            meta_all(cfg, &client, &urls).await
        }
    }
}

// Validates the reference and pulls out the id; `None` means skip.
fn resolve_id(url: &str) -> Option<String> {
    let log = telemetry::arxiv();
    if !Source::Arxiv.accepts(url) {
        log.error(format!("Error: URL {url} is not from {}", Source::Arxiv.label()));
        return None;
    }
    let id = abs::extract_id(url);
    if id.is_none() { log.error(format!("Could not extract ArXiv ID from {url}")); }
    id
}

async fn fetch_record(client: &Client, id: &str) -> Result<abs::ArxivRecord> {
    let log = telemetry::arxiv();
    let _s = log.span_kv(&ArxivPhase::FetchAbs, [("id", id.to_string())]).entered();
    let html = fetch::fetch_page(client, &abs::abs_url(id)).await?;
    let record = abs::parse_record(id, &html);
    if record.title.is_empty() { bail!("no paper found for {id}"); }
    log.info(format!("Found paper: {}", record.title));
    Ok(record)
}

async fn extract_all(cfg: &ScrapeConfig, client: &Client, urls: &[String], pdf: Option<&PdfOptions>, batch: bool) -> Result<()> {
    let log = telemetry::arxiv();
    let _g = log.root_span_kv([
        ("mode", "extract".to_string()),
        ("urls", urls.len().to_string()),
        ("full_text", pdf.is_some().to_string()),
    ]).entered();
    let t0 = Instant::now();

    let mut summary = types::ExtractSummary::default();
    for url in urls {
        let _item = log.span_kv(&ArxivPhase::Item, [("url", url.clone())]).entered();
        summary.processed += 1;
        let Some(id) = resolve_id(url) else { summary.skipped += 1; continue };
        log.info(format!("Processing URL: {url}"));
        match extract_one(cfg, client, &id, pdf).await {
            Ok(Some(entry)) => {
                log.info_kv("💾 saved", [("path", entry.filepath.clone())]);
                summary.results.push(entry);
            }
            Ok(None) => {
                log.warn("No content extracted");
                summary.skipped += 1;
            }
            Err(e) => {
                log.error_kv("Error processing", [("url", url.clone()), ("error", format!("{e:#}"))]);
                summary.errors += 1;
            }
        }
    }

    if batch && !summary.results.is_empty() {
        let path = cfg.out_path(paths::ARXIV_BATCH_FILE);
        write_json_pretty(&path, &summary.results)?;
        log.info_kv("batch results written", [("path", path.display().to_string())]);
    }

    log.totals(summary.processed, summary.results.len(), summary.skipped, summary.errors);
    if telemetry::config::json_mode() { log.result(&summary, t0.elapsed().as_millis())?; }
    Ok(())
}

async fn extract_one(cfg: &ScrapeConfig, client: &Client, id: &str, pdf: Option<&PdfOptions>) -> Result<Option<types::BatchEntry>> {
    let log = telemetry::arxiv();
    let record = fetch_record(client, id).await?;

    let mut full_text = None;
    if let Some(opts) = pdf {
        log.info("Downloading PDF...");
        let bytes = {
            let _s = log.span_kv(&ArxivPhase::DownloadPdf, [("url", record.pdf_url.clone())]).entered();
            fetch::fetch_bytes(client, &record.pdf_url).await
        };
        match bytes {
            Ok(bytes) => {
                log.info("Extracting text from PDF...");
                full_text = pdf_text(bytes, opts.backend.source(opts.x_tolerance), opts.policy).await?;
            }
            Err(e) => log.error_kv("Error downloading PDF", [("error", format!("{e:#}"))]),
        }
    }

    let content = render::paper_text(&record, full_text.as_deref());
    if content.trim().is_empty() { return Ok(None); }

    let _s = log.span(&ArxivPhase::WriteText).entered();
    let path = cfg.out_path(paths::ARXIV_EXTRACT_DIR).join(paths::arxiv_filename(id));
    paths::write_text(&path, &content)?;
    Ok(Some(types::BatchEntry::new(&record, path.display().to_string(), full_text.is_some())))
}

// Extraction failures and blank documents both mean no full text.
async fn pdf_text(bytes: Bytes, source: Box<dyn PageTextSource + Send>, policy: ColumnPolicy) -> Result<Option<String>> {
    let log = telemetry::arxiv();
    let _s = log.span(&ArxivPhase::ExtractPdf).entered();
    let backend = source.name();
    let extracted = tokio::task::spawn_blocking(move || pdf::document_text(&*source, &bytes, policy)).await?;
    match extracted {
        Ok(text) if text.trim().is_empty() => Ok(None),
        Ok(text) => Ok(Some(clean_text(&text))),
        Err(e) => {
            log.error_kv("Error extracting text from PDF", [("backend", backend.to_string()), ("error", e.to_string())]);
            Ok(None)
        }
    }
}

async fn meta_all(cfg: &ScrapeConfig, client: &Client, urls: &[String]) -> Result<()> {
    let log = telemetry::arxiv();
    let _g = log.root_span_kv([("mode", "meta".to_string()), ("urls", urls.len().to_string())]).entered();
    let t0 = Instant::now();
    let store_path = cfg.out_path(paths::ARXIV_META_FILE);

    let mut summary = types::MetaSummary::default();
    for url in urls {
        let _item = log.span_kv(&ArxivPhase::Item, [("url", url.clone())]).entered();
        summary.processed += 1;
        let Some(id) = resolve_id(url) else { summary.skipped += 1; continue };
        log.info(format!("Processing URL: {url}"));

        // Any failure here aborts the whole run.
        let record = fetch_record(client, &id).await.inspect_err(|e| {
            log.error_kv("Error processing", [("url", url.clone()), ("error", format!("{e:#}"))]);
        })?;
        let paper = abs::ArxivPaper::from(&record);

        let _s = log.span(&ArxivPhase::SaveStore).entered();
        let (mut store, loaded) = JsonStore::<abs::ArxivPaper>::open(&store_path);
        match loaded {
            LoadOutcome::Corrupt(reason) => log.warn_kv("existing metadata unreadable; starting empty", [("path", store_path.display().to_string()), ("error", reason)]),
            LoadOutcome::Loaded(n) => log.info_kv("loaded existing metadata", [("entries", n.to_string())]),
            LoadOutcome::Missing => {}
        }
        if store.upsert(id.clone(), paper) { summary.inserted += 1; } else { summary.updated += 1; }
        store.save()?;
        summary.store_size = store.len();
        summary.ids.push(id);
        log.info(format!("Updated {} with paper data", paths::ARXIV_META_FILE));
    }

    log.totals(summary.processed, summary.inserted + summary.updated, summary.skipped, 0);
    if telemetry::config::json_mode() { log.result(&summary, t0.elapsed().as_millis())?; }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PdfError;

    struct Unreadable;

    impl PageTextSource for Unreadable {
        fn name(&self) -> &'static str { "unreadable" }
        fn pages(&self, _pdf: &[u8]) -> Result<Vec<String>, PdfError> {
            Err(PdfError::Load("xref table missing".into()))
        }
    }

    struct OnePage;

    impl PageTextSource for OnePage {
        fn name(&self) -> &'static str { "one_page" }
        fn pages(&self, _pdf: &[u8]) -> Result<Vec<String>, PdfError> {
            Ok(vec!["The model wins.".to_string()])
        }
    }

    fn record() -> abs::ArxivRecord {
        abs::ArxivRecord {
            arxiv_id: "2101.00001".into(),
            title: "A Paper".into(),
            abstract_text: "Short abstract.".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn failed_extraction_drops_full_text_section() {
        let text = pdf_text(Bytes::from_static(b"%PDF-1.5"), Box::new(Unreadable), ColumnPolicy::default()).await.unwrap();
        assert_eq!(text, None);
        let out = render::paper_text(&record(), text.as_deref());
        assert!(out.contains("## Abstract"));
        assert!(!out.contains("## Full Text"));
    }

    #[tokio::test]
    async fn extracted_pages_become_full_text() {
        let text = pdf_text(Bytes::from_static(b"%PDF-1.5"), Box::new(OnePage), ColumnPolicy::default()).await.unwrap();
        assert!(text.as_deref().is_some_and(|t| t.contains("The model wins.")));
        let out = render::paper_text(&record(), text.as_deref());
        assert!(out.contains("## Full Text"));
    }
}
