//! Page-text extraction backends for downloaded PDFs.
//!
//! Both backends hand back one string per non-empty page, in page order. Any
//! page failure fails the whole document; callers decide how to degrade.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::Command;

use clap::ValueEnum;
use uuid::Uuid;

use crate::normalize::pdf::{normalize_pages, ColumnPolicy};

pub const DEFAULT_X_TOLERANCE: f64 = 3.0;

#[derive(Debug)]
pub enum PdfError {
    Load(String),
    Extract { page: u32, reason: String },
    ToolMissing(&'static str),
    ToolFailed { tool: &'static str, stderr: String },
    Io(io::Error),
}

impl std::fmt::Display for PdfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PdfError::Load(reason) => write!(f, "failed to load pdf: {reason}"),
            PdfError::Extract { page, reason } => write!(f, "failed to extract page {page}: {reason}"),
            PdfError::ToolMissing(tool) => write!(f, "{tool} is not installed"),
            PdfError::ToolFailed { tool, stderr } => write!(f, "{tool} failed: {}", stderr.trim()),
            PdfError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<io::Error> for PdfError {
    fn from(e: io::Error) -> Self { PdfError::Io(e) }
}

pub trait PageTextSource {
    fn name(&self) -> &'static str;
    fn pages(&self, pdf: &[u8]) -> Result<Vec<String>, PdfError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// poppler's pdftotext in layout mode
    Pdftotext,
    /// in-process lopdf text extraction
    Lopdf,
}

impl Backend {
    pub fn source(self, x_tolerance: f64) -> Box<dyn PageTextSource + Send> {
        match self {
            Backend::Pdftotext => Box::new(Pdftotext { fixed_pitch: x_tolerance }),
            Backend::Lopdf => Box::new(Lopdf),
        }
    }
}

/// Layout-preserving extraction; `fixed_pitch` is the character spacing
/// pdftotext assumes when placing glyphs on a line.
pub struct Pdftotext {
    pub fixed_pitch: f64,
}

struct TempPdf(PathBuf);

impl TempPdf {
    fn write(bytes: &[u8]) -> io::Result<Self> {
        let path = std::env::temp_dir().join(format!("scrape_{}.pdf", Uuid::new_v4()));
        fs::write(&path, bytes)?;
        Ok(TempPdf(path))
    }
}

impl Drop for TempPdf {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

impl PageTextSource for Pdftotext {
    fn name(&self) -> &'static str { "pdftotext" }

    fn pages(&self, pdf: &[u8]) -> Result<Vec<String>, PdfError> {
        let input = TempPdf::write(pdf)?;
        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg("-fixed")
            .arg(self.fixed_pitch.to_string())
            .arg("-enc")
            .arg("UTF-8")
            .arg(&input.0)
            .arg("-")
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => PdfError::ToolMissing("pdftotext"),
                _ => PdfError::Io(e),
            })?;

        if !output.status.success() {
            return Err(PdfError::ToolFailed {
                tool: "pdftotext",
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(split_form_feeds(&String::from_utf8_lossy(&output.stdout)))
    }
}

// pdftotext terminates every page with a form feed.
pub fn split_form_feeds(text: &str) -> Vec<String> {
    text.split('\u{c}')
        .filter(|p| !p.trim().is_empty())
        .map(str::to_string)
        .collect()
}

pub struct Lopdf;

impl PageTextSource for Lopdf {
    fn name(&self) -> &'static str { "lopdf" }

    fn pages(&self, pdf: &[u8]) -> Result<Vec<String>, PdfError> {
        let document = lopdf::Document::load_mem(pdf).map_err(|e| PdfError::Load(e.to_string()))?;
        let mut out = Vec::new();
        for page in document.get_pages().keys().copied() {
            let text = document
                .extract_text(&[page])
                .map_err(|e| PdfError::Extract { page, reason: e.to_string() })?;
            if !text.trim().is_empty() { out.push(text); }
        }
        Ok(out)
    }
}

/// Extract every page and run the layout/section cleanup over the result.
pub fn document_text(source: &dyn PageTextSource, pdf: &[u8], policy: ColumnPolicy) -> Result<String, PdfError> {
    let pages = source.pages(pdf)?;
    Ok(normalize_pages(&pages, policy))
}
