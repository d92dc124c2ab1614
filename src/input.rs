use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

/// Exactly one of `--url` or `--file`.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct UrlArgs {
    /// Single URL to process
    #[arg(long)]
    pub url: Option<String>,
    /// File with one URL per line
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl UrlArgs {
    pub fn urls(self) -> Result<Vec<String>> {
        resolve(self.url, self.file.as_deref())
    }
}

/// Non-empty, trimmed lines of a URL list.
pub fn parse_url_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

// A missing list is fatal for the whole run.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path).with_context(|| format!("reading url list {}", path.display()))?;
    Ok(parse_url_list(&contents))
}

/// Resolve `--url`/`--file` into the list of URLs to process.
pub fn resolve(url: Option<String>, file: Option<&Path>) -> Result<Vec<String>> {
    match (url, file) {
        (Some(u), _) => Ok(vec![u]),
        (None, Some(f)) => read_url_list(f),
        (None, None) => Ok(Vec::new()),
    }
}
