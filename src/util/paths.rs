use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::extractor::forum::post_id;
use super::time::now_stem;

pub const FORUM_EXTRACT_DIR: &str = "extract/alignment_forum";
pub const ARXIV_EXTRACT_DIR: &str = "extracted_papers";
pub const FORUM_META_FILE: &str = "metadata/alignment_forum.json";
pub const ARXIV_META_FILE: &str = "metadata/arxiv.json";
pub const YOUTUBE_META_FILE: &str = "metadata/youtube.json";
pub const ARXIV_BATCH_FILE: &str = "batch_results.json";
pub const FORUM_DEFAULT_URL_LIST: &str = "source_urls/alignment_forum.txt";

pub fn post_filename(url: &str) -> String {
    match post_id(url) {
        Some(id) => format!("post_{id}.txt"),
        None => format!("post_{}.txt", now_stem()),
    }
}

pub fn arxiv_filename(id: &str) -> String {
    format!("arxiv_{}.txt", id.replace('.', "_"))
}

pub fn write_text(path: &Path, content: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(path.to_path_buf())
}
