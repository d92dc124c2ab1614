use serde::Serialize;

use crate::extractor::arxiv::ArxivRecord;

/// One line of the batch results file.
#[derive(Serialize, Debug, Clone)]
pub struct BatchEntry {
    pub arxiv_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub categories: Vec<String>,
    pub pdf_url: String,
    pub filepath: String,
    pub has_full_text: bool,
}

impl BatchEntry {
    pub fn new(rec: &ArxivRecord, filepath: String, has_full_text: bool) -> Self {
        BatchEntry {
            arxiv_id: rec.arxiv_id.clone(),
            title: rec.title.clone(),
            authors: rec.authors.clone(),
            published: rec.published.map(|d| d.format("%Y-%m-%d").to_string()),
            abstract_text: rec.abstract_text.clone(),
            categories: rec.categories.clone(),
            pdf_url: rec.pdf_url.clone(),
            filepath,
            has_full_text,
        }
    }
}

#[derive(Serialize, Default)]
pub struct ExtractSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub results: Vec<BatchEntry>,
}

#[derive(Serialize, Default)]
pub struct MetaSummary {
    pub processed: usize,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub ids: Vec<String>,
    pub store_size: usize,
}
