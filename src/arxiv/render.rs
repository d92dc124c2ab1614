use crate::extractor::arxiv::ArxivRecord;
use crate::normalize::squash_whitespace;
use crate::util::time::long_date;

const MAX_LISTED_AUTHORS: usize = 5;

pub fn format_authors(authors: &[String]) -> String {
    if authors.len() > MAX_LISTED_AUTHORS {
        format!("{} et al.", authors[..MAX_LISTED_AUTHORS].join(", "))
    } else {
        authors.join(", ")
    }
}

/// Plain-text dump: title, metadata block, categories, abstract, full text.
pub fn paper_text(rec: &ArxivRecord, full_text: Option<&str>) -> String {
    let mut sections: Vec<String> = Vec::new();
    sections.push(format!("# {}\n", squash_whitespace(&rec.title)));

    let mut meta = vec![format!("Authors: {}", format_authors(&rec.authors))];
    if let Some(d) = rec.published { meta.push(format!("Published: {}", long_date(d))); }
    if let Some(d) = rec.updated { meta.push(format!("Last Updated: {}", long_date(d))); }
    if let Some(doi) = &rec.doi { meta.push(format!("DOI: {doi}")); }
    if let Some(jref) = &rec.journal_ref { meta.push(format!("Journal Reference: {jref}")); }
    sections.push(meta.join("\n"));

    if !rec.categories.is_empty() {
        sections.push(format!("Categories: {}", rec.categories.join(", ")));
    }

    sections.push("\n## Abstract\n".to_string());
    sections.push(squash_whitespace(&rec.abstract_text));

    if let Some(text) = full_text.filter(|t| !t.is_empty()) {
        sections.push("\n## Full Text\n".to_string());
        sections.push(text.to_string());
    }

    sections.join("\n\n")
}
