use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::normalize::date::{format_iso, parse_day_month_year};
use crate::normalize::squash_whitespace;

static ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"arxiv.org/abs/(\d+\.\d+)").expect("static regex"),
        Regex::new(r"arxiv.org/pdf/(\d+\.\d+)").expect("static regex"),
        Regex::new(r"arxiv:(\d+\.\d+)").expect("static regex"),
    ]
});
static VERSION_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[v\d+\]\s*[A-Za-z]{3},\s+(\d{1,2}\s+[A-Za-z]{3}\s+\d{4})").expect("static regex")
});
static CATEGORY_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([a-z\-]+(?:\.[A-Za-z\-]+)?)\)").expect("static regex")
});

pub fn abs_url(id: &str) -> String { format!("https://arxiv.org/abs/{id}") }

pub fn extract_id(url: &str) -> Option<String> {
    ID_PATTERNS.iter().find_map(|re| re.captures(url).map(|c| c[1].to_string()))
}

/// Everything scraped from an abstract page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArxivRecord {
    pub arxiv_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub abstract_text: String,
    pub published: Option<NaiveDate>,
    pub updated: Option<NaiveDate>,
    pub categories: Vec<String>,
    pub doi: Option<String>,
    pub journal_ref: Option<String>,
    pub pdf_url: String,
}

/// Metadata store value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArxivPaper {
    pub arxiv_id: String,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub published_date: Option<String>,
    pub updated_date: Option<String>,
    pub arxiv_url: String,
}

impl From<&ArxivRecord> for ArxivPaper {
    fn from(r: &ArxivRecord) -> Self {
        ArxivPaper {
            arxiv_id: r.arxiv_id.clone(),
            title: r.title.clone(),
            authors: r.authors.clone(),
            abstract_text: r.abstract_text.clone(),
            published_date: r.published.map(format_iso),
            updated_date: r.updated.map(format_iso),
            arxiv_url: abs_url(&r.arxiv_id),
        }
    }
}

pub fn parse_record(id: &str, html: &str) -> ArxivRecord {
    let doc = Html::parse_document(html);

    let title = extract_meta(&doc, "meta[name=citation_title]")
        .or_else(|| extract_text(&doc, "h1.title").map(|t| t.trim_start_matches("Title:").to_string()))
        .map(|t| squash_whitespace(&t))
        .unwrap_or_default();

    let authors = meta_all(&doc, "meta[name=citation_author]").iter().map(|a| flip_author(a)).collect();

    let versions = extract_text(&doc, ".submission-history").map(|t| version_dates(&t)).unwrap_or_default();
    let published = versions.first().copied().or_else(|| {
        extract_meta(&doc, "meta[name=citation_date]").and_then(|d| NaiveDate::parse_from_str(&d, "%Y/%m/%d").ok())
    });
    let updated = versions.last().copied().or(published);

    let categories = extract_text(&doc, "td.subjects").map(|t| category_codes(&t)).unwrap_or_default();

    ArxivRecord {
        arxiv_id: id.to_string(),
        title,
        authors,
        abstract_text: extract(html).unwrap_or_default(),
        published,
        updated,
        categories,
        doi: extract_meta(&doc, "meta[name=citation_doi]"),
        journal_ref: extract_text(&doc, "td.jref").map(|t| squash_whitespace(&t)).filter(|t| !t.is_empty()),
        pdf_url: extract_meta(&doc, "meta[name=citation_pdf_url]").unwrap_or_else(|| format!("https://arxiv.org/pdf/{id}")),
    }
}

// "Vaswani, Ashish" -> "Ashish Vaswani"
pub fn flip_author(name: &str) -> String {
    match name.split_once(',') {
        Some((last, first)) if !first.trim().is_empty() => format!("{} {}", first.trim(), last.trim()),
        _ => name.trim().to_string(),
    }
}

pub fn version_dates(history: &str) -> Vec<NaiveDate> {
    VERSION_ENTRY
        .captures_iter(history)
        .filter_map(|c| parse_day_month_year(&c[1]))
        .collect()
}

pub fn category_codes(subjects: &str) -> Vec<String> {
    CATEGORY_CODE.captures_iter(subjects).map(|c| c[1].to_string()).collect()
}

/// Abstract text, trying page metadata first and visible markup after.
pub fn extract(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);

    // 1) Preferred: meta[name="citation_abstract"][content]
    if let Some(s) = extract_meta(&doc, "meta[name=citation_abstract]") {
        let out = normalize_abstract(&s);
        if !out.is_empty() { return Some(out); }
    }

    // 2) Fallback: meta[property="og:description"][content]
    if let Some(s) = extract_meta(&doc, r#"meta[property="og:description"]"#) {
        let out = normalize_abstract(&s);
        if !out.is_empty() { return Some(out); }
    }

    // 3) Fallback: visible DOM blockquote.abstract, then .abstract-full / div.abstract
    for sel in ["blockquote.abstract", ".abstract-full, div.abstract"] {
        if let Some(s) = extract_text(&doc, sel) {
            let out = normalize_abstract(&s);
            if !out.is_empty() { return Some(out); }
        }
    }

    None
}

fn extract_meta(doc: &Html, sel_str: &str) -> Option<String> {
    let sel = Selector::parse(sel_str).ok()?;
    let node = doc.select(&sel).next()?;
    let content = node.value().attr("content")?.trim();
    if content.is_empty() { None } else { Some(content.to_string()) }
}

fn meta_all(doc: &Html, sel_str: &str) -> Vec<String> {
    let Ok(sel) = Selector::parse(sel_str) else { return Vec::new() };
    doc.select(&sel)
        .filter_map(|n| n.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

fn extract_text(doc: &Html, sel_str: &str) -> Option<String> {
    let sel = Selector::parse(sel_str).ok()?;
    let node = doc.select(&sel).next()?;
    let text = node.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() { return None; }
    Some(text.to_string())
}

fn normalize_abstract(s: &str) -> String {
    // Trim and strip leading descriptor if present
    let mut out = s.trim();
    for label in ["Abstract:", "Abstract."] {
        if let Some(rest) = out.strip_prefix(label) {
            out = rest.trim_start();
            break;
        }
    }
    squash_whitespace(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABS_PAGE: &str = r#"
    <html><head>
      <meta name="citation_title" content="Attention Is   All You Need" />
      <meta name="citation_author" content="Vaswani, Ashish" />
      <meta name="citation_author" content="Shazeer, Noam" />
      <meta name="citation_date" content="2017/06/12" />
      <meta name="citation_pdf_url" content="https://arxiv.org/pdf/1706.03762" />
      <meta name="citation_abstract" content="The dominant sequence
        transduction models are based on recurrent networks." />
    </head><body>
      <table><tr><td class="tablecell subjects"><span class="primary-subject">Computation and Language (cs.CL)</span>; Machine Learning (cs.LG)</td></tr></table>
      <div class="submission-history">
        <h2>Submission history</h2> From: Someone<br/>
        <strong><a href="/abs/1706.03762v1">[v1]</a></strong> Mon, 12 Jun 2017 17:57:34 UTC (1,102 KB)<br/>
        <strong><a href="/abs/1706.03762v7">[v7]</a></strong> Wed, 2 Aug 2023 00:41:18 UTC (1,124 KB)<br/>
      </div>
    </body></html>
    "#;

    #[test]
    fn id_from_url_forms() {
        assert_eq!(extract_id("https://arxiv.org/abs/1706.03762").as_deref(), Some("1706.03762"));
        assert_eq!(extract_id("https://arxiv.org/pdf/2401.00001v2").as_deref(), Some("2401.00001"));
        assert_eq!(extract_id("arxiv:2310.12345").as_deref(), Some("2310.12345"));
        assert_eq!(extract_id("https://example.com/abs/1234.5678"), None);
    }

    #[test]
    fn parses_abstract_page() {
        let rec = parse_record("1706.03762", ABS_PAGE);
        assert_eq!(rec.title, "Attention Is All You Need");
        assert_eq!(rec.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(rec.abstract_text, "The dominant sequence transduction models are based on recurrent networks.");
        assert_eq!(rec.published, NaiveDate::from_ymd_opt(2017, 6, 12));
        assert_eq!(rec.updated, NaiveDate::from_ymd_opt(2023, 8, 2));
        assert_eq!(rec.categories, vec!["cs.CL", "cs.LG"]);
        assert_eq!(rec.pdf_url, "https://arxiv.org/pdf/1706.03762");
        assert_eq!(rec.doi, None);
    }

    #[test]
    fn paper_json_shape() {
        let paper = ArxivPaper::from(&parse_record("1706.03762", ABS_PAGE));
        let v = serde_json::to_value(&paper).unwrap();
        assert_eq!(v["arxiv_id"], "1706.03762");
        assert_eq!(v["published_date"], "2017-06-12");
        assert_eq!(v["updated_date"], "2023-08-02");
        assert_eq!(v["arxiv_url"], "https://arxiv.org/abs/1706.03762");
        assert!(v["abstract"].as_str().unwrap().starts_with("The dominant"));
    }

    #[test]
    fn citation_date_fallback() {
        let html = r#"<html><head><meta name="citation_date" content="2020/01/05" /></head></html>"#;
        let rec = parse_record("2001.00001", html);
        assert_eq!(rec.published, NaiveDate::from_ymd_opt(2020, 1, 5));
        assert_eq!(rec.updated, rec.published);
        assert_eq!(rec.pdf_url, "https://arxiv.org/pdf/2001.00001");
    }

    #[test]
    fn author_flip() {
        assert_eq!(flip_author("Doe, Jane"), "Jane Doe");
        assert_eq!(flip_author("Plato"), "Plato");
        assert_eq!(flip_author("Trailing,"), "Trailing,");
    }

    #[test]
    fn meta_citation_abstract() {
        let html = r#"
        <html><head>
        <meta name="citation_abstract" content="This is the full abstract with details." />
        </head><body></body></html>
        "#;
        let got = extract(html).unwrap();
        assert_eq!(got, "This is the full abstract with details.");
    }

    #[test]
    fn meta_og_description() {
        let html = r#"
        <html><head>
        <meta property="og:description" content="OG description abstract." />
        </head><body></body></html>
        "#;
        let got = extract(html).unwrap();
        assert_eq!(got, "OG description abstract.");
    }

    #[test]
    fn blockquote_abstract_strips_label() {
        let html = r#"
        <html><body>
          <blockquote class="abstract">
            <span class="descriptor">Abstract:</span>
            This is the abstract text across
            multiple   spaces and
            lines.
          </blockquote>
        </body></html>
        "#;
        let got = extract(html).unwrap();
        assert_eq!(got, "This is the abstract text across multiple spaces and lines.");
    }

    #[test]
    fn abstract_full_variant() {
        let html = r#"
        <html><body>
          <div class="abstract-full">
            <span class="descriptor">Abstract.</span>  Full variant here.
          </div>
        </body></html>
        "#;
        let got = extract(html).unwrap();
        assert_eq!(got, "Full variant here.");
    }

    #[test]
    fn none_when_missing() {
        let html = r#"<html><head><title>No abstract</title></head><body><p>Nothing</p></body></html>"#;
        assert!(extract(html).is_none());
    }
}
