use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};

use crate::normalize::{clean_meta_title, clean_title, collapse_newlines};
use crate::normalize::date::{find_display_date, parse_iso_date};

const TITLE_SEL: &str = ".LWPostsPageHeader-title";
const AUTHOR_SEL: &str = ".LWPostsPageHeader-authorInfo";
const DATE_SEL: &str = ".LWPostsPageHeader-date";
const CONTENT_CANDIDATES: [&str; 3] = [".PostsPage-postContent", ".ContentStyles-postBody", ".PostsPage-centralColumn"];

/// Tags never walked, with their whole subtree.
pub const HIDDEN_TAGS: &[&str] = &["script", "style", "iframe"];

/// Structural classes whose subtree is dropped before the body walk.
pub const DENY_CLASSES: &[&str] = &[
    "CommentsSection",
    "PostsVote",
    "PostsPageCommentThread",
    "ArticleNavigationLinks",
    "PostsPageHeaderTags",
];

/// Lowercase phrases marking comment/vote/share/navigation noise.
pub const DENY_PHRASES: &[&str] = &[
    "new comment",
    "mentioned in",
    "load more",
    "karma",
    "vote",
    "share",
    "find out when",
    "read the full post",
    "this is a linkpost",
];

const BLOCK_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "li"];

static AUTHORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"by\s+([\w\s,]+)").expect("static regex"));
static POST_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/posts/([^/]+)").expect("static regex"));

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub title: String,
    pub metadata_line: String,
    pub body_lines: Vec<String>,
}

impl ExtractedDocument {
    pub fn render(&self) -> String {
        let parts = [self.title.as_str(), self.metadata_line.as_str()]
            .into_iter()
            .chain(self.body_lines.iter().map(String::as_str))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        collapse_newlines(&parts.join("\n\n"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPostMeta {
    pub title: String,
    pub authors: Vec<String>,
    pub published_date: Option<String>,
    pub url: String,
}

/// Declarative subtree/phrase filter over the content area.
pub struct BlockFilter<'a> {
    pub hidden_tags: &'a [&'a str],
    pub deny_classes: &'a [&'a str],
    pub deny_phrases: &'a [&'a str],
}

impl Default for BlockFilter<'static> {
    fn default() -> Self {
        Self { hidden_tags: HIDDEN_TAGS, deny_classes: DENY_CLASSES, deny_phrases: DENY_PHRASES }
    }
}

impl BlockFilter<'_> {
    pub fn excludes(&self, el: &ElementRef) -> bool {
        let v = el.value();
        self.hidden_tags.contains(&v.name()) || v.classes().any(|c| self.deny_classes.contains(&c))
    }

    pub fn is_noise(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.deny_phrases.iter().any(|p| lower.contains(p))
    }

    // Text of `el`, skipping excluded descendants.
    fn visible_text(&self, el: ElementRef, out: &mut String) {
        for child in el.children() {
            match child.value() {
                Node::Text(t) => out.push_str(t),
                Node::Element(_) => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        if !self.excludes(&child_el) { self.visible_text(child_el, out); }
                    }
                }
                _ => {}
            }
        }
    }

    // Document-order walk collecting (tag, text) for every block element,
    // nested blocks included.
    fn collect_blocks(&self, el: ElementRef, out: &mut Vec<(String, String)>) {
        for child in el.children() {
            let Some(child_el) = ElementRef::wrap(child) else { continue };
            if self.excludes(&child_el) { continue; }
            let name = child_el.value().name();
            if BLOCK_TAGS.contains(&name) {
                let mut text = String::new();
                self.visible_text(child_el, &mut text);
                out.push((name.to_string(), text.trim().to_string()));
            }
            self.collect_blocks(child_el, out);
        }
    }

    pub fn body_lines(&self, content: ElementRef) -> Vec<String> {
        let mut blocks = Vec::new();
        self.collect_blocks(content, &mut blocks);

        let mut lines: Vec<String> = Vec::new();
        let mut last_text: Option<String> = None;
        for (tag, text) in blocks {
            if text.is_empty() || self.is_noise(&text) { continue; }
            if last_text.as_deref() == Some(text.as_str()) { continue; }

            let line = if tag == "li" { format!("• {text}") } else { text.clone() };
            if lines.last() == Some(&line) { continue; }

            if tag.starts_with('h') && !lines.is_empty() { lines.push(String::new()); }
            lines.push(line);
            last_text = Some(text);
        }
        lines
    }
}

fn first_text(doc: &Html, sel: &str) -> Option<String> {
    let sel = Selector::parse(sel).ok()?;
    let node = doc.select(&sel).next()?;
    Some(node.text().collect::<String>().trim().to_string())
}

fn content_area(doc: &Html) -> Option<ElementRef<'_>> {
    CONTENT_CANDIDATES.iter().find_map(|s| {
        let sel = Selector::parse(s).ok()?;
        doc.select(&sel).next()
    })
}

pub fn parse_authors(author_text: &str) -> Vec<String> {
    match AUTHORS.captures(author_text) {
        Some(caps) => caps[1].split(',').map(|n| n.trim().to_string()).collect(),
        None => Vec::new(),
    }
}

fn metadata_line(doc: &Html) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(author_text) = first_text(doc, AUTHOR_SEL) {
        if let Some(caps) = AUTHORS.captures(&author_text) {
            parts.push(format!("by {}", caps[1].trim()));
        }
    }
    if let Some(date_text) = first_text(doc, DATE_SEL) {
        if let Some(d) = find_display_date(&date_text) { parts.push(d.to_string()); }
    }
    parts.join(" | ")
}

pub fn extract_article(html: &str) -> ExtractedDocument {
    let doc = Html::parse_document(html);
    let filter = BlockFilter::default();
    ExtractedDocument {
        title: first_text(&doc, TITLE_SEL).map(|t| clean_title(&t)).unwrap_or_default(),
        metadata_line: metadata_line(&doc),
        body_lines: content_area(&doc).map(|c| filter.body_lines(c)).unwrap_or_default(),
    }
}

pub fn extract_meta(html: &str, url: &str) -> ForumPostMeta {
    let doc = Html::parse_document(html);
    ForumPostMeta {
        title: first_text(&doc, TITLE_SEL).map(|t| clean_meta_title(&t)).unwrap_or_default(),
        authors: first_text(&doc, AUTHOR_SEL).map(|t| parse_authors(&t)).unwrap_or_default(),
        published_date: first_text(&doc, DATE_SEL).and_then(|t| parse_iso_date(&t)),
        url: url.to_string(),
    }
}

pub fn post_id(url: &str) -> Option<&str> {
    POST_ID.captures(url).and_then(|c| c.get(1)).map(|m| m.as_str())
}
