use std::sync::LazyLock;

use regex::Regex;

use super::rules::{collapse_newlines, fix_spacing};

static HYPHEN_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)-\n(\w+)").expect("static regex"));
static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(abstract|introduction|background|methodology|methods|results|discussion|conclusion|references|acknowledgments)")
        .expect("static regex")
});
static FIGURE_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(Figure|Fig\.|Table)\s+\d+").expect("static regex"));

// Heuristic thresholds for layout recovery. Both are best-effort guesses about
// how the extractor lays out multi-column pages, not exact parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnPolicy {
    pub indent_width: usize,
}

impl Default for ColumnPolicy {
    fn default() -> Self { Self { indent_width: 4 } }
}

impl ColumnPolicy {
    fn is_continuation(&self, line: &str) -> bool {
        line.len() >= self.indent_width && line.bytes().take(self.indent_width).all(|b| b == b' ')
    }
}

/// Accumulates one page's lines, folding indented lines into the line before.
#[derive(Debug, Default)]
pub struct ColumnMerger {
    policy: ColumnPolicy,
    pending_line: Option<String>,
    output_lines: Vec<String>,
}

impl ColumnMerger {
    pub fn new(policy: ColumnPolicy) -> Self {
        Self { policy, pending_line: None, output_lines: Vec::new() }
    }

    pub fn push(&mut self, line: &str) {
        if self.policy.is_continuation(line) {
            match &mut self.pending_line {
                Some(pending) if !pending.is_empty() => {
                    pending.push(' ');
                    pending.push_str(line.trim());
                }
                slot => *slot = Some(line.trim().to_string()),
            }
        } else {
            self.flush();
            self.pending_line = Some(line.trim().to_string());
        }
    }

    fn flush(&mut self) {
        if let Some(pending) = self.pending_line.take() {
            if !pending.is_empty() { self.output_lines.push(pending); }
        }
    }

    pub fn finish(mut self) -> Vec<String> {
        self.flush();
        self.output_lines
    }
}

pub fn merge_columns(page: &str, policy: ColumnPolicy) -> String {
    let mut merger = ColumnMerger::new(policy);
    for line in page.split('\n') { merger.push(line); }
    merger.finish().join("\n")
}

pub fn dehyphenate(text: &str) -> String {
    HYPHEN_BREAK.replace_all(text, "$1$2").into_owned()
}

#[derive(Debug, PartialEq, Eq)]
pub enum LineClass {
    Section,
    Figure,
    Text,
}

pub fn classify(line: &str) -> LineClass {
    if SECTION_HEADER.is_match(&line.to_lowercase()) {
        LineClass::Section
    } else if FIGURE_REF.is_match(line) {
        LineClass::Figure
    } else {
        LineClass::Text
    }
}

fn format_section(line: &str) -> String {
    format!("\n# {}\n", line.trim())
}

fn starts_new_item(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_uppercase() || c.is_ascii_digit())
}

/// Second pass over merged text: section headers, figure captions, and
/// sentence continuation.
pub fn clean_text(text: &str) -> String {
    let text = dehyphenate(text.trim());
    let mut out: Vec<String> = Vec::new();
    let mut seen_section = false;

    for raw in text.split('\n') {
        let line = raw.trim();
        if line.is_empty() { continue; }

        match classify(line) {
            LineClass::Section => {
                if seen_section { out.push(String::new()); }
                seen_section = true;
                out.push(format_section(line));
            }
            LineClass::Figure => {
                out.push(String::new());
                out.push(line.to_string());
                out.push(String::new());
            }
            LineClass::Text => {
                let line = fix_spacing(line);
                match out.last_mut() {
                    Some(prev) if !starts_new_item(&line) => {
                        prev.push(' ');
                        prev.push_str(&line);
                    }
                    _ => out.push(line),
                }
            }
        }
    }

    collapse_newlines(&out.join("\n"))
}

/// Per-page column merge followed by the document-level cleanup.
pub fn normalize_pages<S: AsRef<str>>(pages: &[S], policy: ColumnPolicy) -> String {
    let merged: Vec<String> = pages.iter().map(|p| merge_columns(p.as_ref(), policy)).collect();
    clean_text(&merged.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dehyphenates_wrapped_words() {
        assert_eq!(dehyphenate("inter-\nnational"), "international");
        assert_eq!(dehyphenate("well-known"), "well-known");
        assert_eq!(dehyphenate("end -\nstart"), "end -\nstart");
    }

    #[test]
    fn merger_folds_indented_lines() {
        let mut m = ColumnMerger::new(ColumnPolicy::default());
        m.push("First line");
        m.push("    continued here");
        m.push("Second line");
        m.push("");
        m.push("Third");
        assert_eq!(m.finish(), vec!["First line continued here", "Second line", "Third"]);
    }

    #[test]
    fn merger_keeps_leading_continuation() {
        // best-effort: an indented first line still becomes its own line
        let out = merge_columns("    orphan\nNext", ColumnPolicy::default());
        assert_eq!(out, "orphan\nNext");
    }

    #[test]
    fn shallow_indent_is_not_continuation() {
        let out = merge_columns("One\n   three spaces", ColumnPolicy::default());
        assert_eq!(out, "One\nthree spaces");
        let wide = merge_columns("One\n   three spaces", ColumnPolicy { indent_width: 2 });
        assert_eq!(wide, "One three spaces");
    }

    #[test]
    fn classifies_lines() {
        assert_eq!(classify("Introduction"), LineClass::Section);
        assert_eq!(classify("REFERENCES"), LineClass::Section);
        assert_eq!(classify("Figure 3: accuracy"), LineClass::Figure);
        assert_eq!(classify("Fig. 2 shows"), LineClass::Figure);
        assert_eq!(classify("See Figure 3"), LineClass::Text);
    }

    #[test]
    fn headers_and_figures_are_spaced() {
        let out = clean_text("Abstract\nWe study x.\nIntroduction\nTable 1 results\nMore text");
        assert_eq!(out, "\n# Abstract\n\nWe study x.\n\n# Introduction\n\nTable 1 results\n\nMore text");
        assert!(!out.contains("\n\n\n"));
    }

    #[test]
    fn lowercase_lines_join_previous() {
        // best-effort sentence detection
        let out = clean_text("The model was\ntrained on data.\n2 runs were made.");
        assert_eq!(out, "The model was trained on data.\n2 runs were made.");
    }

    #[test]
    fn pages_keep_order() {
        let pages = ["Page one text.", "Page two text."];
        assert_eq!(normalize_pages(&pages, ColumnPolicy::default()), "Page one text.\nPage two text.");
    }

    #[test]
    fn hyphen_across_pages_joined() {
        let pages = ["A long inter-", "national study."];
        assert_eq!(normalize_pages(&pages, ColumnPolicy::default()), "A long international study.");
    }
}
