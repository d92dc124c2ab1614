use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

// A single regex rewrite. Rules are applied in sequence; a rule that does not
// match leaves the text untouched.
pub struct TextRule {
    pub name: &'static str,
    pub pattern: LazyLock<Regex>,
    pub replacement: &'static str,
}

impl TextRule {
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, self.replacement)
    }
}

macro_rules! rule {
    ($name:literal, $re:literal, $rep:literal) => {
        TextRule {
            name: $name,
            pattern: LazyLock::new(|| Regex::new($re).expect("static regex")),
            replacement: $rep,
        }
    };
}

pub static STRIP_BYLINE_WITH_DATE: TextRule = rule!(
    "strip_byline_with_date",
    r"by\s+[\w\s,]+\d{1,2}(?:st|nd|rd|th)?\s+[A-Z][a-z]+\s+\d{4}.*$",
    ""
);
pub static STRIP_BYLINE: TextRule = rule!("strip_byline", r"by\s+[\w\s,]+$", "");
pub static STRIP_READ_TIME: TextRule = rule!("strip_read_time", r"\d+\s*min read\d*$", "");

/// Title cleanup used for article dumps.
pub static TITLE_RULES: [&TextRule; 3] = [&STRIP_BYLINE_WITH_DATE, &STRIP_BYLINE, &STRIP_READ_TIME];
/// Title cleanup used for metadata records (no read-time rule).
pub static META_TITLE_RULES: [&TextRule; 2] = [&STRIP_BYLINE_WITH_DATE, &STRIP_BYLINE];

pub static COLLAPSE_SPACES: TextRule = rule!("collapse_spaces", r" +", " ");
pub static SPACE_AFTER_PERIOD: TextRule = rule!("space_after_period", r"\.([A-Z])", ". $1");
pub static NO_SPACE_BEFORE_PUNCT: TextRule = rule!("no_space_before_punct", r"\s+([.,;:?\)])", "$1");
pub static SPACE_AFTER_PUNCT: TextRule = rule!("space_after_punct", r"([.,;:?!])([A-Z])", "$1 $2");

pub static SPACING_RULES: [&TextRule; 4] =
    [&COLLAPSE_SPACES, &SPACE_AFTER_PERIOD, &NO_SPACE_BEFORE_PUNCT, &SPACE_AFTER_PUNCT];

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("static regex"));
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

pub fn apply_rules(text: &str, rules: &[&TextRule]) -> String {
    let mut out = text.to_string();
    for rule in rules {
        if let Cow::Owned(rewritten) = rule.apply(&out) {
            debug!(rule = rule.name, "text rule rewrote input");
            out = rewritten;
        }
    }
    out
}

// Suffix rules are `$`-anchored, so whitespace or a suffix left behind by one
// rule can hide another; rerun the table until nothing changes.
fn strip_suffixes(text: &str, rules: &[&TextRule]) -> String {
    let mut current = text.trim().to_string();
    loop {
        let mut next = current.clone();
        for rule in rules {
            let stripped = rule.apply(&next).trim_end().to_string();
            if stripped != next { debug!(rule = rule.name, "title rule stripped suffix"); }
            next = stripped;
        }
        if next == current { return current; }
        current = next;
    }
}

pub fn clean_title(text: &str) -> String {
    strip_suffixes(text, &TITLE_RULES)
}

pub fn clean_meta_title(text: &str) -> String {
    strip_suffixes(text, &META_TITLE_RULES)
}

pub fn fix_spacing(text: &str) -> String {
    apply_rules(text, &SPACING_RULES)
}

pub fn collapse_newlines(text: &str) -> String {
    EXCESS_NEWLINES.replace_all(text, "\n\n").into_owned()
}

// Collapse all whitespace runs (newlines included) to a single space.
pub fn squash_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_byline_and_date() {
        assert_eq!(clean_title("My Post by Jane Doe 22nd Jan 2024"), "My Post");
        assert_eq!(clean_title("My Post by Jane Doe, John Roe 3rd Mar 2023 12 comments"), "My Post");
    }

    #[test]
    fn strips_byline_without_date() {
        assert_eq!(clean_title("Alignment notes by Jane Doe"), "Alignment notes");
    }

    #[test]
    fn strips_read_time() {
        assert_eq!(clean_title("Deceptive models 12 min read"), "Deceptive models");
        assert_eq!(clean_title("Deceptive models 12 min read3"), "Deceptive models");
    }

    #[test]
    fn meta_rules_keep_read_time() {
        assert_eq!(clean_meta_title("Deceptive models 12 min read"), "Deceptive models 12 min read");
        assert_eq!(clean_meta_title("My Post by Jane Doe 22nd Jan 2024"), "My Post");
    }

    #[test]
    fn title_cleaner_is_idempotent() {
        for raw in [
            "My Post by Jane Doe 22nd Jan 2024",
            "Plain title",
            "  padded title  ",
            "Deceptive models 12 min read",
            "Two authors by A, B",
            "Deceptive models 12 min read ",
            "Foo 5 min read by x",
        ] {
            let once = clean_title(raw);
            assert_eq!(clean_title(&once), once, "input {raw:?}");
            let meta = clean_meta_title(raw);
            assert_eq!(clean_meta_title(&meta), meta, "input {raw:?}");
        }
    }

    #[test]
    fn stacked_suffixes_strip_in_one_call() {
        assert_eq!(clean_title("Deceptive models 12 min read "), "Deceptive models");
        assert_eq!(clean_title("Foo 5 min read by x"), "Foo");
        assert_eq!(clean_meta_title("Foo 5 min read by x"), "Foo 5 min read");
    }

    #[test]
    fn no_match_is_noop() {
        assert_eq!(clean_title("Nothing to strip here"), "Nothing to strip here");
    }

    #[test]
    fn spacing_rules_in_order() {
        assert_eq!(fix_spacing("one  two   three"), "one two three");
        assert_eq!(fix_spacing("end.Next"), "end. Next");
        assert_eq!(fix_spacing("word , other ."), "word, other.");
        assert_eq!(fix_spacing("really?Yes"), "really? Yes");
    }

    #[test]
    fn collapses_long_newline_runs() {
        assert_eq!(collapse_newlines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_newlines("a\n\n\nb\n\nc"), "a\n\nb\n\nc");
        assert_eq!(collapse_newlines("a\nb"), "a\nb");
    }

    #[test]
    fn rule_names_are_listed() {
        let names: Vec<&str> = TITLE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, ["strip_byline_with_date", "strip_byline", "strip_read_time"]);
    }
}
