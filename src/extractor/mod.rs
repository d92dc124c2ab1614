use url::Url;

pub mod arxiv;
pub mod forum;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Forum,
    Arxiv,
}

impl Source {
    pub fn label(&self) -> &'static str {
        match self {
            Source::Forum => "alignmentforum.org",
            Source::Arxiv => "arxiv.org",
        }
    }

    // Loose substring match: arXiv also takes bare "arxiv:<id>" references.
    pub fn accepts(&self, url: &str) -> bool {
        match self {
            Source::Forum => url.contains("alignmentforum.org"),
            Source::Arxiv => url.contains("arxiv.org") || url.contains("arxiv:"),
        }
    }
}

pub fn host_of(url: &str) -> String {
    Url::parse(url).ok().and_then(|u| u.host_str().map(|s| s.to_string())).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_acceptance() {
        assert!(Source::Forum.accepts("https://www.alignmentforum.org/posts/abc/x"));
        assert!(!Source::Forum.accepts("https://www.lesswrong.com/posts/abc/x"));
        assert!(Source::Arxiv.accepts("arxiv:2401.00001"));
        assert!(Source::Arxiv.accepts("https://arxiv.org/abs/2401.00001"));
        assert!(!Source::Arxiv.accepts("https://example.com/paper.pdf"));
    }

    #[test]
    fn host_or_empty() {
        assert_eq!(host_of("https://arxiv.org/abs/1"), "arxiv.org");
        assert_eq!(host_of("arxiv:2401.00001"), "");
    }
}
