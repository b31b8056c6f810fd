#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(body: &str) -> Vec<(bool, &str)> {
        split_protected(body)
            .into_iter()
            .map(|s| match s {
                Segment::Text(t) => (false, t),
                Segment::Protected(t) => (true, t),
            })
            .collect()
    }

    // === split_protected tests ===

    #[test]
    fn plain_text_is_one_segment() {
        assert_eq!(kinds("hello world"), vec![(false, "hello world")]);
    }

    #[test]
    fn empty_body_has_no_segments() {
        assert!(split_protected("").is_empty());
    }

    #[test]
    fn protects_inline_code() {
        assert_eq!(
            kinds("`code` example"),
            vec![(true, "`code`"), (false, " example")]
        );
    }

    #[test]
    fn protects_fenced_code_block() {
        let body = "before\n```rust\nlet hello = 1;\n```\nafter";
        assert_eq!(
            kinds(body),
            vec![
                (false, "before\n"),
                (true, "```rust\nlet hello = 1;\n```"),
                (false, "\nafter"),
            ]
        );
    }

    #[test]
    fn fence_takes_priority_over_inline_code() {
        let body = "```\n`x` y\n```";
        assert_eq!(kinds(body), vec![(true, body)]);
    }

    #[test]
    fn protects_existing_wikilinks() {
        assert_eq!(
            kinds("see [[hello]] and [[a|b]]"),
            vec![
                (false, "see "),
                (true, "[[hello]]"),
                (false, " and "),
                (true, "[[a|b]]"),
            ]
        );
    }

    #[test]
    fn protects_markdown_links() {
        assert_eq!(
            kinds("read [hello](https://example.com) now"),
            vec![
                (false, "read "),
                (true, "[hello](https://example.com)"),
                (false, " now"),
            ]
        );
    }

    #[test]
    fn unterminated_wikilink_is_plain_text() {
        assert_eq!(kinds("[[hello world"), vec![(false, "[[hello world")]);
    }

    #[test]
    fn unterminated_fence_leaves_following_text_unprotected() {
        let segments = kinds("```\nhello\n");
        let text: String = segments
            .iter()
            .filter(|(protected, _)| !protected)
            .map(|(_, t)| *t)
            .collect();
        assert!(text.contains("hello"), "hello must stay scannable: {segments:?}");
    }

    #[test]
    fn segments_reassemble_to_input() {
        let body = "a `b` [[c]] ```\nd\n``` [e](f) g";
        let joined: String = split_protected(body).iter().map(|s| s.as_str()).collect();
        assert_eq!(joined, body);
    }

    // === is_single_link tests ===

    #[test]
    fn whole_body_wikilink_is_single_link() {
        assert!(is_single_link("[[hello]]"));
        assert!(is_single_link("  [[ns/page|Alias]]\n"));
    }

    #[test]
    fn whole_body_markdown_link_is_single_link() {
        assert!(is_single_link("[hello](https://example.com)"));
    }

    #[test]
    fn link_with_surrounding_text_is_not_single_link() {
        assert!(!is_single_link("[[hello]] world"));
        assert!(!is_single_link("[[a]] [[b]]"));
        assert!(!is_single_link("hello"));
    }

    // === extract_links tests ===

    #[test]
    fn extracts_targets_without_anchor_or_alias() {
        let links = extract_links("[[One]] and [[Two#Sec|Shown]] and [[ns/Three|x]]");
        assert_eq!(links, vec!["One", "Two", "ns/Three"]);
    }

    #[test]
    fn ignores_links_in_code() {
        let links = extract_links("```\n[[CodeLink]]\n```\n`[[Fake]]` [[Real]]");
        assert_eq!(links, vec!["Real"]);
    }

    #[test]
    fn ignores_empty_brackets() {
        assert!(extract_links("[[]] [[ | x]]").is_empty());
    }
}

use regex::Regex;
use std::sync::LazyLock;

// Alternation order is the priority at a given offset: fenced code, inline
// code, wikilink, markdown link.
static PROTECTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s:```.*?```)|`[^`]*`|\[\[[^\]\n]*\]\]|\[[^\]\n]*\]\([^)\n]*\)").unwrap()
});

static SINGLE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\[\[[^\]\n]+\]\]|\[[^\]\n]*\]\([^)\n]*\))$").unwrap()
});

static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[\[([^\]]*)\]\]$").unwrap());

/// A slice of a document body, either scannable text or a region that must
/// be copied through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Protected(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Text(s) | Segment::Protected(s) => s,
        }
    }
}

/// Split `body` into alternating text and protected segments.
///
/// Protected regions are code fences, inline code, `[[wikilinks]]` and
/// `[text](url)` links. An opener without a matching closer is left as text.
/// Concatenating the segments yields `body` again.
pub fn split_protected(body: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;
    for m in PROTECTED_RE.find_iter(body) {
        if m.start() > last {
            segments.push(Segment::Text(&body[last..m.start()]));
        }
        segments.push(Segment::Protected(m.as_str()));
        last = m.end();
    }
    if last < body.len() {
        segments.push(Segment::Text(&body[last..]));
    }
    segments
}

/// True when the trimmed body is exactly one link and nothing else.
pub fn is_single_link(body: &str) -> bool {
    SINGLE_LINK_RE.is_match(body.trim())
}

/// Targets of the `[[wikilinks]]` already present outside code.
/// Anchors (`#`) and aliases (`|`) are stripped.
pub fn extract_links(body: &str) -> Vec<String> {
    split_protected(body)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Protected(s) => WIKILINK_RE.captures(s),
            Segment::Text(_) => None,
        })
        .filter_map(|cap| {
            let content = cap.get(1)?.as_str();
            let name_end = content
                .find('#')
                .unwrap_or(content.len())
                .min(content.find('|').unwrap_or(content.len()));
            let name = content[..name_end].trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}
