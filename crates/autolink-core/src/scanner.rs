use crate::candidate_index::CandidateIndex;
use crate::error::SettingsError;
use crate::protected::{is_single_link, split_protected, Segment};
use crate::script::{is_boundary, is_cjk, is_cjk_char, is_korean, is_month_token};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

const URL_PREFIXES: [&str; 2] = ["http://", "https://"];

static KOREAN_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^이다\.?").unwrap());

static DATE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-$").unwrap());

/// Knobs the host passes with every rewrite request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSettings {
    /// Bodies with this many characters or fewer are never rewritten.
    pub min_char_count: usize,
    /// Resolve bare words to `namespace/.../word` entries by path proximity.
    pub namespace_resolution: bool,
}

impl ScanSettings {
    /// Validate raw host settings. A negative threshold is a caller bug and is
    /// rejected rather than clamped.
    pub fn new(min_char_count: i64, namespace_resolution: bool) -> Result<Self, SettingsError> {
        let min_char_count = usize::try_from(min_char_count)
            .map_err(|_| SettingsError::NegativeMinCharCount(min_char_count))?;
        Ok(Self {
            min_char_count,
            namespace_resolution,
        })
    }
}

/// Result of a rewrite plus the number of links it inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub text: String,
    pub links_added: usize,
}

/// Greedy longest-match rewriter over one immutable [`CandidateIndex`].
pub struct LinkScanner<'a> {
    index: &'a CandidateIndex,
    settings: ScanSettings,
}

impl<'a> LinkScanner<'a> {
    pub fn new(index: &'a CandidateIndex, settings: ScanSettings) -> Self {
        Self { index, settings }
    }

    pub fn rewrite(&self, body: &str, document_path: &str) -> String {
        self.rewrite_with_stats(body, document_path).text
    }

    /// Rewrite `body`, wrapping every accepted match in `[[...]]`.
    ///
    /// When nothing gets linked the input is returned byte for byte, so a
    /// body without candidates is never renormalized.
    pub fn rewrite_with_stats(&self, body: &str, document_path: &str) -> RewriteOutcome {
        let unchanged = || RewriteOutcome {
            text: body.to_string(),
            links_added: 0,
        };

        if body.chars().count() <= self.settings.min_char_count {
            return unchanged();
        }

        let normalized: String = body.nfc().collect();
        if is_single_link(&normalized) {
            return unchanged();
        }

        let mut pass = ScanPass {
            index: self.index,
            namespace_resolution: self.settings.namespace_resolution,
            document_dir: containing_dir(document_path),
            document_namespace: self.index.effective_namespace(document_path),
            out: String::with_capacity(normalized.len() + normalized.len() / 8),
            links_added: 0,
        };
        for segment in split_protected(&normalized) {
            match segment {
                Segment::Protected(s) => pass.out.push_str(s),
                Segment::Text(s) => pass.scan(s),
            }
        }

        if pass.links_added == 0 {
            return unchanged();
        }

        tracing::debug!(
            "Linked {} term(s) in {}",
            pass.links_added,
            document_path
        );
        RewriteOutcome {
            text: pass.out,
            links_added: pass.links_added,
        }
    }
}

/// One-shot convenience wrapper around [`LinkScanner`].
pub fn rewrite(
    body: &str,
    document_path: &str,
    index: &CandidateIndex,
    settings: ScanSettings,
) -> String {
    LinkScanner::new(index, settings).rewrite(body, document_path)
}

// ---------------------------------------------------------------------------
// Scan pass
// ---------------------------------------------------------------------------

struct ScanPass<'a> {
    index: &'a CandidateIndex,
    namespace_resolution: bool,
    document_dir: Vec<&'a str>,
    document_namespace: String,
    out: String,
    links_added: usize,
}

impl<'a> ScanPass<'a> {
    fn scan(&mut self, text: &str) {
        let index = self.index;
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if let Some(end) = url_end(&chars, i) {
                self.out.extend(&chars[i..end]);
                i = end;
                continue;
            }

            if let Some((len, key)) = index.trie().longest_match(&chars, i) {
                i += self.emit_match(&chars, i, len, key);
                continue;
            }

            if self.namespace_resolution {
                if let Some(consumed) = self.resolve_word(&chars, i) {
                    i += consumed;
                    continue;
                }
            }

            self.out.push(chars[i]);
            i += 1;
        }
    }

    /// Handle a trie hit of `len` chars at `i`; returns how many chars were
    /// consumed.
    fn emit_match(&mut self, chars: &[char], i: usize, len: usize, key: &'a str) -> usize {
        if is_month_token(key) {
            self.out.push_str(key);
            return len;
        }
        let index = self.index;
        let Some(entry) = index.get(key) else {
            self.out.push(chars[i]);
            return 1;
        };

        let korean = is_korean(key);
        if !is_cjk(key) || korean {
            let before = i.checked_sub(1).map(|p| chars[p]);
            let after = chars.get(i + len).copied();
            if !is_boundary(before) || !is_boundary(after) {
                if korean {
                    if let Some(suffix_len) = korean_suffix_len(chars, i + len) {
                        self.push_link(&entry.canonical);
                        self.out.extend(&chars[i + len..i + len + suffix_len]);
                        return len + suffix_len;
                    }
                }
                self.out.push(chars[i]);
                return 1;
            }
        }

        self.push_link(&entry.canonical);
        len
    }

    /// Namespace fallback for a word no trie key starts. Returns `None` when
    /// position `i` does not start a word.
    fn resolve_word(&mut self, chars: &[char], i: usize) -> Option<usize> {
        let first = chars[i];
        // CJK final segments are already trie keys.
        if !is_word_run_char(first) || (is_cjk_char(first) && !is_korean_char(first)) {
            return None;
        }
        if !is_boundary(i.checked_sub(1).map(|p| chars[p])) {
            return None;
        }
        let len = chars[i..]
            .iter()
            .take_while(|&&c| is_word_run_char(c))
            .count();
        let word: String = chars[i..i + len].iter().collect();

        if is_two_digits(&word) && ends_with_date_prefix(&self.out) {
            self.out.push_str(&word);
            return Some(len);
        }
        if is_month_token(&word) {
            self.out.push_str(&word);
            return Some(len);
        }
        let index = self.index;
        if let Some(entry) = index.get(&word) {
            self.push_link(&entry.canonical);
            return Some(len);
        }
        match self.closest_by_namespace(&word) {
            Some(target) => self.push_link(target),
            None => self.out.push_str(&word),
        }
        Some(len)
    }

    /// Pick the target key ending in `/word` that shares the most leading
    /// segments with the current document's directory. Ties go to a key in
    /// the document's own namespace, then to registration order.
    fn closest_by_namespace(&self, word: &str) -> Option<&'a str> {
        let mut best: Option<((usize, bool), &'a str)> = None;
        for (key, entry) in self.index.with_final_segment(word) {
            if entry.restrict_namespace {
                continue;
            }
            let shared = key
                .split('/')
                .zip(self.document_dir.iter())
                .take_while(|(a, b)| a == *b)
                .count();
            let score = (shared, entry.namespace == self.document_namespace);
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, entry.canonical.as_str()));
            }
        }
        best.map(|(_, target)| target)
    }

    fn push_link(&mut self, target: &str) {
        self.out.push_str("[[");
        self.out.push_str(target);
        self.out.push_str("]]");
        self.links_added += 1;
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn containing_dir(document_path: &str) -> Vec<&str> {
    match document_path.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').filter(|s| !s.is_empty()).collect(),
        None => Vec::new(),
    }
}

/// End of the URL starting at `i`, if one does: the run of non-whitespace.
fn url_end(chars: &[char], i: usize) -> Option<usize> {
    let starts_url = URL_PREFIXES.iter().any(|prefix| {
        let mut rest = chars[i..].iter();
        prefix.chars().all(|p| rest.next() == Some(&p))
    });
    if !starts_url {
        return None;
    }
    let len = chars[i..].iter().take_while(|c| !c.is_whitespace()).count();
    Some(i + len)
}

/// Length in chars of an allowed Korean copula suffix (`이다`, optionally
/// `.`) at `pos`.
fn korean_suffix_len(chars: &[char], pos: usize) -> Option<usize> {
    let ahead: String = chars.get(pos..)?.iter().take(3).collect();
    KOREAN_SUFFIX_RE
        .find(&ahead)
        .map(|m| m.as_str().chars().count())
}

fn is_word_run_char(c: char) -> bool {
    c.is_alphabetic() || c.is_numeric() || c == '_' || c == '-'
}

fn is_korean_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    is_korean(c.encode_utf8(&mut buf))
}

fn is_two_digits(word: &str) -> bool {
    word.len() == 2 && word.bytes().all(|b| b.is_ascii_digit())
}

/// Output so far ends in `dddd-dd-`, i.e. we are at the day of a date.
fn ends_with_date_prefix(out: &str) -> bool {
    match out.char_indices().rev().nth(7) {
        Some((start, _)) => DATE_PREFIX_RE.is_match(&out[start..]),
        None => false,
    }
}
