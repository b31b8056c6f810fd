use regex::Regex;
use std::sync::LazyLock;

// Script (not Script_Extensions) membership, so shared CJK punctuation and
// the ideographic space do not count.
static CJK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{Script=Han}\p{Script=Hiragana}\p{Script=Katakana}\p{Script=Hangul}]+$")
        .unwrap()
});

static HANGUL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\p{Script=Hangul}+$").unwrap());

/// Returns true for characters that can continue a word: Unicode letters and
/// numbers, plus `_`, `/` and `-` (so path-like runs stay in one piece).
pub fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c.is_numeric() || c == '_' || c == '/' || c == '-'
}

/// A neighbour counts as a boundary when it is absent (string edge) or is not
/// a word character.
pub fn is_boundary(c: Option<char>) -> bool {
    match c {
        Some(c) => !is_word_char(c),
        None => true,
    }
}

/// True when `s` is non-empty and made only of Han, Hiragana, Katakana or
/// Hangul characters.
pub fn is_cjk(s: &str) -> bool {
    CJK_RE.is_match(s)
}

pub fn is_cjk_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    is_cjk(c.encode_utf8(&mut buf))
}

/// True when `s` is non-empty and made only of Hangul characters.
pub fn is_korean(s: &str) -> bool {
    HANGUL_RE.is_match(s)
}

/// Month-style numerals (`1`, `01`, `12`) are never linked.
///
/// The token must contain no `/`, consist of one or two ASCII digits and
/// parse to a value in `1..=12`.
pub fn is_month_token(s: &str) -> bool {
    if s.contains('/') || s.is_empty() || s.len() > 2 {
        return false;
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    matches!(s.parse::<u8>(), Ok(1..=12))
}
