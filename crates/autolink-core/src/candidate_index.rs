use crate::script::is_cjk;
use crate::trie::Trie;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One document identifier as enumerated by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathEntry {
    /// Slash-delimited identifier without extension, e.g. `"pages/HelloWorld"`.
    pub path: String,
    pub aliases: Vec<String>,
    /// Never offer this entry as a namespace-resolution target.
    pub restrict_namespace: bool,
    /// Leave this entry out of the index entirely.
    pub prevent_linking: bool,
}

impl PathEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn restrict_namespace(mut self, restrict: bool) -> Self {
        self.restrict_namespace = restrict;
        self
    }

    pub fn prevent_linking(mut self, prevent: bool) -> Self {
        self.prevent_linking = prevent;
        self
    }
}

/// Metadata attached to every matchable string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateEntry {
    /// Text emitted between `[[` and `]]`: either a path or `path|alias`.
    pub canonical: String,
    /// First namespace segment below the base directory.
    pub namespace: String,
    pub restrict_namespace: bool,
}

/// Immutable map of matchable strings plus a trie over the same keys.
///
/// Built once per corpus snapshot; rebuilding always produces a new value.
#[derive(Debug, Clone)]
pub struct CandidateIndex {
    candidates: IndexMap<String, CandidateEntry>,
    /// Final path segment -> positions in `candidates` of keys ending in it.
    by_final_segment: HashMap<String, Vec<usize>>,
    trie: Trie,
    base_dir: String,
}

impl Default for CandidateIndex {
    fn default() -> Self {
        Self::build(&[], None)
    }
}

impl CandidateIndex {
    /// Build the index from a corpus snapshot.
    ///
    /// Entries are registered longest path first (ties broken
    /// lexicographically), which fixes the iteration order used for
    /// namespace tie-breaks. Path, CJK final segment and short-form keys
    /// overwrite earlier registrations; aliases never overwrite.
    pub fn build(entries: &[PathEntry], base_dir: Option<&str>) -> Self {
        let base_dir = base_dir
            .map(|b| b.trim_matches('/').to_string())
            .unwrap_or_default();

        let mut ordered: Vec<&PathEntry> = entries
            .iter()
            .filter(|e| !e.prevent_linking && !e.path.is_empty())
            .collect();
        ordered.sort_by(|a, b| {
            b.path
                .chars()
                .count()
                .cmp(&a.path.chars().count())
                .then_with(|| a.path.cmp(&b.path))
        });

        let mut candidates: IndexMap<String, CandidateEntry> = IndexMap::new();
        for entry in ordered {
            register_entry(&mut candidates, entry, &base_dir);
        }

        let mut trie = Trie::new();
        let mut by_final_segment: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, (key, entry)) in candidates.iter().enumerate() {
            trie.insert(key);
            // Only keys that are link targets themselves; piped aliases and
            // CJK final segments point elsewhere.
            if entry.canonical != *key {
                continue;
            }
            if let Some((_, last)) = key.rsplit_once('/') {
                if !last.is_empty() {
                    by_final_segment.entry(last.to_string()).or_default().push(idx);
                }
            }
        }

        tracing::debug!(
            "Built candidate index: {} entries, {} keys, {} trie nodes",
            entries.len(),
            candidates.len(),
            trie.node_count()
        );

        Self {
            candidates,
            by_final_segment,
            trie,
            base_dir,
        }
    }

    pub fn get(&self, key: &str) -> Option<&CandidateEntry> {
        self.candidates.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.candidates.contains_key(key)
    }

    /// Keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.candidates.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &CandidateEntry)> {
        self.candidates.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Target keys containing a separator whose last segment equals
    /// `segment`, in registration order. Alias keys are never returned.
    pub fn with_final_segment(
        &self,
        segment: &str,
    ) -> impl Iterator<Item = (&str, &CandidateEntry)> + '_ {
        self.by_final_segment
            .get(segment)
            .into_iter()
            .flatten()
            .filter_map(move |&idx| self.candidates.get_index(idx))
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn effective_namespace(&self, path: &str) -> String {
        effective_namespace(path, &self.base_dir)
    }
}

fn register_entry(
    candidates: &mut IndexMap<String, CandidateEntry>,
    entry: &PathEntry,
    base_dir: &str,
) {
    let path = entry.path.as_str();
    let namespace = effective_namespace(path, base_dir);
    let make = |canonical: &str| CandidateEntry {
        canonical: canonical.to_string(),
        namespace: namespace.clone(),
        restrict_namespace: entry.restrict_namespace,
    };

    candidates.insert(path.to_string(), make(path));

    if let Some((_, last)) = path.rsplit_once('/') {
        if is_cjk(last) {
            candidates.insert(last.to_string(), make(path));
        }
    }

    let short_form = strip_base_dir(path, base_dir);
    if let Some(short) = short_form {
        if !short.is_empty() {
            candidates.insert(short.to_string(), make(short));
        }
    }

    for alias in &entry.aliases {
        if alias.is_empty() || candidates.contains_key(alias.as_str()) {
            continue;
        }
        let canonical = if Some(alias.as_str()) == short_form {
            alias.clone()
        } else {
            format!("{}|{}", path, alias)
        };
        candidates.insert(alias.clone(), make(&canonical));
    }
}

fn strip_base_dir<'a>(path: &'a str, base_dir: &str) -> Option<&'a str> {
    if base_dir.is_empty() {
        return None;
    }
    path.strip_prefix(base_dir)?.strip_prefix('/')
}

/// First path segment below `base_dir` (or of `path` itself when it lies
/// outside `base_dir`). Empty when there is no segment.
pub fn effective_namespace(path: &str, base_dir: &str) -> String {
    let rest = strip_base_dir(path, base_dir).unwrap_or(path);
    rest.split('/')
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}
