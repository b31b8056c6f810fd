/// Code-point trie stored as a flat arena.
///
/// Nodes reference children by index into `nodes`; index 0 is the root.
/// Each node keeps its outgoing edges sorted by `char` so lookups are a
/// binary search. Terminal nodes carry the index of the key that ends there.
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<Node>,
    keys: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct Node {
    children: Vec<(char, usize)>,
    terminal: Option<usize>,
}

const ROOT: usize = 0;

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            keys: Vec::new(),
        }
    }

    /// Insert `key`, one edge per code point. Inserting the same key twice is
    /// a no-op. Empty keys are ignored.
    pub fn insert(&mut self, key: &str) {
        if key.is_empty() {
            return;
        }
        let mut node = ROOT;
        for c in key.chars() {
            node = match self.child(node, c) {
                Some(next) => next,
                None => self.push_child(node, c),
            };
        }
        if self.nodes[node].terminal.is_none() {
            self.nodes[node].terminal = Some(self.keys.len());
            self.keys.push(key.to_string());
        }
    }

    fn push_child(&mut self, parent: usize, c: char) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node::default());
        let children = &mut self.nodes[parent].children;
        let pos = children.partition_point(|&(k, _)| k < c);
        children.insert(pos, (c, idx));
        idx
    }

    pub fn root(&self) -> usize {
        ROOT
    }

    /// Follow the edge labelled `c` out of `node`.
    pub fn child(&self, node: usize, c: char) -> Option<usize> {
        let children = &self.nodes[node].children;
        children
            .binary_search_by(|&(k, _)| k.cmp(&c))
            .ok()
            .map(|pos| children[pos].1)
    }

    /// The key ending at `node`, if any.
    pub fn terminal(&self, node: usize) -> Option<&str> {
        self.nodes[node].terminal.map(|k| self.keys[k].as_str())
    }

    /// Walk from the root over `chars[start..]` and return the longest prefix
    /// that ends on a terminal node, as `(length in chars, matched key)`.
    pub fn longest_match(&self, chars: &[char], start: usize) -> Option<(usize, &str)> {
        let mut node = ROOT;
        let mut best = None;
        for (offset, &c) in chars[start..].iter().enumerate() {
            match self.child(node, c) {
                Some(next) => node = next,
                None => break,
            }
            if let Some(key) = self.terminal(node) {
                best = Some((offset + 1, key));
            }
        }
        best
    }

    pub fn contains(&self, key: &str) -> bool {
        let mut node = ROOT;
        for c in key.chars() {
            match self.child(node, c) {
                Some(next) => node = next,
                None => return false,
            }
        }
        self.nodes[node].terminal.is_some()
    }

    /// Every key stored in the trie, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn empty_trie_is_root_only() {
        let trie = Trie::new();
        assert_eq!(trie.node_count(), 1);
        assert!(trie.is_empty());
        assert_eq!(trie.longest_match(&chars("anything"), 0), None);
    }

    #[test]
    fn longest_match_prefers_longer_terminal() {
        let mut trie = Trie::new();
        trie.insert("hello");
        trie.insert("hello world");
        let text = chars("hello world!");
        assert_eq!(trie.longest_match(&text, 0), Some((11, "hello world")));
    }

    #[test]
    fn longest_match_falls_back_to_shorter_terminal() {
        let mut trie = Trie::new();
        trie.insert("hello");
        trie.insert("hello world");
        let text = chars("hello wor");
        assert_eq!(trie.longest_match(&text, 0), Some((5, "hello")));
    }

    #[test]
    fn match_starts_at_offset() {
        let mut trie = Trie::new();
        trie.insert("world");
        let text = chars("hello world");
        assert_eq!(trie.longest_match(&text, 0), None);
        assert_eq!(trie.longest_match(&text, 6), Some((5, "world")));
    }

    #[test]
    fn lengths_are_code_points_not_bytes() {
        let mut trie = Trie::new();
        trie.insert("漢字");
        let text = chars("漢字です");
        assert_eq!(trie.longest_match(&text, 0), Some((2, "漢字")));
    }

    #[test]
    fn duplicate_insert_keeps_one_key() {
        let mut trie = Trie::new();
        trie.insert("a/b");
        let nodes = trie.node_count();
        trie.insert("a/b");
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.node_count(), nodes);
        assert!(trie.contains("a/b"));
        assert!(!trie.contains("a/"));
    }

    #[test]
    fn children_stay_sorted_regardless_of_insert_order() {
        let mut trie = Trie::new();
        for key in ["c", "a", "b"] {
            trie.insert(key);
        }
        for key in ["a", "b", "c"] {
            assert!(trie.contains(key), "missing {key}");
        }
        assert_eq!(trie.keys().collect::<Vec<_>>(), vec!["c", "a", "b"]);
    }
}
