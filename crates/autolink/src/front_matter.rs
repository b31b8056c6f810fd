use serde::Deserialize;

/// What the host needs from a document's YAML header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    /// Byte offset where the body starts (0 when there is no header).
    pub content_start: usize,
    pub aliases: Vec<String>,
    pub restrict_namespace: bool,
    pub prevent_linking: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RawFrontMatter {
    #[serde(default)]
    aliases: Option<Aliases>,
    #[serde(default, rename = "autolink-restrict-namespace")]
    restrict_namespace: Option<bool>,
    #[serde(default, rename = "autolink-prevent-linking")]
    prevent_linking: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Aliases {
    One(String),
    Many(Vec<serde_yaml::Value>),
}

impl Aliases {
    fn into_strings(self) -> Vec<String> {
        match self {
            Aliases::One(s) => vec![s],
            Aliases::Many(values) => values
                .into_iter()
                .filter_map(|v| match v {
                    serde_yaml::Value::String(s) => Some(s),
                    serde_yaml::Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// Split the leading `---` block off `text` and read the keys autolink cares
/// about. A header without a closing fence is treated as body text. Invalid
/// YAML keeps the split but yields default metadata.
pub fn split_front_matter(text: &str) -> FrontMatter {
    let Some((yaml, content_start)) = locate(text) else {
        return FrontMatter::default();
    };

    let raw: RawFrontMatter = if yaml.trim().is_empty() {
        RawFrontMatter::default()
    } else {
        match serde_yaml::from_str(yaml) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Ignoring unparseable front matter: {}", e);
                RawFrontMatter::default()
            }
        }
    };

    FrontMatter {
        content_start,
        aliases: raw
            .aliases
            .map(Aliases::into_strings)
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect(),
        restrict_namespace: raw.restrict_namespace.unwrap_or(false),
        prevent_linking: raw.prevent_linking.unwrap_or(false),
    }
}

/// Returns the YAML source and the byte offset just past the closing fence.
fn locate(text: &str) -> Option<(&str, usize)> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_start_matches('\u{feff}').trim_end() != "---" {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some((&text[yaml_start..offset], offset + line.len()));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_header_means_whole_text_is_body() {
        let fm = split_front_matter("# Title\nbody");
        assert_eq!(fm, FrontMatter::default());
    }

    #[test]
    fn reads_alias_list_and_flags() {
        let text = "---\naliases:\n  - Hello\n  - HW\nautolink-restrict-namespace: true\n---\nbody";
        let fm = split_front_matter(text);
        assert_eq!(fm.aliases, vec!["Hello", "HW"]);
        assert!(fm.restrict_namespace);
        assert!(!fm.prevent_linking);
        assert_eq!(&text[fm.content_start..], "body");
    }

    #[test]
    fn reads_single_alias_string() {
        let fm = split_front_matter("---\naliases: Solo\nautolink-prevent-linking: true\n---\n");
        assert_eq!(fm.aliases, vec!["Solo"]);
        assert!(fm.prevent_linking);
    }

    #[test]
    fn numeric_aliases_become_strings() {
        let fm = split_front_matter("---\naliases: [2024, Year]\n---\n");
        assert_eq!(fm.aliases, vec!["2024", "Year"]);
    }

    #[test]
    fn unterminated_header_is_body() {
        let fm = split_front_matter("---\naliases: [A]\nno closing fence");
        assert_eq!(fm.content_start, 0);
        assert!(fm.aliases.is_empty());
    }

    #[test]
    fn invalid_yaml_keeps_split() {
        let text = "---\naliases: [unclosed\n---\nbody";
        let fm = split_front_matter(text);
        assert!(fm.aliases.is_empty());
        assert_eq!(&text[fm.content_start..], "body");
    }

    #[test]
    fn empty_header_and_crlf() {
        let text = "---\r\n---\r\nbody";
        let fm = split_front_matter(text);
        assert_eq!(&text[fm.content_start..], "body");
    }

    #[test]
    fn bom_before_fence_is_accepted() {
        let text = "\u{feff}---\naliases: [A]\n---\nbody";
        let fm = split_front_matter(text);
        assert_eq!(fm.aliases, vec!["A"]);
        assert_eq!(&text[fm.content_start..], "body");
    }
}
