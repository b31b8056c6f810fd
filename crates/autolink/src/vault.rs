use crate::front_matter::split_front_matter;
use anyhow::{bail, Context, Result};
use autolink_core::PathEntry;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A markdown file in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Vault-relative identifier without extension, `/`-separated.
    pub id: String,
    pub file: PathBuf,
}

/// Directory of markdown files, enumerated fresh on every call.
pub struct Vault {
    root: PathBuf,
    ignore: Vec<String>,
}

impl Vault {
    pub fn open(root: &Path, ignore: Vec<String>) -> Result<Self> {
        if !root.is_dir() {
            bail!("Vault root is not a directory: {}", root.display());
        }
        Ok(Self {
            root: root.to_path_buf(),
            ignore,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every `*.md` file under the root, skipping hidden directories and
    /// ignored globs, sorted by identifier.
    pub fn documents(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", self.root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(id) = document_id(&self.root, entry.path()) else {
                continue;
            };
            if self.is_ignored(&id) {
                tracing::debug!("Ignoring {}", id);
                continue;
            }
            documents.push(Document {
                id,
                file: entry.into_path(),
            });
        }
        documents.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(documents)
    }

    /// Resolve a file given on the command line to a vault document.
    pub fn document_for(&self, file: &Path) -> Result<Document> {
        let file = if file.is_absolute() {
            file.to_path_buf()
        } else {
            std::env::current_dir()?.join(file)
        };
        let root = self
            .root
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", self.root.display()))?;
        let file = file
            .canonicalize()
            .with_context(|| format!("No such file: {}", file.display()))?;
        let id = document_id(&root, &file)
            .with_context(|| format!("{} is not a markdown file inside the vault", file.display()))?;
        Ok(Document { id, file })
    }

    /// Read every document's front matter into the index input.
    pub fn entries(&self, documents: &[Document]) -> Result<Vec<PathEntry>> {
        documents
            .iter()
            .map(|doc| {
                let text = std::fs::read_to_string(&doc.file)
                    .with_context(|| format!("Failed to read {}", doc.file.display()))?;
                let fm = split_front_matter(&text);
                Ok(PathEntry::new(doc.id.as_str())
                    .with_aliases(fm.aliases)
                    .restrict_namespace(fm.restrict_namespace)
                    .prevent_linking(fm.prevent_linking))
            })
            .collect()
    }

    fn is_ignored(&self, id: &str) -> bool {
        let file = format!("{}.md", id);
        self.ignore
            .iter()
            .any(|pattern| glob_match::glob_match(pattern, &file) || glob_match::glob_match(pattern, id))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// `root/ns/Page.md` -> `ns/Page`. `None` for non-markdown files or files
/// outside `root`.
pub fn document_id(root: &Path, file: &Path) -> Option<String> {
    if file.extension()? != "md" {
        return None;
    }
    let relative = file.strip_prefix(root).ok()?.with_extension("");
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    (!parts.is_empty()).then(|| parts.join("/"))
}
