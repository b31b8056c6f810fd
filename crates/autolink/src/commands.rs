use crate::front_matter::split_front_matter;
use crate::vault::{Document, Vault};
use anyhow::{Context, Result};
use autolink_core::protected::extract_links;
use autolink_core::{CandidateIndex, IndexHandle, LinkScanner, ScanSettings};
use similar::TextDiff;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A document whose body gained links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub original: String,
    pub updated: String,
    pub links_added: usize,
}

/// Rewrite the body of `text` (front matter untouched). `None` when nothing
/// changed.
pub fn rewrite_text(scanner: &LinkScanner<'_>, document_id: &str, text: &str) -> Option<Rewritten> {
    let start = split_front_matter(text).content_start;
    let (header, body) = text.split_at(start);
    let outcome = scanner.rewrite_with_stats(body, document_id);
    if outcome.links_added == 0 {
        return None;
    }
    Some(Rewritten {
        original: text.to_string(),
        updated: format!("{}{}", header, outcome.text),
        links_added: outcome.links_added,
    })
}

pub fn build_index(handle: &IndexHandle, vault: &Vault, base_dir: Option<&str>) -> Result<()> {
    let documents = vault.documents()?;
    let entries = vault.entries(&documents)?;
    tracing::info!(
        "Indexed {} document(s) under {}",
        documents.len(),
        vault.root().display()
    );
    handle.rebuild(&entries, base_dir);
    Ok(())
}

/// `link`: rewrite the given files (or the whole vault) and either print a
/// unified diff or write the result back.
pub fn run_link(
    handle: &IndexHandle,
    vault: &Vault,
    settings: ScanSettings,
    files: &[PathBuf],
    write: bool,
    out: &mut impl Write,
) -> Result<usize> {
    let targets: Vec<Document> = if files.is_empty() {
        vault.documents()?
    } else {
        files
            .iter()
            .map(|f| vault.document_for(f))
            .collect::<Result<_>>()?
    };

    let index = handle.load();
    let scanner = LinkScanner::new(&index, settings);
    let mut changed = 0;
    for doc in &targets {
        let text = std::fs::read_to_string(&doc.file)
            .with_context(|| format!("Failed to read {}", doc.file.display()))?;
        let Some(rewritten) = rewrite_text(&scanner, &doc.id, &text) else {
            continue;
        };
        changed += 1;
        if write {
            std::fs::write(&doc.file, &rewritten.updated)
                .with_context(|| format!("Failed to write {}", doc.file.display()))?;
            tracing::info!("{}: added {} link(s)", doc.id, rewritten.links_added);
        } else {
            let diff = TextDiff::from_lines(&rewritten.original, &rewritten.updated);
            write!(
                out,
                "{}",
                diff.unified_diff()
                    .context_radius(1)
                    .header(&format!("a/{}.md", doc.id), &format!("b/{}.md", doc.id))
            )?;
        }
    }
    tracing::info!("{} of {} document(s) changed", changed, targets.len());
    Ok(changed)
}

/// `terms`: every matchable string with its link target.
pub fn run_terms(index: &CandidateIndex, out: &mut impl Write) -> Result<()> {
    for (key, entry) in index.entries() {
        writeln!(out, "{}\t[[{}]]", key, entry.canonical)?;
    }
    Ok(())
}

/// `links`: wikilink targets already present in one document.
pub fn run_links(vault: &Vault, file: &Path, out: &mut impl Write) -> Result<()> {
    let doc = vault.document_for(file)?;
    let text = std::fs::read_to_string(&doc.file)
        .with_context(|| format!("Failed to read {}", doc.file.display()))?;
    let body = &text[split_front_matter(&text).content_start..];
    for link in extract_links(body) {
        writeln!(out, "{}", link)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use autolink_core::PathEntry;
    use std::fs;

    fn write_file(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn vault_fixture() -> (tempfile::TempDir, Vault) {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "pages/HelloWorld.md", "---\naliases: [Hello]\n---\n");
        write_file(dir.path(), "pages/Journal.md", "---\ntitle: Hello\n---\nSay Hello to HelloWorld.\n");
        let vault = Vault::open(dir.path(), Vec::new()).unwrap();
        (dir, vault)
    }

    #[test]
    fn rewrite_text_keeps_front_matter() {
        let index = CandidateIndex::build(&[PathEntry::new("hello")], None);
        let scanner = LinkScanner::new(&index, ScanSettings::default());
        let text = "---\ntitle: hello\n---\nhello there";
        let rewritten = rewrite_text(&scanner, "doc", text).unwrap();
        assert_eq!(rewritten.updated, "---\ntitle: hello\n---\n[[hello]] there");
        assert_eq!(rewritten.links_added, 1);
    }

    #[test]
    fn rewrite_text_reports_no_change() {
        let index = CandidateIndex::build(&[PathEntry::new("hello")], None);
        let scanner = LinkScanner::new(&index, ScanSettings::default());
        assert_eq!(rewrite_text(&scanner, "doc", "nothing here"), None);
    }

    #[test]
    fn link_dry_run_prints_diff_without_writing() {
        let (dir, vault) = vault_fixture();
        let handle = IndexHandle::empty();
        build_index(&handle, &vault, Some("pages")).unwrap();

        let mut out = Vec::new();
        let changed = run_link(&handle, &vault, ScanSettings::default(), &[], false, &mut out).unwrap();
        assert_eq!(changed, 1);

        let diff = String::from_utf8(out).unwrap();
        assert!(diff.contains("+++ b/pages/Journal.md"), "diff: {diff}");
        assert!(
            diff.contains("+Say [[pages/HelloWorld|Hello]] to [[HelloWorld]]."),
            "diff: {diff}"
        );
        let on_disk = fs::read_to_string(dir.path().join("pages/Journal.md")).unwrap();
        assert!(on_disk.contains("Say Hello to HelloWorld."));
    }

    #[test]
    fn link_write_updates_files() {
        let (dir, vault) = vault_fixture();
        let handle = IndexHandle::empty();
        build_index(&handle, &vault, Some("pages")).unwrap();

        let file = dir.path().join("pages/Journal.md");
        let mut out = Vec::new();
        run_link(&handle, &vault, ScanSettings::default(), &[file.clone()], true, &mut out).unwrap();

        assert!(out.is_empty());
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "---\ntitle: Hello\n---\nSay [[pages/HelloWorld|Hello]] to [[HelloWorld]].\n"
        );
    }

    #[test]
    fn terms_lists_keys_and_targets() {
        let entries = vec![PathEntry::new("pages/HelloWorld").with_aliases(["Hello"])];
        let index = CandidateIndex::build(&entries, Some("pages"));
        let mut out = Vec::new();
        run_terms(&index, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "pages/HelloWorld\t[[pages/HelloWorld]]\nHelloWorld\t[[HelloWorld]]\nHello\t[[pages/HelloWorld|Hello]]\n"
        );
    }

    #[test]
    fn links_lists_existing_targets() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.md", "---\naliases: [x]\n---\nsee [[b|B]] and `[[c]]`\n");
        let vault = Vault::open(dir.path(), Vec::new()).unwrap();
        let mut out = Vec::new();
        run_links(&vault, &dir.path().join("a.md"), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "b\n");
    }
}
