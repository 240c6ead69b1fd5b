//! Removal of pages whose records are no longer published.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use glob::Pattern;

use crate::error::SiteError;

/// Delete document pages in `dir` whose stem is not in `keep`.
///
/// A page is a document page when it matches `<prefix>-*.html` or its stem is
/// one of the `known` public IDs, which covers IDs adopted under another
/// prefix. Other files are never touched. A missing directory has nothing to
/// clean. Returns the removed public IDs, sorted.
pub fn remove_orphan_pages(
    dir: &Path,
    prefix: &str,
    known: &HashSet<&str>,
    keep: &HashSet<&str>,
) -> Result<Vec<String>, SiteError> {
    let pattern = Pattern::new(&format!("{}-*.html", Pattern::escape(prefix)))?;
    let io_err = |path: &Path, source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_err(dir, e)),
    };

    let mut removed = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(stem) = name.strip_suffix(".html") else {
            continue;
        };
        if !(pattern.matches(name) || known.contains(stem)) || !path.is_file() {
            continue;
        }
        if keep.contains(stem) {
            continue;
        }
        fs::remove_file(&path).map_err(|e| io_err(&path, e))?;
        tracing::info!(public_id = stem, "removed unpublished document page");
        removed.push(stem.to_owned());
    }
    removed.sort();
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_removes_only_unpublished_pages() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        for name in ["DOC-0001.html", "DOC-0002.html", "DOC-0003.html"] {
            fs::write(dir.join(name), "stale").unwrap();
        }
        fs::write(dir.join("notes.html"), "other").unwrap();
        fs::write(dir.join("DOC-0004.json"), "{}").unwrap();

        let keep = HashSet::from(["DOC-0002"]);
        let removed = remove_orphan_pages(dir, "DOC", &HashSet::new(), &keep).unwrap();

        assert_eq!(removed, vec!["DOC-0001", "DOC-0003"]);
        assert!(dir.join("DOC-0002.html").exists());
        assert_eq!(fs::read_to_string(dir.join("DOC-0002.html")).unwrap(), "stale");
        assert!(dir.join("notes.html").exists());
        assert!(dir.join("DOC-0004.json").exists());
    }

    #[test]
    fn test_other_prefix_untouched() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("KB-0001.html"), "x").unwrap();
        let removed =
            remove_orphan_pages(tmp.path(), "DOC", &HashSet::new(), &HashSet::new()).unwrap();
        assert!(removed.is_empty());
        assert!(tmp.path().join("KB-0001.html").exists());
    }

    #[test]
    fn test_removes_unpublished_adopted_ids() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        for name in ["KB-0009.html", "LEGACY_7.html", "KB-0010.html", "DOC-0001.html"] {
            fs::write(dir.join(name), "page").unwrap();
        }

        let known = HashSet::from(["KB-0009", "LEGACY_7", "KB-0010", "DOC-0001"]);
        let keep = HashSet::from(["KB-0010"]);
        let removed = remove_orphan_pages(dir, "DOC", &known, &keep).unwrap();

        assert_eq!(removed, vec!["DOC-0001", "KB-0009", "LEGACY_7"]);
        assert!(!dir.join("KB-0009.html").exists());
        assert!(!dir.join("LEGACY_7.html").exists());
        assert!(dir.join("KB-0010.html").exists());
    }

    #[test]
    fn test_missing_dir_is_noop() {
        let tmp = TempDir::new().unwrap();
        let removed = remove_orphan_pages(
            &tmp.path().join("documents"),
            "DOC",
            &HashSet::new(),
            &HashSet::new(),
        )
        .unwrap();
        assert!(removed.is_empty());
    }
}
