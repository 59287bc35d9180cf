use crate::document::{parse_post, DocumentStore};
use crate::error::{Error, Result};
use crate::index::{InvertedIndex, InvertedIndexBuilder, TextIndexBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Parses every post directly inside `dir` and indexes its English fields.
pub fn build_index(dir: impl AsRef<Path>) -> Result<(DocumentStore, InvertedIndex)> {
    build_index_with(dir, InvertedIndexBuilder::new())
}

/// Same as [`build_index`] with a caller-supplied index builder.
///
/// Files are visited in file-name order and numbered from zero. The first
/// unreadable or malformed file aborts the build.
pub fn build_index_with<B: TextIndexBuilder>(dir: impl AsRef<Path>, mut builder: B) -> Result<(DocumentStore, B::Index)> {
    let dir = dir.as_ref();
    tracing::info!(path = %dir.display(), "indexing posts");

    let mut store = DocumentStore::new();
    for path in list_posts(dir)? {
        let post = parse_post(&path).inspect_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "error while indexing post");
        })?;
        let doc_id = store.push(post);
        for text in store[doc_id].english_contributions() {
            builder.index_contribution(doc_id, text);
        }
    }

    let index = builder.finalize();
    tracing::info!(num_docs = store.len(), "finished indexing");
    Ok((store, index))
}

// Regular files (and symlinks to them) only; subdirectories are not posts.
fn list_posts(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e.into_io_error().unwrap_or_else(|| std::io::Error::other("filesystem loop"));
            Error::io(path, source)
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        } else {
            tracing::warn!(path = %entry.path().display(), "skipping non-file entry");
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::TextIndex;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn ids_follow_file_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.yml"), "title_english: Second\n").unwrap();
        fs::write(dir.path().join("a.yml"), "title_english: First\n").unwrap();
        fs::write(dir.path().join("c.yml"), "title_english: Third\n").unwrap();

        let (store, index) = build_index(dir.path()).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store[0].title_english, "First");
        assert_eq!(store[1].title_english, "Second");
        assert_eq!(store[2].title_english, "Third");
        assert_eq!(index.query("second"), vec![1]);
    }

    #[test]
    fn subdirectories_are_skipped() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("a_drafts")).unwrap();
        fs::write(dir.path().join("a_drafts").join("x.yml"), "title_english: Hidden\n").unwrap();
        fs::write(dir.path().join("b.yml"), "title_english: Visible\n").unwrap();

        let (store, index) = build_index(dir.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store[0].title_english, "Visible");
        assert!(index.query("hidden").is_empty());
    }

    #[test]
    fn non_english_fields_are_not_indexed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.yml"), "title: Katze\ntitle_english: Cat\ncategories: [Tier]\n").unwrap();

        let (store, index) = build_index(dir.path()).unwrap();
        assert_eq!(store[0].title, "Katze");
        assert!(index.query("katze").is_empty());
        assert!(index.query("tier").is_empty());
        assert_eq!(index.query("cat"), vec![0]);
    }

    #[test]
    fn malformed_file_aborts_build() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.yml"), "title_english: Fine\n").unwrap();
        fs::write(dir.path().join("b.yml"), "title_english: [broken\n").unwrap();

        let err = build_index(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
        assert!(err.path().ends_with("b.yml"));
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let err = build_index(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
