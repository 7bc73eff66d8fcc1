use crate::library::remove_duplicate_highlights;
use crate::markdown::render_book;
use crate::models::Book;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

pub const CLIPPINGS_FILE_NAME: &str = "My Clippings.txt";

#[derive(Debug)]
pub enum ReadError {
    Io(PathBuf, std::io::Error),
    NoClippingsFound(PathBuf),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::Io(path, e) => write!(f, "Failed to read {}: {}", path.display(), e),
            ReadError::NoClippingsFound(dir) => {
                write!(f, "No '{}' found under {}", CLIPPINGS_FILE_NAME, dir.display())
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io(_, e) => Some(e),
            ReadError::NoClippingsFound(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct WriteError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to write {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    pub failed: usize,
}

/// A file is taken as-is; a directory is searched for clippings files.
pub fn find_clippings_files(input: &Path) -> Result<Vec<PathBuf>, ReadError> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == CLIPPINGS_FILE_NAME)
        .map(|e| e.into_path())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(ReadError::NoClippingsFound(input.to_path_buf()));
    }

    Ok(files)
}

pub fn read_clippings(path: &Path) -> Result<String, ReadError> {
    info!("Processing file \"{}\"...", path.display());
    std::fs::read_to_string(path).map_err(|e| ReadError::Io(path.to_path_buf(), e))
}

pub fn book_file_path(dir: &Path, book: &Book) -> PathBuf {
    dir.join(format!("{}.md", book.title))
}

/// The file is closed when the handle drops, before the result is returned.
pub fn write_book(dir: &Path, book: &Book, markdown: &str) -> Result<PathBuf, WriteError> {
    let path = book_file_path(dir, book);
    let write = || -> std::io::Result<()> {
        let mut file = File::create(&path)?;
        file.write_all(markdown.as_bytes())?;
        file.flush()
    };

    match write() {
        Ok(()) => Ok(path),
        Err(source) => Err(WriteError { path, source }),
    }
}

/// Dedupes, renders and writes every book. Failures are logged and counted.
pub fn export(books: Vec<Book>, dir: &Path) -> ExportSummary {
    let mut summary = ExportSummary::default();

    for mut book in books {
        remove_duplicate_highlights(&mut book);
        let markdown = render_book(&book);

        match write_book(dir, &book, &markdown) {
            Ok(path) => {
                info!("{} written successfully.", path.display());
                summary.written.push(path);
            }
            Err(e) => {
                warn!("{}", e);
                summary.failed += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Highlight;
    use std::fs;
    use tempfile::tempdir;

    fn book(title: &str, quotes: &[&str]) -> Book {
        Book {
            title: title.to_string(),
            highlights: quotes
                .iter()
                .map(|q| Highlight {
                    info: "Page 1 | Location 10 | Added".to_string(),
                    quote: q.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_write_book_names_file_after_title() {
        let dir = tempdir().unwrap();
        let b = book("Dune", &["spice"]);

        let path = write_book(dir.path(), &b, "# Dune\n\n").unwrap();

        assert_eq!(path, dir.path().join("Dune.md"));
        assert_eq!(fs::read_to_string(path).unwrap(), "# Dune\n\n");
    }

    #[test]
    fn test_write_book_reports_failure() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = write_book(&missing, &book("Dune", &["spice"]), "x");

        let err = result.unwrap_err();
        assert_eq!(err.path, missing.join("Dune.md"));
    }

    #[test]
    fn test_export_continues_after_failure() {
        let dir = tempdir().unwrap();
        let books = vec![
            book("Nested/Missing", &["lost"]),
            book("Dune", &["spice", "spice"]),
        ];

        let summary = export(books, dir.path());

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.written, vec![dir.path().join("Dune.md")]);

        let content = fs::read_to_string(dir.path().join("Dune.md")).unwrap();
        assert_eq!(content.matches("**Spice**").count(), 1);
    }

    #[test]
    fn test_find_clippings_files_in_directory() {
        let dir = tempdir().unwrap();
        let documents = dir.path().join("documents");
        fs::create_dir_all(&documents).unwrap();
        fs::write(documents.join(CLIPPINGS_FILE_NAME), "").unwrap();
        fs::write(documents.join("notes.txt"), "").unwrap();

        let files = find_clippings_files(dir.path()).unwrap();

        assert_eq!(files, vec![documents.join(CLIPPINGS_FILE_NAME)]);
    }

    #[test]
    fn test_find_clippings_files_empty_directory() {
        let dir = tempdir().unwrap();

        let result = find_clippings_files(dir.path());

        assert!(matches!(result, Err(ReadError::NoClippingsFound(_))));
    }

    #[test]
    fn test_find_clippings_files_passes_file_through() {
        let path = Path::new("export.txt");

        assert_eq!(find_clippings_files(path).unwrap(), vec![path.to_path_buf()]);
    }

    #[test]
    fn test_read_clippings_missing_file_is_fatal() {
        let dir = tempdir().unwrap();

        let result = read_clippings(&dir.path().join("nope.txt"));

        assert!(matches!(result, Err(ReadError::Io(_, _))));
    }
}
