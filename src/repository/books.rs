//! File-backed book store
//!
//! The whole catalog lives in memory and is rewritten to a single JSON file
//! after every mutation. The write is a plain overwrite (no temp file and
//! rename), so a crash mid-write can leave a truncated file; the next load
//! then starts from an empty catalog. Only one store may own a file at a time.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{
    error::{AppError, AppResult},
    models::Book,
    services::open_library::BookLookup,
};

pub struct BookStore {
    path: PathBuf,
    books: Vec<Book>,
}

impl BookStore {
    /// Open the store backed by `path`, loading any books already saved there.
    ///
    /// A missing file yields an empty store. An unreadable or corrupt file is
    /// logged and also yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let books = match Self::load(&path) {
            Ok(Some(books)) => {
                tracing::info!("Loaded {} books from {}", books.len(), path.display());
                books
            }
            Ok(None) => {
                tracing::info!("No catalog file at {}, starting empty", path.display());
                Vec::new()
            }
            Err(e) => {
                tracing::error!("{}; starting with an empty catalog", e);
                Vec::new()
            }
        };

        Self { path, books }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a book and persist. Fails with `Conflict` if the ISBN is taken.
    pub fn add(&mut self, book: Book) -> AppResult<()> {
        if self.find(book.isbn()).is_some() {
            tracing::info!("Rejected duplicate ISBN {}", book.isbn());
            return Err(AppError::Conflict(format!(
                "A book with ISBN {} already exists",
                book.isbn()
            )));
        }

        self.books.push(book);
        if let Err(e) = self.save() {
            self.books.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Remove the book with this ISBN and persist. Returns whether one was removed.
    pub fn remove(&mut self, isbn: &str) -> AppResult<bool> {
        let Some(index) = self.books.iter().position(|b| b.isbn() == isbn) else {
            return Ok(false);
        };

        let removed = self.books.remove(index);
        if let Err(e) = self.save() {
            self.books.insert(index, removed);
            return Err(e);
        }
        tracing::info!("Removed book: {}", removed);
        Ok(true)
    }

    pub fn find(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.isbn() == isbn)
    }

    /// Snapshot of all books in insertion order
    pub fn all(&self) -> Vec<Book> {
        self.books.clone()
    }

    /// Borrow the books without copying
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Look a book up by ISBN and add it.
    pub async fn add_by_isbn(&mut self, lookup: &dyn BookLookup, isbn: &str) -> AppResult<Book> {
        let book = self.prepare_import(lookup, isbn).await?;
        self.add(book.clone())?;

        tracing::info!("Imported book: {}", book);
        Ok(book)
    }

    /// Validate the ISBN, check it is free and build the record from a lookup,
    /// without touching the store.
    ///
    /// The duplicate check runs before the lookup so a known ISBN never costs
    /// a network round trip.
    pub async fn prepare_import(&self, lookup: &dyn BookLookup, isbn: &str) -> AppResult<Book> {
        let isbn = Book::validate_isbn(isbn)?;
        if self.find(&isbn).is_some() {
            return Err(AppError::Conflict(format!(
                "A book with ISBN {} already exists",
                isbn
            )));
        }

        let fetched = lookup.fetch(&isbn).await?;
        Book::new(&fetched.title, &fetched.author, &isbn)
    }

    /// Overwrite the backing file with the current catalog
    fn save(&self) -> AppResult<()> {
        let json = serde_json::to_string_pretty(&self.books)?;
        fs::write(&self.path, json).map_err(|e| {
            tracing::error!("Failed to write {}: {}", self.path.display(), e);
            AppError::Storage(e)
        })
    }

    /// Read the backing file. `Ok(None)` means there is no file yet.
    fn load(path: &Path) -> AppResult<Option<Vec<Book>>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::StorageCorrupt(format!(
                    "Cannot read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let books: Vec<Book> = serde_json::from_str(&contents).map_err(|e| {
            AppError::StorageCorrupt(format!("Corrupt catalog file {}: {}", path.display(), e))
        })?;

        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = books.iter().find(|b| !seen.insert(b.isbn())) {
            return Err(AppError::StorageCorrupt(format!(
                "Corrupt catalog file {}: duplicate ISBN {}",
                path.display(),
                dup.isbn()
            )));
        }

        Ok(Some(books))
    }
}
