//! Catalog management service
//!
//! Owns the book store behind a single lock: mutations take the write guard
//! (held across an Open Library lookup), reads take the read guard. The file
//! write of a mutation runs on the blocking pool, never on a runtime worker.

use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use crate::{
    error::{AppError, AppResult},
    models::{Book, CatalogStats},
    repository::BookStore,
    services::{open_library::BookLookup, search, stats},
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<RwLock<BookStore>>,
    lookup: Arc<dyn BookLookup>,
}

impl CatalogService {
    pub fn new(store: BookStore, lookup: Arc<dyn BookLookup>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            lookup,
        }
    }

    /// All books in insertion order
    pub async fn list_books(&self) -> Vec<Book> {
        self.store.read().await.all()
    }

    /// Get a book by ISBN
    pub async fn get_book(&self, isbn: &str) -> AppResult<Book> {
        let isbn = Book::validate_isbn(isbn)?;
        self.store
            .read()
            .await
            .find(&isbn)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))
    }

    /// Add a book from user-supplied fields
    pub async fn create_book(&self, title: &str, author: &str, isbn: &str) -> AppResult<Book> {
        let book = Book::new(title, author, isbn)?;
        let store = self.store.clone().write_owned().await;
        let added = book.clone();
        Self::mutate_blocking(store, move |store| store.add(added)).await?;
        tracing::info!("Added book: {}", book);
        Ok(book)
    }

    /// Add a book from its ISBN, filling title and author from Open Library
    pub async fn import_book(&self, isbn: &str) -> AppResult<Book> {
        let store = self.store.clone().write_owned().await;
        let book = store.prepare_import(self.lookup.as_ref(), isbn).await?;
        let added = book.clone();
        Self::mutate_blocking(store, move |store| store.add(added)).await?;
        tracing::info!("Imported book: {}", book);
        Ok(book)
    }

    /// Delete a book by ISBN
    pub async fn delete_book(&self, isbn: &str) -> AppResult<()> {
        let isbn = Book::validate_isbn(isbn)?;
        let store = self.store.clone().write_owned().await;
        let target = isbn.clone();
        if Self::mutate_blocking(store, move |store| store.remove(&target)).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Book with ISBN {} not found", isbn)))
        }
    }

    /// Run a persisting store call on the blocking pool, keeping the write
    /// guard until it returns.
    async fn mutate_blocking<T, F>(mut store: OwnedRwLockWriteGuard<BookStore>, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut BookStore) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(move || f(&mut store))
            .await
            .map_err(|e| AppError::Internal(format!("Storage task failed: {}", e)))?
    }

    /// Search title, author and ISBN
    pub async fn search_books(&self, query: &str) -> AppResult<Vec<Book>> {
        let query = search::prepare_query(query)?;
        let store = self.store.read().await;
        Ok(search::search(&query, store.books()))
    }

    pub async fn count(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn stats(&self) -> CatalogStats {
        stats::compute(self.store.read().await.books())
    }
}
