//! Catalog statistics

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogStats {
    /// Number of books in the catalog
    pub total_books: usize,
    /// Number of distinct author names
    pub unique_authors: usize,
    /// Author with the most books (first seen wins ties)
    pub top_author: Option<String>,
    /// Number of books by `top_author`
    pub top_author_count: usize,
}
