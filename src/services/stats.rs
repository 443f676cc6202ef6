//! Catalog statistics

use indexmap::IndexMap;

use crate::models::{Book, CatalogStats};

/// Compute statistics over the catalog
pub fn compute(books: &[Book]) -> CatalogStats {
    // IndexMap keeps first-seen order, so ties go to the earliest author
    let mut per_author: IndexMap<&str, usize> = IndexMap::new();
    for book in books {
        *per_author.entry(book.author()).or_insert(0) += 1;
    }

    let mut top: Option<(&str, usize)> = None;
    for (author, count) in &per_author {
        if top.map_or(true, |(_, best)| *count > best) {
            top = Some((*author, *count));
        }
    }

    CatalogStats {
        total_books: books.len(),
        unique_authors: per_author.len(),
        top_author: top.map(|(author, _)| author.to_string()),
        top_author_count: top.map_or(0, |(_, count)| count),
    }
}
