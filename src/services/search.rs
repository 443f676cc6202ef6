//! Linear catalog search

use crate::{
    error::{AppError, AppResult},
    models::{book::escape_html, Book},
};

pub const MAX_QUERY_LEN: usize = 100;

/// Books whose title, author or ISBN contains `query`, ignoring case.
///
/// Results keep the catalog order.
pub fn search(query: &str, books: &[Book]) -> Vec<Book> {
    let needle = query.to_lowercase();
    books
        .iter()
        .filter(|book| {
            book.title().to_lowercase().contains(&needle)
                || book.author().to_lowercase().contains(&needle)
                || book.isbn().to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Validate a user query and bring it into the stored (escaped) form.
pub fn prepare_query(raw: &str) -> AppResult<String> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput("Search query must not be empty".to_string()));
    }
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(AppError::InvalidInput(format!(
            "Search query too long (maximum {} characters)",
            MAX_QUERY_LEN
        )));
    }
    Ok(escape_html(query))
}
