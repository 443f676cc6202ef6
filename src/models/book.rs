//! Book record model.
//!
//! A `Book` can only be obtained through [`Book::new`] or by deserializing a
//! stored record, and both paths validate every field. Title and author are
//! HTML-escaped once, at construction; stored records are already escaped and
//! are checked rather than escaped again.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

pub const MAX_TITLE_LEN: usize = 500;
pub const MAX_AUTHOR_LEN: usize = 200;
pub const MAX_ISBN_LEN: usize = 20;

static ISBN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9\-X]+$").expect("valid ISBN regex"));

/// The entities `escape_html` produces
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(?:amp|lt|gt|quot|#x27);").expect("valid entity regex"));

/// A validated, immutable book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "StoredBook")]
pub struct Book {
    /// Title, HTML-escaped
    #[schema(example = "Nineteen Eighty-Four")]
    title: String,
    /// Author display name, HTML-escaped
    #[schema(example = "George Orwell")]
    author: String,
    /// ISBN (digits, hyphens and `X`)
    #[schema(example = "978-0451524935")]
    isbn: String,
}

/// Shape of a record as written to the catalog file
#[derive(Deserialize)]
struct StoredBook {
    title: String,
    author: String,
    isbn: String,
}

impl Book {
    /// Build a book from raw user or lookup input.
    pub fn new(title: &str, author: &str, isbn: &str) -> AppResult<Self> {
        let title = escaped_field("Title", title, MAX_TITLE_LEN)?;
        let author = escaped_field("Author", author, MAX_AUTHOR_LEN)?;
        let isbn = Self::validate_isbn(isbn)?;

        Ok(Self { title, author, isbn })
    }

    /// Check an ISBN and return its trimmed form.
    pub fn validate_isbn(isbn: &str) -> AppResult<String> {
        let isbn = isbn.trim();
        if isbn.is_empty() {
            return Err(AppError::InvalidInput("ISBN must not be empty".to_string()));
        }
        if !ISBN_RE.is_match(isbn) {
            return Err(AppError::InvalidInput(
                "Invalid ISBN format (only digits, '-' and 'X' allowed)".to_string(),
            ));
        }
        if isbn.chars().count() > MAX_ISBN_LEN {
            return Err(AppError::InvalidInput(format!(
                "ISBN too long (maximum {} characters)",
                MAX_ISBN_LEN
            )));
        }
        Ok(isbn.to_string())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }
}

impl TryFrom<StoredBook> for Book {
    type Error = AppError;

    fn try_from(stored: StoredBook) -> AppResult<Self> {
        let title = stored_field("Title", &stored.title, MAX_TITLE_LEN)?;
        let author = stored_field("Author", &stored.author, MAX_AUTHOR_LEN)?;
        let isbn = Self::validate_isbn(&stored.isbn)?;

        Ok(Self { title, author, isbn })
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} (ISBN: {})", self.title, self.author, self.isbn)
    }
}

/// Escape markup-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn escaped_field(name: &str, raw: &str, max_len: usize) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} must not be empty", name)));
    }

    let escaped = escape_html(trimmed);
    check_length(name, &escaped, max_len)?;
    Ok(escaped)
}

fn stored_field(name: &str, value: &str, max_len: usize) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} must not be empty", name)));
    }
    let bare_ampersand = trimmed.matches('&').count() != ENTITY_RE.find_iter(trimmed).count();
    if bare_ampersand || trimmed.contains(['<', '>', '"', '\'']) {
        return Err(AppError::InvalidInput(format!(
            "{} contains unescaped markup",
            name
        )));
    }

    check_length(name, trimmed, max_len)?;
    Ok(trimmed.to_string())
}

fn check_length(name: &str, value: &str, max_len: usize) -> AppResult<()> {
    if value.chars().count() > max_len {
        return Err(AppError::InvalidInput(format!(
            "{} too long (maximum {} characters)",
            name, max_len
        )));
    }
    Ok(())
}
