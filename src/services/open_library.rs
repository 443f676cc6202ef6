//! Open Library HTTP client
//!
//! Resolves a book from its ISBN in two hops: the edition record gives the
//! title and an author key, the author record gives the display name.
//! See: https://openlibrary.org/developers/api
//!
//! Values are returned unescaped; `Book::new` sanitizes them.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::{
    config::OpenLibraryConfig,
    error::{AppError, AppResult},
    models::book::{MAX_AUTHOR_LEN, MAX_TITLE_LEN},
};

pub const UNKNOWN_TITLE: &str = "Unknown title";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Metadata obtained from the bibliographic service, not yet sanitized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// Failures of a book lookup
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Invalid ISBN: {0}")]
    InvalidInput(String),

    #[error("Lookup service returned HTTP {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidInput(msg) => AppError::InvalidInput(msg),
            LookupError::Status(status) => AppError::LookupFailed {
                status: Some(status),
                message: format!("Book lookup failed with HTTP {}", status),
            },
            LookupError::Malformed(msg) => AppError::LookupFailed {
                status: None,
                message: format!("Malformed response from lookup service: {}", msg),
            },
            LookupError::Network(msg) => AppError::Network(msg),
        }
    }
}

/// Source of book metadata keyed by ISBN
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookLookup: Send + Sync {
    async fn fetch(&self, isbn: &str) -> Result<FetchedBook, LookupError>;
}

mod dto {
    use serde::Deserialize;
    use serde_json::Value;

    /// `GET /isbn/{isbn}.json`
    ///
    /// Fields are kept loosely typed: an odd `title` or `authors` value falls
    /// back to a sentinel instead of failing the whole lookup.
    #[derive(Debug, Deserialize)]
    pub struct EditionResponse {
        #[serde(default)]
        pub title: Option<Value>,
        #[serde(default)]
        pub authors: Option<Value>,
    }

    impl EditionResponse {
        pub fn title(&self) -> Option<&str> {
            self.title.as_ref().and_then(Value::as_str)
        }

        /// Key of the first listed author, e.g. `/authors/OL118077A`
        pub fn first_author_key(&self) -> Option<&str> {
            self.authors
                .as_ref()
                .and_then(Value::as_array)
                .and_then(|authors| authors.first())
                .and_then(|author| author.get("key"))
                .and_then(Value::as_str)
        }
    }

    /// `GET /authors/{id}.json`
    #[derive(Debug, Deserialize)]
    pub struct AuthorResponse {
        #[serde(default)]
        pub name: Option<String>,
    }
}

/// Open Library API client
#[derive(Clone)]
pub struct OpenLibraryClient {
    http_client: reqwest::Client,
    base_url: String,
    book_timeout: Duration,
    author_timeout: Duration,
}

impl OpenLibraryClient {
    pub fn new(config: &OpenLibraryConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            book_timeout: config.book_timeout(),
            author_timeout: config.author_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn edition_url(&self, isbn: &str) -> String {
        format!("{}/isbn/{}.json", self.base_url, isbn)
    }

    fn author_url(&self, key: &str) -> String {
        if key.starts_with('/') {
            format!("{}{}.json", self.base_url, key)
        } else {
            format!("{}/{}.json", self.base_url, key)
        }
    }

    /// GET a URL and decode a JSON body, mapping failures onto `LookupError`
    async fn get_json<T>(&self, url: &str, timeout: Duration) -> Result<T, LookupError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .http_client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::FOUND {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| LookupError::Malformed(e.to_string()))
    }

    /// Resolve an author key to a display name
    async fn resolve_author(&self, key: &str) -> Result<String, LookupError> {
        let author: dto::AuthorResponse = self
            .get_json(&self.author_url(key), self.author_timeout)
            .await?;

        author
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| LookupError::Malformed("author record has no name".to_string()))
    }
}

#[async_trait]
impl BookLookup for OpenLibraryClient {
    async fn fetch(&self, isbn: &str) -> Result<FetchedBook, LookupError> {
        let isbn = isbn.trim();
        if isbn.is_empty() {
            return Err(LookupError::InvalidInput("ISBN must not be empty".to_string()));
        }

        tracing::debug!("Fetching edition for ISBN {}", isbn);
        let edition: dto::EditionResponse = self
            .get_json(&self.edition_url(isbn), self.book_timeout)
            .await?;

        let title = edition
            .title()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNKNOWN_TITLE);

        let author_key = edition
            .first_author_key()
            .filter(|key| !key.trim().is_empty());

        let author = match author_key {
            Some(key) => match self.resolve_author(key.trim()).await {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!("Could not resolve author {} for ISBN {}: {}", key, isbn, e);
                    UNKNOWN_AUTHOR.to_string()
                }
            },
            None => UNKNOWN_AUTHOR.to_string(),
        };

        Ok(FetchedBook {
            title: truncate_chars(title, MAX_TITLE_LEN),
            author: truncate_chars(&author, MAX_AUTHOR_LEN),
            isbn: isbn.to_string(),
        })
    }
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
