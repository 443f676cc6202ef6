//! Data models for Bookshelf

pub mod book;
pub mod stats;

// Re-export commonly used types
pub use book::Book;
pub use stats::CatalogStats;
