//! Persistence layer

pub mod books;

pub use books::BookStore;
