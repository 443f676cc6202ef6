//! Integration tests
//!
//! Open Library is replaced by an axum server bound to a random local port.

mod api_tests;
