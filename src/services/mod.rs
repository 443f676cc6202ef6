//! Business logic services

pub mod catalog;
pub mod open_library;
pub mod search;
pub mod stats;

use std::sync::Arc;

use crate::{config::AppConfig, error::AppResult, repository::BookStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Open the catalog file and build the Open Library client
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let store = BookStore::open(&config.storage.path);
        tracing::info!("Catalog file: {} ({} books)", store.path().display(), store.len());
        let lookup = open_library::OpenLibraryClient::new(&config.open_library)?;

        Ok(Self {
            catalog: catalog::CatalogService::new(store, Arc::new(lookup)),
        })
    }
}
