//! Client service that ties the protocol steps together.
//!
//! Every public operation opens its own session (cookie jar, connection
//! pool, view state), runs to completion and drops the session. Nothing is
//! shared between calls except the configuration, so separate threads may
//! use clones of one client freely.

use crate::config::ClientConfig;
use crate::context::load_context;
use crate::error::Result;
use crate::http::open_session;
use crate::listing::{list, ListKind};
use crate::search::search;
use crate::types::{Document, RegisterType, SearchQuery, SearchResponse};

#[derive(Debug, Clone, Default)]
pub struct HandelsregisterClient {
    config: ClientConfig,
}

impl HandelsregisterClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Search the register.
    ///
    /// # Arguments
    /// * `query` - Filters for the advanced search; may be empty
    ///
    /// # Returns
    /// Parsed result page, including rows skipped for unknown courts as warnings
    pub fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let session = open_session(&self.config)?;
        let context = load_context(&session)?;
        search(&session, &context, query)
    }

    /// Download the structured register content (XML) of one entry.
    ///
    /// # Arguments
    /// * `register_type` - Register the entry belongs to
    /// * `registry_id` - Number within that register (e.g., "61732")
    /// * `court_code` - Code of the register court (see `list(ListKind::Courts)`)
    pub fn fetch_document(
        &self,
        register_type: RegisterType,
        registry_id: &str,
        court_code: &str,
    ) -> Result<Document> {
        let session = open_session(&self.config)?;
        crate::document::fetch_document(&session, register_type, registry_id, court_code)
    }

    /// List a reference table as `(code, name)` pairs sorted by code.
    pub fn list(&self, kind: ListKind) -> Result<Vec<(String, String)>> {
        let session = open_session(&self.config)?;
        list(&session, kind)
    }
}
