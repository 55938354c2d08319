//! Handelsregister client - search the German business register and fetch
//! structured register content.
//!
//! The portal is a stateful JSF application: every request must echo the
//! view state issued with the previous page, and the document download only
//! works within the session that ran the search. Each operation therefore
//! runs the whole sequence itself:
//!
//! 1. load the entry page ([`context`]) for view state and reference tables,
//! 2. submit the search form ([`search`]) and parse the result rows
//!    ([`identifier`]),
//! 3. optionally request the document behind one row ([`document`]).
//!
//! # Example
//!
//! ```
//! use handelsregister::identifier::split_identifier;
//! use handelsregister::RegisterType;
//!
//! let raw = split_identifier("Amtsgericht Berlin (Charlottenburg) HRB 61732").unwrap();
//! assert_eq!(raw.court_name, "Berlin (Charlottenburg)");
//! assert_eq!(raw.register_type, RegisterType::Hrb);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and client settings
//! - [`types`]: Queries, result rows, register types, federal states
//! - [`error`]: Error types and Result alias
//! - [`http`]: Transport trait, reqwest transport, retry decorator
//! - [`html`]: HTML extraction helpers
//! - [`context`]: Entry page parsing (view state, courts, legal forms)
//! - [`identifier`]: Compound register identifier parsing
//! - [`search`]: Search form construction and result parsing
//! - [`document`]: Structured content download
//! - [`listing`]: Reference table enumeration
//! - [`client`]: One-session-per-operation facade
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod html;
pub mod http;
pub mod identifier;
pub mod listing;
pub mod search;
pub mod types;

pub use client::HandelsregisterClient;
pub use config::ClientConfig;
pub use context::SessionContext;
pub use error::{RegistryError, Result};
pub use listing::ListKind;
pub use types::{
    Document, Identifier, KeywordMode, RegisterType, ResultItem, SearchQuery, SearchResponse,
    State,
};
