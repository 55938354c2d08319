//! Retrieval of the structured register content (XML) of one entry.

use crate::context::{load_context, VIEW_STATE_FIELD};
use crate::error::{RegistryError, Result};
use crate::http::{Request, Transport};
use crate::search::search;
use crate::types::{Document, RegisterType, ResultItem, SearchQuery, SearchResponse};

/// Portal property naming the structured content ("SI") document.
pub const STRUCTURED_CONTENT_PROPERTY: &str = "Global.Dokumentart.SI";

/// Fetch the structured content of a register entry.
///
/// Runs a full session: load the entry page, search for exactly this entry,
/// then request the document of the single matching row.
pub fn fetch_document<T: Transport>(
    transport: &T,
    register_type: RegisterType,
    registry_id: &str,
    court_code: &str,
) -> Result<Document> {
    let context = load_context(transport)?;
    tracing::debug!(state = "CONTEXT_LOADED", "Document fetch");

    let query = SearchQuery::new()
        .with_similar_sounding(false)
        .with_register_type(register_type)
        .with_registry_id(registry_id)
        .with_court(court_code);
    let results = search(transport, &context, &query)?;
    tracing::debug!(state = "SEARCHED", items = results.items.len(), "Document fetch");

    let label = format!("{register_type} {registry_id} at court {court_code}");
    let item = select_item(&results, register_type, registry_id, court_code, &label)?;
    let token = item
        .retrieval_token
        .as_deref()
        .ok_or_else(|| RegistryError::NoDocument(label.clone()))?;

    let response = transport.execute(&build_document_request(&results, token))?;
    tracing::debug!(state = "DOCUMENT_FETCHED", bytes = response.body.len(), "Document fetch");

    Ok(Document::new(response.body))
}

/// Pick the one row describing the requested entry.
///
/// The portal search also matches numbers by prefix, so rows that agree on
/// register type, number and court win. When none agrees, a single returned
/// row is taken as is; several rows are ambiguous.
pub fn select_item<'a>(
    results: &'a SearchResponse,
    register_type: RegisterType,
    registry_id: &str,
    court_code: &str,
    label: &str,
) -> Result<&'a ResultItem> {
    if results.items.is_empty() {
        return Err(RegistryError::NotFound(label.to_string()));
    }

    let mut matches = results
        .items
        .iter()
        .filter(|item| item.matches(register_type, registry_id, court_code));

    match (matches.next(), matches.count()) {
        (None, _) => match results.items.as_slice() {
            [only] => Ok(only),
            items => Err(RegistryError::AmbiguousResult {
                count: items.len(),
                query: label.to_string(),
            }),
        },
        (Some(item), 0) => Ok(item),
        (Some(_), rest) => Err(RegistryError::AmbiguousResult {
            count: rest + 1,
            query: label.to_string(),
        }),
    }
}

/// Second request of the session: ask for the document behind `token`.
///
/// The portal identifies the row by field name, so the token is sent as both
/// name and value.
pub fn build_document_request(results: &SearchResponse, token: &str) -> Request {
    Request::post(
        results.action_url.clone(),
        vec![
            ("ergebnissForm".into(), "ergebnissForm".into()),
            (VIEW_STATE_FIELD.into(), results.view_state.clone()),
            ("property".into(), STRUCTURED_CONTENT_PROPERTY.into()),
            (token.into(), token.into()),
        ],
    )
}
