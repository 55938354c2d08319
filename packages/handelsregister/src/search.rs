//! Submitting the advanced search form and parsing the result page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::config::{ENTRY_PATH, RESULTS_PER_PAGE};
use crate::context::{SessionContext, VIEW_STATE_FIELD, VIEW_STATE_SELECTOR};
use crate::error::{RegistryError, Result};
use crate::html::{element_text, select_attr, select_text};
use crate::http::{Request, Transport};
use crate::identifier::parse_identifier;
use crate::types::{ResultItem, SearchQuery, SearchResponse};

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static ACTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[action]").expect("valid selector"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static RESULT_COUNT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"label[id$="anzahlTreffer"]"#).expect("valid selector"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-ri]").expect("valid selector"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".marginLeft20").expect("valid selector"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static IDENTIFIER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".fontWeightBold").expect("valid selector"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static DOCUMENT_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[onclick*="Dokumentart.SI"]"#).expect("valid selector")
});

/// Field name of a row's structured-content link inside its onclick handler.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static RETRIEVAL_TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"ergebnissForm:selectedSuchErgebnisFormTable:[^'"]*"#).expect("valid regex")
});

/// First number in the result-count label.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HIT_COUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d.]*").expect("valid regex"));

/// Build the search form in the field order the browser submits it.
///
/// Unset filters are sent as empty values, like an untouched form.
pub fn build_search_form(context: &SessionContext, query: &SearchQuery) -> Vec<(String, String)> {
    let mut form: Vec<(String, String)> = vec![
        ("form".into(), "form".into()),
        ("form:btnSuche".into(), String::new()),
        (VIEW_STATE_FIELD.into(), context.view_state().into()),
        ("form:schlagwoerter".into(), query.keywords.join(" ")),
        (
            "form:schlagwortOptionen".into(),
            query.keyword_mode.form_value().into(),
        ),
    ];

    if query.similar_sounding {
        form.push((
            "form:aenlichLautendeSchlagwoerterBoolChkbox_input".into(),
            "on".into(),
        ));
    }

    form.push((
        "form:registerArt_input".into(),
        query
            .register_type
            .map(|r| r.as_str().to_string())
            .unwrap_or_default(),
    ));
    form.push((
        "form:registerNummer".into(),
        query.registry_id.clone().unwrap_or_default(),
    ));
    form.push((
        "form:registergericht_input".into(),
        query.court_code.clone().unwrap_or_default(),
    ));
    form.push((
        "form:rechtsform_input".into(),
        query.legal_form_code.clone().unwrap_or_default(),
    ));
    form.push((
        "form:ergebnisseProSeite_input".into(),
        RESULTS_PER_PAGE.to_string(),
    ));

    for state in &query.states {
        form.push((state.form_field(), "on".into()));
    }

    form
}

/// Submit a search within the session that produced `context`.
pub fn search<T: Transport>(
    transport: &T,
    context: &SessionContext,
    query: &SearchQuery,
) -> Result<SearchResponse> {
    tracing::debug!(query = %query.describe(), "Submitting search");
    let form = build_search_form(context, query);
    let response = transport.execute(&Request::post(ENTRY_PATH, form))?;
    let result = parse_search_response(&response.body, context)?;
    tracing::debug!(
        items = result.items.len(),
        truncated = result.truncated,
        warnings = result.warnings.len(),
        "Parsed search results"
    );
    Ok(result)
}

/// Parse a result page.
///
/// Rows whose court is not in the reference tables are skipped and reported
/// in `warnings`; any other row that cannot be parsed fails the whole page.
pub fn parse_search_response(html: &str, context: &SessionContext) -> Result<SearchResponse> {
    let document = Html::parse_document(html);

    let action_url = select_attr(&document, &ACTION_SELECTOR, "action")
        .ok_or_else(|| RegistryError::protocol("action attribute", "search results"))?;

    let view_state = select_attr(&document, &VIEW_STATE_SELECTOR, "value")
        .ok_or_else(|| RegistryError::protocol(VIEW_STATE_FIELD, "search results"))?;

    let mut items = Vec::new();
    let mut warnings = Vec::new();

    for row in document.select(&ROW_SELECTOR) {
        match parse_row(row, context) {
            Ok(item) => items.push(item),
            Err(RegistryError::UnknownCourt(court)) => {
                let text = select_text(row, &IDENTIFIER_SELECTOR).unwrap_or_default();
                tracing::warn!(court = %court, identifier = %text, "Skipping row with unknown court");
                warnings.push(format!("Unknown court '{court}' in '{text}'"));
            }
            Err(e) => return Err(e),
        }
    }

    let truncated = is_truncated(&document, items.len() + warnings.len());

    Ok(SearchResponse {
        action_url,
        view_state,
        truncated,
        items,
        warnings,
    })
}

fn parse_row(row: ElementRef<'_>, context: &SessionContext) -> Result<ResultItem> {
    let identifier_text = select_text(row, &IDENTIFIER_SELECTOR)
        .ok_or_else(|| RegistryError::protocol("register identifier", "result row"))?;
    let identifier = parse_identifier(&identifier_text, context)?;

    let title = select_text(row, &TITLE_SELECTOR).unwrap_or_default();

    Ok(ResultItem {
        title,
        court_code: identifier.court_code,
        register_type: identifier.register_type,
        registry_id: identifier.registry_id,
        retrieval_token: extract_retrieval_token(row),
    })
}

/// Field name identifying the row's structured-content document.
fn extract_retrieval_token(row: ElementRef<'_>) -> Option<String> {
    let onclick = row
        .select(&DOCUMENT_LINK_SELECTOR)
        .next()?
        .value()
        .attr("onclick")?;
    RETRIEVAL_TOKEN_PATTERN
        .find(onclick)
        .map(|m| m.as_str().to_string())
}

/// Whether the portal reports more hits than it rendered.
///
/// The count label only appears when the hit list is cut off. When its
/// number is readable it must exceed the rendered rows.
fn is_truncated(document: &Html, rendered: usize) -> bool {
    let Some(label) = document.select(&RESULT_COUNT_SELECTOR).next() else {
        return false;
    };
    let text = element_text(label);
    match HIT_COUNT_PATTERN
        .find(&text)
        .and_then(|m| m.as_str().replace('.', "").parse::<usize>().ok())
    {
        Some(count) => count > rendered,
        None => true,
    }
}
