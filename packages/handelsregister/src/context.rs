//! Reference data and view state loaded from the portal's entry page.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::config::ENTRY_PATH;
use crate::error::{RegistryError, Result};
use crate::html::{option_pairs, select_attr};
use crate::http::{Request, Transport};

/// Name of the hidden input carrying the JSF view state.
pub const VIEW_STATE_FIELD: &str = "javax.faces.ViewState";

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
pub(crate) static VIEW_STATE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"input[name="javax.faces.ViewState"]"#).expect("valid selector")
});

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static COURT_OPTIONS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"select[name="form:registergericht_input"] option"#).expect("valid selector")
});

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static LEGAL_FORM_OPTIONS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"select[name="form:rechtsform_input"] option"#).expect("valid selector")
});

/// State of one operation after loading the entry page.
///
/// Immutable once built. Each operation loads its own context; the view
/// state is only valid within the session that received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    view_state: String,
    courts: BTreeMap<String, String>,
    reverse_courts: BTreeMap<String, String>,
    legal_forms: BTreeMap<String, String>,
}

impl SessionContext {
    /// Build a context from code→name tables, deriving the name→code lookup.
    pub fn from_tables<C, L>(view_state: impl Into<String>, courts: C, legal_forms: L) -> Self
    where
        C: IntoIterator<Item = (String, String)>,
        L: IntoIterator<Item = (String, String)>,
    {
        let courts: BTreeMap<String, String> = courts.into_iter().collect();
        let reverse_courts = courts
            .iter()
            .map(|(code, name)| (name.clone(), code.clone()))
            .collect();
        Self {
            view_state: view_state.into(),
            courts,
            reverse_courts,
            legal_forms: legal_forms.into_iter().collect(),
        }
    }

    pub fn view_state(&self) -> &str {
        &self.view_state
    }

    /// Court code → display name, ordered by code.
    pub fn courts(&self) -> &BTreeMap<String, String> {
        &self.courts
    }

    /// Legal-form code → display name, ordered by code.
    pub fn legal_forms(&self) -> &BTreeMap<String, String> {
        &self.legal_forms
    }

    pub fn court_name(&self, code: &str) -> Option<&str> {
        self.courts.get(code).map(String::as_str)
    }

    /// Court code for a display name as printed in result rows.
    pub fn court_code(&self, name: &str) -> Option<&str> {
        self.reverse_courts.get(name).map(String::as_str)
    }
}

/// Load the entry page and extract the session context.
pub fn load_context<T: Transport>(transport: &T) -> Result<SessionContext> {
    let response = transport.execute(&Request::get(ENTRY_PATH))?;
    let context = parse_context(&response.body)?;
    tracing::debug!(
        courts = context.courts.len(),
        legal_forms = context.legal_forms.len(),
        "Loaded session context"
    );
    Ok(context)
}

/// Extract view state and reference tables from the entry page markup.
pub fn parse_context(html: &str) -> Result<SessionContext> {
    let document = Html::parse_document(html);

    let view_state = select_attr(&document, &VIEW_STATE_SELECTOR, "value")
        .ok_or_else(|| RegistryError::protocol(VIEW_STATE_FIELD, "entry page"))?;

    let courts = option_pairs(&document, &COURT_OPTIONS);
    let legal_forms = option_pairs(&document, &LEGAL_FORM_OPTIONS);

    if courts.is_empty() {
        tracing::warn!("Entry page lists no register courts");
    }

    Ok(SessionContext::from_tables(view_state, courts, legal_forms))
}
