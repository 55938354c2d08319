//! Core data types for queries and results.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Kinds of register kept by the German register courts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegisterType {
    /// Handelsregister Abteilung A (sole traders, partnerships).
    #[serde(rename = "HRA")]
    Hra,

    /// Handelsregister Abteilung B (corporations).
    #[serde(rename = "HRB")]
    Hrb,

    /// Genossenschaftsregister (cooperatives).
    #[serde(rename = "GnR")]
    Gnr,

    /// Partnerschaftsregister (professional partnerships).
    #[serde(rename = "PR")]
    Pr,

    /// Vereinsregister (registered associations).
    #[serde(rename = "VR")]
    Vr,

    /// Gesellschaftsregister (civil-law partnerships).
    #[serde(rename = "GsR")]
    Gsr,
}

impl RegisterType {
    /// All register types, ordered by code.
    pub const ALL: [RegisterType; 6] = [
        Self::Gnr,
        Self::Gsr,
        Self::Hra,
        Self::Hrb,
        Self::Pr,
        Self::Vr,
    ];

    /// Code as used by the portal and in compound identifiers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hra => "HRA",
            Self::Hrb => "HRB",
            Self::Gnr => "GnR",
            Self::Pr => "PR",
            Self::Vr => "VR",
            Self::Gsr => "GsR",
        }
    }

    /// Full German name of the register.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Hra => "Handelsregister Abteilung A",
            Self::Hrb => "Handelsregister Abteilung B",
            Self::Gnr => "Genossenschaftsregister",
            Self::Pr => "Partnerschaftsregister",
            Self::Vr => "Vereinsregister",
            Self::Gsr => "Gesellschaftsregister",
        }
    }

    /// Exact, case-sensitive lookup of a register code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == code)
    }
}

impl fmt::Display for RegisterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegisterType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| RegistryError::InvalidRegisterType(s.to_string()))
    }
}

/// The sixteen federal states, each a checkbox on the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum State {
    BadenWuerttemberg,
    Bayern,
    Berlin,
    Brandenburg,
    Bremen,
    Hamburg,
    Hessen,
    MecklenburgVorpommern,
    Niedersachsen,
    NordrheinWestfalen,
    RheinlandPfalz,
    Saarland,
    Sachsen,
    SachsenAnhalt,
    SchleswigHolstein,
    Thueringen,
}

impl State {
    pub const ALL: [State; 16] = [
        Self::BadenWuerttemberg,
        Self::Bayern,
        Self::Berlin,
        Self::Brandenburg,
        Self::Bremen,
        Self::Hamburg,
        Self::Hessen,
        Self::MecklenburgVorpommern,
        Self::Niedersachsen,
        Self::NordrheinWestfalen,
        Self::RheinlandPfalz,
        Self::Saarland,
        Self::Sachsen,
        Self::SachsenAnhalt,
        Self::SchleswigHolstein,
        Self::Thueringen,
    ];

    /// Name as it appears in the portal's checkbox field.
    #[must_use]
    pub fn portal_name(&self) -> &'static str {
        match self {
            Self::BadenWuerttemberg => "Baden-Wuerttemberg",
            Self::Bayern => "Bayern",
            Self::Berlin => "Berlin",
            Self::Brandenburg => "Brandenburg",
            Self::Bremen => "Bremen",
            Self::Hamburg => "Hamburg",
            Self::Hessen => "Hessen",
            Self::MecklenburgVorpommern => "Mecklenburg-Vorpommern",
            Self::Niedersachsen => "Niedersachsen",
            Self::NordrheinWestfalen => "Nordrhein-Westfalen",
            Self::RheinlandPfalz => "Rheinland-Pfalz",
            Self::Saarland => "Saarland",
            Self::Sachsen => "Sachsen",
            Self::SachsenAnhalt => "Sachsen-Anhalt",
            Self::SchleswigHolstein => "Schleswig-Holstein",
            Self::Thueringen => "Thueringen",
        }
    }

    /// Form field that selects this state.
    #[must_use]
    pub fn form_field(&self) -> String {
        format!("form:{}_input", self.portal_name())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.portal_name())
    }
}

impl FromStr for State {
    type Err = RegistryError;

    /// Accepts the portal name in any case, with `ü` or `ue`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('ü', "ue");
        Self::ALL
            .into_iter()
            .find(|state| state.portal_name().to_lowercase() == wanted)
            .ok_or_else(|| RegistryError::InvalidState(s.to_string()))
    }
}

/// How the portal combines the keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordMode {
    /// Every keyword must occur.
    #[default]
    All,
    /// At least one keyword must occur.
    Any,
    /// The keywords form the exact company name.
    Exact,
}

impl KeywordMode {
    /// Value of the `schlagwortOptionen` radio button.
    #[must_use]
    pub fn form_value(&self) -> &'static str {
        match self {
            Self::All => "1",
            Self::Any => "2",
            Self::Exact => "3",
        }
    }
}

/// A search on the advanced search page. Every filter is optional; the
/// default query returns the portal's unfiltered first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keywords: Vec<String>,
    pub keyword_mode: KeywordMode,
    pub similar_sounding: bool,
    pub register_type: Option<RegisterType>,
    pub registry_id: Option<String>,
    pub court_code: Option<String>,
    pub legal_form_code: Option<String>,
    pub states: BTreeSet<State>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            keyword_mode: KeywordMode::default(),
            similar_sounding: true,
            register_type: None,
            registry_id: None,
            court_code: None,
            legal_form_code: None,
            states: BTreeSet::new(),
        }
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keyword_mode(mut self, mode: KeywordMode) -> Self {
        self.keyword_mode = mode;
        self
    }

    pub fn with_similar_sounding(mut self, enabled: bool) -> Self {
        self.similar_sounding = enabled;
        self
    }

    pub fn with_register_type(mut self, register_type: RegisterType) -> Self {
        self.register_type = Some(register_type);
        self
    }

    pub fn with_registry_id(mut self, registry_id: impl Into<String>) -> Self {
        self.registry_id = Some(registry_id.into());
        self
    }

    pub fn with_court(mut self, court_code: impl Into<String>) -> Self {
        self.court_code = Some(court_code.into());
        self
    }

    pub fn with_legal_form(mut self, legal_form_code: impl Into<String>) -> Self {
        self.legal_form_code = Some(legal_form_code.into());
        self
    }

    pub fn with_state(mut self, state: State) -> Self {
        self.states.insert(state);
        self
    }

    /// Short description for log lines and error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.keywords.is_empty() {
            parts.push(format!("'{}'", self.keywords.join(" ")));
        }
        if let Some(register_type) = self.register_type {
            parts.push(register_type.to_string());
        }
        if let Some(id) = &self.registry_id {
            parts.push(id.clone());
        }
        if let Some(court) = &self.court_code {
            parts.push(format!("court {court}"));
        }
        if parts.is_empty() {
            "empty query".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// Structured form of a compound register identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub court_code: String,
    pub register_type: RegisterType,
    pub registry_id: String,
}

/// One row of the result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub title: String,
    pub court_code: String,
    pub register_type: RegisterType,
    pub registry_id: String,

    /// Form field naming this row's structured-content document. `None` when
    /// the row offers no such document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_token: Option<String>,
}

impl ResultItem {
    /// Whether this row identifies the given register entry.
    ///
    /// Numbers are compared on their first word, so `61732` matches the
    /// Berlin form `61732 B`.
    #[must_use]
    pub fn matches(&self, register_type: RegisterType, registry_id: &str, court_code: &str) -> bool {
        self.register_type == register_type
            && self.court_code == court_code
            && number_stem(&self.registry_id) == number_stem(registry_id)
    }
}

fn number_stem(registry_id: &str) -> &str {
    registry_id.split_whitespace().next().unwrap_or_default()
}

/// Parsed result page of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    /// Submission target for the next request of this session.
    pub action_url: String,

    /// View state issued with this page.
    pub view_state: String,

    /// The portal found more hits than it rendered.
    pub truncated: bool,

    pub items: Vec<ResultItem>,

    /// Non-fatal problems with individual rows.
    pub warnings: Vec<String>,
}

/// Raw document returned by the portal (structured register content, XML).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document(String);

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
