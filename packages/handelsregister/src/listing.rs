//! Enumeration of register types, courts and legal forms.

use std::fmt;
use std::str::FromStr;

use crate::context::load_context;
use crate::error::{RegistryError, Result};
use crate::http::Transport;
use crate::types::RegisterType;

/// Which reference table to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Static register types.
    Registers,
    /// Register courts offered by the portal.
    Courts,
    /// Legal forms offered by the portal.
    Types,
}

impl ListKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registers => "registers",
            Self::Courts => "courts",
            Self::Types => "types",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "registers" => Ok(Self::Registers),
            "courts" => Ok(Self::Courts),
            "types" => Ok(Self::Types),
            other => Err(RegistryError::Config(format!(
                "unknown list '{other}', expected registers, courts or types"
            ))),
        }
    }
}

/// Register types as `(code, name)`, sorted by code.
pub fn list_registers() -> Vec<(String, String)> {
    RegisterType::ALL
        .iter()
        .map(|r| (r.as_str().to_string(), r.description().to_string()))
        .collect()
}

/// Register courts as `(code, name)`, sorted by code.
pub fn list_courts<T: Transport>(transport: &T) -> Result<Vec<(String, String)>> {
    let context = load_context(transport)?;
    Ok(context
        .courts()
        .iter()
        .map(|(code, name)| (code.clone(), name.clone()))
        .collect())
}

/// Legal forms as `(code, name)`, sorted by code.
pub fn list_legal_forms<T: Transport>(transport: &T) -> Result<Vec<(String, String)>> {
    let context = load_context(transport)?;
    Ok(context
        .legal_forms()
        .iter()
        .map(|(code, name)| (code.clone(), name.clone()))
        .collect())
}

/// List any table. Only the dynamic tables touch the network.
pub fn list<T: Transport>(transport: &T, kind: ListKind) -> Result<Vec<(String, String)>> {
    match kind {
        ListKind::Registers => Ok(list_registers()),
        ListKind::Courts => list_courts(transport),
        ListKind::Types => list_legal_forms(transport),
    }
}
