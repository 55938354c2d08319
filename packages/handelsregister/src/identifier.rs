//! Parsing of compound register identifiers.
//!
//! Result rows print the register entry as one string, for example
//! `Amtsgericht Berlin (Charlottenburg) HRB 61732` or
//! `Amtsgericht Hamm VR 10190 früher Amtsgericht Kamen`. The first word names
//! the kind of court, then come the court name, the register type and the
//! number. A trailing `früher ...` names the previous court and is dropped.
//!
//! The register type is the rightmost register code strictly inside the word
//! sequence. A court name that itself contains a register code would be split
//! at the wrong place; no such court exists today.

use crate::context::SessionContext;
use crate::error::{RegistryError, Result};
use crate::html::normalize_text;
use crate::types::{Identifier, RegisterType};

/// Marker introducing the previous registration.
const FORMERLY_MARKER: &str = "früher";

/// Identifier with the court still given by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIdentifier {
    pub court_name: String,
    pub register_type: RegisterType,
    pub registry_id: String,
}

/// Split a compound identifier into court name, register type and number.
///
/// # Examples
/// ```
/// use handelsregister::identifier::split_identifier;
/// use handelsregister::types::RegisterType;
///
/// let raw = split_identifier("Amtsgericht Bonn VR 5752").unwrap();
/// assert_eq!(raw.court_name, "Bonn");
/// assert_eq!(raw.register_type, RegisterType::Vr);
/// assert_eq!(raw.registry_id, "5752");
/// ```
pub fn split_identifier(text: &str) -> Result<RawIdentifier> {
    let normalized = normalize_text(text);
    let words: Vec<&str> = normalized.split(' ').collect();

    let (position, register_type) = (1..words.len().saturating_sub(1))
        .rev()
        .find_map(|i| RegisterType::from_code(words[i]).map(|r| (i, r)))
        .ok_or_else(|| RegistryError::Parse(text.to_string()))?;

    let tail = &words[position + 1..];
    let tail = match tail.iter().position(|w| *w == FORMERLY_MARKER) {
        Some(end) => &tail[..end],
        None => tail,
    };

    Ok(RawIdentifier {
        court_name: words[1..position].join(" "),
        register_type,
        registry_id: tail.join(" "),
    })
}

/// Parse a compound identifier and resolve the court to its code.
pub fn parse_identifier(text: &str, context: &SessionContext) -> Result<Identifier> {
    let raw = split_identifier(text)?;
    let court_code = context
        .court_code(&raw.court_name)
        .ok_or_else(|| RegistryError::UnknownCourt(raw.court_name.clone()))?
        .to_string();

    Ok(Identifier {
        court_code,
        register_type: raw.register_type,
        registry_id: raw.registry_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(court: &str, register_type: RegisterType, id: &str) -> RawIdentifier {
        RawIdentifier {
            court_name: court.to_string(),
            register_type,
            registry_id: id.to_string(),
        }
    }

    fn context() -> SessionContext {
        SessionContext::from_tables(
            "vs",
            [
                ("D3201".to_string(), "Bonn".to_string()),
                ("F1103".to_string(), "Berlin (Charlottenburg)".to_string()),
                ("R2101".to_string(), "Hamm".to_string()),
            ],
            [],
        )
    }

    #[test]
    fn test_vr() {
        assert_eq!(
            split_identifier("Amtsgericht Bonn VR 5752").unwrap(),
            raw("Bonn", RegisterType::Vr, "5752")
        );
    }

    #[test]
    fn test_hrb_multi_word_court() {
        assert_eq!(
            split_identifier("Amtsgericht Berlin (Charlottenburg) HRB 61732").unwrap(),
            raw("Berlin (Charlottenburg)", RegisterType::Hrb, "61732")
        );
    }

    #[test]
    fn test_formerly_tail_is_dropped() {
        assert_eq!(
            split_identifier("Amtsgericht Hamm VR 10190 früher Amtsgericht Kamen").unwrap(),
            raw("Hamm", RegisterType::Vr, "10190")
        );
    }

    #[test]
    fn test_formerly_with_decomposed_umlaut() {
        assert_eq!(
            split_identifier("Amtsgericht Hamm VR 10190 fru\u{0308}her Amtsgericht Kamen").unwrap(),
            raw("Hamm", RegisterType::Vr, "10190")
        );
    }

    #[test]
    fn test_every_register_type() {
        for register_type in RegisterType::ALL {
            let text = format!("Amtsgericht Frankfurt am Main {register_type} 12345");
            assert_eq!(
                split_identifier(&text).unwrap(),
                raw("Frankfurt am Main", register_type, "12345")
            );
        }
    }

    #[test]
    fn test_multi_word_registry_id() {
        assert_eq!(
            split_identifier("Amtsgericht Charlottenburg HRB 12345 B").unwrap(),
            raw("Charlottenburg", RegisterType::Hrb, "12345 B")
        );
    }

    #[test]
    fn test_rightmost_code_wins() {
        // HRA earlier in the string is part of the court name.
        assert_eq!(
            split_identifier("Amtsgericht Foo HRA Bar HRB 1").unwrap(),
            raw("Foo HRA Bar", RegisterType::Hrb, "1")
        );
    }

    #[test]
    fn test_code_in_last_position_is_ignored() {
        assert!(matches!(
            split_identifier("Amtsgericht Bonn VR"),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn test_code_in_first_position_is_ignored() {
        assert!(matches!(
            split_identifier("HRB Bonn 5752"),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn test_no_register_type() {
        assert!(matches!(
            split_identifier("Amtsgericht Bonn 5752"),
            Err(RegistryError::Parse(_))
        ));
        assert!(matches!(split_identifier(""), Err(RegistryError::Parse(_))));
    }

    #[test]
    fn test_lowercase_code_is_not_a_register_type() {
        assert!(split_identifier("Amtsgericht Bonn vr 5752").is_err());
    }

    #[test]
    fn test_parse_identifier_resolves_court() {
        let identifier =
            parse_identifier("Amtsgericht Berlin (Charlottenburg) HRB 61732", &context()).unwrap();
        assert_eq!(
            identifier,
            Identifier {
                court_code: "F1103".to_string(),
                register_type: RegisterType::Hrb,
                registry_id: "61732".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_identifier_unknown_court() {
        let err = parse_identifier("Amtsgericht Kamen VR 1", &context()).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownCourt(name) if name == "Kamen"));
    }
}
