//! HTML utility functions for extracting data from portal pages.

use scraper::{ElementRef, Html, Selector};
use unicode_normalization::UnicodeNormalization;

/// Normalize free text from the markup: NFC, whitespace runs collapsed to a
/// single space, trimmed.
///
/// # Examples
/// ```
/// use handelsregister::html::normalize_text;
///
/// assert_eq!(normalize_text("  Amtsgericht\n   Bonn "), "Amtsgericht Bonn");
/// assert_eq!(normalize_text("fru\u{0308}her"), "früher");
/// ```
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of an element, normalized with [`normalize_text`].
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}

/// Text of the first descendant matching `selector`.
///
/// # Returns
/// `None` if nothing matches
pub fn select_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(element_text)
}

/// Attribute value of the first element in the document matching `selector`.
///
/// # Examples
/// ```
/// use scraper::{Html, Selector};
/// use handelsregister::html::select_attr;
///
/// let doc = Html::parse_document(r#"<form id="f" action="/next.xhtml"></form>"#);
/// let selector = Selector::parse("[action]").unwrap();
/// assert_eq!(select_attr(&doc, &selector, "action"), Some("/next.xhtml".to_string()));
/// ```
pub fn select_attr(document: &Html, selector: &Selector, attr: &str) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

/// `(value, text)` pairs of every `<option>` matched by `selector` that has
/// a non-empty value.
pub fn option_pairs(document: &Html, selector: &Selector) -> Vec<(String, String)> {
    document
        .select(selector)
        .filter_map(|option| {
            let value = option.value().attr("value")?.trim();
            if value.is_empty() {
                return None;
            }
            Some((value.to_string(), element_text(option)))
        })
        .collect()
}
