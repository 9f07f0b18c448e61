//! XML decoding helpers.
//!
//! Response documents carry the `http://api.esendex.com/ns/` default namespace. Bindings match on
//! local names only, so the `xmlns` attribute is ignored rather than validated.

use quick_xml::errors::serialize::DeError;
use serde::{de::DeserializeOwned, Deserialize};

/// Decode a response body into `T`.
pub(crate) fn from_xml<T: DeserializeOwned>(body: &str) -> Result<T, DeError> {
    quick_xml::de::from_str(body.trim_start_matches('\u{feff}'))
}

#[derive(Debug, Deserialize)]
struct ErrorDocument {
    #[serde(rename = "error", default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    description: String,
}

/// Extract a human readable description from an error response body.
///
/// Esendex reports failures as `<errors><error><description>..</description></error></errors>`;
/// when the body has that shape the descriptions are joined, otherwise the trimmed body is used
/// verbatim. Empty bodies yield `None`.
pub(crate) fn error_description(body: &str) -> Option<String> {
    let body = body.trim_start_matches('\u{feff}').trim();
    if body.is_empty() {
        return None;
    }

    let descriptions: Vec<String> = from_xml::<ErrorDocument>(body)
        .map(|document| {
            document
                .errors
                .into_iter()
                .map(|entry| entry.description.trim().to_string())
                .filter(|description| !description.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if descriptions.is_empty() {
        Some(body.to_string())
    } else {
        Some(descriptions.join("; "))
    }
}
