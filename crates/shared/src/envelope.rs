//! List envelopes returned by the plan backend
//!
//! The same logical endpoint family answers with `{ "response": { "data": [...] } }`
//! on most routes and `{ "data": { "data": [...] } }` on others. A few
//! integration routes return the bare array. Which one is canonical is a
//! backend question, so every shape is accepted and the matched shape is
//! reported to the caller.

use serde_json::Value;

/// Which envelope a list was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// `{ "response": { "data": [...] } }`
    ResponseData,
    /// `{ "data": { "data": [...] } }`
    DataData,
    /// `[...]`
    BareArray,
}

impl std::fmt::Display for EnvelopeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvelopeShape::ResponseData => write!(f, "response.data"),
            EnvelopeShape::DataData => write!(f, "data.data"),
            EnvelopeShape::BareArray => write!(f, "array"),
        }
    }
}

/// Locate the record list inside a response body
///
/// `response.data` is tried first, then `data.data`, then a bare array.
/// Returns `None` when no shape carries an array.
pub fn extract_list(body: &Value) -> Option<(EnvelopeShape, &[Value])> {
    if let Some(list) = nested_array(body, "response", "data") {
        return Some((EnvelopeShape::ResponseData, list));
    }
    if let Some(list) = nested_array(body, "data", "data") {
        return Some((EnvelopeShape::DataData, list));
    }
    body.as_array()
        .map(|list| (EnvelopeShape::BareArray, list.as_slice()))
}

fn nested_array<'a>(body: &'a Value, outer: &str, inner: &str) -> Option<&'a [Value]> {
    body.get(outer)?
        .get(inner)?
        .as_array()
        .map(Vec::as_slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_data_envelope() {
        let body = json!({ "response": { "data": [{ "id": 1 }, { "id": 2 }] } });
        let (shape, list) = extract_list(&body).unwrap();
        assert_eq!(shape, EnvelopeShape::ResponseData);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_data_data_envelope() {
        let body = json!({ "data": { "data": [{ "id": 7 }] } });
        let (shape, list) = extract_list(&body).unwrap();
        assert_eq!(shape, EnvelopeShape::DataData);
        assert_eq!(list[0]["id"], 7);
    }

    #[test]
    fn test_response_data_preferred_over_data_data() {
        let body = json!({
            "response": { "data": [{ "id": 1 }] },
            "data": { "data": [{ "id": 2 }, { "id": 3 }] }
        });
        let (shape, list) = extract_list(&body).unwrap();
        assert_eq!(shape, EnvelopeShape::ResponseData);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_bare_array() {
        let body = json!([{ "situacao": "ESPERA" }]);
        let (shape, list) = extract_list(&body).unwrap();
        assert_eq!(shape, EnvelopeShape::BareArray);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_missing_or_non_array_data() {
        assert!(extract_list(&json!({})).is_none());
        assert!(extract_list(&json!({ "response": { "data": null } })).is_none());
        assert!(extract_list(&json!({ "response": { "message": "ok" } })).is_none());
        assert!(extract_list(&json!({ "data": { "data": { "id": 1 } } })).is_none());
        assert!(extract_list(&json!("nope")).is_none());
    }

    #[test]
    fn test_empty_list_is_still_an_envelope() {
        let body = json!({ "response": { "data": [] } });
        let (shape, list) = extract_list(&body).unwrap();
        assert_eq!(shape, EnvelopeShape::ResponseData);
        assert!(list.is_empty());
    }
}
