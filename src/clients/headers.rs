//! Header merging.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::clients::errors::InvalidHttpRequestError;

/// Merges default headers with per-call headers.
///
/// Names are compared case-insensitively. On collision the per-call value
/// replaces the default one.
///
/// # Errors
///
/// Returns [`InvalidHttpRequestError::InvalidHeader`] if a name or value
/// cannot be represented as an HTTP header.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use rest_api::clients::merge_headers;
///
/// let defaults = HashMap::from([("X-Key".to_string(), "abc".to_string())]);
/// let per_call = HashMap::from([("x-key".to_string(), "xyz".to_string())]);
///
/// let merged = merge_headers(&defaults, Some(&per_call)).unwrap();
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged["X-Key"], "xyz");
/// ```
pub fn merge_headers(
    defaults: &HashMap<String, String>,
    per_call: Option<&HashMap<String, String>>,
) -> Result<HeaderMap, InvalidHttpRequestError> {
    let mut merged = HeaderMap::new();
    for (name, value) in defaults.iter().chain(per_call.into_iter().flatten()) {
        let (name, value) = to_header(name, value)?;
        merged.insert(name, value);
    }
    Ok(merged)
}

fn to_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), InvalidHttpRequestError> {
    let invalid = || InvalidHttpRequestError::InvalidHeader {
        name: name.to_string(),
    };
    let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
    let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
    Ok((name, value))
}

/// Flattens a header map into name/value strings for diagnostics.
///
/// Names come out lower-cased. Values that are not visible ASCII are skipped.
pub(crate) fn header_snapshot(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}

/// Collects response headers, keeping every value of repeated headers.
///
/// Bytes that are not valid UTF-8 are replaced rather than dropped.
pub(crate) fn response_headers(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        result.entry(name.as_str().to_string()).or_default().push(value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_per_call_headers_override_defaults() {
        let defaults = map(&[("X-Key", "abc")]);
        let per_call = map(&[("X-Key", "xyz"), ("Accept", "application/json")]);

        let merged = header_snapshot(&merge_headers(&defaults, Some(&per_call)).unwrap());

        assert_eq!(
            merged,
            map(&[("x-key", "xyz"), ("accept", "application/json")])
        );
    }

    #[test]
    fn test_override_is_case_insensitive() {
        let defaults = map(&[("Authorization", "Bearer old")]);
        let per_call = map(&[("AUTHORIZATION", "Bearer new")]);

        let merged = merge_headers(&defaults, Some(&per_call)).unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged["authorization"], "Bearer new");
    }

    #[test]
    fn test_defaults_only() {
        let defaults = map(&[("X-Key", "abc")]);
        let merged = merge_headers(&defaults, None).unwrap();
        assert_eq!(merged["x-key"], "abc");
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let defaults = map(&[("Bad Header", "value")]);
        let result = merge_headers(&defaults, None);
        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::InvalidHeader { name }) if name == "Bad Header"
        ));
    }

    #[test]
    fn test_invalid_header_value_is_rejected() {
        let per_call = map(&[("X-Key", "line\nbreak")]);
        let result = merge_headers(&HashMap::new(), Some(&per_call));
        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::InvalidHeader { name }) if name == "X-Key"
        ));
    }

    #[test]
    fn test_response_headers_keep_repeated_values() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));

        let collected = response_headers(&headers);
        assert_eq!(collected["set-cookie"], vec!["a=1", "b=2"]);
    }

    #[test]
    fn test_response_headers_keep_non_ascii_values() {
        let mut headers = HeaderMap::new();
        headers.insert("x-note", HeaderValue::from_bytes(b"caf\xc3\xa9").unwrap());
        headers.insert("x-raw", HeaderValue::from_bytes(b"a\xffb").unwrap());

        let collected = response_headers(&headers);
        assert_eq!(collected["x-note"], vec!["caf\u{e9}"]);
        assert_eq!(collected["x-raw"], vec!["a\u{fffd}b"]);
    }
}
