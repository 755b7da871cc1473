//! HTTP response type returned by the transport.

use std::collections::HashMap;

/// A raw response: status, headers and JSON body.
///
/// The body is handed back untouched; normalizing it into a store is the
/// caller's business.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, names lower-cased, values in arrival order.
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed JSON body, `{}` when the body is empty.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` for statuses in `200..400`.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code < 400
    }

    /// Returns the `X-Request-Id` header, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_ok_accepts_2xx_and_3xx() {
        for code in [200, 201, 204, 301, 304, 399] {
            let response = HttpResponse::new(code, HashMap::new(), json!({}));
            assert!(response.is_ok(), "Expected is_ok() to be true for code {code}");
        }
    }

    #[test]
    fn test_is_ok_rejects_4xx_and_5xx() {
        for code in [100, 400, 404, 422, 500, 503] {
            let response = HttpResponse::new(code, HashMap::new(), json!({}));
            assert!(!response.is_ok(), "Expected is_ok() to be false for code {code}");
        }
    }

    #[test]
    fn test_request_id_lookup() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["abc-123".to_string()]);
        let response = HttpResponse::new(200, headers, json!({}));

        assert_eq!(response.request_id(), Some("abc-123"));
        assert_eq!(response.header("X-Request-Id"), Some("abc-123"));
        assert_eq!(response.header("link"), None);
    }
}
