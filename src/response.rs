use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decoded HTTP response as the inspection engine sees it.
///
/// `body` is the decoded JSON document, or `Value::String` holding the raw
/// text when the payload was not JSON. Header names keep their case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status_code: u16,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    #[serde(default)]
    pub body: Value,
    #[serde(default)]
    pub elapsed_ms: f64,
}

impl Response {
    pub fn new(status_code: u16, body: Value) -> Self {
        Self { status_code, body, ..Self::default() }
    }

    /// Build a response from raw body text, decoding it as JSON when possible.
    pub fn from_text(status_code: u16, text: &str) -> Self {
        let body = serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()));
        Self::new(status_code, body)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_elapsed_ms(mut self, elapsed_ms: f64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// True when the body holds nothing worth extracting from.
    pub fn body_is_empty(&self) -> bool {
        match &self.body {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::Object(o) => o.is_empty(),
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
        }
    }
}
