use serde::{Deserialize, Serialize};

/// What to show when rendering a response.
///
/// Deserialises from the `filter` block of a config or template, where any
/// missing field takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Show the `STATUS:` line.
    pub status: bool,
    /// Show the `HEADERS:` block. OR'd with the verbose flag at render time.
    pub headers: bool,
    /// Paths to keep in the body; empty keeps everything.
    pub body_fields: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { status: true, headers: false, body_fields: Vec::new() }
    }
}

impl FilterConfig {
    /// The `-f id,name,data[].email` form.
    pub fn from_fields(fields: &str, verbose: bool) -> Self {
        Self {
            status: true,
            headers: verbose,
            body_fields: fields.split(',').map(|f| f.trim().to_string()).collect(),
        }
    }
}

/// One `--export` request: `name=path`, or a bare `name` meaning `body.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSpec {
    pub name: String,
    pub path: String,
}

impl ExportSpec {
    pub fn parse(spec: &str) -> Self {
        match spec.split_once('=') {
            Some((name, path)) => Self { name: name.to_string(), path: path.to_string() },
            None => Self { name: spec.to_string(), path: format!("body.{spec}") },
        }
    }
}
