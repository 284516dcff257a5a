use crate::config::{ExportSpec, FilterConfig};
use crate::extract::extract_value;
use crate::project::filter_response;
use crate::response::Response;
use serde_json::Value;
use tracing::debug;

/// Render a value as plain text: strings as-is, everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a response for the terminal.
///
/// `raw` prints only the body. Otherwise the output is a `STATUS:` line
/// (unless disabled), a `TIME:` line, an optional `HEADERS:` block and a
/// `BODY:` block, with the body projected onto `body_fields` when set.
pub fn format_output(
    response: &Response,
    filter_config: Option<&FilterConfig>,
    verbose: bool,
    raw: bool,
) -> String {
    if raw {
        return format_body(&response.body);
    }

    let show_status = filter_config.map_or(true, |c| c.status);
    let show_headers = verbose || filter_config.is_some_and(|c| c.headers);
    let body_fields = filter_config.map_or(&[][..], |c| c.body_fields.as_slice());

    let mut lines = Vec::new();
    if show_status {
        lines.push(format!("STATUS: {}", response.status_code));
    }
    lines.push(format!("TIME: {}ms", response.elapsed_ms as u64));

    if show_headers && !response.headers.is_empty() {
        lines.push("HEADERS:".to_string());
        lines.extend(response.headers.iter().map(|(k, v)| format!("  {k}: {v}")));
    }

    if !response.body.is_null() {
        let body = if body_fields.is_empty() {
            response.body.clone()
        } else {
            filter_response(&response.body, body_fields)
        };
        lines.push("BODY:".to_string());
        lines.push(format_body(&body));
    }

    lines.join("\n")
}

fn format_body(body: &Value) -> String {
    match body {
        Value::Null => String::new(),
        Value::Object(_) | Value::Array(_) => format!("{body:#}"),
        other => display_value(other),
    }
}

/// `export <prefix>_<name>=<value>` lines for every export that resolves to a
/// non-null value. Exports that resolve to nothing are skipped silently.
pub fn export_lines(response: &Response, specs: &[ExportSpec], prefix: &str) -> Vec<String> {
    if specs.is_empty() || response.body_is_empty() {
        return Vec::new();
    }
    specs
        .iter()
        .filter_map(|spec| match extract_value(&response.body, &spec.path) {
            Some(value) => Some(format!(
                "export {prefix}_{}={}",
                spec.name,
                shell_quote(&display_value(&value))
            )),
            None => {
                debug!(name = %spec.name, path = %spec.path, "export resolved to nothing");
                None
            }
        })
        .collect()
}

/// Quote `s` for a POSIX shell, leaving simple words bare.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s.chars().all(|c| c.is_alphanumeric() || "-_=./:@".contains(c)) {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', "'\\''"))
}
