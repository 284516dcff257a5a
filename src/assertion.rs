use crate::errors::{ReqcapError, Result};
use crate::extract::extract_value;
use crate::output::display_value;
use crate::response::Response;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertOp {
    Eq,
    Ne,
}

impl AssertOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssertOp::Eq => "=",
            AssertOp::Ne => "!=",
        }
    }
}

impl fmt::Display for AssertOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `--assert` expression such as `status=200` or `body.error!=null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    pub path: String,
    pub op: AssertOp,
    pub expected: String,
}

/// Outcome of one assertion, with the line to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertOutcome {
    pub passed: bool,
    pub message: String,
}

/// Split an assertion at its first `!=`, or failing that its first `=`.
/// Everything after the operator is the expected value, `=` signs included.
pub fn parse_assert(expr: &str) -> Result<Assertion> {
    let (idx, op) = match expr.find("!=") {
        Some(idx) => (idx, AssertOp::Ne),
        None => match expr.find('=') {
            Some(idx) => (idx, AssertOp::Eq),
            None => return Err(ReqcapError::InvalidExpression(expr.to_string())),
        },
    };
    Ok(Assertion {
        path: expr[..idx].trim().to_string(),
        op,
        expected: expr[idx + op.as_str().len()..].trim().to_string(),
    })
}

/// Check an assertion against a response.
///
/// `status` compares the status code; `body` the whole body; anything else is
/// a body path (leading `body.` optional). A missing or null value compares
/// as the empty string, so `body.missing=` passes.
pub fn evaluate_assert(expr: &str, response: &Response) -> Result<AssertOutcome> {
    let assertion = parse_assert(expr)?;

    let actual = match assertion.path.as_str() {
        "status" => response.status_code.to_string(),
        "body" if response.body.is_null() => String::new(),
        "body" => display_value(&response.body),
        path => extract_value(&response.body, path)
            .map(|v| display_value(&v))
            .unwrap_or_default(),
    };

    let passed = match assertion.op {
        AssertOp::Eq => actual == assertion.expected,
        AssertOp::Ne => actual != assertion.expected,
    };
    debug!(expr, %actual, passed, "evaluated assertion");

    let message = if passed {
        format!("ASSERT PASSED: {expr}")
    } else {
        format!("ASSERT FAILED: {expr} (actual: {actual})")
    };
    Ok(AssertOutcome { passed, message })
}
