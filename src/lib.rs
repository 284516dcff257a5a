//! Response inspection for scripted HTTP runs: filter a JSON body down to the
//! fields a caller asked for, pull single values out for exports, check
//! `--assert` expressions and diff responses against saved snapshots.

pub mod errors;
pub mod config;
pub mod response;
pub mod path;
pub mod extract;
pub mod project;
pub mod assertion;
pub mod diff;
pub mod snapshot;
pub mod output;
mod parser;

pub use errors::{ReqcapError, Result};
pub use config::{ExportSpec, FilterConfig};
pub use response::Response;
pub use path::{parse_path, Segment};
pub use extract::extract_value;
pub use project::filter_response;
pub use assertion::{evaluate_assert, parse_assert, AssertOp, AssertOutcome, Assertion};
pub use diff::diff_snapshot;
pub use snapshot::{Snapshot, SnapshotEntry, SnapshotStore};
pub use output::{export_lines, format_output, shell_quote};
