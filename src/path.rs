use crate::parser::{int_literal, split_brackets};
use tracing::trace;

/// One step of a parsed filter path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member, matched case-insensitively.
    Key(String),
    /// Array element; negative counts from the end.
    Index(i64),
    /// Half-open slice `[start:stop]`, either bound optional.
    Slice { start: Option<i64>, stop: Option<i64> },
    /// Every array element, spelled `[]`.
    Iterate,
}

impl Segment {
    /// True for segments that fan out over an array when projecting.
    pub fn is_collection(&self) -> bool {
        match self {
            Segment::Iterate | Segment::Slice { .. } => true,
            Segment::Index(i) => *i < 0,
            Segment::Key(_) => false,
        }
    }
}

/// Parse a filter path into segments.
///
/// Never fails: empty dot segments are skipped and anything that is not an
/// index, slice or `[]` becomes a key.
///
/// ```text
/// data[].id              -> Key, Iterate, Key
/// items[-1]              -> Key, Index(-1)
/// items[2:]              -> Key, Slice(2, None)
/// headers[Content-Type]  -> Key, Key
/// body.items.2           -> Key, Key, Index(2)
/// ```
pub fn parse_path(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    for part in path.trim().split('.') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((key, groups)) = split_brackets(part) {
            let key = key.trim();
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }
            segments.extend(groups.into_iter().map(|g| classify_bracket(g.trim())));
        } else if let Some(i) = int_literal(part) {
            segments.push(Segment::Index(i));
        } else {
            segments.push(Segment::Key(part.to_string()));
        }
    }
    trace!(path, ?segments, "parsed path");
    segments
}

fn classify_bracket(content: &str) -> Segment {
    if content.is_empty() {
        return Segment::Iterate;
    }
    if let Some((start, stop)) = content.split_once(':') {
        if is_slice_bound(start) && is_slice_bound(stop) {
            return Segment::Slice {
                start: slice_bound(start),
                stop: slice_bound(stop),
            };
        }
    }
    match int_literal(content) {
        Some(i) => Segment::Index(i),
        None => Segment::Key(content.to_string()),
    }
}

// `-?\d*`
fn is_slice_bound(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    digits.chars().all(|c| c.is_ascii_digit())
}

// Empty or a lone `-` means omitted. Bounds past the i64 range saturate.
fn slice_bound(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() {
        return None;
    }
    match int_literal(s) {
        Some(i) => Some(i),
        None if s.starts_with('-') => Some(i64::MIN),
        None => Some(i64::MAX),
    }
}

/// Split a path at its first collection segment into prefix, collection
/// segment and suffix. `None` when the path has no collection segment.
pub fn split_at_collection(
    segments: &[Segment],
) -> Option<(&[Segment], &Segment, &[Segment])> {
    split_where(segments, Segment::is_collection)
}

/// Like [`split_at_collection`] but a negative index is an ordinary step.
/// Used for single-value extraction, which can follow negative indices directly.
pub fn split_at_fan_out(segments: &[Segment]) -> Option<(&[Segment], &Segment, &[Segment])> {
    split_where(segments, |s| matches!(s, Segment::Iterate | Segment::Slice { .. }))
}

fn split_where(
    segments: &[Segment],
    pred: impl Fn(&Segment) -> bool,
) -> Option<(&[Segment], &Segment, &[Segment])> {
    let at = segments.iter().position(pred)?;
    Some((&segments[..at], &segments[at], &segments[at + 1..]))
}
