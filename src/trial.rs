use similar::{DiffTag, TextDiff};
use std::ops::Range;

/// One edit-script step transforming the target string into the typed string.
/// Ranges are char indices into the respective strings.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOp {
    pub tag: DiffTag,
    pub target: Range<usize>,
    pub typed: Range<usize>,
}

/// Similarity outcome of a single trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialScore {
    pub ratio: f64,
    pub ops: Vec<EditOp>,
}

impl TrialScore {
    pub fn is_perfect(&self) -> bool {
        self.ratio == 1.0
    }
}

/// Score a typed attempt against its target with a char-level diff.
/// The ratio is 2*M/T over matched chars, so 1.0 exactly when the
/// strings are identical.
pub fn score(target: &str, typed: &str) -> TrialScore {
    let diff = TextDiff::from_chars(target, typed);
    let ratio = diff.ratio() as f64;
    let ops = diff
        .ops()
        .iter()
        .map(|op| {
            let (tag, old, new) = op.as_tag_tuple();
            EditOp {
                tag,
                target: old,
                typed: new,
            }
        })
        .collect();

    TrialScore { ratio, ops }
}

/// Render the edit script as the correction listing shown after a miss.
pub fn correction_lines(target: &str, typed: &str, ops: &[EditOp]) -> Vec<String> {
    ops.iter()
        .map(|op| {
            let from = char_span(target, &op.target);
            let to = char_span(typed, &op.typed);
            format!(
                "{:7} target[{}..{}] -> typed[{}..{}] {:>10} -> {:?}",
                tag_name(op.tag),
                op.target.start,
                op.target.end,
                op.typed.start,
                op.typed.end,
                format!("{from:?}"),
                to,
            )
        })
        .collect()
}

fn tag_name(tag: DiffTag) -> &'static str {
    match tag {
        DiffTag::Equal => "equal",
        DiffTag::Delete => "delete",
        DiffTag::Insert => "insert",
        DiffTag::Replace => "replace",
    }
}

fn char_span(s: &str, range: &Range<usize>) -> String {
    s.chars()
        .skip(range.start)
        .take(range.end - range.start)
        .collect()
}
