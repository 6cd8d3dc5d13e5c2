//! Reunites category labels with amounts that landed on the following line.

use tracing::debug;

use super::amounts::is_amount_token;
use super::patterns::{BLOCK_SEPARATOR, TRAILING_AMOUNT};

/// How the merger reads a single normalized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// The whole line is an amount.
    PureAmount,
    /// The line ends in an amount.
    EmbeddedAmount,
    /// Block-format line with two or more `-` separators.
    Block,
    /// Anything else, taken as a category label.
    Label,
}

/// Classify a line. Kinds are tried in declaration order.
pub fn classify_line(line: &str) -> LineKind {
    if is_amount_token(line) {
        LineKind::PureAmount
    } else if TRAILING_AMOUNT.is_match(line) {
        LineKind::EmbeddedAmount
    } else if line.matches(BLOCK_SEPARATOR).count() >= 2 {
        LineKind::Block
    } else {
        LineKind::Label
    }
}

/// Merge label-only lines into the amount line that follows them.
///
/// A label followed by anything other than a pure amount is dropped, and
/// a newer label replaces an older pending one.
pub fn merge_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut merged = Vec::with_capacity(lines.len());
    let mut pending: Option<&str> = None;

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        match classify_line(line) {
            LineKind::PureAmount => match pending.take() {
                Some(label) => merged.push(format!("{} {}", label, line)),
                None => merged.push(line.to_string()),
            },
            LineKind::EmbeddedAmount | LineKind::Block => {
                if let Some(label) = pending.take() {
                    debug!("Dropping dangling label {:?} before {:?}", label, line);
                }
                merged.push(line.to_string());
            }
            LineKind::Label => {
                if let Some(label) = pending.replace(line) {
                    debug!("Label {:?} replaced by {:?}", label, line);
                }
            }
        }
    }

    merged
}
