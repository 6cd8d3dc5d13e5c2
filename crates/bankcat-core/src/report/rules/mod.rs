//! Leaf rules shared by the text and table extractors.

pub mod amounts;
pub mod labels;
pub mod merge;
pub mod normalize;
pub mod patterns;

pub use amounts::{convert_amount, convert_scaled, decimal_to_f64, is_amount_token, parse_amount};
pub use labels::{sanitize_label, LabelRejection, ReservedLabels, DEFAULT_RESERVED_LABELS};
pub use merge::{classify_line, merge_lines, LineKind};
pub use normalize::{normalize_lines, normalize_text};
