//! Category label cleanup and aggregate-row detection.
//!
//! Only ever applied to label tokens. Amount tokens go through
//! [`super::amounts`] and keep their digits and currency glyphs.

use super::patterns::NON_LABEL_CHARS;

/// Labels that name a total rather than a category.
pub const DEFAULT_RESERVED_LABELS: [&str; 7] = [
    "总计",
    "总额",
    "合计",
    "小计",
    "total",
    "grand total",
    "subtotal",
];

/// Strip everything except CJK ideographs, Latin letters and single spaces.
pub fn sanitize_label(label: &str) -> String {
    let kept = NON_LABEL_CHARS.replace_all(label, "");
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Set of reserved aggregate labels.
#[derive(Debug, Clone)]
pub struct ReservedLabels {
    labels: Vec<String>,
}

impl ReservedLabels {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(|l| sanitize_label(l.as_ref()).to_ascii_lowercase())
                .filter(|l| !l.is_empty())
                .collect(),
        }
    }

    /// Check a sanitized label against the set.
    pub fn contains(&self, label: &str) -> bool {
        let label = label.to_ascii_lowercase();
        self.labels.iter().any(|l| *l == label)
    }

    /// Sanitize a raw label and decide whether it names a category.
    pub fn accept(&self, raw: &str) -> Result<String, LabelRejection> {
        let label = sanitize_label(raw);
        if label.is_empty() {
            Err(LabelRejection::Empty)
        } else if self.contains(&label) {
            Err(LabelRejection::Reserved(label))
        } else {
            Ok(label)
        }
    }
}

/// Why a label did not become a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelRejection {
    /// Nothing was left after sanitizing.
    Empty,
    /// The label names a total or subtotal.
    Reserved(String),
}

impl Default for ReservedLabels {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVED_LABELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("**餐饮**"), "餐饮");
        assert_eq!(sanitize_label("- 休闲娱乐："), "休闲娱乐");
        assert_eq!(sanitize_label("Apple  Store 123"), "Apple Store");
        assert_eq!(sanitize_label("1号楼 物业"), "号楼 物业");
        assert_eq!(sanitize_label("5,"), "");
    }

    #[test]
    fn test_sanitize_is_stable() {
        let once = sanitize_label(" ## 水电费 (月) ");
        assert_eq!(sanitize_label(&once), once);
    }

    #[test]
    fn test_reserved_labels() {
        let reserved = ReservedLabels::default();
        assert!(reserved.contains("合计"));
        assert!(reserved.contains("总计"));
        assert!(reserved.contains("Grand Total"));
        assert!(!reserved.contains("餐饮"));
        assert!(!reserved.contains("总计划"));
    }

    #[test]
    fn test_accept() {
        let reserved = ReservedLabels::default();
        assert_eq!(reserved.accept("**交通**："), Ok("交通".to_string()));
        assert_eq!(reserved.accept("8,"), Err(LabelRejection::Empty));
        assert_eq!(
            reserved.accept("合计:"),
            Err(LabelRejection::Reserved("合计".to_string()))
        );
    }

    #[test]
    fn test_custom_reserved_labels() {
        let reserved = ReservedLabels::new(["本月合计", ""]);
        assert!(reserved.contains("本月合计"));
        assert!(!reserved.contains("合计"));
    }
}
