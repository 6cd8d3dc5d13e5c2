//! Common regex patterns and markers for category report extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Splits run-together markdown sections on one line.
pub const SECTION_MARKER: &str = "####";

/// Separates tokens in block-format lines (`label-amount-label-amount`).
pub const BLOCK_SEPARATOR: char = '-';

/// Ten-thousand unit suffix.
pub const TEN_THOUSAND: char = '万';

/// Amount header that puts a whole column in units of 万.
pub const TEN_THOUSAND_UNIT: &str = "万元";

/// First cell of the year-comparison row that precedes the category rows.
pub const PRIOR_YEAR_MARKER: &str = "对比上年";

/// Dining label whose trailing cell may be a drill-down link.
pub const DINING_LABEL: &str = "餐饮";

/// Substrings in a second header cell that mark an amount column.
pub const AMOUNT_HEADER_HINTS: [&str; 3] = ["金额", "元", "万"];

/// Opening marker of an HTML table.
pub const TABLE_START: &str = "<table";

lazy_static! {
    // A whole token that is an amount: optional bold wrapper, optional
    // currency glyph, decimal with optional 万, or integer followed by 万.
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"^\s*(?:\*\*)?[¥￥$]?\s*(?:[0-9０-９]+(?:,[0-9０-９]+)*\.[0-9０-９]+万?|(?:[0-9０-９]+\.[0-9０-９]+|[0-9０-９]+)\s*万)\s*(?:\*\*)?$"
    ).unwrap();

    // A line ending in an amount.
    pub static ref TRAILING_AMOUNT: Regex = Regex::new(
        r"(?:(?:\*\*)?[¥￥$]?\s*[0-9０-９]+(?:,[0-9０-９]+)*\.[0-9０-９]+万?|(?:\*\*)?[¥￥$]?\s*(?:[0-9０-９]+\.[0-9０-９]+|[0-9０-９]+)\s*万)(?:\*\*)?$"
    ).unwrap();

    // Shortest leading label followed by the first amount on the line.
    pub static ref LABEL_AMOUNT: Regex = Regex::new(
        r"^(.+?)\s*([¥￥$]?\s*(?:[0-9０-９]+(?:,[0-9０-９]+)*\.[0-9０-９]+万?|(?:[0-9０-９]+\.[0-9０-９]+|[0-9０-９]+)\s*万))"
    ).unwrap();

    // Drill-down cell such as "更多(12类)".
    pub static ref MORE_CATEGORIES: Regex = Regex::new(
        r"^更多\s*[(（][0-9０-９]+类[)）]"
    ).unwrap();

    // Anything that is not a CJK ideograph, a Latin letter or whitespace.
    pub static ref NON_LABEL_CHARS: Regex = Regex::new(
        r"[^\x{4e00}-\x{9fa5}a-zA-Z\s]"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_token() {
        for token in ["1.28万", "8,030.47", "¥5,230.89", "**2,150.50**", "3万", "1.5 万", "$12.00", "１２.５０"] {
            assert!(AMOUNT_TOKEN.is_match(token), "{token}");
        }
        for token in ["交通", "2024", "12", "1.28万元", "5,230.89交通", "١٢.٥٠"] {
            assert!(!AMOUNT_TOKEN.is_match(token), "{token}");
        }
    }

    #[test]
    fn test_trailing_amount() {
        assert!(TRAILING_AMOUNT.is_match("餐饮 5,230.89"));
        assert!(TRAILING_AMOUNT.is_match("5,230.89交通 2,150.50"));
        assert!(TRAILING_AMOUNT.is_match("还款 **1.28万**"));
        assert!(!TRAILING_AMOUNT.is_match("本月支出分类报告"));
        assert!(!TRAILING_AMOUNT.is_match("2024年5月"));
    }

    #[test]
    fn test_label_amount_takes_shortest_label() {
        let caps = LABEL_AMOUNT.captures("休闲娱乐 8,030.47").unwrap();
        assert_eq!(&caps[1], "休闲娱乐");
        assert_eq!(&caps[2], "8,030.47");

        let caps = LABEL_AMOUNT.captures("购物¥3,850.00 其他").unwrap();
        assert_eq!(&caps[1], "购物");
        assert_eq!(&caps[2], "¥3,850.00");
    }

    #[test]
    fn test_more_categories() {
        assert!(MORE_CATEGORIES.is_match("更多(12类)"));
        assert!(MORE_CATEGORIES.is_match("更多 (3类)"));
        assert!(!MORE_CATEGORIES.is_match("1,200.00"));
    }
}
