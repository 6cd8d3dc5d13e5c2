//! Category/amount grammar over merged report text.
//!
//! Each line goes through an ordered list of [`PairStrategy`] values. The
//! first strategy that proposes at least one pair owns the line; later
//! strategies are not consulted. Proposed pairs are then sanitized, checked
//! against the reserved aggregate labels and converted.

use tracing::{debug, warn};

use crate::models::report::{CategoryAmountRecord, ReportType};

use super::rules::{
    amounts::{convert_amount, is_amount_token},
    labels::{LabelRejection, ReservedLabels},
    patterns::{BLOCK_SEPARATOR, LABEL_AMOUNT, SECTION_MARKER},
};
use super::ParseOutcome;

/// A raw label/amount pair proposed by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidatePair<'a> {
    pub label: &'a str,
    pub amount: &'a str,
}

impl<'a> CandidatePair<'a> {
    pub fn new(label: &'a str, amount: &'a str) -> Self {
        Self {
            label: label.trim(),
            amount: amount.trim(),
        }
    }
}

/// One way of reading label/amount pairs out of a line.
pub trait PairStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Pairs found in `line`, in line order. Empty when the strategy does not apply.
    fn candidates<'a>(&self, line: &'a str) -> Vec<CandidatePair<'a>>;
}

/// Block-format pairs, `label-amount-label-amount`, after splitting the line
/// into `####` sections.
///
/// Tokens are paired consecutively; a pair only counts when its second
/// token is an amount. An odd trailing token is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockPairStrategy;

impl PairStrategy for BlockPairStrategy {
    fn name(&self) -> &'static str {
        "block-pair"
    }

    fn candidates<'a>(&self, line: &'a str) -> Vec<CandidatePair<'a>> {
        let mut pairs = Vec::new();

        for section in line.split(SECTION_MARKER).map(str::trim) {
            if section.is_empty() {
                continue;
            }

            let tokens: Vec<&str> = section
                .split(BLOCK_SEPARATOR)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect();

            if tokens.len() < 2 {
                continue;
            }

            for pair in tokens.chunks_exact(2) {
                if is_amount_token(pair[1]) {
                    pairs.push(CandidatePair::new(pair[0], pair[1]));
                }
            }
        }

        pairs
    }
}

/// Shortest leading label followed by the first amount on the line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackStrategy;

impl PairStrategy for FallbackStrategy {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn candidates<'a>(&self, line: &'a str) -> Vec<CandidatePair<'a>> {
        LABEL_AMOUNT
            .captures(line)
            .and_then(|caps| Some(CandidatePair::new(caps.get(1)?.as_str(), caps.get(2)?.as_str())))
            .into_iter()
            .collect()
    }
}

/// Grammar parser for merged report text.
pub struct GrammarParser {
    strategies: Vec<Box<dyn PairStrategy>>,
    reserved: ReservedLabels,
}

impl GrammarParser {
    /// Create a parser with the block-pair and fallback strategies.
    pub fn new() -> Self {
        Self {
            strategies: vec![Box::new(BlockPairStrategy), Box::new(FallbackStrategy)],
            reserved: ReservedLabels::default(),
        }
    }

    /// Replace the strategy chain. Order is priority order.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn PairStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Set the reserved aggregate labels.
    pub fn with_reserved_labels(mut self, reserved: ReservedLabels) -> Self {
        self.reserved = reserved;
        self
    }

    /// Pairs for one line from the first strategy that finds any.
    pub fn line_candidates<'a>(&self, line: &'a str) -> Option<(&'static str, Vec<CandidatePair<'a>>)> {
        self.strategies.iter().find_map(|strategy| {
            let pairs = strategy.candidates(line);
            (!pairs.is_empty()).then(|| (strategy.name(), pairs))
        })
    }

    /// Parse merged lines into records.
    pub fn parse_lines<S: AsRef<str>>(&self, lines: &[S], report_type: ReportType) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();

        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            let Some((strategy, pairs)) = self.line_candidates(line) else {
                debug!("No pairs in line {:?}", line);
                continue;
            };

            debug!("{} strategy found {} pair(s) in {:?}", strategy, pairs.len(), line);

            for pair in pairs {
                if let Some(record) = self.accept(pair, report_type, &mut outcome.warnings) {
                    outcome.records.push(record);
                }
            }
        }

        outcome
    }

    /// Parse merged text (one candidate per line) into records.
    pub fn parse(&self, merged: &str, report_type: ReportType) -> ParseOutcome {
        let lines: Vec<&str> = merged.lines().collect();
        self.parse_lines(&lines, report_type)
    }

    fn accept(
        &self,
        pair: CandidatePair<'_>,
        report_type: ReportType,
        warnings: &mut Vec<String>,
    ) -> Option<CategoryAmountRecord> {
        let label = match self.reserved.accept(pair.label) {
            Ok(label) => label,
            Err(LabelRejection::Reserved(label)) => {
                debug!("Skipping aggregate row {:?}", label);
                return None;
            }
            Err(LabelRejection::Empty) => {
                warn!("Label {:?} is empty after cleanup, skipping {}", pair.label, pair.amount);
                warnings.push(format!("empty category label for amount {}", pair.amount));
                return None;
            }
        };

        match convert_amount(pair.amount) {
            Some(amount) => Some(CategoryAmountRecord::new(label, amount, report_type)),
            None => {
                warn!("Cannot convert amount {:?} for {}, skipping", pair.amount, label);
                warnings.push(format!("unparsable amount {} for {}", pair.amount, label));
                None
            }
        }
    }
}

impl Default for GrammarParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names_and_amounts(outcome: &ParseOutcome) -> Vec<(&str, f64)> {
        outcome
            .records
            .iter()
            .map(|r| (r.category_name.as_str(), r.amount))
            .collect()
    }

    #[test]
    fn test_block_pair_precedence() {
        let parser = GrammarParser::new();
        let outcome = parser.parse("还款-1.28万-交通-2150.50", ReportType::Expense);

        assert_eq!(names_and_amounts(&outcome), vec![("还款", 12800.0), ("交通", 2150.50)]);
    }

    #[test]
    fn test_block_pair_skips_bad_pairs() {
        let strategy = BlockPairStrategy;
        let pairs = strategy.candidates("餐饮-很多-交通-**¥35.00**-购物");

        assert_eq!(pairs, vec![CandidatePair::new("交通", "**¥35.00**")]);
    }

    #[test]
    fn test_sections_are_concatenated() {
        let parser = GrammarParser::new();
        let outcome = parser.parse("#### 餐饮-120.00 #### 交通-35.50-购物-1万", ReportType::Expense);

        assert_eq!(
            names_and_amounts(&outcome),
            vec![("餐饮", 120.0), ("交通", 35.5), ("购物", 10000.0)]
        );
    }

    #[test]
    fn test_fallback_single_match() {
        let parser = GrammarParser::new();
        let outcome = parser.parse("休闲娱乐 8,030.47\n购物¥3,850.00", ReportType::Expense);

        assert_eq!(names_and_amounts(&outcome), vec![("休闲娱乐", 8030.47), ("购物", 3850.0)]);
    }

    #[test]
    fn test_fallback_only_when_block_finds_nothing() {
        let parser = GrammarParser::new();
        let (strategy, _) = parser.line_candidates("房贷-月供 5,000.00").unwrap();
        assert_eq!(strategy, "fallback");

        let (strategy, pairs) = parser.line_candidates("房贷-5,000.00 餐饮 20.00").unwrap();
        assert_eq!(strategy, "fallback");
        assert_eq!(pairs, vec![CandidatePair::new("房贷-", "5,000.00")]);
    }

    #[test]
    fn test_reserved_labels_dropped() {
        let parser = GrammarParser::new();
        let outcome = parser.parse("餐饮 100.00\n总计 32,041.09\n合计-50.00", ReportType::Expense);

        assert_eq!(names_and_amounts(&outcome), vec![("餐饮", 100.0)]);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_duplicates_are_not_merged() {
        let parser = GrammarParser::new();
        let outcome = parser.parse("餐饮 10.00\n餐饮 20.00", ReportType::Income);

        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.records.iter().all(|r| r.record_type == ReportType::Income));
    }

    #[test]
    fn test_empty_label_is_warned() {
        let parser = GrammarParser::new();
        let outcome = parser.parse("8,030.47", ReportType::Expense);

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_lines_without_amounts_contribute_nothing() {
        let parser = GrammarParser::new();
        let outcome = parser.parse("本月支出分类报告\n2024年5月", ReportType::Expense);

        assert!(outcome.records.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_custom_strategy_chain() {
        let parser = GrammarParser::new().with_strategies(vec![Box::new(FallbackStrategy)]);
        let outcome = parser.parse("还款-1.28万-交通-2150.50", ReportType::Expense);

        assert_eq!(names_and_amounts(&outcome), vec![("还款", 12800.0)]);
    }
}
