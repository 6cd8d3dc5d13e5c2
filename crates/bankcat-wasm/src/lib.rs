//! WASM bindings for bank category report extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Transcription happens elsewhere; these functions take the transcribed
//! text or HTML table.

use wasm_bindgen::prelude::*;

use bankcat_core::report::rules;
use bankcat_core::report::rules::labels::ReservedLabels;
use bankcat_core::{ReportExtractor, ReportParser, ReportType};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_report_type(report_type: &str) -> Result<ReportType, JsValue> {
    report_type.parse().map_err(to_js_error)
}

/// Extract category records from a transcribed report.
///
/// `report_type` is `"income"` or `"expense"`.
#[wasm_bindgen]
pub fn extract_report(text: &str, report_type: &str) -> Result<JsValue, JsValue> {
    let result = ReportExtractor::new()
        .extract(text, parse_report_type(report_type)?)
        .map_err(to_js_error)?;

    serde_wasm_bindgen::to_value(&result).map_err(to_js_error)
}

/// Convert an amount token (e.g. "1.28万", "¥8,030.47") to a number.
#[wasm_bindgen]
pub fn convert_amount(token: &str) -> Option<f64> {
    rules::convert_amount(token)
}

/// Clean up raw transcription text, one non-empty line per line.
#[wasm_bindgen]
pub fn normalize_text(raw: &str) -> String {
    rules::normalize_text(raw)
}

/// Join label lines with the amount line that follows them.
#[wasm_bindgen]
pub fn merge_lines(normalized: &str) -> String {
    let lines: Vec<&str> = normalized.lines().collect();
    rules::merge_lines(&lines).join("\n")
}

/// Report extractor class for browser use.
#[wasm_bindgen]
pub struct Extractor {
    inner: ReportExtractor,
}

#[wasm_bindgen]
impl Extractor {
    /// Create an extractor with the default reserved labels.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: ReportExtractor::new(),
        }
    }

    /// Replace the labels that mark total and subtotal lines.
    #[wasm_bindgen]
    pub fn set_reserved_labels(&mut self, labels: Vec<String>) {
        let inner = std::mem::take(&mut self.inner);
        self.inner = inner.with_reserved_labels(ReservedLabels::new(&labels));
    }

    /// Whether table input without rows is parsed as text instead of failing.
    #[wasm_bindgen]
    pub fn set_table_fallback(&mut self, enabled: bool) {
        let inner = std::mem::take(&mut self.inner);
        self.inner = inner.with_table_fallback(enabled);
    }

    /// Extract category records.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str, report_type: &str) -> Result<JsValue, JsValue> {
        let result = self
            .inner
            .extract(text, parse_report_type(report_type)?)
            .map_err(to_js_error)?;

        serde_wasm_bindgen::to_value(&result).map_err(to_js_error)
    }

    /// Extract category records and keep every intermediate stage.
    #[wasm_bindgen]
    pub fn analyze(&self, text: &str, report_type: &str) -> Result<JsValue, JsValue> {
        let analysis = self
            .inner
            .analyze(text, parse_report_type(report_type)?)
            .map_err(to_js_error)?;

        serde_wasm_bindgen::to_value(&analysis).map_err(to_js_error)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_convert_amount() {
        assert_eq!(convert_amount("1.28万"), Some(12800.0));
        assert_eq!(convert_amount("¥8,030.47"), Some(8030.47));
        assert_eq!(convert_amount("很多"), None);
    }

    #[wasm_bindgen_test]
    fn test_extract_report() {
        let value = extract_report("餐饮 12.00\n总计 12.00", "expense").unwrap();
        assert!(value.is_object());
        assert!(extract_report("餐饮 12.00", "savings").is_err());
    }

    #[wasm_bindgen_test]
    fn test_normalize_and_merge() {
        let normalized = normalize_text("休闲娱乐\r\n\n  8,030.47 \n");
        assert_eq!(normalized, "休闲娱乐\n8,030.47");
        assert_eq!(merge_lines(&normalized), "休闲娱乐 8,030.47");
    }
}
