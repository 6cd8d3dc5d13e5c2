//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use super::report::ReportType;

/// Main configuration for bankcat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BankcatConfig {
    /// Vision transcription service configuration.
    pub transcription: TranscriptionConfig,

    /// Category extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Settings for the vision-completion service that transcribes report images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Chat-completions endpoint.
    pub api_url: String,

    /// Model name sent with each request.
    pub model: String,

    /// Sampling temperature. Kept low so transcriptions are stable.
    pub temperature: f64,

    /// Token limit (-1 lets the server decide).
    pub max_tokens: i64,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// System prompt.
    pub system_prompt: String,

    /// User prompt sent alongside the image.
    pub user_prompt: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:1234/v1/chat/completions".to_string(),
            model: "qwen/qwen3-vl-4b".to_string(),
            temperature: 0.1,
            max_tokens: -1,
            timeout_secs: 300,
            system_prompt: "你是一个专业的OCR识别专家：\n\
                1. 请从人的视角来进行理解提取，仅提取与交易相关的内容\n\
                2. 最终输出只保留：交易类型、金额。以纯文本形式输出，每行一个项目，每个项目包含交易类型和金额。\n\
                3. 严禁以任何形式输出表格或HTML标签。严禁使用任何表格结构、HTML标签或Markdown表格语法。"
                .to_string(),
            user_prompt: "请提取银行分类报告中的交易类别和金额".to_string(),
        }
    }
}

/// Category extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Labels marking total/subtotal lines. Matched ASCII-case-insensitively
    /// against the sanitized label.
    pub reserved_labels: Vec<String>,

    /// Report type used when the caller does not pass one.
    pub default_report_type: ReportType,

    /// Re-run the text pipeline when table input has no data rows.
    pub table_fallback_to_text: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            reserved_labels: crate::report::rules::labels::DEFAULT_RESERVED_LABELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_report_type: ReportType::Expense,
            table_fallback_to_text: true,
        }
    }
}

impl BankcatConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
