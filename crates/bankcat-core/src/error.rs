//! Error types for the bankcat-core library.

use thiserror::Error;

/// Main error type for the bankcat library.
#[derive(Error, Debug)]
pub enum BankcatError {
    /// Report extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Transcription service error.
    #[error("transcription error: {0}")]
    Transcription(#[from] TranscriptionError),
}

/// Errors related to category report extraction.
///
/// Per-line and per-row problems (unparsable amounts, aggregate labels)
/// are not errors; they are logged and reported as warnings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Table input was requested but no table with data rows was found.
    #[error("no table found")]
    NoTableFound,

    /// Report type is neither `income` nor `expense`.
    #[error("invalid report type: {0}")]
    InvalidReportType(String),
}

/// Errors raised by a transcription service implementation.
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Response(String),

    /// The response did not contain any message content.
    #[error("response has no message content")]
    MissingContent,
}

/// Result type for the bankcat library.
pub type Result<T> = std::result::Result<T, BankcatError>;
