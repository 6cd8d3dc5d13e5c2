//! Image transcription seam.
//!
//! The core never talks to a vision model itself. Callers provide a
//! [`TranscriptionService`] and [`ReportAnalyzer`] chains its output into
//! the extractor.

use std::future::Future;

use tracing::{debug, info};

use crate::error::{Result, TranscriptionError};
use crate::models::config::TranscriptionConfig;
use crate::models::report::ReportType;
use crate::report::{ReportAnalysis, ReportExtractor, ReportParser};

/// One report image to transcribe.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Encoded image bytes.
    pub image: Vec<u8>,

    /// MIME type of `image`, e.g. `image/png`.
    pub mime_type: String,

    /// Model name.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f64,
}

impl TranscriptionRequest {
    pub fn new(image: Vec<u8>, mime_type: impl Into<String>, config: &TranscriptionConfig) -> Self {
        Self {
            image,
            mime_type: mime_type.into(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

/// A service that turns a report image into text.
pub trait TranscriptionService {
    /// Transcribe the image in `request`. The reply is returned verbatim.
    fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> impl Future<Output = std::result::Result<String, TranscriptionError>> + Send;
}

/// Transcribes report images and extracts their categories.
pub struct ReportAnalyzer<'a, S> {
    service: &'a S,
    extractor: ReportExtractor,
}

impl<'a, S: TranscriptionService> ReportAnalyzer<'a, S> {
    pub fn new(service: &'a S, extractor: ReportExtractor) -> Self {
        Self { service, extractor }
    }

    /// Transcribe `request` and run extraction on the reply.
    pub async fn analyze(&self, request: &TranscriptionRequest, report_type: ReportType) -> Result<ReportAnalysis> {
        info!(
            "Transcribing {} byte {} image with {}",
            request.image.len(),
            request.mime_type,
            request.model
        );

        let content = self.service.transcribe(request).await?;
        debug!("Transcription returned {} characters", content.len());

        Ok(self.extractor.analyze(&content, report_type)?)
    }

    /// The extractor used after transcription.
    pub fn extractor(&self) -> &ReportExtractor {
        &self.extractor
    }
}
