//! OpenAI-compatible chat-completions client for report transcription.

use std::future::Future;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use bankcat_core::{TranscriptionConfig, TranscriptionError, TranscriptionRequest, TranscriptionService};

/// Vision model client. Build once and share by reference.
pub struct VisionClient {
    client: reqwest::Client,
    api_url: String,
    system_prompt: String,
    user_prompt: String,
    max_tokens: i64,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl VisionClient {
    pub fn new(config: &TranscriptionConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bankcat/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            system_prompt: config.system_prompt.clone(),
            user_prompt: config.user_prompt.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn request_body(&self, request: &TranscriptionRequest) -> Value {
        let image_url = format!(
            "data:{};base64,{}",
            request.mime_type,
            BASE64_STANDARD.encode(&request.image)
        );

        json!({
            "model": request.model,
            "temperature": request.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
            "messages": [
                { "role": "system", "content": self.system_prompt },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": self.user_prompt },
                        { "type": "image_url", "image_url": { "url": image_url } }
                    ]
                }
            ]
        })
    }
}

fn message_content(response: ChatCompletionResponse) -> Result<String, TranscriptionError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(TranscriptionError::MissingContent)
}

impl TranscriptionService for VisionClient {
    fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> impl Future<Output = Result<String, TranscriptionError>> + Send {
        let pending = self.client.post(&self.api_url).json(&self.request_body(request));
        let api_url = self.api_url.clone();

        async move {
            debug!("Posting transcription request to {}", api_url);

            let response = pending
                .send()
                .await
                .map_err(|e| TranscriptionError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(TranscriptionError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let parsed: ChatCompletionResponse = response
                .json()
                .await
                .map_err(|e| TranscriptionError::Response(e.to_string()))?;

            message_content(parsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_embeds_image() {
        let config = TranscriptionConfig::default();
        let client = VisionClient::new(&config).unwrap();
        let request = TranscriptionRequest::new(b"abc".to_vec(), "image/png", &config);

        let body = client.request_body(&request);

        assert_eq!(body["model"], "qwen/qwen3-vl-4b");
        assert_eq!(body["max_tokens"], -1);
        assert_eq!(body["temperature"], 0.1);
        assert!(body.to_string().contains("\"temperature\":0.1"));
        assert!(!body.to_string().contains("0.1000"));
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(
            body["messages"][1]["content"][1]["image_url"]["url"],
            "data:image/png;base64,YWJj"
        );
    }

    #[test]
    fn test_message_content() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":"餐饮 12.00"}}]}"#)
                .unwrap();
        assert_eq!(message_content(response).unwrap(), "餐饮 12.00");
    }

    #[test]
    fn test_missing_content() {
        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(message_content(empty), Err(TranscriptionError::MissingContent)));

        let null: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(message_content(null), Err(TranscriptionError::MissingContent)));
    }
}
