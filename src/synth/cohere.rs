use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ChatTransport;
use crate::error::SynthesisError;

#[derive(Debug, Clone)]
pub struct CohereConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub timeout: Duration,
}

/// Blocking client for Cohere's `/v1/chat` endpoint. Each worker thread blocks
/// on its own request.
pub struct CohereClient {
    config: CohereConfig,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    message: &'a str,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    text: Option<String>,
}

impl CohereClient {
    pub fn new(config: CohereConfig) -> Result<Self, SynthesisError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SynthesisError::Transport(e.to_string()))?;
        Ok(CohereClient { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat", self.config.base_url.trim_end_matches('/'))
    }
}

impl ChatTransport for CohereClient {
    fn complete(&self, prompt: &str) -> Result<String, SynthesisError> {
        let request = ChatRequest {
            model: &self.config.model,
            message: prompt,
            temperature: self.config.temperature,
        };
        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .map_err(|e| SynthesisError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(SynthesisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = resp
            .json()
            .map_err(|e| SynthesisError::Transport(e.to_string()))?;
        parsed
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or(SynthesisError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> CohereClient {
        CohereClient::new(CohereConfig {
            api_key: "test".into(),
            base_url: base_url.into(),
            model: "command-r-plus-08-2024".into(),
            temperature: 0.3,
            timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[test]
    fn endpoint_joins_base_url() {
        assert_eq!(client("https://api.cohere.com/").endpoint(), "https://api.cohere.com/v1/chat");
        assert_eq!(client("http://localhost:8080").endpoint(), "http://localhost:8080/v1/chat");
    }

    #[test]
    fn request_shape() {
        let body = serde_json::to_value(ChatRequest {
            model: "m",
            message: "hi",
            temperature: 0.3,
        })
        .unwrap();
        assert_eq!(body["model"], "m");
        assert_eq!(body["message"], "hi");
        assert_eq!(body["temperature"], 0.3);
    }

    #[test]
    fn unreachable_service_is_a_transport_error() {
        let err = client("http://127.0.0.1:9").complete("hi").unwrap_err();
        assert!(matches!(err, SynthesisError::Transport(_)));
    }
}
