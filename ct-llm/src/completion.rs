use crate::error::{ClientError, Result, error_from_response};
use crate::types::{CompletionRequest, CompletionResult};
use serde::{Deserialize, Serialize};
use std::time::Instant;

const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Build the shared HTTP client with a request timeout.
pub(crate) fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(%e, "reqwest client build failed; falling back to default client");
            reqwest::Client::new()
        })
}

/// One-shot chat-completion client. Each call performs exactly one
/// request/response cycle; a failure propagates immediately, without retry.
#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl CompletionClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            http: default_http_client(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            url: OPENAI_CHAT_COMPLETIONS_URL.to_string(),
        }
    }

    /// Point the client at a different chat-completions endpoint.
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(level = "info", skip_all)]
    pub async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult> {
        request.validate()?;

        tracing::debug!(
            temperature = request.temperature,
            stop = ?request.stop,
            system_prompt = %request.system_prompt,
            user_prompt = %request.user_prompt,
            "sending completion request"
        );

        let body = ChatCompletionBody::new(&self.model, request);
        let started = Instant::now();

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(error_from_response(status, &text));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;
        let total_tokens = parsed.usage.map(|u| u.total_tokens).unwrap_or(0);
        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            ClientError::Transport("completion response missing choices".to_string())
        })?;
        let finish_reason = choice.finish_reason.unwrap_or_else(|| "unknown".to_string());
        let processing_time_ms = started.elapsed().as_millis() as u64;

        let result = CompletionResult {
            text: choice.message.content.unwrap_or_default(),
            total_tokens,
            processing_time_ms,
        };

        tracing::debug!(
            %finish_reason,
            total_tokens = result.total_tokens,
            processing_time_ms = result.processing_time_ms,
            text = %result.text,
            "completion response"
        );

        Ok(result)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody {
    model: String,
    temperature: f32,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<String>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

impl ChatCompletionBody {
    fn new(model: &str, request: &CompletionRequest) -> Self {
        Self {
            model: model.to_string(),
            temperature: request.temperature,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: request.system_prompt.clone(),
                },
                WireMessage {
                    role: "user",
                    content: request.user_prompt.clone(),
                },
            ],
            stop: request.stop.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    async fn serve_mock(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve mock");
        });
        format!("http://{addr}/")
    }

    #[test]
    fn request_body_has_ordered_messages_and_no_null_stop() {
        let request = CompletionRequest {
            system_prompt: "be brief".to_string(),
            user_prompt: "Hello".to_string(),
            temperature: 0.7,
            stop: None,
        };
        let body = serde_json::to_value(ChatCompletionBody::new("gpt-3.5-turbo-0301", &request))
            .expect("serialize body");

        assert_eq!(body["model"], "gpt-3.5-turbo-0301");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be brief");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Hello");
        assert!(body.get("stop").is_none());
    }

    #[tokio::test]
    async fn invalid_request_fails_before_any_network_call() {
        // Unroutable endpoint: reaching the network would surface Transport.
        let client = CompletionClient::new("k", "m").with_url("http://127.0.0.1:1/");
        let request = CompletionRequest {
            user_prompt: "Hello".to_string(),
            temperature: 1.5,
            ..Default::default()
        };

        let err = client.complete(&request).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn complete_extracts_first_choice_and_usage() {
        let router = Router::new().route(
            "/",
            post(|| async {
                Json(json!({
                    "choices": [{"message": {"content": "Bonjour"}, "finish_reason": "stop"}],
                    "usage": {"total_tokens": 42}
                }))
            }),
        );
        let url = serve_mock(router).await;

        let client = CompletionClient::new("k", "m").with_url(&url);
        let result = client
            .complete(&CompletionRequest {
                user_prompt: "Hello".to_string(),
                ..Default::default()
            })
            .await
            .expect("completion succeeds");

        assert_eq!(result.text, "Bonjour");
        assert_eq!(result.total_tokens, 42);
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication() {
        let router = Router::new().route(
            "/",
            post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({}))) }),
        );
        let url = serve_mock(router).await;

        let client = CompletionClient::new("bad-key", "m").with_url(&url);
        let err = client
            .complete(&CompletionRequest {
                user_prompt: "Hello".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Authentication(_)));
    }

    #[tokio::test]
    async fn server_error_carries_upstream_message() {
        let router = Router::new().route(
            "/",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": {"message": "boom"}})),
                )
            }),
        );
        let url = serve_mock(router).await;

        let client = CompletionClient::new("k", "m").with_url(&url);
        let err = client
            .complete(&CompletionRequest {
                user_prompt: "Hello".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("boom"));
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_choices_is_a_transport_error() {
        let router = Router::new().route(
            "/",
            post(|| async { Json(json!({"choices": [], "usage": {"total_tokens": 1}})) }),
        );
        let url = serve_mock(router).await;

        let client = CompletionClient::new("k", "m").with_url(&url);
        let err = client
            .complete(&CompletionRequest {
                user_prompt: "Hello".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
    }
}
