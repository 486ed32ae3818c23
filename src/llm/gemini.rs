use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{GenerateRequest, GenerateResponse, Provider};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini `generateContent` provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, GEMINI_API_BASE)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    model_version: Option<String>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

fn text_part(text: &str) -> GeminiPart {
    GeminiPart {
        text: Some(text.to_string()),
    }
}

#[async_trait::async_trait]
impl Provider for GeminiProvider {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| anyhow::anyhow!("invalid API key header: {e}"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = GeminiRequest {
            system_instruction: (!req.system.is_empty()).then(|| GeminiContent {
                role: None,
                parts: vec![text_part(&req.system)],
            }),
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![text_part(&req.prompt)],
            }],
            generation_config: GenerationConfig {
                temperature: req.temperature,
                max_output_tokens: req.max_tokens,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, req.model
        );

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<GeminiError>(&error_body) {
                return Err(anyhow::anyhow!(
                    "Gemini API error ({}): {}",
                    status,
                    err.error.message
                ));
            }
            return Err(anyhow::anyhow!(
                "Gemini API error ({}): {}",
                status,
                error_body
            ));
        }

        let resp: GeminiResponse = response.json().await?;

        let Some(candidate) = resp.candidates.first() else {
            let reason = resp
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "unspecified".to_string());
            return Err(anyhow::anyhow!(
                "Gemini returned no candidates (block reason: {reason})"
            ));
        };

        let content = candidate
            .content
            .as_ref()
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let finish_reason = candidate
            .finish_reason
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        if content.is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("unspecified");
            return Err(anyhow::anyhow!(
                "Gemini returned no text (finish reason: {reason})"
            ));
        }

        let (input_tokens, output_tokens) = resp
            .usage_metadata
            .map(|u| (u.prompt_token_count, u.candidates_token_count))
            .unwrap_or((0, 0));

        Ok(GenerateResponse {
            content,
            model: resp.model_version.unwrap_or_else(|| req.model.clone()),
            input_tokens,
            output_tokens,
            finish_reason,
            provider: String::new(),
        })
    }

    fn name(&self) -> &str {
        "google"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::{Value, json};

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest {
            model: "gemini-2.0-flash-exp".to_string(),
            system: "You are a test".to_string(),
            prompt: prompt.to_string(),
            temperature: 0.4,
            max_tokens: 256,
            operation: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_parses_candidate_text() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(
                |Path(call): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    assert_eq!(call, "gemini-2.0-flash-exp:generateContent");
                    assert_eq!(headers["x-goog-api-key"], "test-key");
                    assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
                    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are a test");
                    assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
                    Json(json!({
                        "candidates": [{
                            "content": {"role": "model", "parts": [{"text": "  1. LOGISTICS"}, {"text": " route\n"}]},
                            "finishReason": "STOP"
                        }],
                        "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 40},
                        "modelVersion": "gemini-2.0-flash-exp"
                    }))
                },
            ),
        );
        let base = spawn_stub(router).await;

        let provider = GeminiProvider::with_base_url("test-key", &base);
        let resp = provider.generate(&request("hello")).await.unwrap();

        assert_eq!(resp.content, "  1. LOGISTICS route\n");
        assert_eq!(resp.finish_reason, "stop");
        assert_eq!(resp.input_tokens, 120);
        assert_eq!(resp.output_tokens, 40);
        assert_eq!(resp.model, "gemini-2.0-flash-exp");
    }

    #[tokio::test]
    async fn test_generate_surfaces_api_error_message() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}})),
                )
            }),
        );
        let base = spawn_stub(router).await;

        let provider = GeminiProvider::with_base_url("test-key", &base);
        let err = provider.generate(&request("hello")).await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("429"), "{msg}");
        assert!(msg.contains("Resource has been exhausted"), "{msg}");
    }

    #[tokio::test]
    async fn test_generate_blocked_prompt_is_an_error() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async { Json(json!({"promptFeedback": {"blockReason": "SAFETY"}})) }),
        );
        let base = spawn_stub(router).await;

        let provider = GeminiProvider::with_base_url("test-key", &base);
        let err = provider.generate(&request("hello")).await.unwrap_err();

        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_generate_candidate_without_text_is_an_error() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async { Json(json!({"candidates": [{"finishReason": "SAFETY"}]})) }),
        );
        let base = spawn_stub(router).await;

        let provider = GeminiProvider::with_base_url("test-key", &base);
        let err = provider.generate(&request("hello")).await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("no text"), "{msg}");
        assert!(msg.contains("SAFETY"), "{msg}");
    }

    #[tokio::test]
    async fn test_dispatch_of_textless_reply_reports_error() {
        use std::sync::Arc;

        use crate::config::Config;
        use crate::dispatch::Dispatcher;
        use crate::llm::LlmClient;

        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async {
                Json(json!({
                    "candidates": [{"content": {"role": "model", "parts": []}, "finishReason": "SAFETY"}]
                }))
            }),
        );
        let base = spawn_stub(router).await;

        let provider = Arc::new(GeminiProvider::with_base_url("test-key", &base));
        let dispatcher = Dispatcher::from_config(
            Arc::new(LlmClient::new(provider)),
            &Config::for_tests(),
        );
        let result = dispatcher.crisis_response("stockout").await;

        assert!(!result.is_success());
        assert_eq!(result.status(), "error");
        assert!(result.message().unwrap().contains("SAFETY"));
    }

    #[test]
    fn test_request_omits_empty_system_instruction() {
        let body = GeminiRequest {
            system_instruction: None,
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![text_part("hi")],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 1,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("systemInstruction").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
    }
}
