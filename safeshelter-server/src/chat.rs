//! Proxy to an OpenAI-compatible chat completions API

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::ChatConfig;
use crate::error::ApiError;

const SYSTEM_PROMPT: &str = "Du er en hjelpsom assistent for SafeShelter, et kart over \
tilfluktsrom, brannstasjoner og sykehus i Norge. Gi korte, konkrete og rolige svar om \
beredskap og hva man gjør i en nødsituasjon. Ved akutt fare skal brukeren alltid ringe \
110 (brann), 112 (politi) eller 113 (ambulanse).";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Sends one user message and returns the raw completion payload
    pub async fn complete(&self, message: &str) -> Result<Value, ApiError> {
        if self.config.api_key.is_empty() {
            return Err(ApiError::NotConfigured("Chat API key"));
        }

        let request = CompletionRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Upstream(format!("chat API returned HTTP {status}")));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::Json;
    use axum::http::HeaderMap;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn forwards_message_with_system_prompt() {
        let seen: Arc<Mutex<Option<(Option<String>, Value)>>> = Arc::new(Mutex::new(None));
        let recorder = Arc::clone(&seen);
        let app = axum::Router::new().fallback(move |headers: HeaderMap, Json(body): Json<Value>| {
            let recorder = Arc::clone(&recorder);
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                *recorder.lock().unwrap() = Some((auth, body));
                Json(json!({ "choices": [{ "message": { "content": "Hei!" } }] }))
            }
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = ChatClient::new(ChatConfig {
            api_url: format!("http://{addr}/chat"),
            api_key: "key".to_string(),
            ..ChatConfig::default()
        })
        .unwrap();

        let reply = client.complete("Hvor er nærmeste tilfluktsrom?").await.unwrap();
        assert_eq!(reply["choices"][0]["message"]["content"], "Hei!");

        let (auth, body) = seen.lock().unwrap().take().unwrap();
        assert_eq!(auth.as_deref(), Some("Bearer key"));
        assert_eq!(body["model"], "deepseek/deepseek-r1:free");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Hvor er nærmeste tilfluktsrom?");
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let client = ChatClient::new(ChatConfig::default()).unwrap();
        assert!(matches!(
            client.complete("Hei").await,
            Err(ApiError::NotConfigured(_))
        ));
    }
}
