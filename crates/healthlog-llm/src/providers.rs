//! External LLM provider streaming.
//!
//! Every provider streams tokens over SSE. OpenAI and Groq share one wire
//! format; Anthropic and Gemini each have their own. The line loop is shared
//! and each provider only supplies a decoder for one `data:` payload.

use std::pin::Pin;

use futures::Stream;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use tokio_stream::StreamExt;
use tracing::{debug, error};

use healthlog_core::{Error, Result};

use crate::types::{ChatMessage, LLMProvider};

/// Boxed stream type for returning different stream implementations.
pub type BoxedStream = Pin<Box<dyn Stream<Item = StreamChunk> + Send>>;

/// A single streamed token or error.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    Token(String),
    Done { tokens_used: usize },
    Error(String),
}

/// What one SSE `data:` payload means.
#[derive(Debug, PartialEq)]
enum Decoded {
    Text(String),
    Stop,
    Failure(String),
    Skip,
}

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Stream tokens from the appropriate provider.
pub fn stream_llm(
    client: &Client,
    provider: LLMProvider,
    messages: Vec<ChatMessage>,
    model: &str,
    api_key: &str,
    temperature: f64,
    max_tokens: usize,
) -> BoxedStream {
    debug!("Streaming from {} with model {}", provider, model);
    match provider {
        LLMProvider::OpenAI | LLMProvider::Groq => {
            let url = if provider == LLMProvider::OpenAI {
                OPENAI_URL
            } else {
                GROQ_URL
            };
            let body = json!({
                "model": model,
                "messages": messages
                    .iter()
                    .map(|m| json!({"role": m.role, "content": m.content}))
                    .collect::<Vec<_>>(),
                "temperature": temperature,
                "max_tokens": max_tokens,
                "stream": true,
            });
            let request = client
                .post(url)
                .header("Authorization", format!("Bearer {}", api_key))
                .json(&body);
            Box::pin(sse_stream(request, decode_openai))
        }
        LLMProvider::Anthropic => {
            let mut body = json!({
                "model": model,
                "messages": conversation(&messages, "user"),
                "temperature": temperature,
                "max_tokens": max_tokens,
                "stream": true,
            });
            if let Some(sys) = system_text(&messages) {
                body["system"] = json!(sys);
            }
            let request = client
                .post(ANTHROPIC_URL)
                .header("x-api-key", api_key)
                .header("anthropic-version", "2023-06-01")
                .json(&body);
            Box::pin(sse_stream(request, decode_anthropic))
        }
        LLMProvider::Gemini => {
            let contents: Vec<Value> = messages
                .iter()
                .filter(|m| m.role != "system")
                .map(|m| {
                    let role = if m.role == "assistant" { "model" } else { "user" };
                    json!({"role": role, "parts": [{"text": m.content}]})
                })
                .collect();
            let mut body = json!({
                "contents": contents,
                "generationConfig": {
                    "temperature": temperature,
                    "maxOutputTokens": max_tokens,
                },
            });
            if let Some(sys) = system_text(&messages) {
                body["systemInstruction"] = json!({"parts": [{"text": sys}]});
            }
            let url = format!("{GEMINI_BASE_URL}/{model}:streamGenerateContent?alt=sse");
            let request = client
                .post(url)
                .header("x-goog-api-key", api_key)
                .json(&body);
            Box::pin(sse_stream(request, decode_gemini))
        }
    }
}

fn system_text(messages: &[ChatMessage]) -> Option<String> {
    messages
        .iter()
        .find(|m| m.role == "system")
        .map(|m| m.content.clone())
}

fn conversation(messages: &[ChatMessage], default_role: &str) -> Vec<Value> {
    messages
        .iter()
        .filter(|m| m.role != "system")
        .map(|m| {
            let role = if m.role.is_empty() { default_role } else { &m.role };
            json!({"role": role, "content": m.content})
        })
        .collect()
}

/// Send the request and turn SSE `data:` lines into chunks.
fn sse_stream(
    request: RequestBuilder,
    decode: fn(&str) -> Decoded,
) -> impl Stream<Item = StreamChunk> + Send + 'static {
    async_stream::stream! {
        let response = match request
            .header("Content-Type", "application/json")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                yield StreamChunk::Error(format!("Request failed: {}", e));
                return;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            yield StreamChunk::Error(format!("API error {}: {}", status, body));
            return;
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut token_count = 0usize;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    yield StreamChunk::Error(format!("Stream read error: {}", e));
                    return;
                }
            };

            buffer.push_str(&String::from_utf8_lossy(&bytes));

            while let Some(line_end) = buffer.find('\n') {
                let line = buffer[..line_end].trim().to_string();
                buffer = buffer[line_end + 1..].to_string();

                // Comments and Anthropic's "event:" lines carry nothing we need.
                let Some(data) = line.strip_prefix("data:") else {
                    continue;
                };
                match decode(data.trim()) {
                    Decoded::Text(text) => {
                        token_count += 1;
                        yield StreamChunk::Token(text);
                    }
                    Decoded::Stop => {
                        yield StreamChunk::Done { tokens_used: token_count };
                        return;
                    }
                    Decoded::Failure(msg) => {
                        error!("Provider error: {}", msg);
                        yield StreamChunk::Error(msg);
                        return;
                    }
                    Decoded::Skip => {}
                }
            }
        }

        yield StreamChunk::Done { tokens_used: token_count };
    }
}

fn non_empty(text: Option<&str>) -> Decoded {
    match text {
        Some(t) if !t.is_empty() => Decoded::Text(t.to_string()),
        _ => Decoded::Skip,
    }
}

fn decode_openai(data: &str) -> Decoded {
    if data == "[DONE]" {
        return Decoded::Stop;
    }
    match serde_json::from_str::<Value>(data) {
        Ok(parsed) => non_empty(parsed["choices"][0]["delta"]["content"].as_str()),
        Err(_) => Decoded::Skip,
    }
}

fn decode_anthropic(data: &str) -> Decoded {
    let Ok(parsed) = serde_json::from_str::<Value>(data) else {
        return Decoded::Skip;
    };
    match parsed["type"].as_str() {
        Some("content_block_delta") => non_empty(parsed["delta"]["text"].as_str()),
        Some("message_stop") => Decoded::Stop,
        Some("error") => Decoded::Failure(
            parsed["error"]["message"]
                .as_str()
                .unwrap_or("Unknown error")
                .to_string(),
        ),
        _ => Decoded::Skip,
    }
}

fn decode_gemini(data: &str) -> Decoded {
    let Ok(parsed) = serde_json::from_str::<Value>(data) else {
        return Decoded::Skip;
    };
    if let Some(msg) = parsed["error"]["message"].as_str() {
        return Decoded::Failure(msg.to_string());
    }
    let parts = parsed["candidates"][0]["content"]["parts"].as_array();
    let text: String = parts
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default();
    non_empty(Some(&text))
}

/// Drain a stream into the full completion text.
pub async fn collect_text(mut stream: BoxedStream) -> Result<String> {
    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            StreamChunk::Token(t) => text.push_str(&t),
            StreamChunk::Done { .. } => break,
            StreamChunk::Error(e) => return Err(Error::Provider(e)),
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_openai() {
        assert_eq!(
            decode_openai(r#"{"choices":[{"delta":{"content":"{\"is"}}]}"#),
            Decoded::Text("{\"is".into())
        );
        assert_eq!(decode_openai(r#"{"choices":[{"delta":{}}]}"#), Decoded::Skip);
        assert_eq!(decode_openai("[DONE]"), Decoded::Stop);
    }

    #[test]
    fn test_decode_anthropic() {
        assert_eq!(
            decode_anthropic(r#"{"type":"content_block_delta","delta":{"text":"65"}}"#),
            Decoded::Text("65".into())
        );
        assert_eq!(decode_anthropic(r#"{"type":"message_stop"}"#), Decoded::Stop);
        assert_eq!(
            decode_anthropic(r#"{"type":"error","error":{"message":"overloaded"}}"#),
            Decoded::Failure("overloaded".into())
        );
        assert_eq!(decode_anthropic(r#"{"type":"ping"}"#), Decoded::Skip);
    }

    #[test]
    fn test_decode_gemini() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"体重"},{"text":"65"}]}}]}"#;
        assert_eq!(decode_gemini(data), Decoded::Text("体重65".into()));
        assert_eq!(
            decode_gemini(r#"{"error":{"message":"API key not valid"}}"#),
            Decoded::Failure("API key not valid".into())
        );
        assert_eq!(decode_gemini("not json"), Decoded::Skip);
    }

    #[tokio::test]
    async fn test_collect_text() {
        let chunks = vec![
            StreamChunk::Token("{\"a\":".into()),
            StreamChunk::Token("1}".into()),
            StreamChunk::Done { tokens_used: 2 },
            StreamChunk::Token("ignored".into()),
        ];
        let stream: BoxedStream = Box::pin(tokio_stream::iter(chunks));
        assert_eq!(collect_text(stream).await.unwrap(), "{\"a\":1}");

        let failing: BoxedStream = Box::pin(tokio_stream::iter(vec![StreamChunk::Error(
            "API error 401".into(),
        )]));
        assert!(matches!(collect_text(failing).await, Err(Error::Provider(_))));
    }
}
