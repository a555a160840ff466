use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::SummaryConfig;
use crate::utils::truncate_chars;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude summarizer over the Messages API
pub struct Summarizer {
    config: SummaryConfig,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl Summarizer {
    pub fn new(config: SummaryConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            api_key: api_key.into(),
            client,
        })
    }

    /// Override the configured model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Summarize a transcript, optionally steered by a focus request
    pub async fn summarize(&self, transcript: &str, focus: Option<&str>) -> Result<String> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![Message {
                role: "user",
                content: build_prompt(transcript, focus, self.config.max_transcript_chars),
            }],
        };

        debug!("Sending summary request to {} ({})", self.config.endpoint, self.config.model);

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .context("Failed to reach the summary API")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Summary API error {}: {}", status, text));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .context("Failed to parse summary response")?;

        summary_text(body)
    }
}

/// Build the user prompt for a transcript, truncated to `max_chars`
pub fn build_prompt(transcript: &str, focus: Option<&str>, max_chars: usize) -> String {
    let truncated = truncate_chars(transcript, max_chars);

    match focus.map(str::trim).filter(|f| !f.is_empty()) {
        Some(focus) => format!(
            "Here is the transcript of a YouTube video. The user has a specific request:\n\n\
             \"{focus}\"\n\n\
             Answer the request thoroughly using the transcript. \
             Use headings and bullet points for readability.\n\n\
             Transcript:\n{truncated}"
        ),
        None => format!(
            "Summarize the transcript of this YouTube video. Write a clear, well-structured \
             summary covering the key points, arguments and conclusions, detailed enough that \
             someone who has not watched the video understands its full content. \
             Use headings and bullet points for readability.\n\n\
             Transcript:\n{truncated}"
        ),
    }
}

fn summary_text(response: MessagesResponse) -> Result<String> {
    let text: Vec<String> = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();

    if text.is_empty() {
        return Err(anyhow!("Summary response contained no text"));
    }

    Ok(text.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer one request on a local socket; the handle yields the raw request
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/v1/messages", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);

                if let Some(head_end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..head_end]).to_ascii_lowercase();
                    let length = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|value| value.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\
                 connection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8(request).unwrap()
        });

        (endpoint, server)
    }

    fn summarizer_for(endpoint: String) -> Summarizer {
        let mut config = Config::default().summary;
        config.endpoint = endpoint;
        config.max_tokens = 256;
        Summarizer::new(config, "test-key")
            .unwrap()
            .with_model("claude-test")
    }

    #[test]
    fn test_general_prompt() {
        let prompt = build_prompt("line one\nline two", None, 100_000);
        assert!(prompt.starts_with("Summarize the transcript"));
        assert!(prompt.ends_with("Transcript:\nline one\nline two"));
    }

    #[test]
    fn test_blank_focus_is_general_summary() {
        assert_eq!(build_prompt("text", Some("  "), 100), build_prompt("text", None, 100));
    }

    #[test]
    fn test_focused_prompt_quotes_request() {
        let prompt = build_prompt("text", Some("list all action items"), 100);
        assert!(prompt.contains("\"list all action items\""));
        assert!(prompt.ends_with("Transcript:\ntext"));
    }

    #[test]
    fn test_prompt_truncates_transcript() {
        let transcript = "a".repeat(50);
        let prompt = build_prompt(&transcript, None, 10);
        assert!(prompt.ends_with(&format!("Transcript:\n{}", "a".repeat(10))));
        assert!(!prompt.contains(&"a".repeat(11)));
    }

    #[test]
    fn test_summary_text_joins_text_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"id":"msg_1","content":[
                {"type":"text","text":"Summary"},
                {"type":"tool_use","id":"t1"},
                {"type":"text","text":"- point"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(summary_text(response).unwrap(), "Summary\n- point");
    }

    #[test]
    fn test_summary_text_requires_text() {
        let response: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(summary_text(response).is_err());
    }

    #[test]
    fn test_with_model_overrides_config() {
        let summarizer = Summarizer::new(Config::default().summary, "key")
            .unwrap()
            .with_model("claude-opus-4-1");
        assert_eq!(summarizer.model(), "claude-opus-4-1");
    }

    #[tokio::test]
    async fn test_summarize_posts_messages_request() {
        let (endpoint, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"content":[{"type":"text","text":"Summary"},{"type":"text","text":"- point"}]}"#,
        )
        .await;

        let summary = summarizer_for(endpoint)
            .summarize("first line\nsecond line", Some("key points"))
            .await
            .unwrap();
        assert_eq!(summary, "Summary\n- point");

        let request = server.await.unwrap();
        let (head, body) = request.split_once("\r\n\r\n").unwrap();
        let head = head.to_ascii_lowercase();
        assert!(head.starts_with("post /v1/messages "));
        assert!(head.contains("x-api-key: test-key"));
        assert!(head.contains("anthropic-version: 2023-06-01"));

        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["model"], "claude-test");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        let content = body["messages"][0]["content"].as_str().unwrap();
        assert!(content.contains("\"key points\""));
        assert!(content.ends_with("Transcript:\nfirst line\nsecond line"));
    }

    #[tokio::test]
    async fn test_summarize_rejects_error_status() {
        let (endpoint, server) = serve_once(
            "HTTP/1.1 401 Unauthorized",
            r#"{"type":"error","error":{"type":"authentication_error"}}"#,
        )
        .await;

        let err = summarizer_for(endpoint)
            .summarize("text", None)
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("authentication_error"));

        server.await.unwrap();
    }
}
