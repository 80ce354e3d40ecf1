//! Text-correction collaborator
//!
//! Turns a raw spaced-letter transcript ("H E L L O") into a proper
//! sentence via an OpenAI-compatible chat-completions API. Callers treat
//! correction as best-effort: any failure here falls back to the raw text.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

const SYSTEM_PROMPT: &str = r#"CRITICAL RULE: Return ONLY the corrected sentence. No explanations, no input/output labels.
1. Return ONLY the corrected sentence - no explanations, labels, or quotes
2. NEVER change original words or grammar structures
3. NEVER add, remove, or modify words
4. ONLY fix spelling errors and join spaced letters
5. Add punctuation ONLY when clearly needed
6. Keep known acronyms exactly as they are (BMW stays BMW)
7. Maintain proper sentence case

Examples:
Input: I A M G O I N G H O M E
Output: I Am Going Home.

Input: W H E R E A R E Y O U G O I N G
Output: Where Are You Going?

Input: H E L L O W O R L D
Output: Hello World.

Input: T H A N K Y O U V E R Y M U C H
Output: Thank You Very Much."#;

/// Sentence-correction collaborator trait
#[async_trait::async_trait]
pub trait TextCorrector: Send + Sync {
    /// Correct a raw spaced-letter string into a sentence
    async fn correct(&self, raw: &str) -> Result<String>;
}

/// Request/response types for the chat-completions API
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Corrector backed by an OpenAI-compatible HTTP API
pub struct OpenAiCorrector {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCorrector {
    pub fn new(api_url: String, api_key: String, model: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait::async_trait]
impl TextCorrector for OpenAiCorrector {
    async fn correct(&self, raw: &str) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: raw.to_string(),
                },
            ],
            temperature: 0.0,
        };

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Correction request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Correction API error {}: {}", status, text);
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .context("Malformed correction response")?;

        match parsed.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content.trim().to_string()),
            None => bail!("Correction response contained no choices"),
        }
    }
}

/// Corrector used when no API key is configured; echoes the input
pub struct DisabledCorrector;

#[async_trait::async_trait]
impl TextCorrector for DisabledCorrector {
    async fn correct(&self, raw: &str) -> Result<String> {
        Ok(raw.to_string())
    }
}

/// Pick a corrector based on configuration
pub fn corrector_from_config(cfg: &crate::config::CorrectionConfig) -> Result<Box<dyn TextCorrector>> {
    if cfg.api_key.is_empty() {
        info!("No correction API key configured, text correction disabled");
        return Ok(Box::new(DisabledCorrector));
    }

    let corrector = OpenAiCorrector::new(
        cfg.api_url.clone(),
        cfg.api_key.clone(),
        cfg.model.clone(),
        Duration::from_secs(cfg.timeout_secs),
    )?;

    Ok(Box::new(corrector))
}
