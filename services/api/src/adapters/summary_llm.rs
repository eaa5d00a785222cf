//! services/api/src/adapters/summary_llm.rs
//!
//! This module contains the adapter for the document-summary LLM.
//! It implements the `Summarizer` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use doclens_core::domain::DocumentAnalysis;
use doclens_core::ports::{PortError, PortResult, Summarizer};

const SYSTEM_INSTRUCTIONS: &str = "You are a document analysis assistant. Summarize the \
given document text in clear prose: the main topic, the key points, and any notable \
conclusions. Keep the summary under 300 words. Respond with ONLY the summary text, no \
headings and no preamble.";

/// An adapter that implements `Summarizer` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiSummaryAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiSummaryAdapter {
    /// Creates a new `OpenAiSummaryAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummaryAdapter {
    async fn summarize_document(&self, analysis: &DocumentAnalysis) -> PortResult<String> {
        // Long documents get truncated rather than rejected; the opening
        // pages carry most of the summary signal.
        let excerpt = analysis.text.chars().take(12_000).collect::<String>();

        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_INSTRUCTIONS)
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(format!(
                        "Document \"{}\" ({} pages, {} words):\n\n{}",
                        analysis.title, analysis.total_pages, analysis.total_words, excerpt
                    ))
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(500u32)
            .temperature(0.3)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PortError::Unavailable(e.to_string()))?;

        let summary = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| PortError::Unexpected("No summary generated".to_string()))?;

        Ok(summary.trim().to_string())
    }
}
