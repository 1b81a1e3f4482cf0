/// LLM Client — the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: no other module may call the generation service
/// directly. All quote generation MUST go through `QuoteClient`.
///
/// The transport is behind the `TextGenerator` trait so tests can substitute
/// an in-process mock; production wires in `gemini::GeminiClient`.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, warn};

pub mod gemini;
pub mod prompts;

/// Maximum generation attempts per quote, counting the first call.
const MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited (status 429)")]
    RateLimited,

    #[error("generation returned empty content")]
    EmptyContent,
}

/// A single-shot text-generation backend. One call, one result; the retry
/// policy lives in `QuoteClient`, not in implementations.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_content(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Resilient quote source: drives a `TextGenerator` with bounded retry and
/// linear backoff on rate-limit responses.
pub struct QuoteClient {
    service: Arc<dyn TextGenerator>,
    prompt: String,
}

impl QuoteClient {
    pub fn new(service: Arc<dyn TextGenerator>) -> Self {
        Self {
            service,
            prompt: prompts::QUOTE_PROMPT.to_string(),
        }
    }

    /// Requests one quote from the generation service.
    ///
    /// Retries only on rate-limit responses, waiting `attempt * 2` seconds
    /// before each retry (2s, 4s, 6s, 8s). Any other error is terminal and
    /// yields `None` immediately; so does exhausting all attempts. Each call
    /// is independent: no conversation state is carried between quotes.
    pub async fn generate(&self) -> Option<String> {
        for attempt in 1..=MAX_ATTEMPTS {
            match self.service.generate_content(&self.prompt).await {
                Ok(text) => return Some(prompts::strip_quote_marks(&text).to_string()),
                Err(LlmError::RateLimited) => {
                    if attempt == MAX_ATTEMPTS {
                        break;
                    }
                    let delay = Duration::from_secs(u64::from(attempt) * 2);
                    warn!("Rate limit hit, retrying in {} seconds...", delay.as_secs());
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!("Error generating quote: {e}");
                    return None;
                }
            }
        }
        error!("Failed to generate quote after {MAX_ATTEMPTS} attempts.");
        None
    }
}
