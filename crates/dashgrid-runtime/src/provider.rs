//! Ordered fallback across completion providers.
//!
//! The insights widget asks an external model for text completions. Any one
//! backend can be down or rate-limited, so a [`ProviderChain`] tries its
//! providers in configured order and returns the first success, annotated
//! with the provider that produced it. Failures are logged and swallowed;
//! only exhausting the whole chain surfaces an error.

use thiserror::Error;
use tracing::warn;

/// Why a single provider failed to complete a prompt.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("malformed provider response: {0}")]
    Malformed(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Every provider in the chain failed.
#[derive(Debug, Error)]
#[error("all {attempts} completion providers failed")]
pub struct ChainExhausted {
    /// How many providers were tried.
    pub attempts: usize,
}

/// A successful completion and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Name of the provider that answered.
    pub provider: String,
    /// The completion text.
    pub text: String,
}

/// One completion backend.
pub trait Provider {
    /// Stable name for logs and [`Completion::provider`].
    fn name(&self) -> &str;

    /// Complete a prompt, or explain why this backend cannot.
    fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Providers tried in order until one succeeds.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn Provider>>,
}

impl ProviderChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider at the end of the fallback order (builder pattern).
    #[must_use]
    pub fn with(mut self, provider: Box<dyn Provider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Number of configured providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the chain has no providers. An empty chain always fails.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Try each provider in order; first success wins.
    pub fn complete(&self, prompt: &str) -> Result<Completion, ChainExhausted> {
        for provider in &self.providers {
            match provider.complete(prompt) {
                Ok(text) => {
                    return Ok(Completion {
                        provider: provider.name().to_string(),
                        text,
                    });
                }
                Err(err) => {
                    warn!(provider = provider.name(), error = %err, "provider failed, falling back");
                }
            }
        }
        Err(ChainExhausted {
            attempts: self.providers.len(),
        })
    }
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ProviderChain").field("providers", &names).finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
