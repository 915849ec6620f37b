//! Core types for report generation.

use thiserror::Error;

use super::credentials::CredentialError;

/// Generation parameters sent with each request. Each call shape carries
/// its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationParams {
    /// Parameters for polishing a short note.
    pub fn polish() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 256,
        }
    }

    /// Parameters for the full narrative report.
    pub fn report() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 2048,
        }
    }
}

/// Report client error taxonomy.
#[derive(Debug, Error)]
pub enum ReportError {
    /// No usable API key. Raised before any network attempt.
    #[error("no API key configured")]
    MissingCredential,

    /// The credential store itself failed.
    #[error("credential store error: {0}")]
    Credential(#[from] CredentialError),

    /// Non-retryable API rejection with the extracted message.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transient server-side failure (5xx).
    #[error("server error ({status})")]
    Server { status: u16 },

    /// Success envelope without the generated-text path.
    #[error("response contained no generated text")]
    MissingText,

    /// Transport failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ReportError {
    /// Whether the retry loop may re-attempt after this failure. Parse
    /// failures consume retry budget exactly like transport failures.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ReportError::Server { .. } | ReportError::MissingText | ReportError::Network(_)
        )
    }
}
