//! Narrative report generation via a remote generative-language API.
//!
//! Two call shapes share one resilient client: polishing a single note
//! and generating a full narrative report from a session snapshot. The
//! API key comes from a pluggable [`CredentialStore`] with a two-hour
//! expiry enforced at read time.

pub mod client;
pub mod credentials;
pub mod prompt;
pub mod types;

pub use client::{ReportClient, DEFAULT_ENDPOINT, DEFAULT_MAX_ATTEMPTS, DEFAULT_MODEL};
pub use credentials::{
    CredentialError, CredentialStore, KeyringCredentialStore, MemoryCredentialStore,
    CREDENTIAL_TTL_SECS,
};
pub use types::{GenerationParams, ReportError};
