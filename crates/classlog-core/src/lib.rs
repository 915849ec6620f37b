//! # Classlog Core Library
//!
//! This library provides the core business logic for the Classlog
//! classroom-observation logger. It implements a CLI-first philosophy where
//! all operations are available via a standalone CLI binary; any GUI would
//! be a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Session Engine**: A caller-driven state machine that requires the
//!   caller to invoke `tick()` once per second for mode accumulation and
//!   `poll_reminder()` on a slower cadence for the idle-engagement check
//! - **Runtime**: Owned, abortable recurring timers that drive the engine
//!   when a session is hosted in-process
//! - **Report**: Remote generative-language client with bounded retry and
//!   exponential backoff, plus keyring-backed API key storage
//! - **Storage**: SQLite-based observation archive and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`ObserverSession`]: Core observation session state machine
//! - [`ReportClient`]: Narrative report and note-polish client
//! - [`Database`]: Observation archive and key-value persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod report;
pub mod session;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use report::{
    CredentialStore, KeyringCredentialStore, MemoryCredentialStore, ReportClient, ReportError,
};
pub use session::{
    CatalogEntry, EngagementLevel, LogEntry, LogKind, ObserverSession, SessionSnapshot,
    SessionStatus, SessionTimers,
};
pub use storage::{Config, Database, ObservationRecord};
