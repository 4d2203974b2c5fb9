//! Screener - terminal client for the resume-screening service
//!
//! This library holds the client-side workflow: session handling, resume
//! upload and extraction, ranking against a job description, and candidate
//! notification, all coordinated by a single orchestrator over shared state.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod models;
pub mod session;
pub mod workflow;

// Re-export the types a caller needs to drive the client
pub use api::{HttpScreeningApi, ScreeningApi};
pub use auth::{Access, Authorizer, View};
pub use config::Config;
pub use errors::{ClientError, RemoteError, ValidationError};
pub use models::{RankedCandidate, ResumeRecord, SelectedFile};
pub use session::{SessionStore, SessionToken};
pub use workflow::{OpKind, OpStatus, Workflow};
