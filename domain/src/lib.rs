//! Domain layer for docqa
//!
//! This crate contains the client-side session state machine for a remote
//! document question-answering service, plus the value objects it works with.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A [`Session`] tracks one upload/conversation workflow:
//!
//! ```text
//!   ┌────────────────────────── reset ──────────────────────────────┐
//!   ▼                                                               │
//! Idle ──begin_upload──▶ AwaitingUpload ──upload_succeeded──▶ DocumentReady
//!   ▲                        │ upload_failed                    │  ▲
//!   └────────────────────────┘                      begin_query │  │ query_succeeded
//!                                                               ▼  │ query_failed
//!                                                          AwaitingAnswer
//! ```
//!
//! Every request is a two-phase transition (`begin_*` then exactly one
//! resolution), so the pending state is observable. `reset` is taken from a
//! settled state only; while a request is pending it is refused with
//! [`SessionError::Busy`].
//!
//! ## Transcript
//!
//! An append-only list of [`Message`]s. User messages are appended
//! optimistically when a query is submitted.

pub mod core;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use core::{
    document::{DocumentFile, PDF_CONTENT_TYPE},
    error::{SessionError, ValidationError},
    query::Query,
};
pub use session::{
    entities::{Phase, PendingRequest, RequestKind, Session, SessionState},
    message::{Message, QUERY_ERROR_PREFIX, Role},
    snapshot::SessionSnapshot,
};
