//! Session domain.
//!
//! - [`entities::Session`]: the upload/conversation state machine
//! - [`message::Message`]: a single transcript entry
//! - [`snapshot::SessionSnapshot`]: read-only view handed to front ends

pub mod entities;
pub mod message;
pub mod snapshot;
