//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod ask_question;
pub mod session_controller;
pub mod upload_document;

#[cfg(test)]
pub(crate) mod test_support;
