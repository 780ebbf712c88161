//! Shared domain types for paychat.
//!
//! This crate contains the types used across the workspace: chat messages
//! and transcripts, completion request/response shapes, payment requests,
//! configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod payment;
