//! Core logic and port definitions for paychat.
//!
//! This crate defines the "ports" (provider/gateway traits) that the
//! infrastructure layer implements, plus the logic that runs on top of them:
//! the rate-limit retry client, the chat session, and the payment initiator.
//! It depends only on `paychat-types` -- never on `paychat-infra` or any
//! network crate.

pub mod chat;
pub mod llm;
pub mod payment;
