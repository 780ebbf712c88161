//! Infrastructure layer for paychat.
//!
//! Contains the concrete adapters for the ports defined in `paychat-core`:
//! the OpenAI-compatible chat provider, the Fapshi payment gateway, the
//! SQLite bootstrap check, and configuration/credential loading.

pub mod config;
pub mod llm;
pub mod payment;
pub mod sqlite;
