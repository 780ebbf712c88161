//! Conversation sessions.
//!
//! A `ChatSession` owns one transcript and drives exchanges through the
//! shared `RetryingCompletionClient`.

pub mod session;
