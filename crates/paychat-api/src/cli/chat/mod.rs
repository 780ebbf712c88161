//! Interactive CLI chat for paychat.
//!
//! Reads lines with an async readline, runs each one as an exchange on a
//! `ChatSession`, and shows a spinner for the whole exchange including any
//! rate-limit backoff. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
