//! Async line input for the chat loop.
//!
//! `rustyline_async` keeps the prompt usable while an exchange is in flight
//! and gives line history for free.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

#[derive(Debug)]
pub enum InputEvent {
    /// A submitted line, already trimmed. May be empty.
    Line(String),
    /// Ctrl+D, or the terminal went away.
    Eof,
    /// Ctrl+C at the prompt.
    Interrupted,
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Returns the reader and a writer that prints above the prompt.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, writer) = Readline::new(prompt)?;
        Ok((Self { rl }, writer))
    }

    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    self.rl.add_history_entry(line.clone());
                }
                InputEvent::Line(line)
            }
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Ok(ReadlineEvent::Eof) | Err(_) => InputEvent::Eof,
        }
    }

    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Restore the terminal before the process prints anything else.
    pub fn finish(mut self) {
        let _ = self.rl.flush();
    }
}
