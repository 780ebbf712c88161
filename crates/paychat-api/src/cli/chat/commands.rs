//! Slash command parsing for the chat loop.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Clear the terminal screen.
    Clear,
    Exit,
    /// Drop the conversation back to the greeting.
    Reset,
    /// Reprint the conversation so far.
    History,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/reset" | "/new" => Some(ChatCommand::Reset),
        "/history" => Some(ChatCommand::History),
        _ => Some(ChatCommand::Unknown(cmd)),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}    Show this help message", style("/help").cyan());
    println!("  {} Show the conversation so far", style("/history").cyan());
    println!("  {}   Start over from the greeting", style("/reset").cyan());
    println!("  {}   Clear the screen", style("/clear").cyan());
    println!("  {}    End the chat session", style("/exit").cyan());
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
