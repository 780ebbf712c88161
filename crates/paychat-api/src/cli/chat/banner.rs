//! Welcome banner display for chat sessions.

use console::style;

/// Print the banner at the start of a chat session.
pub fn print_welcome_banner(model: &str, session_id: &str) {
    println!();
    println!("  {}", style("Chat with AI").cyan().bold());
    println!();
    println!("  {}  {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(short_id(session_id)).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}

fn short_id(session_id: &str) -> &str {
    session_id.get(..8).unwrap_or(session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates() {
        assert_eq!(short_id("0192f3a4-aaaa-bbbb"), "0192f3a4");
        assert_eq!(short_id("abc"), "abc");
    }
}
