//! Main chat loop orchestration.
//!
//! Owns one `ChatSession` for the lifetime of the loop. Each submitted line
//! is one exchange; failures print a generic notice and the loop carries on.

use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use paychat_core::chat::session::ChatSession;
use paychat_core::llm::box_provider::BoxLlmProvider;
use paychat_types::error::ChatError;
use paychat_types::llm::{Message, MessageRole};

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

/// Run the interactive chat loop until `/exit` or Ctrl+D.
pub async fn run_chat_loop(state: &AppState, quiet: bool) -> anyhow::Result<()> {
    let mut session = ChatSession::new(
        state.chat_client.clone(),
        state.config.chat.system_prompt.clone(),
    );
    let session_id = session.id().to_string();
    info!(session_id = %session_id, "chat session started");

    if !quiet {
        print_welcome_banner(state.chat_client.model(), &session_id);
    }

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Line(text) if text.is_empty() => continue,
            InputEvent::Line(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => break,
                ChatCommand::Reset => {
                    session.reset();
                    println!("\n  {}\n", style("Conversation reset.").dim());
                }
                ChatCommand::History => print_history(session.transcript().visible()),
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        run_exchange(&mut session, &text, quiet).await;
    }

    session.close();
    chat_input.finish();
    info!(
        session_id = %session_id,
        exchanges = session.exchange_count(),
        "chat session ended"
    );
    println!("\n  {}", style("Session ended.").dim());
    Ok(())
}

/// Send one line and print the reply or the generic notice.
async fn run_exchange(session: &mut ChatSession<BoxLlmProvider>, text: &str, quiet: bool) {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        thinking_spinner()
    };

    let start = Instant::now();
    let result = session.send(text).await;
    spinner.finish_and_clear();

    match result {
        Ok(reply) => {
            debug!(elapsed_ms = start.elapsed().as_millis() as u64, "exchange complete");
            println!();
            println!("  {} {}", style("AI:").cyan().bold(), reply.content.trim());
            println!();
        }
        Err(ChatError::EmptyMessage) => {}
        Err(e) => {
            warn!(error = %e, "exchange failed");
            eprintln!();
            eprintln!("  {} {}", style("!").red().bold(), e.user_notice());
            eprintln!("  {}", style("Type a message to try again, /exit to quit.").dim());
            eprintln!();
        }
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn print_history<'a>(messages: impl Iterator<Item = &'a Message>) {
    println!();
    let mut any = false;
    for line in history_lines(messages) {
        any = true;
        println!("  {line}");
    }
    if !any {
        println!("  {}", style("No messages yet.").dim());
    }
    println!();
}

/// `You:` / `AI:` lines for the visible transcript, long messages shortened.
fn history_lines<'a>(messages: impl Iterator<Item = &'a Message>) -> impl Iterator<Item = String> {
    messages.map(|msg| {
        let label = match msg.role {
            MessageRole::User => style("You:").green().bold(),
            _ => style("AI:").cyan().bold(),
        };
        format!("{label} {}", preview(&msg.content, 100))
    })
}

fn preview(content: &str, max_chars: usize) -> String {
    let content = content.trim();
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let cut: String = content.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{cut}...")
}
