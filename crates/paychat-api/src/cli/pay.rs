//! `paychat pay`: one payment initiation from the command line.

use anyhow::Result;
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};

use paychat_core::payment::form::{PaymentForm, parse_amount};
use paychat_core::payment::initiator::PaymentOutcome;

use super::PayArgs;
use crate::state::AppState;

/// Collect, validate and submit a payment.
///
/// Returns whether the gateway confirmed it, so the caller can set the exit
/// status.
///
/// # Examples
///
/// ```bash
/// # Prompt for the amount
/// paychat pay
///
/// # One-shot
/// paychat pay --amount 5000 --redirect-url https://example.com/thanks
/// ```
pub async fn run_pay(state: &AppState, args: PayArgs, json: bool, quiet: bool) -> Result<bool> {
    let amount = match args.amount {
        Some(a) => a,
        None => Input::<String>::new()
            .with_prompt("Amount")
            .validate_with(|input: &String| parse_amount(input).map(|_| ()).map_err(|e| e.to_string()))
            .interact_text()?,
    };

    let form = PaymentForm {
        amount,
        redirect_url: args
            .redirect_url
            .unwrap_or_else(|| state.config.payment.default_redirect_url.clone()),
        name: args.name,
        email: args.email,
        user_id: args.user_id,
        external_id: args.external_id,
        message: args.message,
    };
    let request = form.validate()?;

    let spinner = if json || quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        spinner.set_message("Processing payment...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        spinner
    };

    let outcome = state.payments.initiate(&request).await;
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
        return Ok(outcome.is_confirmed());
    }

    match &outcome {
        PaymentOutcome::Confirmed { message, link } => {
            println!();
            println!("  {} {}", style("✓").green().bold(), message);
            if let Some(link) = link {
                println!("  {}  {}", style("Link:").bold(), style(link).cyan());
            }
            println!();
        }
        PaymentOutcome::Failed => {
            eprintln!();
            eprintln!("  {} {}", style("✗").red().bold(), outcome.display_text());
            eprintln!();
        }
    }

    Ok(outcome.is_confirmed())
}

fn outcome_json(outcome: &PaymentOutcome) -> serde_json::Value {
    match outcome {
        PaymentOutcome::Confirmed { message, link } => serde_json::json!({
            "status": "confirmed",
            "message": message,
            "link": link,
        }),
        PaymentOutcome::Failed => serde_json::json!({
            "status": "failed",
            "message": outcome.display_text(),
        }),
    }
}
