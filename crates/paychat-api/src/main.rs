//! paychat CLI and REST API entry point.
//!
//! Binary name: `paychat`
//!
//! Loads `.env` and configuration, connects to the database, then dispatches
//! to the chat REPL, the payment command, or the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use console::style;
use tracing::{error, info};

use paychat_infra::config::{
    Credentials, apply_env_overrides, env_lookup, load_app_config, load_dotenv,
    resolve_config_path,
};
use paychat_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_path = load_dotenv();
    let cli = Cli::parse();

    // Shell completions don't need logging or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "paychat", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(filter_for_verbosity(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;
    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "loaded .env");
    }

    let config_path = resolve_config_path(cli.config.as_deref());
    let config = apply_env_overrides(load_app_config(config_path.as_deref()).await, env_lookup);

    let state = match AppState::init(config, Credentials::from_env()).await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "startup failed");
            eprintln!("  {} {e}", style("✗").red().bold());
            shutdown_tracing();
            std::process::exit(1);
        }
    };

    let mut exit_code = 0;

    match cli.command {
        Commands::Chat => {
            cli::chat::loop_runner::run_chat_loop(&state, cli.quiet).await?;
        }

        Commands::Pay(args) => {
            let confirmed = cli::pay::run_pay(&state, args, cli.json, cli.quiet).await?;
            if !confirmed {
                exit_code = 1;
            }
        }

        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} paychat API listening on {}",
                    style("⚡").bold(),
                    style(format!("http://{addr}")).cyan()
                );
                println!("  {}", style("Press Ctrl+C to stop").dim());
            }

            let shutdown = state.shutdown.clone();
            let router = http::router::build_router(state.clone());

            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    shutdown_signal().await;
                    info!("shutdown requested, cancelling in-flight exchanges");
                    shutdown.cancel();
                })
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    state.database.close().await;
    shutdown_tracing();

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
