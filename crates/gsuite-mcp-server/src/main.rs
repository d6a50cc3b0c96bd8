//! gsuite-mcp entry point.

use std::process::ExitCode;

use clap::Parser;

use gsuite_mcp_core::tracing::{TracingConfig, init_tracing};
use gsuite_mcp_server::cli::{Cli, Command, ConfigAction};
use gsuite_mcp_server::config::ServerConfig;
use gsuite_mcp_server::error::ServerResult;
use gsuite_mcp_server::handlers::ToolContext;
use gsuite_mcp_server::router::ToolRouter;
use gsuite_mcp_server::stdio::McpServer;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is reserved for the protocol.
    let tracing_config = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ServerResult<()> {
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        None | Some(Command::Serve) => serve(config).await,
        Some(Command::Auth { force }) => auth(config, force).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => {
                println!("{}", config.to_toml()?);
                Ok(())
            }
            ConfigAction::Path => {
                println!("{}", ServerConfig::default_path().display());
                Ok(())
            }
        },
    }
}

async fn serve(config: ServerConfig) -> ServerResult<()> {
    let ctx = ToolContext::new(config)?;
    let server = McpServer::new(ToolRouter::new(ctx));
    server.run().await
}

async fn auth(config: ServerConfig, force: bool) -> ServerResult<()> {
    let ctx = ToolContext::new(config)?;
    if ctx.authenticator().is_authorized() && !force {
        println!("Already authorized. Use --force to re-authenticate.");
        return Ok(());
    }
    ctx.authenticator().authorize_interactive().await?;
    println!(
        "Authorization complete. Tokens stored at {}.",
        ctx.authenticator().token_path().display()
    );
    Ok(())
}
