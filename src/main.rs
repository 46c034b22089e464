//! Google Docs Tools Server
//!
//! An HTTP tool server that lets an automated agent create Google Docs.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use gdocs_tools_server::config::Config;
use gdocs_tools_server::error::Result;
use gdocs_tools_server::google::auth::{CredentialManager, GoogleAuthorizationServer};
use gdocs_tools_server::google::docs::{DocsClient, GoogleDocsApi};
use gdocs_tools_server::mcp::server;
use gdocs_tools_server::mcp::tools::ToolHandler;

/// Google Docs Tools Server
#[derive(Parser)]
#[command(name = "gdocs-tools-server")]
#[command(author, version, about = "Google Docs Tools Server - create Google Docs over a tool API")]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP tool server (default)
    Serve,

    /// Authorize with Google and store credentials, then exit
    Auth,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::new()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    if !config.secrets_exist() {
        tracing::warn!(
            path = %config.secrets_path.display(),
            "OAuth client secrets not found; authorization will fail until it is provided"
        );
    }

    let auth_server = Arc::new(GoogleAuthorizationServer::new(&config));
    let credentials = Arc::new(CredentialManager::new(&config, auth_server));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Auth => {
            credentials.obtain_credential().await?;
            eprintln!(
                "Credentials stored at {}",
                credentials.store().path().display()
            );
        }
        Commands::Serve => {
            let docs_client = Arc::new(DocsClient::new(Arc::new(GoogleDocsApi::new()), credentials));
            let tools = Arc::new(ToolHandler::new(docs_client));
            server::serve(&config, tools).await?;
        }
    }

    Ok(())
}
