use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portfolio_ai::ai::GeminiClient;
use portfolio_ai::client::{Page, ProxyClient, Session};
use portfolio_ai::models::Config;
use portfolio_ai::proxy::{self, ProxyState};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "portfolio-ai")]
#[command(about = "Prompt proxy and headless client for an AI-assisted portfolio")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the prompt proxy endpoint.
    Serve {
        /// Port to listen on (overrides PORT).
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate the description of one project card.
    Describe {
        /// Page content JSON.
        #[arg(long, value_name = "FILE")]
        page: PathBuf,
        /// Zero-based index of the project card.
        #[arg(long, default_value_t = 0)]
        project: usize,
        /// Proxy endpoint URL (overrides PROXY_URL).
        #[arg(long)]
        proxy_url: Option<String>,
    },
    /// Chat about the page; questions are read from stdin, one per line.
    Chat {
        /// Page content JSON.
        #[arg(long, value_name = "FILE")]
        page: PathBuf,
        /// Proxy endpoint URL (overrides PROXY_URL).
        #[arg(long)]
        proxy_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_ai=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = Config::from_env()?;

    match args.command {
        Command::Serve { port } => serve(&config, port.unwrap_or(config.port)).await,
        Command::Describe {
            page,
            project,
            proxy_url,
        } => {
            let session = build_session(&config, &page, proxy_url)?;
            match session.describe_project(project).await? {
                Some(description) => println!("{}", description),
                None => warn!("Description was superseded by a newer request"),
            }
            Ok(())
        }
        Command::Chat { page, proxy_url } => {
            let session = build_session(&config, &page, proxy_url)?;
            chat(&session).await
        }
    }
}

async fn serve(config: &Config, port: u16) -> Result<()> {
    info!("Starting portfolio-ai proxy v{}", env!("CARGO_PKG_VERSION"));

    if config.gemini_api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; upstream calls will be rejected");
    }

    let gemini = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone())
        .with_base_url(config.gemini_base_url.clone());
    info!("Gemini client initialized (model: {})", gemini.model());

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    proxy::serve(listener, ProxyState::new(Arc::new(gemini))).await?;
    Ok(())
}

fn build_session(config: &Config, page: &Path, proxy_url: Option<String>) -> Result<Session> {
    let page = Page::from_file(page)
        .with_context(|| format!("Failed to load page from {}", page.display()))?;
    let proxy_url = proxy_url.unwrap_or_else(|| config.proxy_url.clone());
    info!("Using proxy endpoint {}", proxy_url);

    Ok(Session::new(
        Arc::new(ProxyClient::new(proxy_url)),
        Arc::new(page),
    ))
}

async fn chat(session: &Session) -> Result<()> {
    session.toggle_chat();
    eprintln!("Chat is open. Ask a question (Ctrl-D to quit).");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(reply) = session.submit_chat(&line).await {
            println!("{}\n", reply);
        }
    }
    Ok(())
}
