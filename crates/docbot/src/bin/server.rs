//! DocBot server binary
//!
//! Run with: cargo run -p docbot --bin docbot-server -- --port 8000

use std::path::PathBuf;

use clap::Parser;
use docbot::{config::DocbotConfig, server::DocbotServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Document question-answering backend
#[derive(Debug, Parser)]
#[command(name = "docbot-server", version, about)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long, env = "DOCBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Host address to bind to (overrides config and DOCBOT_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config and DOCBOT_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<DocbotConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = DocbotConfig::from_toml_file(path)?;
                config.apply_env()?;
                config
            }
            None => DocbotConfig::from_env()?,
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docbot=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Provider: {}", config.llm.provider);
    tracing::info!("  - Model: {}", config.llm.model_name());
    tracing::info!("  - Max upload: {} MB", config.limits.max_upload_size_mb);
    tracing::info!("  - Max documents: {}", config.limits.max_documents);
    tracing::info!("  - Reference policy: {:?}", config.limits.reference_policy);
    tracing::debug!("{:?}", config.llm);

    let server = DocbotServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/upload    - Upload a document");
    println!("  GET  /api/documents - List documents");
    println!("  POST /api/chat      - Ask about documents");
    println!("  POST /api/query     - Ask a free-text question");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
