//! # Agora - Knowledge Graph Exploration Workspace
//!
//! The main binary for the Agora coordinated multi-view workspace.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     apps/agora (THE BINARY)                    │
//! │                                                                │
//! │  ┌─────────────┐   ┌────────────────┐   ┌──────────────────┐  │
//! │  │   CLI       │   │ WorkspaceStore │   │  OverviewClient  │  │
//! │  │  (clap)     │   │ (tokio, watch) │   │  (reqwest)       │  │
//! │  └──────┬──────┘   └───────┬────────┘   └────────┬─────────┘  │
//! │         │                  │                     │            │
//! │         └──────────────────┼─────────────────────┘            │
//! │                            ▼                                  │
//! │                    ┌───────────────┐                          │
//! │                    │  agora-core   │                          │
//! │                    │  (THE LOGIC)  │                          │
//! │                    └───────────────┘                          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Workspace summary for a filter
//! agora status --types person,concept --periods hellenistic
//!
//! # Reduce a local graph document and compute positions
//! agora network -f graph.json --types person --layout --json-mode
//!
//! # Evidence board and constellations
//! agora evidence --search logos
//! agora constellation
//!
//! # Path between two nodes
//! agora path -s plato -t plotinus -d 5
//! ```

use agora::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — AGORA_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("AGORA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "agora=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Agora startup banner.
fn print_banner() {
    println!(
        r#"
   █████╗  ██████╗  ██████╗ ██████╗  █████╗
  ██╔══██╗██╔════╝ ██╔═══██╗██╔══██╗██╔══██╗
  ███████║██║  ███╗██║   ██║██████╔╝███████║
  ██╔══██║██║   ██║██║   ██║██╔══██╗██╔══██║
  ██║  ██║╚██████╔╝╚██████╔╝██║  ██║██║  ██║
  ╚═╝  ╚═╝ ╚═════╝  ╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═╝

  Knowledge Graph Exploration Workspace v{}

  One filter state • Four overviews • Deterministic layouts
"#,
        env!("CARGO_PKG_VERSION")
    );
}
