//! # Agora CLI Module
//!
//! This module implements the CLI interface for Agora.
//!
//! ## Available Commands
//!
//! - `status` - Fetch all four overviews for a filter and summarize them
//! - `network` - Filter a local graph document, optionally with layout
//! - `evidence` - Fetch the argument-evidence overview and lay out the board
//! - `constellation` - Fetch concept clusters and lay out each constellation
//! - `path` - Ask the path service for a route between two nodes

mod commands;

use crate::client::FetchError;
use agora_core::{AgoraError, FilterPatch, FilterState};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

pub use commands::*;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Anything a CLI command can fail with: core-side errors from document
/// handling or client-side errors from the overview services.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] AgoraError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Agora - knowledge-graph exploration workspace
///
/// One canonical filter state, four server-computed overviews, and
/// deterministic layouts for every view.
#[derive(Parser, Debug)]
#[command(name = "agora")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a configuration file (defaults to ./agora.toml if present)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Filter dimensions shared by every command that talks to the services.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Node types to keep (comma-separated, e.g. person,concept)
    #[arg(short = 't', long = "types", value_delimiter = ',')]
    pub node_types: Vec<String>,

    /// Periods to keep (comma-separated)
    #[arg(short = 'p', long, value_delimiter = ',')]
    pub periods: Vec<String>,

    /// Schools to keep (comma-separated)
    #[arg(short = 's', long, value_delimiter = ',')]
    pub schools: Vec<String>,

    /// Relations to keep (comma-separated)
    #[arg(short = 'r', long, value_delimiter = ',')]
    pub relations: Vec<String>,

    /// Case-insensitive search term over label/description/period/school
    #[arg(long, default_value = "")]
    pub search: String,
}

impl FilterArgs {
    /// Build the patch these flags describe; untouched dimensions stay at
    /// their previous (empty) value.
    #[must_use]
    pub fn to_patch(&self) -> FilterPatch {
        fn non_empty(values: &[String]) -> Option<Vec<String>> {
            (!values.is_empty()).then(|| values.to_vec())
        }
        FilterPatch {
            node_kinds: non_empty(&self.node_types),
            periods: non_empty(&self.periods),
            schools: non_empty(&self.schools),
            relations: non_empty(&self.relations),
            search_term: (!self.search.is_empty()).then(|| self.search.clone()),
        }
    }

    /// The full filter state these flags describe.
    #[must_use]
    pub fn to_state(&self) -> FilterState {
        self.to_patch().apply(&FilterState::default())
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch all four overviews and summarize the workspace
    Status {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Filter a local graph document and optionally compute the network layout
    Network {
        /// Path to a Cytoscape-shaped graph document (JSON)
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Pruning budget override
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Also compute force-directed positions
        #[arg(short, long)]
        layout: bool,
    },

    /// Fetch the argument-evidence overview and lay out the flow board
    Evidence {
        #[command(flatten)]
        filters: FilterArgs,

        /// Board width in pixels
        #[arg(long, default_value = "960")]
        width: f64,

        /// Board height in pixels
        #[arg(long, default_value = "600")]
        height: f64,
    },

    /// Fetch concept clusters and lay out each constellation
    Constellation {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Compute a path between two nodes via the path service
    Path {
        /// Source node id
        #[arg(short, long)]
        source: String,

        /// Target node id
        #[arg(short, long)]
        target: String,

        /// Maximum search depth
        #[arg(short = 'd', long, default_value = "4")]
        max_depth: usize,

        /// Allow traversing edges against their direction
        #[arg(short = 'b', long)]
        bidirectional: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let config = crate::config::AgoraConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Status { filters }) => cmd_status(&config, &filters, json_mode).await,
        Some(Commands::Network {
            file,
            filters,
            max_nodes,
            layout,
        }) => cmd_network(&config, &file, &filters, max_nodes, layout, json_mode),
        Some(Commands::Evidence {
            filters,
            width,
            height,
        }) => cmd_evidence(&config, &filters, width, height, json_mode).await,
        Some(Commands::Constellation { filters }) => {
            cmd_constellation(&config, &filters, json_mode).await
        }
        Some(Commands::Path {
            source,
            target,
            max_depth,
            bidirectional,
        }) => cmd_path(&config, &source, &target, max_depth, bidirectional, json_mode).await,
        None => {
            // No subcommand - show workspace status with no filters.
            cmd_status(&config, &FilterArgs::default(), json_mode).await
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_args_normalize_into_sorted_sets() {
        let args = FilterArgs {
            node_types: vec!["work".to_string(), "person".to_string(), "work".to_string()],
            ..FilterArgs::default()
        };
        let state = args.to_state();
        let kinds: Vec<_> = state.node_kinds.iter().cloned().collect();
        assert_eq!(kinds, vec!["person".to_string(), "work".to_string()]);
    }

    #[test]
    fn empty_filter_args_touch_nothing() {
        let patch = FilterArgs::default().to_patch();
        assert!(patch.node_kinds.is_none());
        assert!(patch.search_term.is_none());
    }
}
