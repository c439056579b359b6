//! # agora (application library)
//!
//! The async, network-aware half of the Agora workspace. The pure engine
//! lives in `agora-core`; this crate owns the canonical workspace state,
//! the staged overview fetching, the HTTP client, and the CLI.
//!
//! Exposed as a library so an embedding UI shell can drive the
//! [`store::WorkspaceStore`] directly and so the integration tests can run
//! the store against scripted fetchers.

pub mod cli;
pub mod client;
pub mod config;
pub mod store;
