//! # Application Configuration
//!
//! Layered configuration: compiled defaults, then an optional `agora.toml`
//! file, then environment variables (`AGORA_URL`, `AGORA_API_KEY`,
//! `AGORA_MAX_NODES`). Later layers win.

use agora_core::AgoraError;
use agora_core::primitives::DEFAULT_MAX_NODES;
use serde::Deserialize;
use std::path::Path;

/// Default overview-service URL when nothing else is configured.
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

// =============================================================================
// FILE SHAPE
// =============================================================================

/// Raw, all-optional file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub max_nodes: Option<usize>,
}

// =============================================================================
// RESOLVED CONFIGURATION
// =============================================================================

/// Fully resolved configuration the commands run with.
#[derive(Debug, Clone)]
pub struct AgoraConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub max_nodes: usize,
}

impl AgoraConfig {
    /// Resolve configuration from an optional file path plus environment.
    ///
    /// A missing default file is fine; an explicitly-given path that does
    /// not exist or does not parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, AgoraError> {
        let file = match path {
            Some(explicit) => read_config_file(explicit)?,
            None => {
                let default = Path::new("agora.toml");
                if default.is_file() {
                    read_config_file(default)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let base_url = std::env::var("AGORA_URL")
            .ok()
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_key = std::env::var("AGORA_API_KEY").ok().or(file.api_key);
        let max_nodes = std::env::var("AGORA_MAX_NODES")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(file.max_nodes)
            .unwrap_or(DEFAULT_MAX_NODES);

        Ok(Self {
            base_url,
            api_key,
            max_nodes,
        })
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, AgoraError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AgoraError::IoError(format!("Cannot read config '{}': {e}", path.display())))?;
    toml::from_str(&text)
        .map_err(|e| AgoraError::SerializationError(format!("Invalid config: {e}")))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn config_file_parses_all_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "base_url = \"https://overviews.example.org\"\nmax_nodes = 120"
        )
        .expect("write config");

        let parsed = read_config_file(file.path()).expect("config parses");
        assert_eq!(
            parsed.base_url.as_deref(),
            Some("https://overviews.example.org")
        );
        assert_eq!(parsed.max_nodes, Some(120));
        assert_eq!(parsed.api_key, None);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let result = read_config_file(Path::new("/nonexistent/agora.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn invalid_toml_is_a_serialization_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "base_url = [not toml").expect("write config");
        let err = read_config_file(file.path()).expect_err("should fail");
        assert!(matches!(err, AgoraError::SerializationError(_)));
    }
}
