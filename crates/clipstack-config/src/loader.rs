//! Configuration loader.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::schema::ClipstackConfig;

/// Loads and validates configuration documents.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<ClipstackConfig, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a JSON string. An empty string yields the
    /// defaults.
    pub fn load_str(content: &str) -> Result<ClipstackConfig, ConfigError> {
        let config: ClipstackConfig = if content.trim().is_empty() {
            ClipstackConfig::default()
        } else {
            serde_json::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_yields_defaults() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config, ClipstackConfig::default());
    }

    #[test]
    fn test_load_partial_document() {
        let config = ConfigLoader::load_str(r#"{ "send_ttl_ms": 5000 }"#).unwrap();
        assert_eq!(config.send_ttl_ms, 5000);
        assert_eq!(config.limits.max_snippets, 75);
    }

    #[test]
    fn test_load_nested_limits() {
        let config =
            ConfigLoader::load_str(r#"{ "limits": { "max_snippets": 10 } }"#).unwrap();
        assert_eq!(config.limits.max_snippets, 10);
        assert_eq!(config.limits.max_total_chars, 30_000);
    }

    #[test]
    fn test_load_invalid_json() {
        assert!(ConfigLoader::load_str("{ not json").is_err());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let result = ConfigLoader::load_str(r#"{ "send_ttl_ms": 0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "dom_clear_delay_ms": 500 }}"#).unwrap();
        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.dom_clear_delay_ms, 500);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/clipstack.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
