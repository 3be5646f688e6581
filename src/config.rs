//! Configuration management for trialscout
//!
//! All configuration is loaded from `./config/trialscout.toml`.
//! No hardcoded defaults exist in source code - all defaults are in the config template.

use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::record::Tier;

/// Configuration file path relative to working directory
pub const CONFIG_PATH: &str = "./config/trialscout.toml";

/// Default configuration file content - this is the ONLY place defaults exist
pub const DEFAULT_CONFIG: &str = include_str!("../config/trialscout.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Configuration field '{field}' cannot be empty")]
    EmptyRequired { field: String },

    #[error("Unknown tier '{tier}' in 'research.research_tiers'")]
    UnknownTier { tier: String },
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub research: ResearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

/// Research pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ResearchConfig {
    /// Minimum interval between any two page fetches, process-wide
    pub request_cooldown_ms: u64,
    /// Cache fetch results per normalized URL for the lifetime of the run
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
    /// Qualification tiers worth the network cost of full research
    #[serde(default = "default_research_tiers")]
    pub research_tiers: Vec<String>,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_research_tiers() -> Vec<String> {
    vec!["Tier 1".to_string(), "Tier 2".to_string()]
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Flush the output CSV every N rows
    #[serde(default = "default_flush_interval")]
    pub flush_interval: usize,
}

fn default_flush_interval() -> usize {
    10
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            flush_interval: default_flush_interval(),
        }
    }
}

impl ResearchConfig {
    /// Parsed tier filter for the research pass.
    pub fn tier_filter(&self) -> Vec<Tier> {
        self.research_tiers
            .iter()
            .filter_map(|t| Tier::parse(t))
            .collect()
    }
}

impl AppConfig {
    /// Load configuration from the default path
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(Path::new(CONFIG_PATH))
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.user_agent".to_string(),
            });
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "http.request_timeout_secs".to_string(),
            });
        }
        if self.output.flush_interval == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "output.flush_interval".to_string(),
            });
        }

        for tier in &self.research.research_tiers {
            if Tier::parse(tier).is_none() {
                return Err(ConfigError::UnknownTier { tier: tier.clone() });
            }
        }

        Ok(())
    }

    /// Create default configuration file at the standard location
    pub fn create_default_config() -> Result<PathBuf, ConfigError> {
        let path = Path::new(CONFIG_PATH);

        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write default config
        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_CONFIG.as_bytes())?;

        Ok(path.to_path_buf())
    }

    /// Check if stdin is a TTY (interactive terminal)
    pub fn is_interactive() -> bool {
        atty::is(atty::Stream::Stdin)
    }

    /// Prompt user to create default config (only in interactive mode)
    pub fn prompt_create_config() -> Result<Option<PathBuf>, ConfigError> {
        if !Self::is_interactive() {
            return Ok(None);
        }

        print!("Configuration file not found. Create default config? [Y/n] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        if input.is_empty() || input == "y" || input == "yes" {
            let path = Self::create_default_config()?;
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: Result<AppConfig, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok(), "Default config should parse: {:?}", config.err());
    }

    #[test]
    fn test_default_config_validates() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(config.validate().is_ok(), "Default config should validate");
    }

    #[test]
    fn test_default_research_tiers() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.research.tier_filter(), vec![Tier::Tier1, Tier::Tier2]);
    }

    #[test]
    fn test_optional_sections_use_defaults() {
        let config_str = r#"
[http]
user_agent = "test/1.0"
request_timeout_secs = 5

[research]
request_cooldown_ms = 0
"#;

        let config: AppConfig = toml::from_str(config_str).expect("Config should parse");
        assert!(config.research.cache_enabled, "cache should default on");
        assert_eq!(config.research.research_tiers, vec!["Tier 1", "Tier 2"]);
        assert_eq!(config.output.flush_interval, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let config_str = r#"
[http]
user_agent = ""
request_timeout_secs = 5

[research]
request_cooldown_ms = 2000
"#;

        let config: AppConfig = toml::from_str(config_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyRequired { .. })
        ));
    }

    #[test]
    fn test_unknown_tier_rejected() {
        let config_str = r#"
[http]
user_agent = "test/1.0"
request_timeout_secs = 5

[research]
request_cooldown_ms = 2000
research_tiers = ["Tier 1", "Tier 9"]
"#;

        let config: AppConfig = toml::from_str(config_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownTier { .. })
        ));
    }
}
