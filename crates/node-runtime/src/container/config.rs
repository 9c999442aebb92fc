//! # Node Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! Defaults are production values. Environment variables override them:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `QC_LOG_LEVEL` | `log_level` |
//! | `QC_EPOCH_LENGTH` | `epoch_length` |
//! | `QC_MAX_RESPONSE_SIZE` | `chain_sync.max_response_size` |
//! | `QC_CODE_SUBSTITUTES` | `block_import.code_substitutes`, as `hash=code,...` |
//! | `QC_MAINTAIN_POOL` | `block_import.maintain_transaction_pool` |

use std::str::FromStr;

use qc_01_block_import::{BlockImportConfig, CodeSubstitutes};
use qc_02_digest_handler::DigestHandlerConfig;
use qc_03_chain_sync::ChainSyncConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Default tracing filter, `RUST_LOG` takes precedence.
    pub log_level: String,
    /// Blocks per BABE epoch.
    pub epoch_length: u64,
    pub block_import: BlockImportConfig,
    pub digest_handler: DigestHandlerConfig,
    pub chain_sync: ChainSyncConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            epoch_length: 200,
            block_import: BlockImportConfig::default(),
            digest_handler: DigestHandlerConfig::default(),
            chain_sync: ChainSyncConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup("QC_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(value) = lookup("QC_EPOCH_LENGTH") {
            config.epoch_length = parse_var("QC_EPOCH_LENGTH", &value)?;
        }
        if let Some(value) = lookup("QC_MAX_RESPONSE_SIZE") {
            config.chain_sync.max_response_size = parse_var("QC_MAX_RESPONSE_SIZE", &value)?;
        }
        if let Some(value) = lookup("QC_MAINTAIN_POOL") {
            config.block_import.maintain_transaction_pool = parse_var("QC_MAINTAIN_POOL", &value)?;
        }
        if let Some(value) = lookup("QC_CODE_SUBSTITUTES") {
            for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
                let (hash, code) = entry.split_once('=').ok_or_else(|| ConfigError::InvalidValue {
                    var: "QC_CODE_SUBSTITUTES",
                    value: entry.to_string(),
                })?;
                config
                    .block_import
                    .code_substitutes
                    .insert(hash.trim().to_string(), code.trim().to_string());
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the subsystems cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.epoch_length == 0 {
            return Err(ConfigError::ZeroEpochLength);
        }
        if self.chain_sync.max_response_size == 0 {
            return Err(ConfigError::ZeroResponseSize);
        }
        CodeSubstitutes::parse(&self.block_import.code_substitutes)
            .map_err(|e| ConfigError::CodeSubstitutes(e.to_string()))?;
        Ok(())
    }
}

fn parse_var<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Epoch length must be non-zero")]
    ZeroEpochLength,

    #[error("Maximum response size must be non-zero")]
    ZeroResponseSize,

    #[error("Invalid code substitutes: {0}")]
    CodeSubstitutes(String),
}
