//! # Genesis Block Builder

use shared_types::{blake2_256, Block, BlockHeader, Digest, TrieState, ZERO_HASH};
use thiserror::Error;

use crate::adapters::CODE_KEY;

/// Genesis block creation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenesisError {
    /// A chain cannot start without runtime code.
    #[error("Genesis runtime code is empty")]
    EmptyCode,
}

/// Genesis block configuration.
#[derive(Debug, Clone)]
pub struct GenesisConfig {
    /// Runtime code the chain starts with.
    pub code: Vec<u8>,
    /// Additional initial storage.
    pub storage: Vec<(Vec<u8>, Vec<u8>)>,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            code: b"qc-native-runtime-v1".to_vec(),
            storage: Vec::new(),
        }
    }
}

/// Genesis block with the storage it commits to.
#[derive(Debug, Clone)]
pub struct GenesisState {
    pub block: Block,
    pub storage: TrieState,
}

pub struct GenesisBuilder {
    config: GenesisConfig,
}

impl GenesisBuilder {
    pub fn new(config: GenesisConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<GenesisState, GenesisError> {
        if self.config.code.is_empty() {
            return Err(GenesisError::EmptyCode);
        }

        let mut storage = TrieState::new();
        for (key, value) in self.config.storage {
            storage.set(key, value);
        }
        storage.set(CODE_KEY.to_vec(), self.config.code);

        let header = BlockHeader::new(
            ZERO_HASH,
            0,
            storage.root(),
            blake2_256(&[]),
            Digest::default(),
        );
        Ok(GenesisState {
            block: Block::new(header, vec![]),
            storage,
        })
    }
}
