//! Block import configuration

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration for the block import coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockImportConfig {
    /// Block hash (hex) to replacement runtime code (hex).
    pub code_substitutes: HashMap<String, String>,

    /// Revalidate the transaction pool after every imported block.
    pub maintain_transaction_pool: bool,
}

impl Default for BlockImportConfig {
    fn default() -> Self {
        Self {
            code_substitutes: HashMap::new(),
            maintain_transaction_pool: true,
        }
    }
}

impl BlockImportConfig {
    /// Config for tests: no substitutes, pool upkeep on.
    pub fn for_testing() -> Self {
        Self::default()
    }

    pub fn with_code_substitute(
        mut self,
        hash: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        self.code_substitutes.insert(hash.into(), code.into());
        self
    }
}
