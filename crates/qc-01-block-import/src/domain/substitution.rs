//! Code substitutes: runtime code that replaces the on-chain code from a
//! given block onwards.

use std::collections::HashMap;

use shared_types::Hash;

use crate::error::{ImportError, ImportResult};

/// Decoded substitute table, keyed by block hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSubstitutes {
    codes: HashMap<Hash, Vec<u8>>,
}

fn decode_hex(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(value.strip_prefix("0x").unwrap_or(value))
}

impl CodeSubstitutes {
    /// Parse `hash hex -> code hex` pairs. Either side may carry a `0x` prefix.
    pub fn parse(raw: &HashMap<String, String>) -> ImportResult<Self> {
        let mut codes = HashMap::with_capacity(raw.len());
        for (key, value) in raw {
            let hash_bytes = decode_hex(key).map_err(|e| ImportError::InvalidCodeSubstitute {
                key: key.clone(),
                reason: e.to_string(),
            })?;
            let hash: Hash = hash_bytes.try_into().map_err(|bytes: Vec<u8>| {
                ImportError::InvalidCodeSubstitute {
                    key: key.clone(),
                    reason: format!("expected 32-byte hash, got {} bytes", bytes.len()),
                }
            })?;
            let code = decode_hex(value).map_err(|e| ImportError::InvalidCodeSubstitute {
                key: key.clone(),
                reason: e.to_string(),
            })?;
            codes.insert(hash, code);
        }
        Ok(Self { codes })
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.codes.contains_key(hash)
    }

    /// Replacement code for `hash`. Empty code is an error.
    pub fn code(&self, hash: &Hash) -> Option<ImportResult<&[u8]>> {
        self.codes.get(hash).map(|code| {
            if code.is_empty() {
                Err(ImportError::EmptyRuntimeCode(*hash))
            } else {
                Ok(code.as_slice())
            }
        })
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
