//! # Native Runtime
//!
//! Host-side stand-in for an executable runtime. An instance is identified
//! by the hash of its code and validates transactions by shape only.

use std::sync::Arc;

use qc_01_block_import::{RuntimeBuilder, RuntimeConfig, RuntimeError, RuntimeInstance};
use shared_types::{blake2_256, short_hex, Extrinsic, Hash, Validity};
use tracing::debug;

/// Blocks a validated transaction stays valid for.
pub const TRANSACTION_LONGEVITY: u64 = 64;

/// Largest extrinsic the runtime accepts.
pub const MAX_EXTRINSIC_SIZE: usize = 4 * 1024;

pub struct NativeRuntime {
    code_hash: Hash,
    config: RuntimeConfig,
}

impl NativeRuntime {
    pub fn new(code: &[u8], config: RuntimeConfig) -> Self {
        Self {
            code_hash: blake2_256(code),
            config,
        }
    }

    pub fn code_hash(&self) -> Hash {
        self.code_hash
    }
}

impl RuntimeInstance for NativeRuntime {
    fn validate_transaction(&self, extrinsic: &Extrinsic) -> Result<Validity, RuntimeError> {
        let bytes = extrinsic.as_bytes();
        if bytes.is_empty() {
            return Err(RuntimeError::InvalidTransaction("empty extrinsic".into()));
        }
        if bytes.len() > MAX_EXTRINSIC_SIZE {
            return Err(RuntimeError::InvalidTransaction(format!(
                "extrinsic of {} bytes exceeds {MAX_EXTRINSIC_SIZE}",
                bytes.len()
            )));
        }
        Ok(Validity {
            priority: bytes.len() as u64,
            requires: vec![],
            provides: vec![blake2_256(bytes).to_vec()],
            longevity: TRANSACTION_LONGEVITY,
            propagate: true,
        })
    }

    fn config(&self) -> RuntimeConfig {
        self.config.clone()
    }
}

/// Builds `NativeRuntime`s.
#[derive(Debug, Default)]
pub struct NativeRuntimeBuilder;

impl RuntimeBuilder for NativeRuntimeBuilder {
    fn instantiate(
        &self,
        code: &[u8],
        config: RuntimeConfig,
    ) -> Result<Arc<dyn RuntimeInstance>, RuntimeError> {
        if code.is_empty() {
            return Err(RuntimeError::Instantiation("empty runtime code".into()));
        }
        let runtime = NativeRuntime::new(code, config);
        debug!(code_hash = %short_hex(&runtime.code_hash()), "[runtime] Instance created");
        Ok(Arc::new(runtime))
    }
}
