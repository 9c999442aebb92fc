//! # Pool Transactions
//!
//! Validity metadata returned by the runtime and the pooled form of an
//! extrinsic.

use serde::{Deserialize, Serialize};

use crate::entities::Extrinsic;

/// A tag a transaction requires or provides.
pub type TransactionTag = Vec<u8>;

/// Result of validating an extrinsic against a runtime.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Validity {
    pub priority: u64,
    pub requires: Vec<TransactionTag>,
    pub provides: Vec<TransactionTag>,
    pub longevity: u64,
    pub propagate: bool,
}

/// An extrinsic with its latest validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidTransaction {
    pub extrinsic: Extrinsic,
    pub validity: Validity,
}

impl ValidTransaction {
    pub fn new(extrinsic: Extrinsic, validity: Validity) -> Self {
        Self { extrinsic, validity }
    }
}
