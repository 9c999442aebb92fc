//! # Trie State Overlay
//!
//! Key/value changes produced by executing a block on top of its parent's
//! committed state. The import coordinator owns it until storage commits it.

use std::collections::BTreeMap;

use parity_scale_codec::Encode;

use crate::entities::{blake2_256, Hash};

/// Pending storage writes for one block. `None` marks a deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrieState {
    changes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl TrieState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.changes.insert(key.into(), Some(value.into()));
    }

    pub fn delete(&mut self, key: impl Into<Vec<u8>>) {
        self.changes.insert(key.into(), None);
    }

    /// Value written by this overlay. A deleted key reads as `None`.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.changes.get(key).and_then(|v| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Changes in key order.
    pub fn changes(&self) -> impl Iterator<Item = (&[u8], Option<&[u8]>)> {
        self.changes
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_deref()))
    }

    /// Digest of the SCALE-encoded change set. Storage uses it as a
    /// stand-in root.
    pub fn root(&self) -> Hash {
        blake2_256(&self.changes.encode())
    }
}
