//! Hands imported headers from block import to the digest handler.

use std::sync::Arc;

use qc_01_block_import::DigestHandler;
use qc_02_digest_handler::{DigestHandlerApi, DigestHandlerService};
use shared_types::BlockHeader;

pub struct DigestBridge {
    handler: Arc<DigestHandlerService>,
}

impl DigestBridge {
    pub fn new(handler: Arc<DigestHandlerService>) -> Self {
        Self { handler }
    }
}

impl DigestHandler for DigestBridge {
    fn handle_digests(&self, header: &BlockHeader) {
        DigestHandlerApi::handle_digests(self.handler.as_ref(), header);
    }
}
