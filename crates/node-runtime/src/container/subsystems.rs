//! # Subsystem Container
//!
//! Holds all subsystem instances and the adapters they share.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: genesis, in-memory chain, pool, epoch/authority state
//! Level 1: Digest Handler (2), registers its notification channels
//! Level 2: Block Import (1), hands digests to (2)
//! Level 3: Chain Sync (3), read-only over the chain
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use qc_01_block_import::{
    BlockImportDependencies, BlockImportService, RuntimeBuilder, RuntimeConfig,
};
use qc_02_digest_handler::{DigestHandlerDependencies, DigestHandlerService};
use qc_03_chain_sync::ChainSyncService;
use shared_types::{short_hex, Block};
use tokio::sync::watch;
use tracing::info;

use crate::adapters::{
    DigestBridge, GossipRecorder, InMemoryChain, InMemoryEpochState, InMemoryGrandpaState,
    InMemoryTransactionPool, NativeRuntimeBuilder,
};
use crate::container::config::NodeConfig;
use crate::genesis::{GenesisBuilder, GenesisConfig};

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    pub config: NodeConfig,
    pub genesis: Block,

    // Level 0: shared collaborators
    pub chain: Arc<InMemoryChain>,
    pub transaction_pool: Arc<InMemoryTransactionPool>,
    pub gossip: Arc<GossipRecorder>,
    pub epoch_state: Arc<InMemoryEpochState>,
    pub grandpa_state: Arc<InMemoryGrandpaState>,

    // Level 1-3: subsystems
    pub digest_handler: Arc<DigestHandlerService>,
    pub block_import: Arc<BlockImportService>,
    pub chain_sync: Arc<ChainSyncService>,
}

impl SubsystemContainer {
    pub fn new(config: NodeConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        Self::with_genesis(config, GenesisConfig::default(), shutdown)
    }

    pub fn with_genesis(
        config: NodeConfig,
        genesis_config: GenesisConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        config.validate().context("Invalid node configuration")?;

        let genesis = GenesisBuilder::new(genesis_config.clone())
            .build()
            .context("Failed to build genesis block")?;
        let builder = Arc::new(NativeRuntimeBuilder);
        let genesis_runtime = builder
            .instantiate(&genesis_config.code, RuntimeConfig::default())
            .context("Failed to instantiate genesis runtime")?;

        let chain = Arc::new(InMemoryChain::new(
            &genesis.block,
            genesis.storage,
            genesis_runtime,
            builder.clone(),
        ));
        let transaction_pool = Arc::new(InMemoryTransactionPool::new());
        let gossip = Arc::new(GossipRecorder::default());
        let epoch_state = Arc::new(InMemoryEpochState::new(config.epoch_length));
        let grandpa_state = Arc::new(InMemoryGrandpaState::new());

        let digest_handler = Arc::new(DigestHandlerService::new(
            DigestHandlerDependencies {
                block_state: chain.clone(),
                epoch_state: epoch_state.clone(),
                grandpa_state: grandpa_state.clone(),
            },
            config.digest_handler.clone(),
            shutdown.clone(),
        ));

        let block_import = Arc::new(
            BlockImportService::new(
                BlockImportDependencies {
                    storage_state: chain.clone(),
                    block_state: chain.clone(),
                    code_substituted_state: chain.clone(),
                    runtime_builder: builder,
                    digest_handler: Arc::new(DigestBridge::new(digest_handler.clone())),
                    transaction_state: transaction_pool.clone(),
                    network: gossip.clone(),
                },
                config.block_import.clone(),
                shutdown,
            )
            .context("Failed to create block import service")?,
        );

        let chain_sync = Arc::new(ChainSyncService::new(
            chain.clone(),
            config.chain_sync.clone(),
        ));

        info!(
            genesis = %short_hex(&genesis.block.hash()),
            epoch_length = config.epoch_length,
            "Subsystem container initialised"
        );

        Ok(Self {
            config,
            genesis: genesis.block,
            chain,
            transaction_pool,
            gossip,
            epoch_state,
            grandpa_state,
            digest_handler,
            block_import,
            chain_sync,
        })
    }
}
