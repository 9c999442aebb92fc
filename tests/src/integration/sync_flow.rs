//! # Chain Sync Flows
//!
//! Blocks imported through Block Import (1) served to peers by Chain Sync
//! (3). Requests and responses cross the wire SCALE-encoded.

use parity_scale_codec::{Decode, Encode};
use qc_01_block_import::BlockImportApi;
use qc_03_chain_sync::{
    BlockRequest, BlockResponse, ChainSyncApi, Direction, FromBlock, RequestedData, SyncError,
};
use shared_types::{Block, Hash};

use super::fixtures::*;

fn import_all(node: &node_runtime::NodeRuntime, blocks: &[Block]) {
    for block in blocks {
        node.container()
            .block_import
            .handle_block(block.clone(), state())
            .unwrap();
    }
}

/// Serve `request` the way the network layer would: decode, build, encode.
fn serve(
    node: &node_runtime::NodeRuntime,
    request: &BlockRequest,
) -> Result<BlockResponse, SyncError> {
    let wire = request.encode();
    let decoded = BlockRequest::decode(&mut &wire[..]).unwrap();
    let response = node.container().chain_sync.build_response(&decoded)?;
    let wire = response.encode();
    Ok(BlockResponse::decode(&mut &wire[..]).unwrap())
}

fn request(
    start: FromBlock,
    end_hash: Option<Hash>,
    direction: Direction,
    max: Option<u32>,
) -> BlockRequest {
    BlockRequest {
        requested_data: RequestedData::HEADER | RequestedData::BODY,
        start,
        end_hash,
        direction,
        max,
    }
}

fn hashes(blocks: &[&Block]) -> Vec<Hash> {
    blocks.iter().map(|b| b.hash()).collect()
}

#[test]
fn test_descending_from_head_over_imported_chain() {
    let node = node();
    let c = node.container();
    let blocks: Vec<Block> = (0..12)
        .scan(c.genesis.clone(), |parent, i| {
            let next = child(parent, 0, vec![ext(&[i as u8 + 1])], vec![]);
            *parent = next.clone();
            Some(next)
        })
        .collect();
    import_all(&node, &blocks);

    let response = serve(
        &node,
        &request(FromBlock::Number(12), None, Direction::Descending, Some(4)),
    )
    .unwrap();

    assert_eq!(
        response.hashes(),
        hashes(&[&blocks[11], &blocks[10], &blocks[9], &blocks[8]])
    );
    for (data, block) in response.blocks.iter().zip([&blocks[11], &blocks[10]]) {
        assert_eq!(data.header.as_ref(), Some(&block.header));
        assert_eq!(data.body.as_ref(), Some(&block.body));
        assert!(data.justification.is_none());
    }
}

#[test]
fn test_descending_to_genesis_includes_it() {
    let node = node();
    let c = node.container();
    let blocks = extend(&c.genesis, 3, 0);
    import_all(&node, &blocks);

    let response = serve(
        &node,
        &request(FromBlock::Number(3), None, Direction::Descending, None),
    )
    .unwrap();

    assert_eq!(
        response.hashes(),
        hashes(&[&blocks[2], &blocks[1], &blocks[0], &c.genesis])
    );
}

#[test]
fn test_descending_resolves_fork_from_end_hash() {
    let node = node();
    let c = node.container();
    let main = extend(&c.genesis, 8, 0);
    import_all(&node, &main);
    // Shorter fork off block 3; canonical stays on `main`.
    let fork = extend(&main[2], 3, 9);
    import_all(&node, &fork);
    assert_eq!(c.chain.best_hash(), main[7].hash());

    let response = serve(
        &node,
        &request(
            FromBlock::Number(6),
            Some(fork[0].hash()),
            Direction::Descending,
            None,
        ),
    )
    .unwrap();

    assert_eq!(response.hashes(), hashes(&[&fork[2], &fork[1], &fork[0]]));
}

#[test]
fn test_descending_start_off_end_branch_rejected() {
    let node = node();
    let c = node.container();
    let main = extend(&c.genesis, 6, 0);
    let fork = extend(&main[1], 3, 9);
    import_all(&node, &main);
    import_all(&node, &fork);

    let err = serve(
        &node,
        &request(
            FromBlock::Hash(fork[2].hash()),
            Some(main[3].hash()),
            Direction::Descending,
            None,
        ),
    )
    .unwrap_err();

    assert!(matches!(err, SyncError::StartNotDescendantOfEnd));
}

#[test]
fn test_unknown_blocks_reported_as_not_ready() {
    let node = node();
    let c = node.container();
    let unseen = extend(&c.genesis, 1, 5).remove(0);

    let err = serve(
        &node,
        &request(FromBlock::Hash(unseen.hash()), None, Direction::Descending, None),
    )
    .unwrap_err();
    assert!(err.is_unknown_block());

    let err = serve(
        &node,
        &request(FromBlock::Number(0), Some(unseen.hash()), Direction::Ascending, None),
    )
    .unwrap_err();
    assert!(matches!(err, SyncError::UnknownEndBlock(_)));
}

#[test]
fn test_ascending_range_up_to_head() {
    let node = node();
    let c = node.container();
    let blocks = extend(&c.genesis, 5, 0);
    import_all(&node, &blocks);

    let response = serve(
        &node,
        &request(FromBlock::Number(3), None, Direction::Ascending, None),
    )
    .unwrap();
    assert_eq!(response.hashes(), hashes(&[&blocks[2], &blocks[3], &blocks[4]]));

    let response = serve(
        &node,
        &request(
            FromBlock::Hash(blocks[0].hash()),
            Some(blocks[3].hash()),
            Direction::Ascending,
            Some(3),
        ),
    )
    .unwrap();
    assert_eq!(response.hashes(), hashes(&[&blocks[0], &blocks[1], &blocks[2]]));
}

#[test]
fn test_justification_served_after_finalisation() {
    let node = node();
    let c = node.container();
    let blocks = extend(&c.genesis, 2, 0);
    import_all(&node, &blocks);
    c.chain.finalise(&blocks[1].hash(), 4, 0, vec![0xaa, 0xbb]).unwrap();
    c.chain.set_receipt(blocks[1].hash(), vec![1]);

    let mut req = request(FromBlock::Number(2), None, Direction::Descending, Some(2));
    req.requested_data = RequestedData::JUSTIFICATION | RequestedData::RECEIPT;
    let response = serve(&node, &req).unwrap();

    assert_eq!(response.blocks[0].justification, Some(vec![0xaa, 0xbb]));
    assert_eq!(response.blocks[0].receipt, Some(vec![1]));
    assert!(response.blocks[0].header.is_none());
    // Block 1 has neither, and is still served.
    assert!(response.blocks[1].justification.is_none());
    assert!(response.blocks[1].receipt.is_none());
}
