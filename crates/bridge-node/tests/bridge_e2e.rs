//! End-to-end test for the bridge node: a fake external consensus engine
//! (a Unix-domain control/pool listener plus a TCP receive listener)
//! drives a real `Chain` through bootstrap, registration, and block
//! delivery into an `InMemoryLedger`.

use bridge_chain::Chain;
use bridge_ipc::BridgeContext;
use bridge_node::ledger::InMemoryLedger;
use bridge_node::observability::MetricsState;
use bridge_types::{Block, ChannelId};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, UnixListener};

const POOL_SIZE: usize = 2;

#[tokio::test]
async fn chain_bootstraps_registers_and_appends_a_delivered_block() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("engine.sock");
    let marker_path = dir.path().join("engine.ready");

    let unix_listener = UnixListener::bind(&socket_path).unwrap();
    let tcp_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let recv_port = tcp_listener.local_addr().unwrap().port();

    // Fake engine: accepts the control connection plus `POOL_SIZE` pool
    // connections, then accepts the receive connection and pushes one
    // block down it.
    let engine = tokio::spawn(async move {
        for _ in 0..(1 + POOL_SIZE) {
            let _ = unix_listener.accept().await.unwrap();
        }

        let (mut recv_stream, _) = tcp_listener.accept().await.unwrap();
        let block = Block {
            number: 1,
            header_bytes: Bytes::from_static(b"header"),
            metadata: HashMap::new(),
        };
        let block_bytes = block.encode();
        bridge_ipc::codec::write_bytes(&mut recv_stream, &block_bytes)
            .await
            .unwrap();
        bridge_ipc::codec::write_bytes(&mut recv_stream, &[0x00])
            .await
            .unwrap();
        recv_stream.flush().await.unwrap();
        // Keep the connection open until the test finishes reading it.
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let context = BridgeContext::bootstrap(socket_path, recv_port, marker_path.clone(), POOL_SIZE);
    tokio::time::sleep(Duration::from_millis(50)).await;
    std::fs::write(&marker_path, b"ready").unwrap();
    let context = context.await.unwrap();

    assert_eq!(context.send_pool().len(), POOL_SIZE);
    assert!(!marker_path.exists());

    let channel_id = ChannelId::new("system");
    let chain = Arc::new(Chain::new(channel_id.clone(), context, true));
    let ledger = Arc::new(InMemoryLedger::new(channel_id, MetricsState::new()));

    chain.start(2_000_000_000, ledger.clone()).await.unwrap();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while ledger.height().is_none() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(ledger.height(), Some(1));

    chain.halt();
    engine.abort();
}
