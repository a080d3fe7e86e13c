//! Integration tests for the feed controller against a local mock feed

mod common;

use bubbles::feed::{FeedController, FeedStatus};
use bubbles::{FeedConfig, TransactionRecord};
use common::{utx_frame, MockFeedServer, LATEST_TX_HASH};
use crossbeam_channel::Receiver;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn feed_config(url: String) -> FeedConfig {
    FeedConfig {
        url,
        heartbeat_secs: 0,
        max_reconnect_attempts: 0,
        ..FeedConfig::default()
    }
}

async fn wait_connected(controller: &FeedController) -> bool {
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if controller.status() == FeedStatus::Connected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

async fn recv_records(rx: &Receiver<TransactionRecord>, count: usize) -> Vec<TransactionRecord> {
    let mut records = Vec::new();
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while records.len() < count && tokio::time::Instant::now() < deadline {
        match rx.try_recv() {
            Ok(record) => {
                verbose_println!("  record: {} {}", record.id, record.value);
                records.push(record);
            }
            Err(_) => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    records
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_start_streams_transactions_in_order() {
    let server = MockFeedServer::start().await;
    let (tx, rx) = crossbeam_channel::unbounded();
    let controller = FeedController::connect(&feed_config(server.ws_url()), tx).await.unwrap();

    assert!(wait_connected(&controller).await);
    assert!(controller.start());
    assert!(server.wait_for_command(r#"{"op":"unconfirmed_sub"}"#, 1, TIMEOUT).await);

    server.publish(utx_frame("tx-1", &[100_000_000]));
    server.publish(r#"{"op":"block","x":{"height":1}}"#);
    server.publish("garbage");
    server.publish(utx_frame("tx-2", &[30_000_000, 20_000_000]));
    server.publish(utx_frame("tx-3", &[]));

    let records = recv_records(&rx, 3).await;
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["tx-1", "tx-2", "tx-3"]);
    assert_eq!(records[0].value, 1.0);
    assert!((records[1].value - 0.5).abs() < 1e-12);
    assert_eq!(records[2].value, 0.0);

    // Control frames are counted on their own handler thread
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while controller.counters().malformed < 1 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let counters = controller.counters();
    assert_eq!(counters.transactions, 3);
    assert_eq!(counters.ignored, 1);
    assert_eq!(counters.malformed, 1);
    assert!(controller.metrics().messages_received >= 5);

    controller.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stop_halts_the_stream() {
    let server = MockFeedServer::start().await;
    let (tx, rx) = crossbeam_channel::unbounded();
    let controller = FeedController::connect(&feed_config(server.ws_url()), tx).await.unwrap();

    assert!(wait_connected(&controller).await);
    assert!(controller.start());
    assert!(server.wait_for_command(r#"{"op":"unconfirmed_sub"}"#, 1, TIMEOUT).await);

    server.publish(utx_frame("before", &[1_000]));
    assert_eq!(recv_records(&rx, 1).await.len(), 1);

    assert!(controller.stop());
    assert!(server.wait_for_command(r#"{"op":"unconfirmed_unsub"}"#, 1, TIMEOUT).await);

    server.publish(utx_frame("after", &[1_000]));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(rx.try_recv().is_err());

    controller.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_request_latest_delivers_one_transaction() {
    let server = MockFeedServer::start().await;
    let (tx, rx) = crossbeam_channel::unbounded();
    let controller = FeedController::connect(&feed_config(server.ws_url()), tx).await.unwrap();

    assert!(wait_connected(&controller).await);
    assert!(controller.request_latest());

    let records = recv_records(&rx, 1).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, LATEST_TX_HASH);
    assert!((records[0].value - 0.42).abs() < 1e-12);

    controller.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_subscribe_on_connect() {
    let server = MockFeedServer::start().await;
    let (tx, rx) = crossbeam_channel::unbounded();
    let config = FeedConfig {
        subscribe_on_connect: true,
        ..feed_config(server.ws_url())
    };
    let controller = FeedController::connect(&config, tx).await.unwrap();

    assert!(server.wait_for_command(r#"{"op":"unconfirmed_sub"}"#, 1, TIMEOUT).await);
    server.publish(utx_frame("auto", &[5_000]));

    let records = recv_records(&rx, 1).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "auto");

    controller.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_heartbeat_is_answered() {
    let server = MockFeedServer::start().await;
    let (tx, _rx) = crossbeam_channel::unbounded();
    let config = FeedConfig {
        heartbeat_secs: 1,
        ..feed_config(server.ws_url())
    };
    let controller = FeedController::connect(&config, tx).await.unwrap();

    assert!(server.wait_for_command(r#"{"op":"ping"}"#, 1, TIMEOUT).await);

    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while controller.counters().pongs == 0 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(controller.counters().pongs >= 1);

    controller.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_commands_rejected_after_server_goes_away() {
    let server = MockFeedServer::start().await;
    let (tx, _rx) = crossbeam_channel::unbounded();
    let controller = FeedController::connect(&feed_config(server.ws_url()), tx).await.unwrap();

    assert!(wait_connected(&controller).await);
    server.shutdown();

    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while controller.status() == FeedStatus::Connected && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(controller.status(), FeedStatus::Connecting);
    assert!(!controller.start());

    controller.shutdown().await.unwrap();
}
