//! Headless feed monitor
//!
//! Connects to the blockchain.info feed, subscribes to unconfirmed
//! transactions and logs every accepted one to stdout.
//!
//! Usage:
//!   cargo run --bin tx-feed [max_transactions]

use anyhow::{Context, Result};
use hypersockets::ClientEvent;
use mempool_bubbles::bin_common::{load_config, parse_args, ConfigType};
use mempool_bubbles::bubbles::{logging, FeedController, TransactionBuffer};
use std::time::Duration;
use tracing::{info, warn};

/// How often queued records are drained
const DRAIN_INTERVAL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = load_config(ConfigType::Bubbles)?;
    logging::init_tracing(&config.log_level)?;

    let limit = match parse_args().first() {
        Some(arg) => Some(
            arg.parse::<u64>()
                .with_context(|| format!("max_transactions must be a number, got '{}'", arg))?,
        ),
        None => None,
    };

    let (records_tx, records) = crossbeam_channel::unbounded();
    let controller = FeedController::connect(&config.feed, records_tx).await?;
    let mut buffer = TransactionBuffer::new(config.view.max_records);
    let mut seen: u64 = 0;
    let mut ticker = tokio::time::interval(DRAIN_INTERVAL);

    info!("Press Ctrl+C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received");
                break;
            }
            _ = ticker.tick() => {}
        }

        while let Some(event) = controller.try_recv_event() {
            match event {
                ClientEvent::Connected if !config.feed.subscribe_on_connect => {
                    controller.start();
                }
                ClientEvent::Error(e) => warn!("Feed error: {}", e),
                other => info!("Feed event: {:?}", other),
            }
        }

        while let Ok(record) = records.try_recv() {
            seen += 1;
            info!(
                "tx {} value={:.8} BTC scaled={:.3}",
                record.id, record.value, record.scaled_value
            );
            buffer.append(record);
        }

        if limit.is_some_and(|max| seen >= max) {
            info!("Reached {} transactions", seen);
            break;
        }
    }

    let metrics = controller.metrics();
    let counters = controller.counters();
    info!(
        "Frames received: {} | transactions: {} | ignored: {} | malformed: {} | buffered: {}",
        metrics.messages_received,
        counters.transactions,
        counters.ignored,
        counters.malformed,
        buffer.len()
    );

    controller.stop();
    controller.shutdown().await?;
    Ok(())
}
