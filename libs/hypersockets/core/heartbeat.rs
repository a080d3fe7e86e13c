//! Application-level heartbeat
//!
//! Some feeds close idle sockets unless the client pings them with a data
//! frame. [`Heartbeat`] is polled from the message loop's `select!`; when no
//! heartbeat is configured its `tick` never resolves.

use crate::traits::WsMessage;
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

pub struct Heartbeat {
    ticker: Option<(Interval, WsMessage)>,
}

impl Heartbeat {
    /// Start a heartbeat; the first payload is due one full interval from now
    pub fn new(config: Option<&(Duration, WsMessage)>) -> Self {
        let ticker = config.map(|(period, payload)| {
            let mut ticker = interval(*period);
            ticker.reset();
            // If we miss ticks due to slow processing, skip them rather than bursting
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            (ticker, payload.clone())
        });
        Self { ticker }
    }

    /// A heartbeat that never fires
    pub fn disabled() -> Self {
        Self { ticker: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.ticker.is_some()
    }

    /// Wait for the next tick and return the payload to send
    pub async fn tick(&mut self) -> WsMessage {
        match self.ticker.as_mut() {
            Some((ticker, payload)) => {
                ticker.tick().await;
                payload.clone()
            }
            None => std::future::pending().await,
        }
    }
}
