use crate::config::ClientConfig;
use crate::connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
use crate::heartbeat::Heartbeat;
use crate::traits::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWrite = SplitSink<WsStream, Message>;
type WsRead = SplitStream<WsStream>;

/// How often idle loops re-check the shutdown flag
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound on the TCP + TLS + WebSocket handshake
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long `shutdown` waits for the socket task before aborting it
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Internal command messages for client control
#[derive(Debug)]
enum ClientCommand {
    /// Send a message to the WebSocket
    Send(WsMessage),
    /// Close the socket and stop the client
    Shutdown,
}

/// Lifecycle events emitted by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Connected to the server
    Connected,
    /// Disconnected from the server
    Disconnected,
    /// Reconnecting (attempt number)
    Reconnecting(usize),
    /// Error occurred
    Error(String),
}

/// Client metrics snapshot
#[derive(Debug, Clone)]
pub struct Metrics {
    pub messages_sent: u64,
    /// Text and binary frames only
    pub messages_received: u64,
    pub reconnect_count: u64,
    pub connection_state: ConnectionState,
}

/// WebSocket client with message routing
///
/// The socket lives on a tokio task. Frames are parsed inline in arrival
/// order and pushed to the handler thread registered for their route key.
/// Dropping the client stops the socket task; `shutdown` additionally waits
/// for it and for the handler threads.
pub struct WebSocketClient<R>
where
    R: MessageRouter,
{
    config: Arc<ClientConfig<R>>,
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicMetrics>,
    command_tx: UnboundedSender<ClientCommand>,
    event_rx: Receiver<ClientEvent>,
    task_handle: Option<tokio::task::JoinHandle<()>>,
    handler_handles: Vec<std::thread::JoinHandle<()>>,
}

impl<R> WebSocketClient<R>
where
    R: MessageRouter,
{
    /// Spawn the socket task. Called by the builder's `build()`.
    pub(crate) fn new(
        config: ClientConfig<R>,
        handler_handles: Vec<std::thread::JoinHandle<()>>,
    ) -> Self {
        let config = Arc::new(config);
        let state = Arc::new(AtomicConnectionState::new(ConnectionState::Disconnected));
        let metrics = Arc::new(AtomicMetrics::new());

        let (command_tx, command_rx) = unbounded_channel();
        let (event_tx, event_rx) = unbounded();

        let task_handle = tokio::spawn(run_client(
            Arc::clone(&config),
            Arc::clone(&state),
            Arc::clone(&metrics),
            command_rx,
            event_tx,
        ));

        Self {
            config,
            state,
            metrics,
            command_tx,
            event_rx,
            task_handle: Some(task_handle),
            handler_handles,
        }
    }

    /// Queue a message for the socket
    ///
    /// Messages queued while disconnected are written once the next
    /// connection is up. Fails only after the socket task has exited.
    pub fn send(&self, message: WsMessage) -> Result<()> {
        self.command_tx
            .send(ClientCommand::Send(message))
            .map_err(|e| HyperSocketError::ChannelSend(e.to_string()))
    }

    /// Get current connection state
    #[inline]
    pub fn connection_state(&self) -> ConnectionState {
        self.state.get()
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    pub fn metrics(&self) -> Metrics {
        Metrics {
            messages_sent: self.metrics.messages_sent(),
            messages_received: self.metrics.messages_received(),
            reconnect_count: self.metrics.reconnect_count(),
            connection_state: self.state.get(),
        }
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv_event(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Close the socket and wait for the socket task and handler threads
    pub async fn shutdown(mut self) -> Result<()> {
        info!("Shutting down WebSocket client");
        self.signal_shutdown();

        if let Some(handle) = self.task_handle.take() {
            let abort = handle.abort_handle();
            if tokio::time::timeout(SHUTDOWN_GRACE, handle).await.is_err() {
                warn!("Socket task did not stop within {:?}, aborting", SHUTDOWN_GRACE);
                abort.abort();
            }
        }

        // Handler threads poll the flag every 50ms
        let handles = std::mem::take(&mut self.handler_handles);
        debug!("Waiting for {} handler threads to complete", handles.len());
        for handle in handles {
            let _ = handle.join();
        }

        info!("WebSocket client shut down");
        Ok(())
    }

    fn signal_shutdown(&self) {
        self.config.shutdown_flag.store(false, Ordering::Release);
        self.state.set(ConnectionState::ShuttingDown);
        let _ = self.command_tx.send(ClientCommand::Shutdown);
    }
}

impl<R> Drop for WebSocketClient<R>
where
    R: MessageRouter,
{
    fn drop(&mut self) {
        if self.task_handle.is_some() {
            self.signal_shutdown();
        }
    }
}

/// Main client task loop: connect, serve, reconnect per strategy
async fn run_client<R>(
    config: Arc<ClientConfig<R>>,
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicMetrics>,
    mut command_rx: UnboundedReceiver<ClientCommand>,
    event_tx: Sender<ClientEvent>,
) where
    R: MessageRouter,
{
    let mut reconnect_attempt = 0;

    loop {
        if should_stop(&config, &state) {
            debug!("Shutdown requested, exiting main loop");
            break;
        }

        state.set(if reconnect_attempt == 0 {
            ConnectionState::Connecting
        } else {
            ConnectionState::Reconnecting
        });

        if reconnect_attempt > 0 {
            let _ = event_tx.send(ClientEvent::Reconnecting(reconnect_attempt));
        }

        match tokio::time::timeout(CONNECT_TIMEOUT, connect_async(config.url.as_str())).await {
            Ok(Ok((ws_stream, _))) => {
                info!("Connected to {}", config.url);
                state.set(ConnectionState::Connected);
                let _ = event_tx.send(ClientEvent::Connected);

                reconnect_attempt = 0;

                if let Err(e) =
                    handle_connection(ws_stream, &config, &state, &metrics, &mut command_rx).await
                {
                    error!("Connection error: {}", e);
                    let _ = event_tx.send(ClientEvent::Error(e.to_string()));
                }

                if !state.is_shutting_down() {
                    state.set(ConnectionState::Disconnected);
                }
                let _ = event_tx.send(ClientEvent::Disconnected);
            }
            Ok(Err(e)) => {
                error!("Failed to connect to {}: {}", config.url, e);
                let _ = event_tx.send(ClientEvent::Error(e.to_string()));
                state.set(ConnectionState::Disconnected);
            }
            Err(_) => {
                error!("Connecting to {} timed out after {:?}", config.url, CONNECT_TIMEOUT);
                let _ = event_tx.send(ClientEvent::Error("connect timeout".to_string()));
                state.set(ConnectionState::Disconnected);
            }
        }

        if should_stop(&config, &state) {
            break;
        }

        match config.reconnect_strategy.next_delay(reconnect_attempt) {
            Some(delay) => {
                info!("Reconnecting in {:?} (attempt {})", delay, reconnect_attempt + 1);
                if !sleep_unless_shutdown(delay, &config.shutdown_flag).await {
                    break;
                }
                reconnect_attempt += 1;
                metrics.increment_reconnects();
            }
            None => {
                warn!("Reconnection strategy exhausted, stopping");
                break;
            }
        }
    }

    state.set(ConnectionState::Disconnected);
    info!("Client task exiting");
}

fn should_stop<R: MessageRouter>(config: &ClientConfig<R>, state: &AtomicConnectionState) -> bool {
    !config.shutdown_flag.load(Ordering::Acquire) || state.is_shutting_down()
}

/// Sleep in short slices; returns `false` if shutdown was requested meanwhile
async fn sleep_unless_shutdown(duration: Duration, shutdown_flag: &AtomicBool) -> bool {
    let mut elapsed = Duration::ZERO;

    while elapsed < duration {
        if !shutdown_flag.load(Ordering::Acquire) {
            debug!("Shutdown flag set while waiting to reconnect");
            return false;
        }

        let slice = std::cmp::min(SHUTDOWN_POLL_INTERVAL, duration - elapsed);
        tokio::time::sleep(slice).await;
        elapsed += slice;
    }

    shutdown_flag.load(Ordering::Acquire)
}

/// Serve one established connection until it closes or shutdown is requested
async fn handle_connection<R>(
    ws_stream: WsStream,
    config: &ClientConfig<R>,
    state: &AtomicConnectionState,
    metrics: &AtomicMetrics,
    command_rx: &mut UnboundedReceiver<ClientCommand>,
) -> Result<()>
where
    R: MessageRouter,
{
    let (mut write, mut read) = ws_stream.split();

    for sub in &config.subscriptions {
        write.send(ws_message_to_tungstenite(sub)).await.map_err(|e| {
            HyperSocketError::WebSocket(format!("Failed to send subscription: {}", e))
        })?;
        metrics.increment_sent();
        debug!("Sent subscription message");
    }

    let mut heartbeat = Heartbeat::new(config.heartbeat.as_ref());

    message_loop(&mut write, &mut read, config, state, metrics, command_rx, &mut heartbeat).await
}

/// Main message processing loop
async fn message_loop<R>(
    write: &mut WsWrite,
    read: &mut WsRead,
    config: &ClientConfig<R>,
    state: &AtomicConnectionState,
    metrics: &AtomicMetrics,
    command_rx: &mut UnboundedReceiver<ClientCommand>,
    heartbeat: &mut Heartbeat,
) -> Result<()>
where
    R: MessageRouter,
{
    let mut shutdown_poll = tokio::time::interval(SHUTDOWN_POLL_INTERVAL);

    loop {
        if should_stop(config, state) {
            debug!("Shutdown detected in message loop, closing connection");
            let _ = write.close().await;
            return Ok(());
        }

        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(msg)) => {
                        // Control frames are answered by tungstenite and not counted
                        if let Some(ws_msg) = tungstenite_to_ws_message(msg) {
                            metrics.increment_received();
                            dispatch(config, ws_msg).await;
                        }
                    }
                    Some(Err(e)) => {
                        return Err(HyperSocketError::WebSocket(e.to_string()));
                    }
                    None => {
                        warn!("WebSocket stream closed");
                        return Err(HyperSocketError::ConnectionClosed("Stream ended".into()));
                    }
                }
            }

            cmd = command_rx.recv() => {
                match cmd {
                    Some(ClientCommand::Send(msg)) => {
                        write.send(ws_message_to_tungstenite(&msg)).await.map_err(|e| {
                            HyperSocketError::WebSocket(e.to_string())
                        })?;
                        metrics.increment_sent();
                    }
                    Some(ClientCommand::Shutdown) | None => {
                        info!("Closing connection on shutdown");
                        state.set(ConnectionState::ShuttingDown);
                        let _ = write.close().await;
                        return Ok(());
                    }
                }
            }

            payload = heartbeat.tick() => {
                write.send(ws_message_to_tungstenite(&payload)).await.map_err(|e| {
                    HyperSocketError::WebSocket(format!("Failed to send heartbeat: {}", e))
                })?;
                metrics.increment_sent();
                debug!("Heartbeat sent");
            }

            _ = shutdown_poll.tick() => {}
        }
    }
}

/// Parse a frame and hand it to the handler for its route
async fn dispatch<R>(config: &ClientConfig<R>, message: WsMessage)
where
    R: MessageRouter,
{
    match config.router.parse(message).await {
        Ok(parsed) => {
            let route_key = config.router.route_key(&parsed);
            match config.route_senders.get(&route_key) {
                // A closed channel only happens during shutdown
                Some(sender) => {
                    let _ = sender.send(parsed);
                }
                None => debug!("No handler configured for route key: {:?}", route_key),
            }
        }
        Err(e) => warn!("Parse error: {}", e),
    }
}

/// Convert WsMessage to tungstenite Message
fn ws_message_to_tungstenite(msg: &WsMessage) -> Message {
    match msg {
        WsMessage::Text(text) => Message::Text(text.clone()),
        WsMessage::Binary(data) => Message::Binary(data.clone()),
    }
}

/// Convert tungstenite Message to WsMessage; control frames are dropped
fn tungstenite_to_ws_message(msg: Message) -> Option<WsMessage> {
    match msg {
        Message::Text(text) => Some(WsMessage::Text(text)),
        Message::Binary(data) => Some(WsMessage::Binary(data)),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => None,
    }
}
