pub mod states;

use crate::client::WebSocketClient;
use crate::config::{ClientConfig, RouteSenders};
use crate::traits::*;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use states::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error};

/// How long a handler thread blocks before re-checking the shutdown flag
const HANDLER_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Type-state builder for WebSocketClient
///
/// `R` is `()` until a router is supplied, then [`RouterSetup<R>`].
pub struct WebSocketClientBuilder<U, Ro, R>
where
    U: UrlState,
    Ro: RouterState,
{
    _state: TypeState<U, Ro>,
    url: Option<String>,
    router: R,
    heartbeat: Option<(Duration, WsMessage)>,
    reconnect_strategy: Option<Box<dyn ReconnectionStrategy>>,
    subscriptions: Vec<WsMessage>,
}

/// Router together with its configured handler routes
pub struct RouterSetup<R: MessageRouter> {
    router: R,
    routing: RoutingBuilder<R>,
}

impl WebSocketClientBuilder<NoUrl, NoRouter, ()> {
    /// Create a new builder instance
    pub fn new() -> Self {
        Self {
            _state: TypeState::new(),
            url: None,
            router: (),
            heartbeat: None,
            reconnect_strategy: None,
            subscriptions: Vec::new(),
        }
    }
}

impl Default for WebSocketClientBuilder<NoUrl, NoRouter, ()> {
    fn default() -> Self {
        Self::new()
    }
}

// URL setting
impl<Ro, R> WebSocketClientBuilder<NoUrl, Ro, R>
where
    Ro: RouterState,
{
    pub fn url(self, url: impl Into<String>) -> WebSocketClientBuilder<HasUrl, Ro, R> {
        WebSocketClientBuilder {
            _state: TypeState::new(),
            url: Some(url.into()),
            router: self.router,
            heartbeat: self.heartbeat,
            reconnect_strategy: self.reconnect_strategy,
            subscriptions: self.subscriptions,
        }
    }
}

/// Routing builder helper
///
/// Registers one handler per route key. Each handler gets its own
/// unbounded channel and OS thread.
pub struct RoutingBuilder<R>
where
    R: MessageRouter,
{
    handlers: HashMap<
        R::RouteKey,
        (
            Sender<R::Message>,
            Receiver<R::Message>,
            Box<dyn MessageHandler<R::Message>>,
        ),
    >,
}

impl<R> RoutingBuilder<R>
where
    R: MessageRouter,
{
    fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Add a handler for a specific route key
    pub fn handler<H>(mut self, route_key: R::RouteKey, handler: H) -> Self
    where
        H: MessageHandler<R::Message>,
    {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.handlers
            .insert(route_key, (sender, receiver, Box::new(handler)));
        self
    }

    /// Spawn handler threads and return the per-route senders
    fn spawn(
        self,
        shutdown_flag: Arc<AtomicBool>,
    ) -> (RouteSenders<R>, Vec<JoinHandle<()>>) {
        let mut senders = HashMap::new();
        let mut handles = Vec::new();

        for (route_key, (sender, receiver, mut handler)) in self.handlers {
            senders.insert(route_key.clone(), sender);
            let shutdown_flag = Arc::clone(&shutdown_flag);

            let handle = std::thread::spawn(move || loop {
                match receiver.recv_timeout(HANDLER_POLL_INTERVAL) {
                    Ok(message) => {
                        if let Err(e) = handler.handle(message) {
                            error!("Handler error for route {:?}: {}", route_key, e);
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        if !shutdown_flag.load(Ordering::Acquire) {
                            debug!("Shutdown flag detected, handler for route {:?} exiting", route_key);
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        debug!("Handler channel closed for route {:?}, thread exiting", route_key);
                        break;
                    }
                }
            });

            handles.push(handle);
        }

        (senders, handles)
    }
}

// Router setting
impl<U> WebSocketClientBuilder<U, NoRouter, ()>
where
    U: UrlState,
{
    pub fn router<NewR, F>(
        self,
        router: NewR,
        configure_routing: F,
    ) -> WebSocketClientBuilder<U, HasRouter, RouterSetup<NewR>>
    where
        NewR: MessageRouter,
        F: FnOnce(RoutingBuilder<NewR>) -> RoutingBuilder<NewR>,
    {
        let routing = configure_routing(RoutingBuilder::new());

        WebSocketClientBuilder {
            _state: TypeState::new(),
            url: self.url,
            router: RouterSetup { router, routing },
            heartbeat: self.heartbeat,
            reconnect_strategy: self.reconnect_strategy,
            subscriptions: self.subscriptions,
        }
    }
}

// Optional configuration methods
impl<U, R> WebSocketClientBuilder<U, HasRouter, RouterSetup<R>>
where
    U: UrlState,
    R: MessageRouter,
{
    /// Send `payload` every `interval` while connected
    pub fn heartbeat(mut self, interval: Duration, payload: WsMessage) -> Self {
        self.heartbeat = Some((interval, payload));
        self
    }

    pub fn reconnect_strategy(mut self, strategy: impl ReconnectionStrategy + 'static) -> Self {
        self.reconnect_strategy = Some(Box::new(strategy));
        self
    }

    /// Message sent right after every successful connect
    pub fn subscription(mut self, message: WsMessage) -> Self {
        self.subscriptions.push(message);
        self
    }
}

// Build method - only available when all required fields are set
impl<R> WebSocketClientBuilder<HasUrl, HasRouter, RouterSetup<R>>
where
    R: MessageRouter,
{
    pub async fn build(self) -> Result<WebSocketClient<R>> {
        let url = self
            .url
            .ok_or_else(|| HyperSocketError::Configuration("URL must be set".to_string()))?;

        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(HyperSocketError::Configuration(format!(
                "URL must use ws:// or wss://, got {}",
                url
            )));
        }

        let shutdown_flag = Arc::new(AtomicBool::new(true));

        let reconnect_strategy = self.reconnect_strategy.unwrap_or_else(|| {
            Box::new(ExponentialBackoff::new(
                Duration::from_secs(1),
                Duration::from_secs(60),
                Some(10),
            ))
        });

        let RouterSetup { router, routing } = self.router;
        let (route_senders, handler_handles) = routing.spawn(Arc::clone(&shutdown_flag));

        let config = ClientConfig {
            url,
            router: Arc::new(router),
            route_senders,
            heartbeat: self.heartbeat,
            reconnect_strategy,
            subscriptions: self.subscriptions,
            shutdown_flag,
        };

        Ok(WebSocketClient::new(config, handler_handles))
    }
}
