//! Native push connection
//!
//! A supervisor task follows the session's token. While a token is present
//! it keeps one WebSocket open and republishes decoded events on a
//! broadcast channel; a different token replaces the connection and `None`
//! closes it. Connection failures are logged and left alone until the token
//! changes again.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use super::event::LiveEvent;
use super::frame::{socket_url, Packet};
use super::LiveError;

#[derive(Debug, Clone)]
pub struct LiveConfig {
    /// API base; the push endpoint is derived from it
    pub base_url: String,
    /// Events buffered per subscriber before it starts lagging
    pub event_capacity: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            event_capacity: 64,
        }
    }
}

/// Handle to the supervisor task. Dropping it closes the connection.
pub struct LiveChannel {
    events: broadcast::Sender<LiveEvent>,
    task: JoinHandle<()>,
}

impl LiveChannel {
    /// Start following `tokens`, usually `SessionController::subscribe()`
    pub fn spawn(config: LiveConfig, tokens: watch::Receiver<Option<String>>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let url = socket_url(&config.base_url);
        let task = tokio::spawn(supervise(url, tokens, events.clone()));
        Self { events, task }
    }

    /// New listener; dropping the receiver unsubscribes it
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.events.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.events.receiver_count()
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

enum Outcome {
    Ended(Result<(), LiveError>),
    TokenChanged(Option<Option<String>>),
}

async fn supervise(
    url: String,
    mut tokens: watch::Receiver<Option<String>>,
    events: broadcast::Sender<LiveEvent>,
) {
    let mut current = tokens.borrow_and_update().clone();

    loop {
        let Some(token) = current.clone() else {
            match next_token(&mut tokens, &current).await {
                Some(next) => {
                    current = next;
                    continue;
                }
                None => return,
            }
        };

        let outcome = tokio::select! {
            result = run_connection(&url, &token, &events) => Outcome::Ended(result),
            next = next_token(&mut tokens, &current) => Outcome::TokenChanged(next),
        };

        match outcome {
            Outcome::Ended(result) => {
                match result {
                    Ok(()) => tracing::info!("Live channel closed by server"),
                    Err(e) => tracing::error!(error = %e, "Live channel connection error"),
                }
                match next_token(&mut tokens, &current).await {
                    Some(next) => current = next,
                    None => return,
                }
            }
            Outcome::TokenChanged(Some(next)) => {
                tracing::debug!(authenticated = next.is_some(), "Token changed; closing live channel");
                current = next;
            }
            Outcome::TokenChanged(None) => return,
        }
    }
}

/// Wait for a token different from `current`. `None` once the session is gone.
async fn next_token(
    tokens: &mut watch::Receiver<Option<String>>,
    current: &Option<String>,
) -> Option<Option<String>> {
    loop {
        tokens.changed().await.ok()?;
        let next = tokens.borrow_and_update().clone();
        if next != *current {
            return Some(next);
        }
    }
}

async fn run_connection(
    url: &str,
    token: &str,
    events: &broadcast::Sender<LiveEvent>,
) -> Result<(), LiveError> {
    let (ws, _response) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(|e| LiveError::Transport(e.to_string()))?;
    let (mut write, mut read) = ws.split();

    while let Some(message) = read.next().await {
        let text = match message.map_err(|e| LiveError::Transport(e.to_string()))? {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let packet = match Packet::parse(&text) {
            Ok(packet) => packet,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed live frame");
                continue;
            }
        };

        let reply = match packet {
            Packet::Open(handshake) => {
                tracing::debug!(sid = %handshake.sid, "Engine.IO handshake");
                Some(Packet::connect_with_token(token))
            }
            Packet::Ping => Some(Packet::Pong),
            Packet::Connect(_) => {
                tracing::info!("Live channel connected");
                None
            }
            Packet::ConnectError(message) => return Err(LiveError::Rejected(message)),
            Packet::Event { name, data } => {
                match LiveEvent::decode(&name, data) {
                    Ok(Some(event)) => {
                        // No listeners is fine; events are not queued for later.
                        let _ = events.send(event);
                    }
                    Ok(None) => tracing::debug!(event = %name, "Ignoring unknown live event"),
                    Err(e) => tracing::warn!(event = %name, error = %e, "Malformed live event"),
                }
                None
            }
            Packet::Disconnect | Packet::Close => break,
            Packet::Pong | Packet::Noop => None,
        };

        if let Some(reply) = reply {
            write
                .send(Message::Text(reply.encode()))
                .await
                .map_err(|e| LiveError::Transport(e.to_string()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::event::LiveEvent;
    use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
    use axum::response::Response;
    use axum::routing::get;
    use axum::Router;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    /// What the fake push server observed
    #[derive(Debug, PartialEq)]
    enum Seen {
        Auth(String),
        Pong,
        Closed,
    }

    async fn fake_server(socket: WebSocket, seen: mpsc::UnboundedSender<Seen>) {
        let (mut tx, mut rx) = socket.split();
        let open = r#"0{"sid":"e1","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#;
        if tx.send(WsMessage::Text(open.to_string())).await.is_err() {
            return;
        }

        if let Some(Ok(WsMessage::Text(auth))) = rx.next().await {
            let _ = seen.send(Seen::Auth(auth));
        }
        let _ = tx.send(WsMessage::Text(r#"40{"sid":"s1"}"#.to_string())).await;
        let _ = tx
            .send(WsMessage::Text(
                r#"42["alert",{"siteId":"site-1","personName":"Jane","severity":"high","zoneName":"Vault","ts":1741957500000}]"#
                    .to_string(),
            ))
            .await;
        let _ = tx.send(WsMessage::Text("42[\"heartbeat\",{}]".to_string())).await;
        let _ = tx.send(WsMessage::Text("2".to_string())).await;

        while let Some(Ok(message)) = rx.next().await {
            if let WsMessage::Text(text) = message {
                if text == "3" {
                    let _ = seen.send(Seen::Pong);
                }
            }
        }
        let _ = seen.send(Seen::Closed);
    }

    async fn start_server() -> (String, mpsc::UnboundedReceiver<Seen>) {
        let (seen_tx, seen_rx) = mpsc::unbounded_channel();
        let app = Router::new().route(
            "/socket.io/",
            get(move |ws: WebSocketUpgrade| {
                let seen = seen_tx.clone();
                async move {
                    let response: Response = ws.on_upgrade(move |socket| fake_server(socket, seen));
                    response
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen_rx)
    }

    async fn next_seen(rx: &mut mpsc::UnboundedReceiver<Seen>) -> Seen {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for server")
            .expect("server channel closed")
    }

    fn config(base_url: String) -> LiveConfig {
        LiveConfig {
            base_url,
            ..LiveConfig::default()
        }
    }

    #[tokio::test]
    async fn test_connects_with_token_and_publishes_events() {
        let (base_url, mut seen) = start_server().await;
        let (_token_tx, token_rx) = watch::channel(Some("tok-1".to_string()));

        let channel = LiveChannel::spawn(config(base_url), token_rx);
        let mut events = channel.subscribe();

        assert_eq!(next_seen(&mut seen).await, Seen::Auth(r#"40{"token":"tok-1"}"#.to_string()));

        let event = timeout(Duration::from_secs(5), events.recv()).await.unwrap().unwrap();
        match event {
            LiveEvent::Alert(alert) => {
                assert_eq!(alert.site_id, "site-1");
                assert_eq!(alert.person_name, "Jane");
            }
            other => panic!("Expected alert, got {:?}", other),
        }

        assert_eq!(next_seen(&mut seen).await, Seen::Pong);
    }

    #[tokio::test]
    async fn test_logout_closes_and_new_token_reconnects() {
        let (base_url, mut seen) = start_server().await;
        let (token_tx, token_rx) = watch::channel(Some("tok-1".to_string()));
        let _channel = LiveChannel::spawn(config(base_url), token_rx);

        assert!(matches!(next_seen(&mut seen).await, Seen::Auth(_)));
        assert_eq!(next_seen(&mut seen).await, Seen::Pong);

        token_tx.send_replace(None);
        assert_eq!(next_seen(&mut seen).await, Seen::Closed);

        token_tx.send_replace(Some("tok-2".to_string()));
        assert_eq!(next_seen(&mut seen).await, Seen::Auth(r#"40{"token":"tok-2"}"#.to_string()));
    }

    #[tokio::test]
    async fn test_same_token_does_not_reconnect() {
        let (base_url, mut seen) = start_server().await;
        let (token_tx, token_rx) = watch::channel(Some("tok-1".to_string()));
        let _channel = LiveChannel::spawn(config(base_url), token_rx);

        assert!(matches!(next_seen(&mut seen).await, Seen::Auth(_)));
        assert_eq!(next_seen(&mut seen).await, Seen::Pong);

        token_tx.send_replace(Some("tok-1".to_string()));
        assert!(timeout(Duration::from_millis(200), seen.recv()).await.is_err());
    }

    #[tokio::test]
    async fn test_dropped_listener_is_removed() {
        let (_token_tx, token_rx) = watch::channel(None);
        let channel = LiveChannel::spawn(LiveConfig::default(), token_rx);

        let rx = channel.subscribe();
        assert_eq!(channel.listener_count(), 1);
        drop(rx);
        assert_eq!(channel.listener_count(), 0);
    }
}
