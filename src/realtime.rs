//! Realtime notification relay for the desktop shell.
//!
//! Frames are JSON text messages shaped `{"event": <name>, "data": <payload>}`.
//! A `notification` frame from any client is fanned out verbatim to every
//! connected client, the sender included. There is no validation, filtering
//! or ordering guarantee across senders.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Payload of the server's `status` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

/// Events pushed from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ServerEvent {
    Status(StatusMessage),
    Notification(Value),
}

/// Events accepted from clients
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ClientEvent {
    Notification(Value),
}

impl ServerEvent {
    pub fn connected() -> Self {
        ServerEvent::Status(StatusMessage {
            message: "Connected".to_string(),
        })
    }
}

/// Greeting sent to a freshly connected socket, if any
pub fn greeting(authenticated: bool) -> Option<ServerEvent> {
    authenticated.then(ServerEvent::connected)
}

/// Fan-out hub shared by every socket connection
#[derive(Clone)]
pub struct NotificationHub {
    tx: broadcast::Sender<ServerEvent>,
}

impl NotificationHub {
    /// Create a hub buffering up to `capacity` undelivered events per client
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        info!("Notification hub initialized with capacity {}", capacity);
        Self { tx }
    }

    /// Broadcast a notification payload; returns how many clients it reached
    pub fn publish(&self, data: Value) -> usize {
        match self.tx.send(ServerEvent::Notification(data)) {
            Ok(count) => {
                debug!("Broadcast notification to {} clients", count);
                count
            }
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.tx.subscribe()
    }

    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

fn encode(event: &ServerEvent) -> Option<Message> {
    match serde_json::to_string(event) {
        Ok(text) => Some(Message::Text(text)),
        Err(e) => {
            warn!("Failed to serialize realtime event: {}", e);
            None
        }
    }
}

/// Drive one upgraded socket until either side closes
pub async fn handle_socket(socket: WebSocket, hub: NotificationHub, authenticated: bool) {
    let (mut sink, mut stream) = socket.split();

    // Subscribe before greeting so nothing broadcast in between is missed
    let mut rx = hub.subscribe();
    info!(
        "Realtime client connected (authenticated: {}), total clients: {}",
        authenticated,
        hub.client_count()
    );

    if let Some(message) = greeting(authenticated).as_ref().and_then(encode) {
        if sink.send(message).await.is_err() {
            return;
        }
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let Some(message) = encode(&event) else {
                        continue;
                    };
                    if sink.send(message).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Realtime client lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let relay = hub.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(ClientEvent::Notification(data)) => {
                        relay.publish(data);
                    }
                    Err(e) => debug!("Ignoring realtime frame: {}", e),
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    debug!("Realtime client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_event_wire_format() {
        let status = serde_json::to_value(ServerEvent::connected()).unwrap();
        assert_eq!(
            status,
            json!({"event": "status", "data": {"message": "Connected"}})
        );

        let notification =
            serde_json::to_value(ServerEvent::Notification(json!({"title": "hi"}))).unwrap();
        assert_eq!(
            notification,
            json!({"event": "notification", "data": {"title": "hi"}})
        );
    }

    #[test]
    fn test_client_event_parsing() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"notification","data":[1,2,3]}"#).unwrap();
        assert_eq!(event, ClientEvent::Notification(json!([1, 2, 3])));

        assert!(serde_json::from_str::<ClientEvent>(r#"{"event":"authenticate","data":{}}"#)
            .is_err());
        assert!(serde_json::from_str::<ClientEvent>("not json").is_err());
    }

    #[test]
    fn test_greeting_only_when_authenticated() {
        assert_eq!(greeting(true), Some(ServerEvent::connected()));
        assert_eq!(greeting(false), None);
    }

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber_verbatim() {
        let hub = NotificationHub::new(16);
        let mut sender_rx = hub.subscribe();
        let mut other_rx = hub.subscribe();

        let payload = json!({"message": "deploy finished", "level": "info"});
        assert_eq!(hub.publish(payload.clone()), 2);

        assert_eq!(
            sender_rx.recv().await.unwrap(),
            ServerEvent::Notification(payload.clone())
        );
        assert_eq!(
            other_rx.recv().await.unwrap(),
            ServerEvent::Notification(payload)
        );
    }

    #[tokio::test]
    async fn test_publish_without_clients() {
        let hub = NotificationHub::new(4);
        assert_eq!(hub.client_count(), 0);
        assert_eq!(hub.publish(json!("nobody listening")), 0);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_oldest() {
        let hub = NotificationHub::new(2);
        let mut rx = hub.subscribe();

        for i in 0..3 {
            hub.publish(json!(i));
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert_eq!(rx.recv().await.unwrap(), ServerEvent::Notification(json!(1)));
    }
}
