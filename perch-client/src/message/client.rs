//! Message Client
//!
//! A unified client for communicating with the seat server.
//! Supports both Command-Response (RPC) pattern and event subscription.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use shared::message::{
    BusMessage, EventType, HandshakePayload, PROTOCOL_VERSION, RequestCommandPayload,
    ResponsePayload,
};
use tokio::sync::broadcast;
use tokio::sync::oneshot;
use uuid::Uuid;

use super::transport::{ClientTransport, MemoryTransport, TcpTransport};
use crate::error::ClientError;

/// RPC 响应超时
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// 消息总线客户端
#[derive(Debug, Clone)]
pub struct MessageClient {
    transport: ClientTransport,
    client_id: String,
    event_tx: broadcast::Sender<BusMessage>,
    pending_requests: Arc<Mutex<HashMap<Uuid, oneshot::Sender<BusMessage>>>>,
}

impl MessageClient {
    /// Connect via TCP and perform the protocol handshake
    pub async fn connect(addr: &str, client_name: &str) -> Result<Self, ClientError> {
        let transport = ClientTransport::Tcp(TcpTransport::connect(addr).await?);
        let client_id = Uuid::new_v4().to_string();

        Self::handshake(&transport, client_name, &client_id).await?;
        Ok(Self::new(transport, client_id))
    }

    /// Create an in-process client wired directly to a server bus
    ///
    /// `server_broadcast_tx` 是服务端广播通道，`client_to_server_tx`
    /// 是客户端上行通道 (两者都来自服务端 MessageBus)。
    pub async fn memory(
        server_broadcast_tx: &broadcast::Sender<BusMessage>,
        client_to_server_tx: &broadcast::Sender<BusMessage>,
        client_name: &str,
    ) -> Result<Self, ClientError> {
        let transport = ClientTransport::Memory(MemoryTransport::new(
            server_broadcast_tx,
            client_to_server_tx,
        ));
        let client_id = Uuid::new_v4().to_string();

        Self::handshake(&transport, client_name, &client_id).await?;
        Ok(Self::new(transport, client_id))
    }

    async fn handshake(
        transport: &ClientTransport,
        client_name: &str,
        client_id: &str,
    ) -> Result<(), ClientError> {
        let payload = HandshakePayload {
            version: PROTOCOL_VERSION,
            client_name: Some(client_name.to_string()),
            client_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            client_id: Some(client_id.to_string()),
        };

        transport
            .write_message(&BusMessage::handshake(&payload))
            .await
    }

    fn new(transport: ClientTransport, client_id: String) -> Self {
        let (event_tx, _) = broadcast::channel(1024);
        let pending_requests: Arc<Mutex<HashMap<Uuid, oneshot::Sender<BusMessage>>>> =
            Arc::new(Mutex::new(HashMap::new()));

        let client = Self {
            transport: transport.clone(),
            client_id: client_id.clone(),
            event_tx: event_tx.clone(),
            pending_requests: pending_requests.clone(),
        };

        // Spawn background task to dispatch incoming messages
        tokio::spawn(async move {
            loop {
                match transport.read_message().await {
                    Ok(msg) => {
                        // 1. Skip messages unicast to some other client
                        if msg.target.as_ref().is_some_and(|t| t != &client_id) {
                            continue;
                        }

                        // 2. Resolve a pending RPC if this is its reply
                        if let Some(correlation_id) = msg.correlation_id {
                            let mut pending = pending_requests.lock().unwrap();
                            if let Some(tx) = pending.remove(&correlation_id) {
                                let _ = tx.send(msg.clone());
                                // Continue to broadcast as well; subscribers
                                // may want to observe responses too
                            }
                        }

                        // 3. Forward to the event bus
                        if let Err(e) = event_tx.send(msg) {
                            tracing::debug!("No subscribers for event: {}", e);
                        }
                    }
                    Err(e) => {
                        tracing::error!("Transport read error: {}", e);
                        // 连接断开，客户端需重新 connect
                        break;
                    }
                }
            }
        });

        client
    }

    /// This client's unique id (sent with every message as `source`)
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Subscribe to pushed events (Sync broadcasts, responses)
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.event_tx.subscribe()
    }

    /// Send a message (fire and forget)
    pub async fn send(&self, msg: &BusMessage) -> Result<(), ClientError> {
        let mut msg = msg.clone();
        msg.source = Some(self.client_id.clone());
        self.transport.write_message(&msg).await
    }

    /// Send a message and await the server's correlated response
    pub async fn request(&self, msg: &BusMessage) -> Result<BusMessage, ClientError> {
        let request_id = msg.request_id;
        let (tx, rx) = oneshot::channel();

        // Register pending request
        {
            let mut pending = self.pending_requests.lock().unwrap();
            pending.insert(request_id, tx);
        }

        // Send request
        if let Err(e) = self.send(msg).await {
            // Cleanup on send failure
            self.forget_pending(&request_id);
            return Err(e);
        }

        // Wait for response with timeout
        match tokio::time::timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS), rx).await
        {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(ClientError::Connection(
                "Response channel closed".to_string(),
            )),
            Err(_) => {
                self.forget_pending(&request_id);
                Err(ClientError::Timeout("Request timed out".to_string()))
            }
        }
    }

    /// Send a command and await the parsed server response
    ///
    /// Returns the response payload on success; a rejected command maps to
    /// [`ClientError::Rejected`].
    pub async fn send_command(
        &self,
        action: &str,
        params: Option<serde_json::Value>,
    ) -> Result<ResponsePayload, ClientError> {
        let payload = RequestCommandPayload {
            action: action.to_string(),
            params,
        };
        let msg = BusMessage::request_command(&payload);

        let response = self.request(&msg).await?;
        if response.event_type != EventType::Response {
            return Err(ClientError::Connection(format!(
                "Expected Response, got {}",
                response.event_type
            )));
        }

        let parsed: ResponsePayload = response.parse_payload()?;
        if parsed.success {
            Ok(parsed)
        } else {
            Err(ClientError::Rejected {
                message: parsed.message,
                code: parsed.error_code,
            })
        }
    }

    /// Close the client connection
    pub async fn close(&self) -> Result<(), ClientError> {
        self.transport.close().await
    }

    fn forget_pending(&self, request_id: &Uuid) {
        let mut pending = self.pending_requests.lock().unwrap();
        pending.remove(request_id);
    }
}
