//! 客户端传输层 (TCP / Memory)
//!
//! Framing 复用 `shared::message::wire`，与服务端保持一致。

use std::sync::Arc;

use shared::message::BusMessage;
use shared::message::wire;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio::sync::broadcast;

use crate::error::ClientError;

/// 可用的客户端传输
#[derive(Debug, Clone)]
pub enum ClientTransport {
    Tcp(TcpTransport),
    Memory(MemoryTransport),
}

impl ClientTransport {
    pub async fn read_message(&self) -> Result<BusMessage, ClientError> {
        match self {
            ClientTransport::Tcp(t) => t.read_message().await,
            ClientTransport::Memory(t) => t.read_message().await,
        }
    }

    pub async fn write_message(&self, msg: &BusMessage) -> Result<(), ClientError> {
        match self {
            ClientTransport::Tcp(t) => t.write_message(msg).await,
            ClientTransport::Memory(t) => t.write_message(msg).await,
        }
    }

    pub async fn close(&self) -> Result<(), ClientError> {
        match self {
            ClientTransport::Tcp(t) => t.close().await,
            ClientTransport::Memory(t) => t.close().await,
        }
    }
}

/// TCP 传输
#[derive(Debug, Clone)]
pub struct TcpTransport {
    reader: Arc<Mutex<OwnedReadHalf>>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl TcpTransport {
    /// 连接到指定地址
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| ClientError::Connection(format!("TCP connect failed: {}", e)))?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
        })
    }

    pub async fn read_message(&self) -> Result<BusMessage, ClientError> {
        let mut reader = self.reader.lock().await;
        Ok(wire::read_message(&mut *reader).await?)
    }

    pub async fn write_message(&self, msg: &BusMessage) -> Result<(), ClientError> {
        let mut writer = self.writer.lock().await;
        Ok(wire::write_message(&mut *writer, msg).await?)
    }

    pub async fn close(&self) -> Result<(), ClientError> {
        use tokio::io::AsyncWriteExt;
        let mut writer = self.writer.lock().await;
        writer
            .shutdown()
            .await
            .map_err(|e| ClientError::Connection(format!("TCP close failed: {}", e)))?;
        Ok(())
    }
}

/// 内存传输 (同进程直连服务端总线)
///
/// 读取服务端广播通道，写入客户端上行通道。
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    rx: Arc<Mutex<broadcast::Receiver<BusMessage>>>,
    tx: broadcast::Sender<BusMessage>,
}

impl MemoryTransport {
    pub fn new(
        server_broadcast_tx: &broadcast::Sender<BusMessage>,
        client_to_server_tx: &broadcast::Sender<BusMessage>,
    ) -> Self {
        Self {
            rx: Arc::new(Mutex::new(server_broadcast_tx.subscribe())),
            tx: client_to_server_tx.clone(),
        }
    }

    pub async fn read_message(&self) -> Result<BusMessage, ClientError> {
        let mut rx = self.rx.lock().await;
        loop {
            match rx.recv().await {
                Ok(msg) => return Ok(msg),
                // 落后于广播时跳过丢失的消息继续读; 上层 SeatFeed
                // 依赖服务端的 resync 信号恢复状态
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(dropped = n, "Memory transport lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(ClientError::Connection("Server bus closed".to_string()));
                }
            }
        }
    }

    pub async fn write_message(&self, msg: &BusMessage) -> Result<(), ClientError> {
        self.tx
            .send(msg.clone())
            .map_err(|e| ClientError::Connection(e.to_string()))?;
        Ok(())
    }

    pub async fn close(&self) -> Result<(), ClientError> {
        Ok(())
    }
}
