//! 总线消息的线上编码
//!
//! 帧格式 (小端):
//!
//! | 字段 | 长度 |
//! |------|------|
//! | event_type | 1 字节 |
//! | request_id | 16 字节 |
//! | correlation_id (nil = None) | 16 字节 |
//! | payload 长度 | 4 字节 |
//! | payload | N 字节 |
//!
//! Both sides of the TCP transport (server accept loop, client
//! connection) share these helpers so the framing cannot drift.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

use super::{BusMessage, EventType};

/// Wire-level errors
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// 对端正常断开
    #[error("peer disconnected")]
    Disconnected,

    #[error("invalid event type: {0}")]
    InvalidEventType(u8),

    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// 从异步流中读取一条 BusMessage
pub async fn read_message<R: AsyncReadExt + Unpin>(
    reader: &mut R,
) -> Result<BusMessage, WireError> {
    // 读取事件类型 (1 字节)
    let mut type_buf = [0u8; 1];
    match reader.read_exact(&mut type_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(WireError::Disconnected);
        }
        Err(e) => return Err(WireError::Io(e)),
    }

    let event_type =
        EventType::try_from(type_buf[0]).map_err(|_| WireError::InvalidEventType(type_buf[0]))?;

    // 读取 Request ID (16 字节)
    let mut uuid_buf = [0u8; 16];
    reader.read_exact(&mut uuid_buf).await?;
    let request_id = Uuid::from_bytes(uuid_buf);

    // 读取 Correlation ID (16 字节)
    let mut correlation_buf = [0u8; 16];
    reader.read_exact(&mut correlation_buf).await?;
    let correlation_id_raw = Uuid::from_bytes(correlation_buf);
    let correlation_id = if correlation_id_raw.is_nil() {
        None
    } else {
        Some(correlation_id_raw)
    };

    // 读取载荷长度 (4 字节)
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_le_bytes(len_buf) as usize;

    // 读取载荷内容
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;

    Ok(BusMessage {
        request_id,
        event_type,
        source: None,
        correlation_id,
        target: None,
        payload,
    })
}

/// 向异步流写入一条 BusMessage
pub async fn write_message<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    msg: &BusMessage,
) -> Result<(), WireError> {
    let mut data = Vec::with_capacity(1 + 16 + 16 + 4 + msg.payload.len());
    data.push(msg.event_type as u8);
    data.extend_from_slice(msg.request_id.as_bytes());

    // Correlation ID (nil UUID 表示 None)
    let correlation_bytes = msg.correlation_id.unwrap_or(Uuid::nil()).into_bytes();
    data.extend_from_slice(&correlation_bytes);

    data.extend_from_slice(&(msg.payload.len() as u32).to_le_bytes());
    data.extend_from_slice(&msg.payload);

    writer.write_all(&data).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{PlanSyncPayload, ResponsePayload};
    use crate::models::{SeatMap, SeatRecord};

    #[tokio::test]
    async fn round_trip_over_a_duplex_pipe() {
        let (mut a, mut b) = tokio::io::duplex(4096);

        let seats: SeatMap = [SeatRecord::occupied(5, 3, "Noor")].into_iter().collect();
        let msg = BusMessage::sync(&PlanSyncPayload::full(3, seats));
        write_message(&mut a, &msg).await.unwrap();

        let read = read_message(&mut b).await.unwrap();
        assert_eq!(read.event_type, msg.event_type);
        assert_eq!(read.request_id, msg.request_id);
        assert_eq!(read.payload, msg.payload);
    }

    #[tokio::test]
    async fn correlation_id_survives_the_nil_encoding() {
        let (mut a, mut b) = tokio::io::duplex(1024);

        let with_id = BusMessage::response(&ResponsePayload::success("ok", None))
            .with_correlation_id(Uuid::new_v4());
        let without_id = BusMessage::response(&ResponsePayload::success("ok", None));

        write_message(&mut a, &with_id).await.unwrap();
        write_message(&mut a, &without_id).await.unwrap();

        assert_eq!(
            read_message(&mut b).await.unwrap().correlation_id,
            with_id.correlation_id
        );
        assert_eq!(read_message(&mut b).await.unwrap().correlation_id, None);
    }

    #[tokio::test]
    async fn closed_pipe_reads_as_disconnect() {
        let (a, mut b) = tokio::io::duplex(64);
        drop(a);
        assert!(matches!(
            read_message(&mut b).await,
            Err(WireError::Disconnected)
        ));
    }
}
