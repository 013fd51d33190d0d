use serde::{Deserialize, Serialize};

use crate::models::SeatMap;

// ==================== Actions ====================

/// 座位操作: 写入一条座位记录
pub const ACTION_SEAT_ASSIGN: &str = "seat.assign";
/// 座位操作: 拉取完整座位图快照
pub const ACTION_SEAT_SNAPSHOT: &str = "seat.snapshot";

// ==================== Payloads ====================

/// 握手载荷 (客户端 -> 服务端)
///
/// 包含客户端的协议版本信息，用于服务端进行版本校验。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakePayload {
    /// 协议版本
    pub version: u16,
    /// 客户端名称/标识
    pub client_name: Option<String>,
    /// 客户端版本
    pub client_version: Option<String>,
    /// 客户端唯一标识 (UUID)
    pub client_id: Option<String>,
}

/// 请求指令载荷 (客户端 -> 服务端)
///
/// # 示例
/// - `action`: "seat.assign", `params`: 一条 SeatRecord
/// - `action`: "seat.snapshot", `params`: None
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestCommandPayload {
    /// 操作标识
    pub action: String,
    /// 操作参数 (可选的 JSON 对象)
    pub params: Option<serde_json::Value>,
}

/// 座位图同步载荷 (服务端 -> 所有客户端)
///
/// 每次有座位写入提交后广播，按提交顺序携带完整的座位图。
/// `seats` 为 `None` 表示接收方落后太多（广播通道 lag），
/// 需要重新拉取快照。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSyncPayload {
    /// 座位图版本号 (服务端单调递增)
    pub version: u64,
    /// 完整座位图；None = 需要重新拉取快照
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<SeatMap>,
    /// lag 时被丢弃的消息数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped: Option<u64>,
}

impl PlanSyncPayload {
    /// A normal sync carrying the full map at `version`
    pub fn full(version: u64, seats: SeatMap) -> Self {
        Self {
            version,
            seats: Some(seats),
            dropped: None,
        }
    }

    /// A resync marker: the receiver lagged and must refetch the snapshot
    pub fn resync(dropped: u64) -> Self {
        Self {
            version: 0,
            seats: None,
            dropped: Some(dropped),
        }
    }

    pub fn is_resync(&self) -> bool {
        self.seats.is_none()
    }
}

/// 通用响应载荷 (服务端 -> 客户端)
///
/// 用于响应 RequestCommand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    /// 是否成功
    pub success: bool,
    /// 响应消息/错误描述
    pub message: String,
    /// 响应数据 (可选)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// 错误代码 (可选, 仅在失败时有用)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

// ==================== Convenience Constructors ====================

impl ResponsePayload {
    pub fn success(message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            error_code: None,
        }
    }

    pub fn error(message: impl Into<String>, error_code: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error_code,
        }
    }
}
