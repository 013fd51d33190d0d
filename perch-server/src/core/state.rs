use std::sync::Arc;

use shared::models::{SeatMap, SeatRecord, position_exists};
use shared::message::{BusMessage, PlanSyncPayload};
use tokio::sync::Mutex;

use crate::core::Config;
use crate::message::{MessageBus, TransportConfig};
use crate::store::SeatStore;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | store | 嵌入式座位数据库 (redb) |
/// | message_bus | 消息总线 |
/// | write_gate | 写入串行化锁 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 座位存储
    pub store: Arc<SeatStore>,
    /// 消息总线
    message_bus: Arc<MessageBus>,
    /// 写入串行化: 广播在该锁内发出，保证 Sync 顺序与提交顺序一致
    write_gate: Arc<Mutex<()>>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 座位数据库 (work_dir/database/seats.redb)
    /// 3. 消息总线
    pub fn initialize(config: &Config) -> crate::core::Result<Self> {
        config.ensure_work_dir_structure()?;

        let store = SeatStore::open(config.seat_db_path())?;
        tracing::info!(
            path = %config.seat_db_path().display(),
            version = store.plan_version().unwrap_or(0),
            "Seat store opened"
        );

        let message_bus = MessageBus::from_config(TransportConfig {
            tcp_listen_addr: format!("0.0.0.0:{}", config.message_tcp_port),
            channel_capacity: config.channel_capacity,
        });

        Ok(Self {
            config: config.clone(),
            store: Arc::new(store),
            message_bus: Arc::new(message_bus),
            write_gate: Arc::new(Mutex::new(())),
        })
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    pub fn start_background_tasks(&self) {
        let handler = crate::message::MessageHandler::new(
            self.message_bus.subscribe_to_clients(),
            self.clone(),
            self.message_bus.shutdown_token().clone(),
        );

        tokio::spawn(async move {
            handler.run().await;
        });

        tracing::debug!("Message handler started in background");
    }

    /// 获取消息总线
    pub fn message_bus(&self) -> &Arc<MessageBus> {
        &self.message_bus
    }

    /// 写入一条座位记录并广播更新后的完整座位图
    ///
    /// 这是唯一的写入路径 (HTTP PUT 和总线 seat.assign 都走这里)。
    /// 记录按其自身 zone/index 派生的 id 存储；调用方提供的 id 不被信任。
    /// 写入和广播都发生在 write_gate 内，因此 Sync 消息的顺序与存储
    /// 提交顺序一致。
    pub async fn assign_seat(&self, record: SeatRecord) -> Result<(SeatRecord, u64), AppError> {
        if !position_exists(record.zone_id, record.seat_index) {
            return Err(AppError::validation(format!(
                "No seat at zone {} index {}",
                record.zone_id, record.seat_index
            )));
        }

        let _gate = self.write_gate.lock().await;

        let (stored, version) = self.store.put(&record)?;
        let seats = self.store.snapshot()?;

        tracing::info!(
            seat = %stored.id,
            occupant = %stored.occupant_name,
            version,
            "Seat assigned"
        );

        self.broadcast_plan(version, seats).await;
        Ok((stored, version))
    }

    /// 当前座位图及其版本
    pub async fn plan_snapshot(&self) -> Result<(u64, SeatMap), AppError> {
        let _gate = self.write_gate.lock().await;
        let version = self.store.plan_version()?;
        let seats = self.store.snapshot()?;
        Ok((version, seats))
    }

    /// 广播完整座位图到所有连接的客户端
    async fn broadcast_plan(&self, version: u64, seats: SeatMap) {
        let payload = PlanSyncPayload::full(version, seats);
        // 无订阅者时 send 返回错误，属正常情况
        let _ = self.message_bus.publish(BusMessage::sync(&payload)).await;
    }
}
