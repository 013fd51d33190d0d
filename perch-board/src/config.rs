use std::path::PathBuf;

/// 看板配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | SEAT_SERVER_ADDR | (未设置 = 离线模式) | 座位服务 TCP 地址 |
/// | SHARE_BASE_URL | https://perch.example/board | 分享链接的基础 URL |
/// | CACHE_DIR | .perch-board | 本地缓存目录 |
/// | BOARD_NAME | perch-board | 客户端名称 |
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// 座位服务地址；None 表示纯本地模式 (链接 + 缓存)
    pub server_addr: Option<String>,
    /// 分享链接的基础 URL
    pub share_base_url: String,
    /// 本地缓存目录
    pub cache_dir: PathBuf,
    /// 客户端名称 (出现在服务端的连接列表里)
    pub client_name: String,
}

impl BoardConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            server_addr: std::env::var("SEAT_SERVER_ADDR").ok(),
            share_base_url: std::env::var("SHARE_BASE_URL")
                .unwrap_or_else(|_| "https://perch.example/board".into()),
            cache_dir: std::env::var("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".perch-board")),
            client_name: std::env::var("BOARD_NAME").unwrap_or_else(|_| "perch-board".into()),
        }
    }

    /// 本地缓存数据库路径
    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join("seats-cache.redb")
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
