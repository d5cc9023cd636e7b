use crate::poll::spawn_poller;
use async_trait::async_trait;
use candela_core::feed::error::FeedError;
use candela_core::feed::port::{BatchStream, RecordSource};
use candela_core::market::entity::RawRecord;
use candela_series::batch::parse_batch;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// # Summary
/// 本地 JSON 文件数据源，文件内容为原始记录数组。
///
/// # Invariants
/// - 每次拉取都重新读取文件，外部进程可随时覆盖文件以模拟推送。
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    /// # Summary
    /// 读取并解析文件。
    ///
    /// # Logic
    /// 1. 异步读取整个文件。
    /// 2. 解析为 JSON，失败返回 Parse 错误。
    /// 3. 交给 `parse_batch` 逐条提取，损坏条目被跳过。
    async fn fetch(&self) -> Result<Vec<RawRecord>, FeedError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| FeedError::Io(format!("{}: {}", self.path.display(), e)))?;
        let payload: Value =
            serde_json::from_slice(&bytes).map_err(|e| FeedError::Parse(e.to_string()))?;
        Ok(parse_batch(&payload).records)
    }

    async fn subscribe(&self, interval: Duration) -> Result<BatchStream, FeedError> {
        Ok(spawn_poller(self.clone(), interval))
    }
}
