use crate::feed::error::FeedError;
use crate::market::entity::RawRecord;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;

/// # Summary
/// 原始记录批次流别名，每一项对应一次完整的数据交付。
pub type BatchStream = Pin<Box<dyn Stream<Item = Vec<RawRecord>> + Send>>;

/// # Summary
/// 原始行情记录提供者接口。
///
/// # Invariants
/// - 单条记录损坏不得导致整批失败，只有整体不可读时才返回错误。
/// - 实现者不得对记录做归一化，归一化属于合并引擎的职责。
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// # Summary
    /// 数据源的可读名称，用于日志。
    fn name(&self) -> &str;

    /// # Summary
    /// 拉取一次当前完整批次。
    ///
    /// # Logic
    /// 1. 读取底层载荷（文件或网络）。
    /// 2. 解析为 JSON 并逐条提取记录，跳过损坏条目。
    ///
    /// # Returns
    /// 成功返回记录列表，失败返回 FeedError。
    async fn fetch(&self) -> Result<Vec<RawRecord>, FeedError>;

    /// # Summary
    /// 以固定间隔轮询数据源，产出批次流。
    ///
    /// # Logic
    /// 1. 启动后台轮询任务。
    /// 2. 每个周期调用一次 `fetch`，失败时记录日志并等待下一周期。
    ///
    /// # Arguments
    /// * `interval`: 轮询间隔。
    ///
    /// # Returns
    /// 成功返回异步批次流。
    async fn subscribe(&self, interval: Duration) -> Result<BatchStream, FeedError>;
}
