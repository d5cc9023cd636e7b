use candela_core::feed::port::{BatchStream, RecordSource};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

// 轮询间隔下限，防止零间隔导致 tokio interval 崩溃
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// # Summary
/// 启动后台轮询任务，将每次拉取结果推入批次流。
///
/// # Logic
/// 1. 创建异步通道 (mpsc)。
/// 2. 按固定间隔调用 `fetch`，首个周期立即执行。
/// 3. 拉取失败时记录警告并等待下一周期，不终止订阅。
/// 4. 接收端被丢弃后任务自行退出。
///
/// # Arguments
/// * `source`: 数据源，需可克隆以移入后台任务。
/// * `interval`: 轮询间隔。
///
/// # Returns
/// 批次流。
pub fn spawn_poller<S>(source: S, interval: Duration) -> BatchStream
where
    S: RecordSource + Clone + 'static,
{
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(MIN_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match source.fetch().await {
                Ok(batch) => {
                    if tx.send(batch).await.is_err() {
                        debug!(source = source.name(), "subscriber dropped, stopping poller");
                        return;
                    }
                }
                Err(e) => warn!(source = source.name(), "poll failed: {}", e),
            }
        }
    });

    Box::pin(ReceiverStream::new(rx))
}
