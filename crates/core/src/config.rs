use crate::common::{ChartStyle, Viewport};
use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub merge: MergeConfig,
    pub render: RenderConfig,
    pub feed: FeedConfig,
}

/// # Summary
/// 增量合并缓冲区配置。
///
/// # Invariants
/// - `capacity` 为 0 时缓冲区始终为空。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    // 实时窗口：距上次更新小于该值时走增量合并
    pub realtime_window_ms: i64,
    // 缓冲区最多保留的 K 线数量
    pub capacity: usize,
    // 缺失时间的记录向前回溯的步长
    pub fallback_step_ms: i64,
    pub strategy: MergeStrategy,
    pub volume: VolumeFallback,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            realtime_window_ms: 2_000,
            capacity: 100,
            fallback_step_ms: 3_600_000,
            strategy: MergeStrategy::AppendTail,
            volume: VolumeFallback::Unknown,
        }
    }
}

/// # Summary
/// 增量模式下如何识别“新”数据。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    // 假定上游批次前缀稳定，只处理超出当前长度的尾部
    #[default]
    AppendTail,
    // 按时间键合并，同一时间的新记录覆盖旧记录
    KeyedByTime,
}

/// # Summary
/// 成交量缺失时的替代策略。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VolumeFallback {
    // 保留为未知
    #[default]
    Unknown,
    // 以 0 代替
    Zero,
    // 以时间为种子生成确定性的填充值
    Synthetic { seed: u64 },
}

/// 渲染几何参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub style: ChartStyle,
    // 实体宽度占单根 K 线槽位的比例
    pub body_width_ratio: f64,
    // 实体最小像素高度，保证十字星可见
    pub min_body_height: f64,
    pub price_viewport: Viewport,
    pub volume_viewport: Viewport,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            style: ChartStyle::Candlestick,
            body_width_ratio: 0.7,
            min_body_height: 4.0,
            price_viewport: Viewport::PRICE_PANE,
            volume_viewport: Viewport::VOLUME_PANE,
        }
    }
}

/// 数据源与轮询配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub source: FeedSource,
    pub poll_interval_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: FeedSource::File {
                path: "data/candles.json".to_string(),
            },
            poll_interval_ms: 1_000,
        }
    }
}

/// 原始记录的来源
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedSource {
    File { path: String },
    Http { url: String },
}
