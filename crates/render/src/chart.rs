use crate::dispatch::{domain_for, dispatch, volume_bars};
use crate::domain::PriceDomain;
use crate::mapper::SlotLayout;
use crate::scene::{Scene, VolumeScene};
use candela_core::common::{ChartStyle, Viewport};
use candela_core::config::{MergeConfig, RenderConfig};
use candela_core::market::entity::{Candle, RawRecord};
use candela_series::batch::parse_batch;
use candela_series::buffer::SeriesBuffer;
use candela_series::merge::{MergeMode, SeriesState, merge};
use serde_json::Value;
use tracing::debug;

/// # Summary
/// 图表引擎外壳，持有序列状态并响应两类外部事件：新数据交付、视口或样式变化。
///
/// # Invariants
/// - 单线程使用，不可重入；每次交付生成完整的下一状态后整体替换，不存在半合并状态。
/// - 不持有计时器，`now` 始终由调用方提供。
/// - 切换样式只重新分发，不重新归一化数据。
#[derive(Debug, Clone)]
pub struct ChartEngine {
    merge_config: MergeConfig,
    render_config: RenderConfig,
    // 当前序列快照、更新时间与消费计数
    state: SeriesState,
    style: ChartStyle,
    price_viewport: Viewport,
    volume_viewport: Viewport,
}

impl ChartEngine {
    /// # Summary
    /// 创建空引擎。
    ///
    /// # Arguments
    /// * `merge_config`: 合并配置。
    /// * `render_config`: 渲染配置，提供初始样式与视口。
    pub fn new(merge_config: MergeConfig, render_config: RenderConfig) -> Self {
        Self {
            state: SeriesState::new(merge_config.capacity),
            style: render_config.style,
            price_viewport: render_config.price_viewport,
            volume_viewport: render_config.volume_viewport,
            merge_config,
            render_config,
        }
    }

    /// # Summary
    /// 应用一次数据交付。
    ///
    /// # Logic
    /// 1. 调用纯函数 `merge` 计算下一状态。
    /// 2. 整体替换状态。
    ///
    /// # Arguments
    /// * `batch`: 原始记录。
    /// * `now_ms`: 交付时间。
    ///
    /// # Returns
    /// 本次实际采用的合并路径。
    pub fn apply(&mut self, batch: &[RawRecord], now_ms: i64) -> MergeMode {
        let outcome = merge(&self.state, batch, now_ms, &self.merge_config);
        self.state = outcome.state;
        outcome.mode
    }

    /// 解析 JSON 载荷后应用，损坏条目被跳过。
    pub fn apply_payload(&mut self, payload: &Value, now_ms: i64) -> MergeMode {
        let parsed = parse_batch(payload);
        if !parsed.rejected.is_empty() {
            debug!(rejected = parsed.rejected.len(), "payload contained malformed records");
        }
        self.apply(&parsed.records, now_ms)
    }

    pub fn style(&self) -> ChartStyle {
        self.style
    }

    pub fn set_style(&mut self, style: ChartStyle) {
        self.style = style;
    }

    pub fn price_viewport(&self) -> Viewport {
        self.price_viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.price_viewport = viewport;
    }

    pub fn set_volume_viewport(&mut self, viewport: Viewport) {
        self.volume_viewport = viewport;
    }

    /// 当前序列的只读快照。
    pub fn snapshot(&self) -> SeriesBuffer {
        self.state.buffer.clone()
    }

    pub fn last_update_at(&self) -> Option<i64> {
        self.state.updated_at
    }

    /// 当前样式下的值域，无数据时为 None。
    pub fn domain(&self) -> Option<PriceDomain> {
        domain_for(self.style, self.state.buffer.as_slice())
    }

    /// # Summary
    /// 生成主价格窗格场景。
    ///
    /// # Returns
    /// 无可渲染值域（空序列或全部非法）时返回 None。
    pub fn scene(&self) -> Option<Scene> {
        if !self.price_viewport.is_drawable() {
            return None;
        }
        let domain = self.domain()?;
        Some(dispatch(
            self.style,
            self.state.buffer.as_slice(),
            domain,
            self.price_viewport,
            &self.render_config,
        ))
    }

    /// 生成成交量窗格场景。
    pub fn volume_scene(&self) -> Option<VolumeScene> {
        if !self.volume_viewport.is_drawable() {
            return None;
        }
        volume_bars(self.state.buffer.as_slice(), self.volume_viewport, &self.render_config)
    }

    /// # Summary
    /// 悬停命中：根据指针横坐标返回最近的 K 线。
    ///
    /// # Logic
    /// 使用与绘制相同的槽位划分求下标，返回缓冲区中的原始 K 线（非变换值）。
    ///
    /// # Arguments
    /// * `px`: 相对主价格窗格左边缘的像素偏移。
    ///
    /// # Returns
    /// `(下标, K 线)`，空序列时返回 None。
    pub fn hover(&self, px: f64) -> Option<(usize, Candle)> {
        let slots = SlotLayout::new(
            self.price_viewport.width,
            self.state.buffer.len(),
            self.render_config.body_width_ratio,
        );
        let index = slots.index_at(px)?;
        self.state.buffer.get(index).map(|c| (index, *c))
    }
}
