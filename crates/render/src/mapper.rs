use crate::domain::PriceDomain;
use crate::scene::CandleGeometry;
use candela_core::common::Viewport;
use candela_core::config::RenderConfig;
use candela_core::market::entity::Candle;

/// 将下标转换为浮点数，超出 u32 时饱和。
pub(crate) fn index_to_f64(index: usize) -> f64 {
    u32::try_from(index).map_or(f64::from(u32::MAX), f64::from)
}

// 调用方已保证 value 为非负有限值，`as` 在越界时饱和
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_to_index(value: f64) -> usize {
    value.floor() as usize
}

/// # Summary
/// 横向等宽槽位划分：视口宽度按 K 线数量均分。
///
/// # Invariants
/// - 绘制与悬停命中共用同一划分，保证悬停高亮与绘制几何像素一致。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotLayout {
    width: f64,
    count: usize,
    body_width_ratio: f64,
}

impl SlotLayout {
    pub fn new(width: f64, count: usize, body_width_ratio: f64) -> Self {
        Self {
            width,
            count,
            body_width_ratio: body_width_ratio.clamp(0.0, 1.0),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// 单根 K 线占用的槽位宽度。
    pub fn slot_width(&self) -> f64 {
        if self.count == 0 || !self.width.is_finite() || self.width <= 0.0 {
            return 0.0;
        }
        self.width / index_to_f64(self.count)
    }

    /// 实体宽度。
    pub fn body_width(&self) -> f64 {
        self.slot_width() * self.body_width_ratio
    }

    /// 第 `index` 个槽位的中心。
    pub fn center_x(&self, index: usize) -> f64 {
        (index_to_f64(index) + 0.5) * self.slot_width()
    }

    /// 第 `index` 根实体的左边缘。
    pub fn body_x(&self, index: usize) -> f64 {
        self.center_x(index) - self.body_width() / 2.0
    }

    /// # Summary
    /// 根据指针横坐标求最近的 K 线下标。
    ///
    /// # Logic
    /// 1. 空序列或非有限坐标返回 None。
    /// 2. 取指针所在槽位，越出左右边界时夹到首尾。
    ///
    /// # Arguments
    /// * `px`: 相对绘图区左边缘的像素偏移。
    ///
    /// # Returns
    /// K 线下标。
    pub fn index_at(&self, px: f64) -> Option<usize> {
        let slot = self.slot_width();
        if self.count == 0 || !px.is_finite() || slot <= 0.0 {
            return None;
        }
        let last = self.count - 1;
        let position = px / slot;
        if position <= 0.0 {
            return Some(0);
        }
        Some(floor_to_index(position).min(last))
    }
}

/// # Summary
/// 坐标映射器：价格映射到纵向像素，下标映射到横向槽位。
///
/// # Invariants
/// - Y 轴向下增长，价格越高 `y` 越小（单调不增）。
/// - 非有限价格不产生坐标，值域零跨度时输出视口中线，绝不产生 NaN。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    domain: PriceDomain,
    viewport: Viewport,
    slots: SlotLayout,
    // 实体最小像素高度
    min_body_height: f64,
}

impl CoordinateMapper {
    /// # Summary
    /// 构造映射器。
    ///
    /// # Arguments
    /// * `domain`: 价格值域。
    /// * `viewport`: 绘图区尺寸。
    /// * `count`: K 线数量，决定横向槽位宽度。
    /// * `config`: 提供实体宽度比例与最小实体高度。
    pub fn new(domain: PriceDomain, viewport: Viewport, count: usize, config: &RenderConfig) -> Self {
        Self {
            domain,
            viewport,
            slots: SlotLayout::new(viewport.width, count, config.body_width_ratio),
            min_body_height: config.min_body_height.max(0.0),
        }
    }

    pub fn domain(&self) -> PriceDomain {
        self.domain
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn slots(&self) -> &SlotLayout {
        &self.slots
    }

    /// # Summary
    /// 价格转纵向像素：`((max - price) / (max - min)) * height`。
    ///
    /// # Returns
    /// 价格非有限时返回 None；值域零跨度时返回视口中线。
    pub fn price_to_y(&self, price: f64) -> Option<f64> {
        if !price.is_finite() {
            return None;
        }
        let span = self.domain.span();
        if span == 0.0 || !span.is_finite() {
            return Some(self.viewport.height / 2.0);
        }
        Some((self.domain.max - price) / span * self.viewport.height)
    }

    /// # Summary
    /// 纵向像素转价格，用于十字线标注。超出视口的坐标被夹到边界。
    pub fn y_to_price(&self, y: f64) -> Option<f64> {
        if !y.is_finite() || self.viewport.height <= 0.0 {
            return None;
        }
        let rel = (y / self.viewport.height).clamp(0.0, 1.0);
        Some(self.domain.max - rel * self.domain.span())
    }

    /// # Summary
    /// 计算实体的上下沿像素，保证最小高度。
    ///
    /// # Logic
    /// 1. 分别映射开盘价与收盘价。
    /// 2. 高度不足 `min_body_height` 时以中点为中心向两侧扩展。
    ///
    /// # Returns
    /// `(top_y, bottom_y)`，任一价格非有限时返回 None。
    pub fn body_span(&self, open: f64, close: f64) -> Option<(f64, f64)> {
        let open_y = self.price_to_y(open)?;
        let close_y = self.price_to_y(close)?;
        let (top, bottom) = (open_y.min(close_y), open_y.max(close_y));
        if bottom - top >= self.min_body_height {
            return Some((top, bottom));
        }
        let mid = (top + bottom) / 2.0;
        let half = self.min_body_height / 2.0;
        Some((mid - half, mid + half))
    }

    /// # Summary
    /// 计算单根 K 线的绘制几何。
    ///
    /// # Arguments
    /// * `index`: K 线在序列中的下标。
    /// * `candle`: K 线。
    ///
    /// # Returns
    /// 非法 K 线返回 None，在图上表现为空缺。
    pub fn project(&self, index: usize, candle: &Candle) -> Option<CandleGeometry> {
        if !candle.is_valid() {
            return None;
        }
        let high_y = self.price_to_y(candle.high.max(candle.low))?;
        let low_y = self.price_to_y(candle.low.min(candle.high))?;
        let (body_top_y, body_bottom_y) = self.body_span(candle.open, candle.close)?;

        Some(CandleGeometry {
            index,
            time: candle.time,
            x: self.slots.body_x(index),
            center_x: self.slots.center_x(index),
            candle_width: self.slots.body_width(),
            high_y,
            low_y,
            body_top_y,
            body_bottom_y,
            is_bullish: candle.is_bullish(),
        })
    }
}
