use candela_core::market::entity::Candle;
use serde::{Deserialize, Serialize};

/// # Summary
/// 带留白的价格值域，纵轴缩放的依据。
///
/// # Invariants
/// - 由序列派生，序列变化时重新计算，没有独立生命周期。
/// - 经 `from_candles` 得到的值域满足 `max > min`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceDomain {
    pub min: f64,
    pub max: f64,
}

/// # Summary
/// 按价格波动幅度分档计算留白。
///
/// # Logic
/// 1. 幅度 < 0.001：`max(range * 2, 0.0005)`，保证外汇等微小波动不会被压成直线。
/// 2. 0.001 <= 幅度 < 0.01：`range * 0.5`。
/// 3. 幅度 >= 0.01：`range * 0.1`。
///
/// # Arguments
/// * `range`: 原始最高价与最低价之差。
///
/// # Returns
/// 上下两侧各自的留白。
pub fn padding_for(range: f64) -> f64 {
    if range < 0.001 {
        (range * 2.0).max(0.0005)
    } else if range < 0.01 {
        range * 0.5
    } else {
        range * 0.1
    }
}

impl PriceDomain {
    /// # Summary
    /// 由一段 K 线计算值域。
    ///
    /// # Logic
    /// 1. 跳过 `is_valid` 为 false 的 K 线。
    /// 2. 取最低价的最小值与最高价的最大值（单根内高低颠倒时按较小/较大者处理）。
    /// 3. 两侧按 `padding_for` 留白。
    ///
    /// # Arguments
    /// * `candles`: 参与计算的 K 线。
    ///
    /// # Returns
    /// 没有任何合法 K 线时返回 None，调用方应渲染“无数据”状态。
    pub fn from_candles(candles: &[Candle]) -> Option<Self> {
        let (raw_min, raw_max) = candles
            .iter()
            .filter(|c| c.is_valid())
            .map(|c| (c.low.min(c.high), c.high.max(c.low)))
            .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))?;

        let padding = padding_for(raw_max - raw_min);
        Some(Self {
            min: raw_min - padding,
            max: raw_max + padding,
        })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }

    /// # Summary
    /// 生成供坐标轴标注使用的等距价格刻度。
    ///
    /// # Arguments
    /// * `count`: 刻度数量（含两端）。
    ///
    /// # Returns
    /// 从 `min` 到 `max` 的升序刻度；`count` 为 1 时返回中点。
    pub fn ticks(&self, count: u32) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![self.min + self.span() / 2.0],
            _ => {
                let step = self.span() / f64::from(count - 1);
                (0..count).map(|i| self.min + step * f64::from(i)).collect()
            }
        }
    }
}
