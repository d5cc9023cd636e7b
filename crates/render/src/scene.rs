use crate::domain::PriceDomain;
use candela_core::common::{ChartStyle, Viewport};
use serde::Serialize;

/// 像素空间中的点
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// # Summary
/// 单根 K 线的像素几何，交给渲染方与悬停组件使用。
///
/// # Invariants
/// - 所有坐标均为有限值。
/// - `high_y <= body_top_y`，`body_bottom_y <= low_y`（实体被最小高度撑开时可能略越出影线）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandleGeometry {
    // 在序列中的下标
    pub index: usize,
    pub time: i64,
    // 实体左边缘
    pub x: f64,
    // 槽位中心，影线所在位置
    pub center_x: f64,
    // 实体宽度
    pub candle_width: f64,
    pub high_y: f64,
    pub low_y: f64,
    pub body_top_y: f64,
    pub body_bottom_y: f64,
    pub is_bullish: bool,
}

/// # Summary
/// 与渲染技术无关的绘制图元。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        bullish: bool,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        bullish: bool,
    },
    // 不闭合折线
    Polyline { points: Vec<Point> },
    // 闭合多边形，用于面积填充
    Polygon { points: Vec<Point> },
}

/// # Summary
/// 主价格窗格的完整场景描述。
///
/// # Invariants
/// - `candles` 按下标升序，只包含合法 K 线。
/// - `domain` 即用于映射的值域，供坐标轴标注使用。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub style: ChartStyle,
    pub domain: PriceDomain,
    pub viewport: Viewport,
    pub candles: Vec<CandleGeometry>,
    pub primitives: Vec<Primitive>,
}

/// 成交量柱
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeBar {
    pub index: usize,
    pub x: f64,
    pub width: f64,
    pub y: f64,
    pub height: f64,
    pub is_bullish: bool,
}

/// # Summary
/// 成交量窗格的场景描述。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeScene {
    pub viewport: Viewport,
    // 用于缩放的最大已知成交量
    pub max_volume: f64,
    pub bars: Vec<VolumeBar>,
}
