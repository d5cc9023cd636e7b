pub mod time;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 图表绘制样式枚举。
///
/// # Invariants
/// - 封闭集合，新增样式必须在所有 `match` 分支中显式处理。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ChartStyle {
    // 收盘价折线
    Line,
    // 收盘价面积图
    Area,
    // 收盘价柱状图
    Bar,
    // 美国线
    Ohlc,
    // 蜡烛图
    #[default]
    Candlestick,
    // 平均 K 线
    HeikinAshi,
}

impl ChartStyle {
    /// 全部样式，按界面展示顺序排列。
    pub const ALL: [ChartStyle; 6] = [
        ChartStyle::Line,
        ChartStyle::Area,
        ChartStyle::Bar,
        ChartStyle::Ohlc,
        ChartStyle::Candlestick,
        ChartStyle::HeikinAshi,
    ];
}

impl FromStr for ChartStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(ChartStyle::Line),
            "area" => Ok(ChartStyle::Area),
            "bar" => Ok(ChartStyle::Bar),
            "ohlc" => Ok(ChartStyle::Ohlc),
            "candlestick" | "candle" => Ok(ChartStyle::Candlestick),
            "heikin-ashi" | "heikin_ashi" | "heikinashi" | "ha" => Ok(ChartStyle::HeikinAshi),
            _ => Err(format!("Unknown ChartStyle: {}", s)),
        }
    }
}

impl std::fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartStyle::Line => write!(f, "line"),
            ChartStyle::Area => write!(f, "area"),
            ChartStyle::Bar => write!(f, "bar"),
            ChartStyle::Ohlc => write!(f, "ohlc"),
            ChartStyle::Candlestick => write!(f, "candlestick"),
            ChartStyle::HeikinAshi => write!(f, "heikin-ashi"),
        }
    }
}

/// # Summary
/// 绘图表面的像素尺寸，由调用方提供。
///
/// # Invariants
/// - 原点位于左上角，Y 轴向下增长。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// 主价格窗格的默认尺寸。
    pub const PRICE_PANE: Viewport = Viewport {
        width: 800.0,
        height: 400.0,
    };

    /// 成交量窗格的默认尺寸。
    pub const VOLUME_PANE: Viewport = Viewport {
        width: 800.0,
        height: 200.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// 宽高均为正的有限值时才可绘制。
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::PRICE_PANE
    }
}
