use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 单根 K 线数据实体，引擎内部唯一的规范化行情表示。
///
/// # Invariants
/// - `time` 为 UTC 毫秒时间戳。
/// - 四个价格字段均为有限值时，`high` 必须大于或等于 `low`, `open`, `close`。
/// - 价格字段允许为 NaN，表示上游数据损坏；此类 K 线通过 `is_valid` 被排除在值域与几何计算之外。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    // K 线开始时间 (毫秒)
    pub time: i64,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 成交量，None 表示未知
    pub volume: Option<f64>,
}

impl Candle {
    /// 构造一根 K 线。
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: Option<f64>) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// # Summary
    /// 判断该 K 线是否可参与值域与坐标计算。
    ///
    /// # Logic
    /// 四个价格字段必须全部为有限值。
    ///
    /// # Returns
    /// 合法返回 true。
    pub fn is_valid(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }

    /// 收盘价高于开盘价即为阳线。
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 实体上沿（开盘与收盘中较高者）。
    pub fn body_top(&self) -> f64 {
        self.open.max(self.close)
    }

    /// 实体下沿（开盘与收盘中较低者）。
    pub fn body_bottom(&self) -> f64 {
        self.open.min(self.close)
    }

    /// 以 chrono 时间查看 `time`，超出可表示范围时返回 None。
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }
}

/// # Summary
/// 上游推送的数值字段，兼容字符串与数字两种编码。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(f64),
    Text(String),
}

impl NumericField {
    /// # Summary
    /// 将字段解析为浮点数。
    ///
    /// # Logic
    /// 1. 数字直接返回。
    /// 2. 字符串去除首尾空白后解析，失败返回 NaN（绝不退化为 0）。
    ///
    /// # Returns
    /// 解析结果，可能为 NaN。
    pub fn to_f64(&self) -> f64 {
        match self {
            NumericField::Number(n) => *n,
            NumericField::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        }
    }
}

impl From<f64> for NumericField {
    fn from(value: f64) -> Self {
        NumericField::Number(value)
    }
}

impl From<&str> for NumericField {
    fn from(value: &str) -> Self {
        NumericField::Text(value.to_string())
    }
}

/// # Summary
/// 上游推送的时间字段，可能是毫秒时间戳（整数或小数）或 ISO 字符串。
///
/// # Invariants
/// - 变体顺序决定 serde 的匹配优先级，整数必须排在小数之前。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeField {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

/// # Summary
/// 原始行情记录，即数据抓取方交付的单根 K 线线缆格式。
///
/// # Invariants
/// - 所有字段均可缺失，缺失的处理策略由归一化器决定。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub open: Option<NumericField>,
    #[serde(default)]
    pub high: Option<NumericField>,
    #[serde(default)]
    pub low: Option<NumericField>,
    #[serde(default)]
    pub close: Option<NumericField>,
    #[serde(default)]
    pub volume: Option<NumericField>,
    // ISO 时间字符串，优先级最高
    #[serde(default)]
    pub timestamp: Option<TimeField>,
    #[serde(default)]
    pub time: Option<TimeField>,
}

impl RawRecord {
    /// 以数值形式构造仅含 OHLC 的记录。
    pub fn ohlc(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open: Some(open.into()),
            high: Some(high.into()),
            low: Some(low.into()),
            close: Some(close.into()),
            ..Self::default()
        }
    }

    /// 附加毫秒时间戳。
    pub fn with_time(mut self, millis: i64) -> Self {
        self.time = Some(TimeField::Millis(millis));
        self
    }

    /// 附加 ISO 时间字符串。
    pub fn with_timestamp(mut self, iso: &str) -> Self {
        self.timestamp = Some(TimeField::Text(iso.to_string()));
        self
    }

    /// 附加成交量。
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume.into());
        self
    }
}
