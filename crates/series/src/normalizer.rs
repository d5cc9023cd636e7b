use candela_core::config::{MergeConfig, VolumeFallback};
use candela_core::market::entity::{Candle, NumericField, RawRecord, TimeField};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// 超出该绝对值的浮点时间戳视为无效（约 28 万年）
const MAX_FRACTIONAL_MILLIS: f64 = 9.0e15;

/// # Summary
/// K 线归一化器，将单条原始记录转换为规范化的 `Candle`。
///
/// # Invariants
/// - 纯函数：输出只依赖构造参数与输入记录，不读取时钟，不产生副作用。
/// - 数值字段解析失败时传播 NaN，绝不退化为 0。
#[derive(Debug, Clone)]
pub struct Normalizer {
    // 调用方提供的当前时间
    now_ms: i64,
    // 当前批次的记录总数，用于回溯缺失时间
    batch_len: usize,
    // 缺失时间的回溯步长
    step_ms: i64,
    // 成交量缺失时的替代策略
    volume: VolumeFallback,
}

impl Normalizer {
    /// # Summary
    /// 为一个批次创建归一化器。
    ///
    /// # Arguments
    /// * `now_ms`: 调用方交付数据时的时间。
    /// * `batch_len`: 批次内记录总数。
    /// * `config`: 合并配置，提供回溯步长与成交量策略。
    ///
    /// # Returns
    /// 归一化器实例。
    pub fn new(now_ms: i64, batch_len: usize, config: &MergeConfig) -> Self {
        Self {
            now_ms,
            batch_len,
            step_ms: config.fallback_step_ms,
            volume: config.volume,
        }
    }

    /// # Summary
    /// 归一化批次中第 `index` 条记录。
    ///
    /// # Logic
    /// 1. 逐个解析 OHLC 字段，失败或非有限值记为 NaN。
    /// 2. 按优先级解析时间。
    /// 3. 按策略补齐成交量。
    ///
    /// # Arguments
    /// * `index`: 记录在原批次中的下标。
    /// * `raw`: 原始记录。
    ///
    /// # Returns
    /// 规范化的 K 线，可能带有 NaN 价格字段。
    pub fn normalize(&self, index: usize, raw: &RawRecord) -> Candle {
        let time = self.resolve_time(index, raw);
        Candle::new(
            time,
            price(raw.open.as_ref()),
            price(raw.high.as_ref()),
            price(raw.low.as_ref()),
            price(raw.close.as_ref()),
            self.resolve_volume(time, raw.volume.as_ref()),
        )
    }

    /// # Summary
    /// 解析记录时间。
    ///
    /// # Logic
    /// 1. `timestamp` 为 ISO 字符串时优先使用。
    /// 2. `time` 为 ISO 字符串（或纯数字字符串）时使用。
    /// 3. `time` 为数值时视为毫秒时间戳直接使用。
    /// 4. 以上均不可用时，从 `now` 按下标向前回溯固定步长。
    /// 存在但无法解析的字段顺延到下一优先级。
    fn resolve_time(&self, index: usize, raw: &RawRecord) -> i64 {
        let stamped = match &raw.timestamp {
            Some(TimeField::Text(text)) => parse_iso_millis(text),
            _ => None,
        };
        if let Some(ms) = stamped {
            return ms;
        }

        let explicit = match &raw.time {
            Some(TimeField::Text(text)) => {
                parse_iso_millis(text).or_else(|| text.trim().parse::<i64>().ok())
            }
            Some(TimeField::Millis(ms)) => Some(*ms),
            Some(TimeField::Fractional(ms)) => millis_from_f64(*ms),
            None => None,
        };

        explicit.unwrap_or_else(|| self.fallback_time(index))
    }

    fn fallback_time(&self, index: usize) -> i64 {
        let steps_back = i64::try_from(self.batch_len.saturating_sub(index)).unwrap_or(i64::MAX);
        self.now_ms
            .saturating_sub(steps_back.saturating_mul(self.step_ms))
    }

    fn resolve_volume(&self, time: i64, raw: Option<&NumericField>) -> Option<f64> {
        let reported = raw
            .map(NumericField::to_f64)
            .filter(|v| v.is_finite() && *v >= 0.0);
        if reported.is_some() {
            return reported;
        }

        match self.volume {
            VolumeFallback::Unknown => None,
            VolumeFallback::Zero => Some(0.0),
            VolumeFallback::Synthetic { seed } => {
                let mut rng = StdRng::seed_from_u64(seed ^ time.unsigned_abs());
                Some(rng.random_range(100.0..1000.0))
            }
        }
    }
}

fn price(field: Option<&NumericField>) -> f64 {
    field
        .map(NumericField::to_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(f64::NAN)
}

#[allow(clippy::cast_possible_truncation)]
fn millis_from_f64(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < MAX_FRACTIONAL_MILLIS {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

/// # Summary
/// 将 ISO 风格的时间字符串解析为 UTC 毫秒时间戳。
///
/// # Logic
/// 依次尝试：RFC 3339、无时区的日期时间（视为 UTC，`T` 或空格分隔）、纯日期（UTC 零点）。
///
/// # Arguments
/// * `text`: 时间字符串。
///
/// # Returns
/// 解析成功返回毫秒时间戳。
pub fn parse_iso_millis(text: &str) -> Option<i64> {
    let s = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}
