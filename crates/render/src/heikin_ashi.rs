use candela_core::market::entity::Candle;

/// # Summary
/// 将普通 K 线序列变换为平均 K 线（Heikin-Ashi）序列。
///
/// # Logic
/// 1. `ha_close = (open + high + low + close) / 4`。
/// 2. `ha_open` 取上一根平均 K 线开收盘的均值，首根取 `(open + close) / 2`。
/// 3. `ha_high = max(high, ha_open, ha_close)`，`ha_low = min(low, ha_open, ha_close)`。
/// 4. 非法 K 线原样输出且不推进递推链，保持下标与原序列一一对应。
///
/// # Arguments
/// * `candles`: 按时间升序的原始序列。
///
/// # Returns
/// 等长的平均 K 线序列，时间与成交量沿用原值。
pub fn heikin_ashi(candles: &[Candle]) -> Vec<Candle> {
    let mut previous: Option<(f64, f64)> = None;

    candles
        .iter()
        .map(|c| {
            if !c.is_valid() {
                return *c;
            }
            let ha_close = (c.open + c.high + c.low + c.close) / 4.0;
            let ha_open = match previous {
                Some((open, close)) => (open + close) / 2.0,
                None => (c.open + c.close) / 2.0,
            };
            previous = Some((ha_open, ha_close));

            Candle::new(
                c.time,
                ha_open,
                c.high.max(ha_open).max(ha_close),
                c.low.min(ha_open).min(ha_close),
                ha_close,
                c.volume,
            )
        })
        .collect()
}
