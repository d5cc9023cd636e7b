use crate::buffer::SeriesBuffer;
use crate::normalizer::Normalizer;
use candela_core::config::{MergeConfig, MergeStrategy};
use candela_core::market::entity::{Candle, RawRecord};
use std::collections::BTreeMap;
use tracing::debug;

/// # Summary
/// 一次合并实际采用的路径。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    // 全量替换
    FullReplace,
    // 增量追加
    Incremental,
    // 输入为空，未做任何改动
    Unchanged,
}

/// # Summary
/// 合并状态：当前序列快照、上次更新时间与已消费的上游记录数。
///
/// # Invariants
/// - `consumed` 记录上游批次中已被并入序列的前缀长度，与缓冲区长度无关；
///   缓冲区被截断后仍持续增长，全量替换时重置为批次长度。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesState {
    pub buffer: SeriesBuffer,
    // 上次成功合并的时间
    pub updated_at: Option<i64>,
    // 已并入的上游记录数
    pub consumed: usize,
}

impl SeriesState {
    /// 以指定容量创建空状态。
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: SeriesBuffer::new(capacity),
            updated_at: None,
            consumed: 0,
        }
    }
}

/// # Summary
/// 合并结果：完整的下一状态与实际采用的路径。
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub state: SeriesState,
    pub mode: MergeMode,
}

/// # Summary
/// 判定本次交付应走全量替换还是增量合并。
///
/// # Logic
/// 存在上次更新时间、距今小于实时窗口且当前缓冲区非空时走增量，否则全量替换。
///
/// # Arguments
/// * `state`: 当前状态。
/// * `now_ms`: 本次交付时间。
/// * `config`: 合并配置。
///
/// # Returns
/// `MergeMode::Incremental` 或 `MergeMode::FullReplace`。
pub fn select_mode(state: &SeriesState, now_ms: i64, config: &MergeConfig) -> MergeMode {
    match state.updated_at {
        Some(prev)
            if now_ms.saturating_sub(prev) < config.realtime_window_ms
                && !state.buffer.is_empty() =>
        {
            MergeMode::Incremental
        }
        _ => MergeMode::FullReplace,
    }
}

/// # Summary
/// 将一次数据交付合并进当前状态，返回完整的下一状态。
///
/// # Logic
/// 1. 输入为空时原样返回当前状态。
/// 2. 按 `select_mode` 选择路径。
/// 3. 全量替换：归一化全部记录后排序、截断，`consumed` 置为批次长度。
/// 4. 增量合并：按 `MergeStrategy` 取出新数据并与当前序列合并后排序、截断。
///    `AppendTail` 只处理 `consumed` 之后的记录。
///
/// # Arguments
/// * `state`: 当前状态，不会被修改。
/// * `incoming`: 本次交付的原始记录。
/// * `now_ms`: 本次交付时间，由调用方提供。
/// * `config`: 合并配置。
///
/// # Returns
/// 新的状态（缓冲区升序、长度不超过容量）及合并路径。
pub fn merge(
    state: &SeriesState,
    incoming: &[RawRecord],
    now_ms: i64,
    config: &MergeConfig,
) -> MergeOutcome {
    if incoming.is_empty() {
        return MergeOutcome {
            state: state.clone(),
            mode: MergeMode::Unchanged,
        };
    }

    let mode = select_mode(state, now_ms, config);
    let normalizer = Normalizer::new(now_ms, incoming.len(), config);
    let current = &state.buffer;

    let (candles, consumed) = match mode {
        MergeMode::Incremental => match config.strategy {
            MergeStrategy::AppendTail => (
                append_tail(current, incoming, state.consumed, &normalizer),
                state.consumed.max(incoming.len()),
            ),
            MergeStrategy::KeyedByTime => {
                (keyed_by_time(current, incoming, &normalizer), incoming.len())
            }
        },
        MergeMode::FullReplace | MergeMode::Unchanged => {
            (normalize_all(incoming, &normalizer), incoming.len())
        }
    };

    let buffer = SeriesBuffer::from_unsorted(candles, config.capacity);
    debug!(
        ?mode,
        strategy = ?config.strategy,
        previous = current.len(),
        incoming = incoming.len(),
        consumed,
        merged = buffer.len(),
        "series merged"
    );

    MergeOutcome {
        state: SeriesState {
            buffer,
            updated_at: Some(now_ms),
            consumed,
        },
        mode,
    }
}

fn normalize_all(incoming: &[RawRecord], normalizer: &Normalizer) -> Vec<Candle> {
    incoming
        .iter()
        .enumerate()
        .map(|(i, raw)| normalizer.normalize(i, raw))
        .collect()
}

// 只处理尚未消费的尾部记录
fn append_tail(
    current: &SeriesBuffer,
    incoming: &[RawRecord],
    consumed: usize,
    normalizer: &Normalizer,
) -> Vec<Candle> {
    let mut combined = current.to_vec();
    combined.extend(
        incoming
            .iter()
            .enumerate()
            .skip(consumed)
            .map(|(i, raw)| normalizer.normalize(i, raw)),
    );
    combined
}

// 同一时间的新 K 线覆盖旧 K 线
fn keyed_by_time(current: &SeriesBuffer, incoming: &[RawRecord], normalizer: &Normalizer) -> Vec<Candle> {
    let mut by_time: BTreeMap<i64, Candle> = current.iter().map(|c| (c.time, *c)).collect();
    for candle in normalize_all(incoming, normalizer) {
        by_time.insert(candle.time, candle);
    }
    by_time.into_values().collect()
}
