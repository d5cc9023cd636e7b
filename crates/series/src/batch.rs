use candela_core::market::entity::RawRecord;
use candela_core::market::error::RecordError;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// # Summary
/// 一次交付解析后的结果。
///
/// # Invariants
/// - `records` 保留原始顺序，下标与上游载荷中的有效条目一一对应。
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    // 成功解析的记录
    pub records: Vec<RawRecord>,
    // 被丢弃的条目及原因
    pub rejected: Vec<RecordError>,
}

/// # Summary
/// 将上游 JSON 载荷解析为原始记录批次。
///
/// # Logic
/// 1. 载荷不是数组时返回空批次。
/// 2. 逐条检查元素，非对象或字段类型不匹配的条目被跳过并记录警告。
/// 3. 其余条目保持原始顺序。
///
/// # Arguments
/// * `payload`: 上游交付的 JSON 值。
///
/// # Returns
/// 解析后的批次，永不失败。
pub fn parse_batch(payload: &Value) -> ParsedBatch {
    let Some(items) = payload.as_array() else {
        warn!("Discarding payload: {}", RecordError::NotAnArray);
        return ParsedBatch {
            records: Vec::new(),
            rejected: vec![RecordError::NotAnArray],
        };
    };

    let mut batch = ParsedBatch {
        records: Vec::with_capacity(items.len()),
        rejected: Vec::new(),
    };

    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            warn!("Skipping record: {}", RecordError::NotAnObject(index));
            batch.rejected.push(RecordError::NotAnObject(index));
            continue;
        }
        match RawRecord::deserialize(item) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                let err = RecordError::Malformed {
                    index,
                    reason: e.to_string(),
                };
                warn!("Skipping record: {}", err);
                batch.rejected.push(err);
            }
        }
    }

    batch
}
