use thiserror::Error;

/// # Summary
/// 单条原始记录的解析错误。
///
/// # Invariants
/// - 仅用于记录被丢弃的原因，不会中断整批合并。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    // 整个载荷不是数组
    #[error("Payload is not an array")]
    NotAnArray,
    // 数组元素不是对象
    #[error("Record #{0} is not an object")]
    NotAnObject(usize),
    // 字段类型不匹配
    #[error("Record #{index} is malformed: {reason}")]
    Malformed { index: usize, reason: String },
}
