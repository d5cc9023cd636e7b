use thiserror::Error;

/// # Summary
/// 数据源错误枚举，处理网络、文件及载荷解析问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum FeedError {
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 本地文件读取错误
    #[error("IO error: {0}")]
    Io(String),
    // 载荷不是合法 JSON
    #[error("Parse error: {0}")]
    Parse(String),
    // 数据源存在但没有内容
    #[error("Data not found")]
    NotFound,
}
