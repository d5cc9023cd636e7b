//! # `candela-feed` - 原始记录数据源适配器
//!
//! 实现 `RecordSource` 端口：本地 JSON 文件与 HTTP JSON 接口，以及共用的定时轮询订阅。
//! 数据源只负责交付原始记录，归一化与合并由 `candela-series` 完成。

pub mod file;
pub mod http;
pub mod poll;
