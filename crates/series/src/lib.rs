//! # `candela-series` - K 线归一化与增量合并
//!
//! 将异构、可能残缺的原始记录转换为有界、按时间升序的 K 线序列。
//!
//! ## 数据流
//! 原始 JSON 载荷 -> `batch::parse_batch` -> `normalizer::Normalizer` -> `merge::merge` -> `buffer::SeriesBuffer`

pub mod batch;
pub mod buffer;
pub mod merge;
pub mod normalizer;
