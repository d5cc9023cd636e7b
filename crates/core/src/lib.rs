//! # `candela-core` - 图表引擎核心契约
//!
//! 定义规范化 K 线实体、原始记录线缆格式、绘制样式、配置、时钟端口与数据源端口。
//! 本 crate 不包含任何算法实现。

pub mod common;
pub mod config;

pub mod market {
    pub mod entity;
    pub mod error;
}

pub mod feed {
    pub mod error;
    pub mod port;
}
