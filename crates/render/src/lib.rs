//! # `candela-render` - 值域、坐标映射与场景分发
//!
//! 将有序 K 线序列转换为与渲染技术无关的像素几何描述。
//!
//! ## 组成
//! - `domain`：带刻度自适应留白的价格值域
//! - `mapper`：价格/下标到像素的映射，以及悬停命中
//! - `heikin_ashi`：平均 K 线变换
//! - `dispatch`：按样式生成场景
//! - `chart`：持有序列状态的引擎外壳

pub mod chart;
pub mod dispatch;
pub mod domain;
pub mod heikin_ashi;
pub mod mapper;
pub mod scene;
