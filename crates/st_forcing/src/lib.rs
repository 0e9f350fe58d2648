// crates/st_forcing/src/lib.rs

//! 外力模块
//!
//! 提供风致漂移所需的时变风场数据：
//! - 风场提供者 ([`WindField`], [`VelocityProvider`])
//! - 时间序列 ([`TimeSeries`], [`VectorTimeSeries`])
//!
//! # 设计思路
//!
//! 风场以标签联合 {Constant, TimeSeries} 表示，通过 [`VelocityProvider`]
//! 统一查询。超出覆盖范围的查询返回 `CoverageGap`，由调用方决定如何恢复。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod timeseries;
pub mod wind;

pub use timeseries::{Coverage, ExtrapolationMode, TimeSeries, VectorTimeSeries};
pub use wind::{VelocityProvider, WindField, WindMode};
