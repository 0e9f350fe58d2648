// crates/st_foundation/src/lib.rs

//! SpillTrack Foundation Layer
//!
//! 基础层，提供整个项目共享的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型
//! - [`geo`]: 定点地理坐标与经纬度换算常量
//!
//! # 示例
//!
//! ```
//! use st_foundation::{
//!     geo::{WorldPoint3D, long_to_lat_ratio},
//!     error::{StError, StResult},
//! };
//!
//! let p = WorldPoint3D::from_degrees(-72.5, 0.0, 0.0);
//! assert!((long_to_lat_ratio(p.p.lat) - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod geo;

// 重导出常用类型
pub use error::{StError, StResult};
pub use geo::{
    FIXED_POINT_SCALE, METERS_PER_DEGREE_LAT, WorldPoint, WorldPoint3D, long_to_lat_ratio,
};

/// 模拟时间 [s]
pub type Seconds = f64;
