// crates/st_mover/src/lib.rs

//! 风漂移器
//!
//! 每个时间步计算溢油拉格朗日粒子（LE）的风致位移：
//! - 配置 (config)
//! - 粒子与子集接口 (particle)
//! - 海况参数接口 (map)
//! - 风场不确定性 (uncertainty) - 展宽参数、扰动项缓存与抽样
//! - 分散油水下漂移 (dispersed)
//! - 单粒子位移计算 (engine)
//! - 对驱动器暴露的入口 (mover)
//!
//! # 使用示例
//!
//! ```
//! use st_forcing::WindField;
//! use st_foundation::WorldPoint3D;
//! use st_mover::{LeKind, LeRecord, LeSetSizes, WindMover, WindMoverConfig};
//!
//! let mut mover = WindMover::new(
//!     WindMoverConfig::default().with_seed(7),
//!     WindField::constant(5.0, 0.0),
//! ).unwrap();
//!
//! let sets = LeSetSizes::new(vec![0, 1]);
//! mover.prepare_for_step(3600.0, 0.0, 3600.0, true, &sets).unwrap();
//!
//! let le = LeRecord::surface(WorldPoint3D::from_degrees(-72.5, 0.0, 0.0), 0.03);
//! let forecast = mover.displacement(3600.0, 3600.0, 0, 0, &le, LeKind::Forecast);
//! assert_eq!(forecast.p.lat, 0);
//! assert!(forecast.p.long > 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dispersed;
pub mod engine;
pub mod map;
pub mod mover;
pub mod particle;
pub mod uncertainty;

pub use config::WindMoverConfig;
pub use dispersed::{depth_factor, dispersed_velocity, DISPERSED_WINDAGE};
pub use engine::{velocity_to_displacement, WindStep};
pub use map::{ConstantMixedLayer, MixedLayerMap};
pub use mover::WindMover;
pub use particle::{DispersionStatus, LeKind, LeRecord, LeSetSizes, LeSets};
pub use uncertainty::{
    UncertaintyParams, UncertaintyStore, UpdateOutcome, WindUncertainTerm,
};
