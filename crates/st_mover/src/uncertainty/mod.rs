// crates/st_mover/src/uncertainty/mod.rs

//! 风场不确定性模块
//!
//! # 子模块
//!
//! - [`sampler`]: Box–Muller 抽样与风向拒绝判据
//! - [`store`]: 每粒子缓存扰动项及其生命周期
//! - [`updater`]: 每步展宽参数计算与重抽样决策
//! - [`perturb`]: 将扰动施加到风速向量
//!
//! 扰动项在持续时间内保持不变，使不确定性在时间上相关，而不是每步独立的噪声。

pub mod perturb;
pub mod sampler;
pub mod store;
pub mod updater;

pub use perturb::{add_uncertainty, MIN_COS_THETA, MIN_WIND_NORM};
pub use sampler::{box_muller, draw_term, within_max_angle, WindUncertainTerm, MAX_DRAWS};
pub use store::{Staleness, StoreState, UncertaintyStore};
pub use updater::{update_uncertainty, UncertaintyParams, UpdateOutcome};
