// crates/st_mover/src/engine.rs

//! 单粒子位移计算
//!
//! [`WindStep`] 是一个时间步内不变的只读快照（风场、配置、展宽参数、
//! 扰动项存储、地图），由 [`crate::WindMover::step`] 在步准备完成后生成。
//! 快照可在多个线程间共享，逐粒子并行计算位移。
//!
//! # 计算流程
//!
//! 1. 水下或已分散粒子在 `subsurface_active` 关闭时位移为零；
//! 2. 查询 `time + time_offset` 时刻的风速，无数据时位移为零；
//! 3. 已分散粒子使用深度衰减模型；
//! 4. 其余粒子：不确定性成员先施加扰动，再乘以风压系数；
//! 5. 速度 [m/s] × 步长 [s] 转换为定点经纬度位移，深度分量恒为零。

use glam::DVec2;
use st_forcing::{VelocityProvider, WindField};
use st_foundation::{
    long_to_lat_ratio, Seconds, WorldPoint, WorldPoint3D, FIXED_POINT_SCALE, METERS_PER_DEGREE_LAT,
};

use crate::config::WindMoverConfig;
use crate::dispersed::dispersed_windage;
use crate::map::MixedLayerMap;
use crate::particle::{LeKind, LeRecord};
use crate::uncertainty::{add_uncertainty, UncertaintyParams, UncertaintyStore};

/// 将速度转换为定点经纬度位移
///
/// `lat` 为参考纬度（微度），用于经度方向的余弦修正。
pub fn velocity_to_displacement(velocity: DVec2, time_step: Seconds, lat: i64) -> WorldPoint3D {
    let d_long = ((velocity.x / METERS_PER_DEGREE_LAT) * time_step) / long_to_lat_ratio(lat);
    let d_lat = (velocity.y / METERS_PER_DEGREE_LAT) * time_step;

    WorldPoint3D {
        p: WorldPoint {
            long: (d_long * FIXED_POINT_SCALE) as i64,
            lat: (d_lat * FIXED_POINT_SCALE) as i64,
        },
        z: 0.0,
    }
}

/// 一个时间步内的只读快照
#[derive(Clone, Copy)]
pub struct WindStep<'a> {
    pub(crate) wind: &'a WindField,
    pub(crate) config: &'a WindMoverConfig,
    pub(crate) params: Option<UncertaintyParams>,
    pub(crate) store: &'a UncertaintyStore,
    pub(crate) map: &'a (dyn MixedLayerMap + Send + Sync),
}

impl<'a> WindStep<'a> {
    /// 本步的展宽参数
    pub fn params(&self) -> Option<UncertaintyParams> {
        self.params
    }

    /// 计算单个粒子的漂移速度 [m/s]
    ///
    /// 返回 `None` 表示本步不移动该粒子。
    pub fn velocity(
        &self,
        model_time: Seconds,
        set_index: usize,
        le_index: usize,
        le: &LeRecord,
        kind: LeKind,
    ) -> Option<DVec2> {
        if le.is_subsurface() && !self.config.subsurface_active {
            return None;
        }

        let query_time = model_time + self.config.time_offset;
        let wind = match self.wind.query_velocity(query_time) {
            Ok(v) => v,
            Err(err) => {
                log::trace!("风场查询失败，视为无风: {}", err);
                return None;
            }
        };

        if le.dispersion.is_dispersed() {
            return Some(dispersed_windage(
                wind,
                le.position.z,
                self.config.gamma,
                self.map,
            ));
        }

        let mut vel = wind;
        if kind == LeKind::Uncertainty {
            vel = self.perturb(vel, set_index, le_index);
        }
        Some(vel * le.windage)
    }

    /// 对不确定性成员施加扰动；无缓存项时返回原风速
    fn perturb(&self, wind: DVec2, set_index: usize, le_index: usize) -> DVec2 {
        let Some(params) = self.params else {
            return wind;
        };
        match self.store.term(set_index, le_index) {
            Some(term) => add_uncertainty(wind, term, &params),
            None => wind,
        }
    }

    /// 计算单个粒子一个时间步的位移
    ///
    /// 返回定点经纬度位移（微度）与深度位移（恒为 0）。
    pub fn displacement(
        &self,
        model_time: Seconds,
        time_step: Seconds,
        set_index: usize,
        le_index: usize,
        le: &LeRecord,
        kind: LeKind,
    ) -> WorldPoint3D {
        match self.velocity(model_time, set_index, le_index, le, kind) {
            Some(vel) => velocity_to_displacement(vel, time_step, le.position.p.lat),
            None => WorldPoint3D::ZERO,
        }
    }
}
