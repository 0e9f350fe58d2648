// crates/st_forcing/src/wind.rs

//! 风场数据提供者
//!
//! 为风致漂移计算提供时变风速。
//!
//! # 支持的数据源
//!
//! - 恒定风场
//! - 时间序列风场（线性插值 + 外推模式）
//!
//! # 使用示例
//!
//! ```
//! use st_forcing::{WindField, VelocityProvider};
//!
//! // 恒定风场：10 m/s 西南风（从 225° 吹来）
//! let wind = WindField::from_speed_direction(10.0, 225.0);
//! let vel = wind.query_velocity(3600.0).unwrap();
//! assert!((vel.length() - 10.0).abs() < 1e-10);
//! ```

use glam::DVec2;
use serde::{Deserialize, Serialize};
use st_foundation::{Seconds, StResult};

use crate::timeseries::{Coverage, ExtrapolationMode, VectorTimeSeries};

/// 速度提供者接口
///
/// 返回 (u, v) 分量 [m/s]，u 向东、v 向北。
pub trait VelocityProvider {
    /// 查询指定时刻的速度
    ///
    /// 时刻超出数据覆盖范围时返回 [`st_foundation::StError::CoverageGap`]。
    fn query_velocity(&self, time: Seconds) -> StResult<DVec2>;

    /// 检查指定时刻是否有数据
    fn check_coverage(&self, time: Seconds) -> StResult<Coverage>;
}

/// 风场模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindMode {
    /// 恒定风
    Constant,
    /// 时间序列风
    TimeSeries,
}

/// 风场数据
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindField {
    /// 恒定风场 [m/s]
    Constant {
        /// 东向分量
        u: f64,
        /// 北向分量
        v: f64,
    },
    /// 时间序列（插值）
    TimeSeries(VectorTimeSeries),
}

impl Default for WindField {
    fn default() -> Self {
        Self::calm()
    }
}

impl WindField {
    /// 创建恒定风场（分量形式）
    pub fn constant(u: f64, v: f64) -> Self {
        Self::Constant { u, v }
    }

    /// 创建恒定风场
    ///
    /// # 参数
    /// - `speed`: 风速 [m/s]
    /// - `direction_deg`: 风向 [度]，0=北，90=东，风从该方向吹来
    pub fn from_speed_direction(speed: f64, direction_deg: f64) -> Self {
        let dir_rad = direction_deg.to_radians();
        Self::Constant {
            u: -speed * dir_rad.sin(),
            v: -speed * dir_rad.cos(),
        }
    }

    /// 静风
    pub fn calm() -> Self {
        Self::Constant { u: 0.0, v: 0.0 }
    }

    /// 创建时间序列风场
    ///
    /// # 参数
    /// - `times`: 时间点 [s]
    /// - `u_values`: U 分量 [m/s]
    /// - `v_values`: V 分量 [m/s]
    pub fn time_series(
        times: Vec<Seconds>,
        u_values: Vec<f64>,
        v_values: Vec<f64>,
        mode: ExtrapolationMode,
    ) -> StResult<Self> {
        let series = VectorTimeSeries::from_components(times, u_values, v_values)?;
        Ok(Self::TimeSeries(series.with_extrapolation(mode)))
    }

    /// 当前模式
    pub fn mode(&self) -> WindMode {
        match self {
            Self::Constant { .. } => WindMode::Constant,
            Self::TimeSeries(_) => WindMode::TimeSeries,
        }
    }

    /// 是否为恒定风
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant { .. })
    }
}

impl VelocityProvider for WindField {
    fn query_velocity(&self, time: Seconds) -> StResult<DVec2> {
        match self {
            Self::Constant { u, v } => Ok(DVec2::new(*u, *v)),
            Self::TimeSeries(series) => {
                let (u, v) = series.value_at(time)?;
                Ok(DVec2::new(u, v))
            }
        }
    }

    fn check_coverage(&self, time: Seconds) -> StResult<Coverage> {
        match self {
            Self::Constant { .. } => Ok(Coverage::Constant),
            Self::TimeSeries(series) => series.coverage(time),
        }
    }
}
