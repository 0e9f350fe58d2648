// crates/st_foundation/src/geo.rs

//! 定点地理坐标
//!
//! 粒子位置以整数微度（1e-6 度）存储，与整个位置积分管线保持一致。
//! 位移同样以微度表示，由外部驱动器累加到粒子位置上。

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, AddAssign};

// ============================================================================
// 地理常量
// ============================================================================

/// 每纬度对应的米数（60 海里 × 1852 m）
pub const METERS_PER_DEGREE_LAT: f64 = 111_120.0;

/// 定点坐标缩放因子（度 -> 微度）
pub const FIXED_POINT_SCALE: f64 = 1_000_000.0;

/// 经度/纬度长度比（即纬度的余弦）
///
/// `lat` 为定点纬度（微度）。
#[inline]
pub fn long_to_lat_ratio(lat: i64) -> f64 {
    let lat_deg = lat as f64 / FIXED_POINT_SCALE;
    (lat_deg * PI / 180.0).cos()
}

/// 度 -> 定点微度（向零截断）
#[inline]
pub fn degrees_to_fixed(deg: f64) -> i64 {
    (deg * FIXED_POINT_SCALE) as i64
}

/// 定点微度 -> 度
#[inline]
pub fn fixed_to_degrees(v: i64) -> f64 {
    v as f64 / FIXED_POINT_SCALE
}

// ============================================================================
// WorldPoint
// ============================================================================

/// 水平定点位置（微度）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPoint {
    /// 经度 [1e-6 度]
    pub long: i64,
    /// 纬度 [1e-6 度]
    pub lat: i64,
}

impl WorldPoint {
    /// 原点
    pub const ZERO: Self = Self { long: 0, lat: 0 };

    /// 由定点分量创建
    pub const fn new(long: i64, lat: i64) -> Self {
        Self { long, lat }
    }

    /// 由经纬度（度）创建
    pub fn from_degrees(long_deg: f64, lat_deg: f64) -> Self {
        Self {
            long: degrees_to_fixed(long_deg),
            lat: degrees_to_fixed(lat_deg),
        }
    }

    /// 经度 [度]
    pub fn long_degrees(&self) -> f64 {
        fixed_to_degrees(self.long)
    }

    /// 纬度 [度]
    pub fn lat_degrees(&self) -> f64 {
        fixed_to_degrees(self.lat)
    }
}

/// 三维位置：水平定点坐标 + 深度
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint3D {
    /// 水平位置
    pub p: WorldPoint,
    /// 深度 [m]，向下为正
    pub z: f64,
}

impl WorldPoint3D {
    /// 零位移
    pub const ZERO: Self = Self {
        p: WorldPoint::ZERO,
        z: 0.0,
    };

    /// 创建三维位置
    pub const fn new(p: WorldPoint, z: f64) -> Self {
        Self { p, z }
    }

    /// 由经纬度（度）和深度创建
    pub fn from_degrees(long_deg: f64, lat_deg: f64, z: f64) -> Self {
        Self {
            p: WorldPoint::from_degrees(long_deg, lat_deg),
            z,
        }
    }

    /// 是否为零（常用于判断位移）
    pub fn is_zero(&self) -> bool {
        self.p == WorldPoint::ZERO && self.z == 0.0
    }
}

impl Add for WorldPoint3D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            p: WorldPoint {
                long: self.p.long + rhs.p.long,
                lat: self.p.lat + rhs.p.lat,
            },
            z: self.z + rhs.z,
        }
    }
}

impl AddAssign for WorldPoint3D {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
