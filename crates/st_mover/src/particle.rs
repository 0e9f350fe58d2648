// crates/st_mover/src/particle.rs

//! 拉格朗日粒子（LE）类型
//!
//! 粒子集合由外部容器持有，本模块只定义风漂移器读取的字段和
//! 子集划分接口：
//! - [`LeRecord`]: 单个粒子的位置、风压系数和分散状态
//! - [`LeSets`]: 子集序列，每个子集报告其不确定性粒子数

use serde::{Deserialize, Serialize};
use st_foundation::WorldPoint3D;

/// 分散状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispersionStatus {
    /// 未分散（水面浮油）
    #[default]
    NotDispersed,
    /// 已被化学分散
    HaveDispersed,
    /// 已自然分散
    HaveDispersedNatural,
}

impl DispersionStatus {
    /// 是否已分散到水下
    pub fn is_dispersed(&self) -> bool {
        matches!(self, Self::HaveDispersed | Self::HaveDispersedNatural)
    }
}

/// 集合成员类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeKind {
    /// 确定性预报粒子
    Forecast,
    /// 不确定性集合粒子
    Uncertainty,
}

/// 单个粒子记录
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeRecord {
    /// 位置（定点经纬度 + 深度）
    pub position: WorldPoint3D,
    /// 风压系数（风速传递到漂移速度的比例）
    pub windage: f64,
    /// 分散状态
    #[serde(default)]
    pub dispersion: DispersionStatus,
}

impl LeRecord {
    /// 创建水面粒子
    pub fn surface(position: WorldPoint3D, windage: f64) -> Self {
        Self {
            position,
            windage,
            dispersion: DispersionStatus::NotDispersed,
        }
    }

    /// 设置分散状态
    pub fn with_dispersion(mut self, dispersion: DispersionStatus) -> Self {
        self.dispersion = dispersion;
        self
    }

    /// 是否处于水下或已分散
    pub fn is_subsurface(&self) -> bool {
        self.position.z > 0.0 || self.dispersion.is_dispersed()
    }
}

/// 粒子子集序列
///
/// 预报子集报告 0 个不确定性粒子。
pub trait LeSets {
    /// 子集数量
    fn set_count(&self) -> usize;

    /// 第 `index` 个子集的不确定性粒子数
    fn uncertain_count(&self, index: usize) -> usize;
}

/// 以计数数组表示的子集序列
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeSetSizes(pub Vec<usize>);

impl LeSetSizes {
    /// 由各子集的不确定性粒子数创建
    pub fn new(counts: Vec<usize>) -> Self {
        Self(counts)
    }
}

impl LeSets for LeSetSizes {
    fn set_count(&self) -> usize {
        self.0.len()
    }

    fn uncertain_count(&self, index: usize) -> usize {
        self.0.get(index).copied().unwrap_or(0)
    }
}

impl LeSets for [usize] {
    fn set_count(&self) -> usize {
        self.len()
    }

    fn uncertain_count(&self, index: usize) -> usize {
        self.get(index).copied().unwrap_or(0)
    }
}
