// crates/st_mover/src/config.rs

//! WindMoverConfig - 风漂移器配置
//!
//! 定义风漂移器的全部可调参数，使用 f64 存储以便 JSON 序列化。
//! 缺省值与经典溢油模型的风漂移器一致。

use serde::{Deserialize, Serialize};
use st_foundation::{Seconds, StError, StResult};
use std::path::Path;

/// 风漂移器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindMoverConfig {
    /// 不确定性开始时刻（相对模拟起始）[s]
    #[serde(default)]
    pub uncertain_start_time: Seconds,

    /// 随机扰动的持续时间 [s]，超过后重新抽样
    #[serde(default = "default_persistence_duration")]
    pub persistence_duration: Seconds,

    /// 风速不确定性缩放
    #[serde(default = "default_speed_scale")]
    pub speed_scale: f64,

    /// 风向不确定性缩放
    #[serde(default = "default_angle_scale")]
    pub angle_scale: f64,

    /// 最大风速 [m/s]
    ///
    /// 目前不参与抽样接受判据，仅随配置保存。
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,

    /// 最大风向扰动 [度]
    #[serde(default = "default_max_angle")]
    pub max_angle: f64,

    /// 破碎波层厚度系数
    #[serde(default = "default_gamma")]
    pub gamma: f64,

    /// 是否对水下（分散）油粒子施加风致漂移
    #[serde(default)]
    pub subsurface_active: bool,

    /// 风场查询时间偏移 [s]
    #[serde(default)]
    pub time_offset: Seconds,

    /// 随机数种子（None 表示使用系统熵）
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_persistence_duration() -> Seconds { 3.0 * 3600.0 }
fn default_speed_scale() -> f64 { 2.0 }
fn default_angle_scale() -> f64 { 0.4 }
fn default_max_speed() -> f64 { 30.0 }
fn default_max_angle() -> f64 { 60.0 }
fn default_gamma() -> f64 { 1.0 }

impl Default for WindMoverConfig {
    fn default() -> Self {
        Self {
            uncertain_start_time: 0.0,
            persistence_duration: default_persistence_duration(),
            speed_scale: default_speed_scale(),
            angle_scale: default_angle_scale(),
            max_speed: default_max_speed(),
            max_angle: default_max_angle(),
            gamma: default_gamma(),
            subsurface_active: false,
            time_offset: 0.0,
            rng_seed: None,
        }
    }
}

impl WindMoverConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> StResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| StError::io_path(path, e))?;

        let config: WindMoverConfig = serde_json::from_str(&content)
            .map_err(|e| StError::serialization(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> StResult<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| StError::serialization(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| StError::io_path(path, e))?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> StResult<()> {
        let non_negative = [
            ("uncertain_start_time", self.uncertain_start_time),
            ("persistence_duration", self.persistence_duration),
            ("speed_scale", self.speed_scale),
            ("angle_scale", self.angle_scale),
            ("max_speed", self.max_speed),
            ("max_angle", self.max_angle),
            ("gamma", self.gamma),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(StError::invalid_config(key, value, "必须为非负有限值"));
            }
        }

        if !self.time_offset.is_finite() {
            return Err(StError::invalid_config(
                "time_offset",
                self.time_offset,
                "必须为有限值",
            ));
        }

        Ok(())
    }

    /// 设置不确定性开始时刻
    pub fn with_uncertain_start_time(mut self, t: Seconds) -> Self {
        self.uncertain_start_time = t;
        self
    }

    /// 设置持续时间
    pub fn with_persistence_duration(mut self, d: Seconds) -> Self {
        self.persistence_duration = d;
        self
    }

    /// 设置水下漂移开关
    pub fn with_subsurface_active(mut self, active: bool) -> Self {
        self.subsurface_active = active;
        self
    }

    /// 设置随机数种子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}
