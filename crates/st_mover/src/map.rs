// crates/st_mover/src/map.rs

//! 地图协作者接口：破碎波高与混合层深度

use serde::{Deserialize, Serialize};

/// 提供水下风致漂移所需的海况参数
pub trait MixedLayerMap {
    /// 破碎波高 [m]，0 表示未知
    fn breaking_wave_height(&self) -> f64;

    /// 混合层深度 [m]
    fn mixed_layer_depth(&self) -> f64;
}

/// 恒定海况参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantMixedLayer {
    /// 破碎波高 [m]
    pub breaking_wave_height: f64,
    /// 混合层深度 [m]
    pub mixed_layer_depth: f64,
}

impl Default for ConstantMixedLayer {
    fn default() -> Self {
        Self {
            breaking_wave_height: 1.0,
            mixed_layer_depth: 10.0,
        }
    }
}

impl ConstantMixedLayer {
    /// 创建恒定海况
    pub fn new(breaking_wave_height: f64, mixed_layer_depth: f64) -> Self {
        Self {
            breaking_wave_height,
            mixed_layer_depth,
        }
    }
}

impl MixedLayerMap for ConstantMixedLayer {
    fn breaking_wave_height(&self) -> f64 {
        self.breaking_wave_height
    }

    fn mixed_layer_depth(&self) -> f64 {
        self.mixed_layer_depth
    }
}
