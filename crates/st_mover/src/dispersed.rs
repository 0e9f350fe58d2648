// crates/st_mover/src/dispersed.rs

//! 分散油的水下风致漂移
//!
//! 分散到水下的油粒子不使用水面风压系数，而是按深度衰减：
//!
//! ```text
//! f = 2/3                                         z ≤ γ·1.5H
//! f = 2/3 · (1 − ln(z/1.5H) / ln(D/1.5H))         1.5H < z ≤ D
//! f = 0                                           z > D
//! ```
//!
//! 有效速度模长为 `‖wind‖ · 0.03 · f`，方向与风向相同。
//!
//! D < 1.5H 时对数分母为负，公式仍给出有限值，照常使用。
//! 只有 D = 1.5H 时分母为零，此时取表层因子 2/3；
//! 这种情况由 [`is_degenerate_mixed_layer`] 判断，漂移器每步提示一次。

use glam::DVec2;

use crate::map::MixedLayerMap;

/// 水下漂移的基础风速比例
pub const DISPERSED_WINDAGE: f64 = 0.03;

/// 表层衰减因子
const SURFACE_FACTOR: f64 = 2.0 / 3.0;

/// 深度衰减因子
///
/// - `z`: 粒子深度 [m]
/// - `gamma`: 破碎波层厚度系数
/// - `breaking_wave_height`: 破碎波高 H [m]，0 视为 1
/// - `mixed_layer_depth`: 混合层深度 D [m]
pub fn depth_factor(z: f64, gamma: f64, breaking_wave_height: f64, mixed_layer_depth: f64) -> f64 {
    let h = effective_wave_height(breaking_wave_height);
    let wave_layer = h * 1.5;

    // 注意：gamma = 0 并不会关闭表层效应，只有关闭 subsurface_active 才会
    if z <= gamma * h * 1.5 {
        return SURFACE_FACTOR;
    }
    if z > mixed_layer_depth {
        return 0.0;
    }

    let denom = (mixed_layer_depth / wave_layer).ln();
    if denom == 0.0 {
        return SURFACE_FACTOR;
    }

    2.0 * (1.0 - (z / wave_layer).ln() / denom) / 3.0
}

fn effective_wave_height(breaking_wave_height: f64) -> f64 {
    if breaking_wave_height == 0.0 {
        1.0
    } else {
        breaking_wave_height
    }
}

/// 混合层深度是否恰好等于破碎波层厚度 1.5H（对数分母为零）
pub fn is_degenerate_mixed_layer(breaking_wave_height: f64, mixed_layer_depth: f64) -> bool {
    let wave_layer = effective_wave_height(breaking_wave_height) * 1.5;
    (mixed_layer_depth / wave_layer).ln() == 0.0
}

/// 计算分散油粒子的有效漂移速度
///
/// 风向以正北为零度（`atan2(u, v)`），结果替代原始风速，而非在其上扰动。
pub fn dispersed_velocity(wind: DVec2, factor: f64) -> DVec2 {
    let angle = wind.x.atan2(wind.y);
    let magnitude = wind.length() * DISPERSED_WINDAGE * factor;
    DVec2::new(magnitude * angle.sin(), magnitude * angle.cos())
}

/// 由地图参数计算分散油粒子在深度 `z` 的漂移速度
pub fn dispersed_windage<M: MixedLayerMap + ?Sized>(
    wind: DVec2,
    z: f64,
    gamma: f64,
    map: &M,
) -> DVec2 {
    let f = depth_factor(z, gamma, map.breaking_wave_height(), map.mixed_layer_depth());
    dispersed_velocity(wind, f)
}
