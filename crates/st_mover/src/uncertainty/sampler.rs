// crates/st_mover/src/uncertainty/sampler.rs

//! 相关正态随机对抽样（Box–Muller + 拒绝抽样）

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 单个粒子缓存的一对随机扰动项
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindUncertainTerm {
    /// 风速扰动项
    pub rand_cos: f32,
    /// 风向扰动项
    pub rand_sin: f32,
}

/// 拒绝抽样的最大抽取次数，第 `MAX_DRAWS` 次无条件接受
pub const MAX_DRAWS: usize = 10;

/// Box–Muller 变换生成一对标准正态变量
pub fn box_muller<R: Rng + ?Sized>(rng: &mut R) -> WindUncertainTerm {
    let cos_arg = 2.0 * PI * rng.gen_range(0.0..1.0);
    let r = (-2.0 * f64::ln(rng.gen_range(0.001..0.999))).sqrt();

    WindUncertainTerm {
        rand_cos: (r * cos_arg.cos()) as f32,
        rand_sin: (r * cos_arg.sin()) as f32,
    }
}

/// 风向扰动是否在允许范围内：`|σθ·randSin| ≤ maxAngle`
#[inline]
pub fn within_max_angle(term: &WindUncertainTerm, sigma_theta: f64, max_angle: f64) -> bool {
    (sigma_theta * term.rand_sin as f64).abs() <= max_angle
}

/// 抽取一个满足风向约束的扰动项
///
/// 最多抽取 [`MAX_DRAWS`] 次；全部被拒绝时接受最后一次抽取。
pub fn draw_term<R: Rng + ?Sized>(
    rng: &mut R,
    sigma_theta: f64,
    max_angle: f64,
) -> WindUncertainTerm {
    let mut term = box_muller(rng);
    for _ in 1..MAX_DRAWS {
        if within_max_angle(&term, sigma_theta, max_angle) {
            break;
        }
        term = box_muller(rng);
    }
    term
}
