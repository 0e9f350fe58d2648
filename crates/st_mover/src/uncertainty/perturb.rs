// crates/st_mover/src/uncertainty/perturb.rs

//! 将缓存的随机项施加到风速向量上
//!
//! 给定风速 w（模长 ‖w‖）和扰动项 (randCos, randSin)：
//!
//! ```text
//! s = ‖w‖² − σ²
//! s > 0 :  sqs = √s,  m = √sqs
//! s ≤ 0 :  sqs = 0,   m = 0
//! x  = randCos · √(‖w‖ − sqs) + m
//! w' = x² / max(cos Δθ, 0.001),   Δθ = randSin · σθ · π/180
//! ```
//!
//! 结果向量为原向量缩放到模长 w' 后再旋转 Δθ。
//!
//! 早期版本在 s ≤ 0 时取 m = √‖w‖，且速度项未开方（`‖w‖ − sqs`）；
//! 该公式已知有误，这里只实现修正后的公式。

use glam::DVec2;
use std::f64::consts::PI;

use super::sampler::WindUncertainTerm;
use super::updater::UncertaintyParams;

/// 模长低于该阈值时不施加扰动
pub const MIN_WIND_NORM: f64 = 1e-6;

/// 投影补偿中余弦的下限
pub const MIN_COS_THETA: f64 = 0.001;

/// 对风速向量施加不确定性扰动
pub fn add_uncertainty(
    wind: DVec2,
    term: WindUncertainTerm,
    params: &UncertaintyParams,
) -> DVec2 {
    let norm = wind.length();
    if norm < MIN_WIND_NORM {
        return wind;
    }

    let s = norm * norm - params.sigma2;
    let (sqs, m) = if s > 0.0 {
        let sqs = s.sqrt();
        (sqs, sqs.sqrt())
    } else {
        (0.0, 0.0)
    };
    // sqs 可能因舍入略大于 norm
    let speed_term = (norm - sqs).max(0.0).sqrt();

    let x = term.rand_cos as f64 * speed_term + m;
    let mut w = x * x;

    let dtheta = term.rand_sin as f64 * params.sigma_theta * PI / 180.0;
    let (sin_theta, cos_theta) = dtheta.sin_cos();

    // 补偿投影效应
    w /= cos_theta.max(MIN_COS_THETA);

    let scaled = wind * (w / norm);
    DVec2::new(
        scaled.x * cos_theta - scaled.y * sin_theta,
        scaled.y * cos_theta + scaled.x * sin_theta,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(sigma2: f64, sigma_theta: f64) -> UncertaintyParams {
        UncertaintyParams { sigma2, sigma_theta }
    }

    fn term(rand_cos: f32, rand_sin: f32) -> WindUncertainTerm {
        WindUncertainTerm { rand_cos, rand_sin }
    }

    #[test]
    fn test_tiny_wind_unchanged() {
        let wind = DVec2::new(1e-7, -2e-7);
        let out = add_uncertainty(wind, term(2.0, -1.5), &params(4.0, 30.0));
        assert_eq!(out, wind);
    }

    #[test]
    fn test_zero_terms_keep_direction() {
        // randCos = randSin = 0: x = m = ‖w‖^(1/2) 当 σ² = 0，w' = ‖w‖
        let wind = DVec2::new(3.0, 4.0);
        let out = add_uncertainty(wind, term(0.0, 0.0), &params(0.0, 10.0));
        assert!((out - wind).length() < 1e-12);
    }

    #[test]
    fn test_large_variance_branch() {
        // s ≤ 0: m = 0, speedTerm = √‖w‖, x = randCos·√‖w‖, w' = randCos²·‖w‖
        let wind = DVec2::new(0.0, 2.0);
        let out = add_uncertainty(wind, term(1.5, 0.0), &params(10.0, 0.0));
        assert!(out.x.abs() < 1e-12);
        assert!((out.y - 1.5 * 1.5 * 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_by_dtheta() {
        // σ² = 0, randCos = 0: 模长保持 ‖w‖/cos Δθ，方向旋转 Δθ
        let wind = DVec2::new(5.0, 0.0);
        let out = add_uncertainty(wind, term(0.0, 1.0), &params(0.0, 30.0));
        let dtheta = 30.0_f64.to_radians();
        let expected_norm = 5.0 / dtheta.cos();
        assert!((out.length() - expected_norm).abs() < 1e-9);
        assert!((out.y.atan2(out.x) - dtheta).abs() < 1e-9);
    }

    #[test]
    fn test_projection_clamp() {
        // Δθ = 90°: cos Δθ ≈ 0，被钳制到 0.001
        let wind = DVec2::new(1.0, 0.0);
        let out = add_uncertainty(wind, term(0.0, 1.0), &params(0.0, 90.0));
        assert!((out.length() - 1.0 / MIN_COS_THETA).abs() < 1e-6);
        assert!(out.length().is_finite());
    }
}
