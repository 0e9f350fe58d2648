// crates/st_mover/src/uncertainty/updater.rs

//! 每步不确定性更新
//!
//! 每个时间步开始时调用一次：
//! 1. 不确定性关闭或尚未到达开始时刻时释放存储；
//! 2. 重新计算风速方差 σ² 与风向展宽 σθ（时间的闭式增长函数）；
//! 3. 按生命周期规则决定重新分配或重新抽样。

use rand::Rng;
use serde::{Deserialize, Serialize};
use st_foundation::{Seconds, StResult};

use super::store::{Staleness, UncertaintyStore};
use crate::config::WindMoverConfig;
use crate::particle::LeSets;

/// 步内不变的不确定性展宽参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyParams {
    /// 风速方差 σ² [m²/s²]
    pub sigma2: f64,
    /// 风向展宽 σθ [度]
    pub sigma_theta: f64,
}

impl UncertaintyParams {
    /// 由配置和经过时间计算展宽参数
    ///
    /// ```text
    /// σ² = (speedScale · 0.315 · Δt^0.147)² / 2
    /// σθ = angleScale · 2.73 · Δt^(1/4)
    /// ```
    /// 其中 Δt = elapsed − uncertainStartTime。
    pub fn at(config: &WindMoverConfig, elapsed: Seconds) -> Self {
        let dt = elapsed - config.uncertain_start_time;
        let sigma = config.speed_scale * 0.315 * dt.powf(0.147);
        Self {
            sigma2: sigma * sigma / 2.0,
            sigma_theta: config.angle_scale * 2.73 * dt.sqrt().sqrt(),
        }
    }
}

/// 单步更新的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// 本步不施加不确定性，存储已释放
    Disabled,
    /// 重新分配并抽样
    Reinitialized,
    /// 结构不变，重新抽样
    Resampled,
    /// 沿用缓存的扰动项
    Unchanged,
}

/// 执行一次不确定性更新
///
/// 返回本步的展宽参数（不施加不确定性时为 `None`）和更新结果。
/// 只有存储分配失败会返回错误。
pub fn update_uncertainty<S, R>(
    store: &mut UncertaintyStore,
    rng: &mut R,
    config: &WindMoverConfig,
    sets: &S,
    elapsed: Seconds,
    enabled: bool,
) -> StResult<(Option<UncertaintyParams>, UpdateOutcome)>
where
    S: LeSets + ?Sized,
    R: Rng + ?Sized,
{
    // elapsed 是步起始时刻的值，因此用 >=
    if !enabled || elapsed < config.uncertain_start_time {
        if store.is_allocated() {
            store.dispose();
        }
        return Ok((None, UpdateOutcome::Disabled));
    }

    let params = UncertaintyParams::at(config, elapsed);

    let outcome = match store.staleness(sets, elapsed, config.persistence_duration) {
        Staleness::Reinit => {
            store.allocate(sets)?;
            store.resample(rng, params.sigma_theta, config.max_angle, elapsed);
            log::debug!(
                "风不确定性重新分配: {} 个扰动项, elapsed={}s",
                store.len(),
                elapsed
            );
            UpdateOutcome::Reinitialized
        }
        Staleness::Resample => {
            store.resample(rng, params.sigma_theta, config.max_angle, elapsed);
            log::debug!(
                "风不确定性重新抽样: {} 个扰动项, elapsed={}s",
                store.len(),
                elapsed
            );
            UpdateOutcome::Resampled
        }
        Staleness::Fresh => UpdateOutcome::Unchanged,
    };

    Ok((Some(params), outcome))
}
