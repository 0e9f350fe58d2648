// crates/st_mover/src/mover.rs

//! 风漂移器
//!
//! 驱动器每步的调用顺序：
//!
//! ```text
//! prepare_for_step(..)          // 更新 σ²/σθ，必要时重新分配/抽样
//!   └─> displacement(..) × N    // 逐粒子，只读共享状态
//! ```
//!
//! `prepare_for_step` 必须在本步任何 `displacement` 调用之前完成。
//! 由于后者只借用 `&self`，借用检查器保证同一窗口内不会发生存储重分配。

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::sync::Arc;

use st_forcing::{Coverage, VelocityProvider, WindField, WindMode};
use st_foundation::{Seconds, StError, StResult, WorldPoint3D};

use crate::config::WindMoverConfig;
use crate::dispersed::is_degenerate_mixed_layer;
use crate::engine::WindStep;
use crate::map::{ConstantMixedLayer, MixedLayerMap};
use crate::particle::{LeKind, LeRecord, LeSets};
use crate::uncertainty::{update_uncertainty, UncertaintyParams, UncertaintyStore, UpdateOutcome};

/// 风漂移器
pub struct WindMover {
    /// 可调参数
    config: WindMoverConfig,
    /// 风场
    wind: WindField,
    /// 海况参数（破碎波高、混合层深度）
    map: Arc<dyn MixedLayerMap + Send + Sync>,
    /// 扰动项存储
    store: UncertaintyStore,
    /// 本步的展宽参数
    params: Option<UncertaintyParams>,
    /// 随机数发生器
    rng: ChaCha8Rng,
}

impl std::fmt::Debug for WindMover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindMover")
            .field("config", &self.config)
            .field("wind_mode", &self.wind.mode())
            .field("store_state", &self.store.state())
            .field("params", &self.params)
            .finish()
    }
}

fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed.unwrap_or_else(rand::random::<u64>))
}

impl WindMover {
    /// 创建风漂移器
    ///
    /// 配置无效时返回错误。
    pub fn new(config: WindMoverConfig, wind: WindField) -> StResult<Self> {
        config.validate()?;
        let rng = make_rng(config.rng_seed);
        Ok(Self {
            config,
            wind,
            map: Arc::new(ConstantMixedLayer::default()),
            store: UncertaintyStore::new(),
            params: None,
            rng,
        })
    }

    /// 设置海况参数提供者
    pub fn with_map(mut self, map: Arc<dyn MixedLayerMap + Send + Sync>) -> Self {
        self.map = map;
        self
    }

    /// 当前配置
    pub fn config(&self) -> &WindMoverConfig {
        &self.config
    }

    /// 替换配置
    ///
    /// 种子变化时重新初始化随机数发生器。
    pub fn set_config(&mut self, config: WindMoverConfig) -> StResult<()> {
        config.validate()?;
        if config.rng_seed != self.config.rng_seed {
            self.rng = make_rng(config.rng_seed);
        }
        self.config = config;
        Ok(())
    }

    /// 风场
    pub fn wind(&self) -> &WindField {
        &self.wind
    }

    /// 风场模式
    pub fn wind_mode(&self) -> WindMode {
        self.wind.mode()
    }

    /// 替换风场
    pub fn set_wind(&mut self, wind: WindField) {
        self.wind = wind;
    }

    /// 清除风场数据（恒定值归零并丢弃时间序列）
    pub fn clear_wind_values(&mut self) {
        self.wind = WindField::calm();
    }

    /// 检查指定时刻风场是否有数据
    ///
    /// 直接以 `time` 查询，不加 `time_offset`；位移计算时的风场查询才会平移。
    pub fn check_start_time(&self, time: Seconds) -> StResult<Coverage> {
        self.wind.check_coverage(time)
    }

    /// 扰动项存储（只读）
    pub fn uncertainty_store(&self) -> &UncertaintyStore {
        &self.store
    }

    /// 本步的展宽参数；运行开始后的首次步准备之前为 `None`
    pub fn uncertainty_params(&self) -> Option<UncertaintyParams> {
        self.params
    }

    /// 释放扰动项
    pub fn dispose_uncertainty(&mut self) {
        self.store.dispose();
        self.params = None;
    }

    /// 运行开始前调用
    pub fn prepare_for_run(&mut self) {
        self.dispose_uncertainty();
    }

    /// 每步开始前调用
    ///
    /// # 参数
    /// - `model_time`: 当前模拟时刻 [s]
    /// - `start_time`: 运行起始时刻 [s]
    /// - `time_step`: 步长 [s]
    /// - `uncertain`: 驱动器是否开启不确定性
    /// - `sets`: 当前粒子子集结构
    ///
    /// 仅在扰动项存储分配失败时返回错误。
    pub fn prepare_for_step<S: LeSets + ?Sized>(
        &mut self,
        model_time: Seconds,
        start_time: Seconds,
        time_step: Seconds,
        uncertain: bool,
        sets: &S,
    ) -> StResult<UpdateOutcome> {
        let elapsed = model_time - start_time;
        let result = update_uncertainty(
            &mut self.store,
            &mut self.rng,
            &self.config,
            sets,
            elapsed,
            uncertain,
        );

        match result {
            Ok((params, outcome)) => {
                self.params = params;
                self.warn_degenerate_mixed_layer();
                log::trace!(
                    "风漂移器步准备: t={}s, dt={}s, {:?}",
                    model_time,
                    time_step,
                    outcome
                );
                Ok(outcome)
            }
            Err(err) => {
                self.params = None;
                if err.is_fatal() {
                    log::error!("风漂移器步准备失败: {}", err);
                } else {
                    log::warn!("风漂移器步准备失败: {}", err);
                }
                Err(err)
            }
        }
    }

    /// 混合层不深于破碎波层时每步提示一次
    fn warn_degenerate_mixed_layer(&self) {
        if !self.config.subsurface_active {
            return;
        }
        let h = self.map.breaking_wave_height();
        let d = self.map.mixed_layer_depth();
        if is_degenerate_mixed_layer(h, d) {
            log::warn!(
                "混合层深度 {} m 等于破碎波层厚度（H={} m），分散油使用表层因子",
                d,
                h
            );
        }
    }

    /// 本步的只读快照
    pub fn step(&self) -> WindStep<'_> {
        WindStep {
            wind: &self.wind,
            config: &self.config,
            params: self.params,
            store: &self.store,
            map: self.map.as_ref(),
        }
    }

    /// 计算单个粒子一个时间步的位移
    pub fn displacement(
        &self,
        model_time: Seconds,
        time_step: Seconds,
        set_index: usize,
        le_index: usize,
        le: &LeRecord,
        kind: LeKind,
    ) -> WorldPoint3D {
        self.step()
            .displacement(model_time, time_step, set_index, le_index, le, kind)
    }

    /// 批量移动一个子集的粒子
    ///
    /// 子集内序号即切片下标。位移并行计算并直接累加到粒子位置上，
    /// 返回实际移动的粒子数。
    ///
    /// 不确定性生效时，切片长度超过该子集的扰动项数返回
    /// [`StError::IndexOutOfBounds`]，此时不移动任何粒子。
    pub fn move_particles(
        &self,
        model_time: Seconds,
        time_step: Seconds,
        set_index: usize,
        records: &mut [LeRecord],
        kind: LeKind,
    ) -> StResult<usize> {
        if kind == LeKind::Uncertainty && self.params.is_some() {
            let available = self.store.set_len(set_index).ok_or_else(|| {
                StError::index_out_of_bounds(
                    "LE set",
                    set_index,
                    self.store.set_offsets().len(),
                )
            })?;
            if records.len() > available {
                return Err(StError::index_out_of_bounds(
                    "uncertainty LE",
                    records.len() - 1,
                    available,
                ));
            }
        }

        let step = self.step();
        let moved: usize = records
            .par_iter_mut()
            .enumerate()
            .map(|(i, le)| {
                let delta = step.displacement(model_time, time_step, set_index, i, le, kind);
                if delta.is_zero() {
                    0
                } else {
                    le.position += delta;
                    1
                }
            })
            .sum();
        Ok(moved)
    }
}
