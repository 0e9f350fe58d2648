// crates/st_mover/src/uncertainty/store.rs

//! 不确定性扰动项存储
//!
//! 持有每个不确定性粒子的缓存随机项，以及各子集在扁平数组中的起始偏移。
//!
//! # 生命周期
//!
//! ```text
//! Empty ──allocate──> Allocated ──resample──> Valid
//!   ^                    ^                      │
//!   └──── dispose ───────┴──── reinit/resample ─┘ (Stale)
//! ```
//!
//! 不变量：`terms.len()` 等于各子集不确定性粒子数之和。

use rand::Rng;
use st_foundation::{Seconds, StError, StResult};

use super::sampler::{draw_term, WindUncertainTerm};
use crate::particle::LeSets;

/// 存储状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// 未分配
    Empty,
    /// 已分配但尚未抽样
    Allocated,
    /// 已分配且已抽样
    Valid,
}

/// 相对当前步的陈旧程度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// 缓存仍然有效
    Fresh,
    /// 结构不变，但持续时间已到，需要重新抽样
    Resample,
    /// 需要重新分配并抽样
    Reinit,
}

/// 风不确定性扰动项存储
#[derive(Debug, Clone, Default)]
pub struct UncertaintyStore {
    /// 扁平化扰动项数组
    terms: Vec<WindUncertainTerm>,
    /// 每个子集的起始偏移（累积计数）
    set_offsets: Vec<usize>,
    /// 是否已分配
    allocated: bool,
    /// 上次抽样时的经过时间 [s]
    computed_at: Option<Seconds>,
}

impl UncertaintyStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前状态
    pub fn state(&self) -> StoreState {
        match (self.allocated, self.computed_at) {
            (false, _) => StoreState::Empty,
            (true, None) => StoreState::Allocated,
            (true, Some(_)) => StoreState::Valid,
        }
    }

    /// 是否已分配
    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    /// 扰动项数量
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// 子集偏移表
    pub fn set_offsets(&self) -> &[usize] {
        &self.set_offsets
    }

    /// 全部扰动项
    pub fn terms(&self) -> &[WindUncertainTerm] {
        &self.terms
    }

    /// 上次抽样时刻（经过时间）
    pub fn computed_at(&self) -> Option<Seconds> {
        self.computed_at
    }

    /// 释放所有扰动项
    pub fn dispose(&mut self) {
        self.terms = Vec::new();
        self.set_offsets = Vec::new();
        self.allocated = false;
        self.computed_at = None;
    }

    /// 按当前子集结构重新分配
    ///
    /// 分配失败时存储被完全释放，并返回 [`StError::AllocationFailure`]。
    pub fn allocate<S: LeSets + ?Sized>(&mut self, sets: &S) -> StResult<()> {
        self.dispose();

        match Self::build(sets) {
            Ok((set_offsets, terms)) => {
                self.set_offsets = set_offsets;
                self.terms = terms;
                self.allocated = true;
                Ok(())
            }
            Err(err) => {
                log::warn!("风不确定性存储分配失败: {}", err);
                Err(err)
            }
        }
    }

    fn build<S: LeSets + ?Sized>(sets: &S) -> StResult<(Vec<usize>, Vec<WindUncertainTerm>)> {
        let n = sets.set_count();

        let mut set_offsets = Vec::new();
        set_offsets
            .try_reserve_exact(n)
            .map_err(|_| StError::allocation("LE set offsets", n))?;

        let mut total: usize = 0;
        for i in 0..n {
            set_offsets.push(total);
            total = total
                .checked_add(sets.uncertain_count(i))
                .ok_or_else(|| StError::allocation("wind uncertainty terms", usize::MAX))?;
        }

        let mut terms = Vec::new();
        terms
            .try_reserve_exact(total)
            .map_err(|_| StError::allocation("wind uncertainty terms", total))?;
        terms.resize(total, WindUncertainTerm::default());

        Ok((set_offsets, terms))
    }

    /// 子集结构是否与已分配的结构一致
    pub fn matches_sets<S: LeSets + ?Sized>(&self, sets: &S) -> bool {
        let n = sets.set_count();
        if n != self.set_offsets.len() {
            return false;
        }
        let mut total = 0usize;
        for i in 0..n {
            if self.set_offsets[i] != total {
                return false;
            }
            total = total.saturating_add(sets.uncertain_count(i));
        }
        total == self.terms.len()
    }

    /// 判断缓存相对当前步的陈旧程度
    pub fn staleness<S: LeSets + ?Sized>(
        &self,
        sets: &S,
        elapsed: Seconds,
        duration: Seconds,
    ) -> Staleness {
        let Some(computed_at) = self.computed_at else {
            return Staleness::Reinit;
        };
        if !self.allocated || elapsed < computed_at || !self.matches_sets(sets) {
            return Staleness::Reinit;
        }
        if elapsed >= computed_at + duration {
            return Staleness::Resample;
        }
        Staleness::Fresh
    }

    /// 为所有扰动项重新抽样
    pub fn resample<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        sigma_theta: f64,
        max_angle: f64,
        elapsed: Seconds,
    ) {
        self.computed_at = Some(elapsed);
        for term in &mut self.terms {
            *term = draw_term(rng, sigma_theta, max_angle);
        }
    }

    /// 第 `set_index` 个子集在存储中的扰动项数量
    pub fn set_len(&self, set_index: usize) -> Option<usize> {
        let start = *self.set_offsets.get(set_index)?;
        let end = self
            .set_offsets
            .get(set_index + 1)
            .copied()
            .unwrap_or(self.terms.len());
        Some(end - start)
    }

    /// 获取 (子集, 子集内序号) 对应的扰动项
    ///
    /// 序号超出该子集的粒子数时返回 `None`，不会读到相邻子集的项。
    pub fn term(&self, set_index: usize, le_index: usize) -> Option<WindUncertainTerm> {
        if le_index >= self.set_len(set_index)? {
            return None;
        }
        self.terms.get(self.set_offsets[set_index] + le_index).copied()
    }
}
