// crates/st_forcing/src/timeseries.rs

//! 时间序列数据结构和插值
//!
//! 提供风场时间序列的表示和插值功能，支持：
//! - 线性插值
//! - 多种外推模式（截断、线性、循环、拒绝）
//! - 覆盖范围检查
//!
//! # 使用示例
//!
//! ```
//! use st_forcing::timeseries::{TimeSeries, ExtrapolationMode};
//!
//! let series = TimeSeries::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.5])
//!     .unwrap()
//!     .with_extrapolation(ExtrapolationMode::Cyclic);
//!
//! assert!((series.value_at(0.5).unwrap() - 0.5).abs() < 1e-12);
//! // 循环外推 t=3.0 -> t=1.0
//! assert!((series.value_at(3.0).unwrap() - 1.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use st_foundation::{Seconds, StError, StResult};

/// 外推模式
///
/// 定义当查询时间超出数据范围时的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrapolationMode {
    /// 截断模式：超出范围时返回边界值
    #[default]
    Clamp,

    /// 线性外推：使用首/末两个点的斜率延伸
    Linear,

    /// 循环模式：t -> t_start + (t - t_start) mod (t_end - t_start)
    Cyclic,

    /// 拒绝模式：超出范围返回 [`StError::CoverageGap`]
    Reject,
}

/// 查询时刻相对数据的覆盖情况
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// 值与时间无关（恒定数据）
    Constant,
    /// 时刻位于数据范围内
    Covered,
    /// 时刻超出范围，但外推模式允许给出值
    Extrapolated,
}

/// 时间序列数据
///
/// # 约束
///
/// - 时间数组严格单调递增
/// - 时间和值数组长度相等且非空
///
/// 反序列化经过 [`TimeSeries::new`] 校验。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TimeSeriesData")]
pub struct TimeSeries {
    /// 时间点 [s]
    times: Vec<Seconds>,
    /// 对应的值
    values: Vec<f64>,
    /// 外推模式
    extrap_mode: ExtrapolationMode,
}

impl TimeSeries {
    /// 从时间和值数组创建时间序列
    ///
    /// 长度不一致、为空或时间非严格递增时返回错误。
    pub fn new(times: Vec<Seconds>, values: Vec<f64>) -> StResult<Self> {
        if times.len() != values.len() {
            return Err(StError::size_mismatch("time series values", times.len(), values.len()));
        }
        if times.is_empty() {
            return Err(StError::EmptySeries);
        }
        if let Some(i) = (1..times.len()).find(|&i| times[i] <= times[i - 1]) {
            return Err(StError::invalid_input(format!(
                "时间必须严格递增: times[{}]={} <= times[{}]={}",
                i,
                times[i],
                i - 1,
                times[i - 1]
            )));
        }

        Ok(Self {
            times,
            values,
            extrap_mode: ExtrapolationMode::Clamp,
        })
    }

    /// 设置外推模式
    pub fn with_extrapolation(mut self, mode: ExtrapolationMode) -> Self {
        self.extrap_mode = mode;
        self
    }

    /// 获取外推模式
    pub fn extrapolation_mode(&self) -> ExtrapolationMode {
        self.extrap_mode
    }

    /// 获取时间范围
    pub fn time_range(&self) -> (Seconds, Seconds) {
        (self.times[0], self.times[self.times.len() - 1])
    }

    /// 获取数据点数量
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// 获取时间点数组引用
    pub fn times(&self) -> &[Seconds] {
        &self.times
    }

    /// 获取值数组引用
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// 检查时刻 `t` 的覆盖情况
    pub fn coverage(&self, t: Seconds) -> StResult<Coverage> {
        let (t_start, t_end) = self.time_range();
        if self.times.len() == 1 {
            return Ok(Coverage::Constant);
        }
        if t >= t_start && t <= t_end {
            return Ok(Coverage::Covered);
        }
        match self.extrap_mode {
            ExtrapolationMode::Reject => Err(StError::coverage_gap(t, t_start, t_end)),
            _ => Ok(Coverage::Extrapolated),
        }
    }

    /// 获取指定时间的插值
    ///
    /// 超出数据范围时按外推模式处理；`Reject` 模式返回覆盖缺口错误。
    /// 单点序列对任意时刻返回该点的值。
    pub fn value_at(&self, t: Seconds) -> StResult<f64> {
        let n = self.times.len();
        if n == 1 {
            return Ok(self.values[0]);
        }
        let (t_start, t_end) = self.time_range();

        if t < t_start || t > t_end {
            return self.extrapolate(t, t_start, t_end);
        }

        Ok(self.interpolate_internal(t))
    }

    fn extrapolate(&self, t: Seconds, t_start: Seconds, t_end: Seconds) -> StResult<f64> {
        let n = self.times.len();

        let v = match self.extrap_mode {
            ExtrapolationMode::Clamp => {
                if t < t_start {
                    self.values[0]
                } else {
                    self.values[n - 1]
                }
            }
            ExtrapolationMode::Cyclic => {
                let duration = t_end - t_start;
                let offset = (t - t_start).rem_euclid(duration);
                self.interpolate_internal(t_start + offset)
            }
            ExtrapolationMode::Linear => {
                if t < t_start {
                    let slope = (self.values[1] - self.values[0]) / (self.times[1] - t_start);
                    self.values[0] + slope * (t - t_start)
                } else {
                    let slope =
                        (self.values[n - 1] - self.values[n - 2]) / (t_end - self.times[n - 2]);
                    self.values[n - 1] + slope * (t - t_end)
                }
            }
            ExtrapolationMode::Reject => return Err(StError::coverage_gap(t, t_start, t_end)),
        };
        Ok(v)
    }

    /// 内部插值（假设 t 在范围内）
    fn interpolate_internal(&self, t: Seconds) -> f64 {
        let n = self.times.len();

        // times[idx] <= t < times[idx + 1]
        let idx = self.times.partition_point(|&ti| ti <= t).saturating_sub(1);
        if idx >= n - 1 {
            return self.values[n - 1];
        }

        let t0 = self.times[idx];
        let t1 = self.times[idx + 1];
        let v0 = self.values[idx];
        let v1 = self.values[idx + 1];

        v0 + (t - t0) / (t1 - t0) * (v1 - v0)
    }
}

/// 反序列化的原始形式
#[derive(Deserialize)]
struct TimeSeriesData {
    times: Vec<Seconds>,
    values: Vec<f64>,
    #[serde(default)]
    extrap_mode: ExtrapolationMode,
}

impl TryFrom<TimeSeriesData> for TimeSeries {
    type Error = StError;

    fn try_from(data: TimeSeriesData) -> StResult<Self> {
        Ok(Self::new(data.times, data.values)?.with_extrapolation(data.extrap_mode))
    }
}

/// 向量时间序列（2D）
///
/// 存储时间-向量对，用于风速等矢量数据。两个分量共享时间轴。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "VectorTimeSeriesData")]
pub struct VectorTimeSeries {
    /// U 分量（东向）
    u_series: TimeSeries,
    /// V 分量（北向）
    v_series: TimeSeries,
}

impl VectorTimeSeries {
    /// 从分量时间序列创建
    pub fn new(u_series: TimeSeries, v_series: TimeSeries) -> StResult<Self> {
        if u_series.times() != v_series.times() {
            return Err(StError::invalid_input("U 和 V 分量的时间点必须一致"));
        }
        Ok(Self { u_series, v_series })
    }

    /// 从时间和分量数组创建
    pub fn from_components(times: Vec<Seconds>, u: Vec<f64>, v: Vec<f64>) -> StResult<Self> {
        let u_series = TimeSeries::new(times.clone(), u)?;
        let v_series = TimeSeries::new(times, v)?;
        Ok(Self { u_series, v_series })
    }

    /// 设置外推模式
    pub fn with_extrapolation(mut self, mode: ExtrapolationMode) -> Self {
        self.u_series = self.u_series.with_extrapolation(mode);
        self.v_series = self.v_series.with_extrapolation(mode);
        self
    }

    /// 外推模式
    pub fn extrapolation_mode(&self) -> ExtrapolationMode {
        self.u_series.extrapolation_mode()
    }

    /// 时间范围
    pub fn time_range(&self) -> (Seconds, Seconds) {
        self.u_series.time_range()
    }

    /// 数据点数量
    pub fn len(&self) -> usize {
        self.u_series.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.u_series.is_empty()
    }

    /// 检查覆盖情况
    pub fn coverage(&self, t: Seconds) -> StResult<Coverage> {
        self.u_series.coverage(t)
    }

    /// 获取指定时间的向量值 (u, v)
    pub fn value_at(&self, t: Seconds) -> StResult<(f64, f64)> {
        Ok((self.u_series.value_at(t)?, self.v_series.value_at(t)?))
    }
}

#[derive(Deserialize)]
struct VectorTimeSeriesData {
    u_series: TimeSeries,
    v_series: TimeSeries,
}

impl TryFrom<VectorTimeSeriesData> for VectorTimeSeries {
    type Error = StError;

    fn try_from(data: VectorTimeSeriesData) -> StResult<Self> {
        Self::new(data.u_series, data.v_series)
    }
}
