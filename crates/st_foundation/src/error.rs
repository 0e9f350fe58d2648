// crates/st_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `StError` 枚举和 `StResult` 类型别名，用于整个项目的错误处理。
//!
//! # 错误分类
//!
//! | 类别 | 处理方式 |
//! |------|----------|
//! | `AllocationFailure` | 对当前时间步致命，向驱动器传播 |
//! | `CoverageGap` | 风场在该时刻无数据，调用方就地恢复为零速度 |
//! | `IndexOutOfBounds` | 批量移动的粒子数超出子集的扰动项数 |
//! | 其他 | 构建/配置阶段的输入错误 |
//!
//! # 示例
//!
//! ```
//! use st_foundation::error::{StError, StResult};
//!
//! fn reserve_terms(n: usize) -> StResult<Vec<f32>> {
//!     let mut v = Vec::new();
//!     v.try_reserve_exact(n)
//!         .map_err(|_| StError::allocation("wind uncertainty terms", n))?;
//!     Ok(v)
//! }
//! assert!(reserve_terms(4).is_ok());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// 统一结果类型
pub type StResult<T> = Result<T, StError>;

/// SpillTrack 错误类型
#[derive(Error, Debug)]
pub enum StError {
    // ========================================================================
    // 资源错误
    // ========================================================================

    /// 内存分配失败
    #[error("内存分配失败: {what} (请求 {requested} 个元素)")]
    AllocationFailure {
        /// 分配对象描述
        what: &'static str,
        /// 请求的元素个数
        requested: usize,
    },

    // ========================================================================
    // 强迫数据错误
    // ========================================================================

    /// 请求时刻超出时间序列覆盖范围
    #[error("时间 {time} 超出数据覆盖范围 [{start}, {end}]")]
    CoverageGap {
        /// 请求时刻 [s]
        time: f64,
        /// 序列起始时刻 [s]
        start: f64,
        /// 序列结束时刻 [s]
        end: f64,
    },

    /// 时间序列为空
    #[error("时间序列为空")]
    EmptySeries,

    // ========================================================================
    // 输入/配置错误
    // ========================================================================

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidConfig {
        /// 配置键名
        key: String,
        /// 配置值
        value: String,
        /// 无效原因说明
        reason: String,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    // ========================================================================
    // IO 相关错误
    // ========================================================================

    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 序列化失败原因
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl StError {
    /// 分配失败
    pub fn allocation(what: &'static str, requested: usize) -> Self {
        Self::AllocationFailure { what, requested }
    }

    /// 覆盖缺口
    pub fn coverage_gap(time: f64, start: f64, end: f64) -> Self {
        Self::CoverageGap { time, start, end }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 配置值无效
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// 大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 从IO错误创建（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 文件读写失败
    pub fn io_path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        Self::io_with_source(format!("{}", path.display()), source)
    }

    /// 序列化错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// 是否为致命错误（需要向驱动器传播）
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AllocationFailure { .. })
    }
}
