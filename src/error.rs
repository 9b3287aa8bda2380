//! # 错误类型
//!
//! 隐写核心只有两种失败方式，都在写入任何数据之前被检测出来。

use thiserror::Error;

/// 编码过程中可能出现的错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StegoError {
    /// `period` 为 0，或 `offset` 不在 `[0, period)` 范围内。
    #[error("Invalid placement: period {period}, offset {offset} (period must be >= 1 and offset < period)")]
    Parameter { period: usize, offset: usize },

    /// 载体缓冲区太小，无法以当前步长容纳整个载荷。
    #[error("Message is too long, need {required} bytes but the carrier only has {available}")]
    Capacity { required: usize, available: usize },
}
