//! # 隐写核心模块
//!
//! 把载荷的每一个比特写入载体缓冲区中选定字节的最低有效位，并提供逆操作。
//!
//! 载荷的第 `k` 个比特 (按字节从低位到高位计数) 存放在缓冲区下标
//! `k * period + offset` 处。`period` 用于跳过不参与隐写的通道，
//! `offset` 选择每个周期中实际使用的槽位，例如 RGBA 数据中 `(4, 1)` 表示只用绿色通道。

use crate::constants::{BITS_PER_BYTE, DEFAULT_OFFSET, DEFAULT_PERIOD, RGBA_CHANNELS};
use crate::error::StegoError;
use tracing::debug;

/// 经过校验的比特放置参数。
///
/// 只能通过 [`Placement::new`] 构造，因此持有的值总是满足 `period >= 1` 且 `offset < period`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    period: usize,
    offset: usize,
}

impl Placement {
    /// 逐字节连续写入。
    pub const SEQUENTIAL: Placement = Placement {
        period: DEFAULT_PERIOD,
        offset: DEFAULT_OFFSET,
    };

    /// 交错 RGBA 数据中只使用绿色通道。
    pub const RGBA_GREEN: Placement = Placement {
        period: RGBA_CHANNELS,
        offset: 1,
    };

    /// 校验并创建放置参数。
    ///
    /// # Errors
    ///
    /// `period` 为 0 或 `offset >= period` 时返回 [`StegoError::Parameter`]。
    pub fn new(period: usize, offset: usize) -> Result<Self, StegoError> {
        if period == 0 || offset >= period {
            return Err(StegoError::Parameter { period, offset });
        }
        Ok(Self { period, offset })
    }

    pub fn period(self) -> usize {
        self.period
    }

    pub fn offset(self) -> usize {
        self.offset
    }

    /// 载荷第 `bit` 个比特在载体中的下标。
    pub fn index(self, bit: usize) -> usize {
        bit * self.period + self.offset
    }

    /// 隐藏 `payload_len` 个字节所需的载体长度。溢出时饱和到 `usize::MAX`。
    pub fn required_len(self, payload_len: usize) -> usize {
        payload_len
            .saturating_mul(BITS_PER_BYTE)
            .saturating_mul(self.period)
    }

    /// 长度为 `buffer_len` 的载体最多能恢复的载荷字节数 (包括终止符)。
    ///
    /// 一个字节跨越的槽位数溢出 `usize` 时，任何缓冲区都放不下一个字节，结果为 0。
    pub fn max_payload_len(self, buffer_len: usize) -> usize {
        BITS_PER_BYTE
            .checked_mul(self.period)
            .map_or(0, |stride| buffer_len / stride)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::SEQUENTIAL
    }
}

/// 按 `period`/`offset` 把 `message` 和 `terminator` 隐藏进 `carrier` 的副本中。
///
/// # Errors
///
/// * 放置参数非法时返回 [`StegoError::Parameter`]。
/// * 载体容量不足时返回 [`StegoError::Capacity`]。
pub fn encode(
    carrier: &[u8],
    message: &str,
    terminator: u8,
    period: usize,
    offset: usize,
) -> Result<Vec<u8>, StegoError> {
    let placement = Placement::new(period, offset)?;
    encode_with(carrier, message.as_bytes(), terminator, placement)
}

/// [`encode`] 的底层版本，接受任意字节作为消息。
///
/// 所有校验都在写入前完成，失败时不会产生部分结果。返回的缓冲区与 `carrier`
/// 长度相同，只有目标下标处字节的最低位可能不同。
pub fn encode_with(
    carrier: &[u8],
    message: &[u8],
    terminator: u8,
    placement: Placement,
) -> Result<Vec<u8>, StegoError> {
    let payload_len = message.len() + 1;
    let required = placement.required_len(payload_len);

    if required > carrier.len() {
        return Err(StegoError::Capacity {
            required,
            available: carrier.len(),
        });
    }

    debug!(
        payload_len,
        period = placement.period,
        offset = placement.offset,
        carrier_len = carrier.len(),
        "encoding payload"
    );

    let mut encoded = carrier.to_vec();

    message
        .iter()
        .chain(std::iter::once(&terminator))
        .enumerate()
        .for_each(|(i, &byte)| {
            for j in 0..BITS_PER_BYTE {
                let idx = placement.index(i * BITS_PER_BYTE + j);
                let bit = (byte >> j) & 1;
                encoded[idx] = (encoded[idx] & !1) | bit;
            }
        });

    Ok(encoded)
}

/// 从 `carrier` 中恢复消息。
///
/// 读到终止符即停止；如果直到缓冲区末尾都没有遇到终止符，就返回已经恢复的全部字节。
/// 非 UTF-8 字节会被替换为 `U+FFFD`。放置参数非法时没有可读的比特，返回空字符串。
pub fn decode(carrier: &[u8], terminator: u8, period: usize, offset: usize) -> String {
    String::from_utf8_lossy(&decode_bytes(carrier, terminator, period, offset)).into_owned()
}

/// 与 [`decode`] 相同，但返回原始字节。
pub fn decode_bytes(carrier: &[u8], terminator: u8, period: usize, offset: usize) -> Vec<u8> {
    match Placement::new(period, offset) {
        Ok(placement) => decode_bytes_with(carrier, terminator, placement).0,
        Err(err) => {
            debug!(%err, "nothing to decode");
            Vec::new()
        }
    }
}

/// 解码的底层版本。第二个返回值表示是否遇到了终止符。
pub fn decode_bytes_with(carrier: &[u8], terminator: u8, placement: Placement) -> (Vec<u8>, bool) {
    let max_bytes = placement.max_payload_len(carrier.len());
    let mut message = Vec::new();

    for i in 0..max_bytes {
        let byte = (0..BITS_PER_BYTE).fold(0u8, |acc, j| {
            let bit = carrier[placement.index(i * BITS_PER_BYTE + j)] & 1;
            acc | (bit << j)
        });

        if byte == terminator {
            debug!(len = message.len(), "terminator found");
            return (message, true);
        }

        message.push(byte);
    }

    debug!(len = message.len(), max_bytes, "no terminator, message may be truncated");
    (message, false)
}

/// 长度为 `carrier_len` 的载体能隐藏的最长消息 (不含终止符)。
pub fn capacity(carrier_len: usize, placement: Placement) -> usize {
    placement.max_payload_len(carrier_len).saturating_sub(1)
}
