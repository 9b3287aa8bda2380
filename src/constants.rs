/// 一个字节包含的比特数，也是每个载荷字节占用的载体槽位组数。
pub const BITS_PER_BYTE: usize = 8;

/// 默认的终止符。解码时读到该字节即停止。
pub const DEFAULT_TERMINATOR: u8 = b'#';

/// 默认步长：每个载体字节都承载一个比特。
pub const DEFAULT_PERIOD: usize = 1;

/// 默认偏移：使用每个步长周期中的第一个槽位。
pub const DEFAULT_OFFSET: usize = 0;

/// RGBA 像素的通道数。
pub const RGBA_CHANNELS: usize = 4;
