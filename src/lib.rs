//! # lsb_stride 库
//!
//! 本库包含按步长 (period) 与通道偏移 (offset) 进行 LSB 隐写的核心逻辑，
//! 以及命令行工具使用的图像读写和命令处理模块。

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod image_io;
pub mod steganography;

pub use error::StegoError;
pub use steganography::{Placement, decode, encode};
