//! # 图像容器读写模块
//!
//! 隐写核心只处理原始像素字节。本模块借助 `image` crate 在容器文件与
//! 8 位 RGBA 像素缓冲区之间转换，保证写回时像素尺寸不变。

use crate::constants::RGBA_CHANNELS;
use anyhow::{Context, Result};
use colored::Colorize;
use image::{ExtendedColorType, ImageFormat};
use std::path::Path;
use tracing::debug;

/// 支持写出的无损格式。有损格式会破坏最低有效位，因此不允许。
const LOSSLESS_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Bmp,
    ImageFormat::Png,
    ImageFormat::Tiff,
    ImageFormat::WebP,
    ImageFormat::Qoi,
];

/// 解码后的图像：尺寸加上按行排列的 RGBA 像素字节。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// 用原始 RGBA 字节构造，长度必须等于 `width * height * 4`。
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        check_geometry(width, height, pixels.len())?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// 替换像素数据，尺寸保持不变。
    pub fn with_pixels(&self, pixels: Vec<u8>) -> Result<Self> {
        Self::from_raw(self.width, self.height, pixels)
    }
}

fn check_geometry(width: u32, height: u32, len: usize) -> Result<()> {
    let expected = width as usize * height as usize * RGBA_CHANNELS;
    anyhow::ensure!(
        len == expected,
        "Pixel data does not match the image geometry. \nExpected {} bytes for {}x{}, got {}",
        expected.to_string().green().bold(),
        width,
        height,
        len.to_string().red().bold()
    );
    Ok(())
}

/// 读取图像文件并转换为 RGBA8 像素缓冲区。
///
/// # Errors
///
/// 文件无法打开或无法识别为受支持的图像格式时返回错误。
pub fn load_pixels(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path)
        .with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?
        .into_rgba8();

    let (width, height) = image.dimensions();
    debug!(width, height, path = %path.display(), "loaded image");

    PixelBuffer::from_raw(width, height, image.into_raw())
}

/// 把像素缓冲区写入 `path`，格式由扩展名决定。
///
/// # Errors
///
/// * 扩展名无法识别，或对应的格式是有损格式。
/// * 编码或写入文件失败。
pub fn save_pixels(path: &Path, buffer: &PixelBuffer) -> Result<()> {
    let format = ImageFormat::from_path(path).with_context(|| {
        format!(
            "Unable to determine the image format of: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    anyhow::ensure!(
        LOSSLESS_FORMATS.contains(&format),
        "Output format {:?} is lossy or unsupported and would destroy the hidden data: {}",
        format,
        path.to_string_lossy().red().bold()
    );

    // 字段是公开的，写出前需要重新校验
    check_geometry(buffer.width, buffer.height, buffer.pixels.len())?;

    image::save_buffer_with_format(
        path,
        &buffer.pixels,
        buffer.width,
        buffer.height,
        ExtendedColorType::Rgba8,
        format,
    )
    .with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    debug!(path = %path.display(), ?format, "saved image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_from_raw_checks_geometry() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_save_and_load_keep_pixels() -> Result<()> {
        let dir = tempdir()?;
        let pixels: Vec<u8> = (0..3 * 2 * 4)
            .map(|i| if i % 4 == 3 { 255 } else { i as u8 * 7 })
            .collect();
        let buffer = PixelBuffer::from_raw(3, 2, pixels)?;

        for name in ["out.png", "out.bmp", "out.qoi"] {
            let path = dir.path().join(name);
            save_pixels(&path, &buffer)?;
            assert_eq!(load_pixels(&path)?, buffer, "{name}");
        }
        Ok(())
    }

    #[test]
    fn test_save_rejects_lossy_format() -> Result<()> {
        let dir = tempdir()?;
        let buffer = PixelBuffer::from_raw(1, 1, vec![1, 2, 3, 255])?;
        let path = dir.path().join("out.jpg");

        let err = save_pixels(&path, &buffer).unwrap_err();
        assert!(err.to_string().contains("lossy"));
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_save_rejects_mismatched_geometry() -> Result<()> {
        let dir = tempdir()?;
        let mut buffer = PixelBuffer::from_raw(2, 2, vec![0; 16])?;
        buffer.pixels.truncate(12);
        let path = dir.path().join("out.png");

        let err = save_pixels(&path, &buffer).unwrap_err();
        assert!(err.to_string().contains("geometry"));
        assert!(!path.exists());
        Ok(())
    }
}
