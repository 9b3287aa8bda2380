//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::error::StegoError;
use crate::image_io::{load_pixels, save_pixels};
use crate::steganography::{capacity, decode_bytes_with, encode_with};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本、校验放置参数、调用隐写核心函数生成新的像素数据，
/// 最后以相同的尺寸写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和放置参数的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * period 或 offset 非法。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或文本文件。
/// * 图像没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let placement = args.placement.placement()?;
    let terminator = args.placement.terminator;

    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_output(&args.image, "doctored", "png"));
    ensure_writable(&dest, args.force)?;

    let text = match (&args.text, args.message) {
        (Some(path), _) => fs::read(path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        })?,
        (None, Some(message)) => message.into_bytes(),
        (None, None) => anyhow::bail!("Nothing to hide: provide either --text or --message."),
    };

    if let Some(pos) = text.iter().position(|&b| b == terminator) {
        warn!(
            position = pos,
            terminator = %char::from(terminator),
            "message contains the terminator, recovery will stop early"
        );
    }

    let picture = load_pixels(&args.image)?;

    let encoded = encode_with(&picture.pixels, &text, terminator, placement).map_err(|err| {
        match err {
            StegoError::Capacity {
                required,
                available,
            } => anyhow::anyhow!(
                "Not enough space in the image to hide the text. \nRequired: {}, Available: {}",
                required.to_string().red().bold(),
                available.to_string().green().bold()
            ),
            other => other.into(),
        }
    })?;

    save_pixels(&dest, &picture.with_pixels(encoded)?)?;

    info!(bytes = text.len(), dest = %dest.display(), "message hidden");
    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、按放置参数扫描最低有效位直到终止符，
/// 最后将恢复的文本内容写入目标文本文件。没有找到终止符不算错误，只会给出警告。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * period 或 offset 非法。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let placement = args.placement.placement()?;

    let text_path = args
        .text
        .clone()
        .unwrap_or_else(|| default_output(&args.image, "recovered", "txt"));
    ensure_writable(&text_path, args.force)?;

    let picture = load_pixels(&args.image)?;

    let (text, terminated) = decode_bytes_with(&picture.pixels, args.placement.terminator, placement);
    if !terminated {
        warn!(
            bytes = text.len(),
            "no terminator found, the message may be truncated or the parameters are wrong"
        );
    }

    fs::write(&text_path, &text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            text_path.to_string_lossy().red().bold()
        )
    })?;

    if args.print {
        println!("{}", String::from_utf8_lossy(&text));
    }

    info!(bytes = text.len(), "message recovered");
    println!(
        "The text has been successfully recovered and saved: {}",
        text_path.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令：报告图像在给定参数下最多能隐藏的字节数 (不含终止符)。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let placement = args.placement.placement()?;
    let picture = load_pixels(&args.image)?;

    println!(
        "{}x{} image, period {}, offset {}: up to {} bytes can be hidden.",
        picture.width,
        picture.height,
        placement.period(),
        placement.offset(),
        capacity(picture.pixels.len(), placement)
            .to_string()
            .green()
            .bold()
    );
    Ok(())
}

/// 在输入文件旁生成 `<prefix>_<stem>.<extension>` 形式的默认输出路径。
fn default_output(input: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_owned());
    input.with_file_name(format!("{prefix}_{stem}.{extension}"))
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}
