//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::{DEFAULT_OFFSET, DEFAULT_PERIOD, DEFAULT_TERMINATOR};
use crate::error::StegoError;
use crate::steganography::Placement;
use clap::{ArgAction, Args, Parser};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，可按步长和通道偏移在无损格式图像中隐藏或恢复文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，可按步长 (period) 和通道偏移 (offset) 在无损格式图像 (如 PNG, BMP) 中隐藏或恢复文本。"
)]
pub struct Cli {
    /// 输出更详细的日志，可重复使用 (-v, -vv)。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏文本。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 显示图像在给定放置参数下最多能隐藏多少字节。
    Capacity(CapacityArgs),
}

/// 隐写位置相关的参数，三个子命令共用。
#[derive(Args, Debug, Clone, Copy)]
pub struct PlacementArgs {
    /// 每个比特占用的载体字节数，例如 RGBA 图像只用单个通道时为 4。
    #[arg(short, long, default_value_t = DEFAULT_PERIOD)]
    pub period: usize,

    /// 每个周期内用于隐写的槽位，必须小于 period，例如 1 表示 RGBA 的绿色通道。
    #[arg(short, long, default_value_t = DEFAULT_OFFSET)]
    pub offset: usize,

    /// 消息结束标记，必须是单个 ASCII 字符。
    #[arg(long, default_value = "#", value_parser = parse_terminator)]
    pub terminator: u8,
}

impl PlacementArgs {
    /// 校验 period 和 offset。
    pub fn placement(&self) -> Result<Placement, StegoError> {
        Placement::new(self.period, self.offset)
    }
}

impl Default for PlacementArgs {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            offset: DEFAULT_OFFSET,
            terminator: DEFAULT_TERMINATOR,
        }
    }
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long, conflicts_with = "message", required_unless_present = "message")]
    pub text: Option<PathBuf>,

    /// 直接在命令行上给出要隐藏的文本。
    #[arg(short, long)]
    pub message: Option<String>,

    /// 隐写完成后，保存结果图像的输出路径。默认为输入图像旁的 `doctored_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub placement: PlacementArgs,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本后，保存文本内容的输出路径。默认为图像旁的 `recovered_<名称>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 同时把恢复的文本打印到标准输出。
    #[arg(long)]
    pub print: bool,

    #[command(flatten)]
    pub placement: PlacementArgs,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub placement: PlacementArgs,
}

fn parse_terminator(value: &str) -> Result<u8, String> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(format!(
            "terminator must be a single ASCII character, got '{value}'"
        )),
    }
}
