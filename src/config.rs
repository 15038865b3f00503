use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::*;
use crate::export::ExportFormat;

#[derive(Parser, Debug, Clone)]
pub struct SpaceOptions {
    /// 颜色空间数据集，包含 colorString 和 impressions
    #[arg(long, value_name = "FILE", default_value = "space.json")]
    pub space: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct DefinitionsOptions {
    /// 颜色定义的输出路径
    #[arg(long, value_name = "FILE", default_value = "definitions.json")]
    pub definitions: PathBuf,
    /// 输出文件格式
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,
}

#[derive(Parser, Debug, Clone)]
pub struct RankOptions {
    /// 扫描目录时匹配的文件后缀名，多个后缀用逗号分隔
    #[arg(short, long, default_value = "jpg,jpeg,png,gif,bmp,webp")]
    pub suffix: String,
    /// 遇到无法读取的图片时立即终止，而不是跳过
    #[arg(long)]
    pub fail_fast: bool,
    /// 工作线程数量
    #[arg(short = 'j', long, value_name = "N", default_value_t = num_cpus::get())]
    pub threads: usize,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "imsense", version)]
pub struct Opts {
    #[command(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubCommand {
    /// 计算图片与每个参考颜色的平均距离，生成颜色定义和排名数据库
    Rank(RankCommand),
    /// 仅生成颜色定义
    Define(DefineCommand),
    /// 显示单张图片的排名向量
    Show(ShowCommand),
    /// 使用关键词从排名数据库中搜索图片
    Search(SearchCommand),
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Table,
}
