use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;

use crate::error::{Result, SenseError};

/// 脚本格式下颜色定义使用的变量名
pub const DEFINITIONS_VAR: &str = "spaceDefinitions";
/// 脚本格式下排名数据库使用的变量名
pub const DATABASE_VAR: &str = "spaceDatabase";

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// 纯 JSON
    #[default]
    Json,
    /// `var <name> = <json>`，可直接被浏览器加载
    Script,
}

/// 以 4 空格缩进写入导出文件
pub fn write_export<T: Serialize>(
    path: impl AsRef<Path>,
    var: &str,
    value: &T,
    format: ExportFormat,
) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source| SenseError::Io { path: path.to_owned(), source };

    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    if format == ExportFormat::Script {
        write!(writer, "var {} = ", var).map_err(io_err)?;
    }

    let mut ser = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser).map_err(|source| SenseError::Json { path: path.to_owned(), source })?;

    writeln!(writer).map_err(io_err)?;
    writer.flush().map_err(io_err)
}

/// 读取导出文件，两种格式均可
pub fn read_export<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|source| SenseError::Io { path: path.to_owned(), source })?;
    serde_json::from_str(strip_script(&text))
        .map_err(|source| SenseError::Json { path: path.to_owned(), source })
}

fn strip_script(text: &str) -> &str {
    let text = text.trim();
    let body = match text.strip_prefix("var ").and_then(|rest| rest.split_once('=')) {
        Some((_, body)) => body,
        None => text,
    };
    body.trim().trim_end_matches(';')
}
