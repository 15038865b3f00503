use std::path::{Path, PathBuf};

use indicatif::ProgressStyle;
use log::{info, warn};
use regex::Regex;
use walkdir::WalkDir;

pub fn pb_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
        .expect("invalid progress bar template")
        .progress_chars("##-")
}

/// 图片在数据库中的标识，即不含目录的文件名
pub fn image_id(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

/// 根据后缀列表构建匹配扩展名的正则，如 `jpg,png`
pub fn suffix_regex(suffix: &str) -> Result<Regex, regex::Error> {
    let alternatives = suffix.split(',').map(|s| regex::escape(s.trim())).collect::<Vec<_>>();
    Regex::new(&format!("(?i)^({})$", alternatives.join("|")))
}

/// 展开输入路径
///
/// 文件原样保留，目录则递归扫描其中扩展名匹配的文件
pub fn collect_images(paths: &[PathBuf], re_suf: &Regex) -> Vec<PathBuf> {
    let mut images = vec![];
    for path in paths {
        if !path.is_dir() {
            images.push(path.clone());
            continue;
        }

        info!("开始扫描目录: {}", path.display());
        let before = images.len();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("扫描目录出错: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(ext) = entry.path().extension() {
                if re_suf.is_match(&ext.to_string_lossy()) {
                    images.push(entry.into_path());
                }
            }
        }
        info!("扫描完成，共 {} 张图片", images.len() - before);
    }
    images
}
