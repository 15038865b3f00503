use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = SenseError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SenseError {
    /// 颜色字符串无法解析为 `name(r,g,b)`
    #[error("无法解析颜色 {entry:?}: {reason}")]
    Parse { entry: String, reason: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("无法读取图片 {}: {source}", path.display())]
    ImageAccess {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// 宽或高为 0 的图片无法求平均值
    #[error("图片尺寸为 {width}x{height}，无法计算平均距离")]
    DegenerateImage { width: u32, height: u32 },
    #[error("无法访问文件 {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("无法解析 JSON 文件 {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("无法创建线程池: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 印象评分数量必须与颜色特征数量一致
    #[error("关键词 {keyword:?} 的评分数量为 {actual}，应为 {expected}")]
    RatingCount { keyword: String, expected: usize, actual: usize },
    #[error("颜色名称 {0:?} 重复")]
    DuplicateFeature(String),
    #[error("查询向量长度为 {actual}，应为 {expected}")]
    QueryLength { expected: usize, actual: usize },
}

impl SenseError {
    pub(crate) fn parse(entry: &str, reason: impl Into<String>) -> Self {
        Self::Parse { entry: entry.to_owned(), reason: reason.into() }
    }
}
