use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::distance::Rgb;
use crate::error::{Result, SenseError, ValidationError};

static RE_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?<name>[^()]*?)\s*\((?<channels>[^()]*)\)\s*$").expect("failed to build regex")
});

/// 颜色空间数据集，即 space.json 的内容
#[derive(Deserialize, Debug, Clone)]
pub struct SpaceDataset {
    #[serde(rename = "colorString")]
    pub color_string: Vec<String>,
    #[serde(default)]
    pub impressions: Vec<ImpressionEntry>,
}

/// 原始印象记录，格式为 `[keyword, rating_0, rating_1, ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct ImpressionEntry {
    pub keyword: String,
    pub ratings: Vec<f64>,
}

impl ImpressionEntry {
    pub fn new(keyword: impl Into<String>, ratings: impl Into<Vec<f64>>) -> Self {
        Self { keyword: keyword.into(), ratings: ratings.into() }
    }
}

impl<'de> Deserialize<'de> for ImpressionEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = ImpressionEntry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an array of a keyword followed by numeric ratings")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let keyword: String =
                    seq.next_element()?.ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let mut ratings = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(rating) = seq.next_element::<f64>()? {
                    ratings.push(rating);
                }
                Ok(ImpressionEntry { keyword, ratings })
            }
        }

        deserializer.deserialize_seq(EntryVisitor)
    }
}

/// 一个参考颜色
///
/// 字段按字母顺序排列，保证序列化后的键顺序稳定
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Feature {
    hsv: [f64; 3],
    name: String,
    rgb: Rgb,
}

impl Feature {
    pub fn new(name: impl Into<String>, rgb: Rgb) -> Self {
        Self { hsv: rgb_to_hsv(rgb), name: name.into(), rgb }
    }

    /// 解析 `name(r,g,b)` 格式的颜色字符串
    pub fn parse(entry: &str) -> Result<Self> {
        let caps = RE_COLOR
            .captures(entry)
            .ok_or_else(|| SenseError::parse(entry, "格式应为 name(r,g,b)"))?;
        let name = &caps["name"];
        if name.is_empty() {
            return Err(SenseError::parse(entry, "颜色名称为空"));
        }

        let channels = caps["channels"].split(',').collect::<Vec<_>>();
        if channels.len() != 3 {
            return Err(SenseError::parse(
                entry,
                format!("需要 3 个颜色分量，实际为 {}", channels.len()),
            ));
        }

        let mut rgb = [0u8; 3];
        for (value, channel) in rgb.iter_mut().zip(channels) {
            let channel = channel.trim();
            *value = channel.parse().map_err(|_| match channel.parse::<i64>() {
                Ok(_) => SenseError::parse(entry, format!("颜色分量 {} 超出 0-255 范围", channel)),
                Err(_) => SenseError::parse(entry, format!("颜色分量 {:?} 不是整数", channel)),
            })?;
        }

        Ok(Self::new(name, rgb))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn hsv(&self) -> [f64; 3] {
        self.hsv
    }
}

/// 关键词与每个颜色特征的评分
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordImpression {
    keyword: String,
    ratings: Vec<f64>,
}

impl KeywordImpression {
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// 评分，与颜色特征一一对应
    pub fn ratings(&self) -> &[f64] {
        &self.ratings
    }
}

/// 由参考颜色和关键词印象组成的颜色空间，构建后不可修改
#[derive(Debug, Clone, Default)]
pub struct ColorSpace {
    features: Vec<Feature>,
    keywords: HashMap<String, KeywordImpression>,
}

impl ColorSpace {
    /// 从颜色字符串和印象记录构建颜色空间
    ///
    /// 任何一条记录出错都会导致构建失败
    pub fn build<S: AsRef<str>>(colors: &[S], impressions: Vec<ImpressionEntry>) -> Result<Self> {
        let features =
            colors.iter().map(|c| Feature::parse(c.as_ref())).collect::<Result<Vec<_>>>()?;

        let mut names = HashSet::with_capacity(features.len());
        for feature in &features {
            if !names.insert(feature.name()) {
                return Err(ValidationError::DuplicateFeature(feature.name.clone()).into());
            }
        }

        let mut keywords = HashMap::with_capacity(impressions.len());
        for ImpressionEntry { keyword, ratings } in impressions {
            if ratings.len() != features.len() {
                return Err(ValidationError::RatingCount {
                    keyword,
                    expected: features.len(),
                    actual: ratings.len(),
                }
                .into());
            }
            if keywords.contains_key(&keyword) {
                warn!("关键词 {:?} 重复，使用最后一条记录", keyword);
            }
            let impression = KeywordImpression { keyword: keyword.clone(), ratings };
            keywords.insert(keyword, impression);
        }

        debug!("颜色空间构建完成: {} 个颜色, {} 个关键词", features.len(), keywords.len());
        Ok(Self { features, keywords })
    }

    pub fn from_dataset(dataset: SpaceDataset) -> Result<Self> {
        Self::build(&dataset.color_string, dataset.impressions)
    }

    /// 从 JSON 文件加载颜色空间
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| SenseError::Io { path: path.to_owned(), source })?;
        let dataset = serde_json::from_str(&text)
            .map_err(|source| SenseError::Json { path: path.to_owned(), source })?;
        Self::from_dataset(dataset)
    }

    /// 按输入顺序排列的颜色特征
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn keyword(&self, keyword: &str) -> Option<&KeywordImpression> {
        self.keywords.get(keyword)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &KeywordImpression> {
        self.keywords.values()
    }

    /// 导出颜色定义
    pub fn definitions(&self) -> Definitions<'_> {
        Definitions {
            features: &self.features,
            keywords: self.keywords.values().map(|k| (k.keyword(), k.ratings())).collect(),
        }
    }
}

/// 颜色定义的导出格式
#[derive(Serialize, Debug)]
pub struct Definitions<'a> {
    pub features: &'a [Feature],
    pub keywords: BTreeMap<&'a str, &'a [f64]>,
}

/// 标准 RGB 到 HSV 转换，三个分量均在 [0, 1] 内
pub fn rgb_to_hsv(rgb: Rgb) -> [f64; 3] {
    let [r, g, b] = rgb.map(|c| c as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return [0.0, 0.0, max];
    }

    let delta = max - min;
    let (rc, gc, bc) = ((max - r) / delta, (max - g) / delta, (max - b) / delta);
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };

    [(h / 6.0).rem_euclid(1.0), delta / max, max]
}
