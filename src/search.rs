use serde::Serialize;

use crate::error::{Result, ValidationError};
use crate::ranking_db::RankingDatabase;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub image: String,
    pub score: f64,
}

fn inner_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// 使用关键词评分搜索图片
///
/// 评分与图片排名向量的内积越小，图片越符合关键词。
/// 只返回得分小于 `max_distance` 的图片，按得分从小到大排列。
pub fn search(db: &RankingDatabase, ratings: &[f64], max_distance: f64) -> Result<Vec<SearchHit>> {
    let mut hits = vec![];
    for (image, vector) in db.export() {
        if vector.len() != ratings.len() {
            let err = ValidationError::QueryLength { expected: vector.len(), actual: ratings.len() };
            return Err(err.into());
        }
        let score = inner_product(ratings, &vector);
        if score < max_distance {
            hits.push(SearchHit { image, score });
        }
    }
    // 排序稳定，得分相同时保持文件名顺序
    hits.sort_by(|a, b| a.score.total_cmp(&b.score));
    Ok(hits)
}
