use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::warn;

use crate::error::Result;
use crate::export::read_export;
use crate::ranker::RankingVector;

/// 图片文件名到排名向量的映射
///
/// 可在多个线程中同时插入
#[derive(Debug, Default)]
pub struct RankingDatabase {
    entries: Mutex<HashMap<String, RankingVector>>,
}

impl RankingDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从导出文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let entries: HashMap<String, RankingVector> = read_export(path)?;
        Ok(Self { entries: Mutex::new(entries) })
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, RankingVector>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 插入或覆盖一条记录，返回被覆盖的旧值
    pub fn insert(
        &self,
        image_id: impl Into<String>,
        vector: RankingVector,
    ) -> Option<RankingVector> {
        let image_id = image_id.into();
        let mut entries = self.entries();
        if entries.contains_key(&image_id) {
            warn!("覆盖已有的排名记录 {}，可能存在同名图片", image_id);
        }
        entries.insert(image_id, vector)
    }

    pub fn get(&self, image_id: &str) -> Option<RankingVector> {
        self.entries().get(image_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// 导出全部记录，按文件名排序
    pub fn export(&self) -> BTreeMap<String, RankingVector> {
        self.entries().iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl FromIterator<(String, RankingVector)> for RankingDatabase {
    fn from_iter<I: IntoIterator<Item = (String, RankingVector)>>(iter: I) -> Self {
        Self { entries: Mutex::new(iter.into_iter().collect()) }
    }
}

#[cfg(test)]
mod tests {
    use rayon::prelude::*;

    use super::*;
    use crate::export::{DATABASE_VAR, ExportFormat, write_export};

    #[test]
    fn test_insert_overwrite() {
        let db = RankingDatabase::new();
        assert!(db.is_empty());
        assert_eq!(db.insert("a.png", vec![1.0]), None);
        assert_eq!(db.insert("a.png", vec![2.0]), Some(vec![1.0]));
        assert_eq!(db.len(), 1);
        assert_eq!(db.get("a.png"), Some(vec![2.0]));
        assert_eq!(db.get("b.png"), None);
    }

    #[test]
    fn test_export_sorted() {
        let db = RankingDatabase::new();
        for name in ["c.png", "a.png", "b.png"] {
            db.insert(name, vec![0.0]);
        }
        let keys = db.export().into_keys().collect::<Vec<_>>();
        assert_eq!(keys, ["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_parallel_insert_deterministic() {
        let expected = (0..500).map(|i| (format!("{:03}.png", i), vec![i as f64])).collect::<BTreeMap<_, _>>();

        let db = RankingDatabase::new();
        expected.par_iter().for_each(|(k, v)| {
            db.insert(k.clone(), v.clone());
        });
        assert_eq!(db.export(), expected);

        let db2 = expected.clone().into_iter().rev().collect::<RankingDatabase>();
        assert_eq!(db2.export(), db.export());
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.js");
        let db = RankingDatabase::from_iter([("x.jpg".to_owned(), vec![3.0, 4.5])]);
        write_export(&path, DATABASE_VAR, &db.export(), ExportFormat::Script).unwrap();

        let loaded = RankingDatabase::load(&path).unwrap();
        assert_eq!(loaded.export(), db.export());
    }
}
