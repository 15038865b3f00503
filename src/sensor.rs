use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use log::info;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Result, SenseError};
use crate::observer::{RankEvent, RankObserver};
use crate::ranker::{RankingVector, rank_file};
use crate::ranking_db::RankingDatabase;
use crate::space::ColorSpace;
use crate::utils::image_id;

pub struct SensorBuilder {
    space: ColorSpace,
    fail_fast: bool,
    threads: usize,
}

impl SensorBuilder {
    pub fn new(space: ColorSpace) -> Self {
        Self { space, fail_fast: false, threads: num_cpus::get() }
    }

    /// 遇到无法处理的图片时立即终止，默认跳过并记录
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// 工作线程数量
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn build(self) -> Result<Sensor> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("imsense-{}", i))
            .build()?;
        Ok(Sensor { space: self.space, fail_fast: self.fail_fast, pool })
    }
}

/// 批量计算图片的排名向量
pub struct Sensor {
    space: ColorSpace,
    fail_fast: bool,
    pool: ThreadPool,
}

#[derive(Debug)]
pub struct ImageFailure {
    pub path: PathBuf,
    pub error: SenseError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// 成功处理的图片数量
    pub ranked: usize,
    pub failures: Vec<ImageFailure>,
}

impl Sensor {
    pub fn space(&self) -> &ColorSpace {
        &self.space
    }

    /// 并行处理所有图片，结果写入 `db`
    ///
    /// 默认情况下失败的图片会被跳过，记录在返回的报告中；
    /// 若设置了 `fail_fast`，则返回遇到的第一个错误。
    pub fn rank_images<P, O>(
        &self,
        paths: &[P],
        db: &RankingDatabase,
        observer: &O,
    ) -> Result<BatchReport>
    where
        P: AsRef<Path> + Sync,
        O: RankObserver,
    {
        let failures = Mutex::new(vec![]);
        let start = Instant::now();

        self.pool.install(|| {
            paths.par_iter().try_for_each(|path| {
                let path = path.as_ref();
                match self.rank_one(path, observer) {
                    Ok((id, vector)) => {
                        db.insert(id, vector);
                        Ok(())
                    }
                    Err(error) if self.fail_fast => Err(error),
                    Err(error) => {
                        let failure = ImageFailure { path: path.to_owned(), error };
                        failures.lock().unwrap_or_else(|e| e.into_inner()).push(failure);
                        Ok(())
                    }
                }
            })
        })?;

        let mut failures = failures.into_inner().unwrap_or_else(|e| e.into_inner());
        failures.sort_by(|a, b| a.path.cmp(&b.path));
        let ranked = paths.len() - failures.len();
        info!(
            "处理完成: 成功 {} 张, 失败 {} 张, 耗时 {:.2}s",
            ranked,
            failures.len(),
            start.elapsed().as_secs_f32()
        );

        Ok(BatchReport { ranked, failures })
    }

    fn rank_one<O: RankObserver>(
        &self,
        path: &Path,
        observer: &O,
    ) -> Result<(String, RankingVector)> {
        let image = image_id(path);
        observer.notify(RankEvent::ImageStarted { image: image.clone() });

        let start = Instant::now();
        let vector = match rank_file(path, &self.space) {
            Ok(vector) => vector,
            Err(e) => {
                observer.notify(RankEvent::ImageFailed { image, error: e.to_string() });
                return Err(e);
            }
        };

        for (index, (feature, value)) in self.space.features().iter().zip(&vector).enumerate() {
            observer.notify(RankEvent::FeatureScored {
                image: image.clone(),
                index,
                feature: feature.name().to_owned(),
                value: *value,
            });
        }
        observer.notify(RankEvent::ImageFinished {
            image: image.clone(),
            features: vector.len(),
            elapsed: start.elapsed(),
        });

        Ok((image, vector))
    }
}
