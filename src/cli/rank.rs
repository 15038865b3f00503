use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::ProgressBar;
use log::{info, warn};
use tokio::task::spawn_blocking;

use super::load_space;
use crate::cli::SubCommandExtend;
use crate::config::{DefinitionsOptions, Opts, RankOptions, SpaceOptions};
use crate::export::{DATABASE_VAR, DEFINITIONS_VAR, write_export};
use crate::observer::{LogObserver, ProgressObserver};
use crate::ranking_db::RankingDatabase;
use crate::sensor::SensorBuilder;
use crate::utils::{collect_images, pb_style, suffix_regex};

#[derive(Parser, Debug, Clone)]
pub struct RankCommand {
    #[command(flatten)]
    pub space: SpaceOptions,
    #[command(flatten)]
    pub definitions: DefinitionsOptions,
    #[command(flatten)]
    pub rank: RankOptions,
    /// 排名数据库的输出路径
    #[arg(long, value_name = "FILE", default_value = "database.json")]
    pub database: PathBuf,
    /// 图片路径，目录会被递归扫描
    #[arg(required = true)]
    pub images: Vec<PathBuf>,
}

impl SubCommandExtend for RankCommand {
    async fn run(&self, _opts: &Opts) -> Result<()> {
        // 颜色空间有误时不处理任何图片
        let space = load_space(&self.space)?;
        let format = self.definitions.format;

        let re_suf = suffix_regex(&self.rank.suffix).context("无效的后缀名")?;
        let images = collect_images(&self.images, &re_suf);
        info!("共 {} 张图片, {} 个参考颜色", images.len(), space.len());

        let sensor = SensorBuilder::new(space)
            .fail_fast(self.rank.fail_fast)
            .threads(self.rank.threads)
            .build()?;
        let pb = ProgressBar::new(images.len() as u64).with_style(pb_style());

        let observer = (LogObserver, ProgressObserver::new(pb.clone()));
        let (sensor, db, report) = spawn_blocking(move || {
            let db = RankingDatabase::new();
            let report = sensor.rank_images(&images, &db, &observer);
            (sensor, db, report)
        })
        .await?;

        let report = match report {
            Ok(report) => report,
            Err(e) => {
                pb.abandon_with_message("处理中止");
                return Err(e).context("图片处理失败");
            }
        };
        pb.finish_with_message("图片处理完成");

        // 中止时两个导出文件都保持原样
        let definitions = sensor.space().definitions();
        write_export(&self.definitions.definitions, DEFINITIONS_VAR, &definitions, format)?;
        info!("颜色定义已写入: {}", self.definitions.definitions.display());

        write_export(&self.database, DATABASE_VAR, &db.export(), format)?;
        info!("排名数据库已写入: {}", self.database.display());

        if !report.failures.is_empty() {
            warn!("{} 张图片处理失败，已跳过:", report.failures.len());
            for failure in &report.failures {
                warn!("  {}: {}", failure.path.display(), failure.error);
            }
        }

        Ok(())
    }
}
