use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::debug;

use super::load_space;
use crate::cli::SubCommandExtend;
use crate::config::{Opts, OutputFormat, SpaceOptions};
use crate::ranking_db::RankingDatabase;
use crate::search::{SearchHit, search};

#[derive(Parser, Debug, Clone)]
pub struct SearchCommand {
    #[command(flatten)]
    pub space: SpaceOptions,
    /// 排名数据库，JSON 与脚本格式均可
    #[arg(long, value_name = "FILE", default_value = "database.json")]
    pub database: PathBuf,
    /// 得分上限，得分不小于该值的图片不会显示
    #[arg(long, value_name = "SCORE", default_value_t = 25000.)]
    pub max_distance: f64,
    /// 显示的结果数量
    #[arg(long, value_name = "COUNT", default_value_t = 10)]
    pub count: usize,
    /// 输出格式
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = OutputFormat::Table)]
    pub output_format: OutputFormat,
    /// 关键词
    pub keyword: String,
}

impl SubCommandExtend for SearchCommand {
    async fn run(&self, _opts: &Opts) -> Result<()> {
        let space = load_space(&self.space)?;
        let impression =
            space.keyword(&self.keyword).ok_or_else(|| anyhow!("关键词不存在: {}", self.keyword))?;

        let db = RankingDatabase::load(&self.database)
            .with_context(|| format!("无法加载排名数据库: {}", self.database.display()))?;
        debug!("排名数据库共 {} 张图片", db.len());

        let mut result = search(&db, impression.ratings(), self.max_distance)?;
        result.truncate(self.count);
        print_result(&result, self)
    }
}

fn print_result(result: &[SearchHit], opts: &SearchCommand) -> Result<()> {
    match opts.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?)
        }
        OutputFormat::Table => {
            for hit in result {
                println!("{:.2}\t{}", hit.score, hit.image);
            }
        }
    }
    Ok(())
}
