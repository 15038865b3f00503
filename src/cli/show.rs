use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::task::block_in_place;

use super::load_space;
use crate::cli::SubCommandExtend;
use crate::config::{Opts, OutputFormat, SpaceOptions};
use crate::ranker::rank_file;

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    #[command(flatten)]
    pub space: SpaceOptions,
    /// 图片路径
    pub image: PathBuf,
    /// 输出格式
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = OutputFormat::Table)]
    pub output_format: OutputFormat,
}

impl SubCommandExtend for ShowCommand {
    async fn run(&self, _opts: &Opts) -> Result<()> {
        let space = load_space(&self.space)?;
        let ranking = block_in_place(|| rank_file(&self.image, &space))?;

        let result = ranking
            .into_iter()
            .zip(space.features())
            .map(|(value, feature)| (value, feature.name()))
            .collect::<Vec<_>>();

        match self.output_format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&result)?)
            }
            OutputFormat::Table => {
                for (k, v) in result {
                    println!("{:.2}\t{}", k, v);
                }
            }
        }
        Ok(())
    }
}
