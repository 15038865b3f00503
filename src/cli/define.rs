use anyhow::Result;
use clap::Parser;
use log::info;

use super::load_space;
use crate::cli::SubCommandExtend;
use crate::config::{DefinitionsOptions, Opts, SpaceOptions};
use crate::export::{DEFINITIONS_VAR, write_export};

#[derive(Parser, Debug, Clone)]
pub struct DefineCommand {
    #[command(flatten)]
    pub space: SpaceOptions,
    #[command(flatten)]
    pub definitions: DefinitionsOptions,
}

impl SubCommandExtend for DefineCommand {
    async fn run(&self, _opts: &Opts) -> Result<()> {
        let space = load_space(&self.space)?;
        write_export(
            &self.definitions.definitions,
            DEFINITIONS_VAR,
            &space.definitions(),
            self.definitions.format,
        )?;
        info!("颜色定义已写入: {}", self.definitions.definitions.display());
        Ok(())
    }
}
