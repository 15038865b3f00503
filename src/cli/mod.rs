mod define;
mod rank;
mod search;
mod show;

pub use define::*;
pub use rank::*;
pub use search::*;
pub use show::*;

use anyhow::Context;

use crate::config::{Opts, SpaceOptions};
use crate::space::ColorSpace;

pub trait SubCommandExtend {
    fn run(&self, opts: &Opts) -> impl std::future::Future<Output = anyhow::Result<()>> + Send;
}

fn load_space(opts: &SpaceOptions) -> anyhow::Result<ColorSpace> {
    ColorSpace::load(&opts.space)
        .with_context(|| format!("无法加载颜色空间: {}", opts.space.display()))
}
