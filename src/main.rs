use clap::Parser;
use env_logger::Env;
use imsense::Opts;
use imsense::cli::SubCommandExtend;
use imsense::config::SubCommand;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let opts = Opts::parse();

    match &opts.subcmd {
        SubCommand::Rank(config) => config.run(&opts).await,
        SubCommand::Define(config) => config.run(&opts).await,
        SubCommand::Show(config) => config.run(&opts).await,
        SubCommand::Search(config) => config.run(&opts).await,
    }
}
