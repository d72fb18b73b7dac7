use anyhow::Result;
use clap::Parser;
use mpa_deal_intel::{cli, workflow::launch};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 日志只写 stderr，stdout 留给 MCP 协议和运行汇总
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = cli::Args::parse();
    let (config, command) = args.into_config()?;
    init_tracing(config.verbose);

    launch(&config, command).await
}
