mod app;
mod art;
mod logging;
mod render;

use clap::Parser;
use high_low_core::Settings;
use std::path::PathBuf;
use tracing::info;

/// 终端版猜大小
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// 设置文件 (JSON)，缺失或无效时使用默认值
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// 卡面资源目录
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// 日志文件
    #[arg(long, default_value = "high_low.log")]
    log_file: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_file)?;
    info!("启动: {:?}", args);

    let settings = Settings::load(&args.settings);
    let art = art::LoadedArt::load(&args.assets);

    app::run(settings, art).await
}
