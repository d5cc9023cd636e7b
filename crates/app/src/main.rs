mod settings;

use candela_core::common::time::{RealTimeProvider, TimeProvider};
use candela_core::config::{AppConfig, FeedSource};
use candela_core::feed::port::RecordSource;
use candela_feed::file::FileSource;
use candela_feed::http::HttpSource;
use candela_render::chart::ChartEngine;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// # Summary
/// 应用启动入口：加载配置、连接数据源，并把每批交付喂给图表引擎。
///
/// # Logic
/// 1. 初始化全局日志，默认级别 info，可用 `RUST_LOG` 覆盖。
/// 2. 分层加载配置（默认值、`Config.toml`、`CANDELA__*` 环境变量）。
/// 3. 按配置实例化数据源并订阅。
/// 4. 循环应用交付并输出场景摘要，直到数据流结束或收到退出信号。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 2. 加载配置
    let config_path = std::env::var_os("CANDELA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("Config.toml"));
    let config = settings::load(&config_path)?;
    info!(path = %config_path.display(), style = %config.render.style, "Candela starting...");

    // 3. 实例化数据源
    let source = build_source(&config)?;
    let interval = Duration::from_millis(config.feed.poll_interval_ms);
    let mut stream = source.subscribe(interval).await?;
    info!(source = source.name(), interval_ms = config.feed.poll_interval_ms, "Subscribed");

    // 4. 主循环
    let clock = RealTimeProvider;
    let mut engine = ChartEngine::new(config.merge.clone(), config.render.clone());
    loop {
        tokio::select! {
            batch = stream.next() => {
                let Some(batch) = batch else {
                    warn!("Record stream closed");
                    break;
                };
                let mode = engine.apply(&batch, clock.now_ms());
                report(&engine, batch.len(), mode);
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Shutdown signal received. Exiting...");
                break;
            }
        }
    }

    Ok(())
}

fn build_source(config: &AppConfig) -> Result<Box<dyn RecordSource>, Box<dyn std::error::Error>> {
    let source: Box<dyn RecordSource> = match &config.feed.source {
        FeedSource::File { path } => Box::new(FileSource::new(path.as_str())),
        FeedSource::Http { url } => Box::new(HttpSource::new(url.as_str())?),
    };
    Ok(source)
}

// 每次交付后输出一行场景摘要
fn report(engine: &ChartEngine, delivered: usize, mode: candela_series::merge::MergeMode) {
    let snapshot = engine.snapshot();
    let last_close = snapshot.last().map(|c| c.close);
    match engine.scene() {
        Some(scene) => info!(
            ?mode,
            delivered,
            candles = snapshot.len(),
            style = %scene.style,
            min = scene.domain.min,
            max = scene.domain.max,
            primitives = scene.primitives.len(),
            ?last_close,
            "Scene updated"
        ),
        None => info!(?mode, delivered, candles = snapshot.len(), "No data to render"),
    }
}
