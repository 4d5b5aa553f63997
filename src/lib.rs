pub mod actions;
pub mod commands;
pub mod config;
pub mod errors;
pub mod executor;
pub mod height;
pub mod perception;
pub mod speech;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::actions::{load_gamemodes, ActionContext};
use crate::commands::{parse_command, Console};
use crate::config::AppConfig;
use crate::errors::HudResult;
use crate::executor::EnigoInput;
use crate::height::HeightMonitor;
use crate::perception::XcapSampler;
use crate::speech::build_speaker;

pub async fn run() -> HudResult<()> {
    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "no usable config; running with built-in calibration");
            AppConfig::default()
        }
    };

    let ctx = ActionContext {
        sampler: Arc::new(XcapSampler::new()),
        input: Arc::new(EnigoInput::new()),
        speaker: build_speaker(config.speech.backend),
    };

    let monitor = if config.height.enabled {
        let monitor = HeightMonitor::new(&config.height, ctx.sampler.clone(), ctx.speaker.clone())?;
        tracing::info!("spawning height monitor");
        Some(monitor.spawn())
    } else {
        tracing::info!("height monitor disabled in config");
        None
    };

    let modes = load_gamemodes(&config.gamemode.folder).unwrap_or_else(|e| {
        tracing::warn!(
            error = %e,
            folder = %config.gamemode.folder.display(),
            "could not load game modes"
        );
        Vec::new()
    });

    let mut console = Console {
        ctx,
        config,
        modes,
        monitor,
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("hudcall ready, type help for commands");

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        };
        let Some(line) = line else {
            tracing::info!("console input closed");
            break;
        };
        let Some(cmd) = parse_command(&line) else {
            continue;
        };
        match console.execute(cmd).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => tracing::error!(error = %e, "command failed"),
        }
    }

    console.shutdown().await
}
