mod app;
mod backend;
mod config;
mod logger;
mod utils;

use anyhow::{Context, Result};
use app::DocumentsApp;
use backend::HttpBackend;
use config::AppConfig;
use eframe::egui::Color32;
use tracing::{info, warn};

const ACCENT_FALLBACK: Color32 = Color32::from_rgb(161, 89, 225);

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    logger::init(&config.log_filter);
    info!(base_url = %config.base_url, "Starting TransformoDocs client");

    let backend = HttpBackend::new(&config.base_url, config.auth_token.as_deref())
        .context("invalid backend settings")?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let accent = utils::color::parse_hex(&config.accent_color).unwrap_or_else(|| {
        warn!(color = %config.accent_color, "Invalid accent color, using default");
        ACCENT_FALLBACK
    });

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([400.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "TransformoDocs",
        options,
        Box::new(move |cc| {
            Box::new(DocumentsApp::new(
                cc.egui_ctx.clone(),
                backend,
                runtime,
                accent,
            ))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
