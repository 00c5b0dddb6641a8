use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medgrid::config::AppConfig;
use medgrid::gateway::client::GeminiClient;
use medgrid::integration::{SessionPipeline, SinkFactory};
use medgrid::speech::platform_recognizer;
use medgrid::ui::{AppState, MedGridApp};

fn sink_factory() -> SinkFactory {
    #[cfg(feature = "audio-io")]
    {
        medgrid::integration::platform_sink_factory()
    }
    #[cfg(not(feature = "audio-io"))]
    {
        medgrid::integration::null_sink_factory()
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medgrid=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MedGrid diagnostic interface");

    let config = AppConfig::from_env();
    let mut state = AppState::new(config.clone());

    // The worker only exists when a key was resolved; without one the start
    // screen explains what is missing and nothing else runs.
    if config.can_start() {
        let client = Arc::new(GeminiClient::from_config(&config).map_err(|e| anyhow!("{}", e))?);
        let pipeline = SessionPipeline::new(
            config.clone(),
            client.clone(),
            client,
            sink_factory(),
            Box::new(platform_recognizer),
        );
        state.connect(pipeline.command_sender(), pipeline.event_receiver());
        pipeline.start_worker().map_err(|e| anyhow!("{}", e))?;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("MedGrid"),
        ..Default::default()
    };

    eframe::run_native(
        "MedGrid",
        options,
        Box::new(move |cc| Ok(Box::new(MedGridApp::new(cc, state)))),
    )
    .map_err(|e| anyhow!("Failed to start interface: {}", e))?;

    Ok(())
}
