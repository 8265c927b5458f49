//! # roomwatchd
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`roomwatch.toml`, env overrides)
//! - Initialise `tracing`
//! - Start the automation sequencer against the configured hub backend
//! - Start the presence pipeline threads with the configured delivery
//! - Serve the HTTP API until ctrl-c, then stop everything in order
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod wiring;

use anyhow::Context;
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use roomwatch_adapter_http_axum::router;
use roomwatch_adapter_http_axum::state::AppState;
use roomwatch_adapter_virtual::VirtualPresenceSensor;
use roomwatch_adapter_webhook::WebhookNotifier;
use roomwatch_app::pipeline::PresencePipeline;
use roomwatch_app::sequencer::{AutomationSequencer, SequencerStatus};
use roomwatch_domain::sequence::AutomationPlan;

use crate::config::{Config, Delivery, DetectorSource};
use crate::wiring::{Hub, HubTrigger, Notifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging.filter);

    // Automation side
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let (handle, status, sequencer) = if config.hub.enabled {
        let plan = AutomationPlan::standard(&config.sequence.settings())
            .context("invalid automation plan")?;
        let hub = Hub::from_config(&config).context("failed to build hub backend")?;
        let sequencer = AutomationSequencer::new(hub, plan);
        let status = sequencer.subscribe();
        let (handle, task) = sequencer.spawn(config.hub.queue_capacity, async move {
            let _ = stop_rx.await;
        });
        tracing::info!(backend = ?config.hub.backend, "automation sequencer started");
        (Some(handle), status, Some(task))
    } else {
        let (_, status) = watch::channel(SequencerStatus::default());
        (None, status, None)
    };

    // Detector side
    let pipeline = if config.detector.enabled {
        let settings = config.detector.pipeline_settings()?;
        let source = match config.detector.source {
            DetectorSource::Virtual => {
                VirtualPresenceSensor::new(config.detector.presence_pattern()?)
            }
        };
        let notifier = match config.detector.delivery {
            Delivery::Webhook => Notifier::Webhook(
                WebhookNotifier::new(&config.webhook, Handle::current())
                    .context("failed to build webhook client")?,
            ),
            Delivery::Local => Notifier::Local(
                handle
                    .clone()
                    .context("local delivery requires the hub to be enabled")?,
            ),
        };
        tracing::info!(
            source = ?config.detector.source,
            delivery = ?config.detector.delivery,
            frame_width = config.detector.frame_width,
            frame_height = config.detector.frame_height,
            "starting presence detector"
        );
        let pipeline = PresencePipeline::start(source, notifier, &settings)
            .context("failed to start presence pipeline")?;
        Some(pipeline)
    } else {
        None
    };

    // HTTP
    let app = router::build(AppState::new(HubTrigger::new(handle), status));
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "roomwatchd listening");

    // Teardown runs before axum drains connections: stopping the sequencer
    // drops the status sender, which ends every open SSE stream.
    let teardown = async move {
        shutdown_signal().await;
        if let Err(err) = stop_services(pipeline, stop_tx, sequencer).await {
            tracing::error!("teardown failed: {err:#}");
        }
    };
    axum::serve(listener, app)
        .with_graceful_shutdown(teardown)
        .await
        .context("http server failed")?;

    tracing::info!("roomwatchd stopped");
    Ok(())
}

/// Stop sampling first so no new transitions arrive, then the sequencer.
async fn stop_services(
    pipeline: Option<PresencePipeline<VirtualPresenceSensor>>,
    stop: oneshot::Sender<()>,
    sequencer: Option<JoinHandle<()>>,
) -> anyhow::Result<()> {
    if let Some(pipeline) = pipeline {
        let stopped = tokio::task::spawn_blocking(move || pipeline.shutdown())
            .await
            .context("presence pipeline shutdown panicked")?;
        if let Some(source) = stopped.source {
            tracing::info!(samples = source.samples(), "presence source released");
        }
    }
    let _ = stop.send(());
    if let Some(task) = sequencer {
        task.await.context("automation sequencer panicked")?;
    }
    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter `{filter}`: {err}, falling back to `info`");
        EnvFilter::new("info")
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
