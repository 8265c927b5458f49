//! End-to-end tests for the full roomwatchd stack.
//!
//! Each test wires real adapters together the way `main` does: the virtual
//! remote behind a running sequencer, the axum router in front of it, and
//! the presence pipeline threads feeding either the sequencer or a mocked
//! webhook receiver. The HTTP layer is mostly exercised with
//! `tower::ServiceExt::oneshot`; the shutdown test binds a loopback port.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use roomwatch_adapter_http_axum::router;
use roomwatch_adapter_http_axum::state::AppState;
use roomwatch_adapter_virtual::{RecordedCall, VirtualPresenceSensor, VirtualRemote};
use roomwatch_adapter_webhook::{WebhookConfig, WebhookNotifier};
use roomwatch_app::pipeline::{PipelineSettings, PresencePipeline};
use roomwatch_app::sequencer::AutomationSequencer;
use roomwatch_domain::command::{Command, Device, RemoteKey};
use roomwatch_domain::sequence::{AutomationPlan, SequenceSettings};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sequencer_for(
    remote: &Arc<VirtualRemote>,
    settings: &SequenceSettings,
) -> AutomationSequencer<Arc<VirtualRemote>> {
    let plan = AutomationPlan::standard(settings).unwrap();
    AutomationSequencer::new(Arc::clone(remote), plan)
}

fn instant_settings() -> SequenceSettings {
    SequenceSettings {
        settle_delay: Duration::ZERO,
        confirm_interval: Duration::ZERO,
        ..SequenceSettings::default()
    }
}

fn fast_pipeline() -> PipelineSettings {
    PipelineSettings {
        time_window_secs: 0,
        poll_interval: Duration::from_millis(10),
        ..PipelineSettings::default()
    }
}

fn post_room(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/webhook/room")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Inbound webhook → sequencer → remote
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_run_enter_sequence_from_room_webhook() {
    let remote = Arc::new(VirtualRemote::default());
    let sequencer = sequencer_for(&remote, &SequenceSettings::default());
    let status = sequencer.subscribe();
    let (handle, task) = sequencer.spawn(8, std::future::pending());
    let app = router::build(AppState::new(handle, status));

    let resp = app
        .clone()
        .oneshot(post_room(r#"{"person_in_room": "true"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(
        remote.calls(),
        [
            RecordedCall::Command {
                device: Device::Display,
                command: Command::PowerOn,
            },
            RecordedCall::Command {
                device: Device::MediaPlayer,
                command: Command::Key(RemoteKey::Home),
            },
            RecordedCall::SelectSource {
                device: Device::MediaPlayer,
                source: "com.netflix.ninja".to_string(),
            },
            RecordedCall::Command {
                device: Device::MediaPlayer,
                command: Command::Key(RemoteKey::Center),
            },
            RecordedCall::Command {
                device: Device::MediaPlayer,
                command: Command::Key(RemoteKey::Center),
            },
        ]
    );

    let resp = app
        .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["phase"], "idle");
    assert_eq!(body["last_trigger"], true);
    assert_eq!(body["last_outcome"]["outcome"], "completed");

    task.abort();
}

#[tokio::test(start_paused = true)]
async fn should_power_off_when_leave_supersedes_enter() {
    let remote = Arc::new(VirtualRemote::default());
    let sequencer = sequencer_for(&remote, &SequenceSettings::default());
    let status = sequencer.subscribe();
    let (handle, task) = sequencer.spawn(8, std::future::pending());
    let app = router::build(AppState::new(handle, status));

    app.clone()
        .oneshot(post_room(r#"{"person_in_room": true}"#))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    app.oneshot(post_room(r#"{"person_in_room": false}"#))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(30)).await;

    let calls = remote.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[2],
        RecordedCall::Command {
            device: Device::Display,
            command: Command::PowerOff,
        }
    );
    assert!(
        !calls
            .iter()
            .any(|call| matches!(call, RecordedCall::SelectSource { .. }))
    );

    task.abort();
}

#[tokio::test(start_paused = true)]
async fn should_skip_sequence_when_hub_unavailable() {
    let remote = Arc::new(VirtualRemote::default());
    remote.set_available(false);
    let sequencer = sequencer_for(&remote, &SequenceSettings::default());
    let status = sequencer.subscribe();
    let (handle, task) = sequencer.spawn(8, std::future::pending());

    handle.trigger(true).unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(remote.calls().is_empty());
    assert_eq!(
        serde_json::to_value(&*status.borrow()).unwrap()["last_outcome"]["outcome"],
        "skipped"
    );

    task.abort();
}

// ---------------------------------------------------------------------------
// Detector → sequencer (local delivery)
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_drive_remote_from_detected_presence() {
    let remote = Arc::new(VirtualRemote::default());
    let sequencer = sequencer_for(&remote, &instant_settings());
    let (handle, task) = sequencer.spawn(8, std::future::pending());

    let sensor = VirtualPresenceSensor::new("present:3600".parse().unwrap());
    let pipeline = PresencePipeline::start(sensor, handle.clone(), &fast_pipeline()).unwrap();

    for _ in 0..200 {
        if remote.calls().len() >= 5 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let stopped = tokio::task::spawn_blocking(move || pipeline.shutdown())
        .await
        .unwrap();
    assert!(stopped.state.unwrap().in_room);
    assert!(stopped.source.unwrap().samples() >= 1);
    assert_eq!(remote.calls().len(), 5);

    drop(handle);
    task.await.unwrap();
}

// ---------------------------------------------------------------------------
// Detector → webhook
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_post_transition_to_webhook_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/webhook/room"))
        .and(body_json(serde_json::json!({"person_in_room": "true"})))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(
        &WebhookConfig {
            url: format!("{}/api/webhook/room", server.uri()),
            timeout_secs: 2,
        },
        Handle::current(),
    )
    .unwrap();
    let sensor = VirtualPresenceSensor::new("present:3600".parse().unwrap());
    let pipeline = PresencePipeline::start(sensor, notifier, &fast_pipeline()).unwrap();

    for _ in 0..200 {
        if !server.received_requests().await.unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    // Further windows agree with the latched state and must stay silent.
    tokio::time::sleep(Duration::from_millis(100)).await;

    tokio::task::spawn_blocking(move || pipeline.shutdown())
        .await
        .unwrap();
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_keep_sampling_when_webhook_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(
        &WebhookConfig {
            url: server.uri(),
            timeout_secs: 2,
        },
        Handle::current(),
    )
    .unwrap();
    let sensor = VirtualPresenceSensor::new("present:3600".parse().unwrap());
    let pipeline = PresencePipeline::start(sensor, notifier, &fast_pipeline()).unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    let stopped = tokio::task::spawn_blocking(move || pipeline.shutdown())
        .await
        .unwrap();

    assert!(stopped.state.unwrap().in_room);
    assert!(stopped.source.unwrap().samples() > 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Shutdown
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_stop_serving_with_status_stream_client_attached() {
    let remote = Arc::new(VirtualRemote::default());
    let sequencer = sequencer_for(&remote, &instant_settings());
    let status = sequencer.subscribe();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let (handle, task) = sequencer.spawn(8, async move {
        let _ = stop_rx.await;
    });
    let app = router::build(AppState::new(handle, status));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (signal_tx, signal_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = signal_rx.await;
                let _ = stop_tx.send(());
                let _ = task.await;
            })
            .await
    });

    let mut client = TcpStream::connect(addr).await.unwrap();
    client
        .write_all(
            b"GET /api/status/stream HTTP/1.1\r\nHost: localhost\r\nAccept: text/event-stream\r\n\r\n",
        )
        .await
        .unwrap();
    let mut buf = vec![0_u8; 1024];
    let read = client.read(&mut buf).await.unwrap();
    assert!(String::from_utf8_lossy(&buf[..read]).contains("200 OK"));

    signal_tx.send(()).unwrap();
    let served = tokio::time::timeout(Duration::from_secs(3), server).await;
    assert!(served.is_ok(), "server kept running after shutdown");
    served.unwrap().unwrap().unwrap();
    drop(client);
}
