//! End-to-end lifecycle tests driven through the key handler
//!
//! Time is paused so the simulated backend delays elapse instantly.

use azurelite::app::{App, Mode, View};
use azurelite::config::Config;
use azurelite::event::handle_key_event;
use azurelite::lifecycle::{
    ActionBackend, OperationKind, OperationScheduler, SimulatedBackend, SimulatedDelays, Status,
};
use azurelite::notification::NotificationStatus;
use azurelite::resource::{sample_resources, Directory};
use crossterm::event::{KeyCode, KeyModifiers};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;

fn app_with(backend: Arc<dyn ActionBackend>) -> App {
    let directory = Directory::new(sample_resources().unwrap(), 5).unwrap();
    App::new(Config::default(), directory, backend, false)
}

fn app() -> App {
    app_with(Arc::new(SimulatedBackend::default()))
}

fn press(app: &mut App, code: KeyCode) -> bool {
    handle_key_event(app, code, KeyModifiers::NONE)
}

fn status(app: &App, id: &str) -> Status {
    app.directory.get(id).unwrap().status.clone()
}

async fn advance(app: &mut App, ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    app.process_completed_operations();
}

struct BrokenBackend;

impl ActionBackend for BrokenBackend {
    fn execute(
        &self,
        _resource_id: &str,
        _kind: OperationKind,
    ) -> BoxFuture<'static, anyhow::Result<()>> {
        async { Err(anyhow::anyhow!("host unreachable")) }.boxed()
    }
}

#[tokio::test(start_paused = true)]
async fn test_restart_from_resource_list() {
    let mut app = app();
    press(&mut app, KeyCode::Char('2'));
    assert_eq!(app.view, View::Resources);

    // First row is vm-001 (Running)
    press(&mut app, KeyCode::Char('r'));
    assert_eq!(status(&app, "vm-001"), Status::Updating);
    assert_eq!(app.operations.in_flight_count(), 1);

    advance(&mut app, 2000).await;
    assert_eq!(status(&app, "vm-001"), Status::Updating);

    advance(&mut app, 1100).await;
    assert_eq!(status(&app, "vm-001"), Status::Running);
    assert_eq!(app.operations.in_flight_count(), 0);

    let latest = app.notification_manager.notifications.front().unwrap();
    assert_eq!(latest.status, NotificationStatus::Success);
    assert_eq!(latest.resource_name, "Frontend Web Server");
}

#[tokio::test(start_paused = true)]
async fn test_stop_then_start_round_trip() {
    let mut app = app();
    app.open_detail(Some("vm-k8s-node-1"));

    press(&mut app, KeyCode::Char('S'));
    assert_eq!(status(&app, "vm-k8s-node-1"), Status::Deleting);
    advance(&mut app, 2100).await;
    assert_eq!(status(&app, "vm-k8s-node-1"), Status::Stopped);

    press(&mut app, KeyCode::Char('s'));
    assert_eq!(status(&app, "vm-k8s-node-1"), Status::Provisioning);
    advance(&mut app, 2100).await;
    assert_eq!(status(&app, "vm-k8s-node-1"), Status::Running);
}

#[tokio::test(start_paused = true)]
async fn test_operations_on_different_resources_overlap() {
    let mut app = app();
    app.open_detail(Some("vm-001"));
    press(&mut app, KeyCode::Char('S'));
    app.open_detail(Some("vm-dev-test"));
    press(&mut app, KeyCode::Char('s'));
    assert_eq!(app.operations.in_flight_count(), 2);

    advance(&mut app, 2100).await;
    assert_eq!(status(&app, "vm-001"), Status::Stopped);
    assert_eq!(status(&app, "vm-dev-test"), Status::Running);
}

#[tokio::test(start_paused = true)]
async fn test_delete_while_stopping_drops_late_completion() {
    let mut app = app();
    app.open_detail(Some("vm-001"));
    press(&mut app, KeyCode::Char('S'));

    press(&mut app, KeyCode::Char('x'));
    assert_eq!(app.mode, Mode::Confirm);
    press(&mut app, KeyCode::Char('y'));

    assert!(app.directory.get("vm-001").is_none());
    assert_eq!(app.view, View::Resources);
    advance(&mut app, 5000).await;
    assert!(app.directory.get("vm-001").is_none());
    assert_eq!(app.directory.len(), 9);

    let cancelled = app
        .notification_manager
        .notifications
        .iter()
        .filter(|n| n.status == NotificationStatus::Cancelled)
        .count();
    assert_eq!(cancelled, 1);
}

#[tokio::test(start_paused = true)]
async fn test_backend_failure_marks_resource_error() {
    let mut app = app_with(Arc::new(BrokenBackend));
    app.open_detail(Some("vm-001"));
    press(&mut app, KeyCode::Char('r'));

    advance(&mut app, 10).await;
    assert_eq!(status(&app, "vm-001"), Status::Error);
    assert_eq!(
        app.error_message.as_deref(),
        Some("Failed to restart vm-001: host unreachable")
    );
    let latest = app.notification_manager.notifications.front().unwrap();
    assert!(matches!(latest.status, NotificationStatus::Error(_)));
}

#[tokio::test(start_paused = true)]
async fn test_create_form_through_keys() {
    let mut app = app();
    press(&mut app, KeyCode::Char('c'));
    for c in "analytics-01".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    // Region, OS image, VM size: pick the first option of each
    for _ in 0..3 {
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
    }
    // Storage, public IP, then the submit button
    for _ in 0..3 {
        press(&mut app, KeyCode::Tab);
    }
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.view, View::Resources);
    assert_eq!(app.directory.len(), 11);
    let created = app
        .directory
        .resources()
        .iter()
        .find(|r| r.name == "analytics-01")
        .unwrap()
        .clone();
    assert_eq!(created.status, Status::Provisioning);
    assert_eq!(created.resource_type, "Virtual Machine");

    advance(&mut app, 2100).await;
    assert_eq!(status(&app, &created.id), Status::Running);
}

#[test]
fn test_scheduler_with_instant_backend() {
    let backend = Arc::new(SimulatedBackend::new(SimulatedDelays {
        provision: Duration::ZERO,
        start: Duration::ZERO,
        stop: Duration::ZERO,
        restart: Duration::ZERO,
    }));

    tokio_test::block_on(async move {
        let mut scheduler = OperationScheduler::new(backend);
        let id = scheduler.schedule("vm-001", OperationKind::Stop).unwrap();
        assert!(scheduler.schedule("vm-001", OperationKind::Start).is_err());

        let done = scheduler.next_completed().await.unwrap();
        assert_eq!(done.id, id);
        assert_eq!(done.kind, OperationKind::Stop);
        assert!(done.outcome.is_ok());
        assert!(!scheduler.is_in_flight("vm-001"));
    });
}
