//! Manager actor driven through its handle.

use std::time::Duration;

use appmgr_core::orchestration::{
    ApplicationManagerActor, InMemorySettings, ManagerMessage, ManagerResponse, OrchestratorState,
};
use appmgr_core::test_helpers::{
    manager_with, manager_with_settings, standard_launchers, test_config, RecordingRuntime,
};
use appmgr_core::{AppManagerError, ApplicationManager};

async fn focus(handle: &appmgr_core::ApplicationManagerHandle, app: &str) {
    handle
        .request(ManagerMessage::switch("test", app, None, None))
        .await
        .unwrap();
    handle.request(ManagerMessage::initialised(app)).await.unwrap();
    handle
        .request(ManagerMessage::switch_confirmation(app))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_request_and_snapshot() {
    let runtime = RecordingRuntime::new();
    let (mut actor, handle) =
        ApplicationManagerActor::new(manager_with(standard_launchers(), runtime.clone()));
    let task = actor.start().unwrap();

    let response = handle
        .request(ManagerMessage::switch("test", "ApplicationClock", None, None))
        .await
        .unwrap();
    assert_eq!(response, ManagerResponse::handled(true));

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.stack, vec!["ApplicationClock".to_string()]);
    assert_eq!(snapshot.state, OrchestratorState::Running);
    assert_eq!(runtime.created(), vec!["ApplicationClock".to_string()]);

    handle.shutdown().await.unwrap();
    let manager: ApplicationManager = task.await.unwrap();
    assert_eq!(manager.stack().len(), 1);
}

#[tokio::test]
async fn test_fire_and_forget_messages_are_processed_in_order() {
    let runtime = RecordingRuntime::new();
    let (mut actor, handle) =
        ApplicationManagerActor::new(manager_with(standard_launchers(), runtime));
    actor.start().unwrap();

    handle
        .send(ManagerMessage::switch("test", "ApplicationClock", None, None))
        .await
        .unwrap();
    handle.send(ManagerMessage::initialised("ApplicationClock")).await.unwrap();
    handle
        .send(ManagerMessage::switch_confirmation("ApplicationClock"))
        .await
        .unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.focused.as_deref(), Some("ApplicationClock"));
}

#[tokio::test]
async fn test_actor_cannot_start_twice() {
    let (mut actor, _handle) =
        ApplicationManagerActor::new(manager_with(standard_launchers(), RecordingRuntime::new()));
    actor.start().unwrap();

    let error = actor.start().unwrap_err();
    assert!(matches!(error, AppManagerError::Internal(_)));
}

#[tokio::test]
async fn test_handle_reports_closed_channel_after_shutdown() {
    let (mut actor, handle) =
        ApplicationManagerActor::new(manager_with(standard_launchers(), RecordingRuntime::new()));
    let task = actor.start().unwrap();

    handle.shutdown().await.unwrap();
    task.await.unwrap();

    assert!(handle.is_closed());
    let error = handle.snapshot().await.unwrap_err();
    assert!(matches!(error, AppManagerError::ChannelClosed(_)));
}

#[tokio::test(start_paused = true)]
async fn test_auto_lock_fires_after_inactivity() {
    let runtime = RecordingRuntime::new();
    let mut config = test_config();
    config.auto_lock.enabled = true;
    config.auto_lock.timeout_seconds = 30;
    let manager =
        manager_with_settings(config, standard_launchers(), runtime, InMemorySettings::new());
    let (mut actor, handle) = ApplicationManagerActor::new(manager);
    actor.start().unwrap();

    focus(&handle, "ApplicationClock").await;
    handle.request(ManagerMessage::UserActivity).await.unwrap();

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert!(!handle.snapshot().await.unwrap().phone_locked);

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert!(handle.snapshot().await.unwrap().phone_locked);
}

#[tokio::test(start_paused = true)]
async fn test_user_activity_postpones_auto_lock() {
    let runtime = RecordingRuntime::new();
    let mut config = test_config();
    config.auto_lock.enabled = true;
    config.auto_lock.timeout_seconds = 30;
    let manager =
        manager_with_settings(config, standard_launchers(), runtime, InMemorySettings::new());
    let (mut actor, handle) = ApplicationManagerActor::new(manager);
    actor.start().unwrap();

    focus(&handle, "ApplicationClock").await;
    handle.request(ManagerMessage::UserActivity).await.unwrap();

    for _ in 0..3 {
        tokio::time::sleep(Duration::from_secs(25)).await;
        handle.request(ManagerMessage::UserActivity).await.unwrap();
    }
    assert!(!handle.snapshot().await.unwrap().phone_locked);
}
