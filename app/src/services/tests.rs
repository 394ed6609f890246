use std::time::Duration;

use domain::SimulatedGateway;
use domain::core::Portal;
use domain::form::FormPhase;
use serde_json::json;

use super::*;

fn handle(ttl: Duration) -> PortalHandle {
    let portal = Portal::with_gateway(
        SimulatedGateway::new(Duration::from_millis(50)),
        Duration::from_millis(100),
    );
    PortalHandle::new(portal, ttl)
}

#[tokio::test(start_paused = true)]
async fn login_session_records_navigation() {
    let handle = handle(Duration::from_secs(60));
    let form = handle.mount(FormKind::Login).await;

    form.session
        .edit(json!({"field": "email", "value": "user@test.com"}))
        .await
        .unwrap();
    form.session
        .edit(json!({"field": "password", "value": "secret"}))
        .await
        .unwrap();
    assert_eq!(form.session.submit().await, Ok(SubmitOutcome::Submitting));
    assert_eq!(form.session.settled().await, FormPhase::Success);
    assert_eq!(form.navigator.requested_route(), None);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(
        form.navigator.requested_route().as_deref(),
        Some("/dashboard")
    );
}

#[tokio::test(start_paused = true)]
async fn malformed_and_unsupported_events_are_reported() {
    let handle = handle(Duration::from_secs(60));
    let login = handle.mount(FormKind::Login).await;

    let unknown_field = login
        .session
        .edit(json!({"field": "fullName", "value": "Alex"}))
        .await;
    assert!(matches!(unknown_field, Err(FormEventError::Malformed(_))));

    let wrong_type = login
        .session
        .edit(json!({"field": "rememberMe", "value": "yes"}))
        .await;
    assert!(matches!(wrong_type, Err(FormEventError::Malformed(_))));

    let avatar = AvatarFile::new("me.png", None, vec![1, 2, 3]);
    assert_eq!(
        login.session.select_avatar(avatar, handle.portal()).await,
        Err(FormEventError::Unsupported("avatar uploads"))
    );
}

#[tokio::test(start_paused = true)]
async fn signup_role_is_parsed_from_lowercase_value() {
    let handle = handle(Duration::from_secs(60));
    let signup = handle.mount(FormKind::Signup).await;

    signup
        .session
        .edit(json!({"field": "role", "value": "employer"}))
        .await
        .unwrap();
    let snapshot = signup.session.snapshot().await;
    assert_eq!(snapshot.values.get("role").map(String::as_str), Some("employer"));

    let bad_role = signup
        .session
        .edit(json!({"field": "role", "value": "admin"}))
        .await;
    assert!(matches!(bad_role, Err(FormEventError::Malformed(_))));
}

#[tokio::test(start_paused = true)]
async fn sweep_unmounts_only_expired_sessions() {
    let handle = handle(Duration::from_secs(60));
    let old = handle.mount(FormKind::Signup).await.id;

    tokio::time::sleep(Duration::from_secs(45)).await;
    let fresh = handle.mount(FormKind::Login).await.id;

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(handle.sessions().sweep_expired().await, 1);
    assert!(handle.sessions().get(&old).await.is_none());
    assert!(handle.sessions().get(&fresh).await.is_some());
}

#[tokio::test(start_paused = true)]
async fn removing_a_session_releases_its_preview() {
    let handle = handle(Duration::from_secs(60));
    let signup = handle.mount(FormKind::Signup).await;
    let id = signup.id;

    let avatar = AvatarFile::new("me.png", Some("image/png".to_string()), vec![7; 32]);
    signup
        .session
        .select_avatar(avatar, handle.portal())
        .await
        .unwrap();
    assert_eq!(handle.portal().previews().len(), 1);

    drop(signup);
    assert!(handle.sessions().remove(&id).await);
    assert!(handle.portal().previews().is_empty());
    assert!(!handle.sessions().remove(&id).await);
    assert_eq!(handle.sessions().len().await, 0);
}
