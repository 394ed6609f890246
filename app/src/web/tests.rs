use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use domain::SimulatedGateway;
use domain::avatar::AvatarFile;
use domain::core::Portal;
use domain::form::FormKind;
use tower::ServiceExt;

use crate::services::PortalHandle;

const BOUNDARY: &str = "jobportal-page-boundary";

fn create_test_setup() -> (Router, PortalHandle) {
    let portal = Portal::with_gateway(
        SimulatedGateway::new(Duration::from_millis(2000)),
        Duration::from_millis(2500),
    );
    let handle = PortalHandle::new(portal, Duration::from_secs(1800));
    (super::create_app(handle.clone()), handle)
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&body).into_owned())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    call(
        app,
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn post_login(app: &Router, form: &str) -> (StatusCode, String) {
    call(
        app,
        Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap(),
    )
    .await
}

async fn post_signup(app: &Router, fields: &[(&str, &str)], avatar: Option<Vec<u8>>) -> (StatusCode, String) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = avatar {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"me.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    call(
        app,
        Request::builder()
            .method(Method::POST)
            .uri("/signup")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

fn session_id(html: &str) -> String {
    let marker = "name=\"session\" value=\"";
    let start = html.find(marker).unwrap() + marker.len();
    html[start..start + 36].to_string()
}

#[tokio::test]
async fn test_landing_page() {
    let (app, _handle) = create_test_setup();
    let (status, html) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Find Your Dream Job or"));
    assert!(html.contains("Perfect Hire"));
    assert!(html.contains("Smart Job Matching"));
    assert!(html.contains("Talent Pool Access"));
    assert!(html.contains("89K+"));
    assert!(html.contains("Time To Program. All rights reserved."));
}

#[tokio::test(start_paused = true)]
async fn test_login_with_invalid_fields_shows_errors() {
    let (app, _handle) = create_test_setup();
    let (_, page) = get(&app, "/login").await;
    let session = session_id(&page);

    let (status, html) = post_login(
        &app,
        &format!("session={session}&email=not-an-email&password=12345&action=submit"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Email address is invalid."));
    assert!(html.contains("Password must be at least 6 characters long."));
    assert!(!html.contains("Welcome Back!"));
    assert_eq!(session_id(&html), session);
}

#[tokio::test(start_paused = true)]
async fn test_login_success_page_refreshes_to_dashboard() {
    let (app, handle) = create_test_setup();
    let (_, page) = get(&app, "/login").await;
    let session = session_id(&page);

    let (status, html) = post_login(
        &app,
        &format!("session={session}&email=user%40test.com&password=secret&rememberMe=on&action=submit"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Signing In..."));
    assert!(html.contains("class=\"button primary wide\" disabled"));
    assert!(html.contains(&format!("content=\"1;url=/login?session={session}\"")));
    assert!(!html.contains("Welcome Back!"));

    let (_, html) = get(&app, &format!("/login?session={session}")).await;
    assert!(html.contains("Signing In..."));

    tokio::time::sleep(Duration::from_millis(2100)).await;
    let (status, html) = get(&app, &format!("/login?session={session}")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Welcome Back!"));
    assert!(html.contains("content=\"3;url=/dashboard\""));
    assert_eq!(handle.sessions().len().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_session_in_query_mounts_a_fresh_form() {
    let (app, handle) = create_test_setup();
    let (_, page) = get(&app, "/signup").await;
    let signup_session = session_id(&page);

    let (status, html) = get(&app, &format!("/login?session={signup_session}")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Sign In</button>"));
    assert_ne!(session_id(&html), signup_session);
    assert_eq!(handle.sessions().len().await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_password_keeps_the_form() {
    let (app, _handle) = create_test_setup();
    let (_, page) = get(&app, "/login").await;
    assert!(page.contains("type=\"password\" name=\"password\""));
    let session = session_id(&page);

    let (_, html) = post_login(
        &app,
        &format!("session={session}&email=user%40test.com&password=secret&action=toggle-password"),
    )
    .await;

    assert!(html.contains("type=\"text\" name=\"password\""));
    assert!(html.contains("value=\"user@test.com\""));
    assert!(!html.contains("Password is required."));
}

#[tokio::test(start_paused = true)]
async fn test_signup_rejects_large_avatar_without_submitting() {
    let (app, handle) = create_test_setup();
    let (_, page) = get(&app, "/signup").await;
    let session = session_id(&page);
    let fields = [
        ("session", session.as_str()),
        ("fullName", "Alex Doe"),
        ("email", "alex@company.io"),
        ("password", "longenough"),
        ("role", "employer"),
        ("action", "submit"),
    ];

    let (status, html) = post_signup(&app, &fields, Some(vec![0; 6 * 1024 * 1024])).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("File size must be less than 5MB."));
    assert!(!html.contains("Account Created!"));
    assert!(handle.portal().previews().is_empty());
    assert_eq!(handle.sessions().len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_signup_keeps_the_form_when_a_phone_photo_is_too_large() {
    let (app, handle) = create_test_setup();
    let (_, page) = get(&app, "/signup").await;
    let session = session_id(&page);
    let fields = [
        ("session", session.as_str()),
        ("fullName", "Alex Doe"),
        ("email", "alex@company.io"),
        ("password", "longenough"),
        ("role", "jobseeker"),
        ("action", "submit"),
    ];

    let (status, html) = post_signup(&app, &fields, Some(vec![0; 9 * 1024 * 1024])).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("File size must be less than 5MB."));
    assert!(html.contains("alex@company.io"));
    assert!(html.contains("Alex Doe"));
    assert!(!html.contains("Account Created!"));
    assert!(handle.portal().previews().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_signup_without_role_asks_for_one() {
    let (app, _handle) = create_test_setup();
    let (_, page) = get(&app, "/signup").await;
    let session = session_id(&page);
    let fields = [
        ("session", session.as_str()),
        ("fullName", "Alex Doe"),
        ("email", "alex@company.io"),
        ("password", "longenough"),
        ("action", "submit"),
    ];

    let (_, html) = post_signup(&app, &fields, None).await;
    assert!(html.contains("Please select a role."));
}

#[tokio::test(start_paused = true)]
async fn test_signup_success_redirects_to_login_and_releases_preview() {
    let (app, handle) = create_test_setup();
    let (_, page) = get(&app, "/signup").await;
    let session = session_id(&page);
    let fields = [
        ("session", session.as_str()),
        ("fullName", "Alex Doe"),
        ("email", "alex@company.io"),
        ("password", "longenough"),
        ("role", "jobseeker"),
        ("action", "submit"),
    ];

    let (_, html) = post_signup(&app, &fields, Some(vec![1; 1024])).await;
    assert!(html.contains("Creating Account..."));
    assert_eq!(handle.portal().previews().len(), 1);

    tokio::time::sleep(Duration::from_millis(2100)).await;
    let (_, html) = get(&app, &format!("/signup?session={session}")).await;

    assert!(html.contains("Account Created!"));
    assert!(html.contains("content=\"3;url=/login\""));
    assert!(handle.portal().previews().is_empty());
}

#[tokio::test]
async fn test_avatar_preview_is_served_while_the_form_lives() {
    let (app, handle) = create_test_setup();
    let form = handle.mount(FormKind::Signup).await;
    let file = AvatarFile::new("me.png", Some("image/png".to_string()), vec![9, 8, 7]);
    form.session.select_avatar(file, handle.portal()).await.unwrap();
    let url = form
        .session
        .snapshot()
        .await
        .avatar_preview_url
        .unwrap();

    let response = app
        .clone()
        .oneshot(Request::builder().uri(&url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], &[9, 8, 7]);

    let id = form.id;
    drop(form);
    handle.sessions().remove(&id).await;
    let (status, _) = get(&app, &url).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
