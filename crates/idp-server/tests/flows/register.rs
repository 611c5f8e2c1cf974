// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;

use super::support::*;

fn form<'a>(email: &'a str, password: &'a str, confirmation: &'a str) -> Vec<(&'a str, &'a str)> {
	vec![
		("client_id", CLIENT_ID),
		("email", email),
		("display_name", "Alice"),
		("password", password),
		("password_confirmation", confirmation),
	]
}

#[tokio::test]
async fn renders_default_register_page() {
	let app = spawn_app().await;

	let response = app.get("/register?client_id=c1&return_to=/profile", None).await;

	assert_eq!(response.status(), StatusCode::OK);
	let html = body_string(response).await;
	assert!(html.contains(r#"<main class="auth">"#));
	assert!(html.contains(r#"action="/register""#));
	assert!(html.contains(r#"name="client_id" value="c1""#));
	assert!(html.contains(r#"name="return_to" value="/profile""#));
}

#[tokio::test]
async fn missing_client_id_is_rejected() {
	let app = spawn_app().await;

	let response = app.get("/register", None).await;

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert!(body_string(response).await.contains("client_id is required"));
}

#[tokio::test]
async fn unknown_client_is_rejected() {
	let app = spawn_app().await;

	let response = app.get("/register?client_id=nope", None).await;

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert!(body_string(response).await.contains("Unknown client"));
}

#[tokio::test]
async fn successful_registration_starts_session_and_redirects() {
	let app = spawn_app().await;

	let response = app
		.post_form("/register", &form(" Alice@Example.com ", PASSWORD, PASSWORD), None)
		.await;

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(location(&response), "/profile?client_id=c1");
	let cookie = set_cookie(&response).unwrap();
	assert!(cookie.starts_with("idp_session="));
	assert!(cookie.contains("HttpOnly"));
	assert!(cookie.contains("SameSite=Lax"));
	assert!(cookie.contains("Secure"));

	let user = app
		.state
		.user_repo
		.get_user_by_email("alice@example.com")
		.await
		.unwrap()
		.expect("user stored with normalized email");
	assert_eq!(user.display_name, "Alice");
	assert_ne!(user.password_hash, PASSWORD);
}

#[tokio::test]
async fn registered_redirect_uri_is_followed() {
	let app = spawn_app().await;
	let mut fields = form("bob@example.com", PASSWORD, PASSWORD);
	fields.push(("return_to", REDIRECT_URI));

	let response = app.post_form("/register", &fields, None).await;

	assert_eq!(location(&response), REDIRECT_URI);
}

#[tokio::test]
async fn unregistered_return_to_falls_back_to_profile() {
	let app = spawn_app().await;
	let mut fields = form("carol@example.com", PASSWORD, PASSWORD);
	fields.push(("return_to", "https://evil.example.com/"));

	let response = app.post_form("/register", &fields, None).await;

	assert_eq!(location(&response), "/profile?client_id=c1");
}

#[tokio::test]
async fn invalid_form_is_rerendered_with_errors_and_values() {
	let app = spawn_app().await;

	let response = app
		.post_form("/register", &form("not-an-email", "short", "different"), None)
		.await;

	assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
	assert!(set_cookie(&response).is_none());
	let html = body_string(response).await;
	assert!(html.contains("Enter a valid email address"));
	assert!(html.contains("Password must be at least 8 characters"));
	assert!(html.contains("Passwords do not match"));
	assert!(html.contains(r#"value="not-an-email""#));
	assert!(!html.contains("different"));
}

#[tokio::test]
async fn duplicate_email_is_reported() {
	let app = spawn_app().await;
	app.register("dup@example.com").await;

	let response = app
		.post_form("/register", &form("DUP@example.com", PASSWORD, PASSWORD), None)
		.await;

	assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
	assert!(body_string(response).await.contains("Email is already registered"));
}

#[tokio::test]
async fn signups_disabled_is_forbidden() {
	let app = spawn_app_with(|config| config.auth.signups_disabled = true).await;

	let page = app.get("/register?client_id=c1", None).await;
	assert_eq!(page.status(), StatusCode::FORBIDDEN);

	let submit = app
		.post_form("/register", &form("dan@example.com", PASSWORD, PASSWORD), None)
		.await;
	assert_eq!(submit.status(), StatusCode::FORBIDDEN);
	assert!(body_string(submit).await.contains("Registration is currently closed"));
}
