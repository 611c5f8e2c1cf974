// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use serde_json::json;

use super::support::*;

#[tokio::test]
async fn themed_client_gets_its_template_and_layout() {
	let app = spawn_app().await;

	let response = app.get("/password/forgot?client_id=themed", None).await;

	assert_eq!(response.status(), StatusCode::OK);
	let html = body_string(response).await;
	assert_eq!(
		html,
		r#"<div class="brand"><p class="themed">Reset for themed</p></div>"#
	);
}

#[tokio::test]
async fn themed_client_falls_back_for_pages_it_does_not_override() {
	let app = spawn_app().await;

	let response = app.get("/login?client_id=themed", None).await;

	assert_eq!(response.status(), StatusCode::OK);
	let html = body_string(response).await;
	assert!(html.contains(r#"<main class="auth">"#));
	assert!(html.contains(r#"action="/login""#));
}

#[tokio::test]
async fn themed_errors_reach_the_override() {
	let app = spawn_app().await;

	let response = app
		.post_form(
			"/password/forgot",
			&[("client_id", THEMED_CLIENT_ID), ("email", "bad")],
			None,
		)
		.await;

	assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
	let html = body_string(response).await;
	assert!(html.starts_with(r#"<div class="brand">"#));
	assert!(html.contains("<b>Enter a valid email address</b>"));
}

#[tokio::test]
async fn client_without_theme_resolves_to_default() {
	let app = spawn_app().await;
	let themes = &app.state.themes;

	assert!(themes
		.fetch_template(CLIENT_ID, "forgot-password")
		.await
		.unwrap()
		.is_none());

	let context = json!({ "email": ["bad"] });
	let themed = themes
		.get_themed_template(CLIENT_ID, "forgot-password", &context)
		.await
		.unwrap();
	assert!(themed.template.is_none());
	assert_eq!(
		themed.rendered,
		themes
			.render_themed_template(CLIENT_ID, "forgot-password", &context)
			.await
			.unwrap()
	);
	assert!(themed.rendered.contains(r#"<main class="auth">"#));
	assert!(themed.rendered.contains(r#"action="/password/forgot""#));
}
