// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;

use super::support::*;

#[tokio::test]
async fn registered_post_logout_uri_is_followed() {
	let app = spawn_app().await;
	let cookie = app.register("alice@example.com").await;

	let response = app
		.get(
			"/logout?client_id=c1&post_logout_redirect_uri=https%3A%2F%2Fapp.example.com%2Fbye",
			Some(&cookie),
		)
		.await;

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(location(&response), POST_LOGOUT_URI);
	let cleared = set_cookie(&response).unwrap();
	assert!(cleared.starts_with("idp_session=;"));
	assert!(cleared.contains("Max-Age=0"));
	assert!(cleared.contains("HttpOnly"));
	assert!(cleared.contains("SameSite=Lax"));

	let after = app.get("/profile?client_id=c1", Some(&cookie)).await;
	assert_eq!(after.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn unregistered_uri_renders_logout_page() {
	let app = spawn_app().await;
	let cookie = app.register("alice@example.com").await;

	let response = app
		.get(
			"/logout?client_id=c1&post_logout_redirect_uri=https%3A%2F%2Fevil.example.com",
			Some(&cookie),
		)
		.await;

	assert_eq!(response.status(), StatusCode::OK);
	assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
	assert!(body_string(response).await.contains("You have signed out"));
}

#[tokio::test]
async fn logout_without_session_still_clears_cookie() {
	let app = spawn_app().await;

	let response = app.get("/logout?client_id=c1", Some("idp_session=stale")).await;

	assert_eq!(response.status(), StatusCode::OK);
	assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn logout_without_client_renders_default_page() {
	let app = spawn_app().await;
	let cookie = app.register("alice@example.com").await;

	let response = app.get("/logout", Some(&cookie)).await;

	assert_eq!(response.status(), StatusCode::OK);
	assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
	assert!(body_string(response).await.contains("You have signed out"));

	let after = app.get("/profile?client_id=c1", Some(&cookie)).await;
	assert_eq!(after.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn logout_clears_cookie_when_database_is_unavailable() {
	let app = spawn_app().await;
	let cookie = app.register("alice@example.com").await;
	app.state.pool.close().await;

	let response = app
		.get(
			"/logout?client_id=c1&post_logout_redirect_uri=https%3A%2F%2Fapp.example.com%2Fbye",
			Some(&cookie),
		)
		.await;

	assert_eq!(response.status(), StatusCode::OK);
	assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
	assert!(body_string(response).await.contains("You have signed out"));
}
