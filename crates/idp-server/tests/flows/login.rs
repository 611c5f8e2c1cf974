// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;

use super::support::*;

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
	let app = spawn_app().await;
	app.register("alice@example.com").await;

	let wrong = app.login("alice@example.com", "not the password").await;
	let unknown = app.login("nobody@example.com", PASSWORD).await;

	assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
	assert!(set_cookie(&wrong).is_none());
	assert!(body_string(wrong).await.contains("Invalid email or password"));
	assert!(body_string(unknown).await.contains("Invalid email or password"));
}

#[tokio::test]
async fn successful_login_sets_cookie_for_profile() {
	let app = spawn_app().await;
	app.register("alice@example.com").await;

	let response = app.login("Alice@Example.com", PASSWORD).await;

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(location(&response), "/profile?client_id=c1");
	let cookie = session_cookie(&response).unwrap();

	let profile = app.get("/profile?client_id=c1", Some(&cookie)).await;
	assert_eq!(profile.status(), StatusCode::OK);
	assert!(body_string(profile).await.contains("alice@example.com"));
}

#[tokio::test]
async fn login_page_keeps_return_to() {
	let app = spawn_app().await;

	let response = app
		.get("/login?client_id=c1&return_to=%2Fpassword%2Fchange", None)
		.await;

	assert_eq!(response.status(), StatusCode::OK);
	let html = body_string(response).await;
	assert!(html.contains(r#"name="return_to" value="/password/change""#));
}
