// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use idp_server_auth::hash_token;

use super::support::*;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";

#[tokio::test]
async fn unauthenticated_visit_redirects_to_login() {
	let app = spawn_app().await;

	let response = app.get("/profile?client_id=c1", None).await;

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(
		location(&response),
		"/login?client_id=c1&return_to=%2Fprofile%3Fclient_id%3Dc1"
	);
}

#[tokio::test]
async fn expired_session_is_rejected_and_deleted() {
	let app = spawn_app().await;
	let cookie = app.register("alice@example.com").await;
	let token = cookie.split_once('=').unwrap().1;
	sqlx::query("UPDATE sessions SET expires_at = ?")
		.bind((Utc::now() - Duration::hours(1)).to_rfc3339())
		.execute(&app.state.pool)
		.await
		.unwrap();

	let response = app.get("/profile?client_id=c1", Some(&cookie)).await;

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert!(location(&response).starts_with("/login?client_id=c1"));
	assert!(app
		.state
		.session_repo
		.get_session_by_token_hash(&hash_token(token))
		.await
		.unwrap()
		.is_none());
}

#[tokio::test]
async fn update_with_picture() {
	let app = spawn_app().await;
	let cookie = app.register("alice@example.com").await;

	let response = app
		.post_multipart(
			"/profile?client_id=c1",
			&[
				MultipartPart::Text("display_name", "Alice Liddell"),
				MultipartPart::Text("locale", "en-GB"),
				MultipartPart::File {
					name: "picture",
					file_name: "me.png",
					content_type: "image/png",
					bytes: PNG,
				},
			],
			&cookie,
		)
		.await;

	assert_eq!(response.status(), StatusCode::OK);
	let html = body_string(response).await;
	assert!(html.contains("Your profile has been updated."));
	assert!(html.contains("Alice Liddell"));

	let user = app
		.state
		.user_repo
		.get_user_by_email("alice@example.com")
		.await
		.unwrap()
		.unwrap();
	assert_eq!(user.display_name, "Alice Liddell");
	assert_eq!(user.locale.as_deref(), Some("en-GB"));
	let picture_url = user.picture_url.expect("picture stored");
	assert!(picture_url.starts_with("/uploads/"));

	let file_name = picture_url.trim_start_matches("/uploads/");
	let stored = std::fs::read(app.dir.path().join("uploads").join(file_name)).unwrap();
	assert_eq!(stored, PNG);

	let served = app.get(&picture_url, None).await;
	assert_eq!(served.status(), StatusCode::OK);
}

#[tokio::test]
async fn replacing_picture_removes_previous_file() {
	let app = spawn_app().await;
	let cookie = app.register("alice@example.com").await;

	for _ in 0..2 {
		let response = app
			.post_multipart(
				"/profile?client_id=c1",
				&[
					MultipartPart::Text("display_name", "Alice"),
					MultipartPart::File {
						name: "picture",
						file_name: "me.png",
						content_type: "image/png",
						bytes: PNG,
					},
				],
				&cookie,
			)
			.await;
		assert_eq!(response.status(), StatusCode::OK);
	}

	let user = app
		.state
		.user_repo
		.get_user_by_email("alice@example.com")
		.await
		.unwrap()
		.unwrap();
	let picture_url = user.picture_url.unwrap();
	let files: Vec<_> = std::fs::read_dir(app.dir.path().join("uploads"))
		.unwrap()
		.map(|entry| entry.unwrap().file_name().into_string().unwrap())
		.collect();
	assert_eq!(files, vec![picture_url.trim_start_matches("/uploads/").to_string()]);
}

#[tokio::test]
async fn update_without_picture_keeps_existing() {
	let app = spawn_app().await;
	let cookie = app.register("alice@example.com").await;

	let response = app
		.post_multipart(
			"/profile?client_id=c1",
			&[
				MultipartPart::Text("display_name", "Al"),
				MultipartPart::Text("locale", ""),
				MultipartPart::File {
					name: "picture",
					file_name: "",
					content_type: "application/octet-stream",
					bytes: b"",
				},
			],
			&cookie,
		)
		.await;

	assert_eq!(response.status(), StatusCode::OK);
	let user = app
		.state
		.user_repo
		.get_user_by_email("alice@example.com")
		.await
		.unwrap()
		.unwrap();
	assert_eq!(user.display_name, "Al");
	assert!(user.locale.is_none());
	assert!(user.picture_url.is_none());
}

#[tokio::test]
async fn invalid_fields_are_reported() {
	let app = spawn_app().await;
	let cookie = app.register("alice@example.com").await;

	let response = app
		.post_multipart(
			"/profile?client_id=c1",
			&[
				MultipartPart::Text("display_name", "   "),
				MultipartPart::Text("locale", "english"),
				MultipartPart::File {
					name: "picture",
					file_name: "evil.svg",
					content_type: "image/svg+xml",
					bytes: b"<svg/>",
				},
			],
			&cookie,
		)
		.await;

	assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
	let html = body_string(response).await;
	assert!(html.contains("Display name is required"));
	assert!(html.contains("Locale must look like"));
	assert!(html.contains("Picture must be a PNG, JPEG, GIF or WebP image"));
}

#[tokio::test]
async fn oversized_picture_is_reported() {
	let app = spawn_app().await;
	let cookie = app.register("alice@example.com").await;
	let big = vec![0u8; 2048];

	let response = app
		.post_multipart(
			"/profile?client_id=c1",
			&[
				MultipartPart::Text("display_name", "Alice"),
				MultipartPart::File {
					name: "picture",
					file_name: "big.png",
					content_type: "image/png",
					bytes: &big,
				},
			],
			&cookie,
		)
		.await;

	assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
	assert!(body_string(response).await.contains("Picture must be at most 1 KB"));
}
