// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use idp_server_auth::{hash_token, PasswordResetToken};

use super::support::*;

const NEW_PASSWORD: &str = "new staple battery";

fn token_from_email(text: &str) -> String {
	let start = text.find("token=").expect("reset link in email") + "token=".len();
	text[start..]
		.split(|c: char| c == '&' || c.is_whitespace())
		.next()
		.unwrap()
		.to_string()
}

mod change {
	use super::*;

	#[tokio::test]
	async fn requires_login() {
		let app = spawn_app().await;

		let response = app.get("/password/change?client_id=c1", None).await;

		assert_eq!(response.status(), StatusCode::SEE_OTHER);
		assert_eq!(
			location(&response),
			"/login?client_id=c1&return_to=%2Fpassword%2Fchange%3Fclient_id%3Dc1"
		);
	}

	#[tokio::test]
	async fn wrong_current_password_is_rejected() {
		let app = spawn_app().await;
		let cookie = app.register("alice@example.com").await;

		let response = app
			.post_form(
				"/password/change?client_id=c1",
				&[
					("current_password", "wrong"),
					("password", NEW_PASSWORD),
					("password_confirmation", NEW_PASSWORD),
				],
				Some(&cookie),
			)
			.await;

		assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
		assert!(body_string(response).await.contains("Current password is incorrect"));
	}

	#[tokio::test]
	async fn success_revokes_other_sessions_only() {
		let app = spawn_app().await;
		let current = app.register("alice@example.com").await;
		let other = session_cookie(&app.login("alice@example.com", PASSWORD).await).unwrap();

		let response = app
			.post_form(
				"/password/change?client_id=c1",
				&[
					("current_password", PASSWORD),
					("password", NEW_PASSWORD),
					("password_confirmation", NEW_PASSWORD),
				],
				Some(&current),
			)
			.await;

		assert_eq!(response.status(), StatusCode::OK);
		assert!(body_string(response).await.contains("Password changed"));

		let still_in = app.get("/profile?client_id=c1", Some(&current)).await;
		assert_eq!(still_in.status(), StatusCode::OK);
		let signed_out = app.get("/profile?client_id=c1", Some(&other)).await;
		assert_eq!(signed_out.status(), StatusCode::SEE_OTHER);

		let relogin = app.login("alice@example.com", NEW_PASSWORD).await;
		assert_eq!(relogin.status(), StatusCode::SEE_OTHER);
	}
}

mod reset {
	use super::*;

	#[tokio::test]
	async fn unknown_email_gets_same_message_and_no_email() {
		let app = spawn_app().await;

		let response = app
			.post_form(
				"/password/forgot",
				&[("client_id", CLIENT_ID), ("email", "nobody@example.com")],
				None,
			)
			.await;

		assert_eq!(response.status(), StatusCode::OK);
		assert!(body_string(response).await.contains("If an account exists"));
		assert!(app.emails.sent().is_empty());
	}

	#[tokio::test]
	async fn malformed_email_rerenders_form() {
		let app = spawn_app().await;

		let response = app
			.post_form(
				"/password/forgot",
				&[("client_id", CLIENT_ID), ("email", "bad")],
				None,
			)
			.await;

		assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
		let html = body_string(response).await;
		assert!(html.contains(r#"<main class="auth">"#));
		assert!(html.contains("Enter a valid email address"));
	}

	#[tokio::test]
	async fn full_reset_flow() {
		let app = spawn_app().await;
		let old_session = app.register("alice@example.com").await;

		let response = app
			.post_form(
				"/password/forgot",
				&[("client_id", CLIENT_ID), ("email", "alice@example.com")],
				None,
			)
			.await;
		assert_eq!(response.status(), StatusCode::OK);
		assert!(body_string(response).await.contains("If an account exists"));

		let sent = app.emails.sent();
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].to, "alice@example.com");
		assert_eq!(sent[0].subject, "Reset your password");
		assert!(sent[0]
			.text
			.contains("https://id.example.com/password/reset?token="));
		assert!(sent[0].text.contains("client_id=c1"));
		let token = token_from_email(&sent[0].text);

		let form = app
			.get(&format!("/password/reset?token={token}&client_id=c1"), None)
			.await;
		assert_eq!(form.status(), StatusCode::OK);
		assert!(body_string(form).await.contains(&format!(r#"value="{token}""#)));

		let mismatch = app
			.post_form(
				"/password/reset",
				&[
					("client_id", CLIENT_ID),
					("token", &token),
					("password", NEW_PASSWORD),
					("password_confirmation", "something else"),
				],
				None,
			)
			.await;
		assert_eq!(mismatch.status(), StatusCode::UNPROCESSABLE_ENTITY);

		let done = app
			.post_form(
				"/password/reset",
				&[
					("client_id", CLIENT_ID),
					("token", &token),
					("password", NEW_PASSWORD),
					("password_confirmation", NEW_PASSWORD),
				],
				None,
			)
			.await;
		assert_eq!(done.status(), StatusCode::SEE_OTHER);
		assert_eq!(location(&done), "/login?client_id=c1");

		let revoked = app.get("/profile?client_id=c1", Some(&old_session)).await;
		assert_eq!(revoked.status(), StatusCode::SEE_OTHER);
		assert_eq!(
			app.login("alice@example.com", PASSWORD).await.status(),
			StatusCode::UNAUTHORIZED
		);
		assert_eq!(
			app.login("alice@example.com", NEW_PASSWORD).await.status(),
			StatusCode::SEE_OTHER
		);

		let reused = app
			.post_form(
				"/password/reset",
				&[
					("client_id", CLIENT_ID),
					("token", &token),
					("password", PASSWORD),
					("password_confirmation", PASSWORD),
				],
				None,
			)
			.await;
		assert_eq!(reused.status(), StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn second_request_invalidates_first_token() {
		let app = spawn_app().await;
		app.register("alice@example.com").await;
		for _ in 0..2 {
			app.post_form(
				"/password/forgot",
				&[("client_id", CLIENT_ID), ("email", "alice@example.com")],
				None,
			)
			.await;
		}

		let sent = app.emails.sent();
		assert_eq!(sent.len(), 2);
		let first = token_from_email(&sent[0].text);
		let second = token_from_email(&sent[1].text);

		let stale = app
			.get(&format!("/password/reset?token={first}&client_id=c1"), None)
			.await;
		assert_eq!(stale.status(), StatusCode::BAD_REQUEST);
		let fresh = app
			.get(&format!("/password/reset?token={second}&client_id=c1"), None)
			.await;
		assert_eq!(fresh.status(), StatusCode::OK);
	}

	#[tokio::test]
	async fn expired_token_is_rejected() {
		let app = spawn_app().await;
		app.register("alice@example.com").await;
		let user = app
			.state
			.user_repo
			.get_user_by_email("alice@example.com")
			.await
			.unwrap()
			.unwrap();
		let (token, mut record) = PasswordResetToken::issue(user.id, 60);
		record.expires_at = chrono::Utc::now() - chrono::Duration::minutes(1);
		assert_eq!(record.token_hash, hash_token(&token));
		app.state.reset_repo.create_reset_token(&record).await.unwrap();

		let response = app
			.get(&format!("/password/reset?token={token}&client_id=c1"), None)
			.await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert!(body_string(response).await.contains("invalid or has expired"));
	}

	#[tokio::test]
	async fn unknown_token_is_rejected() {
		let app = spawn_app().await;

		let response = app
			.get("/password/reset?token=deadbeef&client_id=c1", None)
			.await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}
}
