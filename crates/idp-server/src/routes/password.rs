// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password change (signed in) and password reset by email link.

use axum::{
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Redirect, Response},
	Form,
};
use idp_common_secret::SecretString;
use idp_server_auth::{
	hash_password, hash_token,
	validation::{validate_email, validate_new_password},
	verify_password, FormErrors, PasswordResetToken,
};
use idp_server_smtp::PasswordResetEmail;
use idp_server_theme::pages;
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::auth_middleware::RequireUser;
use crate::error::ServerError;
use crate::pages::{
	find_client, render_error, render_message, render_page, unknown_client, ClientQuery,
	PageContext,
};
use crate::redirect::{login_url, with_query};

const RESET_LINK_SENT: &str =
	"If an account exists for that address, we've sent a link to reset your password.";
const RESET_LINK_INVALID: &str = "This password reset link is invalid or has expired.";

#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
	#[serde(default)]
	pub current_password: SecretString,
	#[serde(default)]
	pub password: SecretString,
	#[serde(default)]
	pub password_confirmation: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
	#[serde(default)]
	pub client_id: String,
	#[serde(default)]
	pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetQuery {
	#[serde(default)]
	pub client_id: String,
	#[serde(default)]
	pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
	#[serde(default)]
	pub client_id: String,
	#[serde(default)]
	pub token: String,
	#[serde(default)]
	pub password: SecretString,
	#[serde(default)]
	pub password_confirmation: SecretString,
}

// Change

#[tracing::instrument(skip(state, current), fields(user_id = %current.user.id))]
pub async fn show_change(
	State(state): State<AppState>,
	RequireUser(current): RequireUser,
	Query(query): Query<ClientQuery>,
) -> Result<Response, ServerError> {
	let context = PageContext::new(&query.client_id, None).with("user", current.user.to_context());
	render_page(
		&state,
		StatusCode::OK,
		&query.client_id,
		pages::CHANGE_PASSWORD,
		context,
	)
	.await
}

#[tracing::instrument(skip(state, current, form), fields(user_id = %current.user.id))]
pub async fn submit_change(
	State(state): State<AppState>,
	RequireUser(current): RequireUser,
	Query(query): Query<ClientQuery>,
	Form(form): Form<ChangePasswordForm>,
) -> Result<Response, ServerError> {
	let mut errors = FormErrors::new();
	if !verify_password(&form.current_password, &current.user.password_hash) {
		errors.add("current_password", "Current password is incorrect");
	}
	validate_new_password(
		&form.password,
		&form.password_confirmation,
		state.auth_config.min_password_length,
		&mut errors,
	);

	if !errors.is_empty() {
		let context = PageContext::new(&query.client_id, None)
			.errors(errors)
			.with("user", current.user.to_context());
		return render_page(
			&state,
			StatusCode::UNPROCESSABLE_ENTITY,
			&query.client_id,
			pages::CHANGE_PASSWORD,
			context,
		)
		.await;
	}

	let password_hash = hash_password(&form.password)?;
	state
		.user_repo
		.update_password_hash(&current.user.id, &password_hash)
		.await?;
	let revoked = state
		.session_repo
		.delete_other_sessions_for_user(&current.user.id, &current.session_id)
		.await?;
	tracing::info!(revoked, "password changed");

	render_message(
		&state,
		&query.client_id,
		"Password changed",
		"Your password has been changed. Other devices have been signed out.",
	)
	.await
}

// Forgot

#[tracing::instrument(skip(state))]
pub async fn show_forgot(
	State(state): State<AppState>,
	Query(query): Query<ClientQuery>,
) -> Result<Response, ServerError> {
	let context = PageContext::new(&query.client_id, None);
	render_page(
		&state,
		StatusCode::OK,
		&query.client_id,
		pages::FORGOT_PASSWORD,
		context,
	)
	.await
}

/// Always answers with the same message whether or not the account exists.
#[tracing::instrument(skip(state, form), fields(client_id = %form.client_id))]
pub async fn submit_forgot(
	State(state): State<AppState>,
	Form(form): Form<ForgotPasswordForm>,
) -> Result<Response, ServerError> {
	if find_client(&state, &form.client_id).await?.is_none() {
		return unknown_client(&state, &form.client_id).await;
	}

	let mut errors = FormErrors::new();
	let email = validate_email(&form.email, &mut errors);
	if !errors.is_empty() {
		let context = PageContext::new(&form.client_id, None)
			.errors(errors)
			.values(json!({ "email": email }));
		return render_page(
			&state,
			StatusCode::UNPROCESSABLE_ENTITY,
			&form.client_id,
			pages::FORGOT_PASSWORD,
			context,
		)
		.await;
	}

	if let Some(user) = state.user_repo.get_user_by_email(&email).await? {
		state
			.reset_repo
			.invalidate_reset_tokens_for_user(&user.id)
			.await?;
		let ttl_minutes = state.auth_config.password_reset_ttl_minutes;
		let (token, record) = PasswordResetToken::issue(user.id, ttl_minutes);
		state.reset_repo.create_reset_token(&record).await?;

		let reset_url = with_query(
			&format!("{}/password/reset", state.base_url),
			&[("token", &token), ("client_id", &form.client_id)],
		);
		let message = PasswordResetEmail {
			display_name: &user.display_name,
			reset_url: &reset_url,
			ttl_minutes,
		};

		match &state.email {
			Some(sender) => {
				if let Err(e) = sender
					.send_email(&user.email, message.subject(), &message.html(), &message.text())
					.await
				{
					tracing::error!(error = %e, user_id = %user.id, "failed to send password reset email");
				}
			}
			None => {
				tracing::warn!(user_id = %user.id, "SMTP not configured, password reset email not sent");
			}
		}
	} else {
		tracing::debug!("password reset requested for unknown email");
	}

	render_message(&state, &form.client_id, "Check your email", RESET_LINK_SENT).await
}

// Reset

async fn usable_token(
	state: &AppState,
	token: &str,
) -> Result<Option<PasswordResetToken>, ServerError> {
	if token.is_empty() {
		return Ok(None);
	}
	let record = state
		.reset_repo
		.get_reset_token_by_hash(&hash_token(token))
		.await?;
	Ok(record.filter(PasswordResetToken::is_usable))
}

#[tracing::instrument(skip(state, query), fields(client_id = %query.client_id))]
pub async fn show_reset(
	State(state): State<AppState>,
	Query(query): Query<ResetQuery>,
) -> Result<Response, ServerError> {
	if usable_token(&state, &query.token).await?.is_none() {
		return render_error(
			&state,
			StatusCode::BAD_REQUEST,
			&query.client_id,
			RESET_LINK_INVALID,
		)
		.await;
	}
	let context = PageContext::new(&query.client_id, None).with("token", &query.token);
	render_page(
		&state,
		StatusCode::OK,
		&query.client_id,
		pages::RESET_PASSWORD,
		context,
	)
	.await
}

#[tracing::instrument(skip(state, form), fields(client_id = %form.client_id))]
pub async fn submit_reset(
	State(state): State<AppState>,
	Form(form): Form<ResetPasswordForm>,
) -> Result<Response, ServerError> {
	let Some(record) = usable_token(&state, &form.token).await? else {
		return render_error(
			&state,
			StatusCode::BAD_REQUEST,
			&form.client_id,
			RESET_LINK_INVALID,
		)
		.await;
	};

	let mut errors = FormErrors::new();
	validate_new_password(
		&form.password,
		&form.password_confirmation,
		state.auth_config.min_password_length,
		&mut errors,
	);
	if !errors.is_empty() {
		let context = PageContext::new(&form.client_id, None)
			.errors(errors)
			.with("token", &form.token);
		return render_page(
			&state,
			StatusCode::UNPROCESSABLE_ENTITY,
			&form.client_id,
			pages::RESET_PASSWORD,
			context,
		)
		.await;
	}

	let password_hash = hash_password(&form.password)?;
	// A concurrent submit with the same token loses here.
	if !state
		.reset_repo
		.redeem_reset_token(&record, &password_hash)
		.await?
	{
		return render_error(
			&state,
			StatusCode::BAD_REQUEST,
			&form.client_id,
			RESET_LINK_INVALID,
		)
		.await;
	}

	let revoked = state
		.session_repo
		.delete_all_sessions_for_user(&record.user_id)
		.await?;
	tracing::info!(user_id = %record.user_id, revoked, "password reset");

	Ok(Redirect::to(&login_url(&form.client_id, None)).into_response())
}
