// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	extract::{Query, State},
	http::StatusCode,
	response::{Redirect, Response},
	Form,
};
use idp_common_secret::SecretString;
use idp_server_auth::{validation::normalize_email, verify_password, FormErrors};
use idp_server_theme::pages;
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::auth_middleware::{start_session, with_cookie};
use crate::error::ServerError;
use crate::pages::{find_client, render_page, unknown_client, ClientQuery, PageContext};
use crate::redirect::resolve_return_to;

/// Same message for unknown accounts and wrong passwords.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
	#[serde(default)]
	pub client_id: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub password: SecretString,
	#[serde(default)]
	pub return_to: Option<String>,
}

#[tracing::instrument(skip(state))]
pub async fn show(
	State(state): State<AppState>,
	Query(query): Query<ClientQuery>,
) -> Result<Response, ServerError> {
	let context = PageContext::new(&query.client_id, query.return_to.as_deref());
	render_page(&state, StatusCode::OK, &query.client_id, pages::LOGIN, context).await
}

#[tracing::instrument(skip(state, form), fields(client_id = %form.client_id))]
pub async fn submit(
	State(state): State<AppState>,
	Form(form): Form<LoginForm>,
) -> Result<Response, ServerError> {
	let Some(client) = find_client(&state, &form.client_id).await? else {
		return unknown_client(&state, &form.client_id).await;
	};

	let email = normalize_email(&form.email);
	let user = match state.user_repo.get_user_by_email(&email).await? {
		Some(user) if verify_password(&form.password, &user.password_hash) => user,
		_ => {
			tracing::info!("login failed");
			let context = PageContext::new(&form.client_id, form.return_to.as_deref())
				.errors(FormErrors::single("email", INVALID_CREDENTIALS))
				.values(json!({ "email": email }));
			return render_page(
				&state,
				StatusCode::UNAUTHORIZED,
				&form.client_id,
				pages::LOGIN,
				context,
			)
			.await;
		}
	};

	tracing::info!(user_id = %user.id, "user logged in");
	let cookie = start_session(&state, user.id).await?;
	let target = resolve_return_to(&client, form.return_to.as_deref());
	Ok(with_cookie(&cookie, Redirect::to(&target)))
}
