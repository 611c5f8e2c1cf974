// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account registration.

use axum::{
	extract::{Query, State},
	http::StatusCode,
	response::{Redirect, Response},
	Form,
};
use idp_common_secret::SecretString;
use idp_server_auth::{
	hash_password,
	validation::{validate_display_name, validate_email, validate_new_password},
	FormErrors, User,
};
use idp_server_db::DbError;
use idp_server_theme::pages;
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::auth_middleware::{start_session, with_cookie};
use crate::error::ServerError;
use crate::pages::{find_client, render_error, render_page, unknown_client, ClientQuery, PageContext};
use crate::redirect::resolve_return_to;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
	#[serde(default)]
	pub client_id: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub display_name: String,
	#[serde(default)]
	pub password: SecretString,
	#[serde(default)]
	pub password_confirmation: SecretString,
	#[serde(default)]
	pub return_to: Option<String>,
}

const SIGNUPS_DISABLED: &str = "Registration is currently closed.";

#[tracing::instrument(skip(state))]
pub async fn show(
	State(state): State<AppState>,
	Query(query): Query<ClientQuery>,
) -> Result<Response, ServerError> {
	if state.auth_config.signups_disabled {
		return render_error(&state, StatusCode::FORBIDDEN, &query.client_id, SIGNUPS_DISABLED).await;
	}
	let context = PageContext::new(&query.client_id, query.return_to.as_deref());
	render_page(&state, StatusCode::OK, &query.client_id, pages::REGISTER, context).await
}

#[tracing::instrument(skip(state, form), fields(client_id = %form.client_id))]
pub async fn submit(
	State(state): State<AppState>,
	Form(form): Form<RegisterForm>,
) -> Result<Response, ServerError> {
	if state.auth_config.signups_disabled {
		return render_error(&state, StatusCode::FORBIDDEN, &form.client_id, SIGNUPS_DISABLED).await;
	}
	let Some(client) = find_client(&state, &form.client_id).await? else {
		return unknown_client(&state, &form.client_id).await;
	};

	let mut errors = FormErrors::new();
	let email = validate_email(&form.email, &mut errors);
	let display_name = validate_display_name(&form.display_name, &mut errors);
	validate_new_password(
		&form.password,
		&form.password_confirmation,
		state.auth_config.min_password_length,
		&mut errors,
	);
	if !errors.has("email") && state.user_repo.get_user_by_email(&email).await?.is_some() {
		errors.add("email", "Email is already registered");
	}

	let rerender = |errors: FormErrors| {
		PageContext::new(&form.client_id, form.return_to.as_deref())
			.errors(errors)
			.values(json!({ "email": email, "display_name": display_name }))
	};

	if !errors.is_empty() {
		let context = rerender(errors);
		return render_page(
			&state,
			StatusCode::UNPROCESSABLE_ENTITY,
			&form.client_id,
			pages::REGISTER,
			context,
		)
		.await;
	}

	let password_hash = hash_password(&form.password)?;
	let user = User::new(email.clone(), display_name.clone(), password_hash);
	match state.user_repo.create_user(&user).await {
		Ok(()) => {}
		Err(DbError::Conflict(_)) => {
			let context = rerender(FormErrors::single("email", "Email is already registered"));
			return render_page(
				&state,
				StatusCode::UNPROCESSABLE_ENTITY,
				&form.client_id,
				pages::REGISTER,
				context,
			)
			.await;
		}
		Err(e) => return Err(e.into()),
	}
	tracing::info!(user_id = %user.id, "user registered");

	let cookie = start_session(&state, user.id).await?;
	let target = resolve_return_to(&client, form.return_to.as_deref());
	Ok(with_cookie(&cookie, Redirect::to(&target)))
}
