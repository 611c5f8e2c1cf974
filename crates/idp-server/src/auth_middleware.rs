// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session authentication for the account pages.
//!
//! The browser holds a random token in the session cookie; only its SHA-256
//! is stored. [`RequireUser`] resolves the cookie to a user and sends anyone
//! without a live session to the login page, carrying `client_id` and the
//! current path as `return_to`.

use axum::{
	extract::FromRequestParts,
	http::{header::SET_COOKIE, request::Parts, HeaderMap, HeaderValue},
	response::{IntoResponse, Redirect, Response},
};
use idp_server_auth::{
	extract_session_cookie_with_name, hash_token, session_cookie, Session, SessionCookieOptions,
	SessionId, User, UserId, MAX_SESSION_LIFETIME_DAYS,
};
use idp_server_config::AuthConfig;
use tracing::instrument;
use url::form_urlencoded;

use crate::api::AppState;
use crate::error::ServerError;
use crate::redirect::login_url;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct CurrentUser {
	pub user: User,
	pub session_id: SessionId,
}

pub fn cookie_options(config: &AuthConfig) -> SessionCookieOptions {
	SessionCookieOptions {
		name: config.session_cookie_name.clone(),
		secure: config.cookie_secure,
		max_age_secs: config
			.session_lifetime_days
			.clamp(1, MAX_SESSION_LIFETIME_DAYS)
			* SECONDS_PER_DAY,
	}
}

/// Look up the session named by the request's cookie.
///
/// Expired sessions are deleted and treated as absent.
#[instrument(skip_all, fields(user_id = tracing::field::Empty))]
pub async fn authenticate(
	headers: &HeaderMap,
	state: &AppState,
) -> Result<Option<CurrentUser>, ServerError> {
	let Some(token) =
		extract_session_cookie_with_name(headers, &state.auth_config.session_cookie_name)
	else {
		return Ok(None);
	};

	let Some(session) = state
		.session_repo
		.get_session_by_token_hash(&hash_token(&token))
		.await?
	else {
		tracing::debug!("session cookie does not match a session");
		return Ok(None);
	};

	if session.is_expired() {
		tracing::debug!(session_id = %session.id, "session expired");
		if let Err(e) = state.session_repo.delete_session(&session.id).await {
			tracing::warn!(error = %e, "failed to delete expired session");
		}
		return Ok(None);
	}

	let Some(user) = state.user_repo.get_user_by_id(&session.user_id).await? else {
		return Ok(None);
	};

	tracing::Span::current().record("user_id", tracing::field::display(&user.id));
	Ok(Some(CurrentUser {
		user,
		session_id: session.id,
	}))
}

/// Persist a new session and return the `Set-Cookie` value for it.
#[instrument(skip(state))]
pub async fn start_session(state: &AppState, user_id: UserId) -> Result<String, ServerError> {
	let (token, session) = Session::issue(user_id, state.auth_config.session_lifetime_days);
	state.session_repo.create_session(&session).await?;
	tracing::info!(session_id = %session.id, "session started");
	Ok(session_cookie(&cookie_options(&state.auth_config), &token))
}

/// Attach a `Set-Cookie` header to a response.
pub fn with_cookie(cookie: &str, response: impl IntoResponse) -> Response {
	let mut response = response.into_response();
	match HeaderValue::from_str(cookie) {
		Ok(value) => {
			response.headers_mut().append(SET_COOKIE, value);
		}
		Err(e) => tracing::error!(error = %e, "invalid Set-Cookie value"),
	}
	response
}

fn login_redirect_for(parts: &Parts) -> String {
	let client_id = parts
		.uri
		.query()
		.and_then(|q| {
			form_urlencoded::parse(q.as_bytes())
				.find(|(key, _)| key == "client_id")
				.map(|(_, value)| value.into_owned())
		})
		.unwrap_or_default();
	let return_to = parts
		.uri
		.path_and_query()
		.map(|p| p.as_str())
		.unwrap_or_else(|| parts.uri.path());
	login_url(&client_id, Some(return_to))
}

/// Extractor for pages that need a signed-in user.
pub struct RequireUser(pub CurrentUser);

impl FromRequestParts<AppState> for RequireUser {
	type Rejection = Response;

	#[instrument(name = "RequireUser::from_request_parts", skip_all)]
	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		match authenticate(&parts.headers, state).await {
			Ok(Some(user)) => Ok(RequireUser(user)),
			Ok(None) => {
				tracing::debug!("authentication required, redirecting to login");
				Err(Redirect::to(&login_redirect_for(parts)).into_response())
			}
			Err(e) => Err(e.into_response()),
		}
	}
}
