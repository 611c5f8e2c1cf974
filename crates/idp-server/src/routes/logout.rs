// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	extract::{Query, State},
	http::{HeaderMap, StatusCode},
	response::{Html, IntoResponse, Redirect, Response},
};
use idp_server_auth::clear_session_cookie;
use idp_server_theme::pages;
use serde::Deserialize;

use crate::api::AppState;
use crate::auth_middleware::{authenticate, cookie_options, with_cookie};
use crate::error::ServerError;
use crate::pages::{find_client, render_page, PageContext};
use crate::redirect::post_logout_target;

#[derive(Debug, Deserialize)]
pub struct LogoutQuery {
	#[serde(default)]
	pub client_id: String,
	#[serde(default)]
	pub post_logout_redirect_uri: Option<String>,
}

/// Ends the current session. The cookie is cleared even when no session
/// matched, deleting it failed, or the client could not be looked up.
#[tracing::instrument(skip(state, headers))]
pub async fn logout(
	State(state): State<AppState>,
	Query(query): Query<LogoutQuery>,
	headers: HeaderMap,
) -> Response {
	match authenticate(&headers, &state).await {
		Ok(Some(current)) => {
			match state.session_repo.delete_session(&current.session_id).await {
				Ok(_) => tracing::info!(user_id = %current.user.id, "user logged out"),
				Err(e) => tracing::warn!(error = %e, "failed to delete session during logout"),
			}
		}
		Ok(None) => {}
		Err(e) => tracing::warn!(error = %e, "failed to resolve session during logout"),
	}

	let clear = clear_session_cookie(&cookie_options(&state.auth_config));

	let client = match find_client(&state, &query.client_id).await {
		Ok(client) => client,
		Err(e) => {
			tracing::warn!(error = %e, "failed to look up client during logout");
			None
		}
	};

	if let Some(target) = client
		.as_ref()
		.and_then(|client| post_logout_target(client, query.post_logout_redirect_uri.as_deref()))
	{
		return with_cookie(&clear, Redirect::to(&target));
	}

	let page = match client {
		Some(client) => {
			let context = PageContext::new(&client.id, None);
			render_page(&state, StatusCode::OK, &client.id, pages::LOGOUT, context).await
		}
		None => render_default_logout(&state).await,
	};
	match page {
		Ok(page) => with_cookie(&clear, page),
		Err(e) => with_cookie(&clear, e),
	}
}

async fn render_default_logout(state: &AppState) -> Result<Response, ServerError> {
	let context = PageContext::new("", None).into_value();
	let html = state.themes.render_default(pages::LOGOUT, &context).await?;
	Ok((StatusCode::OK, Html(html)).into_response())
}
