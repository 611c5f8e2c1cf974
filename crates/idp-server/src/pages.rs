// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Building page contexts and turning themed renders into responses.
//!
//! Every page sees `client_id`, `return_to`, `errors` (field to messages) and
//! `values` (echoed form input, never passwords), plus page-specific keys.

use axum::{
	http::StatusCode,
	response::{Html, IntoResponse, Response},
};
use idp_server_auth::FormErrors;
use idp_server_db::Client;
use idp_server_theme::{pages, ThemeError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::api::AppState;
use crate::error::ServerError;

/// `client_id` and `return_to` as they arrive on GET requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientQuery {
	#[serde(default)]
	pub client_id: String,
	#[serde(default)]
	pub return_to: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PageContext {
	fields: Map<String, Value>,
}

impl PageContext {
	pub fn new(client_id: &str, return_to: Option<&str>) -> Self {
		let mut fields = Map::new();
		fields.insert("client_id".into(), Value::String(client_id.to_string()));
		fields.insert(
			"return_to".into(),
			return_to.map_or(Value::Null, |r| Value::String(r.to_string())),
		);
		fields.insert("errors".into(), json!({}));
		fields.insert("values".into(), json!({}));
		Self { fields }
	}

	pub fn errors(mut self, errors: FormErrors) -> Self {
		self.fields.insert("errors".into(), errors.into_context());
		self
	}

	pub fn values(mut self, values: Value) -> Self {
		self.fields.insert("values".into(), values);
		self
	}

	pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
		let value = serde_json::to_value(value).unwrap_or(Value::Null);
		self.fields.insert(key.to_string(), value);
		self
	}

	pub fn into_value(self) -> Value {
		Value::Object(self.fields)
	}
}

/// Render `page` with the client's theme.
///
/// A missing or unknown client renders the default error page with 400.
pub async fn render_page(
	state: &AppState,
	status: StatusCode,
	client_id: &str,
	page: &str,
	context: PageContext,
) -> Result<Response, ServerError> {
	match state
		.themes
		.render_themed_template(client_id, page, &context.into_value())
		.await
	{
		Ok(html) => Ok((status, Html(html)).into_response()),
		Err(ThemeError::MissingClientId) => {
			render_default_error(state, StatusCode::BAD_REQUEST, "A client_id is required.").await
		}
		Err(ThemeError::ClientNotFound(client_id)) => {
			tracing::debug!(%client_id, "unknown client");
			render_default_error(state, StatusCode::BAD_REQUEST, "Unknown client.").await
		}
		Err(e) => Err(e.into()),
	}
}

/// Themed `error` page.
pub async fn render_error(
	state: &AppState,
	status: StatusCode,
	client_id: &str,
	message: &str,
) -> Result<Response, ServerError> {
	let context = PageContext::new(client_id, None)
		.with("status", status.as_u16())
		.with("message", message);
	render_page(state, status, client_id, pages::ERROR, context).await
}

/// Themed `message` page, used after actions that do not redirect.
pub async fn render_message(
	state: &AppState,
	client_id: &str,
	title: &str,
	message: &str,
) -> Result<Response, ServerError> {
	let context = PageContext::new(client_id, None)
		.with("title", title)
		.with("message", message);
	render_page(state, StatusCode::OK, client_id, pages::MESSAGE, context).await
}

async fn render_default_error(
	state: &AppState,
	status: StatusCode,
	message: &str,
) -> Result<Response, ServerError> {
	let context = json!({
		"status": status.as_u16(),
		"message": message,
		"errors": {},
		"values": {},
	});
	let html = state.themes.render_default(pages::ERROR, &context).await?;
	Ok((status, Html(html)).into_response())
}

/// The client for a form submission; `None` for a blank or unknown id.
pub async fn find_client(state: &AppState, client_id: &str) -> Result<Option<Client>, ServerError> {
	if client_id.trim().is_empty() {
		return Ok(None);
	}
	Ok(state.client_repo.get_client(client_id).await?)
}

/// Response for a POST naming no valid client.
pub async fn unknown_client(state: &AppState, client_id: &str) -> Result<Response, ServerError> {
	let message = if client_id.trim().is_empty() {
		"A client_id is required."
	} else {
		"Unknown client."
	};
	render_default_error(state, StatusCode::BAD_REQUEST, message).await
}
