// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.
//!
//! Handlers render user-facing problems (bad form input, unknown client,
//! invalid reset link) as themed pages themselves. A `ServerError` reaching
//! `into_response` is a failure the visitor cannot fix.

use axum::{
	extract::multipart::MultipartError,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use idp_server_auth::AuthError;
use idp_server_db::DbError;
use idp_server_theme::ThemeError;
use serde::Serialize;

use crate::uploads::UploadError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("Database error: {0}")]
	Db(#[from] DbError),

	#[error("Theme error: {0}")]
	Theme(#[from] ThemeError),

	#[error("Auth error: {0}")]
	Auth(#[from] AuthError),

	#[error("Upload error: {0}")]
	Upload(#[from] UploadError),

	#[error("Invalid multipart body: {0}")]
	Multipart(#[from] MultipartError),

	#[error("Invalid request: {0}")]
	BadRequest(String),

	#[error("Internal error: {0}")]
	Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ErrorResponse {
	fn new(error: &str, message: impl Into<String>) -> Self {
		Self {
			error: error.to_string(),
			message: message.into(),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, body) = match &self {
			ServerError::Db(e) => {
				tracing::error!(error = %e, "database error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("database_error", "A database error occurred"),
				)
			}
			ServerError::Theme(ThemeError::MissingClientId) => (
				StatusCode::BAD_REQUEST,
				ErrorResponse::new("invalid_client", "client_id is required"),
			),
			ServerError::Theme(ThemeError::ClientNotFound(_)) => (
				StatusCode::BAD_REQUEST,
				ErrorResponse::new("invalid_client", "Unknown client"),
			),
			ServerError::Theme(e) => {
				tracing::error!(error = %e, "template error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("template_error", "The page could not be rendered"),
				)
			}
			ServerError::Auth(e) => {
				tracing::error!(error = %e, "auth error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("internal_error", "An internal error occurred"),
				)
			}
			ServerError::Upload(e) => {
				tracing::error!(error = %e, "upload error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("upload_error", "The upload could not be stored"),
				)
			}
			ServerError::Multipart(e) => {
				tracing::warn!(error = %e, "rejected multipart body");
				(e.status(), ErrorResponse::new("invalid_multipart", e.body_text()))
			}
			ServerError::BadRequest(msg) => (
				StatusCode::BAD_REQUEST,
				ErrorResponse::new("bad_request", msg.clone()),
			),
			ServerError::Internal(msg) => {
				tracing::error!(error = %msg, "internal error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("internal_error", "An internal error occurred"),
				)
			}
		};

		(status, Json(body)).into_response()
	}
}
