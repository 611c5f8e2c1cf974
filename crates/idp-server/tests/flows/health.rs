// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;

use super::support::*;

#[tokio::test]
async fn health_reports_database() {
	let app = spawn_app().await;

	let response = app.get("/health", None).await;

	assert_eq!(response.status(), StatusCode::OK);
	let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
	assert_eq!(json["status"], "healthy");
	assert_eq!(json["database"]["status"], "healthy");
}

#[tokio::test]
async fn health_is_unavailable_when_database_is_closed() {
	let app = spawn_app().await;
	app.state.pool.close().await;

	let response = app.get("/health", None).await;

	assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
	let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
	assert_eq!(json["database"]["status"], "unhealthy");
}
