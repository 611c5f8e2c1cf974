// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tokio::time::Instant;

use crate::api::AppState;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
	pub status: HealthStatus,
	pub latency_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub database: DatabaseHealth,
}

#[tracing::instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let start = Instant::now();
	let result = idp_server_db::ping(&state.pool).await;
	let latency_ms = start.elapsed().as_millis() as u64;

	let database = match result {
		Ok(()) => DatabaseHealth {
			status: HealthStatus::Healthy,
			latency_ms,
			error: None,
		},
		Err(e) => {
			tracing::warn!(error = %e, "database health check failed");
			DatabaseHealth {
				status: HealthStatus::Unhealthy,
				latency_ms,
				error: Some(e.to_string()),
			}
		}
	};

	let status = database.status;
	let code = match status {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};

	(code, Json(HealthResponse { status, database }))
}
