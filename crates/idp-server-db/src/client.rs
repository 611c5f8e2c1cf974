// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client repository.
//!
//! Clients are provisioned by administrators; the user-facing flows only read
//! them to pick a theme and to check redirect targets. Redirect URI lists are
//! stored as JSON arrays.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::Client;

#[async_trait]
pub trait ClientStore: Send + Sync {
	async fn get_client(&self, client_id: &str) -> Result<Option<Client>, DbError>;
}

#[derive(Clone)]
pub struct ClientRepository {
	pool: SqlitePool,
}

impl ClientRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_client(&self, client_id: &str) -> Result<Option<Client>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, theme_id, redirect_uris, post_logout_redirect_uris
			FROM clients
			WHERE id = ?
			"#,
		)
		.bind(client_id)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|row| parse_client_row(&row)).transpose()
	}

	/// Insert a client record. Used by provisioning scripts and tests.
	#[tracing::instrument(skip(self, client), fields(client_id = %client.id))]
	pub async fn create_client(&self, client: &Client) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO clients (id, name, theme_id, redirect_uris, post_logout_redirect_uris, created_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(&client.id)
		.bind(&client.name)
		.bind(&client.theme_id)
		.bind(serde_json::to_string(&client.redirect_uris)?)
		.bind(serde_json::to_string(&client.post_logout_redirect_uris)?)
		.bind(Utc::now().to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
				DbError::Conflict(format!("client {} already exists", client.id))
			}
			other => DbError::Sqlx(other),
		})?;

		tracing::debug!(client_id = %client.id, "client created");
		Ok(())
	}
}

#[async_trait]
impl ClientStore for ClientRepository {
	async fn get_client(&self, client_id: &str) -> Result<Option<Client>, DbError> {
		self.get_client(client_id).await
	}
}

fn parse_client_row(row: &sqlx::sqlite::SqliteRow) -> Result<Client, DbError> {
	let redirect_uris: String = row.get("redirect_uris");
	let post_logout_redirect_uris: String = row.get("post_logout_redirect_uris");

	Ok(Client {
		id: row.get("id"),
		name: row.get("name"),
		theme_id: row.get("theme_id"),
		redirect_uris: serde_json::from_str(&redirect_uris)?,
		post_logout_redirect_uris: serde_json::from_str(&post_logout_redirect_uris)?,
	})
}
