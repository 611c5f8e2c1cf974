// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session repository.
//!
//! Sessions are looked up by the SHA-256 of the cookie token; the token
//! itself is never stored.

use async_trait::async_trait;
use chrono::Utc;
use idp_server_auth::{Session, SessionId, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::util::{parse_timestamp, parse_uuid};

#[async_trait]
pub trait SessionStore: Send + Sync {
	async fn create_session(&self, session: &Session) -> Result<(), DbError>;
	async fn get_session_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DbError>;
	async fn delete_session(&self, id: &SessionId) -> Result<bool, DbError>;
	async fn delete_all_sessions_for_user(&self, user_id: &UserId) -> Result<u64, DbError>;
	async fn delete_other_sessions_for_user(
		&self,
		user_id: &UserId,
		keep: &SessionId,
	) -> Result<u64, DbError>;
	async fn cleanup_expired_sessions(&self) -> Result<u64, DbError>;
}

#[derive(Clone)]
pub struct SessionRepository {
	pool: SqlitePool,
}

impl SessionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, session), fields(session_id = %session.id, user_id = %session.user_id))]
	pub async fn create_session(&self, session: &Session) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO sessions (id, user_id, token_hash, created_at, expires_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(session.id.to_string())
		.bind(session.user_id.to_string())
		.bind(&session.token_hash)
		.bind(session.created_at.to_rfc3339())
		.bind(session.expires_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(session_id = %session.id, "session created");
		Ok(())
	}

	/// Does not check expiry; the caller decides what to do with an expired session.
	#[tracing::instrument(skip(self, token_hash))]
	pub async fn get_session_by_token_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<Session>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, user_id, token_hash, created_at, expires_at
			FROM sessions
			WHERE token_hash = ?
			"#,
		)
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|row| parse_session_row(&row)).transpose()
	}

	#[tracing::instrument(skip(self), fields(session_id = %id))]
	pub async fn delete_session(&self, id: &SessionId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::debug!(session_id = %id, "session deleted");
		}
		Ok(deleted)
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn delete_all_sessions_for_user(&self, user_id: &UserId) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?")
			.bind(user_id.to_string())
			.execute(&self.pool)
			.await?;

		tracing::debug!(user_id = %user_id, count = result.rows_affected(), "sessions revoked");
		Ok(result.rows_affected())
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id, keep = %keep))]
	pub async fn delete_other_sessions_for_user(
		&self,
		user_id: &UserId,
		keep: &SessionId,
	) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE user_id = ? AND id != ?")
			.bind(user_id.to_string())
			.bind(keep.to_string())
			.execute(&self.pool)
			.await?;

		tracing::debug!(user_id = %user_id, count = result.rows_affected(), "other sessions revoked");
		Ok(result.rows_affected())
	}

	#[tracing::instrument(skip(self))]
	pub async fn cleanup_expired_sessions(&self) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
			.bind(Utc::now().to_rfc3339())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() > 0 {
			tracing::info!(count = result.rows_affected(), "expired sessions removed");
		}
		Ok(result.rows_affected())
	}
}

#[async_trait]
impl SessionStore for SessionRepository {
	async fn create_session(&self, session: &Session) -> Result<(), DbError> {
		self.create_session(session).await
	}

	async fn get_session_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DbError> {
		self.get_session_by_token_hash(token_hash).await
	}

	async fn delete_session(&self, id: &SessionId) -> Result<bool, DbError> {
		self.delete_session(id).await
	}

	async fn delete_all_sessions_for_user(&self, user_id: &UserId) -> Result<u64, DbError> {
		self.delete_all_sessions_for_user(user_id).await
	}

	async fn delete_other_sessions_for_user(
		&self,
		user_id: &UserId,
		keep: &SessionId,
	) -> Result<u64, DbError> {
		self.delete_other_sessions_for_user(user_id, keep).await
	}

	async fn cleanup_expired_sessions(&self) -> Result<u64, DbError> {
		self.cleanup_expired_sessions().await
	}
}

fn parse_session_row(row: &sqlx::sqlite::SqliteRow) -> Result<Session, DbError> {
	let id: String = row.get("id");
	let user_id: String = row.get("user_id");
	let created_at: String = row.get("created_at");
	let expires_at: String = row.get("expires_at");

	Ok(Session {
		id: SessionId::new(parse_uuid(&id, "session id")?),
		user_id: UserId::new(parse_uuid(&user_id, "user_id")?),
		token_hash: row.get("token_hash"),
		created_at: parse_timestamp(&created_at, "created_at")?,
		expires_at: parse_timestamp(&expires_at, "expires_at")?,
	})
}
