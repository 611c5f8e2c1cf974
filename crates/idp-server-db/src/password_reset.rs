// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password reset token repository.

use async_trait::async_trait;
use chrono::Utc;
use idp_server_auth::{PasswordResetToken, ResetTokenId, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::util::{parse_timestamp, parse_uuid};

#[async_trait]
pub trait PasswordResetStore: Send + Sync {
	async fn create_reset_token(&self, token: &PasswordResetToken) -> Result<(), DbError>;
	async fn get_reset_token_by_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<PasswordResetToken>, DbError>;
	/// Marks the token used and stores the user's new password hash in one
	/// transaction. Returns `false`, changing nothing, when the token was
	/// already used.
	async fn redeem_reset_token(
		&self,
		token: &PasswordResetToken,
		password_hash: &str,
	) -> Result<bool, DbError>;
	async fn invalidate_reset_tokens_for_user(&self, user_id: &UserId) -> Result<u64, DbError>;
}

#[derive(Clone)]
pub struct PasswordResetRepository {
	pool: SqlitePool,
}

impl PasswordResetRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, token), fields(token_id = %token.id, user_id = %token.user_id))]
	pub async fn create_reset_token(&self, token: &PasswordResetToken) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO password_reset_tokens (id, user_id, token_hash, created_at, expires_at, used_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(token.id.to_string())
		.bind(token.user_id.to_string())
		.bind(&token.token_hash)
		.bind(token.created_at.to_rfc3339())
		.bind(token.expires_at.to_rfc3339())
		.bind(token.used_at.map(|t| t.to_rfc3339()))
		.execute(&self.pool)
		.await?;

		tracing::debug!(token_id = %token.id, "password reset token created");
		Ok(())
	}

	#[tracing::instrument(skip(self, token_hash))]
	pub async fn get_reset_token_by_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<PasswordResetToken>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, user_id, token_hash, created_at, expires_at, used_at
			FROM password_reset_tokens
			WHERE token_hash = ?
			"#,
		)
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|row| parse_reset_token_row(&row)).transpose()
	}

	#[tracing::instrument(skip(self, token, password_hash), fields(token_id = %token.id, user_id = %token.user_id))]
	pub async fn redeem_reset_token(
		&self,
		token: &PasswordResetToken,
		password_hash: &str,
	) -> Result<bool, DbError> {
		let now = Utc::now().to_rfc3339();
		let mut tx = self.pool.begin().await?;

		let claimed = sqlx::query(
			"UPDATE password_reset_tokens SET used_at = ? WHERE id = ? AND used_at IS NULL",
		)
		.bind(&now)
		.bind(token.id.to_string())
		.execute(&mut *tx)
		.await?;
		if claimed.rows_affected() == 0 {
			tracing::debug!("reset token already used");
			return Ok(false);
		}

		let updated = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
			.bind(password_hash)
			.bind(&now)
			.bind(token.user_id.to_string())
			.execute(&mut *tx)
			.await?;
		if updated.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("user {}", token.user_id)));
		}

		tx.commit().await?;
		tracing::debug!("reset token redeemed");
		Ok(true)
	}

	/// Marks every unused token of the user as used.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn invalidate_reset_tokens_for_user(&self, user_id: &UserId) -> Result<u64, DbError> {
		let result = sqlx::query(
			"UPDATE password_reset_tokens SET used_at = ? WHERE user_id = ? AND used_at IS NULL",
		)
		.bind(Utc::now().to_rfc3339())
		.bind(user_id.to_string())
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected())
	}
}

#[async_trait]
impl PasswordResetStore for PasswordResetRepository {
	async fn create_reset_token(&self, token: &PasswordResetToken) -> Result<(), DbError> {
		self.create_reset_token(token).await
	}

	async fn get_reset_token_by_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<PasswordResetToken>, DbError> {
		self.get_reset_token_by_hash(token_hash).await
	}

	async fn redeem_reset_token(
		&self,
		token: &PasswordResetToken,
		password_hash: &str,
	) -> Result<bool, DbError> {
		self.redeem_reset_token(token, password_hash).await
	}

	async fn invalidate_reset_tokens_for_user(&self, user_id: &UserId) -> Result<u64, DbError> {
		self.invalidate_reset_tokens_for_user(user_id).await
	}
}

fn parse_reset_token_row(row: &sqlx::sqlite::SqliteRow) -> Result<PasswordResetToken, DbError> {
	let id: String = row.get("id");
	let user_id: String = row.get("user_id");
	let created_at: String = row.get("created_at");
	let expires_at: String = row.get("expires_at");
	let used_at: Option<String> = row.get("used_at");

	Ok(PasswordResetToken {
		id: ResetTokenId::new(parse_uuid(&id, "reset token id")?),
		user_id: UserId::new(parse_uuid(&user_id, "user_id")?),
		token_hash: row.get("token_hash"),
		created_at: parse_timestamp(&created_at, "created_at")?,
		expires_at: parse_timestamp(&expires_at, "expires_at")?,
		used_at: used_at
			.map(|t| parse_timestamp(&t, "used_at"))
			.transpose()?,
	})
}
