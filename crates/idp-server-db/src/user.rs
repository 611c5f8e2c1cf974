// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository.

use async_trait::async_trait;
use chrono::Utc;
use idp_server_auth::{User, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::util::{parse_timestamp, parse_uuid};

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, user: &User) -> Result<(), DbError>;
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError>;
	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
	async fn update_password_hash(&self, id: &UserId, password_hash: &str) -> Result<(), DbError>;
	async fn update_profile(
		&self,
		id: &UserId,
		display_name: &str,
		locale: Option<&str>,
		picture_url: Option<&str>,
	) -> Result<(), DbError>;
}

#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// # Errors
	/// `DbError::Conflict` when the email is already registered.
	#[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
	pub async fn create_user(&self, user: &User) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO users (id, email, display_name, password_hash, locale, picture_url, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.email)
		.bind(&user.display_name)
		.bind(&user.password_hash)
		.bind(&user.locale)
		.bind(&user.picture_url)
		.bind(user.created_at.to_rfc3339())
		.bind(user.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
				DbError::Conflict("email already registered".to_string())
			}
			other => DbError::Sqlx(other),
		})?;

		tracing::debug!(user_id = %user.id, "user created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, display_name, password_hash, locale, picture_url, created_at, updated_at
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|row| parse_user_row(&row)).transpose()
	}

	/// `email` must already be normalized.
	#[tracing::instrument(skip(self, email))]
	pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, display_name, password_hash, locale, picture_url, created_at, updated_at
			FROM users
			WHERE email = ?
			"#,
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|row| parse_user_row(&row)).transpose()
	}

	#[tracing::instrument(skip(self, password_hash), fields(user_id = %id))]
	pub async fn update_password_hash(&self, id: &UserId, password_hash: &str) -> Result<(), DbError> {
		let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
			.bind(password_hash)
			.bind(Utc::now().to_rfc3339())
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("user {id}")));
		}
		tracing::debug!(user_id = %id, "password updated");
		Ok(())
	}

	/// `picture_url = None` keeps the current picture.
	#[tracing::instrument(skip(self, display_name), fields(user_id = %id))]
	pub async fn update_profile(
		&self,
		id: &UserId,
		display_name: &str,
		locale: Option<&str>,
		picture_url: Option<&str>,
	) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			UPDATE users
			SET display_name = ?, locale = ?, picture_url = COALESCE(?, picture_url), updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(display_name)
		.bind(locale)
		.bind(picture_url)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("user {id}")));
		}
		tracing::debug!(user_id = %id, "profile updated");
		Ok(())
	}
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, user: &User) -> Result<(), DbError> {
		self.create_user(user).await
	}

	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		self.get_user_by_id(id).await
	}

	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		self.get_user_by_email(email).await
	}

	async fn update_password_hash(&self, id: &UserId, password_hash: &str) -> Result<(), DbError> {
		self.update_password_hash(id, password_hash).await
	}

	async fn update_profile(
		&self,
		id: &UserId,
		display_name: &str,
		locale: Option<&str>,
		picture_url: Option<&str>,
	) -> Result<(), DbError> {
		self
			.update_profile(id, display_name, locale, picture_url)
			.await
	}
}

fn parse_user_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	let id: String = row.get("id");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(User {
		id: UserId::new(parse_uuid(&id, "user id")?),
		email: row.get("email"),
		display_name: row.get("display_name"),
		password_hash: row.get("password_hash"),
		locale: row.get("locale"),
		picture_url: row.get("picture_url"),
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}
