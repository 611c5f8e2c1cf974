// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema migrations and re-exports of the repository layer.

pub use idp_server_db::{
	create_pool, ping, ClientRepository, ClientStore, DbError, PasswordResetRepository,
	PasswordResetStore, SessionRepository, SessionStore, ThemeRepository, ThemeStore,
	UserRepository, UserStore,
};

use sqlx::sqlite::SqlitePool;

use crate::error::ServerError;

const MIGRATIONS: &[(&str, &str)] = &[
	("001_themes", include_str!("../../migrations/001_themes.sql")),
	("002_clients", include_str!("../../migrations/002_clients.sql")),
	("003_users", include_str!("../../migrations/003_users.sql")),
];

/// Apply every migration in order. Statements use `IF NOT EXISTS`, so running
/// against an existing database is a no-op.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), ServerError> {
	for (name, sql) in MIGRATIONS {
		for stmt in sql.split(';').filter(|s| !s.trim().is_empty()) {
			sqlx::query(stmt)
				.execute(pool)
				.await
				.map_err(DbError::from)?;
		}
		tracing::debug!(migration = name, "migration applied");
	}
	Ok(())
}
