// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::SqlitePool;

pub async fn create_test_pool() -> SqlitePool {
	SqlitePool::connect(":memory:").await.unwrap()
}

pub async fn create_theme_tables(pool: &SqlitePool) {
	for statement in [
		r#"
		CREATE TABLE IF NOT EXISTS themes (
			id TEXT PRIMARY KEY,
			name TEXT NOT NULL,
			created_at TEXT NOT NULL
		)
		"#,
		r#"
		CREATE TABLE IF NOT EXISTS layouts (
			id TEXT PRIMARY KEY,
			name TEXT NOT NULL,
			source TEXT NOT NULL,
			created_at TEXT NOT NULL
		)
		"#,
		r#"
		CREATE TABLE IF NOT EXISTS templates (
			id TEXT PRIMARY KEY,
			theme_id TEXT NOT NULL REFERENCES themes(id) ON DELETE CASCADE,
			layout_id TEXT NOT NULL REFERENCES layouts(id),
			name TEXT NOT NULL,
			source TEXT NOT NULL,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL,
			UNIQUE(theme_id, name)
		)
		"#,
	] {
		sqlx::query(statement).execute(pool).await.unwrap();
	}
}

pub async fn create_clients_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS clients (
			id TEXT PRIMARY KEY,
			name TEXT NOT NULL,
			theme_id TEXT REFERENCES themes(id) ON DELETE SET NULL,
			redirect_uris TEXT NOT NULL DEFAULT '[]',
			post_logout_redirect_uris TEXT NOT NULL DEFAULT '[]',
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_users_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS users (
			id TEXT PRIMARY KEY,
			email TEXT NOT NULL UNIQUE,
			display_name TEXT NOT NULL,
			password_hash TEXT NOT NULL,
			locale TEXT,
			picture_url TEXT,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_sessions_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS sessions (
			id TEXT PRIMARY KEY,
			user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
			token_hash TEXT NOT NULL UNIQUE,
			created_at TEXT NOT NULL,
			expires_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_password_reset_tokens_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS password_reset_tokens (
			id TEXT PRIMARY KEY,
			user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
			token_hash TEXT NOT NULL UNIQUE,
			created_at TEXT NOT NULL,
			expires_at TEXT NOT NULL,
			used_at TEXT
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_theme_test_pool() -> SqlitePool {
	let pool = create_test_pool().await;
	create_theme_tables(&pool).await;
	create_clients_table(&pool).await;
	pool
}

pub async fn create_user_test_pool() -> SqlitePool {
	let pool = create_test_pool().await;
	create_users_table(&pool).await;
	create_sessions_table(&pool).await;
	create_password_reset_tokens_table(&pool).await;
	pool
}
