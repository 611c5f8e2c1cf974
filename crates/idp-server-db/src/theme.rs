// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Theme repository.
//!
//! A theme owns per-page template overrides; each template references the
//! layout it is rendered inside. Lookups always load the layout together with
//! the template.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{Layout, Theme, ThemeTemplate};
use crate::util::parse_timestamp;

#[async_trait]
pub trait ThemeStore: Send + Sync {
	/// The theme's template for `page`, or `None` when the theme does not
	/// override that page.
	async fn get_template(
		&self,
		theme_id: &str,
		page: &str,
	) -> Result<Option<ThemeTemplate>, DbError>;
}

#[derive(Clone)]
pub struct ThemeRepository {
	pool: SqlitePool,
}

impl ThemeRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_template(
		&self,
		theme_id: &str,
		page: &str,
	) -> Result<Option<ThemeTemplate>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT t.id, t.theme_id, t.name, t.source, t.updated_at,
				   l.id AS layout_id, l.name AS layout_name, l.source AS layout_source
			FROM templates t
			JOIN layouts l ON l.id = t.layout_id
			WHERE t.theme_id = ? AND t.name = ?
			"#,
		)
		.bind(theme_id)
		.bind(page)
		.fetch_optional(&self.pool)
		.await?;

		match row {
			Some(row) => {
				let template = parse_template_row(&row)?;
				tracing::debug!(template_id = %template.id, layout = %template.layout.name, "theme template found");
				Ok(Some(template))
			}
			None => Ok(None),
		}
	}

	#[tracing::instrument(skip(self, theme), fields(theme_id = %theme.id))]
	pub async fn create_theme(&self, theme: &Theme) -> Result<(), DbError> {
		sqlx::query("INSERT INTO themes (id, name, created_at) VALUES (?, ?, ?)")
			.bind(&theme.id)
			.bind(&theme.name)
			.bind(Utc::now().to_rfc3339())
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	#[tracing::instrument(skip(self, layout), fields(layout_id = %layout.id))]
	pub async fn create_layout(&self, layout: &Layout) -> Result<(), DbError> {
		sqlx::query("INSERT INTO layouts (id, name, source, created_at) VALUES (?, ?, ?, ?)")
			.bind(&layout.id)
			.bind(&layout.name)
			.bind(&layout.source)
			.bind(Utc::now().to_rfc3339())
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	/// Insert a template; its `layout` must already exist.
	#[tracing::instrument(skip(self, template), fields(template_id = %template.id, page = %template.name))]
	pub async fn create_template(&self, template: &ThemeTemplate) -> Result<(), DbError> {
		let now = template.updated_at.to_rfc3339();
		sqlx::query(
			r#"
			INSERT INTO templates (id, theme_id, layout_id, name, source, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(&template.id)
		.bind(&template.theme_id)
		.bind(&template.layout.id)
		.bind(&template.name)
		.bind(&template.source)
		.bind(&now)
		.bind(&now)
		.execute(&self.pool)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => DbError::Conflict(
				format!(
					"theme {} already has a template for {}",
					template.theme_id, template.name
				),
			),
			other => DbError::Sqlx(other),
		})?;
		Ok(())
	}
}

#[async_trait]
impl ThemeStore for ThemeRepository {
	async fn get_template(
		&self,
		theme_id: &str,
		page: &str,
	) -> Result<Option<ThemeTemplate>, DbError> {
		self.get_template(theme_id, page).await
	}
}

fn parse_template_row(row: &sqlx::sqlite::SqliteRow) -> Result<ThemeTemplate, DbError> {
	let updated_at: String = row.get("updated_at");

	Ok(ThemeTemplate {
		id: row.get("id"),
		theme_id: row.get("theme_id"),
		name: row.get("name"),
		source: row.get("source"),
		layout: Layout {
			id: row.get("layout_id"),
			name: row.get("layout_name"),
			source: row.get("layout_source"),
		},
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}
