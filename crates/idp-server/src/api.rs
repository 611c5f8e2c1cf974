// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use idp_server_config::{AuthConfig, ServerConfig, UploadsConfig};
use idp_server_db::{
	ClientRepository, ClientStore, PasswordResetRepository, PasswordResetStore, SessionRepository,
	SessionStore, ThemeRepository, UserRepository, UserStore,
};
use idp_server_smtp::EmailSender;
use idp_server_theme::{DefaultLayoutMapping, DefaultTemplates, DiskTemplateFiles, ThemeService};
use sqlx::sqlite::SqlitePool;
use tower_http::services::ServeDir;

use crate::error::ServerError;
use crate::routes;
use crate::uploads::{AvatarStore, LocalAvatarStore};

/// Multipart framing overhead allowed on top of `uploads.max_bytes`.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub client_repo: Arc<dyn ClientStore>,
	pub user_repo: Arc<dyn UserStore>,
	pub session_repo: Arc<dyn SessionStore>,
	pub reset_repo: Arc<dyn PasswordResetStore>,
	pub themes: Arc<ThemeService>,
	/// `None` when SMTP is not configured; reset emails are then skipped.
	pub email: Option<Arc<dyn EmailSender>>,
	pub avatars: Arc<dyn AvatarStore>,
	pub auth_config: AuthConfig,
	pub uploads_config: UploadsConfig,
	/// Public origin, used for links in outgoing email.
	pub base_url: String,
}

/// Build state from configuration. Default templates are loaded and compiled
/// here, so a missing file fails startup rather than the first request.
#[tracing::instrument(skip_all)]
pub async fn create_app_state(
	pool: SqlitePool,
	config: &ServerConfig,
	email: Option<Arc<dyn EmailSender>>,
) -> Result<AppState, ServerError> {
	let client_repo: Arc<dyn ClientStore> = Arc::new(ClientRepository::new(pool.clone()));
	let theme_repo = Arc::new(ThemeRepository::new(pool.clone()));

	let defaults = DefaultTemplates::load(
		DefaultLayoutMapping::default(),
		Arc::new(DiskTemplateFiles::new(&config.templates.dir)),
		config.templates.cache,
	)
	.await?;
	let themes = ThemeService::new(client_repo.clone(), theme_repo, defaults);

	Ok(AppState {
		client_repo,
		user_repo: Arc::new(UserRepository::new(pool.clone())),
		session_repo: Arc::new(SessionRepository::new(pool.clone())),
		reset_repo: Arc::new(PasswordResetRepository::new(pool.clone())),
		themes: Arc::new(themes),
		email,
		avatars: Arc::new(LocalAvatarStore::new(
			&config.uploads.dir,
			&config.uploads.public_path,
		)),
		auth_config: config.auth.clone(),
		uploads_config: config.uploads.clone(),
		base_url: config.http.base_url.clone(),
		pool,
	})
}

pub fn create_router(state: AppState) -> Router {
	let uploads = ServeDir::new(&state.uploads_config.dir);
	let uploads_path = state.uploads_config.public_path.clone();
	let profile_body_limit = state.uploads_config.max_bytes + MULTIPART_OVERHEAD_BYTES;

	Router::new()
		.route("/health", get(routes::health::health_check))
		.route(
			"/register",
			get(routes::register::show).post(routes::register::submit),
		)
		.route("/login", get(routes::login::show).post(routes::login::submit))
		.route(
			"/password/change",
			get(routes::password::show_change).post(routes::password::submit_change),
		)
		.route(
			"/password/forgot",
			get(routes::password::show_forgot).post(routes::password::submit_forgot),
		)
		.route(
			"/password/reset",
			get(routes::password::show_reset).post(routes::password::submit_reset),
		)
		.route(
			"/profile",
			get(routes::profile::show)
				.post(routes::profile::submit)
				.layer(DefaultBodyLimit::max(profile_body_limit)),
		)
		.route("/logout", get(routes::logout::logout))
		.nest_service(&uploads_path, uploads)
		.with_state(state)
}
