// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-client theme resolution and rendering.
//!
//! ```text
//! client_id ──► ClientStore ──► theme_id? ──► ThemeStore(theme_id, page) ──► template?
//!                                   │ none                                    │ none
//!                                   └──────────────► DefaultTemplates ◄───────┘
//! ```

use std::sync::Arc;

use handlebars::Handlebars;
use idp_server_db::{ClientStore, ThemeStore, ThemeTemplate};
use serde_json::Value;
use tracing::debug;

use crate::defaults::DefaultTemplates;
use crate::error::ThemeError;
use crate::render::{new_engine, RenderTemplate};

/// Result of [`ThemeService::get_themed_template`]. `template` is the themed
/// override that produced `rendered`, or `None` when the default was used.
#[derive(Debug, Clone)]
pub struct ThemedRender {
	pub template: Option<ThemeTemplate>,
	pub rendered: String,
}

pub struct ThemeService {
	clients: Arc<dyn ClientStore>,
	themes: Arc<dyn ThemeStore>,
	defaults: DefaultTemplates,
	engine: Handlebars<'static>,
}

impl ThemeService {
	pub fn new(
		clients: Arc<dyn ClientStore>,
		themes: Arc<dyn ThemeStore>,
		defaults: DefaultTemplates,
	) -> Self {
		Self {
			clients,
			themes,
			defaults,
			engine: new_engine(),
		}
	}

	pub fn defaults(&self) -> &DefaultTemplates {
		&self.defaults
	}

	/// The client's themed template for `page`.
	///
	/// `Ok(None)` when the client has no theme or the theme does not override
	/// the page. An unknown client is an error, not a fallback.
	#[tracing::instrument(skip(self))]
	pub async fn fetch_template(
		&self,
		client_id: &str,
		page: &str,
	) -> Result<Option<ThemeTemplate>, ThemeError> {
		if client_id.trim().is_empty() {
			return Err(ThemeError::MissingClientId);
		}

		let client = self
			.clients
			.get_client(client_id)
			.await?
			.ok_or_else(|| ThemeError::ClientNotFound(client_id.to_string()))?;

		let Some(theme_id) = client.theme_id.as_deref() else {
			debug!("client has no theme");
			return Ok(None);
		};

		let template = self.themes.get_template(theme_id, page).await?;
		if template.is_none() {
			debug!(theme_id, "theme does not override page");
		}
		Ok(template)
	}

	#[tracing::instrument(skip(self, context))]
	pub async fn get_themed_template(
		&self,
		client_id: &str,
		page: &str,
		context: &Value,
	) -> Result<ThemedRender, ThemeError> {
		let template = self.fetch_template(client_id, page).await?;
		let rendered = match &template {
			Some(themed) => themed.render(&self.engine, page, context)?,
			None => self.defaults.render(page, context).await?,
		};
		Ok(ThemedRender { template, rendered })
	}

	pub async fn render_themed_template(
		&self,
		client_id: &str,
		page: &str,
		context: &Value,
	) -> Result<String, ThemeError> {
		Ok(self
			.get_themed_template(client_id, page, context)
			.await?
			.rendered)
	}

	/// Render the unthemed page, for errors where no valid client is known.
	pub async fn render_default(&self, page: &str, context: &Value) -> Result<String, ThemeError> {
		self.defaults.render(page, context).await
	}
}
