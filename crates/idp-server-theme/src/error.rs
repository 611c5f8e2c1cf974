// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use idp_server_db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
	#[error("client id is required")]
	MissingClientId,

	#[error("client not found: {0}")]
	ClientNotFound(String),

	#[error("no default template mapped for page '{0}'")]
	UnknownPage(String),

	/// A default template or layout file is absent. Configuration error.
	#[error("default template file missing: {}", path.display())]
	DefaultAssetMissing { path: PathBuf },

	#[error("failed to read template {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("template '{name}' does not compile: {source}")]
	Template {
		name: String,
		#[source]
		source: Box<handlebars::TemplateError>,
	},

	#[error("failed to render '{name}': {source}")]
	Render {
		name: String,
		#[source]
		source: Box<handlebars::RenderError>,
	},

	#[error(transparent)]
	Store(#[from] DbError),
}

impl ThemeError {
	pub(crate) fn template(name: impl Into<String>, source: handlebars::TemplateError) -> Self {
		Self::Template {
			name: name.into(),
			source: Box::new(source),
		}
	}

	pub(crate) fn render(name: impl Into<String>, source: handlebars::RenderError) -> Self {
		Self::Render {
			name: name.into(),
			source: Box::new(source),
		}
	}
}
