// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Records provisioned by administrators and read by the user-facing flows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A relying party. `id` is the OAuth client_id string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
	pub id: String,
	pub name: String,
	/// `None` means the client renders with the default templates.
	pub theme_id: Option<String>,
	pub redirect_uris: Vec<String>,
	pub post_logout_redirect_uris: Vec<String>,
}

impl Client {
	/// Exact string match against the registered redirect URIs.
	pub fn allows_redirect_uri(&self, uri: &str) -> bool {
		self.redirect_uris.iter().any(|u| u == uri)
	}

	pub fn allows_post_logout_redirect_uri(&self, uri: &str) -> bool {
		self.post_logout_redirect_uris.iter().any(|u| u == uri)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
	pub id: String,
	pub name: String,
}

/// Wrapper markup; the page output is embedded as `{{{content}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
	pub id: String,
	pub name: String,
	pub source: String,
}

/// A theme's override for one page, with its layout loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeTemplate {
	pub id: String,
	pub theme_id: String,
	/// Page key, e.g. `forgot-password`.
	pub name: String,
	pub source: String,
	pub layout: Layout,
	pub updated_at: DateTime<Utc>,
}
