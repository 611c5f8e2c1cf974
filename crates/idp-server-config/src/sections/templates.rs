// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Default template location and compilation caching.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct TemplatesConfig {
	/// Directory holding `<page>.hbs` and `layout/<layout>.hbs`.
	pub dir: PathBuf,
	/// Compile default templates once at startup instead of reading them per request.
	pub cache: bool,
}

impl Default for TemplatesConfig {
	fn default() -> Self {
		TemplatesConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplatesConfigLayer {
	#[serde(default)]
	pub dir: Option<String>,
	#[serde(default)]
	pub cache: Option<bool>,
}

impl TemplatesConfigLayer {
	pub fn merge(&mut self, other: TemplatesConfigLayer) {
		if other.dir.is_some() {
			self.dir = other.dir;
		}
		if other.cache.is_some() {
			self.cache = other.cache;
		}
	}

	pub fn finalize(self) -> TemplatesConfig {
		TemplatesConfig {
			dir: PathBuf::from(self.dir.unwrap_or_else(|| "./templates".to_string())),
			cache: self.cache.unwrap_or(true),
		}
	}
}
