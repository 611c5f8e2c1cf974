// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Profile picture upload storage.

use std::path::PathBuf;

use serde::Deserialize;

const DEFAULT_MAX_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadsConfig {
	pub dir: PathBuf,
	/// URL prefix the upload directory is served under.
	pub public_path: String,
	pub max_bytes: usize,
}

impl Default for UploadsConfig {
	fn default() -> Self {
		UploadsConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadsConfigLayer {
	#[serde(default)]
	pub dir: Option<String>,
	#[serde(default)]
	pub public_path: Option<String>,
	#[serde(default)]
	pub max_bytes: Option<usize>,
}

impl UploadsConfigLayer {
	pub fn merge(&mut self, other: UploadsConfigLayer) {
		if other.dir.is_some() {
			self.dir = other.dir;
		}
		if other.public_path.is_some() {
			self.public_path = other.public_path;
		}
		if other.max_bytes.is_some() {
			self.max_bytes = other.max_bytes;
		}
	}

	pub fn finalize(self) -> UploadsConfig {
		let public_path = self.public_path.unwrap_or_else(|| "/uploads".to_string());
		let public_path = format!("/{}", public_path.trim_matches('/'));
		UploadsConfig {
			dir: PathBuf::from(self.dir.unwrap_or_else(|| "./uploads".to_string())),
			public_path,
			max_bytes: self.max_bytes.unwrap_or(DEFAULT_MAX_BYTES),
		}
	}
}
