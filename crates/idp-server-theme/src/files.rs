// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read access to the default template directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ThemeError;

#[async_trait]
pub trait TemplateFiles: Send + Sync {
	/// Read a file relative to the template root.
	///
	/// A missing file is [`ThemeError::DefaultAssetMissing`].
	async fn read(&self, relative: &Path) -> Result<String, ThemeError>;
}

/// Templates on local disk, e.g. `./templates/login.hbs` and
/// `./templates/layout/auth.hbs`.
#[derive(Debug, Clone)]
pub struct DiskTemplateFiles {
	root: PathBuf,
}

impl DiskTemplateFiles {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

#[async_trait]
impl TemplateFiles for DiskTemplateFiles {
	#[tracing::instrument(skip(self), fields(root = %self.root.display()))]
	async fn read(&self, relative: &Path) -> Result<String, ThemeError> {
		let path = self.root.join(relative);
		tokio::fs::read_to_string(&path)
			.await
			.map_err(|source| match source.kind() {
				ErrorKind::NotFound => ThemeError::DefaultAssetMissing { path },
				_ => ThemeError::Io { path, source },
			})
	}
}
