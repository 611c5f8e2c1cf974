// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Profile picture storage.
//!
//! The profile handler validates the upload with [`picture_extension`] and
//! hands the bytes to an [`AvatarStore`], which returns the public URL to
//! record on the user.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use idp_server_auth::UserId;
use uuid::Uuid;

/// Accepted picture content types and the file extension stored for each.
pub const ALLOWED_PICTURE_TYPES: &[(&str, &str)] = &[
	("image/png", "png"),
	("image/jpeg", "jpg"),
	("image/gif", "gif"),
	("image/webp", "webp"),
];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
	#[error("unsupported picture type: {0}")]
	UnsupportedType(String),

	#[error("picture is larger than {max_bytes} bytes")]
	TooLarge { max_bytes: usize },

	#[error("picture is empty")]
	Empty,

	#[error("failed to store picture: {0}")]
	Io(#[from] std::io::Error),
}

/// Checks content type and size, returning the extension to store under.
pub fn picture_extension(
	content_type: &str,
	len: usize,
	max_bytes: usize,
) -> Result<&'static str, UploadError> {
	let essence = content_type
		.split(';')
		.next()
		.unwrap_or_default()
		.trim()
		.to_ascii_lowercase();
	let extension = ALLOWED_PICTURE_TYPES
		.iter()
		.find(|(ty, _)| *ty == essence)
		.map(|(_, ext)| *ext)
		.ok_or_else(|| UploadError::UnsupportedType(essence.clone()))?;
	if len == 0 {
		return Err(UploadError::Empty);
	}
	if len > max_bytes {
		return Err(UploadError::TooLarge { max_bytes });
	}
	Ok(extension)
}

#[async_trait]
pub trait AvatarStore: Send + Sync {
	/// Persist a validated picture and return the URL it is served from.
	async fn store(
		&self,
		user_id: &UserId,
		extension: &str,
		bytes: &[u8],
	) -> Result<String, UploadError>;

	/// Delete a picture previously returned by [`AvatarStore::store`].
	/// Returns `false` for URLs this store does not own or files already gone.
	async fn remove(&self, url: &str) -> Result<bool, UploadError>;
}

/// Writes pictures to a local directory served by the HTTP layer.
#[derive(Debug, Clone)]
pub struct LocalAvatarStore {
	dir: PathBuf,
	public_path: String,
}

impl LocalAvatarStore {
	pub fn new(dir: impl Into<PathBuf>, public_path: impl Into<String>) -> Self {
		Self {
			dir: dir.into(),
			public_path: public_path.into().trim_end_matches('/').to_string(),
		}
	}

	/// File name inside `dir` for a public URL, if it points into this store.
	fn file_name_for<'a>(&self, url: &'a str) -> Option<&'a str> {
		let name = url.strip_prefix(&self.public_path)?.strip_prefix('/')?;
		let plain = !name.is_empty()
			&& !name.starts_with('.')
			&& !name.contains(['/', '\\']);
		plain.then_some(name)
	}
}

#[async_trait]
impl AvatarStore for LocalAvatarStore {
	#[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
	async fn store(
		&self,
		user_id: &UserId,
		extension: &str,
		bytes: &[u8],
	) -> Result<String, UploadError> {
		tokio::fs::create_dir_all(&self.dir).await?;
		// New name per upload so cached copies of the old picture are not reused.
		let file_name = format!("{user_id}-{}.{extension}", Uuid::new_v4().simple());
		tokio::fs::write(self.dir.join(&file_name), bytes).await?;
		tracing::debug!(file = %file_name, "picture stored");
		Ok(format!("{}/{file_name}", self.public_path))
	}

	#[tracing::instrument(skip(self))]
	async fn remove(&self, url: &str) -> Result<bool, UploadError> {
		let Some(file_name) = self.file_name_for(url) else {
			return Ok(false);
		};
		match tokio::fs::remove_file(self.dir.join(file_name)).await {
			Ok(()) => {
				tracing::debug!(file = %file_name, "picture removed");
				Ok(true)
			}
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
			Err(e) => Err(e.into()),
		}
	}
}
