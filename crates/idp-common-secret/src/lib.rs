// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redacting string wrapper for passwords, tokens and credentials.
//!
//! [`SecretString`] is used for every value the identity provider must never
//! log: passwords submitted through registration/login/reset forms, session
//! and reset tokens, and the SMTP password loaded from configuration.
//!
//! - `Debug`/`Display` print `[REDACTED]`
//! - serializing produces `"[REDACTED]"`, deserializing accepts the raw value
//!   (so it can sit directly inside a form struct)
//! - the buffer is zeroized on drop
//!
//! ```
//! use idp_common_secret::SecretString;
//!
//! let password = SecretString::new("hunter22");
//! assert_eq!(format!("{password}"), "[REDACTED]");
//! assert_eq!(password.expose(), "hunter22");
//! ```

pub mod env;

pub use env::{load_secret_env, require_secret_env, RequiredSecretError, SecretEnvError};

use std::fmt;
use zeroize::Zeroize;

pub const REDACTED: &str = "[REDACTED]";

#[derive(Default, Zeroize)]
#[zeroize(drop)]
pub struct SecretString {
	inner: String,
}

impl SecretString {
	pub fn new(value: impl Into<String>) -> Self {
		Self {
			inner: value.into(),
		}
	}

	/// Borrow the underlying value. Call sites should be easy to audit.
	pub fn expose(&self) -> &str {
		&self.inner
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Length in characters, used by password policy checks.
	pub fn char_len(&self) -> usize {
		self.inner.chars().count()
	}
}

impl Clone for SecretString {
	fn clone(&self) -> Self {
		Self::new(self.inner.clone())
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SecretString").field(&REDACTED).finish()
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl Eq for SecretString {}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{SecretString, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};

	impl Serialize for SecretString {
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de> Deserialize<'de> for SecretString {
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			String::deserialize(deserializer).map(SecretString::new)
		}
	}
}
