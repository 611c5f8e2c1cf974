// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication configuration: sessions, password policy and reset tokens.

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_SESSION_COOKIE_NAME: &str = "idp_session";
pub const DEFAULT_SESSION_LIFETIME_DAYS: i64 = 30;
pub const DEFAULT_PASSWORD_RESET_TTL_MINUTES: i64 = 60;
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

pub const MAX_SESSION_LIFETIME_DAYS: i64 = 3650;
pub const MAX_PASSWORD_RESET_TTL_MINUTES: i64 = 7 * 24 * 60;

/// Upper bound on passwords; argon2 cost grows with input size.
pub const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub session_cookie_name: String,
	/// Adds `Secure` to the session cookie. Off only for plain-http development.
	pub cookie_secure: bool,
	pub session_lifetime_days: i64,
	pub password_reset_ttl_minutes: i64,
	pub min_password_length: usize,
	pub signups_disabled: bool,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			session_cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
			cookie_secure: true,
			session_lifetime_days: DEFAULT_SESSION_LIFETIME_DAYS,
			password_reset_ttl_minutes: DEFAULT_PASSWORD_RESET_TTL_MINUTES,
			min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
			signups_disabled: false,
		}
	}
}

impl AuthConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.session_cookie_name.is_empty()
			|| !self
				.session_cookie_name
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
		{
			return Err(ConfigError::InvalidValue {
				key: "auth.session_cookie_name".to_string(),
				message: format!("'{}' is not a valid cookie name", self.session_cookie_name),
			});
		}
		if !(1..=MAX_SESSION_LIFETIME_DAYS).contains(&self.session_lifetime_days) {
			return Err(ConfigError::InvalidValue {
				key: "auth.session_lifetime_days".to_string(),
				message: format!("must be between 1 and {MAX_SESSION_LIFETIME_DAYS}"),
			});
		}
		if !(1..=MAX_PASSWORD_RESET_TTL_MINUTES).contains(&self.password_reset_ttl_minutes) {
			return Err(ConfigError::InvalidValue {
				key: "auth.password_reset_ttl_minutes".to_string(),
				message: format!("must be between 1 and {MAX_PASSWORD_RESET_TTL_MINUTES}"),
			});
		}
		if self.min_password_length == 0 || self.min_password_length > MAX_PASSWORD_LENGTH {
			return Err(ConfigError::InvalidValue {
				key: "auth.min_password_length".to_string(),
				message: format!("must be between 1 and {MAX_PASSWORD_LENGTH}"),
			});
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub session_cookie_name: Option<String>,
	#[serde(default)]
	pub cookie_secure: Option<bool>,
	#[serde(default)]
	pub session_lifetime_days: Option<i64>,
	#[serde(default)]
	pub password_reset_ttl_minutes: Option<i64>,
	#[serde(default)]
	pub min_password_length: Option<usize>,
	#[serde(default)]
	pub signups_disabled: Option<bool>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.session_cookie_name.is_some() {
			self.session_cookie_name = other.session_cookie_name;
		}
		if other.cookie_secure.is_some() {
			self.cookie_secure = other.cookie_secure;
		}
		if other.session_lifetime_days.is_some() {
			self.session_lifetime_days = other.session_lifetime_days;
		}
		if other.password_reset_ttl_minutes.is_some() {
			self.password_reset_ttl_minutes = other.password_reset_ttl_minutes;
		}
		if other.min_password_length.is_some() {
			self.min_password_length = other.min_password_length;
		}
		if other.signups_disabled.is_some() {
			self.signups_disabled = other.signups_disabled;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		let defaults = AuthConfig::default();
		AuthConfig {
			session_cookie_name: self
				.session_cookie_name
				.unwrap_or(defaults.session_cookie_name),
			cookie_secure: self.cookie_secure.unwrap_or(defaults.cookie_secure),
			session_lifetime_days: self
				.session_lifetime_days
				.unwrap_or(defaults.session_lifetime_days),
			password_reset_ttl_minutes: self
				.password_reset_ttl_minutes
				.unwrap_or(defaults.password_reset_ttl_minutes),
			min_password_length: self
				.min_password_length
				.unwrap_or(defaults.min_password_length),
			signups_disabled: self.signups_disabled.unwrap_or(defaults.signups_disabled),
		}
	}
}
