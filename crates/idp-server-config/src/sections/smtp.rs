// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SMTP configuration for password reset mail.

use idp_common_secret::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
	None,
	StartTls,
	#[default]
	Tls,
}

impl TlsMode {
	pub fn from_str_value(value: &str) -> Result<Self, ConfigError> {
		match value.to_lowercase().as_str() {
			"true" | "tls" => Ok(TlsMode::Tls),
			"starttls" => Ok(TlsMode::StartTls),
			"false" | "none" => Ok(TlsMode::None),
			_ => Err(ConfigError::InvalidValue {
				key: "smtp.tls_mode".to_string(),
				message: format!("'{value}', expected one of tls, starttls, none"),
			}),
		}
	}
}

/// SMTP layer; the password is never read from TOML, only from the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmtpConfigLayer {
	pub host: Option<String>,
	pub port: Option<u16>,
	pub username: Option<String>,
	#[serde(skip)]
	pub password: Option<SecretString>,
	pub from_address: Option<String>,
	pub from_name: Option<String>,
	pub tls_mode: Option<TlsMode>,
}

impl SmtpConfigLayer {
	pub fn merge(&mut self, other: SmtpConfigLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.username.is_some() {
			self.username = other.username;
		}
		if other.password.is_some() {
			self.password = other.password;
		}
		if other.from_address.is_some() {
			self.from_address = other.from_address;
		}
		if other.from_name.is_some() {
			self.from_name = other.from_name;
		}
		if other.tls_mode.is_some() {
			self.tls_mode = other.tls_mode;
		}
	}

	/// `Ok(None)` when no host is configured; mail sending is then disabled.
	pub fn build(self) -> Result<Option<SmtpConfig>, ConfigError> {
		let Some(host) = self.host.filter(|h| !h.is_empty()) else {
			return Ok(None);
		};

		let from_address = self
			.from_address
			.filter(|a| !a.is_empty())
			.ok_or_else(|| {
				ConfigError::Validation("smtp.from_address is required when smtp.host is set".to_string())
			})?;

		Ok(Some(SmtpConfig {
			host,
			port: self.port.unwrap_or(587),
			username: self.username,
			password: self.password,
			from_address,
			from_name: self.from_name.unwrap_or_else(|| "Identity".to_string()),
			tls_mode: self.tls_mode.unwrap_or_default(),
		}))
	}
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
	pub host: String,
	pub port: u16,
	pub username: Option<String>,
	pub password: Option<SecretString>,
	pub from_address: String,
	pub from_name: String,
	pub tls_mode: TlsMode,
}

impl SmtpConfig {
	pub fn has_auth(&self) -> bool {
		self.username.is_some() && self.password.is_some()
	}
}
