// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML file and environment.

use std::path::PathBuf;

use idp_common_secret::load_secret_env;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LogFormat, LoggingConfigLayer,
	SmtpConfigLayer, TemplatesConfigLayer, TlsMode, UploadsConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		Ok(ServerConfigLayer::default())
	}
}

pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/idp/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: IDP_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			database: Some(DatabaseConfigLayer {
				url: env_var("IDP_SERVER_DATABASE_URL"),
			}),
			auth: Some(load_auth_from_env()?),
			templates: Some(TemplatesConfigLayer {
				dir: env_var("IDP_SERVER_TEMPLATES_DIR"),
				cache: env_bool("IDP_SERVER_TEMPLATES_CACHE"),
			}),
			uploads: Some(UploadsConfigLayer {
				dir: env_var("IDP_SERVER_UPLOADS_DIR"),
				public_path: env_var("IDP_SERVER_UPLOADS_PUBLIC_PATH"),
				max_bytes: env_parse("IDP_SERVER_UPLOADS_MAX_BYTES")?,
			}),
			smtp: Some(load_smtp_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("cannot parse '{v}' as {}", std::any::type_name::<T>()),
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("IDP_SERVER_HOST"),
		port: env_parse("IDP_SERVER_PORT")?,
		base_url: env_var("IDP_SERVER_BASE_URL"),
	})
}

fn load_auth_from_env() -> Result<AuthConfigLayer, ConfigError> {
	Ok(AuthConfigLayer {
		session_cookie_name: env_var("IDP_SERVER_AUTH_SESSION_COOKIE_NAME"),
		cookie_secure: env_bool("IDP_SERVER_AUTH_COOKIE_SECURE"),
		session_lifetime_days: env_parse("IDP_SERVER_AUTH_SESSION_LIFETIME_DAYS")?,
		password_reset_ttl_minutes: env_parse("IDP_SERVER_AUTH_PASSWORD_RESET_TTL_MINUTES")?,
		min_password_length: env_parse("IDP_SERVER_AUTH_MIN_PASSWORD_LENGTH")?,
		signups_disabled: env_bool("IDP_SERVER_SIGNUPS_DISABLED"),
	})
}

fn load_smtp_from_env() -> Result<SmtpConfigLayer, ConfigError> {
	let tls_mode = env_var("IDP_SERVER_SMTP_TLS")
		.map(|v| TlsMode::from_str_value(&v))
		.transpose()?;

	Ok(SmtpConfigLayer {
		host: env_var("IDP_SERVER_SMTP_HOST"),
		port: env_parse("IDP_SERVER_SMTP_PORT")?,
		username: env_var("IDP_SERVER_SMTP_USERNAME"),
		password: load_secret_env("IDP_SERVER_SMTP_PASSWORD")
			.map_err(|e| ConfigError::Secret(e.to_string()))?,
		from_address: env_var("IDP_SERVER_SMTP_FROM_ADDRESS"),
		from_name: env_var("IDP_SERVER_SMTP_FROM_NAME"),
		tls_mode,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = match env_var("IDP_SERVER_LOG_FORMAT") {
		Some(v) => Some(LogFormat::parse(&v).ok_or_else(|| ConfigError::InvalidValue {
			key: "IDP_SERVER_LOG_FORMAT".to_string(),
			message: format!("'{v}', expected json or pretty"),
		})?),
		None => None,
	};

	Ok(LoggingConfigLayer {
		level: env_var("IDP_SERVER_LOG_LEVEL"),
		format,
	})
}
