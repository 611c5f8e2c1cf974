// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the identity provider server.
//!
//! Sources are merged in precedence order: built-in defaults, a TOML file
//! (`/etc/idp/server.toml` unless a path is given), then `IDP_SERVER_*`
//! environment variables.
//!
//! ```ignore
//! use idp_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub templates: TemplatesConfig,
	pub uploads: UploadsConfig,
	pub smtp: Option<SmtpConfig>,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let templates = layer.templates.unwrap_or_default().finalize();
	let uploads = layer.uploads.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let smtp = match layer.smtp {
		Some(l) => l.build()?,
		None => None,
	};

	auth.validate()?;
	if uploads.max_bytes == 0 {
		return Err(ConfigError::Validation(
			"IDP_SERVER_UPLOADS_MAX_BYTES must be greater than zero".to_string(),
		));
	}
	if uploads.public_path == "/" {
		return Err(ConfigError::Validation(
			"IDP_SERVER_UPLOADS_PUBLIC_PATH cannot be the site root".to_string(),
		));
	}

	info!(
		host = %http.host,
		port = http.port,
		base_url = %http.base_url,
		database = %database.url,
		templates_dir = %templates.dir.display(),
		template_cache = templates.cache,
		signups_disabled = auth.signups_disabled,
		smtp_configured = smtp.is_some(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		auth,
		templates,
		uploads,
		smtp,
		logging,
	})
}
