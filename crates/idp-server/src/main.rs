// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity provider server binary.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use idp_server::{create_app_state, create_router, db};
use idp_server_config::{LogFormat, ServerConfig};
use idp_server_db::SessionStore;
use idp_server_smtp::{EmailSender, SmtpClient};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Identity provider server - themed registration, login and account pages.
#[derive(Parser, Debug)]
#[command(name = "idp-server", about = "Identity provider user flows", version)]
struct Args {
	/// Config file path (defaults to /etc/idp/server.toml)
	#[arg(long, env = "IDP_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
}

fn init_tracing(config: &ServerConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);
	match config.logging.format {
		LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
		LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
	}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("idp-server {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => idp_server_config::load_config_with_file(path)?,
		None => idp_server_config::load_config()?,
	};

	init_tracing(&config);

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		"starting idp-server"
	);

	let pool = db::create_pool(&config.database.url).await?;
	db::run_migrations(&pool).await?;

	let email: Option<Arc<dyn EmailSender>> = match &config.smtp {
		Some(smtp) => Some(Arc::new(SmtpClient::new(smtp)?)),
		None => {
			tracing::warn!("SMTP not configured; password reset emails are disabled");
			None
		}
	};

	let state = create_app_state(pool, &config, email).await?;

	let sessions = state.session_repo.clone();
	let cleanup = tokio::spawn(async move {
		let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
		loop {
			interval.tick().await;
			match sessions.cleanup_expired_sessions().await {
				Ok(0) => {}
				Ok(removed) => tracing::info!(removed, "expired sessions removed"),
				Err(e) => tracing::warn!(error = %e, "session cleanup failed"),
			}
		}
	});

	let app = create_router(state).layer(TraceLayer::new_for_http());

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);
	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	cleanup.abort();
	tracing::info!("Server shutdown complete");
	Ok(())
}
