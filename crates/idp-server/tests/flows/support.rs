// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
	body::Body,
	http::{
		header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
		Method, Request,
	},
	response::Response,
	Router,
};
use chrono::Utc;
use idp_server::{
	api::{create_app_state, create_router, AppState},
	db::{create_pool, run_migrations, ClientRepository, ThemeRepository},
	ServerConfig,
};
use idp_server_db::{Client, Layout, Theme, ThemeTemplate};
use idp_server_smtp::{EmailSender, SmtpError};
use tempfile::TempDir;
use tower::ServiceExt;
use url::form_urlencoded;

pub const CLIENT_ID: &str = "c1";
pub const THEMED_CLIENT_ID: &str = "themed";
pub const REDIRECT_URI: &str = "https://app.example.com/callback";
pub const POST_LOGOUT_URI: &str = "https://app.example.com/bye";
pub const PASSWORD: &str = "correct horse battery";

#[derive(Debug, Clone)]
pub struct SentEmail {
	pub to: String,
	pub subject: String,
	pub html: String,
	pub text: String,
}

#[derive(Default)]
pub struct RecordingEmailSender {
	pub sent: Mutex<Vec<SentEmail>>,
}

impl RecordingEmailSender {
	pub fn sent(&self) -> Vec<SentEmail> {
		self.sent.lock().unwrap().clone()
	}
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
	async fn send_email(
		&self,
		to: &str,
		subject: &str,
		body_html: &str,
		body_text: &str,
	) -> Result<(), SmtpError> {
		self.sent.lock().unwrap().push(SentEmail {
			to: to.to_string(),
			subject: subject.to_string(),
			html: body_html.to_string(),
			text: body_text.to_string(),
		});
		Ok(())
	}
}

pub struct TestApp {
	pub router: Router,
	pub state: AppState,
	pub emails: Arc<RecordingEmailSender>,
	pub dir: TempDir,
}

fn templates_dir() -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

pub async fn spawn_app() -> TestApp {
	spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(configure: impl FnOnce(&mut ServerConfig)) -> TestApp {
	let dir = tempfile::tempdir().unwrap();
	let db_url = format!("sqlite:{}?mode=rwc", dir.path().join("idp.db").display());
	let pool = create_pool(&db_url).await.unwrap();
	run_migrations(&pool).await.unwrap();
	seed(&pool).await;

	let mut config = ServerConfig::default();
	config.templates.dir = templates_dir();
	config.uploads.dir = dir.path().join("uploads");
	config.uploads.max_bytes = 1024;
	config.http.base_url = "https://id.example.com".to_string();
	configure(&mut config);

	let emails = Arc::new(RecordingEmailSender::default());
	let sender: Arc<dyn EmailSender> = emails.clone();
	let state = create_app_state(pool, &config, Some(sender)).await.unwrap();

	TestApp {
		router: create_router(state.clone()),
		state,
		emails,
		dir,
	}
}

async fn seed(pool: &sqlx::SqlitePool) {
	let themes = ThemeRepository::new(pool.clone());
	themes
		.create_theme(&Theme {
			id: "t1".to_string(),
			name: "Brand".to_string(),
		})
		.await
		.unwrap();
	let layout = Layout {
		id: "l1".to_string(),
		name: "brand".to_string(),
		source: r#"<div class="brand">{{{content}}}</div>"#.to_string(),
	};
	themes.create_layout(&layout).await.unwrap();
	themes
		.create_template(&ThemeTemplate {
			id: "tpl1".to_string(),
			theme_id: "t1".to_string(),
			name: "forgot-password".to_string(),
			source: r#"<p class="themed">Reset for {{client_id}}</p>{{#each errors.email}}<b>{{this}}</b>{{/each}}"#
				.to_string(),
			layout,
			updated_at: Utc::now(),
		})
		.await
		.unwrap();

	let clients = ClientRepository::new(pool.clone());
	clients
		.create_client(&Client {
			id: CLIENT_ID.to_string(),
			name: "Example".to_string(),
			theme_id: None,
			redirect_uris: vec![REDIRECT_URI.to_string()],
			post_logout_redirect_uris: vec![POST_LOGOUT_URI.to_string()],
		})
		.await
		.unwrap();
	clients
		.create_client(&Client {
			id: THEMED_CLIENT_ID.to_string(),
			name: "Branded".to_string(),
			theme_id: Some("t1".to_string()),
			redirect_uris: vec![],
			post_logout_redirect_uris: vec![],
		})
		.await
		.unwrap();
}

impl TestApp {
	pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
		let mut builder = Request::builder().method(Method::GET).uri(uri);
		if let Some(cookie) = cookie {
			builder = builder.header(COOKIE, cookie);
		}
		self
			.router
			.clone()
			.oneshot(builder.body(Body::empty()).unwrap())
			.await
			.unwrap()
	}

	pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Response {
		let body = form_urlencoded::Serializer::new(String::new())
			.extend_pairs(fields)
			.finish();
		let mut builder = Request::builder()
			.method(Method::POST)
			.uri(uri)
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
		if let Some(cookie) = cookie {
			builder = builder.header(COOKIE, cookie);
		}
		self
			.router
			.clone()
			.oneshot(builder.body(Body::from(body)).unwrap())
			.await
			.unwrap()
	}

	pub async fn post_multipart(&self, uri: &str, parts: &[MultipartPart<'_>], cookie: &str) -> Response {
		let boundary = "----idp-test-boundary";
		let mut body: Vec<u8> = Vec::new();
		for part in parts {
			body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
			match part {
				MultipartPart::Text(name, value) => {
					body.extend_from_slice(
						format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
							.as_bytes(),
					);
				}
				MultipartPart::File {
					name,
					file_name,
					content_type,
					bytes,
				} => {
					body.extend_from_slice(
						format!(
							"Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
							 Content-Type: {content_type}\r\n\r\n"
						)
						.as_bytes(),
					);
					body.extend_from_slice(bytes);
					body.extend_from_slice(b"\r\n");
				}
			}
		}
		body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

		let request = Request::builder()
			.method(Method::POST)
			.uri(uri)
			.header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
			.header(COOKIE, cookie)
			.body(Body::from(body))
			.unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}

	/// Register through the form and return the session cookie pair.
	pub async fn register(&self, email: &str) -> String {
		let response = self
			.post_form(
				"/register",
				&[
					("client_id", CLIENT_ID),
					("email", email),
					("display_name", "Alice"),
					("password", PASSWORD),
					("password_confirmation", PASSWORD),
				],
				None,
			)
			.await;
		session_cookie(&response).expect("registration sets a session cookie")
	}

	pub async fn login(&self, email: &str, password: &str) -> Response {
		self.post_form(
			"/login",
			&[
				("client_id", CLIENT_ID),
				("email", email),
				("password", password),
			],
			None,
		)
		.await
	}
}

pub enum MultipartPart<'a> {
	Text(&'a str, &'a str),
	File {
		name: &'a str,
		file_name: &'a str,
		content_type: &'a str,
		bytes: &'a [u8],
	},
}

pub async fn body_string(response: Response) -> String {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> &str {
	response
		.headers()
		.get(LOCATION)
		.expect("Location header")
		.to_str()
		.unwrap()
}

pub fn set_cookie(response: &Response) -> Option<String> {
	response
		.headers()
		.get(SET_COOKIE)
		.map(|v| v.to_str().unwrap().to_string())
}

/// `name=value` from the Set-Cookie header, suitable for a Cookie header.
pub fn session_cookie(response: &Response) -> Option<String> {
	let header = set_cookie(response)?;
	let pair = header.split(';').next()?.trim().to_string();
	if pair.ends_with('=') {
		None
	} else {
		Some(pair)
	}
}
