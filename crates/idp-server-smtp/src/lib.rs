// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outgoing email for the identity provider.
//!
//! [`EmailSender`] is the seam the HTTP layer depends on; [`SmtpClient`] is
//! the lettre-backed implementation built from the `[smtp]` configuration
//! section. The SMTP password stays inside a `SecretString` until it is
//! handed to lettre.

pub mod password_reset;

pub use password_reset::PasswordResetEmail;

use async_trait::async_trait;
use idp_server_config::{SmtpConfig, TlsMode};
use lettre::{
	message::{header::ContentType, Mailbox, MultiPart, SinglePart},
	transport::smtp::authentication::Credentials,
	AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

#[derive(Debug, thiserror::Error)]
pub enum SmtpError {
	#[error("connection failed: {0}")]
	Connection(String),

	#[error("send failed: {0}")]
	Send(String),

	#[error("invalid email address: {0}")]
	Address(String),
}

#[async_trait]
pub trait EmailSender: Send + Sync {
	/// Send a multipart (plain text + HTML) message.
	async fn send_email(
		&self,
		to: &str,
		subject: &str,
		body_html: &str,
		body_text: &str,
	) -> Result<(), SmtpError>;
}

pub struct SmtpClient {
	transport: AsyncSmtpTransport<Tokio1Executor>,
	from_mailbox: Mailbox,
}

impl SmtpClient {
	/// Build the transport. No connection is made until the first send.
	#[tracing::instrument(
		name = "smtp_client_new",
		skip(config),
		fields(host = %config.host, port = %config.port, tls = ?config.tls_mode)
	)]
	pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
		let from_mailbox: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
			.parse()
			.map_err(|e| SmtpError::Address(format!("{e}")))?;

		let builder = match config.tls_mode {
			TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
				.map_err(|e| SmtpError::Connection(format!("{e}")))?,
			TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
				.map_err(|e| SmtpError::Connection(format!("{e}")))?,
			TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
		};

		let mut builder = builder.port(config.port);

		if let (Some(username), Some(password)) = (&config.username, &config.password) {
			let credentials = Credentials::new(username.clone(), password.expose().to_string());
			builder = builder.credentials(credentials);
		}

		tracing::debug!("SMTP client initialized");

		Ok(Self {
			transport: builder.build(),
			from_mailbox,
		})
	}

	#[tracing::instrument(name = "smtp_check_health", skip(self))]
	pub async fn check_health(&self) -> Result<(), SmtpError> {
		self
			.transport
			.test_connection()
			.await
			.map_err(|e| SmtpError::Connection(format!("{e}")))?;
		Ok(())
	}
}

#[async_trait]
impl EmailSender for SmtpClient {
	#[tracing::instrument(
		name = "smtp_send_email",
		skip(self, body_html, body_text),
		fields(subject = %subject)
	)]
	async fn send_email(
		&self,
		to: &str,
		subject: &str,
		body_html: &str,
		body_text: &str,
	) -> Result<(), SmtpError> {
		let message = build_message(self.from_mailbox.clone(), to, subject, body_html, body_text)?;

		self
			.transport
			.send(message)
			.await
			.map_err(|e| SmtpError::Send(format!("{e}")))?;

		tracing::info!("email sent");
		Ok(())
	}
}

fn build_message(
	from: Mailbox,
	to: &str,
	subject: &str,
	body_html: &str,
	body_text: &str,
) -> Result<Message, SmtpError> {
	let to_mailbox: Mailbox = to.parse().map_err(|e| SmtpError::Address(format!("{e}")))?;

	Message::builder()
		.from(from)
		.to(to_mailbox)
		.subject(subject)
		.multipart(
			MultiPart::alternative()
				.singlepart(
					SinglePart::builder()
						.header(ContentType::TEXT_PLAIN)
						.body(body_text.to_string()),
				)
				.singlepart(
					SinglePart::builder()
						.header(ContentType::TEXT_HTML)
						.body(body_html.to_string()),
				),
		)
		.map_err(|e| SmtpError::Send(format!("failed to build message: {e}")))
}
