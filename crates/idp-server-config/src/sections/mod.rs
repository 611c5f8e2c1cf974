// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for idp-server.

pub mod auth;
pub mod database;
pub mod http;
pub mod logging;
pub mod smtp;
pub mod templates;
pub mod uploads;

pub use auth::{AuthConfig, AuthConfigLayer};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use smtp::{SmtpConfig, SmtpConfigLayer, TlsMode};
pub use templates::{TemplatesConfig, TemplatesConfigLayer};
pub use uploads::{UploadsConfig, UploadsConfigLayer};
