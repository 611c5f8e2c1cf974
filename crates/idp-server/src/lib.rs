// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP server for the identity provider's user-facing flows.
//!
//! Registration, login, password change and reset, profile and logout pages
//! are all rendered through [`idp_server_theme::ThemeService`], so a client
//! with a theme sees its own templates and every other client sees the
//! defaults.

pub mod api;
pub mod auth_middleware;
pub mod db;
pub mod error;
pub mod pages;
pub mod redirect;
pub mod routes;
pub mod uploads;

pub use api::{create_app_state, create_router, AppState};
pub use error::ServerError;
pub use idp_server_config::ServerConfig;
