// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Themed HTML for the identity provider's user-facing pages.
//!
//! A client may reference a theme; a theme may override any page with its own
//! template and layout. Everything else renders from the default templates on
//! disk (`<dir>/<page>.hbs` inside `<dir>/layout/<layout>`), which are
//! validated when [`DefaultTemplates::load`] runs at startup.
//!
//! ```ignore
//! let defaults = DefaultTemplates::load(
//! 	DefaultLayoutMapping::default(),
//! 	Arc::new(DiskTemplateFiles::new("./templates")),
//! 	true,
//! )
//! .await?;
//! let themes = ThemeService::new(clients, theme_store, defaults);
//! let html = themes
//! 	.render_themed_template("c1", pages::FORGOT_PASSWORD, &context)
//! 	.await?;
//! ```

pub mod defaults;
pub mod error;
pub mod files;
pub mod layouts;
pub mod render;
pub mod service;

pub use defaults::DefaultTemplates;
pub use error::ThemeError;
pub use files::{DiskTemplateFiles, TemplateFiles};
pub use layouts::{pages, DefaultLayoutMapping, DefaultPaths, DEFAULT_LAYOUTS};
pub use render::{merge_content, RenderTemplate};
pub use service::{ThemeService, ThemedRender};
