// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pages and the default layout each one is rendered in.
//!
//! Used only when a client has no theme, or its theme does not override the
//! page. Paths are relative to the template directory: the page lives at
//! `<page>.hbs` and its layout at `layout/<layout file>`.

use std::collections::BTreeMap;
use std::path::PathBuf;

pub mod pages {
	pub const REGISTER: &str = "register";
	pub const LOGIN: &str = "login";
	pub const FORGOT_PASSWORD: &str = "forgot-password";
	pub const RESET_PASSWORD: &str = "reset-password";
	pub const CHANGE_PASSWORD: &str = "change-password";
	pub const PROFILE: &str = "profile";
	pub const LOGOUT: &str = "logout";
	pub const MESSAGE: &str = "message";
	pub const ERROR: &str = "error";
}

/// Built-in page → layout file table.
pub const DEFAULT_LAYOUTS: &[(&str, &str)] = &[
	(pages::REGISTER, "auth.hbs"),
	(pages::LOGIN, "auth.hbs"),
	(pages::FORGOT_PASSWORD, "auth.hbs"),
	(pages::RESET_PASSWORD, "auth.hbs"),
	(pages::CHANGE_PASSWORD, "account.hbs"),
	(pages::PROFILE, "account.hbs"),
	(pages::LOGOUT, "message.hbs"),
	(pages::MESSAGE, "message.hbs"),
	(pages::ERROR, "message.hbs"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultPaths {
	pub page: PathBuf,
	pub layout: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DefaultLayoutMapping {
	entries: BTreeMap<String, DefaultPaths>,
}

impl Default for DefaultLayoutMapping {
	fn default() -> Self {
		Self::from_table(DEFAULT_LAYOUTS)
	}
}

impl DefaultLayoutMapping {
	pub fn from_table(table: &[(&str, &str)]) -> Self {
		let entries = table
			.iter()
			.map(|(page, layout)| {
				(
					page.to_string(),
					DefaultPaths {
						page: PathBuf::from(format!("{page}.hbs")),
						layout: PathBuf::from("layout").join(layout),
					},
				)
			})
			.collect();
		Self { entries }
	}

	pub fn get(&self, page: &str) -> Option<&DefaultPaths> {
		self.entries.get(page)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &DefaultPaths)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
