// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password reset message bodies.

use handlebars::html_escape;

pub struct PasswordResetEmail<'a> {
	pub display_name: &'a str,
	pub reset_url: &'a str,
	pub ttl_minutes: i64,
}

impl PasswordResetEmail<'_> {
	pub fn subject(&self) -> &'static str {
		"Reset your password"
	}

	pub fn text(&self) -> String {
		format!(
			"Hi {name},\n\n\
			 Someone asked to reset the password for your account. \
			 Open this link within {ttl} minutes to choose a new one:\n\n\
			 {url}\n\n\
			 If you did not ask for this you can ignore this email.\n",
			name = self.display_name,
			ttl = self.ttl_minutes,
			url = self.reset_url,
		)
	}

	pub fn html(&self) -> String {
		let url = html_escape(self.reset_url);
		format!(
			"<p>Hi {name},</p>\
			 <p>Someone asked to reset the password for your account. \
			 Open this link within {ttl} minutes to choose a new one:</p>\
			 <p><a href=\"{url}\">{url}</a></p>\
			 <p>If you did not ask for this you can ignore this email.</p>",
			name = html_escape(self.display_name),
			ttl = self.ttl_minutes,
		)
	}
}
