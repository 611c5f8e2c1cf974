// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session cookie helpers.
//!
//! Cookies are always `HttpOnly` and `SameSite=Lax`; `Secure` follows
//! configuration so plain-http development still works.

use http::header::COOKIE;
use http::HeaderMap;

#[derive(Debug, Clone)]
pub struct SessionCookieOptions {
	pub name: String,
	pub secure: bool,
	pub max_age_secs: i64,
}

/// Extract the session token from the Cookie header.
pub fn extract_session_cookie_with_name(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get_all(COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| value.split(';'))
		.find_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			if name == cookie_name && !value.is_empty() {
				Some(value.to_string())
			} else {
				None
			}
		})
}

/// `Set-Cookie` value carrying a fresh session token.
pub fn session_cookie(options: &SessionCookieOptions, token: &str) -> String {
	let mut cookie = format!(
		"{}={token}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
		options.name, options.max_age_secs
	);
	if options.secure {
		cookie.push_str("; Secure");
	}
	cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(options: &SessionCookieOptions) -> String {
	let mut cookie = format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", options.name);
	if options.secure {
		cookie.push_str("; Secure");
	}
	cookie
}
