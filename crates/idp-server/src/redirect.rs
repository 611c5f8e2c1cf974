// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Post-action redirect targets.
//!
//! A caller-supplied `return_to` is followed only when it is a same-origin
//! relative path or one of the client's registered redirect URIs. Anything
//! else falls back to the profile page.

use idp_server_db::Client;
use url::form_urlencoded;

/// Relative path on this origin: a single leading `/`, no scheme-relative
/// `//` and no backslash (browsers treat `/\` like `//`).
pub fn is_safe_relative(url: &str) -> bool {
	url.starts_with('/') && !url.starts_with("//") && !url.contains('\\')
}

/// `path?k=v&...` with values percent-encoded. Empty values are dropped.
pub fn with_query(path: &str, params: &[(&str, &str)]) -> String {
	let mut serializer = form_urlencoded::Serializer::new(String::new());
	let mut any = false;
	for (key, value) in params.iter().filter(|(_, v)| !v.is_empty()) {
		serializer.append_pair(key, value);
		any = true;
	}
	if any {
		format!("{path}?{}", serializer.finish())
	} else {
		path.to_string()
	}
}

pub fn profile_url(client_id: &str) -> String {
	with_query("/profile", &[("client_id", client_id)])
}

pub fn login_url(client_id: &str, return_to: Option<&str>) -> String {
	with_query(
		"/login",
		&[
			("client_id", client_id),
			("return_to", return_to.unwrap_or_default()),
		],
	)
}

/// Where to send the browser after register/login.
pub fn resolve_return_to(client: &Client, return_to: Option<&str>) -> String {
	match return_to.map(str::trim).filter(|r| !r.is_empty()) {
		Some(target) if is_safe_relative(target) => target.to_string(),
		Some(target) if client.allows_redirect_uri(target) => target.to_string(),
		Some(target) => {
			tracing::warn!(client_id = %client.id, return_to = %target, "ignoring unregistered return_to");
			profile_url(&client.id)
		}
		None => profile_url(&client.id),
	}
}

/// The post-logout target, when the client registered it.
pub fn post_logout_target(client: &Client, requested: Option<&str>) -> Option<String> {
	let requested = requested.map(str::trim).filter(|r| !r.is_empty())?;
	if client.allows_post_logout_redirect_uri(requested) {
		Some(requested.to_string())
	} else {
		tracing::warn!(client_id = %client.id, uri = %requested, "ignoring unregistered post-logout redirect");
		None
	}
}
