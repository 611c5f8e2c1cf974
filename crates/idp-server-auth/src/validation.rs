// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Field rules shared by the registration, password and profile forms.
//!
//! Each validator records problems into a [`FormErrors`] under the form field
//! name and returns the normalized value.

use idp_common_secret::SecretString;

use crate::form::FormErrors;

pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 100;
const MIN_EMAIL_LENGTH: usize = 5;
const MAX_EMAIL_LENGTH: usize = 254;

pub fn normalize_email(raw: &str) -> String {
	raw.trim().to_lowercase()
}

pub fn validate_email(raw: &str, errors: &mut FormErrors) -> String {
	let email = normalize_email(raw);
	if email.is_empty() {
		errors.add("email", "Email is required");
	} else if email.chars().count() < MIN_EMAIL_LENGTH
		|| email.chars().count() > MAX_EMAIL_LENGTH
		|| email.chars().any(char::is_whitespace)
		|| !is_plausible_address(&email)
	{
		errors.add("email", "Enter a valid email address");
	}
	email
}

fn is_plausible_address(email: &str) -> bool {
	match email.split_once('@') {
		Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
		None => false,
	}
}

pub fn validate_display_name(raw: &str, errors: &mut FormErrors) -> String {
	let name = raw.trim().to_string();
	let len = name.chars().count();
	if len == 0 {
		errors.add("display_name", "Display name is required");
	} else if len > MAX_DISPLAY_NAME_LENGTH {
		errors.add(
			"display_name",
			format!("Display name must be at most {MAX_DISPLAY_NAME_LENGTH} characters"),
		);
	}
	name
}

/// Checks a new password and its confirmation.
pub fn validate_new_password(
	password: &SecretString,
	confirmation: &SecretString,
	min_length: usize,
	errors: &mut FormErrors,
) {
	let len = password.char_len();
	if len < min_length {
		errors.add(
			"password",
			format!("Password must be at least {min_length} characters"),
		);
	} else if len > MAX_PASSWORD_LENGTH {
		errors.add(
			"password",
			format!("Password must be at most {MAX_PASSWORD_LENGTH} characters"),
		);
	}
	if password != confirmation {
		errors.add("password_confirmation", "Passwords do not match");
	}
}

/// Accepts `xx` or `xx-YY`. Blank input clears the locale.
pub fn validate_locale(raw: Option<&str>, errors: &mut FormErrors) -> Option<String> {
	let value = raw.map(str::trim).filter(|v| !v.is_empty())?;
	if is_locale_tag(value) {
		Some(value.to_string())
	} else {
		errors.add("locale", "Locale must look like \"en\" or \"en-US\"");
		None
	}
}

fn is_locale_tag(value: &str) -> bool {
	let (lang, region) = match value.split_once('-') {
		Some((lang, region)) => (lang, Some(region)),
		None => (value, None),
	};
	let lang_ok = lang.len() == 2 && lang.chars().all(|c| c.is_ascii_lowercase());
	let region_ok = region.map_or(true, |r| {
		r.len() == 2 && r.chars().all(|c| c.is_ascii_uppercase())
	});
	lang_ok && region_ok
}
