// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password hashing with argon2id and PHC-format hash strings.

use argon2::password_hash::{
	rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use idp_common_secret::SecretString;
use tracing::instrument;

use crate::argon2_config::argon2_instance;
use crate::error::AuthError;

#[instrument(name = "password.hash", skip_all)]
pub fn hash_password(password: &SecretString) -> Result<String, AuthError> {
	let salt = SaltString::generate(&mut OsRng);
	argon2_instance()
		.hash_password(password.expose().as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Returns `false` for a wrong password and for a malformed stored hash.
#[instrument(name = "password.verify", skip_all)]
pub fn verify_password(password: &SecretString, hash: &str) -> bool {
	let Ok(parsed_hash) = PasswordHash::new(hash) else {
		tracing::warn!("stored password hash is not in PHC format");
		return false;
	};
	argon2_instance()
		.verify_password(password.expose().as_bytes(), &parsed_hash)
		.is_ok()
}
