// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
	/// No session cookie or the session does not exist.
	#[error("authentication required")]
	AuthenticationRequired,

	/// Unknown email or wrong password. Deliberately indistinguishable.
	#[error("invalid credentials")]
	InvalidCredentials,

	#[error("session expired")]
	SessionExpired,

	/// Reset token unknown, expired or already used.
	#[error("invalid or expired password reset token")]
	InvalidResetToken,

	#[error("password hashing failed: {0}")]
	PasswordHash(String),

	#[error("internal error: {0}")]
	Internal(String),
}
