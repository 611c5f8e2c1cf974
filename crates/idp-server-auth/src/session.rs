// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Web sessions.
//!
//! The browser holds a 32-byte random token (hex) in the session cookie.
//! Only the SHA-256 of that token is persisted, so a leaked database row
//! cannot be replayed as a cookie.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::types::{SessionId, UserId};

pub const SESSION_TOKEN_BYTES: usize = 32;

/// Longest lifetime [`Session::issue`] will grant.
pub const MAX_SESSION_LIFETIME_DAYS: i64 = 3650;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
	pub id: SessionId,
	pub user_id: UserId,
	#[serde(skip_serializing)]
	pub token_hash: String,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

impl Session {
	/// Create a session and the raw token to hand to the browser.
	///
	/// `lifetime_days` is clamped to `1..=MAX_SESSION_LIFETIME_DAYS`.
	#[instrument(level = "debug", skip(user_id), fields(user_id = %user_id))]
	pub fn issue(user_id: UserId, lifetime_days: i64) -> (String, Self) {
		let token = generate_session_token();
		let now = Utc::now();
		let session = Self {
			id: SessionId::generate(),
			user_id,
			token_hash: hash_token(&token),
			created_at: now,
			expires_at: now + Duration::days(lifetime_days.clamp(1, MAX_SESSION_LIFETIME_DAYS)),
		};
		(token, session)
	}

	pub fn is_expired(&self) -> bool {
		Utc::now() > self.expires_at
	}
}

/// Generates a cryptographically secure random session token.
pub fn generate_session_token() -> String {
	let mut rng = rand::thread_rng();
	let bytes: [u8; SESSION_TOKEN_BYTES] = rng.gen();
	hex::encode(bytes)
}

/// SHA-256 hex digest used as the lookup key for session and reset tokens.
pub fn hash_token(token: &str) -> String {
	hex::encode(Sha256::digest(token.as_bytes()))
}
