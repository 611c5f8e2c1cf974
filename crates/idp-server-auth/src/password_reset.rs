// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Single-use password reset tokens.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::session::hash_token;
use crate::types::{ResetTokenId, UserId};

pub const RESET_TOKEN_BYTES: usize = 32;

/// Longest validity [`PasswordResetToken::issue`] will grant.
pub const MAX_RESET_TTL_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone)]
pub struct PasswordResetToken {
	pub id: ResetTokenId,
	pub user_id: UserId,
	pub token_hash: String,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
	pub used_at: Option<DateTime<Utc>>,
}

impl PasswordResetToken {
	/// Returns the raw token for the email link together with the record to persist.
	/// `ttl_minutes` is clamped to `1..=MAX_RESET_TTL_MINUTES`.
	pub fn issue(user_id: UserId, ttl_minutes: i64) -> (String, Self) {
		let mut rng = rand::thread_rng();
		let bytes: [u8; RESET_TOKEN_BYTES] = rng.gen();
		let token = hex::encode(bytes);
		let now = Utc::now();
		let record = Self {
			id: ResetTokenId::generate(),
			user_id,
			token_hash: hash_token(&token),
			created_at: now,
			expires_at: now + Duration::minutes(ttl_minutes.clamp(1, MAX_RESET_TTL_MINUTES)),
			used_at: None,
		};
		(token, record)
	}

	pub fn is_expired(&self) -> bool {
		Utc::now() > self.expires_at
	}

	pub fn is_usable(&self) -> bool {
		self.used_at.is_none() && !self.is_expired()
	}
}
