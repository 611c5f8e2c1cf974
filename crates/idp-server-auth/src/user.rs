// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
	pub id: UserId,
	/// Lowercased and trimmed; unique.
	pub email: String,
	pub display_name: String,
	#[serde(skip_serializing)]
	pub password_hash: String,
	pub locale: Option<String>,
	pub picture_url: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl User {
	pub fn new(email: String, display_name: String, password_hash: String) -> Self {
		let now = Utc::now();
		Self {
			id: UserId::generate(),
			email,
			display_name,
			password_hash,
			locale: None,
			picture_url: None,
			created_at: now,
			updated_at: now,
		}
	}

	/// Public fields exposed to page templates.
	pub fn to_context(&self) -> serde_json::Value {
		serde_json::json!({
			"id": self.id,
			"email": self.email,
			"display_name": self.display_name,
			"locale": self.locale,
			"picture_url": self.picture_url,
		})
	}
}
