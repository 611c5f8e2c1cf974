// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account primitives for the identity provider.
//!
//! - [`User`] records and field validation for the registration and profile forms
//! - argon2id password hashing ([`hash_password`], [`verify_password`])
//! - web [`Session`]s keyed by a random token whose SHA-256 is persisted
//! - single-use [`PasswordResetToken`]s
//! - [`FormErrors`] for re-rendering invalid forms
//! - session cookie helpers

mod argon2_config;
pub mod error;
pub mod form;
pub mod middleware;
pub mod password;
pub mod password_reset;
pub mod session;
pub mod types;
pub mod user;
pub mod validation;

pub use error::AuthError;
pub use form::FormErrors;
pub use middleware::{
	clear_session_cookie, extract_session_cookie_with_name, session_cookie, SessionCookieOptions,
};
pub use password::{hash_password, verify_password};
pub use password_reset::{PasswordResetToken, MAX_RESET_TTL_MINUTES, RESET_TOKEN_BYTES};
pub use session::{generate_session_token, hash_token, Session, MAX_SESSION_LIFETIME_DAYS};
pub use types::{ResetTokenId, SessionId, UserId};
pub use user::User;
