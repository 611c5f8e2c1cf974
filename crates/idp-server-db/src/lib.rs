// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # idp-server-db
//!
//! SQLite persistence for the identity provider via sqlx.
//!
//! Each domain has a `*Store` trait (the seam the HTTP layer and the theme
//! service depend on) and a `*Repository` holding a `SqlitePool` whose
//! inherent methods the trait impl delegates to.
//!
//! Lookups where absence is normal return `Result<Option<T>>`; unique
//! constraint violations surface as [`DbError::Conflict`].
//!
//! Clients, themes, layouts and templates are provisioned out of band. This
//! crate only reads them, apart from the `create_*` helpers used for seeding.

pub mod client;
pub mod error;
pub mod password_reset;
pub mod pool;
pub mod session;
pub mod theme;
pub mod types;
pub mod user;
mod util;

#[cfg(test)]
pub mod testing;

pub use client::{ClientRepository, ClientStore};
pub use error::{DbError, Result};
pub use password_reset::{PasswordResetRepository, PasswordResetStore};
pub use pool::{create_pool, ping};
pub use session::{SessionRepository, SessionStore};
pub use theme::{ThemeRepository, ThemeStore};
pub use types::{Client, Layout, Theme, ThemeTemplate};
pub use user::{UserRepository, UserStore};
