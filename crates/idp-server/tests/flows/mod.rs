// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod health;
mod login;
mod logout;
mod password;
mod profile;
mod register;
pub mod support;
mod theming;
