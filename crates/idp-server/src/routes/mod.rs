// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod health;
pub mod login;
pub mod logout;
pub mod password;
pub mod profile;
pub mod register;
