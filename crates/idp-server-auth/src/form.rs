// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-field validation messages for HTML forms.
//!
//! Templates receive the errors as `errors.<field>`, a list of messages, so a
//! page can render `{{#each errors.email}}<p>{{this}}</p>{{/each}}`.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors {
	fields: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
	pub fn new() -> Self {
		Self::default()
	}

	/// Single-message shorthand, e.g. for a generic login failure.
	pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
		let mut errors = Self::new();
		errors.add(field, message);
		errors
	}

	pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.fields
			.entry(field.into())
			.or_default()
			.push(message.into());
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn has(&self, field: &str) -> bool {
		self.fields.contains_key(field)
	}

	pub fn get(&self, field: &str) -> &[String] {
		self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn merge(&mut self, other: FormErrors) {
		for (field, messages) in other.fields {
			self.fields.entry(field).or_default().extend(messages);
		}
	}

	/// `Ok(value)` when no errors were recorded.
	pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
		if self.is_empty() {
			Ok(value)
		} else {
			Err(self)
		}
	}

	pub fn into_context(self) -> Value {
		Value::Object(
			self.fields
				.into_iter()
				.map(|(field, messages)| {
					(
						field,
						Value::Array(messages.into_iter().map(Value::String).collect()),
					)
				})
				.collect(),
		)
	}
}
