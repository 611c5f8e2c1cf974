// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Page-inside-layout rendering.
//!
//! A page is rendered with the caller's context; the result is added to that
//! context under `content` and the layout is rendered with the merged
//! context. Layouts embed the page with `{{{content}}}`.

use handlebars::Handlebars;
use idp_server_db::ThemeTemplate;
use serde_json::{Map, Value};

use crate::error::ThemeError;

pub const CONTENT_KEY: &str = "content";

/// Handlebars registry with HTML escaping and lenient missing fields.
pub fn new_engine() -> Handlebars<'static> {
	let mut engine = Handlebars::new();
	engine.set_strict_mode(false);
	engine
}

/// Copy of `context` with `content` set. A non-object context contributes no fields.
pub fn merge_content(context: &Value, content: String) -> Value {
	let mut merged = match context {
		Value::Object(map) => map.clone(),
		_ => Map::new(),
	};
	merged.insert(CONTENT_KEY.to_string(), Value::String(content));
	Value::Object(merged)
}

pub fn render_in_layout(
	engine: &Handlebars<'_>,
	page_name: &str,
	page_source: &str,
	layout_name: &str,
	layout_source: &str,
	context: &Value,
) -> Result<String, ThemeError> {
	let content = engine
		.render_template(page_source, context)
		.map_err(|e| ThemeError::render(page_name, e))?;
	let merged = merge_content(context, content);
	engine
		.render_template(layout_source, &merged)
		.map_err(|e| ThemeError::render(layout_name, e))
}

/// Something that renders a page together with its own layout.
pub trait RenderTemplate {
	fn render(
		&self,
		engine: &Handlebars<'_>,
		page: &str,
		context: &Value,
	) -> Result<String, ThemeError>;
}

impl RenderTemplate for ThemeTemplate {
	fn render(
		&self,
		engine: &Handlebars<'_>,
		page: &str,
		context: &Value,
	) -> Result<String, ThemeError> {
		render_in_layout(
			engine,
			&format!("theme/{}/{page}", self.theme_id),
			&self.source,
			&format!("layout/{}", self.layout.name),
			&self.layout.source,
			context,
		)
	}
}
