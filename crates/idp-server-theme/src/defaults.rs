// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Default page templates used when a client has no themed override.
//!
//! [`DefaultTemplates::load`] reads and compiles every mapped page and layout
//! once at startup, so a missing or broken default file stops the server
//! instead of failing a request. With caching on, the compiled templates are
//! kept in a registry keyed by page; with caching off the files are re-read
//! per render, which is convenient while editing templates.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use handlebars::{Handlebars, Template};
use serde_json::Value;

use crate::error::ThemeError;
use crate::files::TemplateFiles;
use crate::layouts::{DefaultLayoutMapping, DefaultPaths};
use crate::render::{merge_content, new_engine, render_in_layout};

pub struct DefaultTemplates {
	mapping: DefaultLayoutMapping,
	files: Arc<dyn TemplateFiles>,
	/// Present when caching is enabled.
	compiled: Option<Handlebars<'static>>,
}

impl std::fmt::Debug for DefaultTemplates {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DefaultTemplates")
			.field("pages", &self.mapping.len())
			.field("cached", &self.compiled.is_some())
			.finish()
	}
}

fn page_key(page: &str) -> String {
	format!("page/{page}")
}

fn layout_key(layout: &Path) -> String {
	layout.display().to_string()
}

impl DefaultTemplates {
	#[tracing::instrument(skip(mapping, files), fields(pages = mapping.len()))]
	pub async fn load(
		mapping: DefaultLayoutMapping,
		files: Arc<dyn TemplateFiles>,
		cache: bool,
	) -> Result<Self, ThemeError> {
		let mut engine = new_engine();
		let mut seen_layouts = BTreeSet::new();

		for (page, paths) in mapping.iter() {
			let page_source = files.read(&paths.page).await?;
			let compiled_page = compile(&paths.page, &page_source)?;
			engine.register_template(&page_key(page), compiled_page);

			if seen_layouts.insert(paths.layout.clone()) {
				let layout_source = files.read(&paths.layout).await?;
				let compiled_layout = compile(&paths.layout, &layout_source)?;
				engine.register_template(&layout_key(&paths.layout), compiled_layout);
			}
		}

		tracing::info!(
			pages = mapping.len(),
			layouts = seen_layouts.len(),
			cache,
			"default templates loaded"
		);

		Ok(Self {
			mapping,
			files,
			compiled: cache.then_some(engine),
		})
	}

	pub fn mapping(&self) -> &DefaultLayoutMapping {
		&self.mapping
	}

	pub fn paths(&self, page: &str) -> Result<&DefaultPaths, ThemeError> {
		self.mapping
			.get(page)
			.ok_or_else(|| ThemeError::UnknownPage(page.to_string()))
	}

	#[tracing::instrument(skip(self, context))]
	pub async fn render(&self, page: &str, context: &Value) -> Result<String, ThemeError> {
		let paths = self.paths(page)?;

		match &self.compiled {
			Some(engine) => {
				let content = engine
					.render(&page_key(page), context)
					.map_err(|e| ThemeError::render(page, e))?;
				let merged = merge_content(context, content);
				engine
					.render(&layout_key(&paths.layout), &merged)
					.map_err(|e| ThemeError::render(layout_key(&paths.layout), e))
			}
			None => {
				let page_source = self.files.read(&paths.page).await?;
				let layout_source = self.files.read(&paths.layout).await?;
				render_in_layout(
					&new_engine(),
					page,
					&page_source,
					&layout_key(&paths.layout),
					&layout_source,
					context,
				)
			}
		}
	}
}

fn compile(path: &Path, source: &str) -> Result<Template, ThemeError> {
	Template::compile(source).map_err(|e| ThemeError::template(path.display().to_string(), e))
}
