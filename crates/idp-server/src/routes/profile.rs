// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Profile page: display name, locale and picture.

use axum::{
	extract::{Multipart, Query, State},
	http::StatusCode,
	response::Response,
};
use idp_server_auth::{
	validation::{validate_display_name, validate_locale},
	FormErrors, User,
};
use idp_server_theme::pages;
use serde_json::json;

use crate::api::AppState;
use crate::auth_middleware::RequireUser;
use crate::error::ServerError;
use crate::pages::{render_page, ClientQuery, PageContext};
use crate::uploads::{picture_extension, UploadError};

#[derive(Debug, Default)]
struct ProfileForm {
	display_name: String,
	locale: Option<String>,
	picture: Option<Picture>,
}

#[derive(Debug)]
struct Picture {
	content_type: String,
	bytes: Vec<u8>,
}

fn profile_context(client_id: &str, user: &User) -> PageContext {
	PageContext::new(client_id, None)
		.with("user", user.to_context())
		.values(json!({
			"display_name": user.display_name,
			"locale": user.locale,
		}))
}

#[tracing::instrument(skip(state, current), fields(user_id = %current.user.id))]
pub async fn show(
	State(state): State<AppState>,
	RequireUser(current): RequireUser,
	Query(query): Query<ClientQuery>,
) -> Result<Response, ServerError> {
	let context = profile_context(&query.client_id, &current.user);
	render_page(&state, StatusCode::OK, &query.client_id, pages::PROFILE, context).await
}

async fn read_form(mut multipart: Multipart) -> Result<ProfileForm, ServerError> {
	let mut form = ProfileForm::default();
	while let Some(field) = multipart.next_field().await? {
		let name = field.name().map(str::to_string);
		match name.as_deref() {
			Some("display_name") => form.display_name = field.text().await?,
			Some("locale") => form.locale = Some(field.text().await?),
			Some("picture") => {
				// Browsers send an empty part when no file was chosen.
				let has_file = field.file_name().is_some_and(|name| !name.is_empty());
				let content_type = field.content_type().unwrap_or_default().to_string();
				let bytes = field.bytes().await?;
				if has_file || !bytes.is_empty() {
					form.picture = Some(Picture {
						content_type,
						bytes: bytes.to_vec(),
					});
				}
			}
			_ => {}
		}
	}
	Ok(form)
}

#[tracing::instrument(skip(state, current, multipart), fields(user_id = %current.user.id))]
pub async fn submit(
	State(state): State<AppState>,
	RequireUser(current): RequireUser,
	Query(query): Query<ClientQuery>,
	multipart: Multipart,
) -> Result<Response, ServerError> {
	let form = read_form(multipart).await?;

	let mut errors = FormErrors::new();
	let display_name = validate_display_name(&form.display_name, &mut errors);
	let locale = validate_locale(form.locale.as_deref(), &mut errors);
	let extension = match &form.picture {
		Some(picture) => match picture_extension(
			&picture.content_type,
			picture.bytes.len(),
			state.uploads_config.max_bytes,
		) {
			Ok(ext) => Some(ext),
			Err(e) => {
				errors.add("picture", picture_error_message(&e));
				None
			}
		},
		None => None,
	};

	if !errors.is_empty() {
		let context = profile_context(&query.client_id, &current.user)
			.errors(errors)
			.values(json!({ "display_name": display_name, "locale": form.locale }));
		return render_page(
			&state,
			StatusCode::UNPROCESSABLE_ENTITY,
			&query.client_id,
			pages::PROFILE,
			context,
		)
		.await;
	}

	let picture_url = match (&form.picture, extension) {
		(Some(picture), Some(ext)) => Some(
			state
				.avatars
				.store(&current.user.id, ext, &picture.bytes)
				.await?,
		),
		_ => None,
	};

	state
		.user_repo
		.update_profile(
			&current.user.id,
			&display_name,
			locale.as_deref(),
			picture_url.as_deref(),
		)
		.await?;
	tracing::info!(picture_updated = picture_url.is_some(), "profile updated");

	if let (Some(_), Some(previous)) = (&picture_url, &current.user.picture_url) {
		if let Err(e) = state.avatars.remove(previous).await {
			tracing::warn!(error = %e, "failed to remove previous picture");
		}
	}

	let user = state
		.user_repo
		.get_user_by_id(&current.user.id)
		.await?
		.ok_or_else(|| ServerError::Internal("user vanished during profile update".to_string()))?;

	let context = profile_context(&query.client_id, &user).with("notice", "Your profile has been updated.");
	render_page(&state, StatusCode::OK, &query.client_id, pages::PROFILE, context).await
}

fn picture_error_message(error: &UploadError) -> String {
	match error {
		UploadError::UnsupportedType(_) => "Picture must be a PNG, JPEG, GIF or WebP image".to_string(),
		UploadError::TooLarge { max_bytes } => {
			format!("Picture must be at most {} KB", max_bytes / 1024)
		}
		UploadError::Empty => "Picture is empty".to_string(),
		UploadError::Io(_) => "Picture could not be stored".to_string(),
	}
}
