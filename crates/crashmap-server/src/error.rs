// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the symbolication endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Request-level failures. Per-frame symbolication failures are not errors
/// here; they are reported as `null` results.
#[derive(Debug, Error)]
pub enum ServerError {
	#[error("not found")]
	NotFound,

	#[error("missing required parameters: {}", .0.join(", "))]
	MissingParameters(Vec<&'static str>),

	#[error("invalid value for {name}: {value:?}")]
	InvalidParameter { name: &'static str, value: String },

	#[error("invalid request body: {0}")]
	InvalidBody(String),
}

impl ServerError {
	fn code(&self) -> &'static str {
		match self {
			ServerError::NotFound => "not_found",
			ServerError::MissingParameters(_) => "missing_parameters",
			ServerError::InvalidParameter { .. } => "invalid_parameter",
			ServerError::InvalidBody(_) => "invalid_body",
		}
	}
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: &'static str,
	message: String,
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		match self {
			ServerError::NotFound => StatusCode::NOT_FOUND.into_response(),
			other => {
				let body = ErrorBody {
					error: other.code(),
					message: other.to_string(),
				};
				(StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
			}
		}
	}
}

/// Failures while building the application from configuration.
#[derive(Debug, Error)]
pub enum StartupError {
	#[error("failed to build HTTP client: {0}")]
	HttpClient(#[from] reqwest::Error),

	#[error("invalid strip path pattern: {0}")]
	CleanupPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
