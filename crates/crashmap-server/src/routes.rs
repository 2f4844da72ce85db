// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Symbolication HTTP routes.
//!
//! - `GET|OPTIONS /_crash` and `/_crash/stacktrace`: empty 204 for preflight
//! - `POST /_crash?bundledFile=&line=&column=`: one frame (`file` is accepted too)
//! - `POST /_crash/stacktrace`: a whole trace, one result per line
//!
//! Every route answers 404 unless the server runs in development mode.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, Request, State};
use axum::http::header::{
	ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{debug, instrument};

use crashmap_core::{FrameRequest, ParsedFrame};

use crate::error::{Result, ServerError};
use crate::response::FrameResponse;
use crate::state::AppState;

pub const FRAME_PATH: &str = "/_crash";
pub const STACKTRACE_PATH: &str = "/_crash/stacktrace";

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, PATCH, OPTIONS, HEAD";
const ALLOW_HEADERS: &str = "Content-Type, Accept, Authorization";

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route(
			FRAME_PATH,
			get(preflight).options(preflight).post(symbolicate_frame),
		)
		.route(
			STACKTRACE_PATH,
			get(preflight).options(preflight).post(symbolicate_stacktrace),
		)
		.layer(SetResponseHeaderLayer::overriding(
			ACCESS_CONTROL_ALLOW_ORIGIN,
			HeaderValue::from_static("*"),
		))
		.layer(SetResponseHeaderLayer::overriding(
			ACCESS_CONTROL_ALLOW_METHODS,
			HeaderValue::from_static(ALLOW_METHODS),
		))
		.layer(SetResponseHeaderLayer::overriding(
			ACCESS_CONTROL_ALLOW_HEADERS,
			HeaderValue::from_static(ALLOW_HEADERS),
		))
		.layer(middleware::from_fn_with_state(
			state.clone(),
			require_dev_mode,
		))
		.with_state(state)
}

async fn require_dev_mode(State(state): State<AppState>, request: Request, next: Next) -> Response {
	if !state.config.dev_mode() {
		debug!(
			environment = %state.config.environment,
			path = %request.uri().path(),
			"symbolication disabled outside development"
		);
		return ServerError::NotFound.into_response();
	}
	next.run(request).await
}

async fn preflight() -> StatusCode {
	StatusCode::NO_CONTENT
}

#[derive(Debug, Default, Deserialize)]
pub struct FrameQuery {
	#[serde(default, rename = "bundledFile")]
	pub bundled_file: Option<String>,
	/// Short form of `bundledFile`; used only when `bundledFile` is absent.
	#[serde(default)]
	pub file: Option<String>,
	#[serde(default)]
	pub line: Option<String>,
	#[serde(default)]
	pub column: Option<String>,
}

impl FrameQuery {
	/// Validate into a frame request. Every missing field is reported at once.
	pub fn into_request(self) -> Result<FrameRequest> {
		let file = self
			.bundled_file
			.filter(|f| !f.is_empty())
			.or(self.file.filter(|f| !f.is_empty()));
		let line = self.line.filter(|l| !l.is_empty());
		let column = self.column.filter(|c| !c.is_empty());

		let (file, line, column) = match (file, line, column) {
			(Some(file), Some(line), Some(column)) => (file, line, column),
			(file, line, column) => {
				let missing = [("file", file.is_none()), ("line", line.is_none()), ("column", column.is_none())]
					.into_iter()
					.filter_map(|(name, missing)| missing.then_some(name))
					.collect();
				return Err(ServerError::MissingParameters(missing));
			}
		};

		Ok(FrameRequest {
			bundled_file: file,
			line: parse_coordinate("line", line)?,
			column: parse_coordinate("column", column)?,
		})
	}
}

fn parse_coordinate(name: &'static str, value: String) -> Result<u32> {
	value
		.trim()
		.parse()
		.map_err(|_| ServerError::InvalidParameter { name, value })
}

#[instrument(skip(state, query))]
async fn symbolicate_frame(
	State(state): State<AppState>,
	Query(query): Query<FrameQuery>,
) -> Result<Json<Option<FrameResponse>>> {
	let frame = ParsedFrame::from(query.into_request()?);
	let root = state.root();

	let response = state
		.service
		.symbolicate_frame(&frame)
		.await
		.map(|position| FrameResponse::from_position(&root, position));

	Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct StacktraceRequest {
	pub stacktrace: Vec<String>,
}

#[instrument(skip(state, body))]
async fn symbolicate_stacktrace(
	State(state): State<AppState>,
	body: std::result::Result<Json<StacktraceRequest>, JsonRejection>,
) -> Result<Json<Vec<Option<FrameResponse>>>> {
	let Json(request) = body.map_err(|e| ServerError::InvalidBody(e.body_text()))?;
	let root = state.root();

	let results = state
		.service
		.symbolicate_lines(&request.stacktrace)
		.await
		.into_iter()
		.map(|slot| slot.map(|position| FrameResponse::from_position(&root, position)))
		.collect();

	Ok(Json(results))
}
