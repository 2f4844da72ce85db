// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for symbolication operations.
//!
//! Every variant is recoverable per frame: the service turns it into an empty
//! result slot and moves on to the next frame.

use thiserror::Error;

/// Errors that can occur while symbolicating a single frame.
#[derive(Debug, Error)]
pub enum SymbolicateError {
	#[error("unrecognized stack frame: {0:?}")]
	UnparseableFrame(String),

	#[error("artifact unavailable at {location}: {source}")]
	ArtifactUnavailable {
		location: String,
		#[source]
		source: FetchError,
	},

	#[error("malformed source map: {0}")]
	MalformedMap(#[from] MapError),

	#[error("no mapping found for line {line}, column {column}")]
	MappingNotFound { line: u32, column: u32 },
}

impl SymbolicateError {
	pub(crate) fn unavailable(location: impl Into<String>, source: impl Into<FetchError>) -> Self {
		Self::ArtifactUnavailable {
			location: location.into(),
			source: source.into(),
		}
	}

	/// Stable identifier for logs.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::UnparseableFrame(_) => "unparseable_frame",
			Self::ArtifactUnavailable { .. } => "artifact_unavailable",
			Self::MalformedMap(_) => "malformed_map",
			Self::MappingNotFound { .. } => "mapping_not_found",
		}
	}
}

/// Transport-level reasons an artifact could not be read.
#[derive(Debug, Error)]
pub enum FetchError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("invalid URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	#[error("not a local file URL: {0}")]
	NotAFilePath(String),
}

/// Reasons a source map document could not be decoded.
#[derive(Debug, Error)]
pub enum MapError {
	#[error("invalid source map JSON: {0}")]
	InvalidJson(#[from] serde_json::Error),

	#[error("invalid inline source map encoding: {0}")]
	InvalidBase64(#[from] base64::DecodeError),

	#[error("unsupported source map data URL: {0}")]
	UnsupportedDataUrl(String),

	#[error("invalid source map version: expected 3, got {0}")]
	InvalidVersion(u32),

	#[error("invalid VLQ character: {0:?}")]
	InvalidVlqChar(char),

	#[error("VLQ value overflows 32 bits")]
	VlqOverflow,

	#[error("invalid mapping segment {segment:?}: {reason}")]
	InvalidSegment { segment: String, reason: &'static str },

	#[error("invalid source index: {0}")]
	InvalidSourceIndex(u32),
}

pub type Result<T> = std::result::Result<T, SymbolicateError>;
