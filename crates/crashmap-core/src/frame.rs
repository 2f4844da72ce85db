// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Parsed stack trace frames.

use serde::{Deserialize, Serialize};

/// One call site from a stack trace, in generated-code coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFrame {
	/// Function or method name, absent for anonymous frames.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub method_name: Option<String>,
	/// Path or URL of the bundled file.
	pub file: String,
	/// Line in the bundled file (1-indexed).
	pub line: u32,
	/// Column in the bundled file, as printed in the trace.
	pub column: u32,
}

impl ParsedFrame {
	/// Creates an anonymous frame.
	pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
		Self {
			method_name: None,
			file: file.into(),
			line,
			column,
		}
	}

	/// Sets the method name.
	pub fn with_method_name(mut self, name: impl Into<String>) -> Self {
		self.method_name = Some(name.into());
		self
	}
}

/// A single frame submitted on its own, outside of a stack trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRequest {
	pub bundled_file: String,
	pub line: u32,
	pub column: u32,
}

impl From<FrameRequest> for ParsedFrame {
	fn from(request: FrameRequest) -> Self {
		ParsedFrame::new(request.bundled_file, request.line, request.column)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn anonymous_frame_omits_method_name() {
		let frame = ParsedFrame::new("/app/build/index.js", 10, 4);
		let json = serde_json::to_value(&frame).unwrap();

		assert_eq!(
			json,
			serde_json::json!({"file": "/app/build/index.js", "line": 10, "column": 4})
		);
	}

	#[test]
	fn named_frame_uses_camel_case() {
		let frame = ParsedFrame::new("/app/build/index.js", 10, 4).with_method_name("loader");
		let json = serde_json::to_value(&frame).unwrap();

		assert_eq!(json["methodName"], "loader");
	}

	#[test]
	fn frame_request_becomes_anonymous_frame() {
		let request: FrameRequest = serde_json::from_value(
			serde_json::json!({"bundledFile": "/app/build/index.js", "line": 3, "column": 7}),
		)
		.unwrap();

		assert_eq!(
			ParsedFrame::from(request),
			ParsedFrame::new("/app/build/index.js", 3, 7)
		);
	}
}
