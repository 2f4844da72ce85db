// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolved original source positions.

use serde::{Deserialize, Serialize};

/// Original source location for a generated-code coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPosition {
	/// Original source file.
	pub file: String,
	/// Line in the original source (1-indexed).
	pub line: u32,
	/// Column in the original source.
	pub column: u32,
	/// Full text of the original source, when the map embeds it.
	pub source_content: Option<String>,
}

/// Per-frame results, index-aligned with the frames that were submitted.
///
/// `None` marks a frame that could not be symbolicated.
pub type SymbolicationResult = Vec<Option<ResolvedPosition>>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_source_content_serializes_as_null() {
		let position = ResolvedPosition {
			file: "app/routes/index.tsx".to_string(),
			line: 12,
			column: 4,
			source_content: None,
		};

		let json = serde_json::to_value(&position).unwrap();
		assert!(json["sourceContent"].is_null());
		assert_eq!(json["line"], 12);
	}
}
