// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire shape of a symbolicated frame.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crashmap_core::ResolvedPosition;

/// One frame as returned to browser callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResponse {
	pub root: String,
	/// Original file, relative to `root` when it lies under it.
	pub file: String,
	pub source_content: Option<String>,
	pub line: Option<u32>,
	pub column: Option<u32>,
}

impl FrameResponse {
	pub fn from_position(root: &str, position: ResolvedPosition) -> Self {
		let file = strip_root(root, &position.file);
		Self {
			root: root.to_string(),
			file,
			source_content: position.source_content,
			line: Some(position.line),
			column: Some(position.column),
		}
	}
}

/// Drops `root` from the front of `file` at a path component boundary.
fn strip_root(root: &str, file: &str) -> String {
	if root.is_empty() {
		return file.to_string();
	}
	match Path::new(file).strip_prefix(root) {
		Ok(rest) => format!("/{}", rest.display()),
		Err(_) => file.to_string(),
	}
}
