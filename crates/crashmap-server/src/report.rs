// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Terminal rendering for the offline `symbolicate` command.

use std::fmt::Write as _;

use crashmap_core::ResolvedPosition;
use crashmap_symbolicate::extract_context;

/// Render each trace line with its original location and surrounding source.
///
/// Lines without a result are echoed unchanged.
pub fn render(lines: &[&str], results: &[Option<ResolvedPosition>], context: usize) -> String {
	let mut out = String::new();

	for (raw, result) in lines.iter().zip(results) {
		let _ = writeln!(out, "{raw}");
		let Some(position) = result else {
			continue;
		};

		let _ = writeln!(
			out,
			"    -> {}:{}:{}",
			position.file, position.line, position.column
		);

		let Some(content) = position.source_content.as_deref() else {
			continue;
		};
		if context == 0 {
			continue;
		}

		let line = position.line as usize;
		let (pre, current, post) = extract_context(content, line, context);
		if current.is_empty() && pre.is_empty() {
			continue;
		}

		let first = line - pre.len();
		let width = (line + post.len()).to_string().len();
		for (i, text) in pre.iter().enumerate() {
			let _ = writeln!(out, "       {:>width$} | {text}", first + i);
		}
		let _ = writeln!(out, "     > {line:>width$} | {current}");
		for (i, text) in post.iter().enumerate() {
			let _ = writeln!(out, "       {:>width$} | {text}", line + 1 + i);
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unresolved_lines_are_echoed() {
		let out = render(&["Error: boom"], &[None], 2);
		assert_eq!(out, "Error: boom\n");
	}

	#[test]
	fn resolved_lines_show_context() {
		let position = ResolvedPosition {
			file: "app/root.tsx".to_string(),
			line: 2,
			column: 4,
			source_content: Some("one\ntwo\nthree\nfour".to_string()),
		};

		let out = render(&["    at /b/index.js:1:0"], &[Some(position)], 1);

		assert_eq!(
			out,
			"    at /b/index.js:1:0\n    -> app/root.tsx:2:4\n       1 | one\n     > 2 | two\n       3 | three\n"
		);
	}

	#[test]
	fn missing_content_prints_location_only() {
		let position = ResolvedPosition {
			file: "a.ts".to_string(),
			line: 5,
			column: 2,
			source_content: None,
		};

		let out = render(&["at x (/b/i.js:1:0)"], &[Some(position)], 3);
		assert_eq!(out, "at x (/b/i.js:1:0)\n    -> a.ts:5:2\n");
	}
}
