// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack trace line parsing.
//!
//! Two line shapes are recognized, tried in order:
//!
//! - named call: `at loader (/app/build/index.js:10:5)`
//! - anonymous: `at /app/build/index.js:10:5` or `/app/build/index.js:10:5`
//!
//! Anything else (the `Error: message` header, `at async Promise.all (index 0)`,
//! blank lines) does not parse.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crashmap_core::ParsedFrame;

static LEADING_AT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^at\s+").unwrap());

static NAMED_CALL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^(.+) \((.+):(\d+):(\d+)\)$").unwrap());

// POSIX absolute paths, Windows drive paths and URLs (http, file, ...).
static ANONYMOUS: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^((?:/|[A-Za-z]:[\\/]|[A-Za-z][A-Za-z0-9+.-]*://).+):(\d+):(\d+)$").unwrap()
});

/// A recognized stack trace line shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePattern {
	NamedCall,
	Anonymous,
}

impl FramePattern {
	/// Patterns in the order they are tried.
	pub const ORDERED: [FramePattern; 2] = [FramePattern::NamedCall, FramePattern::Anonymous];

	/// Match a line that has already had its leading `at` token removed.
	pub fn try_match(self, line: &str) -> Option<ParsedFrame> {
		match self {
			FramePattern::NamedCall => {
				let caps = NAMED_CALL.captures(line)?;
				let frame = frame_from(&caps, 2)?;
				Some(frame.with_method_name(&caps[1]))
			}
			FramePattern::Anonymous => {
				let caps = ANONYMOUS.captures(line)?;
				frame_from(&caps, 1)
			}
		}
	}
}

fn frame_from(caps: &Captures<'_>, first: usize) -> Option<ParsedFrame> {
	let file = caps.get(first)?.as_str();
	// Digits that overflow u32 are not a usable coordinate.
	let line = caps.get(first + 1)?.as_str().parse().ok()?;
	let column = caps.get(first + 2)?.as_str().parse().ok()?;
	Some(ParsedFrame::new(file, line, column))
}

/// Parse one raw stack trace line.
///
/// Returns `None` when the line matches none of [`FramePattern::ORDERED`].
pub fn parse_frame(line: &str) -> Option<ParsedFrame> {
	let trimmed = line.trim();
	let stripped = LEADING_AT.replace(trimmed, "");
	let stripped = stripped.trim();

	FramePattern::ORDERED
		.iter()
		.find_map(|pattern| pattern.try_match(stripped))
}

/// Parse every line of a stack trace, keeping one slot per line.
pub fn parse_trace(trace: &str) -> Vec<Option<ParsedFrame>> {
	trace.lines().map(parse_frame).collect()
}
