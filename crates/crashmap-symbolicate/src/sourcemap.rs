// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map parsing and position lookup.
//!
//! Implements the Source Map v3 mapping-table format. A [`RawSourceMap`] is the
//! parsed JSON document and is never mutated; decoding its `mappings` string is
//! the expensive part and lives in a [`SourceMapConsumer`] that is scoped to a
//! single [`resolve`] call.

use serde::Deserialize;
use tracing::trace;

use crashmap_core::ResolvedPosition;

use crate::error::{MapError, Result, SymbolicateError};
use crate::vlq::{decode_vlq_mappings, DecodedMappings};

/// Synthetic prefix some bundlers put in front of route module sources.
pub const ROUTE_MODULE_PREFIX: &str = "route-module:";

/// Raw source map JSON structure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
	pub version: u32,
	#[serde(default)]
	pub source_root: Option<String>,
	pub sources: Vec<String>,
	#[serde(default)]
	pub sources_content: Option<Vec<Option<String>>>,
	pub mappings: String,
}

impl RawSourceMap {
	/// Parse a source map from JSON bytes.
	pub fn from_slice(data: &[u8]) -> std::result::Result<Self, MapError> {
		let raw: RawSourceMap = serde_json::from_slice(data)?;

		if raw.version != 3 {
			return Err(MapError::InvalidVersion(raw.version));
		}

		Ok(raw)
	}

	/// Parse a source map from a JSON string.
	pub fn parse(data: &str) -> std::result::Result<Self, MapError> {
		Self::from_slice(data.as_bytes())
	}

	/// Check if this source map has embedded source content.
	pub fn has_sources_content(&self) -> bool {
		self.sources_content
			.as_ref()
			.is_some_and(|contents| contents.iter().any(Option::is_some))
	}
}

/// Original position information from a source map lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition {
	/// Original source file path, joined with the source root.
	pub source: String,
	/// Index of the source in the map's `sources` list.
	pub source_index: u32,
	/// Line in the original source (1-indexed for display).
	pub line: u32,
	/// Column in the original source (0-indexed).
	pub column: u32,
}

/// Decoded view over a [`RawSourceMap`].
///
/// Holds the decoded mapping table for as long as the consumer lives; dropping
/// it releases the table.
#[derive(Debug)]
pub struct SourceMapConsumer<'a> {
	map: &'a RawSourceMap,
	mappings: DecodedMappings,
}

impl<'a> SourceMapConsumer<'a> {
	pub fn new(map: &'a RawSourceMap) -> std::result::Result<Self, MapError> {
		if map.version != 3 {
			return Err(MapError::InvalidVersion(map.version));
		}

		let mappings = decode_vlq_mappings(&map.mappings)?;
		trace!(
			mappings = mappings.len(),
			sources = map.sources.len(),
			"decoded source map"
		);

		Ok(Self { map, mappings })
	}

	/// Lookup the original position for a generated line and column.
	///
	/// Lines are 1-indexed (as displayed in stack traces), columns are 0-indexed.
	/// Returns `None` if no mapping exists for this position or the closest
	/// mapping carries no original location.
	pub fn original_position_for(
		&self,
		line: u32,
		column: u32,
	) -> std::result::Result<Option<OriginalPosition>, MapError> {
		let line_0indexed = match line.checked_sub(1) {
			Some(l) => l,
			None => return Ok(None),
		};

		let original = match self
			.mappings
			.find(line_0indexed, column)
			.and_then(|m| m.original)
		{
			Some(o) => o,
			None => return Ok(None),
		};

		let source = self
			.map
			.sources
			.get(original.source_index as usize)
			.ok_or(MapError::InvalidSourceIndex(original.source_index))?;

		Ok(Some(OriginalPosition {
			source: self.resolve_source_path(source),
			source_index: original.source_index,
			line: original.line + 1,
			column: original.column,
		}))
	}

	/// Embedded content for a source, `None` when the map does not carry it.
	pub fn source_content_for(&self, source_index: u32) -> Option<&'a str> {
		self.map
			.sources_content
			.as_ref()?
			.get(source_index as usize)?
			.as_deref()
	}

	/// Resolve a source path with the source root if present.
	fn resolve_source_path(&self, source: &str) -> String {
		match &self.map.source_root {
			Some(root) if !root.is_empty() => {
				let root = root.trim_end_matches('/');
				format!("{}/{}", root, source)
			}
			_ => source.to_string(),
		}
	}
}

impl Drop for SourceMapConsumer<'_> {
	fn drop(&mut self) {
		trace!(mappings = self.mappings.len(), "released source map consumer");
	}
}

/// Resolve a generated position to its original source position.
///
/// The decoded mapping table only exists for the duration of this call.
pub fn resolve(map: &RawSourceMap, line: u32, column: u32) -> Result<ResolvedPosition> {
	let consumer = SourceMapConsumer::new(map)?;

	let original = consumer
		.original_position_for(line, column)?
		.ok_or(SymbolicateError::MappingNotFound { line, column })?;

	let source_content = consumer
		.source_content_for(original.source_index)
		.map(str::to_string);

	Ok(ResolvedPosition {
		file: original.source.replacen(ROUTE_MODULE_PREFIX, "", 1),
		line: original.line,
		column: original.column,
		source_content,
	})
}

/// Extract source context lines around a given line number.
///
/// Returns (pre_context, context_line, post_context).
pub fn extract_context(
	source_content: &str,
	line: usize,
	context_lines: usize,
) -> (Vec<String>, String, Vec<String>) {
	let lines: Vec<&str> = source_content.lines().collect();

	// Line is 1-indexed, convert to 0-indexed
	let line_idx = line.saturating_sub(1);

	if line_idx >= lines.len() {
		return (Vec::new(), String::new(), Vec::new());
	}

	let context_line = lines[line_idx].to_string();

	let pre_start = line_idx.saturating_sub(context_lines);
	let pre_context: Vec<String> = lines[pre_start..line_idx]
		.iter()
		.map(|s| s.to_string())
		.collect();

	let post_end = (line_idx + 1 + context_lines).min(lines.len());
	let post_context: Vec<String> = lines[(line_idx + 1)..post_end]
		.iter()
		.map(|s| s.to_string())
		.collect();

	(pre_context, context_line, post_context)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_source_map() -> RawSourceMap {
		RawSourceMap::parse(
			r#"{
			"version": 3,
			"file": "out.js",
			"sourceRoot": "",
			"sources": ["src/index.ts"],
			"sourcesContent": ["function hello() {\n  console.log('Hello, World!');\n}\n\nhello();\n"],
			"names": ["hello", "console", "log"],
			"mappings": "AAAA,SAASA;EACPC;AACA"
		}"#,
		)
		.unwrap()
	}

	#[test]
	fn test_parse_source_map() {
		let sm = sample_source_map();

		assert_eq!(sm.version, 3);
		assert_eq!(sm.sources, vec!["src/index.ts"]);
		assert!(sm.has_sources_content());
	}

	#[test]
	fn test_sources_content_is_optional() {
		let sm = RawSourceMap::parse(r#"{"version": 3, "sources": ["a.ts"], "mappings": ""}"#)
			.unwrap();
		assert!(sm.source_root.is_none());
		assert!(!sm.has_sources_content());
	}

	#[test]
	fn test_resolve_first_segment() {
		let sm = sample_source_map();

		let pos = resolve(&sm, 1, 0).unwrap();
		assert_eq!(pos.file, "src/index.ts");
		assert_eq!(pos.line, 1);
		assert_eq!(pos.column, 0);
		assert!(pos.source_content.unwrap().starts_with("function hello()"));
	}

	#[test]
	fn test_resolve_second_line() {
		let sm = sample_source_map();

		// Generated line 2, column 2 -> original line 2, column 2
		let pos = resolve(&sm, 2, 2).unwrap();
		assert_eq!(pos.line, 2);
		assert_eq!(pos.column, 2);
	}

	#[test]
	fn test_resolve_unknown_line_is_mapping_not_found() {
		let sm = sample_source_map();

		assert!(matches!(
			resolve(&sm, 40, 0),
			Err(SymbolicateError::MappingNotFound { line: 40, column: 0 })
		));
	}

	#[test]
	fn test_line_zero_is_mapping_not_found() {
		let sm = sample_source_map();
		assert!(matches!(
			resolve(&sm, 0, 0),
			Err(SymbolicateError::MappingNotFound { .. })
		));
	}

	#[test]
	fn test_null_source_content_is_not_an_error() {
		let sm = RawSourceMap::parse(
			r#"{
			"version": 3,
			"sources": ["a.ts", "b.ts"],
			"sourcesContent": ["const a = 1;", null],
			"mappings": "AAAA;ACAA"
		}"#,
		)
		.unwrap();

		let pos = resolve(&sm, 2, 0).unwrap();
		assert_eq!(pos.file, "b.ts");
		assert_eq!(pos.source_content, None);
	}

	#[test]
	fn test_round_trip_inline_example() {
		// generated (1,0) -> a.ts line 5 (0-indexed 4), column 2
		let sm = RawSourceMap::parse(
			r#"{
			"version": 3,
			"sources": ["a.ts"],
			"sourcesContent": ["const x = 1;"],
			"names": [],
			"mappings": "AAIE"
		}"#,
		)
		.unwrap();

		let pos = resolve(&sm, 1, 0).unwrap();
		assert_eq!(
			pos,
			ResolvedPosition {
				file: "a.ts".to_string(),
				line: 5,
				column: 2,
				source_content: Some("const x = 1;".to_string()),
			}
		);
	}

	#[test]
	fn test_route_module_prefix_is_stripped() {
		let sm = RawSourceMap::parse(
			r#"{"version": 3, "sources": ["route-module:app/routes/index.tsx"], "mappings": "AAAA"}"#,
		)
		.unwrap();

		assert_eq!(resolve(&sm, 1, 0).unwrap().file, "app/routes/index.tsx");
	}

	#[test]
	fn test_source_root_resolution() {
		let sm = RawSourceMap::parse(
			r#"{
			"version": 3,
			"sourceRoot": "src/",
			"sources": ["index.ts"],
			"names": [],
			"mappings": "AAAA"
		}"#,
		)
		.unwrap();

		assert_eq!(resolve(&sm, 1, 0).unwrap().file, "src/index.ts");
	}

	#[test]
	fn test_out_of_range_source_index() {
		let sm = RawSourceMap::parse(r#"{"version": 3, "sources": [], "mappings": "AAAA"}"#).unwrap();

		assert!(matches!(
			resolve(&sm, 1, 0),
			Err(SymbolicateError::MalformedMap(MapError::InvalidSourceIndex(0)))
		));
	}

	#[test]
	fn test_undecodable_mappings_are_malformed() {
		let sm = RawSourceMap::parse(r#"{"version": 3, "sources": ["a.ts"], "mappings": "A!"}"#)
			.unwrap();

		assert!(matches!(
			resolve(&sm, 1, 0),
			Err(SymbolicateError::MalformedMap(MapError::InvalidVlqChar('!')))
		));
	}

	#[test]
	fn test_resolve_is_repeatable() {
		let sm = sample_source_map();
		let before = sm.clone();

		let first = resolve(&sm, 2, 10).unwrap();
		let second = resolve(&sm, 2, 10).unwrap();

		assert_eq!(first, second);
		assert_eq!(sm, before);
	}

	#[test]
	fn test_invalid_version() {
		let json = r#"{"version": 2, "sources": [], "names": [], "mappings": ""}"#;
		assert!(matches!(
			RawSourceMap::parse(json),
			Err(MapError::InvalidVersion(2))
		));
	}

	#[test]
	fn test_extract_context() {
		let source = "line 1\nline 2\nline 3\nline 4\nline 5\nline 6\nline 7";

		let (pre, context, post) = extract_context(source, 4, 2);

		assert_eq!(pre, vec!["line 2", "line 3"]);
		assert_eq!(context, "line 4");
		assert_eq!(post, vec!["line 5", "line 6"]);
	}

	#[test]
	fn test_extract_context_at_start() {
		let source = "line 1\nline 2\nline 3";

		let (pre, context, post) = extract_context(source, 1, 2);

		assert!(pre.is_empty());
		assert_eq!(context, "line 1");
		assert_eq!(post, vec!["line 2", "line 3"]);
	}

	#[test]
	fn test_extract_context_past_end() {
		let (pre, context, post) = extract_context("line 1", 9, 2);

		assert!(pre.is_empty());
		assert!(context.is_empty());
		assert!(post.is_empty());
	}
}
