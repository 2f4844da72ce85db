// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! VLQ (Variable-Length Quantity) decoder for source map mappings.
//!
//! Source maps use Base64 VLQ encoding for compact storage of line/column mappings.
//! This module decodes the `mappings` string into an ordered table that can be
//! searched by generated position.

use crate::error::MapError;

/// Base64 character set used in VLQ encoding.
const BASE64_CHARS: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const DECODE_TABLE: [i8; 128] = build_decode_table();

const fn build_decode_table() -> [i8; 128] {
	let mut table = [-1i8; 128];
	let mut i = 0;
	while i < BASE64_CHARS.len() {
		table[BASE64_CHARS[i] as usize] = i as i8;
		i += 1;
	}
	table
}

/// Decode a Base64 character to its 6-bit value.
fn decode_char(ch: u8) -> Result<i64, MapError> {
	DECODE_TABLE
		.get(ch as usize)
		.copied()
		.filter(|v| *v >= 0)
		.map(i64::from)
		.ok_or(MapError::InvalidVlqChar(ch as char))
}

/// Decode a VLQ-encoded segment into a vector of signed integers.
///
/// Each segment represents one or more values:
/// - Minimum 1 value: generated column offset
/// - Optional 4 more values: source index, original line, original column, name index
pub fn decode_vlq_segment(segment: &str) -> Result<Vec<i32>, MapError> {
	let mut values = Vec::with_capacity(5);
	let mut value = 0i64;
	let mut shift = 0u32;

	for ch in segment.bytes() {
		let digit = decode_char(ch)?;

		// Continuation bit is the 6th bit (0b100000 = 32)
		let continuation = digit & 0b10_0000 != 0;
		value += (digit & 0b01_1111) << shift;
		shift += 5;

		if continuation {
			if shift >= 35 {
				return Err(MapError::VlqOverflow);
			}
			continue;
		}

		// The lowest bit carries the sign: 1 = negative, 0 = positive
		let magnitude = value >> 1;
		let signed = if value & 1 != 0 { -magnitude } else { magnitude };
		values.push(i32::try_from(signed).map_err(|_| MapError::VlqOverflow)?);
		value = 0;
		shift = 0;
	}

	if shift != 0 {
		return Err(MapError::InvalidSegment {
			segment: segment.to_string(),
			reason: "unterminated VLQ value",
		});
	}

	Ok(values)
}

/// Original-source half of a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalLocation {
	/// Index into the sources array.
	pub source_index: u32,
	/// Line in the original file (0-indexed).
	pub line: u32,
	/// Column in the original file (0-indexed).
	pub column: u32,
	/// Optional index into the names array.
	pub name_index: Option<u32>,
}

/// A single mapping entry in the decoded source map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
	/// Line in the generated file (0-indexed).
	pub generated_line: u32,
	/// Column in the generated file (0-indexed).
	pub generated_column: u32,
	/// Where this position came from, `None` for an unmapped segment.
	pub original: Option<OriginalLocation>,
}

/// Container for decoded mappings with efficient lookup.
#[derive(Debug, Clone, Default)]
pub struct DecodedMappings {
	/// Mappings sorted by generated line, then generated column.
	mappings: Vec<Mapping>,
}

impl DecodedMappings {
	/// Builds a table from mappings in any order.
	pub fn from_unsorted(mut mappings: Vec<Mapping>) -> Self {
		mappings.sort_by_key(|m| (m.generated_line, m.generated_column));
		Self { mappings }
	}

	/// Find the mapping for a given generated line and column.
	///
	/// Returns the closest mapping at or before `column` on `line`; positions
	/// on other lines never match.
	pub fn find(&self, line: u32, column: u32) -> Option<&Mapping> {
		let line_start = self
			.mappings
			.partition_point(|m| m.generated_line < line);
		let line_end = self
			.mappings
			.partition_point(|m| m.generated_line <= line);

		let line_mappings = &self.mappings[line_start..line_end];
		let idx = line_mappings.partition_point(|m| m.generated_column <= column);

		idx.checked_sub(1).map(|i| &line_mappings[i])
	}

	pub fn len(&self) -> usize {
		self.mappings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.mappings.is_empty()
	}
}

fn absolute(
	prev: &mut i64,
	delta: i32,
	segment: &str,
	reason: &'static str,
) -> Result<u32, MapError> {
	*prev += i64::from(delta);
	u32::try_from(*prev).map_err(|_| MapError::InvalidSegment {
		segment: segment.to_string(),
		reason,
	})
}

/// Decode VLQ-encoded source map mappings string into structured form.
///
/// The mappings string format:
/// - Lines are separated by semicolons (;)
/// - Segments within a line are separated by commas (,)
/// - Each segment contains 1, 4, or 5 VLQ-encoded values
pub fn decode_vlq_mappings(mappings: &str) -> Result<DecodedMappings, MapError> {
	let mut decoded = Vec::new();

	// Source, original line/column and name are delta-encoded across the whole
	// string; the generated column resets on every line.
	let mut prev_source = 0i64;
	let mut prev_original_line = 0i64;
	let mut prev_original_column = 0i64;
	let mut prev_name = 0i64;

	for (generated_line, line) in mappings.split(';').enumerate() {
		let generated_line = generated_line as u32;
		let mut generated_column = 0i64;

		for segment in line.split(',').filter(|s| !s.is_empty()) {
			let values = decode_vlq_segment(segment)?;

			let generated = absolute(
				&mut generated_column,
				values[0],
				segment,
				"negative generated column",
			)?;

			let original = match values.len() {
				1 => None,
				4 | 5 => {
					let source_index =
						absolute(&mut prev_source, values[1], segment, "negative source index")?;
					let line = absolute(
						&mut prev_original_line,
						values[2],
						segment,
						"negative original line",
					)?;
					let column = absolute(
						&mut prev_original_column,
						values[3],
						segment,
						"negative original column",
					)?;
					let name_index = match values.get(4) {
						Some(delta) => Some(absolute(
							&mut prev_name,
							*delta,
							segment,
							"negative name index",
						)?),
						None => None,
					};

					Some(OriginalLocation {
						source_index,
						line,
						column,
						name_index,
					})
				}
				_ => {
					return Err(MapError::InvalidSegment {
						segment: segment.to_string(),
						reason: "expected 1, 4 or 5 fields",
					})
				}
			};

			decoded.push(Mapping {
				generated_line,
				generated_column: generated,
				original,
			});
		}
	}

	Ok(DecodedMappings::from_unsorted(decoded))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn encode(value: i32) -> String {
		let mut vlq = if value < 0 {
			((-(value as i64)) << 1) | 1
		} else {
			(value as i64) << 1
		};
		let mut out = String::new();
		loop {
			let mut digit = vlq & 0b1_1111;
			vlq >>= 5;
			if vlq > 0 {
				digit |= 0b10_0000;
			}
			out.push(BASE64_CHARS[digit as usize] as char);
			if vlq == 0 {
				break;
			}
		}
		out
	}

	fn mapping(line: u32, column: u32, original_line: u32) -> Mapping {
		Mapping {
			generated_line: line,
			generated_column: column,
			original: Some(OriginalLocation {
				source_index: 0,
				line: original_line,
				column: 0,
				name_index: None,
			}),
		}
	}

	#[test]
	fn test_decode_vlq_segment_simple() {
		assert_eq!(decode_vlq_segment("A").unwrap(), vec![0]);
		assert_eq!(decode_vlq_segment("C").unwrap(), vec![1]);
		assert_eq!(decode_vlq_segment("D").unwrap(), vec![-1]);
	}

	#[test]
	fn test_decode_vlq_segment_multi_value() {
		assert_eq!(decode_vlq_segment("AAAA").unwrap(), vec![0, 0, 0, 0]);
		assert_eq!(decode_vlq_segment("AACA").unwrap(), vec![0, 0, 1, 0]);
	}

	#[test]
	fn test_decode_vlq_segment_continuation() {
		// 'gB' = 16
		assert_eq!(decode_vlq_segment("gB").unwrap(), vec![16]);
	}

	#[test]
	fn test_unterminated_segment_is_rejected() {
		assert!(matches!(
			decode_vlq_segment("g"),
			Err(MapError::InvalidSegment { .. })
		));
	}

	#[test]
	fn test_overlong_segment_overflows() {
		assert!(matches!(
			decode_vlq_segment("gggggggB"),
			Err(MapError::VlqOverflow)
		));
	}

	#[test]
	fn test_invalid_vlq_char() {
		assert!(matches!(
			decode_vlq_segment("!"),
			Err(MapError::InvalidVlqChar('!'))
		));
	}

	#[test]
	fn test_decode_vlq_mappings_simple() {
		let result = decode_vlq_mappings("AAAA").unwrap();
		assert_eq!(result.len(), 1);

		let found = result.find(0, 0).unwrap();
		assert_eq!(found.generated_column, 0);
		let original = found.original.unwrap();
		assert_eq!(original.source_index, 0);
		assert_eq!(original.line, 0);
		assert_eq!(original.column, 0);
	}

	#[test]
	fn test_decode_vlq_mappings_multi_line() {
		let result = decode_vlq_mappings("AAAA;AACA").unwrap();
		assert_eq!(result.len(), 2);

		let second = result.find(1, 0).unwrap();
		assert_eq!(second.generated_line, 1);
		// Original line is relative, so 0 + 1 = 1
		assert_eq!(second.original.unwrap().line, 1);
	}

	#[test]
	fn test_empty_lines_advance_generated_line() {
		let result = decode_vlq_mappings(";;AAIE").unwrap();

		assert!(result.find(0, 0).is_none());
		let found = result.find(2, 0).unwrap();
		assert_eq!(found.original.unwrap().line, 4);
		assert_eq!(found.original.unwrap().column, 2);
	}

	#[test]
	fn test_single_field_segment_is_unmapped() {
		// col 0 -> source, then col 10 unmapped
		let result = decode_vlq_mappings("AAAA,U").unwrap();

		assert!(result.find(0, 5).unwrap().original.is_some());
		assert!(result.find(0, 12).unwrap().original.is_none());
	}

	#[test]
	fn test_two_field_segment_is_rejected() {
		assert!(matches!(
			decode_vlq_mappings("AA"),
			Err(MapError::InvalidSegment { .. })
		));
	}

	#[test]
	fn test_negative_absolute_column_is_rejected() {
		assert!(decode_vlq_mappings("D").is_err());
	}

	#[test]
	fn test_mapping_find_closest() {
		let mappings =
			DecodedMappings::from_unsorted(vec![mapping(0, 20, 2), mapping(0, 0, 0), mapping(0, 10, 1)]);

		assert_eq!(mappings.find(0, 5).unwrap().generated_column, 0);
		assert_eq!(mappings.find(0, 15).unwrap().generated_column, 10);
		assert_eq!(mappings.find(0, 25).unwrap().generated_column, 20);
		assert!(mappings.find(1, 0).is_none());
	}

	#[test]
	fn test_column_before_first_mapping() {
		let mappings = DecodedMappings::from_unsorted(vec![mapping(0, 4, 0)]);
		assert!(mappings.find(0, 3).is_none());
	}

	proptest! {
		#[test]
		fn segment_decodes_what_was_encoded(values in proptest::collection::vec(-1_000_000i32..1_000_000, 1..6)) {
			let segment: String = values.iter().map(|v| encode(*v)).collect();
			prop_assert_eq!(decode_vlq_segment(&segment).unwrap(), values);
		}

		#[test]
		fn lookup_never_crosses_lines(line in 0u32..4, column in 0u32..200) {
			let table = decode_vlq_mappings("AAAA,KAAK;;CAEE,OAAO;AACA").unwrap();
			if let Some(found) = table.find(line, column) {
				prop_assert_eq!(found.generated_line, line);
				prop_assert!(found.generated_column <= column);
			}
		}
	}
}
