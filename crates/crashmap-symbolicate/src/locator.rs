// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map discovery from `sourceMappingURL` directives.
//!
//! An artifact can embed its map as a base64 data URL or point at an external
//! `.map` file. Only the first directive of each kind is considered, and an
//! inline map always wins over an external reference.

use std::path::Path;
use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use tracing::debug;

use crashmap_core::{ArtifactContent, ArtifactOrigin};

use crate::error::{MapError, Result, SymbolicateError};
use crate::loader::{is_remote, ArtifactSource};
use crate::sourcemap::RawSourceMap;

static INLINE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"(?m)^[ \t]*//[#@][ \t]*sourceMappingURL=data:application/json(?:;charset=[^;,\s]+)?;base64,(\S+)",
	)
	.unwrap()
});

static EXTERNAL_DIRECTIVE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?m)^[ \t]*//[#@][ \t]*sourceMappingURL=(\S+)").unwrap());

/// A `sourceMappingURL` directive found in artifact text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapReference<'a> {
	/// Base64 payload of an inline data URL.
	Inline(&'a str),
	/// Path or URL of an external map.
	External(&'a str),
}

/// Find the directive that decides where the map lives.
pub fn find_reference(source_text: &str) -> Option<MapReference<'_>> {
	if let Some(caps) = INLINE_DIRECTIVE.captures(source_text) {
		return caps.get(1).map(|m| MapReference::Inline(m.as_str()));
	}

	EXTERNAL_DIRECTIVE
		.captures(source_text)
		.and_then(|caps| caps.get(1))
		.map(|m| MapReference::External(m.as_str()))
}

/// Decode an inline base64 payload into a source map.
pub fn decode_inline(payload: &str) -> std::result::Result<RawSourceMap, MapError> {
	let bytes = STANDARD.decode(payload.trim())?;
	RawSourceMap::from_slice(&bytes)
}

/// Work out where an external map reference points, relative to the artifact.
pub fn resolve_reference(content: &ArtifactContent, reference: &str) -> Result<String> {
	if is_remote(reference) {
		return Ok(reference.to_string());
	}

	match &content.origin {
		ArtifactOrigin::Remote(url) => url
			.join(reference)
			.map(String::from)
			.map_err(|e| SymbolicateError::unavailable(reference, e)),
		ArtifactOrigin::Local(path) => {
			let reference_path = Path::new(reference);
			let resolved = if reference_path.is_absolute() {
				reference_path.to_path_buf()
			} else {
				path.parent()
					.unwrap_or_else(|| Path::new(""))
					.join(reference_path)
			};
			Ok(resolved.to_string_lossy().into_owned())
		}
	}
}

/// Find and load the source map for an artifact.
///
/// Returns `Ok(None)` when the artifact carries no directive at all; callers
/// treat the artifact as its own original source in that case.
pub async fn locate<S>(content: &ArtifactContent, source: &S) -> Result<Option<RawSourceMap>>
where
	S: ArtifactSource + ?Sized,
{
	match find_reference(&content.source_text) {
		None => {
			debug!("no sourceMappingURL directive");
			Ok(None)
		}
		Some(MapReference::Inline(payload)) => {
			debug!(payload_len = payload.len(), "found inline source map");
			Ok(Some(decode_inline(payload)?))
		}
		Some(MapReference::External(reference)) => {
			if reference.starts_with("data:") {
				return Err(MapError::UnsupportedDataUrl(truncate(reference)).into());
			}

			let location = resolve_reference(content, reference)?;
			debug!(reference, location = %location, "fetching external source map");

			let map = source.load(&location).await?;
			Ok(Some(RawSourceMap::parse(&map.source_text)?))
		}
	}
}

fn truncate(reference: &str) -> String {
	reference.chars().take(48).collect()
}
