// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Symbolication of whole stack traces.
//!
//! Each frame runs through the same pipeline independently:
//!
//! 1. Apply the configured path cleanup rules to the frame's file
//! 2. Load the bundled artifact
//! 3. Locate its source map (inline or external)
//! 4. Resolve the generated position, or fall back to the artifact itself
//!    when it has no map
//!
//! Any failure only empties that frame's slot.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use crashmap_core::{ParsedFrame, ResolvedPosition, SymbolicationResult};

use crate::cleanup::PathCleanup;
use crate::error::{Result, SymbolicateError};
use crate::frame::parse_frame;
use crate::loader::ArtifactSource;
use crate::locator::locate;
use crate::sourcemap::resolve;

/// Default bound on frames processed at the same time.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Resolves stack frames to original source positions.
pub struct SymbolicationService<S: ArtifactSource + ?Sized> {
	source: Arc<S>,
	cleanup: PathCleanup,
	max_concurrency: usize,
}

impl<S: ArtifactSource + ?Sized> SymbolicationService<S> {
	pub fn new(source: Arc<S>) -> Self {
		Self {
			source,
			cleanup: PathCleanup::none(),
			max_concurrency: DEFAULT_MAX_CONCURRENCY,
		}
	}

	/// Rules applied to every frame file before its artifact is loaded.
	pub fn with_cleanup(mut self, cleanup: PathCleanup) -> Self {
		self.cleanup = cleanup;
		self
	}

	/// Bound on concurrent frame pipelines. Values below one are treated as one.
	pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
		self.max_concurrency = max_concurrency.max(1);
		self
	}

	/// Symbolicate one frame, surfacing the reason it failed.
	#[instrument(skip(self, frame), fields(file = %frame.file, line = frame.line, column = frame.column))]
	pub async fn try_symbolicate_frame(&self, frame: &ParsedFrame) -> Result<ResolvedPosition> {
		let file = self.cleanup.apply(&frame.file);
		if file != frame.file {
			debug!(cleaned = %file, "applied path cleanup");
		}

		let artifact = self.source.load(&file).await?;

		let map = match locate(&artifact, self.source.as_ref()).await? {
			Some(map) => map,
			None => {
				debug!("no source map, using artifact as original source");
				return Ok(ResolvedPosition {
					file,
					line: frame.line,
					column: frame.column,
					source_content: Some(artifact.source_text),
				});
			}
		};

		let position = resolve(&map, frame.line, frame.column)?;
		info!(
			original_source = %position.file,
			original_line = position.line,
			original_column = position.column,
			"Symbolicated frame"
		);

		Ok(position)
	}

	/// Parse and symbolicate a single raw stack trace line.
	pub async fn try_symbolicate_line(&self, line: &str) -> Result<ResolvedPosition> {
		let frame =
			parse_frame(line).ok_or_else(|| SymbolicateError::UnparseableFrame(line.trim().to_string()))?;
		self.try_symbolicate_frame(&frame).await
	}

	/// Symbolicate one frame; failures become `None`.
	pub async fn symbolicate_frame(&self, frame: &ParsedFrame) -> Option<ResolvedPosition> {
		match self.try_symbolicate_frame(frame).await {
			Ok(position) => Some(position),
			Err(e) => {
				warn!(error = %e, kind = e.kind(), file = %frame.file, "Failed to symbolicate frame");
				None
			}
		}
	}

	async fn symbolicate_slot(&self, frame: &Option<ParsedFrame>) -> Option<ResolvedPosition> {
		match frame {
			Some(frame) => self.symbolicate_frame(frame).await,
			None => None,
		}
	}

	/// Symbolicate a batch of frames.
	///
	/// The result has one slot per input, in input order, whatever order the
	/// frames finish in. `None` inputs stay `None`.
	#[instrument(skip(self, frames), fields(frame_count = frames.len()))]
	pub async fn symbolicate(&self, frames: &[Option<ParsedFrame>]) -> SymbolicationResult {
		let pending: Vec<_> = frames.iter().map(|frame| self.symbolicate_slot(frame)).collect();
		let results: SymbolicationResult = stream::iter(pending)
			.buffered(self.max_concurrency)
			.collect()
			.await;

		debug!(
			resolved = results.iter().filter(|r| r.is_some()).count(),
			"symbolicated batch"
		);
		results
	}

	/// Parse and symbolicate raw stack trace lines, one slot per line.
	pub async fn symbolicate_lines<I, L>(&self, lines: I) -> SymbolicationResult
	where
		I: IntoIterator<Item = L>,
		L: AsRef<str>,
	{
		let frames: Vec<Option<ParsedFrame>> =
			lines.into_iter().map(|l| parse_frame(l.as_ref())).collect();
		self.symbolicate(&frames).await
	}

	/// Symbolicate a newline-separated stack trace, one slot per line.
	pub async fn symbolicate_trace(&self, trace: &str) -> SymbolicationResult {
		self.symbolicate_lines(trace.lines()).await
	}
}
