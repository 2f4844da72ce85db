// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack trace symbolication for bundled JavaScript.
//!
//! This crate provides functionality for:
//! - Parsing raw stack trace lines into frames
//! - Loading bundled artifacts from disk or over HTTP
//! - Locating inline and external source maps (v3)
//! - Resolving generated positions to original source positions
//! - Extracting source context for display
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use crashmap_symbolicate::{ArtifactLoader, PathCleanup, SymbolicationService};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = ArtifactLoader::new(reqwest::Client::new());
//! let service = SymbolicationService::new(Arc::new(loader))
//!     .with_cleanup(PathCleanup::from_patterns(["^[^:]*route:"])?)
//!     .with_max_concurrency(8);
//!
//! let results = service
//!     .symbolicate_trace("Error: boom\n    at loader (/app/build/index.js:120:17)")
//!     .await;
//! assert_eq!(results.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod cleanup;
pub mod error;
pub mod frame;
pub mod loader;
pub mod locator;
pub mod service;
pub mod sourcemap;
pub mod vlq;

pub use cleanup::PathCleanup;
pub use error::{FetchError, MapError, Result, SymbolicateError};
pub use frame::{parse_frame, parse_trace, FramePattern};
pub use loader::{is_remote, ArtifactLoader, ArtifactSource};
pub use locator::{locate, MapReference};
pub use service::{SymbolicationService, DEFAULT_MAX_CONCURRENCY};
pub use sourcemap::{
	extract_context, resolve, OriginalPosition, RawSourceMap, SourceMapConsumer, ROUTE_MODULE_PREFIX,
};
pub use vlq::{decode_vlq_mappings, decode_vlq_segment, DecodedMappings, Mapping};
