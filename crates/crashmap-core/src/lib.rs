// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for crashmap stack trace symbolication.
//!
//! These types describe a single symbolication request from the moment a raw
//! stack trace line is parsed until its original source position is resolved.
//! They are shared by the engine (`crashmap-symbolicate`) and the HTTP host
//! (`crashmap-server`).
//!
//! # Overview
//!
//! - [`ParsedFrame`]: one stack trace line split into method, file, line and column
//! - [`FrameRequest`]: a single frame submitted by file, line and column
//! - [`ArtifactContent`]: the text of a bundled file and where it was loaded from
//! - [`ResolvedPosition`]: the original file, line, column and (optionally) content
//! - [`SymbolicationResult`]: index-aligned results for a whole trace

pub mod artifact;
pub mod frame;
pub mod position;

pub use artifact::{ArtifactContent, ArtifactOrigin};
pub use frame::{FrameRequest, ParsedFrame};
pub use position::{ResolvedPosition, SymbolicationResult};
