// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Development server for stack trace symbolication.
//!
//! This crate provides:
//!
//! - HTTP routes that resolve bundled frames to original source positions
//! - Permissive CORS headers for browser-origin callers
//! - Terminal rendering for offline symbolication

pub mod error;
pub mod report;
pub mod response;
pub mod routes;
pub mod state;

pub use error::{Result, ServerError, StartupError};
pub use response::FrameResponse;
pub use routes::{create_router, FRAME_PATH, STACKTRACE_PATH};
pub use state::{build_service, AppState, DynSymbolicationService};
