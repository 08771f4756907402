//! # CLI Module
//!
//! The command-line layer of phraselist. It runs the whole pipeline for one
//! invocation and turns failures into user-facing messages.
//!
//! ## Pipeline
//!
//! ```text
//! settings + credentials
//!     ↓
//! sanitize phrase
//!     ↓
//! authorize (browser → local callback → token)
//!     ↓
//! resolve phrase to tracks
//!     ↓
//! create playlist → append tracks → open playlist
//! ```
//!
//! Startup problems (missing user id, bad credential file) stop the run
//! before the listener starts or the browser opens.

mod playlist;

pub use playlist::PipelineOptions;
pub use playlist::run;
