//! Error types for the weather overlay.
//!
//! None of these are fatal: every failure degrades to "no visible
//! animation" plus a log line.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
	/// The category has no entry in the effect table.
	#[error("no animation configured for weather state '{0}'")]
	ConfigurationAbsent(String),

	/// The host state snapshot was missing or malformed.
	#[error("weather state unavailable: {0}")]
	StateUnavailable(String),

	/// The drawing surface is gone (e.g. removed from the document).
	#[error("drawing surface unavailable")]
	SurfaceUnavailable,

	#[error("invalid overlay config: {0}")]
	InvalidConfig(#[from] serde_json::Error),
}
