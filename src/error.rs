use thiserror::Error;

/// The error type returned by the fallible entry points of this crate.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RasterError {
	#[error("curve degree must be 1, 2, or 3, got {0}")]
	InvalidDegree(u8),
	#[error("curve control point is not finite: {0:?}")]
	NonFiniteCoordinate(glam::Vec2),
	#[error("segment count {0} exceeds the platform's indexing range")]
	SegmentCountOverflow(usize),
	#[error("MSAA LUT sample count must be 1..=32, got {0}")]
	InvalidSampleCount(usize),
	#[error("fill_opaque does not support a partial-coverage run longer than one pixel")]
	UnsupportedPartialRun,
}
