//! Flattened line segments used by the MSAA rasterizer: a segment carries the
//! orientation flags the coverage engine needs precomputed rather than
//! re-derived per sample.
//!
//! Grounded on `Segment_Info`'s constructor in `msaa/src/rasterizer.hpp`: points are
//! ordered bottom-to-top, and `is_horizontal`/`is_vertical`/`left_is_bottom` are
//! decided once so [`crate::msaa`] never has to branch on point order again.

use glam::Vec2;

use crate::consts::GEOMETRY_EPSILON;

/// A single edge of a flattened path, oriented bottom point first.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
	/// Lower point (smaller `y`, tie-broken by `x`).
	pub bottom: Vec2,
	/// Higher point.
	pub top: Vec2,
	/// +1 if the original (unreordered) segment pointed upward, -1 if downward,
	/// 0 if horizontal.
	pub winding_sign: i8,
	pub is_horizontal: bool,
	pub is_vertical: bool,
	/// Whether the original segment's first endpoint is its `bottom` (i.e. the
	/// segment was already bottom-to-top before reordering).
	pub left_is_bottom: bool,
}

impl Segment {
	pub fn new(a: Vec2, b: Vec2) -> Self {
		let is_horizontal = (a.y - b.y).abs() <= GEOMETRY_EPSILON;
		let is_vertical = (a.x - b.x).abs() <= GEOMETRY_EPSILON;

		let winding_sign = if is_horizontal {
			0
		} else if b.y > a.y {
			1
		} else {
			-1
		};

		let (bottom, top, left_is_bottom) = if is_horizontal {
			if a.x <= b.x { (a, b, true) } else { (b, a, false) }
		} else if b.y > a.y {
			(a, b, true)
		} else {
			(b, a, false)
		};

		Segment { bottom, top, winding_sign, is_horizontal, is_vertical, left_is_bottom }
	}

	pub fn min_y(&self) -> f32 {
		self.bottom.y
	}

	pub fn max_y(&self) -> f32 {
		self.top.y
	}

	/// `x` at height `y`, clamped to the segment's own `x` range for a horizontal
	/// segment (whose `x` is otherwise undefined as a function of `y`).
	pub fn x_at_y(&self, y: f32) -> f32 {
		if self.is_vertical || self.is_horizontal {
			return self.bottom.x;
		}
		let t = (y - self.bottom.y) / (self.top.y - self.bottom.y);
		self.bottom.x + t * (self.top.x - self.bottom.x)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn upward_segment_has_positive_winding() {
		let s = Segment::new(Vec2::new(0., 0.), Vec2::new(5., 5.));
		assert_eq!(s.winding_sign, 1);
		assert!(s.left_is_bottom);
		assert_eq!(s.bottom, Vec2::new(0., 0.));
	}

	#[test]
	fn downward_segment_is_reordered_bottom_first() {
		let s = Segment::new(Vec2::new(5., 5.), Vec2::new(0., 0.));
		assert_eq!(s.winding_sign, -1);
		assert!(!s.left_is_bottom);
		assert_eq!(s.bottom, Vec2::new(0., 0.));
		assert_eq!(s.top, Vec2::new(5., 5.));
	}

	#[test]
	fn horizontal_segment_has_zero_winding() {
		let s = Segment::new(Vec2::new(0., 3.), Vec2::new(5., 3.));
		assert!(s.is_horizontal);
		assert_eq!(s.winding_sign, 0);
	}

	#[test]
	fn vertical_segment_x_at_y_is_constant() {
		let s = Segment::new(Vec2::new(2., 0.), Vec2::new(2., 10.));
		assert!(s.is_vertical);
		assert_eq!(s.x_at_y(5.), 2.);
	}

	#[test]
	fn x_at_y_interpolates_linearly() {
		let s = Segment::new(Vec2::new(0., 0.), Vec2::new(10., 10.));
		assert!((s.x_at_y(5.) - 5.).abs() < 1e-5);
	}
}
