//! Bezier curve primitives: degrees 1-3, evaluation, derivatives, splitting.
//!
//! Grounded on `bezier-rs`'s `Bezier` (a `start`/`end` pair plus a `BezierHandles` enum
//! dispatching on degree) but reshaped into a single tagged enum per the "tagged variant
//! over degree, dispatch is a switch, not dynamic" redesign note: there is no template
//! parameter to erase here, so the handles-plus-endpoints split isn't needed.

use glam::Vec2;

use crate::error::RasterError;
use crate::poly::{Poly1, Poly2, Poly3};

/// A Bezier curve of degree 1 (line), 2 (quadratic), or 3 (cubic).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Curve {
	Line([Vec2; 2]),
	Quadratic([Vec2; 3]),
	Cubic([Vec2; 4]),
}

impl Curve {
	/// Build a line, rejecting non-finite coordinates.
	pub fn new_line(p0: Vec2, p1: Vec2) -> Result<Self, RasterError> {
		Self::checked(Curve::Line([p0, p1]))
	}

	/// Build a quadratic Bezier, rejecting non-finite coordinates.
	pub fn new_quadratic(p0: Vec2, p1: Vec2, p2: Vec2) -> Result<Self, RasterError> {
		Self::checked(Curve::Quadratic([p0, p1, p2]))
	}

	/// Build a cubic Bezier, rejecting non-finite coordinates.
	pub fn new_cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Result<Self, RasterError> {
		Self::checked(Curve::Cubic([p0, p1, p2, p3]))
	}

	/// Build a curve from the boundary's tagged-degree record: `degree` together
	/// with exactly that many points. This is the entry point a caller deserializing
	/// curves from an external representation (rather than constructing them in
	/// code) goes through; `degree` outside `1..=3` is a real input-invariant
	/// violation here, unlike [`Curve::new_line`] and friends where the degree is
	/// fixed by which constructor was called.
	pub fn from_degree(degree: u8, points: &[Vec2]) -> Result<Self, RasterError> {
		match degree {
			1 if points.len() == 2 => Self::new_line(points[0], points[1]),
			2 if points.len() == 3 => Self::new_quadratic(points[0], points[1], points[2]),
			3 if points.len() == 4 => Self::new_cubic(points[0], points[1], points[2], points[3]),
			1 | 2 | 3 => Err(RasterError::InvalidDegree(degree)),
			_ => Err(RasterError::InvalidDegree(degree)),
		}
	}

	fn checked(curve: Curve) -> Result<Self, RasterError> {
		match curve.points().iter().find(|p| !p.is_finite()) {
			Some(&bad) => Err(RasterError::NonFiniteCoordinate(bad)),
			None => Ok(curve),
		}
	}

	/// 1, 2, or 3.
	pub fn degree(&self) -> u8 {
		match self {
			Curve::Line(_) => 1,
			Curve::Quadratic(_) => 2,
			Curve::Cubic(_) => 3,
		}
	}

	pub fn points(&self) -> &[Vec2] {
		match self {
			Curve::Line(p) => p.as_slice(),
			Curve::Quadratic(p) => p.as_slice(),
			Curve::Cubic(p) => p.as_slice(),
		}
	}

	pub fn start(&self) -> Vec2 {
		self.points()[0]
	}

	pub fn end(&self) -> Vec2 {
		let points = self.points();
		points[points.len() - 1]
	}

	/// Evaluate the curve at `t` using the Bernstein-basis formula.
	pub fn evaluate(&self, t: f32) -> Vec2 {
		let one_minus_t = 1. - t;
		match self {
			Curve::Line([p0, p1]) => *p0 * one_minus_t + *p1 * t,
			Curve::Quadratic([p0, p1, p2]) => {
				let a = one_minus_t * one_minus_t;
				let b = 2. * one_minus_t * t;
				let c = t * t;
				a * *p0 + b * *p1 + c * *p2
			}
			Curve::Cubic([p0, p1, p2, p3]) => {
				let a = one_minus_t * one_minus_t * one_minus_t;
				let b = 3. * one_minus_t * one_minus_t * t;
				let c = 3. * one_minus_t * t * t;
				let d = t * t * t;
				a * *p0 + b * *p1 + c * *p2 + d * *p3
			}
		}
	}

	/// Evaluate the curve at `t` using the de Casteljau recurrence. Numerically
	/// equivalent to [`Curve::evaluate`]; kept distinct so either form can be
	/// swapped in where one is more numerically stable than the other.
	pub fn evaluate_de_casteljau(&self, t: f32) -> Vec2 {
		let mut values: [Vec2; 4] = match self {
			Curve::Line(p) => [p[0], p[1], Vec2::ZERO, Vec2::ZERO],
			Curve::Quadratic(p) => [p[0], p[1], p[2], Vec2::ZERO],
			Curve::Cubic(p) => *p,
		};
		let n = self.degree() as usize;
		for i in 0..n {
			for j in 0..(n - i) {
				values[j] = values[j].lerp(values[j + 1], t);
			}
		}
		values[0]
	}

	/// Extract the per-axis scalar Bezier control points (`axis` 0 = x, 1 = y).
	fn axis_points(&self, axis: usize) -> [f32; 4] {
		let points = self.points();
		let mut out = [0.0; 4];
		for (i, p) in points.iter().enumerate() {
			out[i] = p[axis];
		}
		out
	}

	/// Convert the `axis` component of this curve to a power-basis `Poly1`.
	/// Only valid for degree-1 curves.
	pub fn axis_poly1(&self, axis: usize) -> Poly1 {
		debug_assert_eq!(self.degree(), 1);
		let p = self.axis_points(axis);
		Poly1::new([p[0], p[1] - p[0]])
	}

	/// Convert the `axis` component of this curve to a power-basis `Poly2`.
	/// Only valid for degree-2 curves.
	pub fn axis_poly2(&self, axis: usize) -> Poly2 {
		debug_assert_eq!(self.degree(), 2);
		let p = self.axis_points(axis);
		Poly2::new([p[0], 2. * (p[1] - p[0]), p[0] - 2. * p[1] + p[2]])
	}

	/// Convert the `axis` component of this curve to a power-basis `Poly3`.
	/// Only valid for degree-3 curves.
	pub fn axis_poly3(&self, axis: usize) -> Poly3 {
		debug_assert_eq!(self.degree(), 3);
		let p = self.axis_points(axis);
		Poly3::new([p[0], 3. * (p[1] - p[0]), 3. * (p[0] - 2. * p[1] + p[2]), -p[0] + 3. * p[1] - 3. * p[2] + p[3]])
	}

	/// Returns a curve with its points in reverse order, so it traces the same path
	/// from `end()` to `start()`.
	pub fn reverse(&self) -> Curve {
		match self {
			Curve::Line([p0, p1]) => Curve::Line([*p1, *p0]),
			Curve::Quadratic([p0, p1, p2]) => Curve::Quadratic([*p2, *p1, *p0]),
			Curve::Cubic([p0, p1, p2, p3]) => Curve::Cubic([*p3, *p2, *p1, *p0]),
		}
	}

	/// Split the curve into two curves of the same degree, meeting at `evaluate(t)`.
	pub fn split(&self, t: f32) -> (Curve, Curve) {
		match self {
			Curve::Line([p0, p1]) => {
				let mid = p0.lerp(*p1, t);
				(Curve::Line([*p0, mid]), Curve::Line([mid, *p1]))
			}
			Curve::Quadratic([p0, p1, p2]) => {
				let p01 = p0.lerp(*p1, t);
				let p12 = p1.lerp(*p2, t);
				let mid = p01.lerp(p12, t);
				(Curve::Quadratic([*p0, p01, mid]), Curve::Quadratic([mid, p12, *p2]))
			}
			Curve::Cubic([p0, p1, p2, p3]) => {
				let p01 = p0.lerp(*p1, t);
				let p12 = p1.lerp(*p2, t);
				let p23 = p2.lerp(*p3, t);
				let p012 = p01.lerp(p12, t);
				let p123 = p12.lerp(p23, t);
				let mid = p012.lerp(p123, t);
				(Curve::Cubic([*p0, p01, p012, mid]), Curve::Cubic([mid, p123, p23, *p3]))
			}
		}
	}
}
