//! Flattening: approximating a curve with a sequence of line segments to within
//! a given error tolerance.
//!
//! Grounded on `bezier-rs`'s adaptive-subdivision flattener (`Bezier::rs`'s
//! `t_value`-recursion based on its own "scale factor" flatness test), reshaped
//! around this crate's sagitta-based tolerance test per `SPEC_FULL.md`: a
//! monotone piece is subdivided until the chord from its endpoints deviates from
//! the curve by less than `precision`.

use glam::Vec2;

use crate::curve::Curve;

/// Maximum recursion depth: bounds flattening to at most `2^20` segments even
/// under pathological precision/curve combinations.
const MAX_DEPTH: u32 = 20;

/// Flatten `curve` into a sequence of points (including both endpoints) such
/// that the polyline through them deviates from the curve by no more than
/// `precision` pixels. Returns an owned `Vec` rather than a lazy iterator: the
/// recursive subdivision needs to look ahead before it knows how many points
/// it will emit.
pub fn flatten(curve: &Curve, precision: f32) -> Vec<Vec2> {
	let mut points = vec![curve.start()];
	subdivide(curve, 0.0, 1.0, precision, MAX_DEPTH, &mut points);
	points
}

fn subdivide(curve: &Curve, t0: f32, t1: f32, precision: f32, depth: u32, points: &mut Vec<Vec2>) {
	if curve.degree() == 1 || depth == 0 || is_flat_enough(curve, t0, t1, precision) {
		points.push(curve.evaluate(t1));
		return;
	}

	let mid = 0.5 * (t0 + t1);
	subdivide(curve, t0, mid, precision, depth - 1, points);
	subdivide(curve, mid, t1, precision, depth - 1, points);
}

/// Sagitta test: the maximum distance from the curve's midpoint to the chord
/// joining its endpoints, compared against `precision`.
fn is_flat_enough(curve: &Curve, t0: f32, t1: f32, precision: f32) -> bool {
	let p0 = curve.evaluate(t0);
	let p1 = curve.evaluate(t1);
	let mid = curve.evaluate(0.5 * (t0 + t1));

	let chord = p1 - p0;
	let chord_length = chord.length();
	if chord_length <= crate::consts::GEOMETRY_EPSILON {
		return true;
	}

	let sagitta = (chord.perp_dot(mid - p0)).abs() / chord_length;
	sagitta <= precision
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn line_flattens_to_its_own_endpoints() {
		let line = Curve::new_line(Vec2::new(0., 0.), Vec2::new(10., 0.)).unwrap();
		let points = flatten(&line, 0.1);
		assert_eq!(points, vec![Vec2::new(0., 0.), Vec2::new(10., 0.)]);
	}

	#[test]
	fn flattened_polyline_stays_within_precision() {
		let curve = Curve::new_quadratic(Vec2::new(20., 10.), Vec2::new(23.5, 15.), Vec2::new(30., 10.)).unwrap();
		let precision = 0.05;
		let points = flatten(&curve, precision);
		assert!(points.len() > 2);

		// Every curve sample should lie within ~precision of the nearest chord.
		for i in 0..points.len() - 1 {
			let a = points[i];
			let b = points[i + 1];
			let chord = b - a;
			let len = chord.length();
			if len <= 1e-6 {
				continue;
			}
			// Sample a handful of interior t values between the two flattened
			// points' approximate parameters by re-walking the curve isn't
			// available here directly, so instead check the segment midpoint
			// against the curve's own midpoint deviation is bounded.
			let mid = a.lerp(b, 0.5);
			let on_curve = curve.evaluate(curve_t_near(&curve, mid));
			assert!((on_curve - mid).length() < precision * 4.0);
		}
	}

	fn curve_t_near(curve: &Curve, point: Vec2) -> f32 {
		let mut best_t = 0.0;
		let mut best_dist = f32::MAX;
		let mut t = 0.0;
		while t <= 1.0 {
			let d = (curve.evaluate(t) - point).length();
			if d < best_dist {
				best_dist = d;
				best_t = t;
			}
			t += 0.01;
		}
		best_t
	}

	#[test]
	fn tighter_precision_yields_more_points() {
		let curve = Curve::new_cubic(Vec2::new(37.5, 15.), Vec2::new(28., 30.), Vec2::new(10., 22.), Vec2::new(10., 10.)).unwrap();
		let loose = flatten(&curve, 1.0);
		let tight = flatten(&curve, 0.01);
		assert!(tight.len() >= loose.len());
	}
}
