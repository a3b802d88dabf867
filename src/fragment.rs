//! The scanline walker and winding classifier: walks each curve cell-by-cell on the
//! integer pixel grid, then assigns each emitted fragment its winding contribution.
//!
//! Grounded directly on the per-curve walking loop in the original source's
//! `cpu-scanline/src/main.cpp` (`main()`'s "Find boundary fragments" and "compute per
//! fragment winding changes" sections) — the same grid-offset math, the same
//! clamp-into-`[cut_t0, cut_t1]` root handling, the same chord-vs-reference-ray
//! intersection test, reshaped into free functions operating on this crate's `Curve`
//! and `Poly` types instead of the source's raw coefficient arrays.

use glam::{IVec2, Vec2};

use crate::curve::Curve;
use crate::monotone::compute_cuts;
use crate::poly::{find_roots_linear, find_roots_quadratic, find_root_cubic_newton, Poly3};

/// A single-pixel record emitted while walking a monotone piece of a curve.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fragment {
	pub position: IVec2,
	/// The curve parameter at which the curve entered this pixel.
	pub t0: f32,
	pub curve_index: u32,
	/// +1 if this fragment's piece moves in +y, -1 for -y, 0 for horizontal.
	pub winding_sign: i8,
	pub out_mask: bool,
	pub sample_mask: bool,
}

impl Fragment {
	fn new(position: IVec2, t0: f32, curve_index: u32) -> Self {
		Fragment { position, t0, curve_index, winding_sign: 0, out_mask: false, sample_mask: false }
	}
}

fn axis_i32(v: IVec2, axis: usize) -> i32 {
	if axis == 0 { v.x } else { v.y }
}

fn axis_set_i32(v: &mut IVec2, axis: usize, value: i32) {
	if axis == 0 { v.x = value } else { v.y = value }
}

fn sign(v: f32) -> f32 {
	if v > 0. { 1. } else if v < 0. { -1. } else { 0. }
}

/// Walk `curve` (monotone-decomposed internally) and append one fragment per pixel
/// it touches to `fragments`.
pub fn walk_curve(curve_index: u32, curve: &Curve, epsilon: f32, fragments: &mut Vec<Fragment>) {
	let cuts = compute_cuts(curve, epsilon);

	let mut cut_cursor = 0usize;
	while cut_cursor < cuts.len() && cuts[cut_cursor].t <= epsilon {
		cut_cursor += 1;
	}

	let mut cut_t0 = 0.0f32;
	while cut_t0 < 1.0 {
		let mut cut_t1 = 1.0f32;
		if cut_cursor < cuts.len() && cuts[cut_cursor].t < 1.0 - epsilon {
			cut_t1 = cuts[cut_cursor].t;
			cut_cursor += 1;
		}

		walk_monotone_piece(curve_index, curve, cut_t0, cut_t1, epsilon, fragments);

		cut_t0 = cut_t1;
	}
}

fn walk_monotone_piece(curve_index: u32, curve: &Curve, t0: f32, t1: f32, epsilon: f32, fragments: &mut Vec<Fragment>) {
	let p0 = curve.evaluate(t0);
	let p1 = curve.evaluate(t1);

	let first_pixel = IVec2::new(p0.x.floor() as i32, p0.y.floor() as i32);
	let last_pixel = IVec2::new(p1.x.floor() as i32, p1.y.floor() as i32);

	let step = IVec2::new(sign(p1.x - p0.x) as i32, sign(p1.y - p0.y) as i32);
	let step_count = IVec2::new((last_pixel.x - first_pixel.x).abs(), (last_pixel.y - first_pixel.y).abs());
	let frag_count = step_count.x + step_count.y + 1;

	let mut steps_remaining = step_count;
	let mut fragment_cursor = first_pixel;
	let mut cursor_t = t0;

	let mut next_t = [
		find_next_t(curve, 0, cursor_t, t1, fragment_cursor, step, epsilon),
		find_next_t(curve, 1, cursor_t, t1, fragment_cursor, step, epsilon),
	];

	for _ in 0..frag_count {
		let min_axis = if next_t[0] < next_t[1] { 0 } else { 1 };
		let step_t = next_t[min_axis];

		fragments.push(Fragment::new(fragment_cursor, cursor_t, curve_index));

		if axis_i32(steps_remaining, min_axis) > 0 {
			let next_pos = axis_i32(fragment_cursor, min_axis) + axis_i32(step, min_axis);
			axis_set_i32(&mut fragment_cursor, min_axis, next_pos);
			let remaining = axis_i32(steps_remaining, min_axis) - 1;
			axis_set_i32(&mut steps_remaining, min_axis, remaining);

			cursor_t = step_t;
			next_t[min_axis] = find_next_t(curve, min_axis, cursor_t, t1, fragment_cursor, step, epsilon);
		} else {
			next_t[min_axis] = 2.0;
		}
	}
}

/// Find the parameter (within `[cursor_t, piece_t1]`) at which `curve` crosses the
/// next integer gridline on `axis`, or `2.0` if there is none.
fn find_next_t(curve: &Curve, axis: usize, cursor_t: f32, piece_t1: f32, fragment_cursor: IVec2, step: IVec2, epsilon: f32) -> f32 {
	let step_axis = axis_i32(step, axis) as f32;
	let grid_offset = 0.5 - 0.5 * step_axis;
	let next_pos = axis_i32(fragment_cursor, axis) as f32 + grid_offset + step_axis;

	let clamp_t = |t: f32| -> f32 {
		if t < cursor_t - epsilon {
			2.0
		} else if t > piece_t1 + epsilon {
			2.0
		} else {
			t.clamp(cursor_t, piece_t1)
		}
	};

	let mut t_min = match curve.degree() {
		1 => {
			let poly = curve.axis_poly1(axis);
			let roots = find_roots_linear(poly.coefficients[1], poly.coefficients[0] - next_pos, epsilon);
			if roots.is_empty() { 2.0 } else { clamp_t(roots.as_slice()[0]) }
		}
		2 => {
			let poly = curve.axis_poly2(axis);
			let roots = find_roots_quadratic(poly.coefficients[2], poly.coefficients[1], poly.coefficients[0] - next_pos, epsilon);
			let r0 = roots.as_slice().first().copied().unwrap_or(2.0);
			let r1 = roots.as_slice().get(1).copied().unwrap_or(2.0);
			clamp_t(r0).min(clamp_t(r1))
		}
		3 => {
			let poly = curve.axis_poly3(axis);
			let shifted = Poly3::new([poly.coefficients[0] - next_pos, poly.coefficients[1], poly.coefficients[2], poly.coefficients[3]]);
			clamp_t(find_root_cubic_newton(shifted, cursor_t, piece_t1))
		}
		_ => unreachable!("Curve can only be degree 1, 2, or 3"),
	};

	if t_min > 1.0 {
		t_min = if t_min <= 1.0 + epsilon { 1.0 } else { 2.0 };
	}

	t_min
}

/// Order `(a, b)` so the lower-y point comes first, breaking ties by x. Makes the
/// chord/ray intersection test below independent of the curve's traversal direction.
fn order_by_y(a: Vec2, b: Vec2) -> (Vec2, Vec2) {
	if a.y < b.y || (a.y == b.y && a.x <= b.x) {
		(a, b)
	} else {
		(b, a)
	}
}

/// Does the chord `a0..a1` cross the ray `b0..b1`? The chord's own parameter is
/// accepted with a small tolerance margin; the ray's parameter uses a half-open
/// `[0, 1)` interval so a curve passing exactly through a fragment boundary is
/// counted by exactly one side.
fn chord_crosses_ray(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2, epsilon: f32) -> bool {
	let col0 = a1 - a0;
	let col1 = b0 - b1;
	let det = col0.x * col1.y - col1.x * col0.y;
	if det.abs() <= epsilon {
		return false;
	}

	let inv_det = 1.0 / det;
	let rhs = b0 - a0;

	let t_chord = inv_det * (col1.y * rhs.x - col1.x * rhs.y);
	let t_ray = inv_det * (-col0.y * rhs.x + col0.x * rhs.y);

	let chord_ok = t_chord > -epsilon && t_chord < 1.0 + epsilon;
	let ray_ok = (0.0..1.0).contains(&t_ray);

	chord_ok && ray_ok
}

/// Compute `winding_sign`, `out_mask`, and `sample_mask` for every fragment in
/// `fragments`, given the curves they were generated from. `fragments` must be in
/// the per-curve emission order produced by [`walk_curve`] (consecutive fragments
/// sharing a `curve_index` are assumed adjacent).
pub fn classify_fragments(curves: &[Curve], fragments: &mut [Fragment], geometry_epsilon: f32, winding_epsilon: f32) {
	let len = fragments.len();
	for i in 0..len {
		let t0 = fragments[i].t0;
		let curve_index = fragments[i].curve_index;
		let t1 = if i + 1 < len && fragments[i + 1].curve_index == curve_index { fragments[i + 1].t0 } else { 1.0 };

		let curve = &curves[curve_index as usize];
		let p0 = curve.evaluate(t0);
		let p1 = curve.evaluate(t1);

		let origin = fragments[i].position.as_vec2();
		let (c0, c1) = order_by_y(p0 - origin, p1 - origin);

		let dy = p1.y - p0.y;
		fragments[i].winding_sign = if dy > winding_epsilon {
			1
		} else if dy < -winding_epsilon {
			-1
		} else {
			0
		};

		fragments[i].out_mask = chord_crosses_ray(c0, c1, Vec2::new(0., 0.5), Vec2::new(1., 0.5), geometry_epsilon);
		fragments[i].sample_mask = chord_crosses_ray(c0, c1, Vec2::new(0., 0.5), Vec2::new(0.5, 0.5), geometry_epsilon);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::consts::GEOMETRY_EPSILON;
	use std::collections::HashSet;

	#[test]
	fn line_emits_step_count_plus_one_fragments() {
		let curve = Curve::new_line(Vec2::new(0., 0.), Vec2::new(10., 10.)).unwrap();
		let mut fragments = Vec::new();
		walk_curve(0, &curve, GEOMETRY_EPSILON, &mut fragments);
		// p0=(0,0), p1=(10,10): step_count = (10,10), so 21 fragments.
		assert_eq!(fragments.len(), 21);
		let positions: HashSet<_> = fragments.iter().map(|f| f.position).collect();
		assert!(positions.contains(&IVec2::new(0, 0)));
		assert!(positions.contains(&IVec2::new(9, 9)));
	}

	#[test]
	fn horizontal_line_fragments_are_contiguous_in_x() {
		let curve = Curve::new_line(Vec2::new(0., 10.), Vec2::new(10., 10.)).unwrap();
		let mut fragments = Vec::new();
		walk_curve(0, &curve, GEOMETRY_EPSILON, &mut fragments);
		let mut xs: Vec<i32> = fragments.iter().map(|f| f.position.x).collect();
		xs.sort_unstable();
		assert_eq!(xs, (0..=10).collect::<Vec<_>>());
		assert!(fragments.iter().all(|f| f.position.y == 10));
	}

	#[test]
	fn quadratic_arc_fragments_span_expected_x_range() {
		let curves = [Curve::new_quadratic(Vec2::new(20., 10.), Vec2::new(23.5, 15.), Vec2::new(30., 10.)).unwrap()];
		let mut fragments = Vec::new();
		walk_curve(0, &curves[0], GEOMETRY_EPSILON, &mut fragments);
		let xs: HashSet<i32> = fragments.iter().map(|f| f.position.x).collect();
		let expected: HashSet<i32> = (20..=29).collect();
		assert_eq!(xs, expected);
	}

	#[test]
	fn horizontal_chord_has_zero_winding_sign() {
		let curves = [Curve::new_line(Vec2::new(0., 10.), Vec2::new(10., 10.)).unwrap()];
		let mut fragments = Vec::new();
		walk_curve(0, &curves[0], GEOMETRY_EPSILON, &mut fragments);
		classify_fragments(&curves, &mut fragments, GEOMETRY_EPSILON, 1e-4);
		assert!(fragments.iter().all(|f| f.winding_sign == 0));
	}

	#[test]
	fn vertical_line_has_consistent_winding_sign() {
		let curves = [Curve::new_line(Vec2::new(10., 10.), Vec2::new(10., 20.)).unwrap()];
		let mut fragments = Vec::new();
		walk_curve(0, &curves[0], GEOMETRY_EPSILON, &mut fragments);
		classify_fragments(&curves, &mut fragments, GEOMETRY_EPSILON, 1e-4);
		assert!(fragments.iter().all(|f| f.winding_sign == 1));
	}
}
