//! Monotone decomposition: per-curve "cut" parameters where a component derivative
//! vanishes, splitting the curve into pieces monotone in both x and y.
//!
//! Grounded on the original source's cut-finding loop in `cpu-scanline/src/main.cpp`
//! (`find_derivative_roots` + the cuts array, sorted with an insertion sort), adapted
//! to route through this crate's `Poly`/`Roots` types instead of duplicating the
//! derivative-root formulas inline.

use crate::curve::Curve;
use crate::poly::{find_roots_linear, find_roots_quadratic};

/// A curve parameter at which one axis's derivative vanishes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cut {
	pub t: f32,
	pub axis: u8,
}

/// Compute the (at most four) cuts for `curve`, padded with `t = 1` and sorted
/// ascending by `t`. Two slots are reserved per axis.
pub fn compute_cuts(curve: &Curve, epsilon: f32) -> [Cut; 4] {
	let mut cuts = [
		Cut { t: 1., axis: 0 },
		Cut { t: 1., axis: 0 },
		Cut { t: 1., axis: 1 },
		Cut { t: 1., axis: 1 },
	];

	for axis in 0..2usize {
		let base = axis * 2;
		cuts[base].axis = axis as u8;
		cuts[base + 1].axis = axis as u8;

		let roots = derivative_roots(curve, axis, epsilon);
		for (slot, root) in roots.as_slice().iter().enumerate() {
			cuts[base + slot].t = *root;
		}
	}

	cuts.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap());
	cuts
}

/// Roots of the derivative of the `axis` component of `curve`, ascending.
fn derivative_roots(curve: &Curve, axis: usize, epsilon: f32) -> crate::poly::Roots {
	match curve.degree() {
		1 => find_roots_linear(0., 0., epsilon), // derivative of a line is constant: no roots.
		2 => {
			let derivative = curve.axis_poly2(axis).derive();
			find_roots_linear(derivative.coefficients[1], derivative.coefficients[0], epsilon)
		}
		3 => {
			let derivative = curve.axis_poly3(axis).derive();
			find_roots_quadratic(derivative.coefficients[2], derivative.coefficients[1], derivative.coefficients[0], epsilon)
		}
		_ => unreachable!("Curve can only be degree 1, 2, or 3"),
	}
}
