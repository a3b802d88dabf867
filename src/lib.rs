//! A 2D vector-graphics rasterizer for planar Bezier curves (lines, quadratics,
//! cubics): a scanline-plus-winding path that emits filled spans and boundary
//! pixels, and an analytic MSAA path that emits per-sample coverage masks.
//!
//! The crate is organized leaf-first, the way the teacher workspace lays out
//! `bezier-rs` and `core/editor`: geometry primitives ([`curve`], [`poly`]) at
//! the bottom, the two rasterization pipelines ([`monotone`], [`fragment`],
//! [`resolver`] for the scanline path; [`segment`], [`lut`], [`msaa`] for the
//! MSAA path) built on top, and [`image`] holding the pixel buffers both
//! pipelines can write into. This top-level module wires the pipelines
//! together behind the four entry points described in the crate's design
//! document: [`rasterize`], [`rasterize_msaa`], [`msaa::resolve`], and
//! [`msaa::fill_opaque`].

pub mod consts;
pub mod curve;
pub mod error;
pub mod flatten;
pub mod fragment;
pub mod image;
pub mod lut;
pub mod monotone;
pub mod msaa;
pub mod poly;
pub mod resolver;
pub mod segment;

pub use consts::{CUBIC_NEWTON_ITERATIONS, DEFAULT_FLATTEN_PRECISION, DEFAULT_LUT_RANGE, DEFAULT_LUT_RESOLUTION, GEOMETRY_EPSILON, WINDING_EPSILON};
pub use curve::Curve;
pub use error::RasterError;
pub use flatten::flatten;
pub use fragment::{classify_fragments, walk_curve, Fragment};
pub use image::{Bgra, Image, Pixel, Rgba};
pub use lut::{Lut, SampleCount};
pub use monotone::{compute_cuts, Cut};
pub use msaa::{fill_opaque, rasterize_msaa as rasterize_msaa_segments, resolve, SampleRun};
pub use resolver::resolve_fragments;
pub use segment::Segment;

/// Rasterize `curves` with the scanline-plus-winding path: walk every curve's
/// monotone pieces into boundary fragments, classify each fragment's winding
/// contribution, then sort and resolve them into filled spans and boundary
/// pixels under the non-zero winding rule.
///
/// `on_span(y, x0, x1)` is called once per contiguous interior run on
/// scanline `y` with `x0..=x1` both inclusive; `on_pixel(x, y)` is called once
/// per boundary pixel the winding rule decides is covered. Both callbacks
/// receive coordinates in the curves' own coordinate system — clipping to an
/// output image's bounds is the caller's responsibility (§7's "out-of-bounds
/// pixel emit" is not an error here).
///
/// Equivalent to [`rasterize_with_scratch`] with a fresh, unshared scratch
/// buffer. Prefer that function directly when rasterizing many paths in a
/// loop, per the "expose capacity-management hooks" redesign note: the
/// fragment list is the one scratch buffer worth reusing across calls.
pub fn rasterize(curves: &[Curve], tolerance: f32, on_pixel: impl FnMut(i32, i32), on_span: impl FnMut(i32, i32, i32)) -> Result<(), RasterError> {
	let mut scratch = Vec::new();
	rasterize_with_scratch(curves, tolerance, &mut scratch, on_pixel, on_span)
}

/// As [`rasterize`], but reuses `scratch` as the fragment buffer instead of
/// allocating a fresh one. `scratch` is cleared at the start of the call; its
/// capacity (and thus any heap allocation) survives across calls.
pub fn rasterize_with_scratch(
	curves: &[Curve],
	tolerance: f32,
	scratch: &mut Vec<Fragment>,
	mut on_pixel: impl FnMut(i32, i32),
	mut on_span: impl FnMut(i32, i32, i32),
) -> Result<(), RasterError> {
	if curves.len() > u32::MAX as usize {
		return Err(RasterError::SegmentCountOverflow(curves.len()));
	}

	scratch.clear();
	for (index, curve) in curves.iter().enumerate() {
		walk_curve(index as u32, curve, tolerance, scratch);
	}
	classify_fragments(curves, scratch, tolerance, WINDING_EPSILON);
	resolve_fragments(scratch, &mut on_pixel, |y, x0, x1| on_span(y, x0, x1));

	Ok(())
}

/// Rasterize already-flattened line `segments` with the analytic MSAA path,
/// appending one [`SampleRun`] per boundary pixel and per solid interior span
/// to `out_sample_runs`. `width`/`height` bound the scanlines visited; `lut`
/// supplies the per-sample coverage lookup.
///
/// This is [`msaa::rasterize_msaa`] reshaped to the append-into-caller-buffer
/// shape the scanline path's [`rasterize_with_scratch`] uses, so both
/// pipelines offer the same reuse-by-clearing-length discipline described in
/// the crate's resource model.
pub fn rasterize_msaa(segments: &[Segment], lut: &Lut, width: i32, height: i32, out_sample_runs: &mut Vec<SampleRun>) -> Result<(), RasterError> {
	if segments.len() > u32::MAX as usize {
		return Err(RasterError::SegmentCountOverflow(segments.len()));
	}

	out_sample_runs.clear();
	out_sample_runs.extend(rasterize_msaa_segments(segments, lut, width, height));
	Ok(())
}

/// Flatten every curve in `curves` into [`Segment`]s at `precision`, in curve
/// order, suitable as input to [`rasterize_msaa`]. A convenience wrapper over
/// [`flatten`] plus [`Segment::new`] for the common case of driving the MSAA
/// path directly from Bezier input rather than pre-flattened polylines.
pub fn flatten_curves_to_segments(curves: &[Curve], precision: f32) -> Vec<Segment> {
	let mut segments = Vec::new();
	for curve in curves {
		let points = flatten(curve, precision);
		for window in points.windows(2) {
			segments.push(Segment::new(window[0], window[1]));
		}
	}
	segments
}

#[cfg(test)]
mod tests {
	use super::*;
	use glam::Vec2;
	use std::collections::HashSet;

	fn square_curves() -> Vec<Curve> {
		vec![
			Curve::new_line(Vec2::new(10., 10.), Vec2::new(20., 10.)).unwrap(),
			Curve::new_line(Vec2::new(20., 10.), Vec2::new(20., 20.)).unwrap(),
			Curve::new_line(Vec2::new(20., 20.), Vec2::new(10., 20.)).unwrap(),
			Curve::new_line(Vec2::new(10., 20.), Vec2::new(10., 10.)).unwrap(),
		]
	}

	#[test]
	fn ten_by_ten_square_fills_exactly_one_hundred_pixels() {
		let curves = square_curves();
		let mut filled: HashSet<(i32, i32)> = HashSet::new();
		rasterize(
			&curves,
			GEOMETRY_EPSILON,
			|x, y| {
				filled.insert((x, y));
			},
			|y, x0, x1| {
				for x in x0..=x1 {
					filled.insert((x, y));
				}
			},
		)
		.unwrap();

		assert_eq!(filled.len(), 100);
		for y in 10..20 {
			for x in 10..20 {
				assert!(filled.contains(&(x, y)));
			}
		}
	}

	#[test]
	fn rasterize_is_idempotent() {
		let curves = square_curves();

		let run = || {
			let mut pixels: Vec<(i32, i32)> = Vec::new();
			let mut spans: Vec<(i32, i32, i32)> = Vec::new();
			rasterize(&curves, GEOMETRY_EPSILON, |x, y| pixels.push((x, y)), |y, x0, x1| spans.push((y, x0, x1))).unwrap();
			pixels.sort_unstable();
			spans.sort_unstable();
			(pixels, spans)
		};

		assert_eq!(run(), run());
	}

	#[test]
	fn rasterize_with_scratch_reuses_capacity_across_calls() {
		let curves = square_curves();
		let mut scratch = Vec::new();

		let mut first_pass: HashSet<(i32, i32)> = HashSet::new();
		rasterize_with_scratch(&curves, GEOMETRY_EPSILON, &mut scratch, |x, y| { first_pass.insert((x, y)); }, |_, _, _| {}).unwrap();
		let capacity_after_first = scratch.capacity();

		let mut second_pass: HashSet<(i32, i32)> = HashSet::new();
		rasterize_with_scratch(&curves, GEOMETRY_EPSILON, &mut scratch, |x, y| { second_pass.insert((x, y)); }, |_, _, _| {}).unwrap();

		assert_eq!(first_pass, second_pass);
		assert!(scratch.capacity() >= capacity_after_first);
	}

	#[test]
	fn flatten_curves_to_segments_produces_a_closed_chain() {
		let curves = square_curves();
		let segments = flatten_curves_to_segments(&curves, DEFAULT_FLATTEN_PRECISION);
		assert!(!segments.is_empty());
		// Every flattened vertex is shared by exactly two segment endpoints in a closed path.
		let total_length: f32 = segments.iter().map(|s| (s.top - s.bottom).length()).sum();
		assert!(total_length > 0.0);
	}

	#[test]
	fn rasterize_msaa_matches_square_interior_coverage() {
		let curves = square_curves();
		let segments = flatten_curves_to_segments(&curves, DEFAULT_FLATTEN_PRECISION);
		let lut = Lut::new(SampleCount::X8);

		let mut runs = Vec::new();
		rasterize_msaa(&segments, &lut, 30, 30, &mut runs).unwrap();

		let y15_total: u32 = runs.iter().filter(|r| r.y == 15).map(|r| r.length).sum();
		assert_eq!(y15_total, 10);
	}
}
