//! The MSAA coverage lookup table: for a quantized (normal, signed distance)
//! pair, a precomputed bitmask of which subsample offsets lie on the positive
//! side of the half-plane they describe.
//!
//! Grounded on `msaa/src/msaa.cpp`'s `Lut::create`/`fetch*` family, including its
//! exact D3D-style subsample position tables (`samples_x2`..`samples_x32`, in
//! sixteenths of a pixel). The table itself is built identically; only the
//! storage (`Vec<u32>` instead of a hand-rolled `List`) and the argument types
//! (`glam::Vec2` instead of the original's `V2f`) differ.

use glam::Vec2;

use crate::consts::{DEFAULT_LUT_RANGE, DEFAULT_LUT_RESOLUTION, MAX_SAMPLE_COUNT};
use crate::error::RasterError;

/// Supported MSAA subsample counts, each with a fixed D3D-style sample pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SampleCount {
	X2,
	X4,
	X8,
	X16,
	X32,
}

impl SampleCount {
	pub fn count(self) -> usize {
		match self {
			SampleCount::X2 => 2,
			SampleCount::X4 => 4,
			SampleCount::X8 => 8,
			SampleCount::X16 => 16,
			SampleCount::X32 => 32,
		}
	}

	fn positions(self) -> &'static [[f32; 2]] {
		match self {
			SampleCount::X2 => &SAMPLES_X2,
			SampleCount::X4 => &SAMPLES_X4,
			SampleCount::X8 => &SAMPLES_X8,
			SampleCount::X16 => &SAMPLES_X16,
			SampleCount::X32 => &SAMPLES_X32,
		}
	}
}

// Sample positions in sixteenths of a pixel, relative to the pixel center.
const SAMPLES_X2: [[f32; 2]; 2] = [[-4., -4.], [4., 4.]];

const SAMPLES_X4: [[f32; 2]; 4] = [[-2., -6.], [7., -2.], [-6., 2.], [2., 6.]];

const SAMPLES_X8: [[f32; 2]; 8] = [[7., -7.], [-3., -5.], [1., -3.], [-7., -1.], [5., 1.], [-1., 3.], [-5., 5.], [3., 7.]];

const SAMPLES_X16: [[f32; 2]; 16] = [
	[-7., -8.],
	[0., -7.],
	[-4., -6.],
	[3., -5.],
	[7., -4.],
	[-1., -3.],
	[-5., -2.],
	[4., -1.],
	[-8., 0.],
	[1., 1.],
	[-3., 2.],
	[5., 3.],
	[-6., 4.],
	[2., 5.],
	[-2., 6.],
	[6., 7.],
];

const SAMPLES_X32: [[f32; 2]; 32] = [
	[-4., -7.],
	[5., -7.],
	[1., -6.],
	[-7., -5.],
	[-3., -5.],
	[6., -5.],
	[5., -4.],
	[-1., -4.],
	[4., -4.],
	[2., -3.],
	[-2., -2.],
	[7., -2.],
	[-6., -1.],
	[1., -1.],
	[3., -1.],
	[-4., 0.],
	[-7., 1.],
	[2., 1.],
	[-1., 2.],
	[6., 2.],
	[-6., 3.],
	[-3., 3.],
	[0., 4.],
	[4., 4.],
	[2., 5.],
	[7., 5.],
	[-7., 6.],
	[-3., 6.],
	[5., 6.],
	[-5., 7.],
	[-1., 7.],
	[3., 7.],
];

/// A precomputed coverage table mapping a quantized `(normal, signed distance)`
/// pair to a bitmask of subsamples on the line's positive side.
#[derive(Clone, Debug)]
pub struct Lut {
	table: Vec<u32>,
	samples: Vec<Vec2>,
	resolution: u16,
	range: f32,
	resolution_f32: f32,
	inv_range: f32,
	min_a: f32,
	pub sample_mask: u32,
}

impl Lut {
	/// Build a LUT for one of the fixed sample patterns, at the default
	/// resolution and range.
	pub fn new(samples: SampleCount) -> Self {
		Self::with_resolution(samples, DEFAULT_LUT_RESOLUTION, DEFAULT_LUT_RANGE).expect("fixed sample counts never exceed MAX_SAMPLE_COUNT")
	}

	/// Build a LUT from a caller-provided sample pattern (in sixteenths of a
	/// pixel, relative to the pixel center).
	pub fn from_samples(samples: &[Vec2], resolution: u16, range: f32) -> Result<Self, RasterError> {
		if samples.len() > MAX_SAMPLE_COUNT {
			return Err(RasterError::InvalidSampleCount(samples.len()));
		}
		Ok(Self::build(samples.to_vec(), resolution, range))
	}

	fn with_resolution(samples: SampleCount, resolution: u16, range: f32) -> Result<Self, RasterError> {
		let positions: Vec<Vec2> = samples.positions().iter().map(|p| Vec2::new(p[0], p[1])).collect();
		if positions.len() > MAX_SAMPLE_COUNT {
			return Err(RasterError::InvalidSampleCount(positions.len()));
		}
		Ok(Self::build(positions, resolution, range))
	}

	fn build(samples: Vec<Vec2>, resolution: u16, range: f32) -> Self {
		let sample_count = samples.len();
		let resolution_usize = resolution as usize;
		let mut table = vec![0u32; resolution_usize * resolution_usize];

		for y in 0..resolution_usize {
			for x in 0..resolution_usize {
				let tex_coord = (Vec2::new(x as f32, y as f32) + Vec2::splat(0.5)) / resolution as f32;
				let p = 2.0 * (tex_coord - Vec2::splat(0.5));
				let n = p.normalize_or_zero();
				let a = (1.0 - n.dot(p)) * range;

				let mut mask = 0u32;
				for (i, sample) in samples.iter().enumerate() {
					let offset = *sample / 16.0;
					if n.dot(offset) > a {
						mask |= 1 << i;
					}
				}
				table[y * resolution_usize + x] = mask;
			}
		}

		let sample_mask = if sample_count >= 32 { u32::MAX } else { (1u32 << sample_count) - 1 };

		Lut {
			table,
			samples,
			resolution,
			range,
			resolution_f32: resolution as f32,
			inv_range: 1.0 / range,
			min_a: range / resolution as f32,
			sample_mask,
		}
	}

	pub fn sample_count(&self) -> usize {
		self.samples.len()
	}

	/// Bitmask of subsamples on the positive side of the half-plane through the
	/// pixel center with normal `n` and signed distance `a` along that normal.
	pub fn fetch(&self, n: Vec2, a: f32) -> u32 {
		let (n, a, flip) = if a < 0.0 { (-n, -a, true) } else { (n, a, false) };
		let a = a.clamp(self.min_a, self.range);

		let p = (1.0 - a * self.inv_range) * n;
		let tex_coord = 0.5 * p + Vec2::splat(0.5);

		let x = ((tex_coord.x * self.resolution_f32) as usize).min(self.resolution as usize - 1);
		let y = ((tex_coord.y * self.resolution_f32) as usize).min(self.resolution as usize - 1);

		let mask = self.table[y * self.resolution as usize + x];
		if flip {
			!mask & self.sample_mask
		} else {
			mask
		}
	}

	/// Bitmask for the half-plane through a point expressed in pixel-local
	/// `[0, 1]` coordinates (pixel center at `(0.5, 0.5)`).
	pub fn fetch_point_01(&self, n: Vec2, point: Vec2) -> u32 {
		let r = point - Vec2::splat(0.5);
		self.fetch(n, n.dot(r))
	}

	/// Bitmask for the horizontal half-plane at local height `y_left` (used for
	/// the low/high clipping masks in [`crate::msaa`]).
	pub fn fetch_y_left(&self, y_left: f32) -> u32 {
		self.fetch_point_01(Vec2::new(0.0, 1.0), Vec2::new(0.0, y_left))
	}
}
