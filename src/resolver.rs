//! Turns a pile of classified [`Fragment`]s into filled pixels, applying the
//! non-zero winding rule.
//!
//! Grounded on the sort-then-scan pass at the end of `cpu-scanline/src/main.cpp`'s
//! `main()`: fragments are sorted by `(y, x)`, a running winding total is carried
//! across each scanline, and any gap between two boundary pixels with non-zero
//! winding is emitted as a solid span. Unlike the original's `position.x > scan_x + 1`
//! span condition (which silently drops single-pixel gaps), this emits a span for
//! any gap of one or more pixels, and warns rather than panics when a scanline ends
//! with non-zero winding (an unclosed path, not a broken rasterizer).
//!
//! The running winding carried between pixels (`scan_winding`) accumulates
//! `Σ winding_sign · out_mask`, not raw `winding_sign`: `out_mask` is what marks a
//! fragment as an actual crossing of the pixel's horizontal reference ray
//! (`main.cpp:705`'s `delta_out_winding += sign * fragments[i].out_mask`), and a
//! curve can touch a pixel without crossing that ray. A boundary pixel is filled
//! when `scan_winding + Σ winding_sign · sample_mask != 0` (`main.cpp:710`'s
//! `sample_winding`), using the shorter half-width reference ray so a pixel the
//! fill merely grazes isn't counted as covered.

use crate::fragment::Fragment;

/// Resolve `fragments` (need not be pre-sorted) into filled pixels and spans via
/// the non-zero winding rule. `on_pixel` is called once per boundary pixel that
/// ends up inside the fill; `on_span` is called once per contiguous solid run of
/// interior pixels between boundary pixels on the same scanline (`x0..x1`, both
/// inclusive endpoints of the gap, exclusive of the boundary pixels themselves).
pub fn resolve_fragments(fragments: &mut [Fragment], mut on_pixel: impl FnMut(i32, i32), mut on_span: impl FnMut(i32, i32, i32)) {
	fragments.sort_by(|a, b| (a.position.y, a.position.x).cmp(&(b.position.y, b.position.x)));

	let mut i = 0;
	while i < fragments.len() {
		let y = fragments[i].position.y;
		let mut winding = 0i32;
		let mut prev_x: Option<i32> = None;

		while i < fragments.len() && fragments[i].position.y == y {
			let x = fragments[i].position.x;

			// Multiple fragments can land on the same pixel (e.g. two curves
			// crossing the same cell); merge their contributions before deciding
			// whether to fill and before emitting any span that preceded them.
			let mut delta_out = 0i32;
			let mut delta_sample = 0i32;
			while i < fragments.len() && fragments[i].position.y == y && fragments[i].position.x == x {
				let sign = fragments[i].winding_sign as i32;
				if fragments[i].out_mask {
					delta_out += sign;
				}
				if fragments[i].sample_mask {
					delta_sample += sign;
				}
				i += 1;
			}

			if let Some(prev) = prev_x {
				if x > prev + 1 && winding != 0 {
					on_span(y, prev + 1, x - 1);
				}
			}

			if winding + delta_sample != 0 {
				on_pixel(x, y);
			}
			winding += delta_out;

			prev_x = Some(x);
		}

		if winding != 0 {
			log::warn!("scanline y={y} ended with non-zero winding ({winding}): path is not closed");
		}
	}
}
