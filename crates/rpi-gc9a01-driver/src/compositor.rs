//! Alpha compositing against the framebuffer.
//!
//! The destination is always opaque (it's what the panel shows), so "over" reduces to a
//! per-channel linear blend and the result is opaque too.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use itertools::Itertools;

use crate::{
	color::Rgba8888,
	error::{Error, Result},
	image::{RgbImage, RgbaImage},
};

/// Blend one channel: `src * a/255 + dst * (1 - a/255)`, rounded to nearest.
pub fn blend_channel(src: u8, dst: u8, alpha: u8) -> u8 {
	let a = u32::from(alpha);
	((u32::from(src) * a + u32::from(dst) * (255 - a) + 127) / 255) as u8
}

/// Composite one translucent pixel over an opaque one.
pub fn over(src: Rgba8888, dst: Rgb888) -> Rgb888 {
	match src.a() {
		255 => src.rgb(),
		0 => dst,
		a => Rgb888::new(
			blend_channel(src.r(), dst.r(), a),
			blend_channel(src.g(), dst.g(), a),
			blend_channel(src.b(), dst.b(), a),
		),
	}
}

/// Composite a translucent block over an opaque block of the same size.
///
/// `dst` should be the current framebuffer contents of the target region; the output
/// replaces them.
pub fn composite(dst: &RgbImage, src: &RgbaImage) -> Result<RgbImage> {
	if dst.size() != src.size() {
		return Err(Error::ShapeMismatch {
			expected: dst.size(),
			actual: src.size(),
		});
	}

	let pixels = src
		.pixels()
		.iter()
		.zip_eq(dst.pixels())
		.map(|(&s, &d)| over(s, d))
		.collect();
	RgbImage::from_pixels(dst.size(), pixels)
}
