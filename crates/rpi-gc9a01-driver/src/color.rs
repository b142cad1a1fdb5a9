//! Pixel formats and the RGB565 wire codec.
//!
//! The panel only accepts big-endian RGB565. Everything on the host side is kept in
//! [`Rgb888`], optionally with an alpha channel ([`Rgba8888`]); conversion happens right
//! before a transfer.

use embedded_graphics::pixelcolor::{
	PixelColor, Rgb565, Rgb888, RgbColor,
	raw::{RawData, RawU16, RawU32},
};

use crate::image::{RgbImage, RgbaImage};

/// 8-bit-per-channel colour with straight (non-premultiplied) alpha.
///
/// Alpha 255 is fully opaque, 0 fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba8888 {
	r: u8,
	g: u8,
	b: u8,
	a: u8,
}

impl Rgba8888 {
	pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self { r, g, b, a }
	}

	pub fn opaque(colour: Rgb888) -> Self {
		Self::new(colour.r(), colour.g(), colour.b(), 255)
	}

	pub const fn r(self) -> u8 {
		self.r
	}

	pub const fn g(self) -> u8 {
		self.g
	}

	pub const fn b(self) -> u8 {
		self.b
	}

	pub const fn a(self) -> u8 {
		self.a
	}

	/// The colour channels, alpha dropped.
	pub fn rgb(self) -> Rgb888 {
		Rgb888::new(self.r, self.g, self.b)
	}
}

impl PixelColor for Rgba8888 {
	type Raw = RawU32;
}

/// Pack a colour into RGB565 by truncating the low bits of each channel.
pub fn rgb565(colour: Rgb888) -> u16 {
	RawU16::from(Rgb565::new(
		colour.r() >> 3,
		colour.g() >> 2,
		colour.b() >> 3,
	))
	.into_inner()
}

/// Expand an RGB565 value to RGB888, rounding each channel to the nearest 8-bit value.
///
/// Packing the result with [`rgb565`] gives back the same value.
pub fn expand_rgb565(value: u16) -> Rgb888 {
	let r = u32::from((value & 0xF800) >> 11);
	let g = u32::from((value & 0x07E0) >> 5);
	let b = u32::from(value & 0x001F);
	Rgb888::new(
		((r * 255 + 15) / 31) as u8,
		((g * 255 + 31) / 63) as u8,
		((b * 255 + 15) / 31) as u8,
	)
}

/// Flatten a translucent pixel against black.
///
/// This is *not* compositing: whatever is on screen is ignored. It only exists so that RGBA
/// data which never went through [`composite`](crate::composite) still encodes to
/// something sensible.
pub fn flatten_on_black(pixel: Rgba8888) -> Rgb888 {
	let scale = |c: u8| ((u32::from(c) * u32::from(pixel.a) + 127) / 255) as u8;
	Rgb888::new(scale(pixel.r), scale(pixel.g), scale(pixel.b))
}

/// Encode opaque pixels to the panel's wire format (big-endian RGB565, row-major).
pub fn encode_rgb(image: &RgbImage) -> Vec<u8> {
	encode(image.pixels().iter().copied())
}

/// Encode translucent pixels, flattening them against black first.
///
/// See [`flatten_on_black`]; draw through
/// [`Driver::draw_image_rgba_composited`](crate::Driver::draw_image_rgba_composited)
/// to blend against the actual screen contents instead.
pub fn encode_rgba(image: &RgbaImage) -> Vec<u8> {
	encode(image.pixels().iter().copied().map(flatten_on_black))
}

fn encode(pixels: impl ExactSizeIterator<Item = Rgb888>) -> Vec<u8> {
	let mut stream = Vec::with_capacity(pixels.len() * 2);
	for pixel in pixels {
		stream.extend_from_slice(&rgb565(pixel).to_be_bytes());
	}
	stream
}

/// Decode a wire stream back to RGB888. A trailing odd byte is ignored.
pub fn decode(stream: &[u8]) -> Vec<Rgb888> {
	stream
		.chunks_exact(2)
		.map(|pair| expand_rgb565(u16::from_be_bytes([pair[0], pair[1]])))
		.collect()
}
