use std::convert::Infallible;

use embedded_graphics::{
	Drawable, Pixel,
	draw_target::DrawTarget,
	geometry::{Dimensions, OriginDimensions, Point, Size},
	pixelcolor::{Rgb888, RgbColor},
	primitives::Rectangle,
};
use tracing::instrument;

use crate::{error::Result, image::RgbImage, region::Region};

/// In-memory mirror of what the panel is showing.
///
/// The GC9A01 can't be read back, so anything that depends on the current screen contents
/// (alpha compositing, anti-aliased drawing) has to work from this copy instead.
#[derive(Debug, Clone)]
pub struct Framebuffer {
	image: RgbImage,
}

impl Framebuffer {
	/// A black framebuffer of the given size.
	pub fn new(size: Size) -> Self {
		Self {
			image: RgbImage::filled(size, Rgb888::BLACK),
		}
	}

	/// Set every pixel to `colour`.
	#[instrument(level = "trace", skip(self))]
	pub fn init(&mut self, colour: Rgb888) {
		self.image.solid(colour);
	}

	pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb888> {
		self.image.pixel(Point::new(x.into(), y.into()))
	}

	/// The whole buffer.
	pub fn image(&self) -> &RgbImage {
		&self.image
	}

	/// Copy out a region. The region must already be clipped.
	pub fn get_region(&self, region: Region) -> Result<RgbImage> {
		self.image.region(region)
	}

	/// Overwrite a region. The pixels must have exactly the region's dimensions.
	pub fn put_region(&mut self, region: Region, pixels: &RgbImage) -> Result<()> {
		self.image.put_region(region, pixels)
	}

	/// Render something into the framebuffer in place.
	///
	/// Drawing happens on the live buffer so anything the drawable reads back (blending,
	/// anti-aliasing) sees the real screen contents. Returns the on-screen part of the
	/// drawable's bounding box, which is what needs pushing to the panel.
	pub fn draw_via<D>(&mut self, item: &D) -> Option<Region>
	where
		D: Drawable<Color = Rgb888> + Dimensions,
	{
		let Ok(_) = item.draw(self);
		Region::clip(&item.bounding_box(), self.size())
	}
}

impl OriginDimensions for Framebuffer {
	fn size(&self) -> Size {
		self.image.size()
	}
}

impl DrawTarget for Framebuffer {
	type Color = Rgb888;
	type Error = Infallible;

	fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
	where
		I: IntoIterator<Item = Pixel<Self::Color>>,
	{
		self.image.draw_iter(pixels)
	}

	fn fill_solid(
		&mut self,
		area: &Rectangle,
		colour: Self::Color,
	) -> std::result::Result<(), Self::Error> {
		self.image.fill_solid(area, colour)
	}
}
