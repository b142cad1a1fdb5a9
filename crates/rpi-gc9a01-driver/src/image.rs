use std::convert::Infallible;

use embedded_graphics::{
	Pixel,
	draw_target::DrawTarget,
	geometry::{OriginDimensions, Point, Size},
	pixelcolor::{PixelColor, Rgb888},
	primitives::Rectangle,
};

use crate::{
	color::Rgba8888,
	error::{Error, Result},
	region::Region,
};

/// Owned rectangular block of pixels, row-major.
///
/// Images are also [`DrawTarget`]s, so they can be painted with `embedded_graphics` before
/// being handed to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image<P> {
	size: Size,
	pixels: Vec<P>,
}

/// Opaque truecolour image.
pub type RgbImage = Image<Rgb888>;

/// Truecolour image with per-pixel alpha.
pub type RgbaImage = Image<Rgba8888>;

impl<P: Copy> Image<P> {
	/// An image of the given size with every pixel set to `fill`.
	pub fn filled(size: Size, fill: P) -> Self {
		Self {
			size,
			pixels: vec![fill; size.width as usize * size.height as usize],
		}
	}

	/// Wrap row-major pixels.
	///
	/// Fails if there aren't exactly `width * height` of them.
	pub fn from_pixels(size: Size, pixels: Vec<P>) -> Result<Self> {
		let expected = size.width as usize * size.height as usize;
		if pixels.len() != expected {
			return Err(Error::BufferLength {
				expected,
				actual: pixels.len(),
			});
		}

		Ok(Self { size, pixels })
	}

	pub fn size(&self) -> Size {
		self.size
	}

	pub fn pixels(&self) -> &[P] {
		&self.pixels
	}

	pub fn into_pixels(self) -> Vec<P> {
		self.pixels
	}

	pub fn is_empty(&self) -> bool {
		self.pixels.is_empty()
	}

	fn index(&self, point: Point) -> Option<usize> {
		let (x, y) = (usize::try_from(point.x).ok()?, usize::try_from(point.y).ok()?);
		let width = self.size.width as usize;
		(x < width && y < self.size.height as usize).then(|| y * width + x)
	}

	pub fn pixel(&self, point: Point) -> Option<P> {
		self.index(point).map(|i| self.pixels[i])
	}

	/// Set one pixel; points outside the image are ignored.
	pub fn set_pixel(&mut self, point: Point, value: P) {
		if let Some(i) = self.index(point) {
			self.pixels[i] = value;
		}
	}

	/// Overwrite every pixel.
	pub fn solid(&mut self, value: P) {
		self.pixels.fill(value);
	}

	/// Copy out the pixels of a region.
	///
	/// Fails if the region doesn't fit in the image.
	pub fn region(&self, region: Region) -> Result<Self> {
		self.check_fits(region)?;

		let width = self.size.width as usize;
		let mut pixels = Vec::with_capacity(region.pixel_count());
		for y in usize::from(region.y0)..=usize::from(region.y1) {
			let start = y * width + usize::from(region.x0);
			pixels.extend_from_slice(&self.pixels[start..start + usize::from(region.width())]);
		}

		Ok(Self {
			size: region.size(),
			pixels,
		})
	}

	/// Overwrite the pixels of a region with another image of exactly the region's size.
	///
	/// Both the fit and the shape are checked before anything is written.
	pub fn put_region(&mut self, region: Region, source: &Self) -> Result<()> {
		self.check_fits(region)?;
		if source.size != region.size() {
			return Err(Error::ShapeMismatch {
				expected: region.size(),
				actual: source.size,
			});
		}

		let width = self.size.width as usize;
		let row = usize::from(region.width());
		let rows = usize::from(region.y0)..=usize::from(region.y1);
		for (y, line) in rows.zip(source.pixels.chunks_exact(row)) {
			let start = y * width + usize::from(region.x0);
			self.pixels[start..start + row].copy_from_slice(line);
		}

		Ok(())
	}

	fn check_fits(&self, region: Region) -> Result<()> {
		if region.fits(self.size) {
			Ok(())
		} else {
			Err(Error::OutOfBounds {
				region,
				width: self.size.width.min(u16::MAX.into()) as u16,
				height: self.size.height.min(u16::MAX.into()) as u16,
			})
		}
	}
}

impl<P: PixelColor> OriginDimensions for Image<P> {
	fn size(&self) -> Size {
		self.size
	}
}

impl<P: PixelColor> DrawTarget for Image<P> {
	type Color = P;
	type Error = Infallible;

	fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
	where
		I: IntoIterator<Item = Pixel<Self::Color>>,
	{
		for Pixel(point, colour) in pixels {
			self.set_pixel(point, colour);
		}

		Ok(())
	}

	fn fill_solid(
		&mut self,
		area: &Rectangle,
		colour: Self::Color,
	) -> std::result::Result<(), Self::Error> {
		let Some(region) = Region::clip(area, self.size) else {
			return Ok(());
		};

		let width = self.size.width as usize;
		for y in usize::from(region.y0)..=usize::from(region.y1) {
			let start = y * width;
			let row = start + usize::from(region.x0)..=start + usize::from(region.x1);
			self.pixels[row].fill(colour);
		}

		Ok(())
	}
}
