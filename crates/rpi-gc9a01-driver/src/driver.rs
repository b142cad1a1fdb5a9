use embedded_graphics::{
	Drawable, Pixel,
	draw_target::DrawTarget,
	geometry::{Angle, Dimensions, OriginDimensions, Point, Size},
	mono_font::{MonoFont, MonoTextStyleBuilder},
	pixelcolor::{Rgb888, RgbColor},
	primitives::{
		Arc, Circle, Ellipse, Line, Primitive, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle,
		StrokeAlignment,
	},
	text::{Baseline, Text},
	transform::Transform,
};
use itertools::Itertools;
use tracing::{instrument, warn};

use crate::{
	color::{self, Rgba8888},
	compositor,
	error::{Error, Result},
	framebuffer::Framebuffer,
	image::{RgbImage, RgbaImage},
	protocol::{PanelConfig, PanelProtocol},
	region::{ClipStats, Region},
	transport::{OutputLine, Transport},
};

/// Driver for the LCD display.
///
/// Every drawing operation updates the [`Framebuffer`] first, then pushes exactly the
/// affected rectangle of the framebuffer to the panel, so the two stay identical. The only
/// exception is [`draw_image_rgb565`](Self::draw_image_rgb565), which bypasses the
/// framebuffer.
///
/// If the transport fails mid-operation, the framebuffer keeps the new contents but the panel
/// may not; [`sync()`](Self::sync) re-sends everything.
#[derive(Debug)]
pub struct Driver<T> {
	protocol: PanelProtocol<T>,
	framebuffer: Framebuffer,
	clips: ClipStats,
}

impl<T: Transport> Driver<T> {
	/// Wrap a transport and optional backlight line.
	///
	/// This doesn't talk to the display; call [`init()`](Self::init) next.
	pub fn new(transport: T, backlight: Option<Box<dyn OutputLine>>, config: PanelConfig) -> Self {
		Self {
			framebuffer: Framebuffer::new(config.size()),
			protocol: PanelProtocol::new(transport, backlight, config),
			clips: ClipStats::default(),
		}
	}

	/// Reset and initialise the panel, then clear it and the framebuffer to black.
	#[instrument(level = "debug", skip(self))]
	pub fn init(&mut self) -> Result<()> {
		self.protocol.init_display()?;
		self.framebuffer.init(Rgb888::BLACK);
		self.sync()
	}

	/// What the panel is showing, as far as the driver knows.
	pub fn framebuffer(&self) -> &Framebuffer {
		&self.framebuffer
	}

	pub fn protocol(&self) -> &PanelProtocol<T> {
		&self.protocol
	}

	pub fn transport(&self) -> &T {
		self.protocol.transport()
	}

	pub fn transport_mut(&mut self) -> &mut T {
		self.protocol.transport_mut()
	}

	/// How many drawing requests were clipped to the panel.
	///
	/// Hardware window clamps are counted separately, in
	/// [`PanelProtocol::clip_stats`].
	pub fn clip_stats(&self) -> ClipStats {
		self.clips
	}

	pub fn size(&self) -> Size {
		self.protocol.config().size()
	}

	/// Push a framebuffer region to the panel.
	#[instrument(level = "trace", skip(self))]
	fn push(&mut self, region: Region) -> Result<()> {
		let pixels = self.framebuffer.get_region(region)?;
		let stream = color::encode_rgb(&pixels);
		self.protocol.set_window(
			region.x0.into(),
			region.y0.into(),
			region.x1.into(),
			region.y1.into(),
		)?;
		self.protocol.write_ram_prepare()?;
		self.protocol.write_pixels(&stream)
	}

	/// Re-send the whole framebuffer.
	///
	/// Use after [`draw_image_rgb565`](Self::draw_image_rgb565) or a transport failure to make
	/// the panel match the framebuffer again.
	#[instrument(level = "debug", skip(self))]
	pub fn sync(&mut self) -> Result<()> {
		self.protocol.ensure_ready()?;
		match Region::full(self.size()) {
			Some(region) => self.push(region),
			None => Ok(()),
		}
	}

	/// Map a placement of `size` at `origin` to the on-screen region and the matching region of
	/// the source.
	fn placement(&mut self, origin: Point, size: Size) -> Result<Option<(Region, Region)>> {
		let bounds = self.size();
		let Some(region) = self.clips.clip(&Rectangle::new(origin, size), bounds) else {
			return Ok(None);
		};

		let offset = |screen: u16, origin: i32| u16::try_from(i64::from(screen) - i64::from(origin));
		let source = match (
			offset(region.x0, origin.x),
			offset(region.y0, origin.y),
			offset(region.x1, origin.x),
			offset(region.y1, origin.y),
		) {
			(Ok(x0), Ok(y0), Ok(x1), Ok(y1)) => Region::new(x0, y0, x1, y1),
			_ => {
				return Err(Error::OutOfBounds {
					region,
					width: size.width.min(u16::MAX.into()) as u16,
					height: size.height.min(u16::MAX.into()) as u16,
				});
			}
		};

		Ok(Some((region, source)))
	}

	/// Draw an opaque image with its top-left corner at `(x, y)`.
	///
	/// Parts outside the panel are clipped off.
	#[instrument(level = "trace", skip(self, image))]
	pub fn draw_image_rgb(&mut self, x: i32, y: i32, image: &RgbImage) -> Result<()> {
		self.protocol.ensure_ready()?;
		let Some((region, source)) = self.placement(Point::new(x, y), image.size())? else {
			return Ok(());
		};

		let pixels = image.region(source)?;
		self.framebuffer.put_region(region, &pixels)?;
		self.push(region)
	}

	/// Draw a translucent image with its top-left corner at `(x, y)`, blending it over what's
	/// currently on screen.
	///
	/// Repeated calls layer on top of each other, as they would on a compositing display.
	#[instrument(level = "trace", skip(self, image))]
	pub fn draw_image_rgba_composited(&mut self, x: i32, y: i32, image: &RgbaImage) -> Result<()> {
		self.protocol.ensure_ready()?;
		let Some((region, source)) = self.placement(Point::new(x, y), image.size())? else {
			return Ok(());
		};

		let foreground = image.region(source)?;
		let background = self.framebuffer.get_region(region)?;
		let blended = compositor::composite(&background, &foreground)?;
		self.framebuffer.put_region(region, &blended)?;
		self.push(region)
	}

	/// Send raw big-endian RGB565 pixels straight to the panel.
	///
	/// **This bypasses the framebuffer.** The framebuffer doesn't learn about these pixels, so
	/// the next translucent draw over this area will blend against stale contents, and the
	/// next [`sync()`](Self::sync) will overwrite them. Prefer
	/// [`draw_image_rgb`](Self::draw_image_rgb) unless you really need to skip the copy.
	///
	/// `bytes` must hold exactly `width * height * 2` bytes. The image is clipped to the
	/// panel.
	#[instrument(level = "trace", skip(self, bytes))]
	pub fn draw_image_rgb565(
		&mut self,
		x: i32,
		y: i32,
		width: u16,
		height: u16,
		bytes: &[u8],
	) -> Result<()> {
		let expected = usize::from(width) * usize::from(height) * 2;
		if bytes.len() != expected {
			return Err(Error::BufferLength {
				expected,
				actual: bytes.len(),
			});
		}

		self.protocol.ensure_ready()?;
		let size = Size::new(width.into(), height.into());
		let Some((region, source)) = self.placement(Point::new(x, y), size)? else {
			return Ok(());
		};

		warn!(?region, "writing to the panel without updating the framebuffer");
		let stride = usize::from(width) * 2;
		let row = usize::from(source.width()) * 2;
		let mut clipped = Vec::with_capacity(region.pixel_count() * 2);
		for y in usize::from(source.y0)..=usize::from(source.y1) {
			let start = y * stride + usize::from(source.x0) * 2;
			clipped.extend_from_slice(&bytes[start..start + row]);
		}

		self.protocol.set_window(
			region.x0.into(),
			region.y0.into(),
			region.x1.into(),
			region.y1.into(),
		)?;
		self.protocol.write_ram_prepare()?;
		self.protocol.write_pixels(&clipped)
	}

	/// Draw anything `embedded_graphics` can draw.
	///
	/// It's rendered into the framebuffer, then its bounding box is pushed.
	#[instrument(level = "trace", skip(self, item))]
	pub fn draw<D>(&mut self, item: &D) -> Result<()>
	where
		D: Drawable<Color = Rgb888> + Dimensions,
	{
		self.protocol.ensure_ready()?;
		let area = item.bounding_box();
		let region = self.framebuffer.draw_via(item);
		self.clips.record(&area, region);
		match region {
			Some(region) => self.push(region),
			None => Ok(()),
		}
	}

	/// Fill the whole screen.
	#[instrument(level = "trace", skip(self))]
	pub fn fill_screen(&mut self, colour: Rgb888) -> Result<()> {
		self.protocol.ensure_ready()?;
		self.framebuffer.init(colour);
		self.sync()
	}

	/// Fill a rectangle.
	pub fn fill_rect(&mut self, top_left: Point, size: Size, colour: Rgb888) -> Result<()> {
		self.draw(&Rectangle::new(top_left, size).into_styled(PrimitiveStyle::with_fill(colour)))
	}

	/// Set a single pixel.
	pub fn pixel(&mut self, point: Point, colour: Rgb888) -> Result<()> {
		self.fill_rect(point, Size::new(1, 1), colour)
	}

	/// Draw a straight line `width` pixels thick.
	pub fn line(&mut self, start: Point, end: Point, colour: Rgb888, width: u32) -> Result<()> {
		if width == 0 {
			return Ok(());
		}

		self.draw(&Line::new(start, end).into_styled(PrimitiveStyle::with_stroke(colour, width)))
	}

	/// Draw a rectangle, outlined and/or filled.
	///
	/// The outline is drawn inside the rectangle's bounds.
	pub fn rectangle(
		&mut self,
		top_left: Point,
		size: Size,
		outline: Option<Rgb888>,
		fill: Option<Rgb888>,
		outline_width: u32,
	) -> Result<()> {
		let Some(style) = shape_style(outline, fill, outline_width) else {
			return Ok(());
		};

		self.draw(&Rectangle::new(top_left, size).into_styled(style))
	}

	/// Draw a circle, outlined and/or filled.
	///
	/// A radius of zero draws the centre pixel alone, in the fill colour if given.
	pub fn circle(
		&mut self,
		center: Point,
		radius: u32,
		outline: Option<Rgb888>,
		fill: Option<Rgb888>,
		outline_width: u32,
	) -> Result<()> {
		if radius == 0 {
			return match fill.or(outline) {
				Some(colour) => self.pixel(center, colour),
				None => Ok(()),
			};
		}

		let Some(style) = shape_style(outline, fill, outline_width) else {
			return Ok(());
		};

		self.draw(&Circle::with_center(center, radius * 2 + 1).into_styled(style))
	}

	/// Draw an ellipse inscribed in the box between two opposite corners (inclusive).
	pub fn oval(
		&mut self,
		corner: Point,
		opposite: Point,
		outline: Option<Rgb888>,
		fill: Option<Rgb888>,
		outline_width: u32,
	) -> Result<()> {
		let Some(style) = shape_style(outline, fill, outline_width) else {
			return Ok(());
		};

		let bounds = Rectangle::with_corners(corner, opposite);
		self.draw(&Ellipse::new(bounds.top_left, bounds.size).into_styled(style))
	}

	/// Draw part of a circle's outline.
	///
	/// Angles are in degrees, starting at 3 o'clock and going clockwise. The arc always runs
	/// clockwise from `start` to `end`, so `270.0..45.0` passes through 3 o'clock; a span of
	/// 360° or more draws the whole circle. The arc is rasterised onto a transparent layer and
	/// composited, so only the stroke itself touches the screen.
	///
	/// Only circular arcs are supported: `embedded_graphics` has no elliptical arc primitive.
	#[instrument(level = "trace", skip(self))]
	pub fn arc(
		&mut self,
		center: Point,
		diameter: u32,
		start: f32,
		end: f32,
		colour: Rgb888,
		width: u32,
	) -> Result<()> {
		let sweep = clockwise_sweep(start, end);
		if width == 0 || diameter == 0 || sweep == 0.0 {
			return Ok(());
		}

		let arc = Arc::with_center(
			center,
			diameter,
			Angle::from_degrees(start),
			Angle::from_degrees(sweep),
		)
		.into_styled(PrimitiveStyle::with_stroke(Rgba8888::opaque(colour), width));

		let bounds = arc.bounding_box();
		let mut layer = RgbaImage::filled(bounds.size, Rgba8888::TRANSPARENT);
		let Ok(_) = arc.translate(-bounds.top_left).draw(&mut layer);
		self.draw_image_rgba_composited(bounds.top_left.x, bounds.top_left.y, &layer)
	}

	/// Write text with its top-left corner at `position`.
	///
	/// With a `background`, the text's bounding box is filled first.
	#[instrument(level = "trace", skip(self, font))]
	pub fn text(
		&mut self,
		position: Point,
		text: &str,
		font: &MonoFont<'_>,
		colour: Rgb888,
		background: Option<Rgb888>,
	) -> Result<()> {
		let style = MonoTextStyleBuilder::new().font(font).text_color(colour);
		let style = match background {
			Some(background) => style.background_color(background),
			None => style,
		}
		.build();

		self.draw(&Text::with_baseline(text, position, style, Baseline::Top))
	}

	/// Turn the display output on.
	pub fn display_on(&mut self) -> Result<()> {
		self.protocol.display_on()
	}

	/// Turn the display output off. The framebuffer and panel memory are kept.
	pub fn display_off(&mut self) -> Result<()> {
		self.protocol.display_off()
	}

	/// Turn the backlight on or off, if there is one.
	pub fn backlight(&mut self, on: bool) -> Result<()> {
		self.protocol.backlight(on)
	}

	/// Put the panel to sleep.
	pub fn sleep(&mut self) -> Result<()> {
		self.protocol.sleep()
	}

	/// Wake the panel.
	pub fn wake(&mut self) -> Result<()> {
		self.protocol.wake()
	}
}

/// Top-left and bottom-right corners of the box around some pixels, if there are any.
fn corners(pixels: &[Pixel<Rgb888>]) -> Option<(Point, Point)> {
	let xs = pixels.iter().map(|Pixel(point, _)| point.x).minmax();
	let ys = pixels.iter().map(|Pixel(point, _)| point.y).minmax();
	let ((x0, x1), (y0, y1)) = (xs.into_option()?, ys.into_option()?);
	Some((Point::new(x0, y0), Point::new(x1, y1)))
}

/// Clockwise span from `start` to `end` in degrees, in `0.0..=360.0`.
fn clockwise_sweep(start: f32, end: f32) -> f32 {
	let span = end - start;
	if span >= 360.0 {
		360.0
	} else {
		span.rem_euclid(360.0)
	}
}

fn shape_style(
	outline: Option<Rgb888>,
	fill: Option<Rgb888>,
	outline_width: u32,
) -> Option<PrimitiveStyle<Rgb888>> {
	let outline = outline.filter(|_| outline_width > 0);
	if outline.is_none() && fill.is_none() {
		return None;
	}

	let mut style = PrimitiveStyleBuilder::new().stroke_alignment(StrokeAlignment::Inside);
	if let Some(colour) = fill {
		style = style.fill_color(colour);
	}
	if let Some(colour) = outline {
		style = style.stroke_color(colour).stroke_width(outline_width);
	}

	Some(style.build())
}

impl<T: Transport> OriginDimensions for Driver<T> {
	fn size(&self) -> Size {
		self.protocol.config().size()
	}
}

impl<T: Transport> DrawTarget for Driver<T> {
	type Color = Rgb888;
	type Error = Error;

	fn draw_iter<I>(&mut self, pixels: I) -> Result<()>
	where
		I: IntoIterator<Item = Pixel<Self::Color>>,
	{
		self.protocol.ensure_ready()?;
		let pixels: Vec<_> = pixels.into_iter().collect();
		let Some((first, last)) = corners(&pixels) else {
			return Ok(());
		};

		let bounds = Rectangle::new(Point::zero(), Driver::size(self));
		let pixels: Vec<_> = pixels
			.into_iter()
			.filter(|Pixel(point, _)| bounds.contains(*point))
			.collect();

		let requested = Rectangle::with_corners(first, last);
		// in-bounds points fit in u16
		let region = corners(&pixels)
			.map(|(a, b)| Region::new(a.x as u16, a.y as u16, b.x as u16, b.y as u16));
		self.clips.record(&requested, region);
		let Some(region) = region else {
			return Ok(());
		};

		let Ok(()) = self.framebuffer.draw_iter(pixels);
		self.push(region)
	}

	fn fill_solid(&mut self, area: &Rectangle, colour: Self::Color) -> Result<()> {
		self.protocol.ensure_ready()?;
		let bounds = Driver::size(self);
		let Some(region) = self.clips.clip(area, bounds) else {
			return Ok(());
		};

		let Ok(()) = self.framebuffer.fill_solid(area, colour);
		self.push(region)
	}

	fn clear(&mut self, colour: Self::Color) -> Result<()> {
		self.fill_screen(colour)
	}
}

#[cfg(test)]
mod tests {
	use embedded_graphics::mono_font::ascii::FONT_6X10;

	use super::*;
	use crate::transport::PanelSimulator;

	fn driver() -> Driver<PanelSimulator> {
		let mut driver = Driver::new(
			PanelSimulator::new(Size::new(240, 240)),
			None,
			PanelConfig::default(),
		);
		driver.init().unwrap();
		driver.transport_mut().clear_events();
		driver
	}

	fn assert_in_sync(driver: &Driver<PanelSimulator>) {
		let full = Region::full(driver.size()).unwrap();
		let expected = color::encode_rgb(driver.framebuffer().image());
		assert!(
			driver.transport().ram_stream(full) == expected,
			"panel memory differs from framebuffer"
		);
	}

	#[test]
	fn init_clears_panel_and_framebuffer() {
		let driver = driver();
		assert!(
			driver
				.framebuffer()
				.image()
				.pixels()
				.iter()
				.all(|&p| p == Rgb888::BLACK)
		);
		assert_in_sync(&driver);
	}

	#[test]
	fn drawing_needs_init() {
		let mut driver = Driver::new(
			PanelSimulator::new(Size::new(240, 240)),
			None,
			PanelConfig::default(),
		);
		let err = driver.fill_screen(Rgb888::RED).unwrap_err();
		assert!(matches!(err, Error::NotReady { .. }));
		assert_eq!(driver.framebuffer().pixel(0, 0), Some(Rgb888::BLACK));
	}

	#[test]
	fn fill_rect_pushes_only_its_box() {
		let mut driver = driver();
		driver
			.fill_rect(Point::new(20, 20), Size::new(80, 40), Rgb888::RED)
			.unwrap();
		assert_eq!(driver.transport().window(), Region::new(20, 20, 99, 59));
		assert_eq!(driver.transport().data_len(), 4 + 4 + 80 * 40 * 2);
		assert_eq!(driver.framebuffer().pixel(20, 20), Some(Rgb888::RED));
		assert_eq!(driver.framebuffer().pixel(100, 20), Some(Rgb888::BLACK));
		assert_in_sync(&driver);
	}

	#[test]
	fn off_screen_draw_sends_nothing() {
		let mut driver = driver();
		driver
			.fill_rect(Point::new(300, 300), Size::new(10, 10), Rgb888::RED)
			.unwrap();
		driver
			.draw_image_rgb(-50, 0, &RgbImage::filled(Size::new(50, 50), Rgb888::RED))
			.unwrap();
		assert!(driver.transport().events().is_empty());
		assert_eq!(driver.clip_stats().empty, 2);
	}

	#[test]
	fn partially_off_screen_image_is_cropped() {
		let mut driver = driver();
		let pixels = (0..100u8).map(|i| Rgb888::new(i, i, i)).collect();
		let image = RgbImage::from_pixels(Size::new(10, 10), pixels).unwrap();
		driver.draw_image_rgb(-3, 235, &image).unwrap();

		assert_eq!(driver.transport().window(), Region::new(0, 235, 6, 239));
		assert_eq!(driver.framebuffer().pixel(0, 235), Some(Rgb888::new(3, 3, 3)));
		assert_eq!(driver.framebuffer().pixel(6, 239), Some(Rgb888::new(49, 49, 49)));
		assert_eq!(driver.clip_stats().clipped, 1);
		assert_in_sync(&driver);
	}

	#[test]
	fn composited_image_blends_with_screen() {
		let mut driver = driver();
		driver.fill_screen(Rgb888::new(0, 0, 200)).unwrap();
		let veil = RgbaImage::filled(Size::new(4, 4), Rgba8888::new(200, 0, 0, 128));
		driver.draw_image_rgba_composited(10, 10, &veil).unwrap();

		let pixel = driver.framebuffer().pixel(11, 11).unwrap();
		assert_eq!(pixel, Rgb888::new(100, 0, 100));
		assert_eq!(driver.framebuffer().pixel(9, 9), Some(Rgb888::new(0, 0, 200)));
		assert_in_sync(&driver);
	}

	#[test]
	fn raw_bypass_leaves_framebuffer_alone() {
		let mut driver = driver();
		let bytes = [0xF8, 0x00].repeat(4);
		driver.draw_image_rgb565(0, 0, 2, 2, &bytes).unwrap();

		assert_eq!(driver.transport().ram_pixel(1, 1), Some(0xF800));
		assert_eq!(driver.framebuffer().pixel(1, 1), Some(Rgb888::BLACK));

		driver.sync().unwrap();
		assert_eq!(driver.transport().ram_pixel(1, 1), Some(0));
	}

	#[test]
	fn raw_bypass_crops_rows() {
		let mut driver = driver();
		let bytes: Vec<u8> = (0..9u16).flat_map(|i| i.to_be_bytes()).collect();
		driver.draw_image_rgb565(-1, -1, 3, 3, &bytes).unwrap();

		assert_eq!(driver.transport().window(), Region::new(0, 0, 1, 1));
		assert_eq!(driver.transport().ram_pixel(0, 0), Some(4));
		assert_eq!(driver.transport().ram_pixel(1, 0), Some(5));
		assert_eq!(driver.transport().ram_pixel(0, 1), Some(7));
		assert_eq!(driver.transport().ram_pixel(1, 1), Some(8));
	}

	#[test]
	fn raw_bypass_checks_length() {
		let mut driver = driver();
		assert!(matches!(
			driver.draw_image_rgb565(0, 0, 2, 2, &[0; 7]),
			Err(Error::BufferLength {
				expected: 8,
				actual: 7
			})
		));
		assert!(driver.transport().events().is_empty());
	}

	#[test]
	fn shapes_keep_panel_in_sync() {
		let mut driver = driver();
		driver.fill_screen(Rgb888::new(0, 50, 100)).unwrap();
		driver
			.line(Point::new(5, 70), Point::new(235, 70), Rgb888::WHITE, 3)
			.unwrap();
		driver
			.rectangle(
				Point::new(10, 10),
				Size::new(50, 50),
				Some(Rgb888::YELLOW),
				Some(Rgb888::new(200, 0, 0)),
				2,
			)
			.unwrap();
		driver
			.circle(Point::new(120, 120), 30, Some(Rgb888::GREEN), None, 1)
			.unwrap();
		driver
			.oval(
				Point::new(220, 200),
				Point::new(120, 140),
				Some(Rgb888::YELLOW),
				Some(Rgb888::new(128, 0, 128)),
				3,
			)
			.unwrap();
		driver
			.arc(Point::new(55, 175), 90, 45.0, 270.0, Rgb888::new(255, 165, 0), 5)
			.unwrap();
		driver
			.text(
				Point::new(10, 210),
				"Shapes Test",
				&FONT_6X10,
				Rgb888::WHITE,
				Some(Rgb888::BLACK),
			)
			.unwrap();
		driver.pixel(Point::new(239, 239), Rgb888::CYAN).unwrap();

		assert_eq!(driver.framebuffer().pixel(10, 10), Some(Rgb888::YELLOW));
		assert_eq!(driver.framebuffer().pixel(30, 30), Some(Rgb888::new(200, 0, 0)));
		assert_eq!(driver.framebuffer().pixel(120, 70), Some(Rgb888::WHITE));
		assert_eq!(driver.framebuffer().pixel(170, 170), Some(Rgb888::new(128, 0, 128)));
		assert_eq!(driver.framebuffer().pixel(239, 239), Some(Rgb888::CYAN));
		assert_in_sync(&driver);
	}

	#[test]
	fn zero_radius_circle_is_a_pixel() {
		let mut driver = driver();
		driver
			.circle(Point::new(5, 5), 0, None, Some(Rgb888::RED), 1)
			.unwrap();
		assert_eq!(driver.transport().window(), Region::new(5, 5, 5, 5));
		assert_eq!(driver.framebuffer().pixel(5, 5), Some(Rgb888::RED));
	}

	#[test]
	fn shapes_without_colour_do_nothing() {
		let mut driver = driver();
		driver
			.rectangle(Point::new(0, 0), Size::new(10, 10), None, None, 1)
			.unwrap();
		driver
			.rectangle(Point::new(0, 0), Size::new(10, 10), Some(Rgb888::RED), None, 0)
			.unwrap();
		driver
			.line(Point::new(0, 0), Point::new(10, 10), Rgb888::RED, 0)
			.unwrap();
		assert!(driver.transport().events().is_empty());
	}

	#[test]
	fn arc_only_touches_its_stroke() {
		let mut driver = driver();
		driver.fill_screen(Rgb888::BLUE).unwrap();
		driver
			.arc(Point::new(120, 120), 101, 0.0, 180.0, Rgb888::RED, 3)
			.unwrap();
		assert_eq!(driver.framebuffer().pixel(120, 120), Some(Rgb888::BLUE));
		assert_eq!(driver.framebuffer().pixel(120, 170), Some(Rgb888::RED));
		assert_eq!(driver.framebuffer().pixel(120, 70), Some(Rgb888::BLUE));
		assert_in_sync(&driver);
	}

	#[test]
	fn arc_wraps_clockwise_past_three_o_clock() {
		let mut driver = driver();
		driver.fill_screen(Rgb888::BLUE).unwrap();
		driver
			.arc(Point::new(120, 120), 101, 270.0, 45.0, Rgb888::RED, 3)
			.unwrap();
		assert_eq!(driver.framebuffer().pixel(170, 120), Some(Rgb888::RED));
		assert_eq!(driver.framebuffer().pixel(155, 85), Some(Rgb888::RED));
		assert_eq!(driver.framebuffer().pixel(70, 120), Some(Rgb888::BLUE));
		assert_eq!(driver.framebuffer().pixel(120, 170), Some(Rgb888::BLUE));
		assert_in_sync(&driver);
	}

	#[test]
	fn sweep_is_clockwise_and_capped() {
		assert_eq!(clockwise_sweep(45.0, 270.0), 225.0);
		assert_eq!(clockwise_sweep(270.0, 45.0), 135.0);
		assert_eq!(clockwise_sweep(0.0, 360.0), 360.0);
		assert_eq!(clockwise_sweep(10.0, 800.0), 360.0);
		assert_eq!(clockwise_sweep(90.0, 90.0), 0.0);
		assert_eq!(clockwise_sweep(0.0, -90.0), 270.0);
	}

	#[test]
	fn empty_arc_draws_nothing() {
		let mut driver = driver();
		driver
			.arc(Point::new(120, 120), 101, 90.0, 90.0, Rgb888::RED, 3)
			.unwrap();
		assert!(driver.transport().events().is_empty());
	}

	#[test]
	fn draw_target_pushes_touched_box() {
		let mut driver = driver();
		driver
			.draw_iter([
				Pixel(Point::new(3, 4), Rgb888::RED),
				Pixel(Point::new(7, 9), Rgb888::GREEN),
				Pixel(Point::new(-1, 400), Rgb888::BLUE),
			])
			.unwrap();
		assert_eq!(driver.transport().window(), Region::new(3, 4, 7, 9));
		assert_eq!(driver.framebuffer().pixel(7, 9), Some(Rgb888::GREEN));
		assert_in_sync(&driver);
		assert_eq!(
			driver.clip_stats(),
			ClipStats {
				requests: 1,
				clipped: 1,
				empty: 0,
			}
		);

		driver.transport_mut().clear_events();
		driver
			.draw_iter([Pixel(Point::new(-5, -5), Rgb888::BLUE)])
			.unwrap();
		assert!(driver.transport().events().is_empty());
		assert_eq!(driver.clip_stats().empty, 1);

		driver.clear(Rgb888::WHITE).unwrap();
		assert_eq!(driver.framebuffer().pixel(3, 4), Some(Rgb888::WHITE));
		assert_in_sync(&driver);
	}

	#[test]
	fn transport_failure_keeps_framebuffer_and_sync_recovers() {
		let mut driver = driver();
		driver.transport_mut().fail_after(2);
		let err = driver
			.fill_rect(Point::new(0, 0), Size::new(10, 10), Rgb888::RED)
			.unwrap_err();
		assert!(matches!(err, Error::Transport(_)));
		assert_eq!(driver.framebuffer().pixel(0, 0), Some(Rgb888::RED));
		assert_eq!(driver.transport().ram_pixel(0, 0), Some(0));

		driver.transport_mut().fail_after(usize::MAX);
		driver.sync().unwrap();
		assert_in_sync(&driver);
	}

	#[test]
	fn display_and_power_toggles() {
		let mut driver = driver();
		driver.display_off().unwrap();
		assert!(!driver.transport().is_display_on());
		driver.display_on().unwrap();
		assert!(driver.transport().is_display_on());
		driver.sleep().unwrap();
		assert!(!driver.transport().is_awake());
		driver.wake().unwrap();
		assert!(driver.transport().is_awake());
		driver.backlight(false).unwrap();
	}
}
