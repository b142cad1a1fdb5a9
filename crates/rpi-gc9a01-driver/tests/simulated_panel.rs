use embedded_graphics::{
	Drawable,
	geometry::{Point, Size},
	pixelcolor::{Rgb888, RgbColor},
	primitives::{Circle, Primitive, PrimitiveStyle},
};
use rpi_gc9a01_driver::{
	Driver, Error, Event, LineProbe, Level, PanelConfig, PanelSimulator, ProtocolState, Region,
	RgbImage, Rgba8888, RgbaImage, blend_channel, encode_rgb, over, rgb565,
};

fn panel() -> Driver<PanelSimulator> {
	let mut driver = Driver::new(
		PanelSimulator::new(Size::new(240, 240)),
		None,
		PanelConfig::default(),
	);
	driver.init().unwrap();
	driver
}

fn assert_in_sync(driver: &Driver<PanelSimulator>) {
	let full = Region::full(driver.size()).unwrap();
	let expected = encode_rgb(driver.framebuffer().image());
	let actual = driver.transport().ram_stream(full);
	let mismatch = (0..expected.len())
		.step_by(2)
		.find(|&i| expected[i..i + 2] != actual[i..i + 2]);
	if let Some(first) = mismatch {
		let pixel = first / 2;
		panic!(
			"panel differs from framebuffer at ({}, {})",
			pixel % 240,
			pixel / 240
		);
	}
}

#[test]
fn translucent_circle_over_rectangle() {
	let mut lcd = panel();
	lcd.fill_screen(Rgb888::new(0, 40, 40)).unwrap();
	lcd.fill_rect(Point::new(20, 20), Size::new(80, 40), Rgb888::new(255, 0, 0))
		.unwrap();

	let mut overlay = RgbaImage::filled(Size::new(100, 100), Rgba8888::TRANSPARENT);
	let Ok(()) = Circle::with_center(Point::new(50, 50), 81)
		.into_styled(PrimitiveStyle::with_fill(Rgba8888::new(0, 255, 0, 128)))
		.draw(&mut overlay);
	lcd.draw_image_rgba_composited(70, 40, &overlay).unwrap();

	// inside the rectangle and the circle: half red, half green
	assert_eq!(lcd.framebuffer().pixel(97, 58), Some(Rgb888::new(127, 128, 0)));
	assert_eq!(
		lcd.framebuffer().pixel(97, 58),
		Some(over(Rgba8888::new(0, 255, 0, 128), Rgb888::new(255, 0, 0)))
	);
	assert_eq!(blend_channel(255, 40, 128), 148);
	// circle only, over the background
	assert_eq!(lcd.framebuffer().pixel(120, 90), Some(Rgb888::new(0, 148, 20)));
	// overlay corner is transparent
	assert_eq!(lcd.framebuffer().pixel(70, 139), Some(Rgb888::new(0, 40, 40)));
	// rectangle only
	assert_eq!(lcd.framebuffer().pixel(21, 21), Some(Rgb888::new(255, 0, 0)));

	assert_eq!(
		lcd.transport().ram_pixel(97, 58),
		Some(rgb565(Rgb888::new(127, 128, 0)))
	);
	assert_in_sync(&lcd);
}

#[test]
fn only_the_changed_box_is_sent() {
	let mut lcd = panel();
	lcd.transport_mut().clear_events();
	lcd.draw_image_rgb(100, 100, &RgbImage::filled(Size::new(3, 2), Rgb888::WHITE))
		.unwrap();

	let sent: usize = lcd
		.transport()
		.events()
		.iter()
		.skip_while(|event| **event != Event::Command(0x2C))
		.map(|event| match event {
			Event::Data(bytes) => bytes.len(),
			_ => 0,
		})
		.sum();
	assert_eq!(sent, 3 * 2 * 2);
	assert_eq!(lcd.transport().window(), Region::new(100, 100, 102, 101));
}

#[test]
fn fill_is_idempotent() {
	let mut lcd = panel();
	lcd.fill_screen(Rgb888::new(12, 34, 56)).unwrap();
	let once = lcd.framebuffer().image().clone();
	let ram = lcd.transport().ram_stream(Region::full(lcd.size()).unwrap());

	lcd.fill_screen(Rgb888::new(12, 34, 56)).unwrap();
	assert_eq!(lcd.framebuffer().image(), &once);
	assert_eq!(
		lcd.transport().ram_stream(Region::full(lcd.size()).unwrap()),
		ram
	);
}

#[test]
fn clipped_away_draws_are_silent() {
	let mut lcd = panel();
	lcd.transport_mut().clear_events();
	let before = lcd.framebuffer().image().clone();

	lcd.fill_rect(Point::new(-20, 10), Size::new(20, 20), Rgb888::RED)
		.unwrap();
	lcd.draw_image_rgba_composited(
		240,
		0,
		&RgbaImage::filled(Size::new(5, 5), Rgba8888::opaque(Rgb888::RED)),
	)
	.unwrap();
	lcd.circle(Point::new(-100, -100), 10, None, Some(Rgb888::RED), 1)
		.unwrap();

	assert!(lcd.transport().events().is_empty());
	assert_eq!(lcd.framebuffer().image(), &before);
	assert_eq!(lcd.clip_stats().empty, 3);
}

#[test]
fn raw_pixels_bypass_the_framebuffer_until_sync() {
	let mut lcd = panel();
	lcd.fill_screen(Rgb888::BLUE).unwrap();
	let white = rgb565(Rgb888::WHITE).to_be_bytes().repeat(16);
	lcd.draw_image_rgb565(10, 10, 4, 4, &white).unwrap();

	assert_eq!(lcd.transport().ram_pixel(12, 12), Some(0xFFFF));
	assert_eq!(lcd.framebuffer().pixel(12, 12), Some(Rgb888::BLUE));

	// translucent draws blend against the framebuffer, not what the panel shows
	lcd.draw_image_rgba_composited(
		12,
		12,
		&RgbaImage::filled(Size::new(1, 1), Rgba8888::new(255, 0, 0, 0)),
	)
	.unwrap();
	assert_eq!(lcd.transport().ram_pixel(12, 12), Some(rgb565(Rgb888::BLUE)));

	lcd.sync().unwrap();
	assert_in_sync(&lcd);
}

#[test]
fn sync_recovers_from_a_failed_transfer() {
	let mut lcd = panel();
	lcd.transport_mut().fail_after(4);
	let err = lcd
		.draw_image_rgb(0, 0, &RgbImage::filled(Size::new(240, 240), Rgb888::GREEN))
		.unwrap_err();
	assert!(matches!(err, Error::Transport(_)));
	assert_eq!(lcd.framebuffer().pixel(239, 239), Some(Rgb888::GREEN));

	lcd.transport_mut().fail_after(usize::MAX);
	lcd.sync().unwrap();
	assert_in_sync(&lcd);
}

#[test]
fn nothing_draws_before_init() {
	let probe = LineProbe::default();
	let mut lcd = Driver::new(
		PanelSimulator::new(Size::new(240, 240)),
		Some(Box::new(probe.clone())),
		PanelConfig::default(),
	);
	assert_eq!(lcd.protocol().state(), ProtocolState::Uninitialized);
	assert!(matches!(
		lcd.pixel(Point::new(0, 0), Rgb888::WHITE),
		Err(Error::NotReady { .. })
	));
	assert!(matches!(lcd.sync(), Err(Error::NotReady { .. })));
	assert!(lcd.transport().events().is_empty());

	lcd.init().unwrap();
	assert_eq!(lcd.protocol().state(), ProtocolState::Ready);
	assert_eq!(probe.level(), Some(Level::High));
	assert!(lcd.transport().is_display_on());
	assert_in_sync(&lcd);
}

#[test]
fn embedded_graphics_draws_through_the_driver() {
	let mut lcd = panel();
	Circle::with_center(Point::new(120, 120), 21)
		.into_styled(PrimitiveStyle::with_fill(Rgb888::MAGENTA))
		.draw(&mut lcd)
		.unwrap();
	assert_eq!(lcd.framebuffer().pixel(120, 120), Some(Rgb888::MAGENTA));
	assert_in_sync(&lcd);
}

#[test]
fn unclipped_framebuffer_access_is_an_error() {
	let lcd = panel();
	let swapped = Region {
		x0: 5,
		y0: 0,
		x1: 2,
		y1: 0,
	};
	assert!(matches!(
		lcd.framebuffer().get_region(swapped),
		Err(Error::OutOfBounds { .. })
	));
}
