//! A Raspberry Pi driver for GC9A01-based round 240x240 TFT displays.
//!
//! The GC9A01 is write-only over SPI: nothing can be read back from the panel. This crate keeps
//! a full-colour [`Framebuffer`] mirror of the screen, so it can alpha-blend translucent images
//! and shapes over whatever is currently showing, then sends only the rectangle that changed.
//!
//! It implements both a simple drawing interface ([`Driver::fill_rect`], [`Driver::arc`],
//! [`Driver::draw_image_rgba_composited`]...) and [`embedded_graphics`]' traits.
//!
//! On Linux, [`Driver::open`] connects to a panel on the Pi's SPI header through [`rppal`].
//! Everywhere, the [`PanelSimulator`] transport runs the same driver against an in-memory
//! panel.
//!
//! # Example
//!
//! ```no_run
//! # use embedded_graphics::{geometry::{Point, Size}, pixelcolor::Rgb888};
//! # use rpi_gc9a01_driver::{Driver, PanelConfig, Result, RgbaImage, Rgba8888};
//! # #[cfg(target_os = "linux")]
//! # fn main() -> Result<()> {
//! let mut lcd = Driver::open(&Default::default(), PanelConfig::default())?;
//! lcd.init()?;
//!
//! lcd.fill_screen(Rgb888::new(0, 40, 40))?;
//! lcd.fill_rect(Point::new(20, 20), Size::new(80, 40), Rgb888::new(255, 0, 0))?;
//!
//! let veil = RgbaImage::filled(Size::new(100, 100), Rgba8888::new(0, 255, 0, 128));
//! lcd.draw_image_rgba_composited(70, 40, &veil)?;
//! # Ok(()) }
//! # #[cfg(not(target_os = "linux"))]
//! # fn main() {}
//! ```
//!
//! [`rppal`]: https://docs.rs/rppal

#[doc(inline)]
pub use color::*;

#[doc(inline)]
pub use commands::Command;

#[doc(inline)]
pub use compositor::{blend_channel, composite, over};

#[doc(inline)]
pub use driver::Driver;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use framebuffer::Framebuffer;

#[doc(inline)]
pub use image::*;

#[doc(inline)]
pub use madctl::*;

#[doc(inline)]
pub use protocol::*;

#[doc(inline)]
pub use region::{ClipStats, Region};

#[doc(inline)]
pub use transport::*;

mod color;
mod commands;
mod compositor;
mod driver;
mod error;
mod framebuffer;
mod image;
mod madctl;
mod protocol;
mod region;
mod transport;
