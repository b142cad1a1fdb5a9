use std::{thread::sleep, time::Duration};

use rppal::{
	gpio::{self, Gpio, OutputPin},
	spi::{Bus, Mode, SlaveSelect, Spi},
};
use tracing::{instrument, trace};

use super::{Level, OutputLine, Transport};
use crate::{driver::Driver, error::Result, protocol::PanelConfig};

/// Raspberry Pi SPI + GPIO link to the panel.
#[derive(Debug)]
pub struct SpiTransport {
	spi: Spi,
	dc: OutputPin,
	reset: OutputPin,
	cs: Option<OutputPin>,
}

/// Arguments to create a new LCD driver.
///
/// This is a struct to hold the arguments for the LCD driver: SPI port and frequency, GPIO pins.
///
/// It implements [`Default`] with a common wiring for GC9A01 breakout boards on the Pi header.
#[derive(Debug, Clone)]
pub struct DriverArgs {
	/// SPI port to use.
	///
	/// Defaults to 0.
	pub spi: u8,

	/// SPI CE number the hardware chip select is driven on.
	///
	/// Defaults to 0.
	pub ce: u8,

	/// SPI frequency in Hz.
	///
	/// Defaults to 40 MHz.
	pub frequency: u32,

	/// GPIO pin number for the display's data/command pin.
	///
	/// Defaults to 25.
	pub dc: u8,

	/// GPIO pin number for the display's reset pin.
	///
	/// Defaults to 27.
	pub reset: u8,

	/// GPIO pin number for a manually-driven chip select, if the panel's CS isn't wired to a
	/// hardware CE line.
	///
	/// Defaults to none.
	pub cs: Option<u8>,

	/// GPIO pin number for the display's backlight control pin, if it's wired.
	///
	/// Defaults to 18.
	pub backlight: Option<u8>,
}

impl Default for DriverArgs {
	fn default() -> Self {
		Self {
			spi: 0,
			ce: 0,
			frequency: 40_000_000,
			dc: 25,
			reset: 27,
			cs: None,
			backlight: Some(18),
		}
	}
}

impl SpiTransport {
	/// Connect to the panel's I/O.
	///
	/// This sets up the GPIO and SPI pins but doesn't talk to the display. Returns the
	/// backlight line separately, as it isn't part of the command link.
	#[instrument(level = "debug")]
	pub fn new(args: &DriverArgs) -> Result<(Self, Option<OutputPin>)> {
		let gpio = Gpio::new()?;
		let dc = gpio.get(args.dc)?.into_output_low();
		let reset = gpio.get(args.reset)?.into_output_high();
		let cs = args
			.cs
			.map(|pin| gpio.get(pin).map(|pin| pin.into_output_high()))
			.transpose()?;
		let backlight = args
			.backlight
			.map(|pin| gpio.get(pin).map(|pin| pin.into_output_low()))
			.transpose()?;

		let spi = Spi::new(
			match args.spi {
				0 => Bus::Spi0,
				1 => Bus::Spi1,
				2 => Bus::Spi2,
				3 => Bus::Spi3,
				4 => Bus::Spi4,
				5 => Bus::Spi5,
				6 => Bus::Spi6,
				_ => unreachable!("SPI bus number out of range"),
			},
			match args.ce {
				0 => SlaveSelect::Ss0,
				1 => SlaveSelect::Ss1,
				2 => SlaveSelect::Ss2,
				_ => unreachable!("SPI CE number out of range"),
			},
			args.frequency,
			Mode::Mode0,
		)?;

		Ok((Self { spi, dc, reset, cs }, backlight))
	}

	fn select(&mut self, on: bool) {
		if let Some(cs) = self.cs.as_mut() {
			cs.write(if on { gpio::Level::Low } else { gpio::Level::High });
		}
	}

	fn framed(&mut self, dc: gpio::Level, bytes: &[u8]) -> Result<()> {
		self.select(true);
		self.dc.write(dc);
		let written = self.spi.write(bytes);
		self.select(false);
		written?;
		Ok(())
	}
}

impl Transport for SpiTransport {
	#[instrument(level = "trace", skip(self))]
	fn write_command(&mut self, command: u8) -> Result<()> {
		trace!(byte=%format!("{command:02X?}"), "writing command byte to SPI");
		self.framed(gpio::Level::Low, &[command])
	}

	#[instrument(level = "trace", skip(self, bytes))]
	fn write_data(&mut self, bytes: &[u8]) -> Result<()> {
		trace!(length = bytes.len(), "writing some bytes to SPI");
		self.framed(gpio::Level::High, bytes)
	}

	fn set_reset(&mut self, level: Level) -> Result<()> {
		self.reset.write(level.into());
		Ok(())
	}

	fn delay(&mut self, duration: Duration) {
		sleep(duration);
	}
}

impl OutputLine for OutputPin {
	fn set_level(&mut self, level: Level) -> Result<()> {
		self.write(level.into());
		Ok(())
	}
}

impl From<Level> for gpio::Level {
	fn from(level: Level) -> Self {
		match level {
			Level::Low => gpio::Level::Low,
			Level::High => gpio::Level::High,
		}
	}
}

impl Driver<SpiTransport> {
	/// Connect to a panel wired to the Pi's header.
	///
	/// Doesn't touch the display; call [`init()`](Driver::init) next.
	pub fn open(args: &DriverArgs, config: PanelConfig) -> Result<Self> {
		let (transport, backlight) = SpiTransport::new(args)?;
		Ok(Self::new(
			transport,
			backlight.map(|pin| Box::new(pin) as Box<dyn OutputLine>),
			config,
		))
	}
}
