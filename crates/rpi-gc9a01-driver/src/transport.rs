use std::time::Duration;

use crate::error::Result;

#[doc(inline)]
pub use simulator::*;

#[cfg(target_os = "linux")]
#[doc(inline)]
pub use spi::*;

mod simulator;
#[cfg(target_os = "linux")]
mod spi;

/// Logic level of an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
	Low,
	High,
}

impl From<bool> for Level {
	fn from(high: bool) -> Self {
		if high { Self::High } else { Self::Low }
	}
}

/// The 4-wire SPI link to the panel.
///
/// Implementations own the data/command line and chip select: a command byte is sent with
/// D/C low, data bytes with D/C high, each framed by chip select if the wiring needs it. All
/// calls are blocking.
pub trait Transport {
	/// Send one command byte.
	fn write_command(&mut self, command: u8) -> Result<()>;

	/// Send data bytes following a command.
	fn write_data(&mut self, bytes: &[u8]) -> Result<()>;

	/// Drive the panel's reset line.
	fn set_reset(&mut self, level: Level) -> Result<()>;

	/// Block for a panel timing delay.
	fn delay(&mut self, duration: Duration);
}

impl<T: Transport + ?Sized> Transport for &mut T {
	fn write_command(&mut self, command: u8) -> Result<()> {
		(**self).write_command(command)
	}

	fn write_data(&mut self, bytes: &[u8]) -> Result<()> {
		(**self).write_data(bytes)
	}

	fn set_reset(&mut self, level: Level) -> Result<()> {
		(**self).set_reset(level)
	}

	fn delay(&mut self, duration: Duration) {
		(**self).delay(duration)
	}
}

/// An optional digital output, like the backlight enable.
pub trait OutputLine {
	fn set_level(&mut self, level: Level) -> Result<()>;
}
