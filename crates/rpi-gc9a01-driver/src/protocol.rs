use std::time::Duration;

use embedded_graphics::geometry::Size;
use tracing::{debug, instrument, trace};

use crate::{
	commands::{COLMOD_16BPP, Command, VENDOR_PREAMBLE, VENDOR_TUNING},
	error::{Error, Result},
	madctl::MemoryAccessControl,
	region::{ClipStats, Region},
	transport::{Level, OutputLine, Transport},
};

/// Reset pulse width, and the gap before it.
pub const RESET_PULSE: Duration = Duration::from_millis(10);

/// Time to wait after releasing reset before sending commands.
pub const RESET_SETTLE: Duration = Duration::from_millis(120);

/// Time to wait after SLPOUT.
pub const WAKE_DELAY: Duration = Duration::from_millis(120);

/// Time to wait after SLPIN.
pub const SLEEP_DELAY: Duration = Duration::from_millis(5);

/// Time to wait after DISPON/DISPOFF.
pub const DISPLAY_DELAY: Duration = Duration::from_millis(10);

/// Fixed properties of the attached panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
	/// Width in pixels.
	///
	/// Defaults to 240.
	pub width: u16,

	/// Height in pixels.
	///
	/// Defaults to 240.
	pub height: u16,

	/// Orientation and colour order, sent once during init.
	///
	/// Defaults to BGR, normal orientation (`0x08`).
	pub madctl: MemoryAccessControl,

	/// Largest single SPI data write, in bytes.
	///
	/// Pixel streams are split into chunks of at most this size. Defaults to 4096, which fits
	/// the stock spidev buffer.
	pub chunk_size: usize,
}

impl Default for PanelConfig {
	fn default() -> Self {
		Self {
			width: 240,
			height: 240,
			madctl: MemoryAccessControl::default(),
			chunk_size: 4096,
		}
	}
}

impl PanelConfig {
	pub fn size(&self) -> Size {
		Size::new(self.width.into(), self.height.into())
	}
}

/// Where the panel is in its power-up sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolState {
	Uninitialized,
	Resetting,
	Initializing,
	Ready,
}

/// Command-level state machine for one physical panel.
///
/// Owns the transport and the optional backlight line. Everything but reset, init and the
/// backlight requires the [`Ready`](ProtocolState::Ready) state.
pub struct PanelProtocol<T> {
	transport: T,
	backlight: Option<Box<dyn OutputLine>>,
	config: PanelConfig,
	state: ProtocolState,
	window: Option<Region>,
	armed: Option<usize>,
	awake: bool,
	clips: ClipStats,
}

impl<T: std::fmt::Debug> std::fmt::Debug for PanelProtocol<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PanelProtocol")
			.field("transport", &self.transport)
			.field("backlight", &self.backlight.is_some())
			.field("config", &self.config)
			.field("state", &self.state)
			.field("window", &self.window)
			.field("armed", &self.armed)
			.field("awake", &self.awake)
			.finish()
	}
}

impl<T: Transport> PanelProtocol<T> {
	pub fn new(transport: T, backlight: Option<Box<dyn OutputLine>>, config: PanelConfig) -> Self {
		Self {
			transport,
			backlight,
			config,
			state: ProtocolState::Uninitialized,
			window: None,
			armed: None,
			awake: false,
			clips: ClipStats::default(),
		}
	}

	pub fn state(&self) -> ProtocolState {
		self.state
	}

	pub fn config(&self) -> &PanelConfig {
		&self.config
	}

	/// The last window sent to the panel.
	pub fn window(&self) -> Option<Region> {
		self.window
	}

	/// How many window requests had to be clamped.
	pub fn clip_stats(&self) -> ClipStats {
		self.clips
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	pub fn transport_mut(&mut self) -> &mut T {
		&mut self.transport
	}

	pub(crate) fn ensure_ready(&self) -> Result<()> {
		if self.state == ProtocolState::Ready {
			Ok(())
		} else {
			Err(Error::NotReady { state: self.state })
		}
	}

	/// Send a command.
	#[instrument(level = "trace", skip(self))]
	pub fn command(&mut self, command: Command) -> Result<()> {
		self.armed = None;
		self.transport.write_command(command as u8)
	}

	/// Send a command followed by its parameter bytes.
	#[instrument(level = "trace", skip(self))]
	fn command_with(&mut self, command: u8, params: &[u8]) -> Result<()> {
		self.armed = None;
		self.transport.write_command(command)?;
		if !params.is_empty() {
			self.transport.write_data(params)?;
		}
		Ok(())
	}

	/// Hardware reset.
	///
	/// Pulses the reset line low, then waits for the controller to come back before any
	/// command may be sent.
	#[instrument(level = "debug", skip(self))]
	pub fn reset(&mut self) -> Result<()> {
		self.state = ProtocolState::Resetting;
		self.window = None;
		self.armed = None;
		self.awake = false;

		self.transport.set_reset(Level::High)?;
		self.transport.delay(RESET_PULSE);
		self.transport.set_reset(Level::Low)?;
		self.transport.delay(RESET_PULSE);
		self.transport.set_reset(Level::High)?;
		self.transport.delay(RESET_SETTLE);
		Ok(())
	}

	/// Perform the init sequence, resetting first if that hasn't been done.
	///
	/// Ends with the display on, awake, and the backlight (if any) lit.
	#[instrument(level = "debug", skip(self))]
	pub fn init_display(&mut self) -> Result<()> {
		if self.state != ProtocolState::Resetting {
			self.reset()?;
		}

		self.state = ProtocolState::Initializing;

		for (register, params) in VENDOR_PREAMBLE {
			self.command_with(*register, params)?;
		}

		let madctl: u8 = self.config.madctl.into();
		self.command_with(Command::MemoryAccessControl as u8, &[madctl])?;
		self.command_with(Command::PixelFormat as u8, &[COLMOD_16BPP])?;

		for (register, params) in VENDOR_TUNING {
			self.command_with(*register, params)?;
		}

		self.command(Command::TearingEffectOn)?;
		self.command(Command::InversionOn)?;

		self.command(Command::WakeUp)?;
		self.transport.delay(WAKE_DELAY);
		self.awake = true;

		self.command(Command::DisplayOn)?;
		self.transport.delay(Duration::from_millis(20));

		self.backlight(true)?;
		self.state = ProtocolState::Ready;
		debug!(config = ?self.config, "GC9A01 initialised");
		Ok(())
	}

	/// Set the area of the screen the next memory write goes to.
	///
	/// Corners are inclusive. They're silently clamped into the panel and put in order; this
	/// never fails on range.
	#[instrument(level = "trace", skip(self))]
	pub fn set_window(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<Region> {
		self.ensure_ready()?;

		let (region, adjusted) = Region::clamp_corners(x0, y0, x1, y1, self.config.size());
		self.clips.record_clamp(adjusted);
		if adjusted {
			debug!(?region, "window clamped to the panel");
		}

		let [x0, x1, y0, y1] = [region.x0, region.x1, region.y0, region.y1].map(u16::to_be_bytes);
		self.command_with(Command::ColumnAddressSet as u8, &[x0, x1].concat())?;
		self.command_with(Command::RowAddressSet as u8, &[y0, y1].concat())?;
		self.window = Some(region);
		Ok(region)
	}

	/// Start a memory write into the current window.
	///
	/// The very next thing sent must be [`write_pixels`](Self::write_pixels) with exactly the
	/// window's worth of pixels.
	#[instrument(level = "trace", skip(self))]
	pub fn write_ram_prepare(&mut self) -> Result<()> {
		self.ensure_ready()?;
		let expected = self.window.map(|w| w.pixel_count() * 2);
		self.command(Command::MemoryWrite)?;
		self.armed = expected;
		Ok(())
	}

	/// Stream pixel data for the armed memory write.
	///
	/// The length is checked against the window before anything is sent: a mismatch would
	/// leave the panel's write cursor misaligned.
	#[instrument(level = "trace", skip(self, bytes), fields(length = bytes.len()))]
	pub fn write_pixels(&mut self, bytes: &[u8]) -> Result<()> {
		let expected = self.armed.take().unwrap_or(0);
		if bytes.len() != expected || expected == 0 {
			return Err(Error::WindowMismatch {
				expected,
				actual: bytes.len(),
			});
		}

		for chunk in bytes.chunks(self.config.chunk_size.max(2)) {
			trace!(length = chunk.len(), "streaming pixels");
			self.transport.write_data(chunk)?;
		}

		Ok(())
	}

	/// Turn the display output on, without touching its memory.
	#[instrument(level = "trace", skip(self))]
	pub fn display_on(&mut self) -> Result<()> {
		self.ensure_ready()?;
		self.command(Command::DisplayOn)?;
		self.transport.delay(DISPLAY_DELAY);
		Ok(())
	}

	/// Turn the display output off, without touching its memory.
	#[instrument(level = "trace", skip(self))]
	pub fn display_off(&mut self) -> Result<()> {
		self.ensure_ready()?;
		self.command(Command::DisplayOff)?;
		self.transport.delay(DISPLAY_DELAY);
		Ok(())
	}

	/// Turn the backlight on or off. Does nothing if there's no backlight line.
	#[instrument(level = "trace", skip(self))]
	pub fn backlight(&mut self, on: bool) -> Result<()> {
		match self.backlight.as_mut() {
			Some(line) => line.set_level(on.into()),
			None => Ok(()),
		}
	}

	pub fn has_backlight(&self) -> bool {
		self.backlight.is_some()
	}

	/// Go to sleep.
	#[instrument(level = "trace", skip(self))]
	pub fn sleep(&mut self) -> Result<()> {
		self.ensure_ready()?;
		if self.awake {
			self.command(Command::Sleep)?;
			self.transport.delay(SLEEP_DELAY);
			self.awake = false;
		}

		Ok(())
	}

	/// Wake up from sleep.
	#[instrument(level = "trace", skip(self))]
	pub fn wake(&mut self) -> Result<()> {
		self.ensure_ready()?;
		if !self.awake {
			self.command(Command::WakeUp)?;
			self.transport.delay(WAKE_DELAY);
			self.awake = true;
		}

		Ok(())
	}

	pub fn is_awake(&self) -> bool {
		self.awake
	}
}
