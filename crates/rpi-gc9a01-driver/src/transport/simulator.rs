use std::{cell::Cell, rc::Rc, time::Duration};

use embedded_graphics::geometry::Size;
use tracing::trace;

use super::{Level, OutputLine, Transport};
use crate::{
	commands::Command,
	error::{Error, Result},
	region::Region,
};

/// Something that happened on the simulated link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	Command(u8),
	Data(Vec<u8>),
	Reset(Level),
	Delay(Duration),
}

/// An in-memory GC9A01.
///
/// Records everything sent over the link, and interprets enough of it (CASET, RASET, RAMWR,
/// DISPON/DISPOFF, SLPIN/SLPOUT) to keep a copy of the panel's graphics memory. Use it to
/// run the driver headless, or to check what actually reached the "hardware".
///
/// The memory is addressed without regard to MADCTL, as in the default orientation.
#[derive(Debug, Clone)]
pub struct PanelSimulator {
	size: Size,
	ram: Vec<u16>,
	events: Vec<Event>,
	command: Option<u8>,
	params: Vec<u8>,
	columns: (u16, u16),
	rows: (u16, u16),
	cursor: (u16, u16),
	high_byte: Option<u8>,
	display_on: bool,
	awake: bool,
	writes_before_failure: Option<usize>,
}

impl PanelSimulator {
	pub fn new(size: Size) -> Self {
		let max_x = size.width.saturating_sub(1).min(u16::MAX.into()) as u16;
		let max_y = size.height.saturating_sub(1).min(u16::MAX.into()) as u16;
		Self {
			size,
			ram: vec![0; size.width as usize * size.height as usize],
			events: Vec::new(),
			command: None,
			params: Vec::new(),
			columns: (0, max_x),
			rows: (0, max_y),
			cursor: (0, 0),
			high_byte: None,
			display_on: false,
			awake: false,
			writes_before_failure: None,
		}
	}

	/// Everything recorded since creation or the last [`clear_events`](Self::clear_events).
	pub fn events(&self) -> &[Event] {
		&self.events
	}

	pub fn clear_events(&mut self) {
		self.events.clear();
	}

	/// Just the command bytes, in order.
	pub fn commands(&self) -> Vec<u8> {
		self.events
			.iter()
			.filter_map(|event| match event {
				Event::Command(byte) => Some(*byte),
				_ => None,
			})
			.collect()
	}

	/// Total data bytes sent.
	pub fn data_len(&self) -> usize {
		self.events
			.iter()
			.map(|event| match event {
				Event::Data(bytes) => bytes.len(),
				_ => 0,
			})
			.sum()
	}

	/// Make the link fail after `writes` more successful command/data writes.
	pub fn fail_after(&mut self, writes: usize) {
		self.writes_before_failure = Some(writes);
	}

	/// The RGB565 value the panel holds at a pixel.
	pub fn ram_pixel(&self, x: u16, y: u16) -> Option<u16> {
		(u32::from(x) < self.size.width && u32::from(y) < self.size.height)
			.then(|| self.ram[usize::from(y) * self.size.width as usize + usize::from(x)])
	}

	/// The panel memory of a region, in wire format.
	pub fn ram_stream(&self, region: Region) -> Vec<u8> {
		let mut stream = Vec::with_capacity(region.pixel_count() * 2);
		for y in region.y0..=region.y1 {
			for x in region.x0..=region.x1 {
				stream.extend_from_slice(&self.ram_pixel(x, y).unwrap_or_default().to_be_bytes());
			}
		}
		stream
	}

	/// The last column and row windows set, as a region.
	pub fn window(&self) -> Region {
		Region::new(self.columns.0, self.rows.0, self.columns.1, self.rows.1)
	}

	pub fn is_display_on(&self) -> bool {
		self.display_on
	}

	pub fn is_awake(&self) -> bool {
		self.awake
	}

	fn tick(&mut self) -> Result<()> {
		match self.writes_before_failure {
			Some(0) => Err(Error::transport(std::io::Error::new(
				std::io::ErrorKind::BrokenPipe,
				"simulated link failure",
			))),
			Some(ref mut n) => {
				*n -= 1;
				Ok(())
			}
			None => Ok(()),
		}
	}

	fn end_command(&mut self) {
		let params = std::mem::take(&mut self.params);
		let range = |p: &[u8]| {
			(
				u16::from_be_bytes([p[0], p[1]]),
				u16::from_be_bytes([p[2], p[3]]),
			)
		};

		match self.command.take() {
			Some(c) if c == Command::ColumnAddressSet as u8 && params.len() >= 4 => {
				self.columns = range(&params);
			}
			Some(c) if c == Command::RowAddressSet as u8 && params.len() >= 4 => {
				self.rows = range(&params);
			}
			_ => {}
		}
	}

	fn store(&mut self, byte: u8) {
		let Some(high) = self.high_byte.take() else {
			self.high_byte = Some(byte);
			return;
		};

		let (x, y) = self.cursor;
		if u32::from(x) < self.size.width && u32::from(y) < self.size.height {
			self.ram[usize::from(y) * self.size.width as usize + usize::from(x)] =
				u16::from_be_bytes([high, byte]);
		}

		self.cursor = if x >= self.columns.1 {
			if y >= self.rows.1 {
				(self.columns.0, self.rows.0)
			} else {
				(self.columns.0, y + 1)
			}
		} else {
			(x + 1, y)
		};
	}
}

impl Transport for PanelSimulator {
	fn write_command(&mut self, command: u8) -> Result<()> {
		self.tick()?;
		self.end_command();
		self.events.push(Event::Command(command));
		self.high_byte = None;

		match command {
			c if c == Command::MemoryWrite as u8 => {
				self.cursor = (self.columns.0, self.rows.0);
			}
			c if c == Command::DisplayOn as u8 => self.display_on = true,
			c if c == Command::DisplayOff as u8 => self.display_on = false,
			c if c == Command::WakeUp as u8 => self.awake = true,
			c if c == Command::Sleep as u8 => self.awake = false,
			_ => {}
		}

		self.command = Some(command);
		Ok(())
	}

	fn write_data(&mut self, bytes: &[u8]) -> Result<()> {
		self.tick()?;
		self.events.push(Event::Data(bytes.to_vec()));

		if self.command == Some(Command::MemoryWrite as u8) {
			for &byte in bytes {
				self.store(byte);
			}
		} else {
			self.params.extend_from_slice(bytes);
		}

		Ok(())
	}

	fn set_reset(&mut self, level: Level) -> Result<()> {
		trace!(?level, "simulated reset line");
		self.events.push(Event::Reset(level));
		if level == Level::Low {
			self.display_on = false;
			self.awake = false;
		}
		Ok(())
	}

	fn delay(&mut self, duration: Duration) {
		self.events.push(Event::Delay(duration));
	}
}

/// An output line that remembers the last level it was set to.
///
/// Clones share state, so keep one to inspect after handing the other to the driver.
#[derive(Debug, Clone, Default)]
pub struct LineProbe(Rc<Cell<Option<Level>>>);

impl LineProbe {
	pub fn level(&self) -> Option<Level> {
		self.0.get()
	}
}

impl OutputLine for LineProbe {
	fn set_level(&mut self, level: Level) -> Result<()> {
		self.0.set(Some(level));
		Ok(())
	}
}
