use bitvec::{BitArr, order::Msb0};

/// Memory access control (MADCTL) register value.
///
/// Bits, from the most significant: MY, MX, MV, ML, BGR, MH, and two unused.
///
/// The default is what round GC9A01 modules ship wired for: normal orientation, BGR order
/// (`0x08`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemoryAccessControl(BitArr!(for 8, in u8, Msb0));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Vertical {
	TopToBottom,
	BottomToTop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Horizontal {
	LeftToRight,
	RightToLeft,
}

impl Default for MemoryAccessControl {
	fn default() -> Self {
		Self::from(0).bgr()
	}
}

impl MemoryAccessControl {
	/// Row address order (MY).
	pub fn row_order(mut self, direction: Vertical) -> Self {
		self.0.set(0, direction == Vertical::BottomToTop);
		self
	}

	/// Column address order (MX).
	pub fn col_order(mut self, direction: Horizontal) -> Self {
		self.0.set(1, direction == Horizontal::RightToLeft);
		self
	}

	/// Row/column exchange (MV) off.
	pub fn normal(mut self) -> Self {
		self.0.set(2, false);
		self
	}

	/// Row/column exchange (MV) on: the panel is addressed rotated by 90°.
	pub fn exchanged(mut self) -> Self {
		self.0.set(2, true);
		self
	}

	/// Vertical refresh order (ML).
	pub fn v_refresh(mut self, direction: Vertical) -> Self {
		self.0.set(3, direction == Vertical::BottomToTop);
		self
	}

	pub fn rgb(mut self) -> Self {
		self.0.set(4, false);
		self
	}

	pub fn bgr(mut self) -> Self {
		self.0.set(4, true);
		self
	}

	/// Horizontal refresh order (MH).
	pub fn h_refresh(mut self, direction: Horizontal) -> Self {
		self.0.set(5, direction == Horizontal::RightToLeft);
		self
	}
}

impl From<u8> for MemoryAccessControl {
	fn from(value: u8) -> Self {
		Self(bitvec::array::BitArray::new([value]))
	}
}

impl From<MemoryAccessControl> for u8 {
	fn from(control: MemoryAccessControl) -> u8 {
		let arr: [u8; 1] = control.0.into_inner();
		arr[0]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_bgr() {
		assert_eq!(u8::from(MemoryAccessControl::default()), 0x08);
	}

	#[test]
	fn bits_land_where_the_controller_expects() {
		let madctl = MemoryAccessControl::from(0)
			.row_order(Vertical::BottomToTop)
			.col_order(Horizontal::RightToLeft);
		assert_eq!(u8::from(madctl), 0xC0);

		let madctl = MemoryAccessControl::from(0).exchanged().bgr();
		assert_eq!(u8::from(madctl), 0x28);

		let madctl = MemoryAccessControl::from(0xFF)
			.normal()
			.rgb()
			.v_refresh(Vertical::TopToBottom)
			.h_refresh(Horizontal::LeftToRight);
		assert_eq!(u8::from(madctl), 0b1100_0011);
	}

	#[test]
	fn raw_value_round_trips() {
		assert_eq!(u8::from(MemoryAccessControl::from(0x48)), 0x48);
	}
}
