/// LCD display commands
///
/// This is the subset of the GC9A01 command set this driver interprets. Everything else the
/// panel needs at power-up lives in the opaque [`VENDOR_PREAMBLE`] and [`VENDOR_TUNING`]
/// tables.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
	/// No-op (NOP).
	Nop = 0x00,

	/// Sleep in (SLPIN).
	///
	/// This must be followed by a delay of at least 5ms.
	Sleep = 0x10,

	/// Sleep out (SLPOUT).
	///
	/// This must be followed by a delay of at least 120ms.
	WakeUp = 0x11,

	/// Switch on display inversion (INVON).
	///
	/// The GC9A01 round panels are wired inverted, so this is always on.
	InversionOn = 0x21,

	/// Turn display off (DISPOFF).
	///
	/// The panel stops showing its memory; the memory itself is kept.
	DisplayOff = 0x28,

	/// Turn display on (DISPON).
	DisplayOn = 0x29,

	/// Set column addresses (CASET).
	///
	/// 2 big-endian u16s: start column, end column (inclusive).
	ColumnAddressSet = 0x2A,

	/// Set row addresses (RASET).
	///
	/// 2 big-endian u16s: start row, end row (inclusive).
	RowAddressSet = 0x2B,

	/// Memory write (RAMWR).
	///
	/// The next data bytes are pixels for the current window, row-major:
	/// exactly `width * height * 2` bytes.
	MemoryWrite = 0x2C,

	/// Tearing effect line on (TEON).
	TearingEffectOn = 0x35,

	/// Memory access control (MADCTL).
	///
	/// See [`MemoryAccessControl`](crate::MemoryAccessControl).
	MemoryAccessControl = 0x36,

	/// Pixel format set (COLMOD).
	///
	/// Only [`COLMOD_16BPP`] is used: the framebuffer is always streamed as RGB565.
	PixelFormat = 0x3A,
}

/// COLMOD argument for 16 bits per pixel over the MCU interface.
pub const COLMOD_16BPP: u8 = 0x05;

/// Register writes sent before MADCTL during init.
///
/// Opaque values from the panel vendor: inter-register enable and a handful of undocumented
/// analog settings.
pub const VENDOR_PREAMBLE: &[(u8, &[u8])] = &[
	(0xEF, &[]),
	(0xEB, &[0x14]),
	(0xFE, &[]),
	(0xEF, &[]),
	(0xEB, &[0x14]),
	(0x84, &[0x40]),
	(0x85, &[0xFF]),
	(0x86, &[0xFF]),
	(0x87, &[0xFF]),
	(0x88, &[0x0A]),
	(0x89, &[0x21]),
	(0x8A, &[0x00]),
	(0x8B, &[0x80]),
	(0x8C, &[0x01]),
	(0x8D, &[0x01]),
	(0x8E, &[0xFF]),
	(0x8F, &[0xFF]),
	(0xB6, &[0x00, 0x20]),
];

/// Register writes sent after COLMOD during init: power, gamma and timing tuning.
pub const VENDOR_TUNING: &[(u8, &[u8])] = &[
	(0x90, &[0x08, 0x08, 0x08, 0x08]),
	(0xBD, &[0x06]),
	(0xBC, &[0x00]),
	(0xFF, &[0x60, 0x01, 0x04]),
	(0xC3, &[0x13]),
	(0xC4, &[0x13]),
	(0xC9, &[0x22]),
	(0xBE, &[0x11]),
	(0xE1, &[0x10, 0x0E]),
	(0xDF, &[0x21, 0x0C, 0x02]),
	(0xF0, &[0x45, 0x09, 0x08, 0x08, 0x26, 0x2A]),
	(0xF1, &[0x43, 0x70, 0x72, 0x36, 0x37, 0x6F]),
	(0xF2, &[0x45, 0x09, 0x08, 0x08, 0x26, 0x2A]),
	(0xF3, &[0x43, 0x70, 0x72, 0x36, 0x37, 0x6F]),
	(0xED, &[0x1B, 0x0B]),
	(0xAE, &[0x77]),
	(0xCD, &[0x63]),
	(0x70, &[0x07, 0x07, 0x04, 0x0E, 0x0F, 0x09, 0x07, 0x08, 0x03]),
	(0xE8, &[0x34]),
	(
		0x62,
		&[0x18, 0x0D, 0x71, 0xED, 0x70, 0x70, 0x18, 0x0F, 0x71, 0xEF, 0x70, 0x70],
	),
	(
		0x63,
		&[0x18, 0x11, 0x71, 0xF1, 0x70, 0x70, 0x18, 0x13, 0x71, 0xF3, 0x70, 0x70],
	),
	(0x64, &[0x28, 0x29, 0xF1, 0x01, 0xF1, 0x00, 0x07]),
	(0x66, &[0x3C, 0x00, 0xCD, 0x67, 0x45, 0x45, 0x10, 0x00, 0x00, 0x00]),
	(0x67, &[0x00, 0x3C, 0x00, 0x00, 0x00, 0x01, 0x54, 0x10, 0x32, 0x98]),
	(0x74, &[0x10, 0x85, 0x80, 0x00, 0x00, 0x4E, 0x00]),
	(0x98, &[0x3E, 0x07]),
];
