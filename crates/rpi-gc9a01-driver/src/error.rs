use embedded_graphics::geometry::Size;

use crate::{protocol::ProtocolState, region::Region};

/// Error type for driver operations.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(feature = "miette", derive(miette::Diagnostic))]
pub enum Error {
	/// A pixel block doesn't have the dimensions of the region it's meant for.
	///
	/// Nothing is mutated when this is returned.
	#[error("pixel block is {actual:?} but the region is {expected:?}")]
	ShapeMismatch { expected: Size, actual: Size },

	/// A flat buffer doesn't hold as many elements as its declared dimensions need.
	///
	/// Counted in pixels for image buffers, in bytes for raw RGB565 buffers.
	#[error("buffer holds {actual} elements, expected {expected}")]
	BufferLength { expected: usize, actual: usize },

	/// A region reaches outside the framebuffer.
	///
	/// All public drawing operations clip before touching the framebuffer, so this is a bug in
	/// whatever code path skipped clipping.
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("regions must be clipped to the panel before framebuffer access"))
	)]
	#[error("region {region:?} is outside the {width}x{height} framebuffer")]
	OutOfBounds {
		region: Region,
		width: u16,
		height: u16,
	},

	/// Pixel data written after RAMWR doesn't cover the current window exactly.
	///
	/// Checked before any byte is sent, so the panel is never left misaligned.
	#[error("pixel stream is {actual} bytes but the armed window needs {expected}")]
	WindowMismatch { expected: usize, actual: usize },

	/// The panel hasn't been through `init()` yet.
	#[cfg_attr(feature = "miette", diagnostic(help("call init() first")))]
	#[error("panel is not ready (state: {state:?})")]
	NotReady { state: ProtocolState },

	/// The transport failed. The framebuffer may already hold the new contents.
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("the panel may be out of sync; call sync() once the link is back"))
	)]
	#[error("transport failure")]
	Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

	#[cfg(target_os = "linux")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("GPIO error, check the pin numbers"))
	)]
	#[error("GPIO error")]
	Gpio(#[from] rppal::gpio::Error),

	#[cfg(target_os = "linux")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("SPI error, check settings or increase spidev.bufsiz"))
	)]
	#[error("SPI error")]
	Spi(#[from] rppal::spi::Error),
}

impl Error {
	/// Wrap any transport-level error.
	pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
		Self::Transport(Box::new(err))
	}
}

/// Convenience type for Results in this crate.
pub type Result<T> = std::result::Result<T, Error>;
