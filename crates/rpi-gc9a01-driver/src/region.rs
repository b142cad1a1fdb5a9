use embedded_graphics::{
	geometry::{Point, Size},
	primitives::Rectangle,
};
use tracing::debug;

/// An inclusive, axis-aligned rectangle in panel coordinates.
///
/// This is the unit both of framebuffer slicing and of hardware windows (CASET/RASET). A
/// region obtained from [`Region::clip`] or [`Region::clamp_corners`] always lies within the
/// bounds it was computed against, with `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
	pub x0: u16,
	pub y0: u16,
	pub x1: u16,
	pub y1: u16,
}

impl Region {
	/// Make a region from ordered inclusive corners.
	pub fn new(x0: u16, y0: u16, x1: u16, y1: u16) -> Self {
		debug_assert!(x0 <= x1 && y0 <= y1, "region corners out of order");
		Self { x0, y0, x1, y1 }
	}

	/// The region covering a whole surface of the given size, if it isn't empty.
	pub fn full(bounds: Size) -> Option<Self> {
		Self::clip(&Rectangle::new(Point::zero(), bounds), bounds)
	}

	/// Intersect a rectangle with `[0, bounds.width) × [0, bounds.height)`.
	///
	/// Returns `None` if nothing is left, which callers treat as a no-op.
	pub fn clip(area: &Rectangle, bounds: Size) -> Option<Self> {
		if area.size.width == 0 || area.size.height == 0 {
			return None;
		}

		let left = i64::from(area.top_left.x);
		let top = i64::from(area.top_left.y);
		let right = left + i64::from(area.size.width) - 1;
		let bottom = top + i64::from(area.size.height) - 1;

		let x0 = left.max(0);
		let y0 = top.max(0);
		let x1 = right.min(i64::from(bounds.width) - 1);
		let y1 = bottom.min(i64::from(bounds.height) - 1);
		if x0 > x1 || y0 > y1 {
			return None;
		}

		Some(Self {
			x0: x0 as u16,
			y0: y0 as u16,
			x1: x1 as u16,
			y1: y1 as u16,
		})
	}

	/// Clamp each corner into the bounds and put them in order.
	///
	/// Unlike [`Region::clip`] this never yields an empty result: a request entirely off one
	/// side collapses onto the edge. This is how hardware windows are addressed. The flag is
	/// true if anything had to be adjusted.
	pub fn clamp_corners(x0: i32, y0: i32, x1: i32, y1: i32, bounds: Size) -> (Self, bool) {
		let max_x = i64::from(bounds.width).saturating_sub(1).max(0);
		let max_y = i64::from(bounds.height).saturating_sub(1).max(0);
		let fit = |v: i32, max: i64| i64::from(v).max(0).min(max) as u16;

		let (cx0, cy0, cx1, cy1) = (fit(x0, max_x), fit(y0, max_y), fit(x1, max_x), fit(y1, max_y));
		let region = Self {
			x0: cx0.min(cx1),
			y0: cy0.min(cy1),
			x1: cx0.max(cx1),
			y1: cy0.max(cy1),
		};

		let adjusted = [
			(i64::from(x0), region.x0),
			(i64::from(y0), region.y0),
			(i64::from(x1), region.x1),
			(i64::from(y1), region.y1),
		]
		.iter()
		.any(|&(asked, got)| asked != i64::from(got));

		(region, adjusted)
	}

	pub fn width(&self) -> u16 {
		self.x1 - self.x0 + 1
	}

	pub fn height(&self) -> u16 {
		self.y1 - self.y0 + 1
	}

	pub fn size(&self) -> Size {
		Size::new(self.width().into(), self.height().into())
	}

	pub fn pixel_count(&self) -> usize {
		usize::from(self.width()) * usize::from(self.height())
	}

	pub fn top_left(&self) -> Point {
		Point::new(self.x0.into(), self.y0.into())
	}

	pub fn to_rectangle(&self) -> Rectangle {
		Rectangle::new(self.top_left(), self.size())
	}

	/// Whether the region is well-ordered and lies entirely inside a surface of the given size.
	///
	/// The fields are public, so a region built by hand may have its corners swapped; such a
	/// region never fits.
	pub fn fits(&self, bounds: Size) -> bool {
		self.x0 <= self.x1
			&& self.y0 <= self.y1
			&& u32::from(self.x1) < bounds.width
			&& u32::from(self.y1) < bounds.height
	}
}

/// Counters for the silent clipping done on drawing requests and hardware windows.
///
/// Clipping never fails, which can hide caller bugs; these counters make it observable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipStats {
	/// Requests that went through clipping.
	pub requests: u64,

	/// Requests that had to be adjusted to fit, including the empty ones.
	pub clipped: u64,

	/// Requests that clipped to nothing and were dropped.
	pub empty: u64,
}

impl ClipStats {
	/// Clip a drawing request against the bounds, counting the outcome.
	pub fn clip(&mut self, area: &Rectangle, bounds: Size) -> Option<Region> {
		let region = Region::clip(area, bounds);
		self.record(area, region);
		region
	}

	/// Count a request that was clipped elsewhere, given what it was clipped to.
	pub fn record(&mut self, area: &Rectangle, region: Option<Region>) {
		self.requests += 1;
		match region {
			None => {
				self.clipped += 1;
				self.empty += 1;
				debug!(?area, "request is entirely off-screen, dropping");
			}
			Some(region) if region.to_rectangle() != *area => {
				self.clipped += 1;
				debug!(?area, ?region, "request clipped to the panel");
			}
			Some(_) => {}
		}
	}

	/// Record a window clamp done by [`Region::clamp_corners`].
	pub fn record_clamp(&mut self, adjusted: bool) {
		self.requests += 1;
		if adjusted {
			self.clipped += 1;
		}
	}
}
