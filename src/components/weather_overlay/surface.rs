//! Drawing-surface abstraction.
//!
//! The scene only speaks in the handful of primitives the effects need:
//! circles, line segments and rectangles filled with a solid color or a
//! gradient, plus global alpha and a soft shadow. The browser canvas
//! implements it in `canvas.rs`; tests record the calls instead.

use super::theme::Color;

/// Offset/color pair of a gradient, offset in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
	pub offset: f64,
	pub color: Color,
}

impl ColorStop {
	pub const fn new(offset: f64, color: Color) -> Self {
		Self { offset, color }
	}
}

/// Concentric radial gradient.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
	pub x: f64,
	pub y: f64,
	pub inner_radius: f64,
	pub outer_radius: f64,
	pub stops: Vec<ColorStop>,
}

/// Linear gradient between two points.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
	pub x0: f64,
	pub y0: f64,
	pub x1: f64,
	pub y1: f64,
	pub stops: Vec<ColorStop>,
}

/// What a filled shape is painted with.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
	Solid(Color),
	Radial(RadialGradient),
	Linear(LinearGradient),
}

/// A 2D surface the scene can draw onto.
///
/// Coordinates are logical (CSS) pixels; implementations apply the device
/// pixel ratio themselves.
pub trait Surface {
	/// Whether the surface can still be drawn on.
	fn is_available(&self) -> bool;

	/// Resize the backing store and reapply the pixel-ratio scale.
	fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64);

	fn set_visible(&mut self, visible: bool);

	/// Erase the whole surface.
	fn clear(&mut self);

	fn set_alpha(&mut self, alpha: f64);

	/// Soft shadow applied to subsequent fills. A blur of 0 disables it.
	fn set_shadow(&mut self, blur: f64, color: Color);

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: &Paint);

	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Color);

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint);
}
