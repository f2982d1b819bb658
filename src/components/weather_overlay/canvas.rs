//! Browser canvas implementation of [`Surface`].

use std::f64::consts::PI;

use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use super::error::OverlayError;
use super::surface::{ColorStop, Paint, Surface};
use super::theme::Color;

/// A `<canvas>` element and its 2D context.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
}

impl CanvasSurface {
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self, OverlayError> {
		let ctx = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
			.ok_or(OverlayError::SurfaceUnavailable)?;
		let (width, height) = (canvas.width() as f64, canvas.height() as f64);
		Ok(Self {
			canvas,
			ctx,
			width,
			height,
		})
	}

	fn add_stops(gradient: &CanvasGradient, stops: &[ColorStop]) {
		for stop in stops {
			let _ = gradient.add_color_stop(stop.offset as f32, &stop.color.to_css());
		}
	}

	/// Set the fill style. Returns `false` when the gradient could not be built.
	fn apply_paint(&self, paint: &Paint) -> bool {
		match paint {
			Paint::Solid(color) => {
				self.ctx.set_fill_style_str(&color.to_css());
			}
			Paint::Radial(g) => {
				let Ok(gradient) = self
					.ctx
					.create_radial_gradient(g.x, g.y, g.inner_radius, g.x, g.y, g.outer_radius)
				else {
					warn!("weather-overlay: radial gradient rejected at ({}, {})", g.x, g.y);
					return false;
				};
				Self::add_stops(&gradient, &g.stops);
				#[allow(deprecated)]
				self.ctx.set_fill_style(&gradient);
			}
			Paint::Linear(g) => {
				let gradient = self.ctx.create_linear_gradient(g.x0, g.y0, g.x1, g.y1);
				Self::add_stops(&gradient, &g.stops);
				#[allow(deprecated)]
				self.ctx.set_fill_style(&gradient);
			}
		}
		true
	}
}

impl Surface for CanvasSurface {
	fn is_available(&self) -> bool {
		self.canvas.is_connected()
	}

	fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
		self.width = width;
		self.height = height;
		self.canvas.set_width((width * pixel_ratio) as u32);
		self.canvas.set_height((height * pixel_ratio) as u32);
		// Resizing resets the transform, so this never compounds.
		let _ = self
			.ctx
			.set_transform(pixel_ratio, 0.0, 0.0, pixel_ratio, 0.0, 0.0);
	}

	fn set_visible(&mut self, visible: bool) {
		let display = if visible { "block" } else { "none" };
		let _ = self.canvas.style().set_property("display", display);
	}

	fn clear(&mut self) {
		self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
	}

	fn set_alpha(&mut self, alpha: f64) {
		self.ctx.set_global_alpha(alpha);
	}

	fn set_shadow(&mut self, blur: f64, color: Color) {
		self.ctx.set_shadow_blur(blur);
		self.ctx.set_shadow_color(&color.to_css());
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: &Paint) {
		if !self.apply_paint(paint) {
			return;
		}
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, PI * 2.0);
		self.ctx.fill();
	}

	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Color) {
		self.ctx.set_stroke_style_str(&color.to_css());
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		self.ctx.move_to(from.0, from.1);
		self.ctx.line_to(to.0, to.1);
		self.ctx.stroke();
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint) {
		if self.apply_paint(paint) {
			self.ctx.fill_rect(x, y, width, height);
		}
	}
}
