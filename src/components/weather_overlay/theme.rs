//! Colors and fixed palettes for the overlay effects.

use super::types::EffectKind;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Brush used when an effect has no configured color.
pub fn default_color(kind: EffectKind) -> Color {
	match kind {
		EffectKind::Rain | EffectKind::Lightning => Color::rgba(174, 194, 224, 0.35),
		EffectKind::Clouds => Color::rgba(180, 180, 180, 0.10),
		EffectKind::Fog => Color::rgba(220, 220, 220, 0.05),
		EffectKind::Snow | EffectKind::Hail => Color::rgba(255, 255, 255, 0.4),
		EffectKind::Mixed => Color::rgba(200, 210, 230, 0.35),
		EffectKind::Stars => Color::rgba(255, 255, 255, 0.9),
		EffectKind::Sunny => Color::rgba(255, 200, 80, 0.25),
	}
}

/// Halo around twinkling stars.
pub const STAR_GLOW: Color = Color::rgba(200, 220, 255, 0.6);

/// Outer stop of every cloud puff.
pub const CLOUD_EDGE: Color = Color::rgba(180, 180, 180, 0.0);

/// Edges of a fog band.
pub const FOG_EDGE: Color = Color::rgba(220, 220, 220, 0.0);

/// Warm radial stops of the sunny glow, center outwards.
pub const SUN_GLOW_STOPS: [(f64, Color); 5] = [
	(0.0, Color::rgba(255, 200, 80, 0.25)),
	(0.2, Color::rgba(255, 180, 60, 0.15)),
	(0.5, Color::rgba(255, 160, 40, 0.08)),
	(0.8, Color::rgba(255, 140, 20, 0.03)),
	(1.0, Color::rgba(255, 120, 10, 0.0)),
];

/// Outer stop of a lightning flash.
pub const LIGHTNING_EDGE: Color = Color::rgba(180, 190, 210, 0.0);

/// Flat wash laid over the whole surface during a flash.
pub const LIGHTNING_WASH: Color = Color::rgba(255, 255, 255, 1.0);
