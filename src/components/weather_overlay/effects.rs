//! Per-category effect parameters.
//!
//! Each recognized [`WeatherCategory`] maps to exactly one [`EffectConfig`]
//! describing its particle population and which full-screen effects run on
//! top. A config with `max_particles == 0` has no population at all and is
//! drawn purely through the full-screen effects (sun glow, lightning).

use std::collections::HashMap;

use super::theme::{Color, default_color};
use super::types::{EffectKind, WeatherCategory};

/// Static parameter bundle for one weather category.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectConfig {
	pub kind: EffectKind,
	pub max_particles: usize,
	/// Brush color. `None` falls back to the variant's default.
	pub color: Option<Color>,
	/// `(min, max)` fall or drift speed in pixels per frame.
	pub speed_range: (f64, f64),
	/// `(min, max)` per-variant size parameter.
	pub size_range: (f64, f64),
	/// Full width of the horizontal drift window.
	pub sway_amount: f64,
	/// Streak length scale for rain. `None` means 1.
	pub length_multiplier: Option<f64>,
	/// Run lightning strikes on top of the particles.
	pub has_lightning_overlay: bool,
}

impl EffectConfig {
	/// Config for a full-screen-only effect.
	pub const fn bare(kind: EffectKind) -> Self {
		Self {
			kind,
			max_particles: 0,
			color: None,
			speed_range: (0.0, 0.0),
			size_range: (0.0, 0.0),
			sway_amount: 0.0,
			length_multiplier: None,
			has_lightning_overlay: false,
		}
	}

	const fn population(
		kind: EffectKind,
		max_particles: usize,
		color: Color,
		speed_range: (f64, f64),
		size_range: (f64, f64),
		sway_amount: f64,
	) -> Self {
		Self {
			kind,
			max_particles,
			color: Some(color),
			speed_range,
			size_range,
			sway_amount,
			length_multiplier: None,
			has_lightning_overlay: false,
		}
	}

	/// Configured color, or the variant default when unset.
	pub fn color_or_default(&self) -> Color {
		self.color.unwrap_or_else(|| default_color(self.kind))
	}

	pub fn length_multiplier(&self) -> f64 {
		self.length_multiplier.unwrap_or(1.0)
	}

	/// Whether lightning strikes run for this config.
	pub fn has_lightning(&self) -> bool {
		self.kind == EffectKind::Lightning || self.has_lightning_overlay
	}
}

/// Lookup table from category to effect, supplied to the scene at creation.
#[derive(Clone, Debug)]
pub struct EffectTable {
	entries: HashMap<WeatherCategory, EffectConfig>,
}

impl EffectTable {
	/// A table with no entries.
	pub fn empty() -> Self {
		Self {
			entries: HashMap::new(),
		}
	}

	/// The built-in table covering every recognized category.
	pub fn builtin() -> Self {
		let rain = Color::rgba(174, 194, 224, 0.35);
		let mut table = Self::empty();

		table.insert(
			WeatherCategory::Rainy,
			EffectConfig::population(EffectKind::Rain, 50, rain, (15.0, 25.0), (1.0, 2.0), 0.5),
		);
		table.insert(
			WeatherCategory::Pouring,
			EffectConfig {
				length_multiplier: Some(4.0),
				..EffectConfig::population(
					EffectKind::Rain,
					50,
					rain,
					(10.5, 17.5),
					(1.0, 2.0),
					0.5,
				)
			},
		);
		table.insert(
			WeatherCategory::Cloudy,
			EffectConfig::population(
				EffectKind::Clouds,
				10,
				Color::rgba(180, 180, 180, 0.10),
				(0.3, 0.8),
				(80.0, 150.0),
				0.5,
			),
		);
		table.insert(
			WeatherCategory::PartlyCloudy,
			EffectConfig::population(
				EffectKind::Clouds,
				6,
				Color::rgba(200, 200, 200, 0.08),
				(0.4, 1.0),
				(70.0, 130.0),
				0.6,
			),
		);
		table.insert(
			WeatherCategory::Fog,
			EffectConfig::population(
				EffectKind::Fog,
				70,
				Color::rgba(220, 220, 220, 0.05),
				(0.2, 0.4),
				(1000.0, 2000.0),
				0.5,
			),
		);
		table.insert(
			WeatherCategory::Snowy,
			EffectConfig::population(
				EffectKind::Snow,
				40,
				Color::rgba(255, 255, 255, 0.4),
				(2.0, 5.0),
				(2.0, 5.0),
				1.5,
			),
		);
		table.insert(
			WeatherCategory::SnowyRainy,
			EffectConfig::population(
				EffectKind::Mixed,
				50,
				Color::rgba(200, 210, 230, 0.35),
				(8.0, 15.0),
				(1.5, 4.0),
				1.0,
			),
		);
		table.insert(
			WeatherCategory::Lightning,
			EffectConfig::bare(EffectKind::Lightning),
		);
		table.insert(
			WeatherCategory::LightningRainy,
			EffectConfig {
				has_lightning_overlay: true,
				..EffectConfig::population(EffectKind::Rain, 50, rain, (15.0, 25.0), (1.0, 2.0), 0.5)
			},
		);
		table.insert(
			WeatherCategory::ClearNight,
			EffectConfig {
				max_particles: 36,
				..EffectConfig::bare(EffectKind::Stars)
			},
		);
		table.insert(WeatherCategory::Sunny, EffectConfig::bare(EffectKind::Sunny));
		table.insert(
			WeatherCategory::Windy,
			EffectConfig::population(
				EffectKind::Clouds,
				6,
				Color::rgba(200, 200, 200, 0.06),
				(2.0, 4.0),
				(70.0, 130.0),
				0.6,
			),
		);
		table.insert(
			WeatherCategory::Hail,
			EffectConfig::population(
				EffectKind::Hail,
				5,
				Color::rgba(255, 255, 255, 0.4),
				(20.0, 30.0),
				(5.0, 8.0),
				0.2,
			),
		);
		table.insert(
			WeatherCategory::Exceptional,
			EffectConfig::bare(EffectKind::Sunny),
		);

		table
	}

	/// Add or replace the effect for a category.
	pub fn insert(&mut self, category: WeatherCategory, config: EffectConfig) {
		self.entries.insert(category, config);
	}

	pub fn get(&self, category: &WeatherCategory) -> Option<&EffectConfig> {
		self.entries.get(category)
	}

	/// Known keys, for diagnostics.
	pub fn categories(&self) -> impl Iterator<Item = &WeatherCategory> {
		self.entries.keys()
	}
}

impl Default for EffectTable {
	fn default() -> Self {
		Self::builtin()
	}
}
