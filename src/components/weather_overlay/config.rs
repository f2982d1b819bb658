//! Overlay configuration.
//!
//! Read once at start-up from an optional JSON script element on the host
//! page. Every field has a default, so an empty object (or no element at
//! all) yields the stock setup.

use log::LevelFilter;
use serde::Deserialize;

use super::error::OverlayError;

/// State of the test selector meaning "use the real weather entity".
pub const USE_REAL_WEATHER: &str = "Use Real Weather";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
	/// Weather entity whose state drives the effect.
	pub weather_entity: String,
	/// Boolean entity switching the overlay on and off.
	pub toggle_entity: Option<String>,
	/// Select entity overriding the weather for testing.
	pub test_entity: Option<String>,
	/// Rain gauge used to confirm rainy states.
	pub rain_sensor_entity: Option<String>,
	/// Downgrade rain to clouds unless the rain sensor reads above zero.
	pub require_rain_confirmation: bool,
	/// Dashboards the overlay shows on. Empty means all.
	pub enabled_dashboards: Vec<String>,
	/// Minimum time between two applied weather evaluations.
	pub update_interval_ms: f64,
	/// Cadence of the weather poll.
	pub poll_interval_ms: i32,
	/// Cadence of the URL path check.
	pub navigation_check_ms: i32,
	/// Cadence of the start-up check for the Home Assistant frontend.
	pub host_wait_interval_ms: i32,
	/// Checks before giving up on the Home Assistant frontend.
	pub host_wait_attempts: u32,
	/// Emit debug-level diagnostics.
	pub debug: bool,
}

impl Default for OverlayConfig {
	fn default() -> Self {
		Self {
			weather_entity: "weather.home".to_string(),
			toggle_entity: Some("input_boolean.weather_overlay".to_string()),
			test_entity: Some("input_select.weather_overlay_test".to_string()),
			rain_sensor_entity: None,
			require_rain_confirmation: false,
			enabled_dashboards: Vec::new(),
			update_interval_ms: 5000.0,
			poll_interval_ms: 1000,
			navigation_check_ms: 500,
			host_wait_interval_ms: 500,
			host_wait_attempts: 60,
			debug: true,
		}
	}
}

impl OverlayConfig {
	pub fn from_json(text: &str) -> Result<Self, OverlayError> {
		Ok(serde_json::from_str(text)?)
	}

	/// Log level matching the debug switch. Warnings always get through.
	pub fn log_level(&self) -> LevelFilter {
		if self.debug {
			LevelFilter::Debug
		} else {
			LevelFilter::Warn
		}
	}

	/// Entity ids the overlay reads from the host.
	pub fn watched_entities(&self) -> impl Iterator<Item = &str> {
		std::iter::once(self.weather_entity.as_str())
			.chain(self.toggle_entity.as_deref())
			.chain(self.test_entity.as_deref())
			.chain(self.rain_sensor_entity.as_deref())
	}
}
