//! Host collaborator contract and the rules for reading Home Assistant state.
//!
//! The overlay only needs three answers from its host: the current weather
//! category, whether the overlay is switched on, and whether the current view
//! may show it. [`SnapshotHost`] answers them from a [`StateSnapshot`] of the
//! relevant entities, so every rule here is plain data in, answer out.

use std::collections::HashMap;

use log::{debug, error, warn};

use super::config::{OverlayConfig, USE_REAL_WEATHER};
use super::error::OverlayError;
use super::types::WeatherCategory;

/// Entity states Home Assistant reports while it has no real value.
const PLACEHOLDER_STATES: [&str; 2] = ["unavailable", "unknown"];

/// The part of a Home Assistant entity the overlay reads.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityState {
	pub state: String,
}

/// States of the watched entities at one point in time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateSnapshot {
	pub entities: HashMap<String, EntityState>,
	/// Every `weather.*` entity id the host knows. Only filled when the
	/// weather entity itself is missing.
	pub weather_entity_ids: Vec<String>,
}

impl StateSnapshot {
	pub fn get(&self, entity_id: &str) -> Option<&str> {
		self.entities.get(entity_id).map(|e| e.state.as_str())
	}

	pub fn with(mut self, entity_id: &str, state: &str) -> Self {
		self.entities.insert(
			entity_id.to_string(),
			EntityState {
				state: state.to_string(),
			},
		);
		self
	}
}

/// What the overlay needs from its host environment.
pub trait WeatherHost {
	/// Active weather category, or why it cannot be read right now.
	fn current_weather_category(&self) -> Result<WeatherCategory, OverlayError>;

	/// External on/off switch. Enabled when nobody provides one.
	fn is_overlay_enabled(&self) -> bool;

	/// View filter. Permitted when no filter is configured.
	fn is_on_permitted_view(&self) -> bool;
}

/// Host answers derived from a snapshot, the config and the URL path.
///
/// A `None` snapshot means the Home Assistant frontend is not reachable.
pub struct SnapshotHost<'a> {
	snapshot: Option<&'a StateSnapshot>,
	config: &'a OverlayConfig,
	path: &'a str,
}

impl<'a> SnapshotHost<'a> {
	pub fn new(snapshot: Option<&'a StateSnapshot>, config: &'a OverlayConfig, path: &'a str) -> Self {
		Self {
			snapshot,
			config,
			path,
		}
	}

	fn confirm_rain(&self, snapshot: &StateSnapshot, category: WeatherCategory) -> WeatherCategory {
		let Some(sensor) = self.config.rain_sensor_entity.as_deref() else {
			return category;
		};
		if !self.config.require_rain_confirmation
			|| !matches!(category, WeatherCategory::Rainy | WeatherCategory::Pouring)
		{
			return category;
		}

		match snapshot.get(sensor) {
			Some(reading) => {
				let rate = leading_number(reading);
				if let Some(rate) = rate.filter(|r| *r > 0.0) {
					debug!("weather-overlay: rain confirmed by sensor: {rate}");
					category
				} else {
					debug!(
						"weather-overlay: weather says {category}, but rain sensor shows {reading}, showing cloudy instead"
					);
					WeatherCategory::Cloudy
				}
			}
			None => {
				warn!("weather-overlay: rain sensor '{sensor}' not found");
				category
			}
		}
	}
}

impl WeatherHost for SnapshotHost<'_> {
	fn current_weather_category(&self) -> Result<WeatherCategory, OverlayError> {
		let Some(snapshot) = self.snapshot else {
			return Err(OverlayError::StateUnavailable(
				"Home Assistant not available".to_string(),
			));
		};

		if let Some(test_state) = self
			.config
			.test_entity
			.as_deref()
			.and_then(|id| snapshot.get(id))
			.filter(|s| !s.is_empty() && *s != USE_REAL_WEATHER)
		{
			debug!("weather-overlay: using test weather: {test_state}");
			return Ok(WeatherCategory::from_state(test_state));
		}

		let entity = self.config.weather_entity.as_str();
		let Some(state) = snapshot.get(entity) else {
			error!(
				"weather-overlay: weather entity '{entity}' not found, available: {:?}",
				snapshot.weather_entity_ids
			);
			return Err(OverlayError::StateUnavailable(format!(
				"entity '{entity}' not found"
			)));
		};
		if state.is_empty() || PLACEHOLDER_STATES.iter().any(|p| *p == state) {
			return Err(OverlayError::StateUnavailable(format!(
				"entity '{entity}' is '{state}'"
			)));
		}
		debug!("weather-overlay: weather entity state: {state}");

		Ok(self.confirm_rain(snapshot, WeatherCategory::from_state(state)))
	}

	fn is_overlay_enabled(&self) -> bool {
		let (Some(toggle), Some(snapshot)) = (self.config.toggle_entity.as_deref(), self.snapshot)
		else {
			return true;
		};
		match snapshot.get(toggle) {
			Some(state) => {
				let enabled = state == "on";
				if !enabled {
					debug!("weather-overlay: overlay disabled via toggle");
				}
				enabled
			}
			None => {
				debug!("weather-overlay: toggle entity '{toggle}' not found, overlay enabled by default");
				true
			}
		}
	}

	fn is_on_permitted_view(&self) -> bool {
		dashboard_permitted(self.path, &self.config.enabled_dashboards)
	}
}

/// Finite number at the start of a sensor reading, ignoring any unit after it.
fn leading_number(text: &str) -> Option<f64> {
	let text = text.trim_start();
	let bytes = text.as_bytes();
	let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

	let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
	let whole = digits(end);
	end += whole;
	let mut fraction = 0;
	if bytes.get(end) == Some(&b'.') {
		fraction = digits(end + 1);
		end += 1 + fraction;
	}
	if whole + fraction == 0 {
		return None;
	}
	if matches!(bytes.get(end), Some(b'e' | b'E')) {
		let mut exp_start = end + 1;
		if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
			exp_start += 1;
		}
		let exponent = digits(exp_start);
		if exponent > 0 {
			end = exp_start + exponent;
		}
	}
	text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether the dashboard at `path` is one of `enabled`.
///
/// An empty list permits every dashboard.
pub fn dashboard_permitted(path: &str, enabled: &[String]) -> bool {
	if enabled.is_empty() {
		return true;
	}
	let listed = |name: &str| enabled.iter().any(|d| d == name);
	let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

	let Some(last) = parts.last() else {
		// Bare root is the default dashboard.
		return listed("lovelace") || listed("home");
	};

	if parts[0] == "lovelace" {
		let name = parts.get(1).copied().unwrap_or("lovelace");
		let permitted = listed(name);
		debug!("weather-overlay: dashboard '{name}', enabled: {permitted}");
		return permitted;
	}

	if parts.iter().any(|p| listed(*p)) {
		return true;
	}

	let permitted = listed(*last);
	if !permitted {
		debug!("weather-overlay: dashboard '{last}' not in enabled list {enabled:?}");
	}
	permitted
}

#[cfg(test)]
mod tests {
	use super::*;

	fn dashboards(names: &[&str]) -> Vec<String> {
		names.iter().map(|n| n.to_string()).collect()
	}

	fn snapshot() -> StateSnapshot {
		StateSnapshot::default().with("weather.home", "rainy")
	}

	#[test]
	fn test_reads_weather_entity() {
		let config = OverlayConfig::default();
		let snapshot = snapshot();
		let host = SnapshotHost::new(Some(&snapshot), &config, "/lovelace/0");
		assert_eq!(host.current_weather_category().unwrap(), WeatherCategory::Rainy);
	}

	#[test]
	fn test_missing_host_is_unavailable_but_enabled() {
		let config = OverlayConfig::default();
		let host = SnapshotHost::new(None, &config, "/");
		assert!(matches!(
			host.current_weather_category(),
			Err(OverlayError::StateUnavailable(_))
		));
		assert!(host.is_overlay_enabled());
	}

	#[test]
	fn test_missing_or_placeholder_entity_is_unavailable() {
		let config = OverlayConfig::default();
		let empty = StateSnapshot::default();
		let host = SnapshotHost::new(Some(&empty), &config, "/");
		assert!(host.current_weather_category().is_err());

		for state in ["", "unavailable", "unknown"] {
			let snapshot = StateSnapshot::default().with("weather.home", state);
			let host = SnapshotHost::new(Some(&snapshot), &config, "/");
			assert!(host.current_weather_category().is_err(), "{state:?}");
		}
	}

	#[test]
	fn test_unknown_state_passes_through_as_unrecognized() {
		let config = OverlayConfig::default();
		let snapshot = StateSnapshot::default().with("weather.home", "hurricane");
		let host = SnapshotHost::new(Some(&snapshot), &config, "/");
		assert_eq!(
			host.current_weather_category().unwrap(),
			WeatherCategory::Unrecognized("hurricane".into())
		);
	}

	#[test]
	fn test_test_selector_overrides_weather() {
		let config = OverlayConfig::default();
		let snapshot = snapshot().with("input_select.weather_overlay_test", "snowy");
		let host = SnapshotHost::new(Some(&snapshot), &config, "/");
		assert_eq!(host.current_weather_category().unwrap(), WeatherCategory::Snowy);

		let snapshot = snapshot.with("input_select.weather_overlay_test", USE_REAL_WEATHER);
		let host = SnapshotHost::new(Some(&snapshot), &config, "/");
		assert_eq!(host.current_weather_category().unwrap(), WeatherCategory::Rainy);
	}

	#[test]
	fn test_rain_needs_sensor_confirmation_when_required() {
		let config = OverlayConfig {
			rain_sensor_entity: Some("sensor.rain_gauge".into()),
			require_rain_confirmation: true,
			..OverlayConfig::default()
		};

		let dry = snapshot().with("sensor.rain_gauge", "0");
		let host = SnapshotHost::new(Some(&dry), &config, "/");
		assert_eq!(host.current_weather_category().unwrap(), WeatherCategory::Cloudy);

		let garbage = snapshot().with("sensor.rain_gauge", "n/a");
		let host = SnapshotHost::new(Some(&garbage), &config, "/");
		assert_eq!(host.current_weather_category().unwrap(), WeatherCategory::Cloudy);

		let wet = snapshot().with("sensor.rain_gauge", "1.2");
		let host = SnapshotHost::new(Some(&wet), &config, "/");
		assert_eq!(host.current_weather_category().unwrap(), WeatherCategory::Rainy);

		let missing = snapshot();
		let host = SnapshotHost::new(Some(&missing), &config, "/");
		assert_eq!(host.current_weather_category().unwrap(), WeatherCategory::Rainy);
	}

	#[test]
	fn test_leading_number_reads_like_a_sensor_value() {
		assert_eq!(leading_number("1.2"), Some(1.2));
		assert_eq!(leading_number(" 0.5 mm"), Some(0.5));
		assert_eq!(leading_number("3mm/h"), Some(3.0));
		assert_eq!(leading_number(".25"), Some(0.25));
		assert_eq!(leading_number("-1"), Some(-1.0));
		assert_eq!(leading_number("2e1x"), Some(20.0));
		assert_eq!(leading_number("7e"), Some(7.0));
		for text in ["", "mm", "-", ".", "n/a", "inf", "infinity", "NaN", "1e999"] {
			assert_eq!(leading_number(text), None, "{text:?}");
		}
	}

	#[test]
	fn test_rain_sensor_reading_with_unit_confirms() {
		let config = OverlayConfig {
			rain_sensor_entity: Some("sensor.rain_gauge".into()),
			require_rain_confirmation: true,
			..OverlayConfig::default()
		};

		let wet = snapshot().with("sensor.rain_gauge", "0.5 mm");
		let host = SnapshotHost::new(Some(&wet), &config, "/");
		assert_eq!(host.current_weather_category().unwrap(), WeatherCategory::Rainy);

		for reading in ["inf", "infinity", "-0.5 mm"] {
			let dry = snapshot().with("sensor.rain_gauge", reading);
			let host = SnapshotHost::new(Some(&dry), &config, "/");
			assert_eq!(
				host.current_weather_category().unwrap(),
				WeatherCategory::Cloudy,
				"{reading}"
			);
		}
	}

	#[test]
	fn test_rain_confirmation_ignored_unless_required() {
		let config = OverlayConfig {
			rain_sensor_entity: Some("sensor.rain_gauge".into()),
			..OverlayConfig::default()
		};
		let dry = snapshot().with("sensor.rain_gauge", "0");
		let host = SnapshotHost::new(Some(&dry), &config, "/");
		assert_eq!(host.current_weather_category().unwrap(), WeatherCategory::Rainy);
	}

	#[test]
	fn test_toggle() {
		let config = OverlayConfig::default();
		let toggle = "input_boolean.weather_overlay";

		let on = snapshot().with(toggle, "on");
		assert!(SnapshotHost::new(Some(&on), &config, "/").is_overlay_enabled());

		let off = snapshot().with(toggle, "off");
		assert!(!SnapshotHost::new(Some(&off), &config, "/").is_overlay_enabled());

		let absent = snapshot();
		assert!(SnapshotHost::new(Some(&absent), &config, "/").is_overlay_enabled());

		let unconfigured = OverlayConfig {
			toggle_entity: None,
			..OverlayConfig::default()
		};
		assert!(SnapshotHost::new(Some(&off), &unconfigured, "/").is_overlay_enabled());
	}

	#[test]
	fn test_dashboard_filter() {
		assert!(dashboard_permitted("/anything/here", &[]));

		let home = dashboards(&["home"]);
		assert!(dashboard_permitted("/", &home));
		assert!(!dashboard_permitted("/", &dashboards(&["weather"])));

		let lovelace = dashboards(&["lovelace"]);
		assert!(dashboard_permitted("/lovelace", &lovelace));
		assert!(!dashboard_permitted("/lovelace/energy", &lovelace));
		assert!(dashboard_permitted("/lovelace/energy", &dashboards(&["energy"])));

		let weather = dashboards(&["home", "weather"]);
		assert!(dashboard_permitted("/dashboard-weather/weather", &weather));
		assert!(dashboard_permitted("/home/0", &weather));
		assert!(!dashboard_permitted("/config/integrations", &weather));
	}
}
