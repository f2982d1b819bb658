//! weather-overlay: Ambient weather animation for Home Assistant dashboards.
//!
//! This crate provides a WASM overlay component that reads the weather entity
//! of the surrounding Home Assistant frontend and draws matching rain, snow,
//! clouds, fog, stars, sun glow or lightning over the dashboard.

// Only linked for its `js` entropy backend.
use getrandom as _;
use leptos::prelude::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::weather_overlay::{
	EffectConfig, EffectTable, OverlayConfig, OverlayError, WeatherCategory, WeatherOverlay,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("weather-overlay: logging initialized");
}

/// Load overlay settings from a script element with id="weather-overlay-config".
/// Expected format: JSON object, every field optional.
fn load_overlay_config() -> Option<OverlayConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("weather-overlay-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match OverlayConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"weather-overlay: loaded config for {} ({} dashboards filtered)",
				config.weather_entity,
				config.enabled_dashboards.len()
			);
			Some(config)
		}
		Err(e) => {
			warn!("weather-overlay: {}, using defaults", e);
			None
		}
	}
}

/// Main application component.
/// Loads the overlay config from the DOM and mounts the overlay canvas.
#[component]
pub fn App() -> impl IntoView {
	let config = load_overlay_config().unwrap_or_default();
	log::set_max_level(config.log_level());

	view! { <WeatherOverlay config=config /> }
}
