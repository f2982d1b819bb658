//! Read-only access to the Home Assistant frontend living in the page.
//!
//! The frontend exposes its state on the `home-assistant` element as
//! `hass.states`, an object keyed by entity id. Only the `state` string of
//! the watched entities is copied out; attributes stay on the JS side.

use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use super::config::OverlayConfig;
use super::host::{EntityState, StateSnapshot};

const HOST_ELEMENT: &str = "home-assistant";

fn hass_object() -> Option<JsValue> {
	let document = web_sys::window()?.document()?;
	let element = document.query_selector(HOST_ELEMENT).ok()??;
	let hass = Reflect::get(&element, &JsValue::from_str("hass")).ok()?;
	(!hass.is_undefined() && !hass.is_null()).then_some(hass)
}

fn states_object() -> Option<Object> {
	let hass = hass_object()?;
	Reflect::get(&hass, &JsValue::from_str("states"))
		.ok()?
		.dyn_into::<Object>()
		.ok()
}

fn read_entity(states: &Object, entity_id: &str) -> Option<EntityState> {
	let entity = Reflect::get(states, &JsValue::from_str(entity_id)).ok()?;
	if entity.is_undefined() || entity.is_null() {
		return None;
	}
	let state = Reflect::get(&entity, &JsValue::from_str("state"))
		.ok()
		.and_then(|s| s.as_string())
		.unwrap_or_default();
	Some(EntityState { state })
}

/// Whether the Home Assistant frontend has finished loading its state.
pub fn is_ready() -> bool {
	hass_object().is_some()
}

/// Copy the entities named in `config` out of the frontend.
///
/// `None` when the frontend is not (or no longer) reachable.
pub fn snapshot(config: &OverlayConfig) -> Option<StateSnapshot> {
	let states = states_object()?;
	let mut snapshot = StateSnapshot::default();

	for entity_id in config.watched_entities() {
		if let Some(state) = read_entity(&states, entity_id) {
			snapshot.entities.insert(entity_id.to_string(), state);
		}
	}

	// Only needed to explain a missing weather entity.
	if snapshot.get(&config.weather_entity).is_none() {
		snapshot.weather_entity_ids = Object::keys(&states)
			.iter()
			.filter_map(|k| k.as_string())
			.filter(|k| k.starts_with("weather."))
			.collect();
	}

	Some(snapshot)
}

/// Path of the current dashboard URL.
pub fn current_path() -> String {
	web_sys::window()
		.and_then(|w| w.location().pathname().ok())
		.unwrap_or_default()
}
