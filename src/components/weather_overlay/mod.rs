//! Weather-driven particle overlay.
//!
//! Renders an ambient full-screen animation whose style follows the weather
//! entity of a Home Assistant instance:
//! - Rain, snow, hail and mixed precipitation falling into view
//! - Drifting cloud puffs and fog bands
//! - A twinkling starfield for clear nights
//! - A corner sun glow and randomized lightning flashes
//!
//! The engine (`particles`, `lightning`, `render`, `state`) draws through the
//! [`surface::Surface`] trait and never touches the DOM; `canvas`, `hass` and
//! `component` bind it to the browser.
//!
//! # Example
//!
//! ```ignore
//! use weather_overlay::{OverlayConfig, WeatherOverlay};
//!
//! view! { <WeatherOverlay config=OverlayConfig::default() /> }
//! ```

mod canvas;
mod component;
pub mod config;
pub mod effects;
pub mod error;
mod hass;
pub mod host;
pub mod lightning;
pub mod particles;
pub mod poll;
pub mod render;
pub mod state;
pub mod surface;
pub mod theme;
pub mod types;

pub use component::WeatherOverlay;
pub use config::OverlayConfig;
pub use effects::{EffectConfig, EffectTable};
pub use error::OverlayError;
pub use state::SceneController;
pub use types::{EffectKind, WeatherCategory};
