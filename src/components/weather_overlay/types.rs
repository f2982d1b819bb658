//! Weather categories and particle variant tags.

use std::fmt;

/// Weather state reported by the host, as a closed set of known keys.
///
/// Anything the table does not know about is kept as
/// [`WeatherCategory::Unrecognized`] so it can flow through the controller
/// like any other state instead of being dropped at the parsing boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WeatherCategory {
	Rainy,
	Pouring,
	Cloudy,
	PartlyCloudy,
	Fog,
	Snowy,
	SnowyRainy,
	Lightning,
	LightningRainy,
	ClearNight,
	Sunny,
	Windy,
	Hail,
	Exceptional,
	/// A state string with no known meaning (e.g. "hurricane").
	Unrecognized(String),
}

impl WeatherCategory {
	/// Every recognized category, in table order.
	pub const KNOWN: [WeatherCategory; 14] = [
		WeatherCategory::Rainy,
		WeatherCategory::Pouring,
		WeatherCategory::Cloudy,
		WeatherCategory::PartlyCloudy,
		WeatherCategory::Fog,
		WeatherCategory::Snowy,
		WeatherCategory::SnowyRainy,
		WeatherCategory::Lightning,
		WeatherCategory::LightningRainy,
		WeatherCategory::ClearNight,
		WeatherCategory::Sunny,
		WeatherCategory::Windy,
		WeatherCategory::Hail,
		WeatherCategory::Exceptional,
	];

	/// Map a Home Assistant weather state string onto a category.
	pub fn from_state(state: &str) -> Self {
		match state {
			"rainy" => Self::Rainy,
			"pouring" => Self::Pouring,
			"cloudy" => Self::Cloudy,
			"partlycloudy" => Self::PartlyCloudy,
			"fog" => Self::Fog,
			"snowy" => Self::Snowy,
			"snowy-rainy" => Self::SnowyRainy,
			"lightning" => Self::Lightning,
			"lightning-rainy" => Self::LightningRainy,
			"clear-night" => Self::ClearNight,
			"sunny" => Self::Sunny,
			"windy" => Self::Windy,
			"hail" => Self::Hail,
			"exceptional" => Self::Exceptional,
			other => Self::Unrecognized(other.to_string()),
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Rainy => "rainy",
			Self::Pouring => "pouring",
			Self::Cloudy => "cloudy",
			Self::PartlyCloudy => "partlycloudy",
			Self::Fog => "fog",
			Self::Snowy => "snowy",
			Self::SnowyRainy => "snowy-rainy",
			Self::Lightning => "lightning",
			Self::LightningRainy => "lightning-rainy",
			Self::ClearNight => "clear-night",
			Self::Sunny => "sunny",
			Self::Windy => "windy",
			Self::Hail => "hail",
			Self::Exceptional => "exceptional",
			Self::Unrecognized(state) => state,
		}
	}
}

impl From<&str> for WeatherCategory {
	fn from(state: &str) -> Self {
		Self::from_state(state)
	}
}

impl fmt::Display for WeatherCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Behavioral tag of an effect, copied onto every particle it spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
	Rain,
	Clouds,
	Fog,
	Snow,
	/// Snow and rain interleaved from one particle pool.
	Mixed,
	Hail,
	Stars,
	/// Full-screen strikes only, no particles.
	Lightning,
	/// Full-screen ambient glow only, no particles.
	Sunny,
}
