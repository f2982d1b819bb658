//! Periodic evaluate-and-apply of the host's weather state.

use log::{debug, error, info, warn};

use super::host::WeatherHost;
use super::state::{CategoryChange, SceneController};
use super::surface::Surface;

/// What one evaluation did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
	/// Too soon after the previous evaluation.
	Throttled,
	/// Overlay switched off or on a filtered view; canvas hidden, loop stopped.
	Hidden,
	/// Host state unavailable; last category kept.
	Skipped,
	Applied(CategoryChange),
}

/// Throttles host evaluations and forces one after navigation.
#[derive(Clone, Debug)]
pub struct Poller {
	min_interval_ms: f64,
	last_update_ms: Option<f64>,
	last_path: Option<String>,
}

impl Poller {
	pub fn new(min_interval_ms: f64) -> Self {
		Self {
			min_interval_ms,
			last_update_ms: None,
			last_path: None,
		}
	}

	/// Record the current URL path. Returns `true` when it changed, in
	/// which case the next evaluation runs regardless of the throttle.
	pub fn observe_path(&mut self, path: &str) -> bool {
		match self.last_path.as_deref() {
			Some(last) if last == path => false,
			Some(_) => {
				debug!("weather-overlay: dashboard changed to {path}, re-checking");
				self.last_path = Some(path.to_string());
				self.last_update_ms = None;
				true
			}
			None => {
				self.last_path = Some(path.to_string());
				false
			}
		}
	}

	/// Whether an evaluation at `now_ms` would run. Callers check this
	/// before gathering host state.
	pub fn is_due(&self, now_ms: f64) -> bool {
		self.last_update_ms
			.is_none_or(|last| now_ms - last >= self.min_interval_ms)
	}

	/// Read the host state and apply it to the scene.
	pub fn evaluate<S, H>(&mut self, now_ms: f64, host: &H, scene: &mut SceneController<S>) -> PollOutcome
	where
		S: Surface,
		H: WeatherHost + ?Sized,
	{
		if !self.is_due(now_ms) {
			return PollOutcome::Throttled;
		}
		self.last_update_ms = Some(now_ms);

		if !host.is_overlay_enabled() || !host.is_on_permitted_view() {
			scene.set_visible(false);
			if scene.is_running() {
				scene.stop();
				debug!("weather-overlay: animation stopped (disabled or filtered dashboard)");
			}
			return PollOutcome::Hidden;
		}
		scene.set_visible(true);

		match host.current_weather_category() {
			Ok(category) => PollOutcome::Applied(scene.set_active_category(category)),
			Err(err) => {
				warn!("weather-overlay: {err}, keeping current animation");
				PollOutcome::Skipped
			}
		}
	}
}

/// Result of one check for the host frontend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitStatus {
	Ready,
	Waiting,
	GaveUp,
}

/// Bounded wait for the host frontend to appear.
#[derive(Clone, Debug)]
pub struct HostWait {
	attempts: u32,
	max_attempts: u32,
}

impl HostWait {
	pub fn new(max_attempts: u32) -> Self {
		Self {
			attempts: 0,
			max_attempts,
		}
	}

	pub fn check(&mut self, host_present: bool) -> WaitStatus {
		self.attempts += 1;
		if host_present {
			info!("weather-overlay: Home Assistant ready after {} checks", self.attempts);
			WaitStatus::Ready
		} else if self.attempts >= self.max_attempts {
			error!(
				"weather-overlay: Home Assistant not found after {} checks, is this a Home Assistant page?",
				self.attempts
			);
			WaitStatus::GaveUp
		} else {
			WaitStatus::Waiting
		}
	}
}
