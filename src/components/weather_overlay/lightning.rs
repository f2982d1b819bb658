//! Lightning strike state machine.
//!
//! Strikes alternate between an idle wait of 1.5–4 s and a flash whose
//! brightness decays linearly to zero over its duration. The flash itself is
//! drawn by `render::draw_lightning_flash`; this module only decides when and
//! how bright.

use rand::Rng;

/// Range of the randomized wait between strikes, in milliseconds.
pub const STRIKE_INTERVAL_MS: (f64, f64) = (1500.0, 4000.0);

/// Flash intensity profile, picked by a uniform roll on each strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashProfile {
	/// Quick, bright crack (30%).
	Short,
	/// Long, dimmer sheet flash (30%).
	Long,
	/// Everything else (40%).
	Medium,
}

impl FlashProfile {
	/// Pick a profile from a roll in `[0, 1)`.
	pub fn from_roll(roll: f64) -> Self {
		if roll < 0.3 {
			Self::Short
		} else if roll < 0.6 {
			Self::Long
		} else {
			Self::Medium
		}
	}

	pub fn duration_ms(self) -> (f64, f64) {
		match self {
			Self::Short => (150.0, 250.0),
			Self::Long => (600.0, 1000.0),
			Self::Medium => (300.0, 500.0),
		}
	}

	pub fn brightness(self) -> (f64, f64) {
		match self {
			Self::Short => (0.7, 1.0),
			Self::Long => (0.5, 0.7),
			Self::Medium => (0.6, 0.9),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightningPhase {
	Idle,
	Flashing,
}

/// Timers and brightness of the current strike.
#[derive(Clone, Debug)]
pub struct LightningState {
	phase: LightningPhase,
	/// Time spent idle since the last strike.
	timer_ms: f64,
	/// Idle time before the next strike.
	interval_ms: f64,
	remaining_ms: f64,
	brightness: f64,
	fade_per_frame: f64,
}

fn next_interval<R: Rng + ?Sized>(rng: &mut R) -> f64 {
	let (min, max) = STRIKE_INTERVAL_MS;
	min + rng.gen_range(0.0..1.0) * (max - min)
}

impl LightningState {
	pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
		Self {
			phase: LightningPhase::Idle,
			timer_ms: 0.0,
			interval_ms: next_interval(rng),
			remaining_ms: 0.0,
			brightness: 0.0,
			fade_per_frame: 0.0,
		}
	}

	/// Back to idle with nothing accumulated and a fresh interval.
	pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
		*self = Self::new(rng);
	}

	/// Advance by one frame of `frame_ms`.
	///
	/// Returns the brightness to draw this frame, or `None` when nothing
	/// should be drawn.
	pub fn advance<R: Rng + ?Sized>(&mut self, frame_ms: f64, rng: &mut R) -> Option<f64> {
		match self.phase {
			LightningPhase::Idle => {
				self.timer_ms += frame_ms;
				if self.timer_ms >= self.interval_ms {
					let profile = FlashProfile::from_roll(rng.gen_range(0.0..1.0));
					self.strike(profile, frame_ms, rng);
				}
				None
			}
			LightningPhase::Flashing => {
				self.remaining_ms -= frame_ms;
				self.brightness = (self.brightness - self.fade_per_frame).max(0.0);
				if self.remaining_ms <= 0.0 {
					self.phase = LightningPhase::Idle;
					self.timer_ms = 0.0;
					self.brightness = 0.0;
					self.interval_ms = next_interval(rng);
					None
				} else {
					Some(self.brightness)
				}
			}
		}
	}

	/// Enter the flashing phase with a randomized duration and brightness.
	pub fn strike<R: Rng + ?Sized>(&mut self, profile: FlashProfile, frame_ms: f64, rng: &mut R) {
		let (d_min, d_max) = profile.duration_ms();
		let (b_min, b_max) = profile.brightness();
		self.phase = LightningPhase::Flashing;
		self.remaining_ms = d_min + rng.gen_range(0.0..1.0) * (d_max - d_min);
		self.brightness = b_min + rng.gen_range(0.0..1.0) * (b_max - b_min);
		self.fade_per_frame = self.brightness / (self.remaining_ms / frame_ms);
	}

	pub fn phase(&self) -> LightningPhase {
		self.phase
	}

	pub fn is_flashing(&self) -> bool {
		self.phase == LightningPhase::Flashing
	}

	pub fn brightness(&self) -> f64 {
		self.brightness
	}

	pub fn timer_ms(&self) -> f64 {
		self.timer_ms
	}

	pub fn interval_ms(&self) -> f64 {
		self.interval_ms
	}

	pub fn remaining_ms(&self) -> f64 {
		self.remaining_ms
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	use super::*;

	const FRAME: f64 = 16.0;

	#[test]
	fn test_profile_rolls() {
		assert_eq!(FlashProfile::from_roll(0.0), FlashProfile::Short);
		assert_eq!(FlashProfile::from_roll(0.29), FlashProfile::Short);
		assert_eq!(FlashProfile::from_roll(0.3), FlashProfile::Long);
		assert_eq!(FlashProfile::from_roll(0.59), FlashProfile::Long);
		assert_eq!(FlashProfile::from_roll(0.6), FlashProfile::Medium);
		assert_eq!(FlashProfile::from_roll(0.99), FlashProfile::Medium);
	}

	#[test]
	fn test_new_state_is_idle_with_interval_in_range() {
		let mut rng = ChaCha8Rng::seed_from_u64(1);
		for _ in 0..50 {
			let state = LightningState::new(&mut rng);
			assert_eq!(state.phase(), LightningPhase::Idle);
			assert_eq!(state.brightness(), 0.0);
			assert!((1500.0..4000.0).contains(&state.interval_ms()));
		}
	}

	#[test]
	fn test_strikes_after_interval_elapses() {
		let mut rng = ChaCha8Rng::seed_from_u64(2);
		let mut state = LightningState::new(&mut rng);
		let frames_needed = (state.interval_ms() / FRAME).ceil() as usize;

		for _ in 0..frames_needed - 1 {
			assert_eq!(state.advance(FRAME, &mut rng), None);
			assert!(!state.is_flashing());
		}
		assert_eq!(state.advance(FRAME, &mut rng), None);
		assert!(state.is_flashing());
		assert!(state.brightness() >= 0.5);
	}

	#[test]
	fn test_every_profile_fades_to_zero_within_duration() {
		let mut rng = ChaCha8Rng::seed_from_u64(3);
		for profile in [FlashProfile::Short, FlashProfile::Long, FlashProfile::Medium] {
			for _ in 0..20 {
				let mut state = LightningState::new(&mut rng);
				state.strike(profile, FRAME, &mut rng);
				let duration = state.remaining_ms();
				let start = state.brightness();
				let (d_min, d_max) = profile.duration_ms();
				let (b_min, b_max) = profile.brightness();
				assert!((d_min..d_max).contains(&duration));
				assert!((b_min..b_max).contains(&start));

				let mut elapsed = 0.0;
				let mut last = start;
				while state.is_flashing() {
					let drawn = state.advance(FRAME, &mut rng);
					elapsed += FRAME;
					if let Some(b) = drawn {
						assert!(b < last);
						let expected = start * (1.0 - elapsed / duration);
						assert!((b - expected).abs() < 1e-9);
						last = b;
					}
					assert!(elapsed < duration + FRAME, "{profile:?} never ended");
				}
				assert_eq!(state.brightness(), 0.0);
				assert_eq!(state.timer_ms(), 0.0);
				assert!((1500.0..4000.0).contains(&state.interval_ms()));
			}
		}
	}

	#[test]
	fn test_reset_cancels_flash() {
		let mut rng = ChaCha8Rng::seed_from_u64(4);
		let mut state = LightningState::new(&mut rng);
		state.strike(FlashProfile::Long, FRAME, &mut rng);
		state.advance(FRAME, &mut rng);
		assert!(state.is_flashing());

		state.reset(&mut rng);
		assert_eq!(state.phase(), LightningPhase::Idle);
		assert_eq!(state.brightness(), 0.0);
		assert_eq!(state.timer_ms(), 0.0);
	}
}
