//! Scene controller: the active category, its population and the
//! full-screen effects, redrawn once per animation frame.
//!
//! The controller owns the drawing surface, the particle population and the
//! lightning timers. Category changes are applied synchronously, so the next
//! `tick` always reads a population that matches the new category.

use log::{debug, info, warn};
use rand_chacha::ChaCha8Rng;

use super::effects::EffectTable;
use super::error::OverlayError;
use super::lightning::LightningState;
use super::particles::{Bounds, ParticleSystem};
use super::render;
use super::surface::Surface;
use super::types::{EffectKind, WeatherCategory};

/// Simulated time per frame, in milliseconds (~60 fps).
pub const FRAME_INTERVAL_MS: f64 = 16.0;

/// What `set_active_category` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryChange {
	/// Same category, loop already running. Nothing touched.
	Unchanged,
	/// Same category, loop was stopped and has been restarted.
	Restarted,
	/// New category applied with this many particles.
	Applied(usize),
	/// New category has no effect; the surface stays blank.
	Unconfigured,
}

/// Result of one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
	/// Frame drawn, schedule the next one.
	Continue,
	/// The loop is stopped; do not reschedule.
	Stopped,
	/// The surface went away and the loop stopped itself.
	Halted,
}

/// Owned state of one overlay scene.
pub struct SceneController<S: Surface> {
	surface: S,
	effects: EffectTable,
	category: Option<WeatherCategory>,
	population: ParticleSystem,
	lightning: LightningState,
	bounds: Bounds,
	running: bool,
	rng: ChaCha8Rng,
}

impl<S: Surface> SceneController<S> {
	pub fn new(surface: S, effects: EffectTable, bounds: Bounds, mut rng: ChaCha8Rng) -> Self {
		let lightning = LightningState::new(&mut rng);
		Self {
			surface,
			effects,
			category: None,
			population: ParticleSystem::default(),
			lightning,
			bounds,
			running: false,
			rng,
		}
	}

	pub fn category(&self) -> Option<&WeatherCategory> {
		self.category.as_ref()
	}

	pub fn population(&self) -> &ParticleSystem {
		&self.population
	}

	pub fn lightning(&self) -> &LightningState {
		&self.lightning
	}

	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn surface(&self) -> &S {
		&self.surface
	}

	/// Replace the population with fresh particles for `category`.
	///
	/// Returns the new population size. Categories with `max_particles == 0`
	/// yield an empty population.
	pub fn populate(&mut self, category: &WeatherCategory) -> Result<usize, OverlayError> {
		let Some(config) = self.effects.get(category) else {
			self.population.clear();
			return Err(OverlayError::ConfigurationAbsent(category.to_string()));
		};
		self.population.populate(config, self.bounds, &mut self.rng);
		debug!(
			"weather-overlay: initialized {} particles for {}",
			self.population.len(),
			category
		);
		Ok(self.population.len())
	}

	/// Start the frame loop, repopulating the current category.
	///
	/// An unconfigured category still starts the loop; it just draws
	/// nothing, and the lookup error is returned.
	pub fn start(&mut self) -> Result<(), OverlayError> {
		if self.running {
			return Ok(());
		}
		self.running = true;
		info!("weather-overlay: animation started");
		match self.category.clone() {
			Some(category) => self.populate(&category).map(|_| ()),
			None => Ok(()),
		}
	}

	/// Stop scheduling frames. A frame already in flight still completes.
	pub fn stop(&mut self) {
		if self.running {
			self.running = false;
			info!("weather-overlay: animation stopped");
		}
	}

	pub fn set_visible(&mut self, visible: bool) {
		self.surface.set_visible(visible);
	}

	/// Apply a new weather category.
	///
	/// Resets lightning, repopulates and (re)starts the loop. Calling it
	/// again with the current category is a no-op while the loop runs.
	pub fn set_active_category(&mut self, category: WeatherCategory) -> CategoryChange {
		if self.category.as_ref() == Some(&category) {
			if self.running {
				return CategoryChange::Unchanged;
			}
			return match self.start() {
				Ok(()) => {
					info!("weather-overlay: animation restarted for {category}");
					CategoryChange::Restarted
				}
				Err(err) => {
					self.unconfigured(&err);
					CategoryChange::Unconfigured
				}
			};
		}

		info!(
			"weather-overlay: weather changed: {} -> {}",
			self.category
				.as_ref()
				.map_or("none", WeatherCategory::as_str),
			category
		);
		self.lightning.reset(&mut self.rng);
		self.running = false;

		let change = match self.populate(&category) {
			Ok(count) => CategoryChange::Applied(count),
			Err(err) => {
				self.unconfigured(&err);
				CategoryChange::Unconfigured
			}
		};
		self.category = Some(category);
		self.running = true;
		change
	}

	/// Blank the surface and list the states that do have an effect.
	fn unconfigured(&mut self, err: &OverlayError) {
		self.surface.clear();
		let mut supported: Vec<&str> = self
			.effects
			.categories()
			.map(WeatherCategory::as_str)
			.collect();
		supported.sort_unstable();
		warn!("weather-overlay: {err}, supported states: {}", supported.join(", "));
	}

	/// Follow a viewport change. Particles keep their positions and drift
	/// back into frame on their own.
	pub fn on_resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
		self.bounds = Bounds::new(width, height);
		self.surface.resize(width, height, pixel_ratio);
		debug!("weather-overlay: canvas resized to {width}x{height} @{pixel_ratio}x");
	}

	/// Draw one frame.
	pub fn tick(&mut self) -> TickOutcome {
		if !self.running {
			return TickOutcome::Stopped;
		}
		if !self.surface.is_available() {
			warn!(
				"weather-overlay: {}, stopping animation",
				OverlayError::SurfaceUnavailable
			);
			self.running = false;
			return TickOutcome::Halted;
		}

		self.surface.clear();

		let Some(config) = self.category.as_ref().and_then(|c| self.effects.get(c)) else {
			return TickOutcome::Continue;
		};

		if config.kind == EffectKind::Sunny {
			render::draw_sunny_glow(&mut self.surface, self.bounds);
		}

		for particle in &mut self.population.particles {
			particle.update(config, self.bounds, &mut self.rng);
			render::draw_particle(&mut self.surface, particle, config, &mut self.rng);
		}

		if config.has_lightning() {
			if let Some(brightness) = self.lightning.advance(FRAME_INTERVAL_MS, &mut self.rng) {
				render::draw_lightning_flash(&mut self.surface, self.bounds, brightness, &mut self.rng);
			}
		}

		TickOutcome::Continue
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::super::effects::EffectConfig;
	use super::super::lightning::{FlashProfile, LightningPhase};
	use super::super::surface::recording::{DrawOp, RecordingSurface};
	use super::super::surface::Paint;
	use super::*;

	fn scene(seed: u64) -> SceneController<RecordingSurface> {
		SceneController::new(
			RecordingSurface::new(),
			EffectTable::builtin(),
			Bounds::new(1024.0, 768.0),
			ChaCha8Rng::seed_from_u64(seed),
		)
	}

	#[test]
	fn test_populate_matches_every_configured_category() {
		let mut scene = scene(1);
		let table = EffectTable::builtin();
		for category in WeatherCategory::KNOWN {
			let config = table.get(&category).unwrap();
			let count = scene.populate(&category).unwrap();
			assert_eq!(count, config.max_particles, "{category}");
			assert!(
				scene
					.population()
					.particles
					.iter()
					.all(|p| p.kind == config.kind)
			);
		}
	}

	#[test]
	fn test_populate_unknown_category_empties_population() {
		let mut scene = scene(2);
		scene.populate(&WeatherCategory::Rainy).unwrap();
		let err = scene.populate(&WeatherCategory::from("hurricane")).unwrap_err();
		assert!(matches!(err, OverlayError::ConfigurationAbsent(ref c) if c == "hurricane"));
		assert!(scene.population().is_empty());
	}

	#[test]
	fn test_category_change_repopulates_and_resets_lightning() {
		let mut scene = scene(3);
		assert_eq!(
			scene.set_active_category(WeatherCategory::LightningRainy),
			CategoryChange::Applied(50)
		);
		scene.lightning.strike(FlashProfile::Long, FRAME_INTERVAL_MS, &mut scene.rng);
		scene.tick();
		assert!(scene.lightning().is_flashing());

		assert_eq!(
			scene.set_active_category(WeatherCategory::Snowy),
			CategoryChange::Applied(40)
		);
		assert!(scene.is_running());
		assert_eq!(scene.lightning().phase(), LightningPhase::Idle);
		assert_eq!(scene.lightning().brightness(), 0.0);
		assert_eq!(scene.lightning().timer_ms(), 0.0);
		assert!(
			scene
				.population()
				.particles
				.iter()
				.all(|p| p.kind == EffectKind::Snow)
		);
	}

	#[test]
	fn test_same_category_twice_is_idempotent() {
		let mut scene = scene(4);
		scene.set_active_category(WeatherCategory::Cloudy);
		let spawned = scene.population().particles.clone();
		for _ in 0..3 {
			scene.tick();
		}
		let moved = scene.population().particles.clone();
		assert_ne!(spawned, moved);

		assert_eq!(
			scene.set_active_category(WeatherCategory::Cloudy),
			CategoryChange::Unchanged
		);
		assert_eq!(scene.population().particles, moved);
	}

	#[test]
	fn test_same_category_does_not_reset_lightning_timer() {
		let mut scene = scene(5);
		scene.set_active_category(WeatherCategory::Lightning);
		for _ in 0..20 {
			scene.tick();
		}
		let timer = scene.lightning().timer_ms();
		assert_eq!(
			scene.set_active_category(WeatherCategory::Lightning),
			CategoryChange::Unchanged
		);
		assert_eq!(scene.lightning().timer_ms(), timer);
	}

	#[test]
	fn test_pouring_population_draws_long_streaks() {
		let mut scene = scene(6);
		assert_eq!(
			scene.set_active_category(WeatherCategory::Pouring),
			CategoryChange::Applied(50)
		);
		scene.tick();

		let frame = scene.surface().last_frame();
		let lines: Vec<_> = frame
			.iter()
			.filter_map(|op| match op {
				DrawOp::Line { from, to, width, .. } => Some((*from, *to, *width)),
				_ => None,
			})
			.collect();
		assert_eq!(lines.len(), 50);
		for (from, to, width) in lines {
			let length = to.1 - from.1;
			assert!((length - width * 16.0).abs() < 1e-9);
		}
	}

	#[test]
	fn test_sunny_frame_is_glow_only() {
		let mut scene = scene(7);
		assert_eq!(
			scene.set_active_category(WeatherCategory::Sunny),
			CategoryChange::Applied(0)
		);
		for _ in 0..3 {
			assert_eq!(scene.tick(), TickOutcome::Continue);
			let frame = scene.surface().last_frame();
			assert_eq!(frame.len(), 1);
			let DrawOp::Circle {
				x,
				y,
				radius,
				paint: Paint::Radial(_),
			} = &frame[0]
			else {
				panic!("expected the glow")
			};
			assert!((*x - 1024.0 * 0.9).abs() < 1e-9);
			assert!((*y - 768.0 * 0.1).abs() < 1e-9);
			assert_eq!(*radius, render::SUN_GLOW_RADIUS);
		}
		assert!(scene.population().is_empty());
	}

	#[test]
	fn test_unknown_category_blanks_scene_but_keeps_loop() {
		let mut scene = scene(8);
		scene.set_active_category(WeatherCategory::Rainy);
		scene.tick();

		assert_eq!(
			scene.set_active_category(WeatherCategory::from("hurricane")),
			CategoryChange::Unconfigured
		);
		assert!(scene.population().is_empty());
		assert!(scene.is_running());
		assert_eq!(scene.surface().ops.last(), Some(&DrawOp::Clear));

		assert_eq!(scene.tick(), TickOutcome::Continue);
		assert!(scene.surface().last_frame().is_empty());

		assert_eq!(
			scene.set_active_category(WeatherCategory::Hail),
			CategoryChange::Applied(5)
		);
	}

	#[test]
	fn test_lightning_storm_flashes_and_returns_to_idle() {
		let mut scene = scene(9);
		scene.set_active_category(WeatherCategory::Lightning);

		let mut flashed_frames = 0;
		let mut strikes = 0;
		let mut was_flashing = false;
		// 20 s of frames covers several strikes.
		for _ in 0..1250 {
			scene.tick();
			let flashing = scene.lightning().is_flashing();
			if flashing && !was_flashing {
				strikes += 1;
			}
			was_flashing = flashing;
			if RecordingSurface::shapes(scene.surface().last_frame()) > 0 {
				assert_eq!(RecordingSurface::shapes(scene.surface().last_frame()), 2);
				flashed_frames += 1;
			}
		}
		assert!(strikes >= 4, "only {strikes} strikes");
		assert!(flashed_frames > 0);
	}

	#[test]
	fn test_stop_and_restart_repopulates() {
		let mut scene = scene(10);
		scene.set_active_category(WeatherCategory::Rainy);
		scene.stop();
		assert_eq!(scene.tick(), TickOutcome::Stopped);

		let stale = scene.population().particles.clone();
		assert_eq!(
			scene.set_active_category(WeatherCategory::Rainy),
			CategoryChange::Restarted
		);
		assert!(scene.is_running());
		assert_eq!(scene.population().len(), 50);
		assert_ne!(scene.population().particles, stale);
	}

	#[test]
	fn test_restarting_unconfigured_category_reports_it() {
		let mut scene = scene(14);
		scene.set_active_category(WeatherCategory::from("hurricane"));
		scene.stop();

		assert_eq!(
			scene.set_active_category(WeatherCategory::from("hurricane")),
			CategoryChange::Unconfigured
		);
		assert!(scene.is_running());
		assert!(scene.population().is_empty());
		assert_eq!(scene.surface().ops.last(), Some(&DrawOp::Clear));
		assert_eq!(scene.tick(), TickOutcome::Continue);
		assert!(scene.surface().last_frame().is_empty());
	}

	#[test]
	fn test_lightning_rain_draws_flash_over_rain() {
		let mut scene = scene(15);
		assert_eq!(
			scene.set_active_category(WeatherCategory::LightningRainy),
			CategoryChange::Applied(50)
		);

		let mut flash_frames = 0;
		// 20 s of frames covers several strikes.
		for _ in 0..1250 {
			assert_eq!(scene.tick(), TickOutcome::Continue);
			let frame = scene.surface().last_frame();
			let lines = frame
				.iter()
				.filter(|op| matches!(op, DrawOp::Line { .. }))
				.count();
			let rects: Vec<usize> = frame
				.iter()
				.enumerate()
				.filter(|(_, op)| matches!(op, DrawOp::Rect { .. }))
				.map(|(i, _)| i)
				.collect();
			assert_eq!(lines, 50);
			if rects.is_empty() {
				continue;
			}
			assert_eq!(rects.len(), 2);
			let last_line = frame
				.iter()
				.rposition(|op| matches!(op, DrawOp::Line { .. }))
				.unwrap();
			assert!(rects[0] > last_line, "flash must be drawn over the rain");
			flash_frames += 1;
		}
		assert!(flash_frames > 0);
		assert_eq!(scene.population().len(), 50);
	}

	#[test]
	fn test_lost_surface_halts_loop() {
		let mut scene = scene(11);
		scene.set_active_category(WeatherCategory::Snowy);
		assert_eq!(scene.tick(), TickOutcome::Continue);

		scene.surface.available = false;
		assert_eq!(scene.tick(), TickOutcome::Halted);
		assert!(!scene.is_running());
		assert_eq!(scene.tick(), TickOutcome::Stopped);
	}

	#[test]
	fn test_resize_keeps_particle_positions() {
		let mut scene = scene(12);
		scene.set_active_category(WeatherCategory::Cloudy);
		let before = scene.population().particles.clone();

		scene.on_resize(400.0, 300.0, 2.0);

		assert_eq!(scene.bounds(), Bounds::new(400.0, 300.0));
		assert_eq!(scene.population().particles, before);
		assert_eq!(
			scene.surface().ops.last(),
			Some(&DrawOp::Resize {
				width: 400.0,
				height: 300.0,
				pixel_ratio: 2.0,
			})
		);
	}

	#[test]
	fn test_custom_table_drives_population() {
		let mut table = EffectTable::empty();
		table.insert(
			WeatherCategory::from("hurricane"),
			EffectConfig {
				max_particles: 3,
				speed_range: (1.0, 2.0),
				size_range: (1.0, 2.0),
				..EffectConfig::bare(EffectKind::Rain)
			},
		);
		let mut scene = SceneController::new(
			RecordingSurface::new(),
			table,
			Bounds::new(100.0, 100.0),
			ChaCha8Rng::seed_from_u64(13),
		);
		assert_eq!(
			scene.set_active_category(WeatherCategory::from("hurricane")),
			CategoryChange::Applied(3)
		);
		assert_eq!(
			scene.set_active_category(WeatherCategory::Rainy),
			CategoryChange::Unconfigured
		);
	}
}
