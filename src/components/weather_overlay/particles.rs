//! Particle kinematics for every weather variant.
//!
//! Particles never interact. Each one owns its state and is recycled in
//! place when it leaves the surface, so a population keeps the size it was
//! created with until the category changes.

use std::f64::consts::PI;

use rand::Rng;

use super::effects::EffectConfig;
use super::types::EffectKind;

/// Length of one star twinkle cycle: fade in, hold, fade out, dark.
pub const STAR_CYCLE: f64 = 6.0;

/// Phase advance per frame (about 60 frames per time unit).
pub const STAR_PHASE_STEP: f64 = 0.016;

/// Spawn height for falling particles, just above the top edge.
const SPAWN_Y: f64 = -10.0;

/// Share of the height that counts as sky for stars and new clouds.
const SKY_BAND: f64 = 0.3;

/// Logical size of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

/// Variant-specific state of a particle.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
	/// Rain, snow, hail and mixed precipitation.
	Falling {
		speed: f64,
		size: f64,
		sway: f64,
		opacity: f64,
	},
	Cloud {
		speed: f64,
		radius: f64,
		opacity: f64,
		/// Relative puff radii, each in `[0.4, 0.7)`.
		puffs: Vec<f64>,
	},
	Fog {
		speed: f64,
		/// Scales the width of the gradient band, not a radius.
		band_width_units: f64,
		opacity: f64,
	},
	Star {
		size: f64,
		phase: f64,
		opacity: f64,
	},
}

/// One simulated element.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub kind: EffectKind,
	pub body: Body,
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, (min, max): (f64, f64)) -> f64 {
	min + rng.gen_range(0.0..1.0) * (max - min)
}

/// Twinkle opacity as a pure function of the cycle phase.
///
/// Ramps 0→1 over `[0, 1)`, wobbles within `[0.8, 1]` over `[1, 3)`,
/// ramps 1→0 over `[3, 4)` and stays dark until the cycle ends.
pub fn star_opacity(phase: f64) -> f64 {
	if phase < 1.0 {
		phase.max(0.0)
	} else if phase < 3.0 {
		1.0 - ((phase - 1.0) * PI / 2.0).sin() * 0.2
	} else if phase < 4.0 {
		1.0 - (phase - 3.0)
	} else {
		0.0
	}
}

impl Particle {
	/// Create a fresh particle governed by `config`.
	pub fn spawn<R: Rng + ?Sized>(config: &EffectConfig, bounds: Bounds, rng: &mut R) -> Self {
		let mut particle = Self {
			x: 0.0,
			y: 0.0,
			kind: config.kind,
			body: Body::Star {
				size: 0.0,
				phase: 0.0,
				opacity: 0.0,
			},
		};
		particle.reset(config, bounds, rng);

		// Fog starts spread over the whole height; its reset path alone
		// would stack every band on the top edge for minutes.
		if config.kind == EffectKind::Fog {
			particle.y = rng.gen_range(0.0..1.0) * bounds.height;
		}
		particle
	}

	/// Re-randomize position and kinematics.
	pub fn reset<R: Rng + ?Sized>(&mut self, config: &EffectConfig, bounds: Bounds, rng: &mut R) {
		self.kind = config.kind;
		self.x = rng.gen_range(0.0..1.0) * bounds.width;

		match config.kind {
			EffectKind::Stars => {
				self.y = rng.gen_range(0.0..1.0) * bounds.height * SKY_BAND;
				self.body = Body::Star {
					size: 1.0 + rng.gen_range(0.0..1.0) * 1.5,
					phase: rng.gen_range(0.0..STAR_CYCLE),
					opacity: 0.0,
				};
			}
			EffectKind::Clouds => {
				self.y = rng.gen_range(0.0..1.0) * bounds.height * SKY_BAND;
				let speed = uniform(rng, config.speed_range);
				let radius = uniform(rng, config.size_range);
				let opacity = 0.5 + rng.gen_range(0.0..1.0) * 0.5;
				let puff_count = rng.gen_range(5..8);
				let puffs = (0..puff_count)
					.map(|_| 0.4 + rng.gen_range(0.0..1.0) * 0.3)
					.collect();
				self.body = Body::Cloud {
					speed,
					radius,
					opacity,
					puffs,
				};
			}
			EffectKind::Fog => {
				self.y = SPAWN_Y;
				self.body = Body::Fog {
					speed: uniform(rng, config.speed_range),
					band_width_units: uniform(rng, config.size_range),
					opacity: 0.5 + rng.gen_range(0.0..1.0) * 0.5,
				};
			}
			_ => {
				self.y = SPAWN_Y;
				self.body = Body::Falling {
					speed: uniform(rng, config.speed_range),
					size: uniform(rng, config.size_range),
					sway: (rng.gen_range(0.0..1.0) - 0.5) * config.sway_amount,
					opacity: 0.5 + rng.gen_range(0.0..1.0) * 0.5,
				};
			}
		}
	}

	/// Advance one frame.
	pub fn update<R: Rng + ?Sized>(&mut self, config: &EffectConfig, bounds: Bounds, rng: &mut R) {
		match &mut self.body {
			Body::Star { phase, opacity, .. } => {
				*phase += STAR_PHASE_STEP;
				if *phase >= STAR_CYCLE {
					*phase = 0.0;
					self.x = rng.gen_range(0.0..1.0) * bounds.width;
					self.y = rng.gen_range(0.0..1.0) * bounds.height * SKY_BAND;
				}
				*opacity = star_opacity(*phase);
			}
			Body::Cloud { speed, radius, .. } => {
				self.x += *speed;
				self.y += (self.x * 0.01).sin() * 0.2;
				if self.x > bounds.width + *radius {
					self.x = -*radius;
					self.y = rng.gen_range(0.0..1.0) * bounds.height;
				}
			}
			Body::Fog {
				speed,
				band_width_units,
				..
			} => {
				self.x += *speed;
				self.y += (self.x * 0.01).sin() * 0.02;
				if self.x > bounds.width + *band_width_units {
					self.x = -*band_width_units;
					self.y = rng.gen_range(0.0..1.0) * bounds.height;
				}
			}
			Body::Falling { speed, sway, .. } => {
				self.y += *speed;
				self.x += *sway;

				if self.y > bounds.height {
					self.reset(config, bounds, rng);
				}
				// Only x is redrawn here; y and speed carry on.
				if self.x < 0.0 || self.x > bounds.width {
					self.x = rng.gen_range(0.0..1.0) * bounds.width;
				}
			}
		}
	}

	pub fn opacity(&self) -> f64 {
		match self.body {
			Body::Falling { opacity, .. }
			| Body::Cloud { opacity, .. }
			| Body::Fog { opacity, .. }
			| Body::Star { opacity, .. } => opacity,
		}
	}
}

/// The live particle population of a scene.
#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
	pub particles: Vec<Particle>,
}

impl ParticleSystem {
	/// Replace the population with `config.max_particles` fresh particles.
	pub fn populate<R: Rng + ?Sized>(&mut self, config: &EffectConfig, bounds: Bounds, rng: &mut R) {
		self.particles.clear();
		self.particles.reserve(config.max_particles);
		for _ in 0..config.max_particles {
			self.particles.push(Particle::spawn(config, bounds, rng));
		}
	}

	pub fn clear(&mut self) {
		self.particles.clear();
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}
}
