//! Draw recipes for particles and the full-screen effects.
//!
//! Every recipe leaves the surface with alpha 1 and no shadow so the next
//! particle starts from a clean brush.

use std::f64::consts::PI;

use rand::Rng;

use super::effects::EffectConfig;
use super::particles::{Body, Bounds, Particle};
use super::surface::{ColorStop, LinearGradient, Paint, RadialGradient, Surface};
use super::theme::{
	CLOUD_EDGE, Color, FOG_EDGE, LIGHTNING_EDGE, LIGHTNING_WASH, STAR_GLOW, SUN_GLOW_STOPS,
};
use super::types::EffectKind;

/// Radius of the sunny glow in logical pixels.
pub const SUN_GLOW_RADIUS: f64 = 500.0;

/// Height of a fog band in logical pixels.
const FOG_BAND_HEIGHT: f64 = 300.0;

/// Streak length per unit of drop size.
const STREAK_LENGTH: f64 = 4.0;

/// Draws one particle according to its variant.
pub fn draw_particle<S, R>(surface: &mut S, particle: &Particle, config: &EffectConfig, rng: &mut R)
where
	S: Surface + ?Sized,
	R: Rng + ?Sized,
{
	let color = config.color_or_default();

	match (&particle.body, particle.kind) {
		(Body::Star { size, opacity, .. }, _) => {
			draw_star(surface, particle.x, particle.y, *size, *opacity, color)
		}
		(
			Body::Cloud {
				radius,
				opacity,
				puffs,
				..
			},
			_,
		) => draw_cloud(surface, particle.x, particle.y, *radius, *opacity, puffs, color),
		(
			Body::Fog {
				band_width_units,
				opacity,
				..
			},
			_,
		) => draw_fog_band(
			surface,
			particle.x,
			particle.y,
			*band_width_units,
			*opacity,
			color,
		),
		(Body::Falling { size, sway, .. }, EffectKind::Mixed) => {
			// Coin flip per frame interleaves flakes and streaks.
			if rng.gen_bool(0.5) {
				surface.fill_circle(particle.x, particle.y, *size, &Paint::Solid(color));
			} else {
				surface.stroke_line(
					(particle.x, particle.y),
					(particle.x + sway, particle.y + size * STREAK_LENGTH),
					size * 0.7,
					color,
				);
			}
		}
		(Body::Falling { size, sway, .. }, EffectKind::Rain) => {
			let length = size * STREAK_LENGTH * config.length_multiplier();
			surface.stroke_line(
				(particle.x, particle.y),
				(particle.x + sway, particle.y + length),
				*size,
				color,
			);
		}
		(Body::Falling { size, .. }, _) => {
			surface.fill_circle(particle.x, particle.y, *size, &Paint::Solid(color));
		}
	}
}

fn draw_star<S: Surface + ?Sized>(
	surface: &mut S,
	x: f64,
	y: f64,
	size: f64,
	opacity: f64,
	color: Color,
) {
	if opacity <= 0.0 {
		return;
	}
	surface.set_alpha(opacity * 0.7);
	surface.set_shadow(4.0 + opacity * 3.0, STAR_GLOW);
	surface.fill_circle(x, y, size * 0.8, &Paint::Solid(color));
	surface.set_shadow(0.0, STAR_GLOW);
	surface.set_alpha(1.0);
}

fn draw_cloud<S: Surface + ?Sized>(
	surface: &mut S,
	x: f64,
	y: f64,
	radius: f64,
	opacity: f64,
	puffs: &[f64],
	color: Color,
) {
	let count = puffs.len() as f64;
	surface.set_alpha(opacity * 0.6);

	for (i, puff) in puffs.iter().enumerate() {
		let angle = (i as f64 / count) * PI * 2.0;
		let (px, py) = (
			x + angle.cos() * radius * 0.4,
			y + angle.sin() * radius * 0.25,
		);
		let puff_radius = radius * puff;

		let paint = Paint::Radial(RadialGradient {
			x: px,
			y: py,
			inner_radius: 0.0,
			outer_radius: puff_radius,
			stops: vec![
				ColorStop::new(0.0, color),
				ColorStop::new(0.6, color.with_alpha(0.02)),
				ColorStop::new(1.0, CLOUD_EDGE),
			],
		});
		surface.fill_circle(px, py, puff_radius, &paint);
	}

	surface.set_alpha(1.0);
}

fn draw_fog_band<S: Surface + ?Sized>(
	surface: &mut S,
	x: f64,
	y: f64,
	band_width_units: f64,
	opacity: f64,
	color: Color,
) {
	let paint = Paint::Linear(LinearGradient {
		x0: x - band_width_units,
		y0: 0.0,
		x1: x + band_width_units,
		y1: 0.0,
		stops: vec![
			ColorStop::new(0.0, FOG_EDGE),
			ColorStop::new(0.5, color),
			ColorStop::new(1.0, FOG_EDGE),
		],
	});

	surface.set_alpha(opacity * 0.2);
	surface.fill_rect(
		x - band_width_units,
		y - 15.0,
		band_width_units * 2000.0,
		FOG_BAND_HEIGHT,
		&paint,
	);
	surface.set_alpha(1.0);
}

/// Warm glow anchored near the top-right corner.
pub fn draw_sunny_glow<S: Surface + ?Sized>(surface: &mut S, bounds: Bounds) {
	let (cx, cy) = (bounds.width * 0.9, bounds.height * 0.1);
	let paint = Paint::Radial(RadialGradient {
		x: cx,
		y: cy,
		inner_radius: 0.0,
		outer_radius: SUN_GLOW_RADIUS,
		stops: SUN_GLOW_STOPS
			.iter()
			.map(|&(offset, color)| ColorStop::new(offset, color))
			.collect(),
	});
	surface.fill_circle(cx, cy, SUN_GLOW_RADIUS, &paint);
}

/// One frame of a lightning flash at `brightness`.
///
/// The flash center jumps to a new random point in the sky every frame,
/// which reads as flicker.
pub fn draw_lightning_flash<S, R>(surface: &mut S, bounds: Bounds, brightness: f64, rng: &mut R)
where
	S: Surface + ?Sized,
	R: Rng + ?Sized,
{
	let x = rng.gen_range(0.0..1.0) * bounds.width;
	let y = rng.gen_range(0.0..1.0) * bounds.height * 0.3;
	let variation = rng.gen_range(0.0..30.0);
	let (green, blue) = (230.0 + variation, 220.0 + variation);

	// Float to u8 casts saturate, so the bright end clamps at 255.
	let tint = |r: u8, shift: f64, alpha: f64| {
		Color::rgba(r, (green - shift) as u8, (blue - shift) as u8, alpha)
	};
	let paint = Paint::Radial(RadialGradient {
		x,
		y,
		inner_radius: 0.0,
		outer_radius: bounds.width * 0.8,
		stops: vec![
			ColorStop::new(0.0, tint(255, 0.0, brightness * 0.4)),
			ColorStop::new(0.3, tint(240, 20.0, brightness * 0.25)),
			ColorStop::new(0.7, tint(200, 40.0, brightness * 0.1)),
			ColorStop::new(1.0, LIGHTNING_EDGE),
		],
	});

	surface.fill_rect(0.0, 0.0, bounds.width, bounds.height, &paint);
	surface.fill_rect(
		0.0,
		0.0,
		bounds.width,
		bounds.height,
		&Paint::Solid(LIGHTNING_WASH.with_alpha(brightness * 0.15)),
	);
}
