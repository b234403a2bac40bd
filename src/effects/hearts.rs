use super::{between, either_sign, falling_start, fell_out, pick, wrap_horizontally, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::{Bounds, Point};
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;
use std::f32::consts::TAU;

const HEART_COLORS: [Rgb; 4] = [
    Rgb(255, 105, 180), // Hot pink
    Rgb(255, 20, 147),  // Deep pink
    Rgb(255, 182, 193), // Light pink
    Rgb(220, 20, 60),   // Crimson
];

/// Outline samples of the classic parametric heart.
const OUTLINE_SAMPLES: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Heart {
    pub sway_phase: f32,
    pub color: Rgb,
}

pub struct Hearts;

impl EffectDefinition for Hearts {
    fn id(&self) -> EffectId {
        EffectId::Hearts
    }

    fn default_count(&self) -> usize {
        30
    }

    fn spawn(&self, bounds: Bounds, _color: Rgb, placement: Placement) -> Particle {
        let size = between(10.0, 25.0);
        let body = Body {
            x: between(0.0, bounds.width),
            y: falling_start(bounds, size, placement),
            vx: between(-0.3, 0.3),
            vy: between(0.5, 1.8),
            spin: either_sign() * between(0.005, 0.02),
            size,
            opacity: between(0.5, 0.9),
            ..Body::default()
        };
        Particle::new(
            body,
            Heart {
                sway_phase: between(0.0, TAU),
                color: pick(&HEART_COLORS),
            },
        )
    }

    fn step(&self, particle: &mut Particle, bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Heart(heart), .. } = particle else {
            return Fate::Recycle;
        };

        heart.sway_phase = (heart.sway_phase + 0.02) % TAU;
        body.advance();
        body.x += heart.sway_phase.sin() * 0.5;
        wrap_horizontally(body, bounds);

        if fell_out(body, bounds) { Fate::Recycle } else { Fate::Live }
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Heart(heart) = &particle.kind else {
            return;
        };
        let body = particle.body;
        let scale = body.size / 32.0;
        let outline: Vec<Point> = (0..OUTLINE_SAMPLES)
            .map(|i| {
                let t = i as f32 / OUTLINE_SAMPLES as f32 * TAU;
                let x = 16.0 * t.sin().powi(3);
                let y = -(13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos());
                Point::new(x * scale, y * scale).rotated(body.rotation, body.position())
            })
            .collect();

        surface.with_opacity(body.opacity, &mut |s| s.fill_polygon(&outline, heart.color));
    }
}
