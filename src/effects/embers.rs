use super::{between, pick, rising_start, rose_out, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::Bounds;
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;
use std::f32::consts::TAU;

const EMBER_COLORS: [Rgb; 3] = [
    Rgb(255, 69, 0),   // Red-orange
    Rgb(255, 140, 0),  // Orange
    Rgb(255, 200, 60), // Yellow-hot
];

#[derive(Debug, Clone, PartialEq)]
pub struct Ember {
    pub flicker_phase: f32,
    pub flicker_speed: f32,
    pub color: Rgb,
}

pub struct Embers;

impl EffectDefinition for Embers {
    fn id(&self) -> EffectId {
        EffectId::Embers
    }

    fn spawn(&self, bounds: Bounds, _color: Rgb, placement: Placement) -> Particle {
        let size = between(1.0, 4.0);
        let body = Body {
            x: between(0.0, bounds.width),
            y: rising_start(bounds, size, placement),
            vx: between(-0.6, 0.6),
            vy: -between(0.5, 2.0),
            size,
            opacity: between(0.5, 1.0),
            ..Body::default()
        };
        Particle::new(
            body,
            Ember {
                flicker_phase: between(0.0, TAU),
                flicker_speed: between(0.1, 0.3),
                color: pick(&EMBER_COLORS),
            },
        )
    }

    fn step(&self, particle: &mut Particle, _bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Ember(ember), .. } = particle else {
            return Fate::Recycle;
        };

        ember.flicker_phase = (ember.flicker_phase + ember.flicker_speed) % TAU;
        body.advance();
        // Heat shimmer
        body.x += ember.flicker_phase.sin() * 0.4;

        if rose_out(body) { Fate::Recycle } else { Fate::Live }
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Ember(ember) = &particle.kind else {
            return;
        };
        let body = particle.body;
        let flicker = 0.6 + 0.4 * ember.flicker_phase.sin();
        surface.with_opacity(body.opacity * flicker, &mut |s| {
            s.with_glow(ember.color, body.size * 3.0, &mut |s| {
                s.fill_circle(body.position(), body.size, ember.color.lighten(0.3))
            })
        });
    }
}
