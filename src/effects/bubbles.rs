use super::{between, rising_start, rose_out, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::{Bounds, Point};
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;
use std::f32::consts::TAU;

#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub wobble_phase: f32,
    pub wobble_speed: f32,
    pub wobble_amplitude: f32,
    pub color: Rgb,
}

/// Soap bubbles rising from below the bottom edge, tinted with the host color.
pub struct Bubbles;

impl EffectDefinition for Bubbles {
    fn id(&self) -> EffectId {
        EffectId::Bubbles
    }

    fn spawn(&self, bounds: Bounds, color: Rgb, placement: Placement) -> Particle {
        let size = between(4.0, 14.0);
        let body = Body {
            x: between(0.0, bounds.width),
            y: rising_start(bounds, size, placement),
            vy: -between(0.5, 1.5),
            size,
            opacity: between(0.3, 0.7),
            ..Body::default()
        };
        Particle::new(
            body,
            Bubble {
                wobble_phase: between(0.0, TAU),
                wobble_speed: between(0.02, 0.06),
                wobble_amplitude: between(0.3, 1.2),
                color,
            },
        )
    }

    fn step(&self, particle: &mut Particle, _bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Bubble(bubble), .. } = particle else {
            return Fate::Recycle;
        };

        bubble.wobble_phase = (bubble.wobble_phase + bubble.wobble_speed) % TAU;
        body.vx = bubble.wobble_phase.sin() * bubble.wobble_amplitude;
        body.advance();

        if rose_out(body) { Fate::Recycle } else { Fate::Live }
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Bubble(bubble) = &particle.kind else {
            return;
        };
        let body = particle.body;
        let highlight = Point::new(body.x - body.size * 0.35, body.y - body.size * 0.35);

        surface.with_opacity(body.opacity, &mut |s| {
            s.with_opacity(0.4, &mut |s| s.fill_circle(body.position(), body.size, bubble.color));
            s.fill_circle(highlight, body.size * 0.25, Rgb::WHITE);
        });
    }
}
