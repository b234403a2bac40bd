use super::{between, rising_start, rose_out, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::{Bounds, Point};
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;
use std::f32::consts::TAU;

const HALO: Rgb = Rgb(255, 160, 40);
const FLAME: Rgb = Rgb(255, 230, 150);
const CLAY: Rgb = Rgb(150, 75, 30);

#[derive(Debug, Clone, PartialEq)]
pub struct Diya {
    pub flicker_phase: f32,
    pub flicker_speed: f32,
}

/// Floating oil lamps drifting upward.
pub struct Diyas;

impl EffectDefinition for Diyas {
    fn id(&self) -> EffectId {
        EffectId::Diyas
    }

    fn spawn(&self, bounds: Bounds, _color: Rgb, placement: Placement) -> Particle {
        let size = between(6.0, 12.0);
        let body = Body {
            x: between(0.0, bounds.width),
            y: rising_start(bounds, size, placement),
            vx: between(-0.2, 0.2),
            vy: -between(0.3, 0.9),
            size,
            opacity: between(0.7, 1.0),
            ..Body::default()
        };
        Particle::new(
            body,
            Diya {
                flicker_phase: between(0.0, TAU),
                flicker_speed: between(0.05, 0.15),
            },
        )
    }

    fn step(&self, particle: &mut Particle, _bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Diya(diya), .. } = particle else {
            return Fate::Recycle;
        };

        diya.flicker_phase = (diya.flicker_phase + diya.flicker_speed) % TAU;
        body.advance();

        if rose_out(body) { Fate::Recycle } else { Fate::Live }
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Diya(diya) = &particle.kind else {
            return;
        };
        let body = particle.body;
        let flicker = 0.75 + 0.25 * diya.flicker_phase.sin();
        let flame = Point::new(body.x, body.y - body.size * 0.35);
        let bowl = Point::new(body.x, body.y + body.size * 0.3);

        surface.with_opacity(body.opacity, &mut |s| {
            s.with_opacity(0.25 * flicker, &mut |s| s.fill_circle(body.position(), body.size * 1.8, HALO));
            s.fill_ellipse(bowl, body.size * 0.6, body.size * 0.25, 0.0, CLAY);
            s.with_glow(HALO, body.size * flicker, &mut |s| {
                s.fill_ellipse(flame, body.size * 0.2, body.size * 0.4 * flicker, 0.0, FLAME)
            });
        });
    }
}
