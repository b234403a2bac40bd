use super::{between, clamp_into, pick, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::Bounds;
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;
use std::f32::consts::TAU;

const STAR_COLORS: [Rgb; 3] = [
    Rgb(255, 255, 255),
    Rgb(255, 244, 214), // Warm white
    Rgb(202, 225, 255), // Blue-white
];

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub twinkle_phase: f32,
    pub twinkle_speed: f32,
    pub tips: u8,
    pub color: Rgb,
}

pub struct Stars;

impl EffectDefinition for Stars {
    fn id(&self) -> EffectId {
        EffectId::Stars
    }

    fn spawn(&self, bounds: Bounds, _color: Rgb, _placement: Placement) -> Particle {
        let body = Body {
            x: between(0.0, bounds.width),
            y: between(0.0, bounds.height),
            rotation: between(0.0, TAU),
            spin: between(-0.002, 0.002),
            size: between(1.5, 4.0),
            opacity: between(0.6, 1.0),
            ..Body::default()
        };
        Particle::new(
            body,
            Star {
                twinkle_phase: between(0.0, TAU),
                twinkle_speed: between(0.02, 0.08),
                tips: if fastrand::bool() { 4 } else { 5 },
                color: pick(&STAR_COLORS),
            },
        )
    }

    fn step(&self, particle: &mut Particle, bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Star(star), .. } = particle else {
            return Fate::Recycle;
        };

        star.twinkle_phase = (star.twinkle_phase + star.twinkle_speed) % TAU;
        body.advance();
        clamp_into(body, bounds);

        Fate::Live
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Star(star) = &particle.kind else {
            return;
        };
        let body = particle.body;
        let twinkle = 0.3 + 0.7 * (star.twinkle_phase.sin() * 0.5 + 0.5).powf(2.0);
        surface.with_opacity(body.opacity * twinkle, &mut |s| {
            s.fill_star(body.position(), star.tips as usize, body.size * 2.0, body.size * 0.6, body.rotation, star.color)
        });
    }
}
