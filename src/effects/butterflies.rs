use super::{between, either_sign, pick, EffectDefinition, EffectId, Fate, Placement, OFFSCREEN_MARGIN};
use crate::color::Rgb;
use crate::geometry::{Bounds, Point};
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;
use std::f32::consts::TAU;

const WING_COLORS: [Rgb; 5] = [
    Rgb(255, 165, 0),   // Monarch
    Rgb(135, 206, 250), // Morpho
    Rgb(186, 85, 211),
    Rgb(255, 215, 0),
    Rgb(255, 105, 180),
];

const BODY_COLOR: Rgb = Rgb(40, 30, 20);

/// How far outside the edge a butterfly enters; inside the recycle margin.
const ENTRY_OFFSET: f32 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Butterfly {
    pub wing_phase: f32,
    pub flap_speed: f32,
    /// Vertical bobbing amplitude per tick.
    pub amplitude: f32,
    pub bob_phase: f32,
    pub color: Rgb,
}

pub struct Butterflies;

impl EffectDefinition for Butterflies {
    fn id(&self) -> EffectId {
        EffectId::Butterflies
    }

    fn default_count(&self) -> usize {
        15
    }

    fn spawn(&self, bounds: Bounds, _color: Rgb, placement: Placement) -> Particle {
        let direction = either_sign();
        let x = match placement {
            Placement::Scattered => between(0.0, bounds.width),
            Placement::Entering if direction > 0.0 => -ENTRY_OFFSET,
            Placement::Entering => bounds.width + ENTRY_OFFSET,
        };
        let body = Body {
            x,
            y: between(bounds.height * 0.1, bounds.height * 0.9),
            vx: direction * between(0.8, 2.0),
            vy: between(-0.3, 0.3),
            size: between(8.0, 14.0),
            opacity: between(0.8, 1.0),
            ..Body::default()
        };
        Particle::new(
            body,
            Butterfly {
                wing_phase: between(0.0, TAU),
                flap_speed: between(0.2, 0.4),
                amplitude: between(0.5, 1.5),
                bob_phase: between(0.0, TAU),
                color: pick(&WING_COLORS),
            },
        )
    }

    fn step(&self, particle: &mut Particle, bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Butterfly(fly), .. } = particle else {
            return Fate::Recycle;
        };

        fly.wing_phase = (fly.wing_phase + fly.flap_speed) % TAU;
        fly.bob_phase = (fly.bob_phase + 0.05) % TAU;
        body.advance();
        body.y += fly.bob_phase.sin() * fly.amplitude;
        // Lean into the bob
        body.rotation = fly.bob_phase.cos() * 0.2;

        let outside = body.x < -OFFSCREEN_MARGIN
            || body.x > bounds.width + OFFSCREEN_MARGIN
            || body.y < -OFFSCREEN_MARGIN
            || body.y > bounds.height + OFFSCREEN_MARGIN;
        if outside { Fate::Recycle } else { Fate::Live }
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Butterfly(fly) = &particle.kind else {
            return;
        };
        let body = particle.body;
        let flap = 0.2 + 0.8 * fly.wing_phase.sin().abs();
        let size = body.size;
        let at = |dx: f32, dy: f32| Point::new(dx, dy).rotated(body.rotation, body.position());
        let lower = fly.color.lerp(Rgb::WHITE, 0.2);

        surface.with_opacity(body.opacity, &mut |s| {
            s.fill_ellipse(at(-size * 0.5 * flap, -size * 0.1), size * 0.6 * flap, size * 0.45, body.rotation, fly.color);
            s.fill_ellipse(at(size * 0.5 * flap, -size * 0.1), size * 0.6 * flap, size * 0.45, body.rotation, fly.color);
            s.fill_ellipse(at(-size * 0.35 * flap, size * 0.3), size * 0.4 * flap, size * 0.3, body.rotation, lower);
            s.fill_ellipse(at(size * 0.35 * flap, size * 0.3), size * 0.4 * flap, size * 0.3, body.rotation, lower);
            s.fill_ellipse(body.position(), size * 0.12, size * 0.5, body.rotation, BODY_COLOR);
        });
    }
}
