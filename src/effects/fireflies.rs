use super::{between, clamp_into, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::{Bounds, Point};
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;
use std::f32::consts::TAU;

const GLOW: Rgb = Rgb(180, 255, 100);
const CORE: Rgb = Rgb(230, 255, 170);

/// Distance at which a firefly counts as having reached its target.
const ARRIVAL_RADIUS: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Firefly {
    pub target: Point,
    pub speed: f32,
    pub glow_phase: f32,
    pub glow_speed: f32,
}

fn wander_target(bounds: Bounds) -> Point {
    Point::new(between(0.0, bounds.width), between(0.0, bounds.height))
}

pub struct Fireflies;

impl EffectDefinition for Fireflies {
    fn id(&self) -> EffectId {
        EffectId::Fireflies
    }

    fn spawn(&self, bounds: Bounds, _color: Rgb, _placement: Placement) -> Particle {
        let body = Body {
            x: between(0.0, bounds.width),
            y: between(0.0, bounds.height),
            size: between(2.0, 4.0),
            opacity: 1.0,
            ..Body::default()
        };
        Particle::new(
            body,
            Firefly {
                target: wander_target(bounds),
                speed: between(0.3, 1.0),
                glow_phase: between(0.0, TAU),
                glow_speed: between(0.03, 0.08),
            },
        )
    }

    fn step(&self, particle: &mut Particle, bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Firefly(fly), .. } = particle else {
            return Fate::Recycle;
        };

        fly.glow_phase = (fly.glow_phase + fly.glow_speed) % TAU;

        // Targets picked before a shrink may lie outside the surface now
        if !bounds.contains(fly.target) || body.position().distance(fly.target) < ARRIVAL_RADIUS {
            fly.target = wander_target(bounds);
        }

        let dx = fly.target.x - body.x;
        let dy = fly.target.y - body.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > f32::EPSILON {
            body.vx = dx / dist * fly.speed;
            body.vy = dy / dist * fly.speed;
        } else {
            body.vx = 0.0;
            body.vy = 0.0;
        }
        body.advance();
        clamp_into(body, bounds);

        Fate::Live
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Firefly(fly) = &particle.kind else {
            return;
        };
        let body = particle.body;
        let brightness = 0.5 + 0.5 * fly.glow_phase.sin();
        surface.with_opacity(body.opacity * brightness, &mut |s| {
            s.with_glow(GLOW, body.size * 4.0, &mut |s| s.fill_circle(body.position(), body.size, CORE))
        });
    }
}
