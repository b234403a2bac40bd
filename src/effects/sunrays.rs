use super::{between, clamp_into, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::{Bounds, Point};
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;
use std::f32::consts::TAU;

/// Warm tint mixed into the host color.
const SUNLIGHT: Rgb = Rgb(255, 236, 170);

#[derive(Debug, Clone, PartialEq)]
pub struct Sunray {
    /// Direction from the origin, radians (0 = right, π/2 = down).
    pub angle: f32,
    /// Half-width of the beam, radians.
    pub spread: f32,
    /// Beam length as a fraction of the surface diagonal.
    pub reach: f32,
    pub sway_phase: f32,
    pub sway_speed: f32,
    pub color: Rgb,
}

/// Light shafts fanning down from the top-left of the surface.
pub struct Sunrays;

impl EffectDefinition for Sunrays {
    fn id(&self) -> EffectId {
        EffectId::Sunrays
    }

    fn default_count(&self) -> usize {
        8
    }

    fn spawn(&self, bounds: Bounds, color: Rgb, _placement: Placement) -> Particle {
        let body = Body {
            x: between(0.0, bounds.width * 0.35),
            y: 0.0,
            opacity: between(0.05, 0.15),
            ..Body::default()
        };
        Particle::new(
            body,
            Sunray {
                angle: between(0.3, 1.2),
                spread: between(0.04, 0.1),
                reach: between(0.6, 1.0),
                sway_phase: between(0.0, TAU),
                sway_speed: between(0.003, 0.01),
                color: color.lerp(SUNLIGHT, 0.6),
            },
        )
    }

    fn step(&self, particle: &mut Particle, bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Sunray(ray), .. } = particle else {
            return Fate::Recycle;
        };

        ray.sway_phase = (ray.sway_phase + ray.sway_speed) % TAU;
        body.rotation = ray.sway_phase.sin() * 0.05;
        clamp_into(body, bounds);

        Fate::Live
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Sunray(ray) = &particle.kind else {
            return;
        };
        let body = particle.body;
        let size = surface.size();
        let length = (size.width * size.width + size.height * size.height).sqrt() * ray.reach;
        let heading = ray.angle + body.rotation;
        let edge = |angle: f32| Point::new(body.x + angle.cos() * length, body.y + angle.sin() * length);
        let beam = [body.position(), edge(heading - ray.spread), edge(heading + ray.spread)];
        let pulse = 0.7 + 0.3 * (ray.sway_phase * 2.0).sin();

        surface.with_opacity(body.opacity * pulse, &mut |s| s.fill_polygon(&beam, ray.color));
    }
}
