use super::{between, falling_start, fell_out, wrap_horizontally, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::Bounds;
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;
use std::f32::consts::TAU;

const SNOW_COLOR: Rgb = Rgb(255, 255, 255);

#[derive(Debug, Clone, PartialEq)]
pub struct Snowflake {
    pub sway_phase: f32,
    pub sway_speed: f32,
}

pub struct Snowfall;

impl EffectDefinition for Snowfall {
    fn id(&self) -> EffectId {
        EffectId::Snowfall
    }

    fn default_count(&self) -> usize {
        100
    }

    fn spawn(&self, bounds: Bounds, _color: Rgb, placement: Placement) -> Particle {
        let radius = between(2.0, 7.0);
        let body = Body {
            x: between(0.0, bounds.width),
            y: falling_start(bounds, radius, placement),
            vx: between(-0.5, 0.5),
            vy: between(0.5, 1.5),
            size: radius,
            opacity: between(0.4, 1.0),
            ..Body::default()
        };
        Particle::new(
            body,
            Snowflake {
                sway_phase: between(0.0, TAU),
                sway_speed: between(0.01, 0.03),
            },
        )
    }

    fn step(&self, particle: &mut Particle, bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Snowflake(flake), .. } = particle else {
            return Fate::Recycle;
        };

        flake.sway_phase = (flake.sway_phase + flake.sway_speed) % TAU;
        body.advance();
        body.x += flake.sway_phase.sin() * 0.3;
        wrap_horizontally(body, bounds);

        if fell_out(body, bounds) { Fate::Recycle } else { Fate::Live }
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let body = particle.body;
        surface.with_opacity(body.opacity, &mut |s| s.fill_circle(body.position(), body.size, SNOW_COLOR));
    }
}
