use super::{between, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::{Bounds, Point};
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;
use std::f32::consts::{FRAC_PI_2, TAU};

#[derive(Debug, Clone, PartialEq)]
pub struct Sparkle {
    /// Remaining life in `(0, 1]`; the sparkle recycles at zero.
    pub life: f32,
    /// Life lost per tick.
    pub decay: f32,
    pub color: Rgb,
}

pub struct Sparkles;

impl EffectDefinition for Sparkles {
    fn id(&self) -> EffectId {
        EffectId::Sparkles
    }

    fn default_count(&self) -> usize {
        80
    }

    fn spawn(&self, bounds: Bounds, color: Rgb, placement: Placement) -> Particle {
        let life = match placement {
            // 1 - [0,1) keeps scattered life strictly positive
            Placement::Scattered => 1.0 - fastrand::f32(),
            Placement::Entering => 1.0,
        };
        let body = Body {
            x: between(0.0, bounds.width),
            y: between(0.0, bounds.height),
            rotation: between(0.0, TAU),
            spin: between(0.02, 0.08),
            size: between(2.0, 6.0),
            opacity: 1.0,
            ..Body::default()
        };
        Particle::new(
            body,
            Sparkle {
                life,
                decay: between(0.01, 0.03),
                color: color.lighten(between(0.0, 0.5)),
            },
        )
    }

    fn step(&self, particle: &mut Particle, _bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Sparkle(sparkle), .. } = particle else {
            return Fate::Recycle;
        };

        sparkle.life -= sparkle.decay;
        body.advance();

        if sparkle.life <= 0.0 { Fate::Recycle } else { Fate::Live }
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Sparkle(sparkle) = &particle.kind else {
            return;
        };
        let body = particle.body;
        let life = sparkle.life.clamp(0.0, 1.0);
        let center = body.position();
        let reach = body.size * 2.0 * life;

        surface.with_opacity(body.opacity * life, &mut |s| {
            s.fill_circle(center, body.size * 0.5 * life, sparkle.color);
            for arm in 0..4 {
                let angle = body.rotation + arm as f32 * FRAC_PI_2;
                let tip = Point::new(center.x + angle.cos() * reach, center.y + angle.sin() * reach);
                s.stroke(center, tip, 1.0, sparkle.color);
            }
        });
    }
}
