use super::{between, either_sign, falling_start, fell_out, pick, wrap_horizontally, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::Bounds;
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;
use std::f32::consts::TAU;

const PETAL_COLORS: [Rgb; 4] = [
    Rgb(255, 183, 197), // Cherry blossom
    Rgb(255, 192, 203),
    Rgb(255, 228, 225), // Misty rose
    Rgb(250, 218, 221),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Petal {
    pub flutter_phase: f32,
    pub flutter_speed: f32,
    pub color: Rgb,
}

pub struct Petals;

impl EffectDefinition for Petals {
    fn id(&self) -> EffectId {
        EffectId::Petals
    }

    fn spawn(&self, bounds: Bounds, _color: Rgb, placement: Placement) -> Particle {
        let size = between(8.0, 16.0);
        // Petals ride a steady breeze to the right
        let body = Body {
            x: between(0.0, bounds.width),
            y: falling_start(bounds, size, placement),
            vx: between(0.3, 1.2),
            vy: between(0.6, 1.6),
            rotation: between(0.0, TAU),
            spin: either_sign() * between(0.01, 0.04),
            size,
            opacity: between(0.6, 1.0),
        };
        Particle::new(
            body,
            Petal {
                flutter_phase: between(0.0, TAU),
                flutter_speed: between(0.03, 0.08),
                color: pick(&PETAL_COLORS),
            },
        )
    }

    fn step(&self, particle: &mut Particle, bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Petal(petal), .. } = particle else {
            return Fate::Recycle;
        };

        petal.flutter_phase = (petal.flutter_phase + petal.flutter_speed) % TAU;
        body.advance();
        body.x += petal.flutter_phase.sin() * 0.6;
        wrap_horizontally(body, bounds);

        if fell_out(body, bounds) { Fate::Recycle } else { Fate::Live }
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Petal(petal) = &particle.kind else {
            return;
        };
        let body = particle.body;
        // Flutter turns the petal edge-on and back
        let face = 0.3 + 0.7 * petal.flutter_phase.cos().abs();
        surface.with_opacity(body.opacity, &mut |s| {
            s.fill_ellipse(body.position(), body.size * 0.5, body.size * 0.25 * face, body.rotation, petal.color)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds::new(640.0, 480.0);

    #[test]
    fn breeze_blows_to_the_right() {
        fastrand::seed(61);
        for _ in 0..100 {
            let petal = Petals.spawn(BOUNDS, Rgb::WHITE, Placement::Scattered);
            assert!(petal.body.vx > 0.0);
            assert!(petal.body.vy > 0.0);
        }
    }

    #[test]
    fn wraps_past_the_right_edge() {
        fastrand::seed(62);
        let mut petal = Petals.spawn(BOUNDS, Rgb::WHITE, Placement::Scattered);
        petal.body.y = 50.0;
        petal.body.x = BOUNDS.width + petal.body.size + 2.0;
        assert_eq!(Petals.step(&mut petal, BOUNDS), Fate::Live);
        assert_eq!(petal.body.x, -petal.body.size);
    }

    #[test]
    fn recycles_below_the_bottom() {
        fastrand::seed(63);
        let mut petal = Petals.spawn(BOUNDS, Rgb::WHITE, Placement::Entering);
        assert!(petal.body.y < 0.0);
        let mut ticks = 0;
        while Petals.step(&mut petal, BOUNDS) == Fate::Live {
            ticks += 1;
            assert!(ticks < 2000);
        }
        assert!(petal.body.y > BOUNDS.height);
    }
}
