use super::{between, either_sign, falling_start, fell_out, pick, wrap_horizontally, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::{Bounds, Point};
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;
use std::f32::consts::TAU;

const CONFETTI_COLORS: [Rgb; 6] = [
    Rgb(255, 59, 48),
    Rgb(255, 204, 0),
    Rgb(52, 199, 89),
    Rgb(0, 122, 255),
    Rgb(175, 82, 222),
    Rgb(255, 45, 85),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    pub tumble_phase: f32,
    pub tumble_speed: f32,
    /// Height as a fraction of width.
    pub aspect: f32,
    pub color: Rgb,
}

pub struct Confetti;

impl EffectDefinition for Confetti {
    fn id(&self) -> EffectId {
        EffectId::Confetti
    }

    fn spawn(&self, bounds: Bounds, color: Rgb, placement: Placement) -> Particle {
        let size = between(6.0, 12.0);
        let body = Body {
            x: between(0.0, bounds.width),
            y: falling_start(bounds, size, placement),
            vx: between(-1.0, 1.0),
            vy: between(1.0, 3.0),
            rotation: between(0.0, TAU),
            spin: either_sign() * between(0.05, 0.15),
            size,
            opacity: 1.0,
        };
        // One piece in four carries the host's accent color
        let color = if fastrand::u8(0..4) == 0 { color } else { pick(&CONFETTI_COLORS) };
        Particle::new(
            body,
            ConfettiPiece {
                tumble_phase: between(0.0, TAU),
                tumble_speed: between(0.05, 0.2),
                aspect: between(0.4, 0.7),
                color,
            },
        )
    }

    fn step(&self, particle: &mut Particle, bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Confetti(piece), .. } = particle else {
            return Fate::Recycle;
        };

        piece.tumble_phase = (piece.tumble_phase + piece.tumble_speed) % TAU;
        body.advance();
        wrap_horizontally(body, bounds);

        if fell_out(body, bounds) { Fate::Recycle } else { Fate::Live }
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Confetti(piece) = &particle.kind else {
            return;
        };
        let body = particle.body;
        let half_w = body.size * 0.5 * piece.tumble_phase.cos().abs().max(0.1);
        let half_h = body.size * 0.5 * piece.aspect;
        let corners: Vec<Point> = [(-half_w, -half_h), (half_w, -half_h), (half_w, half_h), (-half_w, half_h)]
            .iter()
            .map(|&(x, y)| Point::new(x, y).rotated(body.rotation, body.position()))
            .collect();
        // Back side of the paper is a shade darker
        let shade = if piece.tumble_phase.sin() < 0.0 { piece.color.lerp(Rgb::BLACK, 0.25) } else { piece.color };

        surface.with_opacity(body.opacity, &mut |s| s.fill_polygon(&corners, shade));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::FALL_MARGIN;

    const BOUNDS: Bounds = Bounds::new(640.0, 480.0);

    #[test]
    fn about_a_quarter_carry_the_accent() {
        fastrand::seed(81);
        let accent = Rgb(1, 2, 3);
        let accented = (0..400)
            .map(|_| Confetti.spawn(BOUNDS, accent, Placement::Scattered))
            .filter(|piece| matches!(&piece.kind, Kind::Confetti(p) if p.color == accent))
            .count();
        assert!((60..140).contains(&accented), "{accented} accented pieces");
    }

    #[test]
    fn falls_out_below_the_margin() {
        fastrand::seed(82);
        let mut piece = Confetti.spawn(BOUNDS, Rgb::WHITE, Placement::Entering);
        assert!((1.0..3.0).contains(&piece.body.vy));
        let mut ticks = 0;
        while Confetti.step(&mut piece, BOUNDS) == Fate::Live {
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert!(piece.body.y > BOUNDS.height + FALL_MARGIN);
    }
}
