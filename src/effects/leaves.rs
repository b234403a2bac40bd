use super::{between, either_sign, falling_start, fell_out, pick, wrap_horizontally, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::{Bounds, Point};
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;
use std::f32::consts::TAU;

const LEAF_COLORS: [Rgb; 5] = [
    Rgb(204, 85, 0),   // Burnt orange
    Rgb(178, 34, 34),  // Firebrick
    Rgb(218, 165, 32), // Goldenrod
    Rgb(139, 69, 19),  // Saddle brown
    Rgb(255, 140, 0),  // Dark orange
];

#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub flutter_phase: f32,
    pub color: Rgb,
}

pub struct Leaves;

impl EffectDefinition for Leaves {
    fn id(&self) -> EffectId {
        EffectId::Leaves
    }

    fn spawn(&self, bounds: Bounds, _color: Rgb, placement: Placement) -> Particle {
        let size = between(10.0, 20.0);
        let body = Body {
            x: between(0.0, bounds.width),
            y: falling_start(bounds, size, placement),
            vx: between(-0.5, 0.5),
            vy: between(0.8, 2.0),
            rotation: between(0.0, TAU),
            spin: either_sign() * between(0.01, 0.05),
            size,
            opacity: between(0.7, 1.0),
        };
        Particle::new(
            body,
            Leaf {
                flutter_phase: between(0.0, TAU),
                color: pick(&LEAF_COLORS),
            },
        )
    }

    fn step(&self, particle: &mut Particle, bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Leaf(leaf), .. } = particle else {
            return Fate::Recycle;
        };

        // Pendulum swing: sideways drift is strongest mid-swing
        leaf.flutter_phase = (leaf.flutter_phase + 0.04) % TAU;
        body.advance();
        body.x += leaf.flutter_phase.sin() * 1.2;
        body.rotation += leaf.flutter_phase.cos() * 0.01;
        wrap_horizontally(body, bounds);

        if fell_out(body, bounds) { Fate::Recycle } else { Fate::Live }
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Leaf(leaf) = &particle.kind else {
            return;
        };
        let body = particle.body;
        let (half_len, half_width) = (body.size * 0.5, body.size * 0.28);
        let outline: Vec<Point> = [
            (0.0, -half_len),
            (half_width, -half_len * 0.3),
            (half_width * 0.8, half_len * 0.4),
            (0.0, half_len),
            (-half_width * 0.8, half_len * 0.4),
            (-half_width, -half_len * 0.3),
        ]
        .iter()
        .map(|&(x, y)| Point::new(x, y).rotated(body.rotation, body.position()))
        .collect();
        let stem_from = Point::new(0.0, -half_len).rotated(body.rotation, body.position());
        let stem_to = Point::new(0.0, half_len * 1.2).rotated(body.rotation, body.position());
        let vein = leaf.color.lerp(Rgb(60, 30, 10), 0.5);

        surface.with_opacity(body.opacity, &mut |s| {
            s.fill_polygon(&outline, leaf.color);
            s.stroke(stem_from, stem_to, 1.0, vein);
        });
    }
}
