use super::{between, falling_start, fell_out, wrap_horizontally, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::{Bounds, Point};
use crate::particle::{Body, Kind, Particle};
use crate::surface::RenderSurface;

const RAIN_COLOR: Rgb = Rgb(174, 194, 224);

#[derive(Debug, Clone, PartialEq)]
pub struct Raindrop {
    /// Streak length.
    pub length: f32,
}

pub struct Rain;

impl EffectDefinition for Rain {
    fn id(&self) -> EffectId {
        EffectId::Rain
    }

    fn spawn(&self, bounds: Bounds, _color: Rgb, placement: Placement) -> Particle {
        let length = between(15.0, 35.0);
        let body = Body {
            x: between(0.0, bounds.width),
            y: falling_start(bounds, length, placement),
            vx: between(-1.0, 1.0),
            vy: between(10.0, 25.0),
            size: between(1.0, 2.0),
            opacity: between(0.15, 0.5),
            ..Body::default()
        };
        Particle::new(body, Raindrop { length })
    }

    fn step(&self, particle: &mut Particle, bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Raindrop(_), .. } = particle else {
            return Fate::Recycle;
        };

        body.advance();
        wrap_horizontally(body, bounds);

        if fell_out(body, bounds) { Fate::Recycle } else { Fate::Live }
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Raindrop(drop) = &particle.kind else {
            return;
        };
        let body = particle.body;
        // Streak trails behind the drop, back along its path
        let slant = body.vx / body.vy.max(f32::EPSILON);
        let tail = Point::new(body.x - slant * drop.length, body.y - drop.length);
        surface.with_opacity(body.opacity, &mut |s| s.stroke(body.position(), tail, body.size, RAIN_COLOR));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::FALL_MARGIN;
    use crate::surface::{DrawCall, RecordingSurface};

    const BOUNDS: Bounds = Bounds::new(640.0, 480.0);

    #[test]
    fn spawn_ranges() {
        fastrand::seed(21);
        for _ in 0..200 {
            let drop = Rain.spawn(BOUNDS, Rgb::WHITE, Placement::Scattered);
            let Kind::Raindrop(Raindrop { length }) = drop.kind else { unreachable!() };
            assert!((15.0..35.0).contains(&length), "length {length}");
            assert!((10.0..25.0).contains(&drop.body.vy), "vy {}", drop.body.vy);
            assert!((-1.0..1.0).contains(&drop.body.vx), "vx {}", drop.body.vx);
            assert!(BOUNDS.contains(drop.body.position()));
        }
    }

    #[test]
    fn enters_above_and_recycles_below_the_margin() {
        fastrand::seed(22);
        let mut drop = Rain.spawn(BOUNDS, Rgb::WHITE, Placement::Entering);
        let Kind::Raindrop(Raindrop { length }) = drop.kind else { unreachable!() };
        assert_eq!(drop.body.y, -length);

        let mut ticks = 0;
        while Rain.step(&mut drop, BOUNDS) == Fate::Live {
            assert!(drop.body.y <= BOUNDS.height + FALL_MARGIN);
            ticks += 1;
            assert!(ticks < 200);
        }
        assert!(drop.body.y > BOUNDS.height + FALL_MARGIN);
    }

    #[test]
    fn wraps_sideways_instead_of_recycling() {
        fastrand::seed(23);
        let mut drop = Rain.spawn(BOUNDS, Rgb::WHITE, Placement::Scattered);
        drop.body.y = 100.0;
        drop.body.vx = 1.0;
        drop.body.x = BOUNDS.width + drop.body.size + 0.5;
        assert_eq!(Rain.step(&mut drop, BOUNDS), Fate::Live);
        assert_eq!(drop.body.x, -drop.body.size);
    }

    #[test]
    fn streak_trails_behind_the_drop() {
        fastrand::seed(24);
        let mut drop = Rain.spawn(BOUNDS, Rgb::WHITE, Placement::Scattered);
        drop.body.vx = 1.0;
        drop.body.vy = 10.0;

        let mut surface = RecordingSurface::new(BOUNDS);
        Rain.render(&mut surface, &drop);
        let [DrawCall::Stroke { from, to, .. }] = surface.calls() else {
            panic!("unexpected calls {:?}", surface.calls());
        };
        assert_eq!(*from, drop.body.position());
        assert!(to.y < from.y);
        assert!(to.x < from.x);
    }
}
