use super::{between, clamp_into, EffectDefinition, EffectId, Fate, Placement};
use crate::color::Rgb;
use crate::geometry::{Bounds, Point};
use crate::particle::{Body, Kind, Particle};
use crate::surface::{GradientBand, RenderSurface};
use noise::{NoiseFn, Perlin};
use std::f32::consts::TAU;
use std::sync::OnceLock;

const AURORA_COLORS: [Rgb; 5] = [
    Rgb(30, 255, 120),  // Bright green
    Rgb(50, 200, 220),  // Cyan
    Rgb(100, 150, 255), // Light blue
    Rgb(180, 100, 255), // Purple
    Rgb(255, 80, 180),  // Magenta/pink
];

/// Color the ribbon fades into away from its crest.
const NIGHT_SKY: Rgb = Rgb(20, 40, 120);

/// Crest samples across the surface width.
const CREST_SAMPLES: usize = 48;

/// Shared, read-only noise field. Seeded once so every ribbon samples the
/// same landscape at its own depth.
fn noise_field() -> &'static Perlin {
    static FIELD: OnceLock<Perlin> = OnceLock::new();
    FIELD.get_or_init(|| Perlin::new(0x0a0b_0c0d))
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuroraBand {
    pub phase: f32,
    pub speed: f32,
    /// Crest swing as a fraction of surface height.
    pub amplitude: f32,
    /// Full waves across the surface width.
    pub frequency: f32,
    /// Resting crest height as a fraction of surface height.
    pub base: f32,
    /// Ribbon half-thickness as a fraction of surface height.
    pub thickness: f32,
    /// Depth in the noise field; separates ribbons so they don't move in lockstep.
    pub depth: f32,
    pub color: Rgb,
}

pub struct Aurora;

impl EffectDefinition for Aurora {
    fn id(&self) -> EffectId {
        EffectId::Aurora
    }

    fn default_count(&self) -> usize {
        5
    }

    fn spawn(&self, bounds: Bounds, _color: Rgb, _placement: Placement) -> Particle {
        let base = between(0.15, 0.4);
        let body = Body {
            x: 0.0,
            y: base * bounds.height,
            size: bounds.width,
            opacity: between(0.35, 0.6),
            ..Body::default()
        };
        Particle::new(
            body,
            AuroraBand {
                phase: between(0.0, TAU),
                speed: between(0.005, 0.015),
                amplitude: between(0.03, 0.08),
                frequency: between(1.5, 3.5),
                base,
                thickness: between(0.08, 0.16),
                depth: between(0.0, 100.0),
                color: AURORA_COLORS[fastrand::usize(..AURORA_COLORS.len())],
            },
        )
    }

    fn step(&self, particle: &mut Particle, bounds: Bounds) -> Fate {
        let Particle { body, kind: Kind::Aurora(band), .. } = particle else {
            return Fate::Recycle;
        };

        // Phase grows without wrapping so the noise field never repeats;
        // wrap far out to keep f32 precision.
        band.phase += band.speed;
        if band.phase > 10000.0 {
            band.phase -= 10000.0;
        }
        body.y = band.base * bounds.height;
        body.size = bounds.width;
        clamp_into(body, bounds);

        Fate::Live
    }

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle) {
        let Kind::Aurora(band) = &particle.kind else {
            return;
        };
        let size = surface.size();
        let noise = noise_field();

        let crest = (0..=CREST_SAMPLES)
            .map(|i| {
                let t = i as f32 / CREST_SAMPLES as f32;
                let wave = (t * band.frequency * TAU + band.phase).sin();
                let drift = noise.get([(t * 2.0) as f64, (band.phase * 0.5) as f64, band.depth as f64]) as f32;
                let y = (band.base + (wave + drift * 0.8) * band.amplitude) * size.height;
                Point::new(t * size.width, y)
            })
            .collect();

        surface.fill_linear_gradient(&GradientBand {
            crest,
            thickness: band.thickness * size.height,
            inner: band.color,
            outer: band.color.lerp(NIGHT_SKY, 0.6),
            opacity: particle.body.opacity,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCall, RecordingSurface};

    #[test]
    fn ribbon_spans_full_width() {
        let bounds = Bounds::new(1024.0, 768.0);
        let band = Aurora.spawn(bounds, Rgb::WHITE, Placement::Scattered);
        let mut surface = RecordingSurface::new(bounds);
        Aurora.render(&mut surface, &band);

        let [DrawCall::Gradient { band, .. }] = surface.calls() else {
            panic!("expected one gradient, got {:?}", surface.calls());
        };
        assert_eq!(band.crest.first().unwrap().x, 0.0);
        assert_eq!(band.crest.last().unwrap().x, 1024.0);
        assert!(band.crest.iter().all(|p| p.y.is_finite()));
    }

    #[test]
    fn follows_surface_height_after_resize() {
        let mut band = Aurora.spawn(Bounds::new(800.0, 600.0), Rgb::WHITE, Placement::Scattered);
        let Kind::Aurora(state) = &band.kind else { unreachable!() };
        let base = state.base;

        let taller = Bounds::new(800.0, 1200.0);
        assert_eq!(Aurora.step(&mut band, taller), Fate::Live);
        assert!((band.body.y - base * 1200.0).abs() < 1e-3);
    }
}
