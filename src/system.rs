//! The live particle pool for the active effect.

use crate::color::Rgb;
use crate::effects::{definition, EffectDefinition, EffectId, Fate, Placement};
use crate::geometry::Bounds;
use crate::particle::Particle;
use crate::surface::RenderSurface;

/// Owns the fixed-size pool of the active effect.
///
/// While running with a real effect and non-empty bounds the pool always
/// holds exactly `default_count()` particles of that effect. `none`, unknown
/// effects and a stopped system hold nothing.
pub struct ParticleSystem {
    effect: EffectId,
    definition: Option<&'static dyn EffectDefinition>,
    bounds: Bounds,
    color: Rgb,
    pool: Vec<Particle>,
    running: bool,
    recycled: u64,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            effect: EffectId::None,
            definition: None,
            bounds: Bounds::default(),
            color: Rgb::WHITE,
            pool: Vec::new(),
            running: false,
            recycled: 0,
        }
    }

    /// Replaces whatever was running with a fresh pool for `effect`.
    ///
    /// Zero-area bounds defer allocation until the first non-empty
    /// [`set_bounds`](Self::set_bounds).
    pub fn start(&mut self, effect: EffectId, bounds: Bounds, color: Rgb) {
        self.stop();

        self.effect = effect;
        self.definition = definition(effect);
        self.bounds = bounds;
        self.color = color;
        self.running = true;

        if self.definition.is_none() {
            log::debug!("effect {effect} has no particles; system idles");
            return;
        }
        if bounds.is_empty() {
            log::debug!("deferring {effect} pool until the surface has an area");
            return;
        }
        self.allocate();
    }

    /// Resolves `name` and starts it. Unknown names degrade to `none`.
    pub fn start_named(&mut self, name: &str, bounds: Bounds, color: Rgb) {
        let effect = name.parse().unwrap_or_else(|err| {
            log::warn!("{err}; showing no effect");
            EffectId::None
        });
        self.start(effect, bounds, color);
    }

    fn allocate(&mut self) {
        let Some(def) = self.definition else {
            return;
        };
        let count = def.default_count();
        self.pool = (0..count)
            .map(|_| def.spawn(self.bounds, self.color, Placement::Scattered))
            .collect();
        log::info!("started {} with {} particles", self.effect, count);
    }

    /// Advances every particle one tick, recycling in place.
    pub fn step_once(&mut self) {
        if !self.running || self.pool.is_empty() || self.bounds.is_empty() {
            return;
        }
        let Some(def) = self.definition else {
            return;
        };

        for index in 0..self.pool.len() {
            let fate = {
                let particle = &mut self.pool[index];
                particle.grow_older();
                def.step(particle, self.bounds)
            };
            if fate == Fate::Recycle {
                let fresh = def.spawn(self.bounds, self.color, Placement::Entering);
                self.replace_at(index, fresh);
            }
        }
    }

    /// Swaps the particle in slot `index`, keeping pool order and size.
    fn replace_at(&mut self, index: usize, particle: Particle) {
        debug_assert_eq!(particle.effect(), self.effect);
        self.pool[index] = particle;
        self.recycled += 1;
    }

    /// Adopts new surface bounds. Existing particles keep their state and are
    /// brought back in range by their own next step.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        if self.running && self.pool.is_empty() && !bounds.is_empty() {
            self.allocate();
        }
    }

    pub fn stop(&mut self) {
        if self.running && !self.pool.is_empty() {
            log::info!("stopped {} ({} recycles)", self.effect, self.recycled);
        }
        self.pool.clear();
        self.pool.shrink_to_fit();
        self.running = false;
        self.recycled = 0;
    }

    /// Draws every live particle. Does not clear or present.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        let Some(def) = self.definition else {
            return;
        };
        if !self.running {
            return;
        }
        for particle in &self.pool {
            def.render(surface, particle);
        }
    }

    pub fn effect(&self) -> EffectId {
        self.effect
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn pool(&self) -> &[Particle] {
        &self.pool
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Recycles since the last start.
    pub fn recycled(&self) -> u64 {
        self.recycled
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    const SCREEN: Bounds = Bounds::new(1024.0, 768.0);

    #[test]
    fn pool_size_holds_across_recycles() {
        fastrand::seed(1);
        for id in EffectId::ALL.into_iter().filter(|id| *id != EffectId::None) {
            let mut system = ParticleSystem::new();
            system.start(id, SCREEN, Rgb::WHITE);
            let expected = definition(id).unwrap().default_count();
            for _ in 0..600 {
                system.step_once();
                assert_eq!(system.len(), expected, "{id}");
            }
            assert!(system.pool().iter().all(|p| p.effect() == id));
        }
    }

    #[test]
    fn falling_effects_do_recycle() {
        fastrand::seed(8);
        let mut system = ParticleSystem::new();
        system.start(EffectId::Rain, SCREEN, Rgb::WHITE);
        for _ in 0..200 {
            system.step_once();
        }
        assert!(system.recycled() > 0);
    }

    #[test]
    fn none_and_unknown_stay_empty() {
        let mut system = ParticleSystem::new();
        system.start(EffectId::None, SCREEN, Rgb::WHITE);
        assert!(system.is_empty());
        system.step_once();
        assert!(system.is_empty());

        system.start_named("volcano", SCREEN, Rgb::WHITE);
        assert_eq!(system.effect(), EffectId::None);
        assert!(system.is_empty());

        let mut surface = RecordingSurface::new(SCREEN);
        system.render(&mut surface);
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn zero_area_defers_allocation() {
        let mut system = ParticleSystem::new();
        system.start(EffectId::Snowfall, Bounds::new(0.0, 0.0), Rgb::WHITE);
        assert!(system.is_running());
        assert!(system.is_empty());
        system.step_once();
        assert!(system.is_empty());

        system.set_bounds(Bounds::new(320.0, 240.0));
        assert_eq!(system.len(), 100);
    }

    #[test]
    fn set_bounds_keeps_pool_and_ages() {
        fastrand::seed(12);
        let mut system = ParticleSystem::new();
        system.start(EffectId::Hearts, Bounds::new(800.0, 600.0), Rgb::WHITE);
        for _ in 0..10 {
            system.step_once();
        }
        let before: Vec<Particle> = system.pool().to_vec();

        system.set_bounds(Bounds::new(1200.0, 900.0));
        assert_eq!(system.pool(), &before[..]);
    }

    #[test]
    fn stop_discards_and_restart_is_fresh() {
        fastrand::seed(13);
        let mut system = ParticleSystem::new();
        system.start(EffectId::Stars, SCREEN, Rgb::WHITE);
        for _ in 0..30 {
            system.step_once();
        }
        system.stop();
        assert!(system.is_empty());
        assert!(!system.is_running());
        system.step_once();
        assert!(system.is_empty());

        system.start(EffectId::Stars, SCREEN, Rgb::WHITE);
        assert_eq!(system.len(), 50);
        assert!(system.pool().iter().all(|p| p.age() == 0));
    }

    #[test]
    fn recycled_slot_keeps_its_position_in_the_pool() {
        fastrand::seed(14);
        let mut system = ParticleSystem::new();
        system.start(EffectId::Sparkles, SCREEN, Rgb::WHITE);
        let ages_before: Vec<u64> = system.pool().iter().map(Particle::age).collect();
        assert!(ages_before.iter().all(|age| *age == 0));

        for _ in 0..5 {
            system.step_once();
        }
        // Survivors aged 5; recycled slots restarted in place
        for particle in system.pool() {
            assert!(particle.age() <= 5);
        }
        assert_eq!(system.len(), 80);
    }
}
