use overlay_fx::effects::sparkles::Sparkle;
use overlay_fx::surface::DrawCall;
use overlay_fx::{
    definition, AnimationDriver, Bounds, DriverState, EffectId, Fate, FrameQueue, Kind, MountConfig, Particle,
    ParticleSystem, Placement, RecordingSurface, Rgb,
};
use std::mem::discriminant;

const SCREEN: Bounds = Bounds::new(800.0, 600.0);

fn effects() -> impl Iterator<Item = EffectId> {
    EffectId::ALL.into_iter().filter(|id| *id != EffectId::None)
}

fn mounted(effect: &str) -> AnimationDriver<FrameQueue, RecordingSurface> {
    let mut driver = AnimationDriver::new(FrameQueue::new());
    driver.mount(MountConfig::new(effect), || Ok(RecordingSurface::new(SCREEN)));
    driver
}

#[test]
fn snowfall_starts_with_a_hundred_white_flakes() {
    fastrand::seed(100);
    let driver = mounted("snowfall");
    let pool = driver.system().pool();
    assert_eq!(pool.len(), 100);
    for flake in pool {
        assert!(matches!(flake.kind, Kind::Snowflake(_)));
        assert!((0.5..1.5).contains(&flake.body.vy), "vy {}", flake.body.vy);
        assert!((2.0..7.0).contains(&flake.body.size), "size {}", flake.body.size);
        assert!(SCREEN.contains(flake.body.position()));
    }
}

#[test]
fn fresh_sparkle_lives_between_34_and_100_ticks() {
    fastrand::seed(101);
    let def = definition(EffectId::Sparkles).unwrap();
    for _ in 0..50 {
        let mut sparkle = def.spawn(SCREEN, Rgb::WHITE, Placement::Entering);
        let Kind::Sparkle(Sparkle { life, .. }) = sparkle.kind else {
            panic!("sparkles spawned {:?}", sparkle.effect());
        };
        assert_eq!(life, 1.0);

        let mut ticks = 0;
        loop {
            ticks += 1;
            if def.step(&mut sparkle, SCREEN) == Fate::Recycle {
                break;
            }
            assert!(ticks <= 100);
        }
        assert!((34..=100).contains(&ticks), "sparkle lasted {ticks} ticks");
    }
}

#[test]
fn none_never_draws() {
    let mut driver = mounted("none");
    assert_eq!(driver.state(), DriverState::Idle);
    for _ in 0..10 {
        assert_eq!(driver.pump(), 0);
    }
    assert!(driver.surface().unwrap().calls().is_empty());
    assert_eq!(driver.scheduler().requested(), 0);
}

#[test]
fn snow_alias_mounts_snowfall() {
    let driver = mounted("Snow");
    assert_eq!(driver.effect(), EffectId::Snowfall);
    assert_eq!(driver.system().len(), 100);
}

#[test]
fn resize_keeps_the_pool_and_its_state() {
    fastrand::seed(102);
    let mut driver = mounted("hearts");
    for _ in 0..20 {
        driver.pump();
    }
    let before: Vec<Particle> = driver.system().pool().to_vec();

    driver.resize(Bounds::new(1200.0, 900.0));
    assert_eq!(driver.system().pool(), &before[..]);

    driver.pump();
    assert_eq!(driver.system().len(), before.len());
    assert_eq!(driver.system().bounds(), Bounds::new(1200.0, 900.0));
    let carried = driver
        .system()
        .pool()
        .iter()
        .zip(&before)
        .filter(|(after, before)| after.age() == before.age() + 1)
        .count();
    assert!(carried > 0);
}

#[test]
fn shrinking_pulls_ambient_particles_inside() {
    fastrand::seed(103);
    let small = Bounds::new(120.0, 90.0);
    for id in [EffectId::Fireflies, EffectId::Stars, EffectId::Sunrays, EffectId::Aurora] {
        let mut system = ParticleSystem::new();
        system.start(id, Bounds::new(1600.0, 1200.0), Rgb::WHITE);
        system.set_bounds(small);
        system.step_once();
        for particle in system.pool() {
            assert!(small.contains(particle.body.position()), "{id} at {:?}", particle.body.position());
        }
    }
}

#[test]
fn scattered_spawns_respect_new_bounds() {
    fastrand::seed(104);
    let small = Bounds::new(200.0, 150.0);
    for id in [EffectId::Snowfall, EffectId::Sparkles, EffectId::Fireflies, EffectId::Stars] {
        let def = definition(id).unwrap();
        for _ in 0..200 {
            let particle = def.spawn(small, Rgb::WHITE, Placement::Scattered);
            assert!(small.contains(particle.body.position()), "{id} at {:?}", particle.body.position());
        }
    }
}

#[test]
fn particles_never_change_variant() {
    fastrand::seed(105);
    for id in effects() {
        let mut system = ParticleSystem::new();
        system.start(id, SCREEN, Rgb(200, 80, 40));
        let variant = discriminant(&system.pool()[0].kind);
        for _ in 0..400 {
            system.step_once();
        }
        assert!(system.pool().iter().all(|p| discriminant(&p.kind) == variant), "{id}");
    }
}

#[test]
fn positions_stay_finite_on_odd_surfaces() {
    fastrand::seed(106);
    for bounds in [Bounds::new(1.0, 1.0), Bounds::new(3000.0, 10.0), SCREEN] {
        for id in effects() {
            let mut system = ParticleSystem::new();
            system.start(id, bounds, Rgb::WHITE);
            for _ in 0..300 {
                system.step_once();
            }
            assert!(system.pool().iter().all(|p| p.body.is_finite()), "{id} on {bounds:?}");
        }
    }
}

#[test]
fn every_effect_draws_each_frame() {
    fastrand::seed(107);
    for id in effects() {
        let mut driver = mounted(id.name());
        assert_eq!(driver.pump(), 1, "{id}");
        let surface = driver.surface().unwrap();
        assert!(surface.primitive_count() > 0, "{id}");
        assert_eq!(surface.calls().last(), Some(&DrawCall::Present));
    }
}

#[test]
fn cancelled_run_restarts_fresh() {
    fastrand::seed(108);
    let mut driver = mounted("confetti");
    for _ in 0..30 {
        driver.pump();
    }
    let stale = driver.pending_frame().unwrap();

    driver.reconfigure(MountConfig::new("none"));
    assert_eq!(driver.state(), DriverState::Cancelled);
    assert!(!driver.on_frame(stale));

    driver.reconfigure(MountConfig::new("confetti"));
    assert_eq!(driver.state(), DriverState::Running);
    assert_eq!(driver.system().len(), 50);
    assert!(driver.system().pool().iter().all(|p| p.age() == 0));
    assert_eq!(driver.scheduler().pending_len(), 1);
}

#[test]
fn remount_hands_back_the_old_surface() {
    let mut driver = mounted("rain");
    driver.pump();
    let surface = driver.unmount().unwrap();
    assert!(surface.primitive_count() > 0);
    assert!(driver.unmount().is_none());

    driver.mount(MountConfig::new("rain"), || Ok(RecordingSurface::new(SCREEN)));
    assert_eq!(driver.state(), DriverState::Running);
    assert!(driver.surface().unwrap().calls().is_empty());
}

#[test]
fn resize_round_trip_spawns_inside_the_restored_bounds() {
    fastrand::seed(109);
    let wide = Bounds::new(1600.0, 600.0);
    let narrow = Bounds::new(200.0, 150.0);
    let mut system = ParticleSystem::new();
    system.start(EffectId::Rain, wide, Rgb::WHITE);
    system.set_bounds(narrow);
    system.set_bounds(wide);
    assert_eq!(system.bounds(), wide);

    let mut ticks = 0u64;
    while system.recycled() < 200 {
        system.step_once();
        ticks += 1;
        assert!(ticks < 5000);
    }

    // Everything younger than the run entered after the round trip
    let fresh: Vec<&Particle> = system.pool().iter().filter(|p| p.age() < ticks).collect();
    assert!(!fresh.is_empty());
    for particle in &fresh {
        let Kind::Raindrop(raindrop) = &particle.kind else {
            panic!("rain pool holds {:?}", particle.effect());
        };
        let body = particle.body;
        assert!(body.x >= -body.size && body.x <= wide.width + body.size, "x {}", body.x);
        assert!(body.y >= -raindrop.length && body.y <= wide.height + 20.0, "y {}", body.y);
    }
    assert!(fresh.iter().any(|p| p.body.x > narrow.width));
}

#[test]
fn each_exit_recycles_its_slot_exactly_once() {
    fastrand::seed(110);
    let bounds = Bounds::new(400.0, 120.0);
    for id in [
        EffectId::Rain,
        EffectId::Confetti,
        EffectId::Embers,
        EffectId::Bubbles,
        EffectId::Sparkles,
        EffectId::Butterflies,
    ] {
        let mut system = ParticleSystem::new();
        system.start(id, bounds, Rgb::WHITE);
        let mut replaced: Vec<usize> = Vec::new();

        for _ in 0..800 {
            let before = system.recycled();
            system.step_once();

            // Last tick's replacements survived their first step
            for &slot in &replaced {
                assert_eq!(system.pool()[slot].age(), 1, "{id} slot {slot}");
            }
            replaced = system
                .pool()
                .iter()
                .enumerate()
                .filter(|(_, p)| p.age() == 0)
                .map(|(slot, _)| slot)
                .collect();
            assert_eq!(system.recycled() - before, replaced.len() as u64, "{id}");
        }
        assert!(system.recycled() > 0, "{id} never recycled");
    }
}
