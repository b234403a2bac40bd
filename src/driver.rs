//! Cooperative frame loop: one `step_once` + redraw per scheduled frame.

use crate::config::MountConfig;
use crate::effects::EffectId;
use crate::error::EngineError;
use crate::geometry::Bounds;
use crate::scheduler::{FrameHandle, FrameQueue, FrameScheduler};
use crate::surface::RenderSurface;
use crate::system::ParticleSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Nothing scheduled: never mounted, mounted with `none`, or the surface
    /// could not be acquired.
    Idle,
    /// A frame is pending and the pool is live.
    Running,
    /// A run was torn down; nothing is scheduled.
    Cancelled,
}

/// Binds a [`ParticleSystem`] to a host scheduler and an exclusively owned
/// surface.
///
/// Every teardown path cancels the pending frame before the pool is touched,
/// so a frame fired late is recognised as stale and ignored.
pub struct AnimationDriver<S: FrameScheduler, R: RenderSurface> {
    scheduler: S,
    surface: Option<R>,
    system: ParticleSystem,
    config: MountConfig,
    effect: EffectId,
    state: DriverState,
    pending_frame: Option<FrameHandle>,
    pending_bounds: Option<Bounds>,
    frames: u64,
}

impl<S: FrameScheduler, R: RenderSurface> AnimationDriver<S, R> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            surface: None,
            system: ParticleSystem::new(),
            config: MountConfig::default(),
            effect: EffectId::None,
            state: DriverState::Idle,
            pending_frame: None,
            pending_bounds: None,
            frames: 0,
        }
    }

    /// Acquires the surface and starts `config`'s effect. Failure to acquire
    /// is logged and leaves the driver idle.
    pub fn mount<F>(&mut self, config: MountConfig, acquire: F)
    where
        F: FnOnce() -> Result<R, EngineError>,
    {
        if self.surface.is_some() {
            self.unmount();
        }
        // A new mount starts from scratch; only `launch` moves to Running
        self.state = DriverState::Idle;

        self.adopt(config);
        match acquire() {
            Ok(surface) => self.surface = Some(surface),
            Err(err) => {
                log::error!("overlay not started: {err}");
                return;
            }
        }
        self.launch();
    }

    /// Applies a new configuration. A different effect or color restarts the
    /// run with a fresh pool; anything else is a pass-through update.
    pub fn reconfigure(&mut self, config: MountConfig) {
        let effect_changed = config.effect_type != self.config.effect_type;
        let color_changed = config.primary_color != self.config.primary_color;
        if !effect_changed && !color_changed {
            self.config = config;
            return;
        }

        log::debug!(
            "reconfigure: {} {} -> {} {}",
            self.config.effect_type,
            self.config.primary_color,
            config.effect_type,
            config.primary_color
        );
        self.cancel();
        self.adopt(config);
        self.launch();
    }

    /// Queues new bounds. They take effect before the next tick, never mid-tick;
    /// with no tick pending they apply immediately.
    pub fn resize(&mut self, bounds: Bounds) {
        log::debug!("resize to {}x{}", bounds.width, bounds.height);
        self.pending_bounds = Some(bounds);
        if self.pending_frame.is_none() {
            self.apply_pending_bounds();
        }
    }

    /// Runs one tick for `handle`. Returns false when the frame was stale or
    /// the driver isn't running.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.state != DriverState::Running || self.pending_frame != Some(handle) {
            log::trace!("ignoring stale frame {}", handle.id());
            return false;
        }
        self.pending_frame = None;
        self.apply_pending_bounds();

        let Some(surface) = self.surface.as_mut() else {
            self.state = DriverState::Idle;
            return false;
        };

        self.system.step_once();
        surface.clear();
        self.system.render(surface);
        if let Err(err) = surface.present() {
            log::error!("overlay output lost, stopping: {err}");
            self.cancel();
            return false;
        }

        self.frames += 1;
        self.pending_frame = Some(self.scheduler.request_frame());
        true
    }

    /// Cancels the pending frame, discards the pool and hands the surface back.
    pub fn unmount(&mut self) -> Option<R> {
        self.cancel();
        self.pending_bounds = None;
        if self.surface.is_some() {
            self.state = DriverState::Cancelled;
        }
        self.surface.take()
    }

    fn adopt(&mut self, config: MountConfig) {
        if config.contained {
            log::warn!("contained placement is not supported; using the full viewport");
        }
        self.effect = config.resolve_effect();
        self.config = config;
    }

    fn launch(&mut self) {
        debug_assert!(self.pending_frame.is_none());
        self.apply_pending_bounds();
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        if self.effect == EffectId::None {
            return;
        }

        self.system.start(self.effect, surface.size(), self.config.primary_color);
        self.state = DriverState::Running;
        self.pending_frame = Some(self.scheduler.request_frame());
    }

    fn cancel(&mut self) {
        // Order matters: the scheduled frame goes first, then the pool
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.system.stop();
        if self.state == DriverState::Running {
            self.state = DriverState::Cancelled;
        }
    }

    fn apply_pending_bounds(&mut self) {
        let Some(bounds) = self.pending_bounds.take() else {
            return;
        };
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.resize(bounds);
        self.system.set_bounds(surface.size());
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn effect(&self) -> EffectId {
        self.effect
    }

    pub fn config(&self) -> &MountConfig {
        &self.config
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn surface(&self) -> Option<&R> {
        self.surface.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    /// Ticks completed since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<R: RenderSurface> AnimationDriver<FrameQueue, R> {
    /// Fires every frame that is due. Frames requested while firing wait for
    /// the next pump. Returns how many ticks ran.
    pub fn pump(&mut self) -> usize {
        let due = self.scheduler.take_due();
        let mut ran = 0;
        for handle in due {
            if self.on_frame(handle) {
                ran += 1;
            }
        }
        ran
    }
}
