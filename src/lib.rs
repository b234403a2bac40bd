//! Ambient overlay particle effects.
//!
//! A [`ParticleSystem`] keeps a fixed-size pool for one of sixteen effects,
//! an [`AnimationDriver`] steps and redraws it once per host frame, and a
//! [`RenderSurface`] back-end turns the draw calls into output.

pub mod color;
pub mod config;
pub mod driver;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod particle;
pub mod scheduler;
pub mod surface;
pub mod system;

pub use color::Rgb;
pub use config::{ConfigFile, HostSettings, MountConfig};
pub use driver::{AnimationDriver, DriverState};
pub use effects::{definition, EffectDefinition, EffectId, Fate, Placement};
pub use error::EngineError;
pub use geometry::{Bounds, Point};
pub use particle::{Body, Kind, Particle};
pub use scheduler::{FrameHandle, FrameQueue, FrameScheduler};
pub use surface::{GradientBand, RecordingSurface, RenderSurface, TerminalSurface};
pub use system::ParticleSystem;
