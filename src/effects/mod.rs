//! Catalog of overlay effects.
//!
//! Every effect is a stateless unit struct implementing [`EffectDefinition`];
//! [`definition`] is the dispatch table from [`EffectId`] to behavior. All
//! mutable state lives in the particles themselves.

use crate::color::Rgb;
use crate::error::EngineError;
use crate::geometry::Bounds;
use crate::particle::{Body, Particle};
use crate::surface::RenderSurface;
use std::fmt;
use std::str::FromStr;

pub mod aurora;
pub mod bubbles;
pub mod butterflies;
pub mod confetti;
pub mod diyas;
pub mod embers;
pub mod fireflies;
pub mod hearts;
pub mod leaves;
pub mod petals;
pub mod rain;
pub mod snowfall;
pub mod sparkles;
pub mod stars;
pub mod sunrays;

/// Pool size for effects that don't pick their own.
pub const DEFAULT_COUNT: usize = 50;

/// Falling particles recycle once this far below the bottom edge.
pub const FALL_MARGIN: f32 = 20.0;

/// Free-flying particles recycle once this far outside any edge.
pub const OFFSCREEN_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectId {
    None,
    Snowfall,
    Rain,
    Hearts,
    Petals,
    Leaves,
    Confetti,
    Embers,
    Bubbles,
    Diyas,
    Sparkles,
    Butterflies,
    Fireflies,
    Stars,
    Sunrays,
    Aurora,
}

impl EffectId {
    pub const ALL: [EffectId; 16] = [
        EffectId::None,
        EffectId::Snowfall,
        EffectId::Rain,
        EffectId::Hearts,
        EffectId::Petals,
        EffectId::Leaves,
        EffectId::Confetti,
        EffectId::Embers,
        EffectId::Bubbles,
        EffectId::Diyas,
        EffectId::Sparkles,
        EffectId::Butterflies,
        EffectId::Fireflies,
        EffectId::Stars,
        EffectId::Sunrays,
        EffectId::Aurora,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectId::None => "none",
            EffectId::Snowfall => "snowfall",
            EffectId::Rain => "rain",
            EffectId::Hearts => "hearts",
            EffectId::Petals => "petals",
            EffectId::Leaves => "leaves",
            EffectId::Confetti => "confetti",
            EffectId::Embers => "embers",
            EffectId::Bubbles => "bubbles",
            EffectId::Diyas => "diyas",
            EffectId::Sparkles => "sparkles",
            EffectId::Butterflies => "butterflies",
            EffectId::Fireflies => "fireflies",
            EffectId::Stars => "stars",
            EffectId::Sunrays => "sunrays",
            EffectId::Aurora => "aurora",
        }
    }

    /// Next id in catalog order, wrapping around.
    pub fn next(self) -> EffectId {
        let idx = Self::ALL.iter().position(|id| *id == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> EffectId {
        let idx = Self::ALL.iter().position(|id| *id == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl FromStr for EffectId {
    type Err = EngineError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_ascii_lowercase();
        if normalized == "snow" {
            return Ok(EffectId::Snowfall);
        }
        EffectId::ALL
            .into_iter()
            .find(|id| id.name() == normalized)
            .ok_or_else(|| EngineError::UnknownEffect(name.to_string()))
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a freshly spawned particle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Anywhere along its journey, so a new pool looks full at once.
    Scattered,
    /// At the effect's entry edge, used when recycling.
    Entering,
}

/// Outcome of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Live,
    Recycle,
}

pub trait EffectDefinition: Sync {
    fn id(&self) -> EffectId;

    fn default_count(&self) -> usize {
        DEFAULT_COUNT
    }

    fn spawn(&self, bounds: Bounds, color: Rgb, placement: Placement) -> Particle;

    /// Advances `particle` one tick. A particle of another effect is
    /// reported for recycling so the pool heals itself.
    fn step(&self, particle: &mut Particle, bounds: Bounds) -> Fate;

    fn render(&self, surface: &mut dyn RenderSurface, particle: &Particle);
}

static CATALOG: [&dyn EffectDefinition; 15] = [
    &snowfall::Snowfall,
    &rain::Rain,
    &hearts::Hearts,
    &petals::Petals,
    &leaves::Leaves,
    &confetti::Confetti,
    &embers::Embers,
    &bubbles::Bubbles,
    &diyas::Diyas,
    &sparkles::Sparkles,
    &butterflies::Butterflies,
    &fireflies::Fireflies,
    &stars::Stars,
    &sunrays::Sunrays,
    &aurora::Aurora,
];

/// Behavior for `id`; `None` has no definition.
pub fn definition(id: EffectId) -> Option<&'static dyn EffectDefinition> {
    CATALOG.iter().copied().find(|def| def.id() == id)
}

/// Uniform sample in `[lo, hi)`.
pub(crate) fn between(lo: f32, hi: f32) -> f32 {
    lo + fastrand::f32() * (hi - lo)
}

pub(crate) fn pick<T: Copy>(items: &[T]) -> T {
    items[fastrand::usize(..items.len())]
}

pub(crate) fn either_sign() -> f32 {
    if fastrand::bool() { 1.0 } else { -1.0 }
}

/// Entry height for something that falls: scattered over the surface, or
/// just above the top edge.
pub(crate) fn falling_start(bounds: Bounds, size: f32, placement: Placement) -> f32 {
    match placement {
        Placement::Scattered => between(0.0, bounds.height),
        Placement::Entering => -size,
    }
}

/// Entry height for something that rises: scattered, or just below the bottom.
pub(crate) fn rising_start(bounds: Bounds, size: f32, placement: Placement) -> f32 {
    match placement {
        Placement::Scattered => between(0.0, bounds.height),
        Placement::Entering => bounds.height + size,
    }
}

pub(crate) fn fell_out(body: &Body, bounds: Bounds) -> bool {
    body.y > bounds.height + FALL_MARGIN
}

pub(crate) fn rose_out(body: &Body) -> bool {
    body.y < -body.size
}

/// Wind can push falling particles sideways; they re-enter on the other side.
pub(crate) fn wrap_horizontally(body: &mut Body, bounds: Bounds) {
    if body.x > bounds.width + body.size {
        body.x = -body.size;
    } else if body.x < -body.size {
        body.x = bounds.width + body.size;
    }
}

/// Keeps ambient particles on the surface after it shrinks.
pub(crate) fn clamp_into(body: &mut Body, bounds: Bounds) {
    let point = bounds.clamp(body.position());
    body.x = point.x;
    body.y = point.y;
}
