use crate::effects::{
    aurora::AuroraBand, bubbles::Bubble, butterflies::Butterfly, confetti::ConfettiPiece, diyas::Diya,
    embers::Ember, fireflies::Firefly, hearts::Heart, leaves::Leaf, petals::Petal, rain::Raindrop,
    snowfall::Snowflake, sparkles::Sparkle, stars::Star, sunrays::Sunray, EffectId,
};
use crate::geometry::Point;

/// Kinematic core shared by every particle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub rotation: f32,
    pub spin: f32,
    pub size: f32,
    pub opacity: f32,
}

impl Body {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// One tick of straight-line motion plus rotation.
    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.rotation += self.spin;
    }

    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.vx, self.vy, self.rotation, self.spin, self.size, self.opacity]
            .iter()
            .all(|v| v.is_finite())
    }
}

macro_rules! kinds {
    ($($variant:ident($payload:ty) => $effect:ident,)*) => {
        /// Effect-specific payload. One variant per effect; a particle's
        /// variant is fixed at spawn.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Kind {
            $($variant($payload),)*
        }

        impl Kind {
            pub fn effect(&self) -> EffectId {
                match self {
                    $(Kind::$variant(_) => EffectId::$effect,)*
                }
            }
        }

        $(
            impl From<$payload> for Kind {
                fn from(payload: $payload) -> Self {
                    Kind::$variant(payload)
                }
            }
        )*
    };
}

kinds! {
    Snowflake(Snowflake) => Snowfall,
    Raindrop(Raindrop) => Rain,
    Heart(Heart) => Hearts,
    Petal(Petal) => Petals,
    Leaf(Leaf) => Leaves,
    Confetti(ConfettiPiece) => Confetti,
    Ember(Ember) => Embers,
    Bubble(Bubble) => Bubbles,
    Diya(Diya) => Diyas,
    Sparkle(Sparkle) => Sparkles,
    Butterfly(Butterfly) => Butterflies,
    Firefly(Firefly) => Fireflies,
    Star(Star) => Stars,
    Sunray(Sunray) => Sunrays,
    Aurora(AuroraBand) => Aurora,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub body: Body,
    pub kind: Kind,
    age: u64,
}

impl Particle {
    pub fn new(body: Body, kind: impl Into<Kind>) -> Self {
        Self { body, kind: kind.into(), age: 0 }
    }

    pub fn effect(&self) -> EffectId {
        self.kind.effect()
    }

    /// Ticks survived since spawn.
    pub fn age(&self) -> u64 {
        self.age
    }

    pub(crate) fn grow_older(&mut self) {
        self.age += 1;
    }
}
