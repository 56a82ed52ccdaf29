use core::time::Duration;

use bevy::prelude::*;

use crate::session::Outcome;

/// Which of the three surfaces is on display. Exactly one is visible at any time.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default, States)]
pub enum Screen {
    #[default]
    Start,
    Game,
    End,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default, States)]
pub enum AssetState {
    #[default]
    Loading,
    Loaded,
}

/// Ordering of the per-frame work. Session control must run before the simulation so a restart
/// always lands before the old countdown gets another tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundSet {
    Control,
    Simulate,
    Present,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreChanged(pub u32);

/// Whole seconds left in the round, rounded down.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeChanged(pub u32);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameEnded(pub Outcome);

/// The apple landed in the basket at `position`.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TargetCaught {
    pub position: Vec2,
}

/// A new round began, either from the start screen or through a restart.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundStarted {
    pub round: u32,
}

/// Tuning values, read once into [`CatchSettings`].
pub mod config {
    use bevy::prelude::Vec2;

    pub const ROUND_SECS: u64 = 60;
    /// A round is won with strictly more catches than this.
    pub const WIN_THRESHOLD: u32 = 10;
    /// Losing scores at or above this get the encouraging message.
    pub const ENCOURAGING_SCORE: u32 = 5;

    pub const GRAVITY: f32 = 300.0;
    pub const MAX_FALL_SPEED: f32 = 300.0;
    pub const BASKET_SPEED: f32 = GRAVITY + 50.0;

    pub const BASKET_SIZE: Vec2 = Vec2::new(100.0, 85.0);
    pub const APPLE_SIZE: Vec2 = Vec2::new(40.0, 40.0);
    /// Gap between the bottom of the window and the bottom of the basket.
    pub const BASKET_MARGIN: f32 = 5.0;
}

#[derive(Reflect, Resource, Debug, Clone)]
#[reflect(Resource)]
pub struct CatchSettings {
    pub round_length: Duration,
    pub win_threshold: u32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub basket_speed: f32,
}

impl Default for CatchSettings {
    fn default() -> Self {
        Self {
            round_length: Duration::from_secs(config::ROUND_SECS),
            win_threshold: config::WIN_THRESHOLD,
            gravity: config::GRAVITY,
            max_fall_speed: config::MAX_FALL_SPEED,
            basket_speed: config::BASKET_SPEED,
        }
    }
}

/// Random source for purely visual spread, kept apart from the playfield so effects never shift
/// where apples land.
#[derive(Resource, Deref, DerefMut)]
pub struct CosmeticRng(pub fastrand::Rng);

impl Default for CosmeticRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}
