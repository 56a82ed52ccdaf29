use arcade_helpers::input::pressed_world_position;
use arcade_helpers::{WINDOW_HEIGHT, WINDOW_WIDTH};
use bevy::math::bounding::{Aabb2d, IntersectsVolume};
use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::assets::GameAssets;
use crate::controls::{CatcherAction, Steering, create_input_map};
use crate::core::config::{APPLE_SIZE, BASKET_MARGIN, BASKET_SIZE};
use crate::core::{
    AssetState, CatchSettings, RoundSet, RoundStarted, ScoreChanged, Screen, TargetCaught,
};
use crate::session::GameSession;

#[derive(Component)]
pub struct Basket;

#[derive(Component)]
pub struct Apple;

#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec2);

/// Random source for apple placement, seedable so tests can replay a drop sequence.
#[derive(Resource, Deref, DerefMut)]
pub struct PlayfieldRng(pub fastrand::Rng);

impl Default for PlayfieldRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}

pub struct PlayfieldPlugin;

impl Plugin for PlayfieldPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<CatcherAction>::default())
            .init_resource::<PlayfieldRng>()
            .add_systems(OnEnter(AssetState::Loaded), spawn_playfield)
            .add_systems(
                Update,
                (
                    reset_playfield,
                    (steer_basket, drop_apple)
                        .chain()
                        .run_if(in_state(Screen::Game)),
                )
                    .chain()
                    .in_set(RoundSet::Simulate),
            );
    }
}

/// Resting place of the basket, centered at the bottom of the window.
pub fn basket_home() -> Vec2 {
    Vec2::new(0.0, -WINDOW_HEIGHT / 2.0 + BASKET_MARGIN + BASKET_SIZE.y / 2.0)
}

/// A random spot along the top edge where the whole apple is visible.
pub fn apple_spawn_point(rng: &mut fastrand::Rng) -> Vec2 {
    let half_span = (WINDOW_WIDTH - APPLE_SIZE.x) / 2.0;
    let x = rng.f32().mul_add(2.0 * half_span, -half_span);
    Vec2::new(x, WINDOW_HEIGHT / 2.0 - APPLE_SIZE.y / 2.0)
}

/// The opening of the basket: the lower sixth of the sprite, three quarters of its width.
pub fn catch_region(basket: Vec2) -> Aabb2d {
    let min = Vec2::new(
        basket.x - BASKET_SIZE.x * 0.4,
        basket.y - BASKET_SIZE.y / 2.0,
    );
    let size = Vec2::new(BASKET_SIZE.x * 0.75, BASKET_SIZE.y / 6.0);
    Aabb2d {
        min,
        max: min + size,
    }
}

pub fn apple_bounds(apple: Vec2) -> Aabb2d {
    Aabb2d::new(apple, APPLE_SIZE / 2.0)
}

/// True once the apple is entirely below the window.
pub fn is_below_field(apple: Vec2) -> bool {
    apple.y + APPLE_SIZE.y / 2.0 < -WINDOW_HEIGHT / 2.0
}

/// Vertical velocity after `dt` seconds of free fall, capped at the terminal speed.
pub fn fall(vertical_velocity: f32, settings: &CatchSettings, dt: f32) -> f32 {
    settings
        .gravity
        .mul_add(-dt, vertical_velocity)
        .max(-settings.max_fall_speed)
}

/// Horizontal basket position after `dt` seconds, kept fully inside the window.
pub fn steer(x: f32, steering: Steering, settings: &CatchSettings, dt: f32) -> f32 {
    let limit = (WINDOW_WIDTH - BASKET_SIZE.x) / 2.0;
    (steering.sign() * settings.basket_speed)
        .mul_add(dt, x)
        .clamp(-limit, limit)
}

fn spawn_playfield(mut commands: Commands, assets: Res<GameAssets>, mut rng: ResMut<PlayfieldRng>) {
    commands.spawn((
        Sprite {
            image: assets.background.clone(),
            custom_size: Some(Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, -10.0),
    ));

    commands.spawn((
        Name::new("Basket"),
        Basket,
        Sprite {
            image: assets.basket.clone(),
            custom_size: Some(BASKET_SIZE),
            ..default()
        },
        Transform::from_translation(basket_home().extend(1.0)),
        InputManagerBundle::<CatcherAction> {
            input_map: create_input_map(),
            ..default()
        },
    ));

    commands.spawn((
        Name::new("Apple"),
        Apple,
        Velocity::default(),
        Sprite {
            image: assets.apple.clone(),
            custom_size: Some(APPLE_SIZE),
            ..default()
        },
        Transform::from_translation(apple_spawn_point(&mut rng).extend(0.0)),
    ));
}

fn reset_playfield(
    mut round_started: EventReader<RoundStarted>,
    mut rng: ResMut<PlayfieldRng>,
    mut basket_query: Query<&mut Transform, (With<Basket>, Without<Apple>)>,
    mut apple_query: Query<(&mut Transform, &mut Velocity), (With<Apple>, Without<Basket>)>,
) {
    if round_started.read().count() == 0 {
        return;
    }

    for mut transform in &mut basket_query {
        transform.translation = basket_home().extend(transform.translation.z);
    }

    for (mut transform, mut velocity) in &mut apple_query {
        transform.translation = apple_spawn_point(&mut rng).extend(transform.translation.z);
        *velocity = Velocity::default();
    }
}

fn steer_basket(
    time: Res<Time>,
    settings: Res<CatchSettings>,
    mouse_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    mut basket_query: Query<(&ActionState<CatcherAction>, &mut Transform), With<Basket>>,
) {
    let Ok((action_state, mut transform)) = basket_query.get_single_mut() else {
        return;
    };

    let mut steering = Steering::from_action_state(action_state);
    // Leafwing Input Manager doesn't support touch input, so we need to check for it here
    if steering == Steering::None {
        if let Some(pointer) =
            pressed_world_position(&mouse_input, &touch_input, &windows, &camera_query)
        {
            steering = Steering::toward(pointer.x, transform.translation.x, BASKET_SIZE.x / 4.0);
        }
    }

    transform.translation.x = steer(
        transform.translation.x,
        steering,
        &settings,
        time.delta_secs(),
    );
}

fn drop_apple(
    time: Res<Time>,
    settings: Res<CatchSettings>,
    mut session: ResMut<GameSession>,
    mut rng: ResMut<PlayfieldRng>,
    basket_query: Query<&Transform, (With<Basket>, Without<Apple>)>,
    mut apple_query: Query<(&mut Transform, &mut Velocity), (With<Apple>, Without<Basket>)>,
    mut score_changed: EventWriter<ScoreChanged>,
    mut target_caught: EventWriter<TargetCaught>,
) {
    let Ok(basket) = basket_query.get_single() else {
        return;
    };
    let Ok((mut transform, mut velocity)) = apple_query.get_single_mut() else {
        return;
    };

    let dt = time.delta_secs();
    velocity.0.y = fall(velocity.0.y, &settings, dt);
    transform.translation.y = velocity.0.y.mul_add(dt, transform.translation.y);

    let apple = transform.translation.truncate();
    let basket = basket.translation.truncate();

    // Catch is checked first, so an apple is never relocated twice in one frame
    if apple_bounds(apple).intersects(&catch_region(basket)) {
        if let Some(score) = session.on_target_caught() {
            score_changed.send(ScoreChanged(score));
            target_caught.send(TargetCaught { position: basket });
        }
        transform.translation = apple_spawn_point(&mut rng).extend(transform.translation.z);
    } else if is_below_field(apple) {
        transform.translation = apple_spawn_point(&mut rng).extend(transform.translation.z);
    }
}
