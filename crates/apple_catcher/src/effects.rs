use bevy::color::palettes::css::GREEN;
use bevy::prelude::*;

use arcade_helpers::floating_text::{
    animate_floating_texts, despawn_floating_texts, spawn_floating_text,
};

use crate::assets::GameAssets;
use crate::core::{AssetState, CosmeticRng, RoundSet, RoundStarted, Screen, TargetCaught};
use crate::playfield::Basket;

/// How long the basket keeps emitting after a catch.
const BURST_SECS: f32 = 0.1;
const PARTICLES_PER_FRAME: usize = 2;
const PARTICLE_SPEED: f32 = 100.0;
const PARTICLE_GRAVITY: f32 = 100.0;
const PARTICLE_LIFETIME_SECS: f32 = 1.0;
const PARTICLE_SIZE: f32 = 12.0;

/// Marks the basket as emitting a burst of coins.
#[derive(Component)]
pub struct CatchBurst(Timer);

#[derive(Component)]
pub struct CoinParticle {
    velocity: Vec2,
    lifetime: Timer,
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CosmeticRng>()
            .add_systems(
                Update,
                (clear_effects, start_burst)
                    .chain()
                    .in_set(RoundSet::Present),
            )
            .add_systems(
                Update,
                (emit_burst, move_particles, animate_floating_texts)
                    .in_set(RoundSet::Present)
                    .after(start_burst)
                    .run_if(in_state(Screen::Game).and(in_state(AssetState::Loaded))),
            );
    }
}

/// Random direction at the emitter speed.
pub fn spray(rng: &mut fastrand::Rng) -> Vec2 {
    Vec2::from_angle(rng.f32() * core::f32::consts::TAU) * PARTICLE_SPEED
}

/// Drops every effect still in flight when a round starts.
fn clear_effects(
    mut commands: Commands,
    mut round_started: EventReader<RoundStarted>,
    particles: Query<Entity, With<CoinParticle>>,
    bursts: Query<Entity, With<CatchBurst>>,
    floating_texts: Query<Entity, With<arcade_helpers::floating_text::FloatingText>>,
) {
    if round_started.read().count() == 0 {
        return;
    }

    for entity in &particles {
        commands.entity(entity).despawn();
    }
    for entity in &bursts {
        commands.entity(entity).remove::<CatchBurst>();
    }
    despawn_floating_texts(commands, floating_texts);
}

fn start_burst(
    mut commands: Commands,
    mut target_caught: EventReader<TargetCaught>,
    basket_query: Query<Entity, With<Basket>>,
) {
    for caught in target_caught.read() {
        for basket in &basket_query {
            commands
                .entity(basket)
                .insert(CatchBurst(Timer::from_seconds(BURST_SECS, TimerMode::Once)));
        }
        spawn_floating_text(&mut commands, caught.position, "+1", GREEN);
    }
}

fn emit_burst(
    mut commands: Commands,
    time: Res<Time>,
    assets: Res<GameAssets>,
    mut rng: ResMut<CosmeticRng>,
    mut basket_query: Query<(Entity, &Transform, &mut CatchBurst)>,
) {
    for (basket, transform, mut burst) in &mut basket_query {
        burst.0.tick(time.delta());
        if burst.0.finished() {
            commands.entity(basket).remove::<CatchBurst>();
            continue;
        }

        for _ in 0..PARTICLES_PER_FRAME {
            commands.spawn((
                CoinParticle {
                    velocity: spray(&mut rng),
                    lifetime: Timer::from_seconds(PARTICLE_LIFETIME_SECS, TimerMode::Once),
                },
                Sprite {
                    image: assets.money.clone(),
                    custom_size: Some(Vec2::splat(PARTICLE_SIZE)),
                    ..default()
                },
                Transform::from_translation(transform.translation.truncate().extend(5.0)),
            ));
        }
    }
}

fn move_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut Sprite, &mut CoinParticle)>,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, mut sprite, mut particle) in &mut query {
        particle.lifetime.tick(time.delta());
        if particle.lifetime.finished() {
            commands.entity(entity).despawn();
            continue;
        }

        particle.velocity.y -= PARTICLE_GRAVITY * dt;
        transform.translation += (particle.velocity * dt).extend(0.0);
        sprite.color.set_alpha(1.0 - particle.lifetime.fraction());
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;

    #[test]
    fn spray_goes_out_at_emitter_speed() {
        let mut rng = fastrand::Rng::with_seed(3);

        for _ in 0..50 {
            assert!((spray(&mut rng).length() - PARTICLE_SPEED).abs() < 1e-2);
        }
    }

    #[test]
    fn new_round_discards_effects_in_flight() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<Screen>()
            .init_state::<AssetState>()
            .add_event::<RoundStarted>()
            .add_event::<TargetCaught>()
            .configure_sets(
                Update,
                (RoundSet::Control, RoundSet::Simulate, RoundSet::Present).chain(),
            )
            .add_plugins(EffectsPlugin);

        let basket = app.world_mut().spawn((Basket, Transform::default())).id();
        app.world_mut().send_event(TargetCaught {
            position: Vec2::ZERO,
        });
        app.update();

        assert!(app.world().get::<CatchBurst>(basket).is_some());
        let mut floating = app
            .world_mut()
            .query::<&arcade_helpers::floating_text::FloatingText>();
        assert_eq!(floating.iter(app.world()).count(), 1);

        app.world_mut().spawn(CoinParticle {
            velocity: Vec2::X,
            lifetime: Timer::from_seconds(PARTICLE_LIFETIME_SECS, TimerMode::Once),
        });
        app.world_mut().send_event(RoundStarted { round: 2 });
        app.update();

        assert!(app.world().get::<CatchBurst>(basket).is_none());
        let mut particles = app.world_mut().query::<&CoinParticle>();
        assert_eq!(particles.iter(app.world()).count(), 0);
        let mut floating = app
            .world_mut()
            .query::<&arcade_helpers::floating_text::FloatingText>();
        assert_eq!(floating.iter(app.world()).count(), 0);
    }
}
