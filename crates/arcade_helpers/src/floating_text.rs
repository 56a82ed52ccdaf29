use core::time::Duration;

use bevy::prelude::*;

/// How far a floating text rises before it disappears.
const RISE: f32 = 50.0;

#[derive(Component)]
pub struct FloatingText {
    timer: Timer,
    origin: Vec2,
}

/// Spawns a short-lived world-space text at `position` that rises and fades out.
pub fn spawn_floating_text(commands: &mut Commands, position: Vec2, text: &str, color: Srgba) {
    commands.spawn((
        Text2d::new(text),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::Srgba(color)),
        Transform::from_translation(position.extend(10.0)),
        FloatingText {
            timer: Timer::new(Duration::from_secs(1), TimerMode::Once),
            origin: position,
        },
    ));
}

pub fn animate_floating_texts(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut TextColor, &mut FloatingText)>,
) {
    for (entity, mut transform, mut color, mut floating_text) in &mut query {
        floating_text.timer.tick(time.delta());
        let progress = floating_text.timer.fraction();

        transform.translation.y = RISE.mul_add(progress, floating_text.origin.y);
        color.0.set_alpha(1.0 - progress);

        if floating_text.timer.finished() {
            commands.entity(entity).despawn();
        }
    }
}

pub fn despawn_floating_texts(mut commands: Commands, query: Query<Entity, With<FloatingText>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}
