use arcade_helpers::{WINDOW_HEIGHT, WINDOW_WIDTH};
use bevy::prelude::*;
use bevy::sprite::Anchor;

use crate::core::{RoundSet, ScoreChanged, TimeChanged, config::ROUND_SECS};

const HUD_MARGIN: f32 = 10.0;
const HUD_FONT_SIZE: f32 = 20.0;

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct TimerText;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud).add_systems(
            Update,
            (update_score, update_timer).in_set(RoundSet::Present),
        );
    }
}

fn score_label(score: u32) -> String {
    format!("Score: {score}")
}

fn time_label(seconds: u32) -> String {
    format!("Time: {seconds}")
}

fn spawn_hud(mut commands: Commands) {
    let font = TextFont {
        font_size: HUD_FONT_SIZE,
        ..default()
    };

    commands.spawn((
        Text2d::new(score_label(0)),
        font.clone(),
        TextColor(Color::BLACK),
        Anchor::TopLeft,
        Transform::from_xyz(
            -WINDOW_WIDTH / 2.0 + HUD_MARGIN,
            WINDOW_HEIGHT / 2.0 - HUD_MARGIN,
            20.0,
        ),
        ScoreText,
    ));

    commands.spawn((
        Text2d::new(time_label(ROUND_SECS as u32)),
        font,
        TextColor(Color::BLACK),
        Anchor::TopRight,
        Transform::from_xyz(
            WINDOW_WIDTH / 2.0 - HUD_MARGIN,
            WINDOW_HEIGHT / 2.0 - HUD_MARGIN,
            20.0,
        ),
        TimerText,
    ));
}

fn update_score(
    mut score_changed: EventReader<ScoreChanged>,
    mut query: Query<&mut Text2d, With<ScoreText>>,
) {
    let Some(ScoreChanged(score)) = score_changed.read().last().copied() else {
        return;
    };

    for mut text in &mut query {
        text.0 = score_label(score);
    }
}

fn update_timer(
    mut time_changed: EventReader<TimeChanged>,
    mut query: Query<&mut Text2d, With<TimerText>>,
) {
    let Some(TimeChanged(seconds)) = time_changed.read().last().copied() else {
        return;
    };

    for mut text in &mut query {
        text.0 = time_label(seconds);
    }
}
