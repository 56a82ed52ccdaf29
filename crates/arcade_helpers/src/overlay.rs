use bevy::prelude::*;

/// Time an overlay takes to slide into place.
pub const SLIDE_IN_SECS: f32 = 0.5;
/// How far above its resting place an overlay starts, in percent of the window height.
const SLIDE_IN_OFFSET: f32 = -20.0;

const BUTTON_COLOR: Color = Color::srgb(0.85, 0.25, 0.2);
const BUTTON_HOVERED_COLOR: Color = Color::srgb(0.95, 0.4, 0.3);
const BUTTON_PRESSED_COLOR: Color = Color::srgb(0.6, 0.15, 0.1);

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (animate_slide_in, color_buttons));
    }
}

#[derive(Component)]
pub struct OverlayElement;

/// Slide-in transition played when an overlay appears.
#[derive(Component)]
pub struct SlideIn {
    timer: Timer,
}

impl Default for SlideIn {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(SLIDE_IN_SECS, TimerMode::Once),
        }
    }
}

/// One line of text on an overlay.
pub struct OverlayLine {
    pub text: String,
    pub font_size: f32,
    pub color: Color,
}

impl OverlayLine {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            color: Color::WHITE,
        }
    }

    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Quadratic ease-out, `t` in `[0, 1]`.
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Spawns a full window overlay with the given lines and a single button below them.
///
/// `marker` is put on the overlay root so its owner can despawn it, `button_marker` on the button.
pub fn spawn_overlay(
    commands: &mut Commands,
    marker: impl Component,
    lines: Vec<OverlayLine>,
    button_label: &str,
    button_marker: impl Component,
) -> Entity {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                top: Val::Percent(SLIDE_IN_OFFSET),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(16.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
            SlideIn::default(),
            OverlayElement,
            marker,
        ))
        .with_children(|parent| {
            for line in lines {
                parent.spawn((
                    Text::new(line.text),
                    TextFont {
                        font_size: line.font_size,
                        ..default()
                    },
                    TextColor(line.color),
                    TextLayout::new_with_justify(JustifyText::Center),
                ));
            }

            parent
                .spawn((
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(28.0), Val::Px(12.0)),
                        margin: UiRect::top(Val::Px(12.0)),
                        ..default()
                    },
                    BorderRadius::all(Val::Px(24.0)),
                    BackgroundColor(BUTTON_COLOR),
                    button_marker,
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new(button_label),
                        TextFont {
                            font_size: 24.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                });
        })
        .id()
}

pub fn despawn_overlay<M: Component>(mut commands: Commands, query: Query<Entity, With<M>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

fn animate_slide_in(time: Res<Time>, mut query: Query<(&mut Node, &mut SlideIn)>) {
    for (mut node, mut slide_in) in &mut query {
        if slide_in.timer.finished() {
            continue;
        }
        slide_in.timer.tick(time.delta());
        node.top = Val::Percent(SLIDE_IN_OFFSET * (1.0 - ease_out(slide_in.timer.fraction())));
    }
}

fn color_buttons(
    mut query: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut color) in &mut query {
        color.0 = match interaction {
            Interaction::Pressed => BUTTON_PRESSED_COLOR,
            Interaction::Hovered => BUTTON_HOVERED_COLOR,
            Interaction::None => BUTTON_COLOR,
        };
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::*;

    #[test]
    fn ease_out_is_bounded_and_front_loaded() {
        assert_eq!(ease_out(0.0), 0.0);
        assert_eq!(ease_out(1.0), 1.0);
        assert_eq!(ease_out(-3.0), 0.0);
        assert_eq!(ease_out(2.0), 1.0);
        assert!(ease_out(0.5) > 0.5);
    }

    #[test]
    fn overlay_rests_in_place_once_the_transition_ran_out() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(OverlayPlugin);

        let mut slide_in = SlideIn::default();
        slide_in
            .timer
            .set_elapsed(Duration::from_secs_f32(SLIDE_IN_SECS));
        let overlay = app.world_mut().spawn((Node::default(), slide_in)).id();

        app.update();

        let node = app.world().get::<Node>(overlay).unwrap();
        assert_eq!(node.top, Val::Percent(0.0));
    }
}
