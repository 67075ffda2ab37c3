//! The HUD: the single Walk button and the remaining-presses readout.

use bevy::prelude::*;

use crate::movement::MoveBudget;
use crate::state::{GameSet, GameState};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Walking), spawn_hud)
            .add_systems(OnEnter(GameState::Finale), despawn_hud)
            .add_systems(
                Update,
                (style_walk_button, update_budget_readout).in_set(GameSet::Effects),
            );
    }
}

const BUTTON_IDLE: Color = Color::srgb(0.25, 0.45, 0.3);
const BUTTON_HOVER: Color = Color::srgb(0.3, 0.55, 0.36);
const BUTTON_PRESSED: Color = Color::srgb(0.18, 0.33, 0.22);

#[derive(Component)]
struct Hud;

/// The advance control; the movement module watches its `Interaction`.
#[derive(Component)]
pub struct WalkButton;

#[derive(Component)]
struct BudgetReadout;

fn spawn_hud(mut commands: Commands, budget: Res<MoveBudget>) {
    commands
        .spawn((
            Hud,
            Name::new("Hud"),
            NodeBundle {
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    align_items: AlignItems::FlexEnd,
                    justify_content: JustifyContent::Center,
                    column_gap: Val::Px(16.0),
                    padding: UiRect::all(Val::Px(12.0)),
                    ..default()
                },
                ..default()
            },
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    WalkButton,
                    ButtonBundle {
                        background_color: BackgroundColor(BUTTON_IDLE),
                        style: Style {
                            width: Val::Px(160.0),
                            height: Val::Px(48.0),
                            align_items: AlignItems::Center,
                            justify_content: JustifyContent::Center,
                            ..default()
                        },
                        ..default()
                    },
                ))
                .with_children(|button| {
                    button.spawn(TextBundle::from_section(
                        "Walk",
                        TextStyle {
                            font_size: 24.0,
                            color: Color::srgba(0.95, 0.95, 0.95, 1.0),
                            ..default()
                        },
                    ));
                });

            parent.spawn((
                BudgetReadout,
                TextBundle::from_section(
                    format!("Steps left: {}", budget.remaining()),
                    TextStyle {
                        font_size: 20.0,
                        color: Color::srgba(0.95, 0.95, 0.95, 1.0),
                        ..default()
                    },
                ),
            ));
        });
}

fn style_walk_button(
    mut buttons: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<WalkButton>),
    >,
) {
    for (interaction, mut background) in &mut buttons {
        *background = BackgroundColor(match interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVER,
            Interaction::None => BUTTON_IDLE,
        });
    }
}

fn update_budget_readout(
    budget: Res<MoveBudget>,
    mut readouts: Query<&mut Text, With<BudgetReadout>>,
) {
    if !budget.is_changed() {
        return;
    }

    for mut text in &mut readouts {
        text.sections[0].value = format!("Steps left: {}", budget.remaining());
    }
}

fn despawn_hud(mut commands: Commands, huds: Query<Entity, With<Hud>>) {
    for entity in &huds {
        commands.entity(entity).despawn_recursive();
    }
}
