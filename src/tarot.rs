//! First vignette: a spread of face-down tarot cards.
//!
//! Each card flips once when pressed. When all three lie face up, a short
//! timer closes the overlay, refills the move budget, and hands the scene
//! back to the input gate.

use bevy::prelude::*;

use crate::config::SceneTuning;
use crate::movement::MoveBudget;
use crate::state::{GameSet, VignetteState};

pub struct TarotPlugin;

impl Plugin for TarotPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(VignetteState::Tarot), spawn_card_overlay)
            .add_systems(OnExit(VignetteState::Tarot), despawn_card_overlay)
            .add_systems(
                Update,
                (flip_cards, close_when_all_flipped)
                    .chain()
                    .in_set(GameSet::Effects)
                    .run_if(in_state(VignetteState::Tarot)),
            );
    }
}

const CARD_FACES: [&str; 3] = ["The Sun", "The Moon", "The Star"];

const CARD_BACK: Color = Color::srgb(0.18, 0.1, 0.35);
const CARD_FACE: Color = Color::srgb(0.93, 0.88, 0.76);

#[derive(Component)]
struct TarotOverlay;

#[derive(Component)]
struct Card {
    face: &'static str,
    flipped: bool,
}

/// Pending close delay; armed once every card has been flipped.
#[derive(Resource, Default)]
struct TarotClose {
    timer: Option<Timer>,
}

fn spawn_card_overlay(mut commands: Commands) {
    commands.init_resource::<TarotClose>();

    commands
        .spawn((
            TarotOverlay,
            Name::new("TarotOverlay"),
            NodeBundle {
                background_color: BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    column_gap: Val::Px(24.0),
                    ..default()
                },
                ..default()
            },
        ))
        .with_children(|parent| {
            for face in CARD_FACES {
                parent
                    .spawn((
                        Card {
                            face,
                            flipped: false,
                        },
                        ButtonBundle {
                            background_color: BackgroundColor(CARD_BACK),
                            style: Style {
                                width: Val::Px(140.0),
                                height: Val::Px(220.0),
                                align_items: AlignItems::Center,
                                justify_content: JustifyContent::Center,
                                ..default()
                            },
                            ..default()
                        },
                    ))
                    .with_children(|card| {
                        card.spawn(TextBundle::from_section(
                            "?",
                            TextStyle {
                                font_size: 28.0,
                                color: Color::srgba(0.9, 0.9, 0.9, 1.0),
                                ..default()
                            },
                        ));
                    });
            }
        });
}

fn flip_cards(
    mut cards: Query<
        (&Interaction, &mut Card, &mut BackgroundColor, &Children),
        Changed<Interaction>,
    >,
    mut texts: Query<&mut Text>,
) {
    for (interaction, mut card, mut background, children) in &mut cards {
        if *interaction != Interaction::Pressed || card.flipped {
            continue;
        }

        card.flipped = true;
        *background = BackgroundColor(CARD_FACE);

        for &child in children {
            if let Ok(mut text) = texts.get_mut(child) {
                text.sections[0].value = card.face.to_string();
                text.sections[0].style.color = Color::srgba(0.1, 0.1, 0.1, 1.0);
            }
        }
    }
}

fn close_when_all_flipped(
    time: Res<Time>,
    tuning: Res<SceneTuning>,
    cards: Query<&Card>,
    mut close: ResMut<TarotClose>,
    mut budget: ResMut<MoveBudget>,
    mut next_vignette: ResMut<NextState<VignetteState>>,
) {
    match close.timer.as_mut() {
        None => {
            if !cards.is_empty() && cards.iter().all(|card| card.flipped) {
                close.timer = Some(Timer::from_seconds(
                    tuning.tarot_close_delay,
                    TimerMode::Once,
                ));
            }
        }
        Some(timer) => {
            if timer.tick(time.delta()).just_finished() {
                budget.refill(tuning.refill_budget);
                next_vignette.set(VignetteState::Idle);
            }
        }
    }
}

fn despawn_card_overlay(mut commands: Commands, overlays: Query<Entity, With<TarotOverlay>>) {
    for entity in &overlays {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<TarotClose>();
}
