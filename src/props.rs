//! Third vignette: the coffee cup and the journal.
//!
//! Two props appear with a wandering hand; a press inside the cup's box
//! empties it, a press inside the book's box fills its pages, in either
//! order. Presses anywhere else do nothing. Once the cup is empty AND the
//! book holds a drawing, a short delay hides everything and reopens the gate.
//!
//! Hit-testing happens directly in scene space: the window cursor position
//! already uses the same top-left origin.

use bevy::prelude::*;
use bevy::sprite::MaterialMesh2dBundle;
use bevy::window::PrimaryWindow;

use crate::config::SceneTuning;
use crate::geometry::{SceneGeometry, SceneRescaled};
use crate::movement::MoveBudget;
use crate::state::{GameSet, VignetteState};

pub struct PropsPlugin;

impl Plugin for PropsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(VignetteState::CupAndBook), spawn_props)
            .add_systems(OnExit(VignetteState::CupAndBook), despawn_props)
            .add_systems(
                Update,
                (
                    rescale_props
                        .in_set(GameSet::Rescale)
                        .run_if(in_state(VignetteState::CupAndBook)),
                    (
                        handle_prop_presses,
                        refresh_prop_visuals,
                        animate_hand,
                        close_when_done,
                    )
                        .chain()
                        .in_set(GameSet::Effects)
                        .run_if(in_state(VignetteState::CupAndBook)),
                ),
            );
    }
}

const Z_PROP: f32 = 0.6;

/// An axis-aligned scene-space box, top-left anchored like the rest of scene
/// space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PropBox {
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// Interaction state for the vignette; exists only while it is active.
#[derive(Resource)]
pub struct CupAndBook {
    pub cup: PropBox,
    pub book: PropBox,
    pub cup_full: bool,
    pub book_drawn: bool,
    close_timer: Option<Timer>,
}

impl CupAndBook {
    /// Prop boxes at the current scene size: cup on the right, book on the
    /// left, both centered vertically.
    pub fn at_scale(geometry: &SceneGeometry) -> Self {
        let s = geometry.scale;
        Self {
            cup: PropBox {
                x: geometry.width - 150.0 * s,
                y: geometry.height * 0.5,
                width: 80.0 * s,
                height: 100.0 * s,
            },
            book: PropBox {
                x: 100.0 * s,
                y: geometry.height * 0.5,
                width: 120.0 * s,
                height: 160.0 * s,
            },
            cup_full: true,
            book_drawn: false,
            close_timer: None,
        }
    }

    /// Applies one press at `point`. Both boxes are tested independently so a
    /// press in their (theoretical) overlap would affect both.
    pub fn apply_press(&mut self, point: Vec2) {
        if self.cup.contains(point) {
            self.cup_full = false;
        }
        if self.book.contains(point) {
            self.book_drawn = true;
        }
    }

    /// The vignette's completion condition.
    pub fn satisfied(&self) -> bool {
        !self.cup_full && self.book_drawn
    }
}

#[derive(Component)]
struct PropPiece;

#[derive(Component)]
struct CupFill;

#[derive(Component)]
struct BookDrawing;

/// The wandering hand; wobbles around the book with its own phase.
#[derive(Component)]
struct Hand {
    phase: f32,
}

fn spawn_props(
    mut commands: Commands,
    geometry: Res<SceneGeometry>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let state = CupAndBook::at_scale(&geometry);
    spawn_prop_pieces(&mut commands, &state, &geometry, &mut meshes, &mut materials);
    commands.insert_resource(state);
}

/// A mid-vignette resize moves the prop boxes but keeps the interaction flags
/// and any pending close timer; the visuals are rebuilt at the new scale.
fn rescale_props(
    mut rescaled: EventReader<SceneRescaled>,
    mut commands: Commands,
    geometry: Res<SceneGeometry>,
    mut state: ResMut<CupAndBook>,
    pieces: Query<Entity, With<PropPiece>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if rescaled.is_empty() {
        return;
    }
    rescaled.clear();

    let fresh = CupAndBook::at_scale(&geometry);
    state.cup = fresh.cup;
    state.book = fresh.book;

    for entity in &pieces {
        commands.entity(entity).despawn_recursive();
    }
    spawn_prop_pieces(&mut commands, &state, &geometry, &mut meshes, &mut materials);
}

fn spawn_prop_pieces(
    commands: &mut Commands,
    state: &CupAndBook,
    geometry: &SceneGeometry,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
) {
    let s = geometry.scale;

    // Cup body with the coffee fill as a toggleable child.
    let cup_center = state.cup.center();
    commands
        .spawn((
            PropPiece,
            Name::new("Cup"),
            MaterialMesh2dBundle {
                mesh: meshes
                    .add(Rectangle::new(state.cup.width, state.cup.height))
                    .into(),
                material: materials.add(Color::srgba(1.0, 1.0, 1.0, 0.85)),
                transform: Transform::from_translation(geometry.scene_to_world(
                    cup_center.x,
                    cup_center.y,
                    Z_PROP,
                )),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                CupFill,
                MaterialMesh2dBundle {
                    mesh: meshes
                        .add(Rectangle::new(
                            state.cup.width - 20.0 * s,
                            state.cup.height - 30.0 * s,
                        ))
                        .into(),
                    material: materials.add(Color::srgba(0.55, 0.27, 0.07, 0.9)),
                    transform: Transform::from_xyz(0.0, 5.0 * s, 0.01),
                    ..default()
                },
            ));
        });

    // Book with blank pages; the scribbles appear once drawn in.
    let book_center = state.book.center();
    commands
        .spawn((
            PropPiece,
            Name::new("Book"),
            MaterialMesh2dBundle {
                mesh: meshes
                    .add(Rectangle::new(state.book.width, state.book.height))
                    .into(),
                material: materials.add(Color::srgb(0.55, 0.27, 0.07)),
                transform: Transform::from_translation(geometry.scene_to_world(
                    book_center.x,
                    book_center.y,
                    Z_PROP,
                )),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn(MaterialMesh2dBundle {
                mesh: meshes
                    .add(Rectangle::new(
                        state.book.width - 10.0 * s,
                        state.book.height - 10.0 * s,
                    ))
                    .into(),
                material: materials.add(Color::srgb(1.0, 0.97, 0.86)),
                transform: Transform::from_xyz(0.0, 0.0, 0.01),
                ..default()
            });
            parent.spawn((
                BookDrawing,
                MaterialMesh2dBundle {
                    mesh: meshes
                        .add(Rectangle::new(
                            state.book.width - 40.0 * s,
                            state.book.height - 60.0 * s,
                        ))
                        .into(),
                    material: materials.add(Color::srgba(0.1, 0.1, 0.1, 0.7)),
                    transform: Transform::from_xyz(0.0, 0.0, 0.02),
                    ..default()
                },
            ));
        });

    // The hand hovers near the book.
    commands.spawn((
        PropPiece,
        Hand { phase: 0.0 },
        Name::new("Hand"),
        MaterialMesh2dBundle {
            mesh: meshes.add(Ellipse::new(15.0 * s, 10.0 * s)).into(),
            material: materials.add(Color::srgb(1.0, 0.89, 0.77)),
            transform: Transform::from_translation(geometry.scene_to_world(
                book_center.x,
                book_center.y - state.book.height,
                Z_PROP + 0.05,
            )),
            ..default()
        },
    ));
}

/// Feeds pointer presses (mouse or touch) through the hit-test.
fn handle_prop_presses(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut state: ResMut<CupAndBook>,
) {
    if mouse.just_pressed(MouseButton::Left) {
        if let Ok(window) = windows.get_single() {
            if let Some(cursor) = window.cursor_position() {
                state.apply_press(cursor);
            }
        }
    }

    for touch in touches.iter_just_pressed() {
        state.apply_press(touch.position());
    }
}

/// Mirrors the interaction flags onto the prop visuals.
fn refresh_prop_visuals(
    state: Res<CupAndBook>,
    mut fills: Query<&mut Visibility, (With<CupFill>, Without<BookDrawing>)>,
    mut drawings: Query<&mut Visibility, (With<BookDrawing>, Without<CupFill>)>,
) {
    if !state.is_changed() {
        return;
    }

    for mut visibility in &mut fills {
        *visibility = if state.cup_full {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    for mut visibility in &mut drawings {
        *visibility = if state.book_drawn {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

fn animate_hand(
    time: Res<Time>,
    geometry: Res<SceneGeometry>,
    state: Res<CupAndBook>,
    mut hands: Query<(&mut Hand, &mut Transform)>,
) {
    let book_center = state.book.center();
    for (mut hand, mut transform) in &mut hands {
        hand.phase += 3.0 * time.delta_seconds();
        let x = book_center.x + hand.phase.sin() * 10.0 * geometry.scale;
        let y = book_center.y + hand.phase.cos() * 5.0 * geometry.scale;
        transform.translation = geometry.scene_to_world(x, y, Z_PROP + 0.05);
        transform.rotation = Quat::from_rotation_z((hand.phase * 0.5).sin() * 0.2);
    }
}

fn close_when_done(
    time: Res<Time>,
    tuning: Res<SceneTuning>,
    mut state: ResMut<CupAndBook>,
    mut budget: ResMut<MoveBudget>,
    mut next_vignette: ResMut<NextState<VignetteState>>,
) {
    if state.close_timer.is_none() {
        if state.satisfied() {
            state.close_timer = Some(Timer::from_seconds(
                tuning.props_close_delay,
                TimerMode::Once,
            ));
        }
        return;
    }

    if let Some(timer) = state.close_timer.as_mut() {
        if timer.tick(time.delta()).just_finished() {
            budget.refill(tuning.refill_budget);
            next_vignette.set(VignetteState::Idle);
        }
    }
}

fn despawn_props(mut commands: Commands, pieces: Query<Entity, With<PropPiece>>) {
    for entity in &pieces {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<CupAndBook>();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> CupAndBook {
        CupAndBook::at_scale(&SceneGeometry::default())
    }

    #[test]
    fn boxes_contain_their_interiors_and_edges() {
        let state = state();
        let inside = Vec2::new(state.cup.x + 1.0, state.cup.y + 1.0);
        assert!(state.cup.contains(inside));
        assert!(state
            .cup
            .contains(Vec2::new(state.cup.x, state.cup.y + state.cup.height)));
        assert!(!state.cup.contains(Vec2::new(state.cup.x - 1.0, state.cup.y)));
    }

    #[test]
    fn press_in_the_cup_empties_it() {
        let mut state = state();
        state.apply_press(state.cup.center());
        assert!(!state.cup_full);
        assert!(!state.book_drawn);
        assert!(!state.satisfied());
    }

    #[test]
    fn press_in_the_book_draws_in_it() {
        let mut state = state();
        state.apply_press(state.book.center());
        assert!(state.cup_full);
        assert!(state.book_drawn);
        assert!(!state.satisfied());
    }

    #[test]
    fn presses_elsewhere_change_nothing() {
        let mut state = state();
        state.apply_press(Vec2::new(0.0, 0.0));
        state.apply_press(Vec2::new(640.0, 10.0));
        assert!(state.cup_full);
        assert!(!state.book_drawn);
    }

    #[test]
    fn completion_requires_both_in_either_order() {
        let mut state = state();
        state.apply_press(state.book.center());
        state.apply_press(state.cup.center());
        assert!(state.satisfied());

        let mut state = CupAndBook::at_scale(&SceneGeometry::default());
        state.apply_press(state.cup.center());
        state.apply_press(state.book.center());
        assert!(state.satisfied());
    }

    #[test]
    fn repeat_presses_are_idempotent() {
        let mut state = state();
        state.apply_press(state.cup.center());
        state.apply_press(state.cup.center());
        assert!(!state.cup_full);
        assert!(!state.satisfied());
    }

    #[test]
    fn completion_refills_the_budget_and_reopens_the_gate() {
        use crate::state::GameState;
        use bevy::state::app::StatesPlugin;

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<GameState>();
        app.add_sub_state::<VignetteState>();

        // A zero close delay lets the timer fire on the next tick.
        let tuning = SceneTuning {
            props_close_delay: 0.0,
            ..SceneTuning::default()
        };
        app.insert_resource(tuning);
        app.insert_resource(MoveBudget::new(0));
        app.add_systems(
            Update,
            close_when_done.run_if(in_state(VignetteState::CupAndBook)),
        );

        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Walking);
        app.update();

        let mut vignette = state();
        vignette.apply_press(vignette.cup.center());
        vignette.apply_press(vignette.book.center());
        assert!(vignette.satisfied());
        app.insert_resource(vignette);

        app.world_mut()
            .resource_mut::<NextState<VignetteState>>()
            .set(VignetteState::CupAndBook);
        app.update();

        // First pass arms the timer, second fires it, third applies the
        // queued transition back to Idle.
        app.update();
        app.update();
        app.update();

        assert_eq!(
            app.world().resource::<MoveBudget>().remaining(),
            SceneTuning::default().refill_budget
        );
        assert_eq!(
            *app.world().resource::<State<VignetteState>>().get(),
            VignetteState::Idle
        );
    }
}
