//! Input tracking: pointer, touch and keyboard → [`PendingInput`].
//!
//! ## Pipeline (runs in [`FrameSet::Input`] every frame, before the step)
//!
//! 1. [`pointer_aim_system`]: cursor / touch movement overwrites the aim target.
//! 2. [`keyboard_input_system`]: rebuilds the held movement-key set; Space raises a fire request.
//! 3. [`pointer_fire_system`]: left click / new touch raises a fire request.
//! 4. [`loop_control_system`]: Escape / Enter / click drive start, stop and restart.
//!
//! The **pending input surface** (`PendingInput`) is the only state shared
//! between input handling and the simulation.  Input systems only write to
//! it; `Simulation::step` reads it once per frame and consumes the fire
//! request.  Tests populate the resource directly and never touch Bevy input.
//!
//! Cooldown gating is not done here: the step compares timestamps when it
//! consumes the request, so no timers exist outside the frame loop.

use std::collections::HashSet;

use crate::lifecycle::{FrameSet, LoopState};
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};

/// A direction the ship can be pushed in from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Left,
    Right,
    Up,
    Down,
}

impl MoveKey {
    /// Unit displacement in playfield coordinates (+Y is down).
    #[inline]
    pub fn direction(self) -> Vec2 {
        match self {
            MoveKey::Left => Vec2::new(-1.0, 0.0),
            MoveKey::Right => Vec2::new(1.0, 0.0),
            MoveKey::Up => Vec2::new(0.0, -1.0),
            MoveKey::Down => Vec2::new(0.0, 1.0),
        }
    }
}

/// Physical keys bound to each movement direction.
const MOVE_BINDINGS: [(KeyCode, MoveKey); 8] = [
    (KeyCode::ArrowLeft, MoveKey::Left),
    (KeyCode::KeyA, MoveKey::Left),
    (KeyCode::ArrowRight, MoveKey::Right),
    (KeyCode::KeyD, MoveKey::Right),
    (KeyCode::ArrowUp, MoveKey::Up),
    (KeyCode::KeyW, MoveKey::Up),
    (KeyCode::ArrowDown, MoveKey::Down),
    (KeyCode::KeyS, MoveKey::Down),
];

/// Everything the player asked for since the last simulation step.
///
/// Writes are plain overwrites (last write wins).  The step reads the whole
/// struct once at the top of its turn.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PendingInput {
    /// Where the ship should drift to, in playfield coordinates.
    pub aim: Vec2,
    /// Movement keys currently held down.
    pub held: HashSet<MoveKey>,
    /// Edge-triggered: a fire command arrived and has not been consumed yet.
    pub fire_requested: bool,
    /// Edge-triggered: the player asked to play again after a game over.
    pub restart_requested: bool,
    /// Bumped on every aim overwrite.
    aim_revision: u64,
}

impl PendingInput {
    /// Fresh input state with the aim target parked at `point`.
    pub fn aimed_at(point: Vec2) -> Self {
        Self {
            aim: point,
            ..Default::default()
        }
    }

    /// Overwrite the aim target.  No smoothing happens at this layer.
    #[inline]
    pub fn point_at(&mut self, point: Vec2) {
        self.aim = point;
        self.aim_revision = self.aim_revision.wrapping_add(1);
    }

    /// Changes whenever the aim target is overwritten, even to the same point.
    #[inline]
    pub fn aim_revision(&self) -> u64 {
        self.aim_revision
    }

    pub fn press(&mut self, key: MoveKey) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: MoveKey) {
        self.held.remove(&key);
    }

    #[inline]
    pub fn request_fire(&mut self) {
        self.fire_requested = true;
    }

    /// Consume the pending fire request, returning whether one was raised.
    #[inline]
    pub fn take_fire_request(&mut self) -> bool {
        std::mem::take(&mut self.fire_requested)
    }

    /// Consume the pending restart request.
    #[inline]
    pub fn take_restart_request(&mut self) -> bool {
        std::mem::take(&mut self.restart_requested)
    }

    /// Summed per-axis direction of the held keys, or `None` when no movement
    /// key is down.
    ///
    /// Opposite keys cancel to a zero vector, which still counts as keyboard
    /// control: the ship holds still instead of following the pointer.
    pub fn keyboard_direction(&self) -> Option<Vec2> {
        if self.held.is_empty() {
            return None;
        }
        Some(self.held.iter().map(|key| key.direction()).sum())
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Input systems in [`FrameSet::Input`].  Reads Bevy's input resources and
/// writes [`PendingInput`], which [`LoopPlugin`](crate::lifecycle::LoopPlugin)
/// registers.
pub struct PlayerInputPlugin;

impl Plugin for PlayerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                pointer_aim_system,
                keyboard_input_system,
                pointer_fire_system,
                loop_control_system,
            )
                .chain()
                .in_set(FrameSet::Input),
        );
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Overwrite the aim target from cursor motion on the primary window and from
/// any moving touch.
///
/// Only *movement* updates the target, so a resting cursor does not pull the
/// ship back after keyboard steering.
pub fn pointer_aim_system(
    mut cursor_moves: MessageReader<CursorMoved>,
    primary: Query<Entity, With<PrimaryWindow>>,
    touches: Res<Touches>,
    mut input: ResMut<PendingInput>,
) {
    let primary = primary.single().ok();
    for moved in cursor_moves.read() {
        if primary.is_none_or(|window| window == moved.window) {
            input.point_at(moved.position);
        }
    }

    if let Some(touch) = touches.iter().find(|touch| touch.delta() != Vec2::ZERO) {
        input.point_at(touch.position());
    }
}

/// Rebuild the held movement-key set and turn Space into a fire request.
pub fn keyboard_input_system(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<PendingInput>) {
    input.held.clear();
    for (code, key) in MOVE_BINDINGS {
        if keys.pressed(code) {
            input.press(key);
        }
    }

    if keys.just_pressed(KeyCode::Space) {
        input.request_fire();
    }
}

/// Left click or a new touch raises a fire request.
pub fn pointer_fire_system(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut input: ResMut<PendingInput>,
) {
    if mouse.just_pressed(MouseButton::Left) || touches.any_just_pressed() {
        input.request_fire();
    }
}

/// Translate menu-level commands into loop transitions.
///
/// | State     | Escape          | Enter / click / tap       |
/// |-----------|-----------------|---------------------------|
/// | `Stopped` | quit the app    | start a session           |
/// | `Running` | stop (to menu)  | request restart           |
///
/// A restart request is ignored by the simulation unless the session is over.
pub fn loop_control_system(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    state: Res<State<LoopState>>,
    mut next_state: ResMut<NextState<LoopState>>,
    mut input: ResMut<PendingInput>,
    mut exit: MessageWriter<AppExit>,
) {
    let confirm = keys.just_pressed(KeyCode::Enter)
        || mouse.just_pressed(MouseButton::Left)
        || touches.any_just_pressed();

    match state.get() {
        LoopState::Stopped => {
            if keys.just_pressed(KeyCode::Escape) {
                exit.write(AppExit::Success);
            } else if confirm {
                next_state.set(LoopState::Running);
            }
        }
        LoopState::Running => {
            if keys.just_pressed(KeyCode::Escape) {
                next_state.set(LoopState::Stopped);
            } else if confirm {
                input.restart_requested = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;
    use bevy::input::touch::{touch_screen_input_system, TouchInput, TouchPhase};
    use bevy::state::app::StatesPlugin;

    #[test]
    fn no_held_keys_means_pointer_control() {
        let input = PendingInput::default();
        assert_eq!(input.keyboard_direction(), None);
    }

    #[test]
    fn held_keys_sum_per_axis() {
        let mut input = PendingInput::default();
        input.press(MoveKey::Left);
        input.press(MoveKey::Up);
        assert_eq!(input.keyboard_direction(), Some(Vec2::new(-1.0, -1.0)));

        input.release(MoveKey::Up);
        assert_eq!(input.keyboard_direction(), Some(Vec2::new(-1.0, 0.0)));
    }

    #[test]
    fn opposite_keys_cancel_but_keep_keyboard_precedence() {
        let mut input = PendingInput::default();
        input.press(MoveKey::Left);
        input.press(MoveKey::Right);
        assert_eq!(input.keyboard_direction(), Some(Vec2::ZERO));
    }

    #[test]
    fn fire_request_is_consumed_once() {
        let mut input = PendingInput::default();
        input.request_fire();
        input.request_fire();
        assert!(input.take_fire_request());
        assert!(!input.take_fire_request());
    }

    #[test]
    fn aim_overwrite_is_immediate() {
        let mut input = PendingInput::aimed_at(Vec2::new(10.0, 10.0));
        input.point_at(Vec2::new(300.0, 40.0));
        assert_eq!(input.aim, Vec2::new(300.0, 40.0));
    }

    #[test]
    fn keyboard_system_tracks_held_keys_and_space() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<PendingInput>();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.add_systems(Update, keyboard_input_system);

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.press(KeyCode::KeyD);
            keys.press(KeyCode::Space);
        }
        app.update();

        let input = app.world().resource::<PendingInput>();
        assert!(input.held.contains(&MoveKey::Right));
        assert_eq!(input.held.len(), 1);
        assert!(input.fire_requested);
    }

    // ── plugin systems ────────────────────────────────────────────────────────

    /// Headless app running the whole input pipeline in `state`.
    ///
    /// Bevy's `InputPlugin` is replaced by bare resources so tests can press
    /// buttons directly; touches go through Bevy's own touch system.
    fn input_app(state: LoopState) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, PlayerInputPlugin));
        app.insert_state(state)
            .init_resource::<PendingInput>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<Touches>()
            .add_message::<CursorMoved>()
            .add_message::<TouchInput>()
            .add_message::<AppExit>()
            .add_systems(PreUpdate, touch_screen_input_system);
        app
    }

    /// Release every button, then run a frame so a pending transition applies.
    fn settle(app: &mut App) {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().reset_all();
        app.world_mut().resource_mut::<ButtonInput<MouseButton>>().reset_all();
        app.update();
    }

    fn press_key(app: &mut App, key: KeyCode) {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
    }

    fn click(app: &mut App) {
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
    }

    fn touch(app: &mut App, phase: TouchPhase, position: Vec2) {
        app.world_mut().resource_mut::<Messages<TouchInput>>().write(TouchInput {
            phase,
            position,
            window: Entity::PLACEHOLDER,
            force: None,
            id: 1,
        });
    }

    fn current(app: &App) -> LoopState {
        *app.world().resource::<State<LoopState>>().get()
    }

    fn pending(app: &App) -> &PendingInput {
        app.world().resource::<PendingInput>()
    }

    #[test]
    fn cursor_motion_overwrites_aim() {
        let mut app = input_app(LoopState::Running);
        app.world_mut().resource_mut::<Messages<CursorMoved>>().write(CursorMoved {
            window: Entity::PLACEHOLDER,
            position: Vec2::new(120.0, 80.0),
            delta: None,
        });
        app.update();

        assert_eq!(pending(&app).aim, Vec2::new(120.0, 80.0));
    }

    #[test]
    fn cursor_motion_over_other_windows_is_ignored() {
        let mut app = input_app(LoopState::Running);
        app.world_mut().spawn((Window::default(), PrimaryWindow));
        app.world_mut().resource_mut::<Messages<CursorMoved>>().write(CursorMoved {
            window: Entity::PLACEHOLDER,
            position: Vec2::new(120.0, 80.0),
            delta: None,
        });
        app.update();

        assert_eq!(pending(&app).aim, Vec2::ZERO);
    }

    #[test]
    fn new_touch_fires_and_dragging_aims() {
        let mut app = input_app(LoopState::Running);

        touch(&mut app, TouchPhase::Started, Vec2::new(10.0, 20.0));
        app.update();
        assert!(pending(&app).fire_requested);
        assert_eq!(pending(&app).aim, Vec2::ZERO, "a stationary touch does not aim");

        app.world_mut().resource_mut::<PendingInput>().fire_requested = false;
        touch(&mut app, TouchPhase::Moved, Vec2::new(60.0, 80.0));
        app.update();
        assert_eq!(pending(&app).aim, Vec2::new(60.0, 80.0));
        assert!(!pending(&app).fire_requested, "only a new touch fires");
    }

    #[test]
    fn click_requests_fire() {
        let mut app = input_app(LoopState::Running);
        click(&mut app);
        app.update();
        assert!(pending(&app).fire_requested);
    }

    #[test]
    fn enter_while_stopped_starts_the_loop() {
        let mut app = input_app(LoopState::Stopped);
        press_key(&mut app, KeyCode::Enter);
        app.update();
        settle(&mut app);
        assert_eq!(current(&app), LoopState::Running);
    }

    #[test]
    fn click_while_stopped_starts_the_loop() {
        let mut app = input_app(LoopState::Stopped);
        click(&mut app);
        app.update();
        settle(&mut app);
        assert_eq!(current(&app), LoopState::Running);
    }

    #[test]
    fn escape_while_running_returns_to_menu() {
        let mut app = input_app(LoopState::Running);
        press_key(&mut app, KeyCode::Escape);
        app.update();
        settle(&mut app);

        assert_eq!(current(&app), LoopState::Stopped);
        assert!(app.should_exit().is_none(), "stopping is not quitting");
    }

    #[test]
    fn escape_while_stopped_quits() {
        let mut app = input_app(LoopState::Stopped);
        press_key(&mut app, KeyCode::Escape);
        app.update();

        assert!(matches!(app.should_exit(), Some(AppExit::Success)));
        assert_eq!(current(&app), LoopState::Stopped);
    }

    #[test]
    fn enter_or_click_while_running_requests_restart() {
        let mut app = input_app(LoopState::Running);
        press_key(&mut app, KeyCode::Enter);
        app.update();
        assert!(pending(&app).restart_requested);
        assert!(!pending(&app).fire_requested, "Enter does not fire");

        app.world_mut().resource_mut::<PendingInput>().restart_requested = false;
        settle(&mut app);
        click(&mut app);
        app.update();
        assert!(pending(&app).restart_requested);
        assert!(pending(&app).fire_requested);
        assert_eq!(current(&app), LoopState::Running);
    }
}
