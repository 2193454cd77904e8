use super::input::{ActionStates, InputAction};

/// Cardinal facing of the player sprite. Only `Left` changes how the sprite
/// is drawn: the art has no left-facing frames, so the renderer mirrors the
/// right/down frames horizontally instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    pub fn mirrors_horizontally(self) -> bool {
        matches!(self, Facing::Left)
    }
}

/// The set of actions held at the start of a tick. Scenes read this once per
/// update; the event loop keeps mutating its own collector in the meantime.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(quit_requested: bool, actions: ActionStates) -> Self {
        Self {
            quit_requested,
            actions,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_held(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

/// Player draw state for one frame.
#[derive(Debug, Clone, Copy)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub facing: Facing,
    pub moving: bool,
    /// 0 or 1; selects the walk frame while `moving` is set.
    pub walk_frame: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct CollectibleView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Text layer state: the single-slot message display plus the collected
/// counters shown in the corner.
#[derive(Debug, Clone, Default)]
pub struct HudView {
    pub message: Option<String>,
    pub collected: u32,
    pub total: u32,
}

/// Everything the renderer needs for one frame, in back-to-front draw order:
/// background, collectibles, player, HUD.
#[derive(Debug, Clone)]
pub struct FrameView {
    pub player: PlayerView,
    pub collectibles: Vec<CollectibleView>,
    pub hud: HudView,
}

/// A running game. The loop calls `update` exactly once per presented frame
/// and `frame` immediately before drawing.
pub trait Scene {
    fn update(&mut self, input: &InputSnapshot) -> SceneCommand;
    fn frame(&self) -> FrameView;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_left_facing_mirrors() {
        assert!(Facing::Left.mirrors_horizontally());
        assert!(!Facing::Right.mirrors_horizontally());
        assert!(!Facing::Up.mirrors_horizontally());
        assert!(!Facing::Down.mirrors_horizontally());
    }

    #[test]
    fn empty_snapshot_holds_nothing() {
        let snapshot = InputSnapshot::empty();
        assert!(!snapshot.quit_requested());
        assert!(!snapshot.is_down(InputAction::MoveUp));
        assert!(!snapshot.is_down(InputAction::MoveDown));
        assert!(!snapshot.is_down(InputAction::MoveLeft));
        assert!(!snapshot.is_down(InputAction::MoveRight));
    }

    #[test]
    fn builder_sets_and_clears_actions() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::MoveLeft, true)
            .with_action_down(InputAction::MoveUp, true)
            .with_action_down(InputAction::MoveUp, false);
        assert!(snapshot.is_down(InputAction::MoveLeft));
        assert!(!snapshot.is_down(InputAction::MoveUp));
    }

    #[test]
    fn builder_carries_quit_flag() {
        let snapshot = InputSnapshot::empty().with_quit_requested(true);
        assert!(snapshot.quit_requested());
    }
}
