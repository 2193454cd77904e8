use engine::{
    CollectibleView, Facing, FrameView, HudView, InputAction, InputSnapshot, PlayerView, Scene,
    SceneCommand,
};
use rand::rngs::SmallRng;
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, info};

const PLAYER_SIZE: f32 = 64.0;
const COLLECTIBLE_SIZE: f32 = 32.0;
const DEFAULT_WORLD_WIDTH: f32 = 800.0;
const DEFAULT_WORLD_HEIGHT: f32 = 600.0;
const DEFAULT_PLAYER_SPEED: f32 = 4.0;
const DEFAULT_COLLECTIBLE_TARGET: u32 = 10;
const DEFAULT_MESSAGE_DISPLAY_TICKS: u64 = 180;
const DEFAULT_REGEN_DELAY_TICKS: u64 = 180;
const WALK_PHASE_INCREMENT: f32 = 0.1;
const WALK_CYCLE_PHASES: f32 = 2.0;
const MAX_PLACEMENT_ATTEMPTS: u32 = 64;

/// One entry is deliberately empty: sometimes a pickup says nothing.
const PICKUP_MESSAGES: &[&str] = &[
    "You are my little luck",
    "Seeing you makes me smile",
    "My heart beats faster for you",
    "I want to see you every day",
    "Your smile fixes everything",
    "Having you near is the best",
    "Your eyes are so pretty",
    "I love your happy face",
    "You are the special one",
    "I want to share it all with you",
    "You make the world brighter",
    "You are always this cute",
    "I want to stay by your side",
    "",
];
const ALL_COLLECTED_MESSAGE: &str = "~ Now you have all my love ~";

include!("geometry.rs");
include!("types.rs");
include!("field.rs");
include!("player.rs");
include!("schedule.rs");
include!("scene_impl.rs");

pub(crate) fn build_scene(config: GameConfig, rng: SmallRng) -> Box<dyn Scene> {
    Box::new(CollectScene::new(config, rng))
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
