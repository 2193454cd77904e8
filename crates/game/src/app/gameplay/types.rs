/// Startup tunables. Defaults are the shipped balance; a JSON config file may
/// override any subset of fields.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) world_width: f32,
    pub(crate) world_height: f32,
    pub(crate) player_speed: f32,
    pub(crate) collectible_target: u32,
    pub(crate) message_display_ticks: u64,
    pub(crate) regen_delay_ticks: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: DEFAULT_WORLD_WIDTH,
            world_height: DEFAULT_WORLD_HEIGHT,
            player_speed: DEFAULT_PLAYER_SPEED,
            collectible_target: DEFAULT_COLLECTIBLE_TARGET,
            message_display_ticks: DEFAULT_MESSAGE_DISPLAY_TICKS,
            regen_delay_ticks: DEFAULT_REGEN_DELAY_TICKS,
        }
    }
}

impl GameConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.world_width < PLAYER_SIZE || self.world_height < PLAYER_SIZE {
            return Err(format!(
                "world must be at least {PLAYER_SIZE}x{PLAYER_SIZE} px, got {}x{}",
                self.world_width, self.world_height
            ));
        }
        if !self.player_speed.is_finite() || self.player_speed <= 0.0 {
            return Err(format!(
                "player_speed must be a positive number, got {}",
                self.player_speed
            ));
        }
        if self.collectible_target == 0 {
            return Err("collectible_target must be at least 1".to_string());
        }
        Ok(())
    }

    pub(crate) fn bounds(&self) -> WorldBounds {
        WorldBounds {
            width: self.world_width,
            height: self.world_height,
        }
    }
}

/// The single-slot message display. Showing while already visible replaces
/// the text; the hide timer lives on the scene's schedule, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MessageSlot {
    text: String,
    visible: bool,
}

impl MessageSlot {
    pub(crate) fn show(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.visible = true;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }

    pub(crate) fn visible_text(&self) -> Option<&str> {
        self.visible.then_some(self.text.as_str())
    }
}

/// Deferred one-shot effects carried on the tick clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameEvent {
    HideMessage,
    RegenerateField,
}
