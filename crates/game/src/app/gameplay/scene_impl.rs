/// Owns every piece of mutable game state and advances it one tick per
/// `update`. Nothing here touches the wall clock: timed effects ride the
/// `EventSchedule`, and the only entropy is the injected RNG.
pub(crate) struct CollectScene {
    config: GameConfig,
    bounds: WorldBounds,
    player: Player,
    field: CollectibleField,
    schedule: EventSchedule,
    rng: SmallRng,
    collected: u32,
    message: MessageSlot,
}

impl CollectScene {
    pub(crate) fn new(config: GameConfig, mut rng: SmallRng) -> Self {
        let bounds = config.bounds();
        let player = Player::spawn_centered(bounds);
        let field =
            CollectibleField::generate(config.collectible_target, bounds, player.rect(), &mut rng);
        info!(
            collectibles = field.len(),
            world_width = bounds.width,
            world_height = bounds.height,
            "field_seeded"
        );
        Self {
            config,
            bounds,
            player,
            field,
            schedule: EventSchedule::default(),
            rng,
            collected: 0,
            message: MessageSlot::default(),
        }
    }

    fn show_pickup_message(&mut self) {
        let index = self.rng.gen_range(0..PICKUP_MESSAGES.len());
        self.message.show(PICKUP_MESSAGES[index]);
        self.schedule
            .schedule_in(self.config.message_display_ticks, GameEvent::HideMessage);
    }

    fn apply_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::HideMessage => self.message.hide(),
            GameEvent::RegenerateField => {
                self.field = CollectibleField::generate(
                    self.config.collectible_target,
                    self.bounds,
                    self.player.rect(),
                    &mut self.rng,
                );
                self.collected = 0;
                self.message.hide();
                info!(collectibles = self.field.len(), "field_regenerated");
            }
        }
    }
}

impl Scene for CollectScene {
    fn update(&mut self, input: &InputSnapshot) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }

        self.player
            .update(input, self.config.player_speed, self.bounds);

        let picked = self.field.collect_at(self.player.rect());
        for _ in 0..picked {
            self.collected = self.collected.saturating_add(1);
            self.show_pickup_message();
        }
        if picked > 0 {
            debug!(
                tick = self.schedule.now(),
                picked,
                collected = self.collected,
                remaining = self.field.len(),
                "collectibles_picked"
            );
            if self.field.is_empty() && !self.schedule.is_pending(GameEvent::RegenerateField) {
                self.message.show(ALL_COLLECTED_MESSAGE);
                self.schedule.cancel(GameEvent::HideMessage);
                self.schedule
                    .schedule_in(self.config.regen_delay_ticks, GameEvent::RegenerateField);
                info!(collected = self.collected, "field_cleared");
            }
        }

        for event in self.schedule.advance() {
            self.apply_event(event);
        }

        SceneCommand::None
    }

    fn frame(&self) -> FrameView {
        FrameView {
            player: PlayerView {
                x: self.player.x,
                y: self.player.y,
                size: PLAYER_SIZE,
                facing: self.player.facing,
                moving: self.player.moving,
                walk_frame: self.player.walk_frame(),
            },
            collectibles: self
                .field
                .items()
                .iter()
                .map(|item| CollectibleView {
                    x: item.x,
                    y: item.y,
                    size: COLLECTIBLE_SIZE,
                })
                .collect(),
            hud: HudView {
                message: self.message.visible_text().map(str::to_owned),
                collected: self.collected,
                total: self.config.collectible_target,
            },
        }
    }
}
