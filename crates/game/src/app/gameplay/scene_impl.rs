struct TileSwordScene {
    tuning: GameTuning,
    state: GameState,
    frame_index: u64,
    last_report: FrameReport,
}

impl TileSwordScene {
    fn new(tuning: GameTuning) -> Self {
        let state = GameState::from_tuning(&tuning);
        Self {
            tuning,
            state,
            frame_index: 0,
            last_report: FrameReport::default(),
        }
    }
}

impl Scene for TileSwordScene {
    fn load(&mut self) {
        self.state = GameState::from_tuning(&self.tuning);
        self.frame_index = 0;
        self.last_report = FrameReport::default();
        info!(
            player_x = self.state.player.position.x,
            player_y = self.state.player.position.y,
            player_health = self.state.player.health,
            enemy_count = self.state.enemies.len(),
            "scene_loaded"
        );
    }

    fn update(&mut self, input: &InputSnapshot) {
        self.frame_index = self.frame_index.saturating_add(1);
        let report = update_game(&mut self.state, input);
        if report.enemies_removed > 0 {
            debug!(
                frame = self.frame_index,
                removed = report.enemies_removed,
                remaining = self.state.enemies.len(),
                "enemies_defeated"
            );
        }
        self.last_report = report;
    }

    fn render(&self, canvas: &mut Canvas<'_>) {
        draw_frame(canvas, &self.state);
    }

    fn unload(&mut self) {
        info!(
            frames = self.frame_index,
            player_health = self.state.player.health,
            enemies_remaining = self.state.enemies.len(),
            "scene_unloaded"
        );
    }

    fn debug_summary(&self) -> Option<String> {
        let sword = if self.state.player.sword.is_active() {
            "ON"
        } else {
            "OFF"
        };
        Some(format!(
            "ENEMIES: {} HP: {:.2} HITS: {} TOUCH: {} SWORD: {}",
            self.state.enemies.len(),
            self.state.player.health,
            self.last_report.sword_hits,
            self.last_report.contact_hits,
            sword
        ))
    }
}
