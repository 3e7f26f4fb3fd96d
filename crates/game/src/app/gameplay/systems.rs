/// Runs one frame of gameplay. Step order matters: collisions see the
/// positions produced by this frame's movement, and the sword only advances
/// after its current geometry has been used for hits.
fn update_game(state: &mut GameState, input: &InputSnapshot) -> FrameReport {
    let mut report = FrameReport::default();
    let health_before = state.player.health;

    if input.attack_pressed() {
        report.swing_started = state.player.request_attack();
        if report.swing_started {
            debug!(facing = ?state.player.facing, "swing_started");
        }
    }

    move_player(&mut state.player, input);
    chase_player(&mut state.enemies, state.player.position);
    report.contact_hits = apply_contact_damage(state);
    report.sword_hits = apply_sword_hits(state);
    report.enemies_removed = remove_defeated_enemies(&mut state.enemies);
    report.swing_ended = state.player.sword.advance();
    if report.swing_ended {
        debug!("swing_ended");
    }

    if health_before > 0.0 && state.player.health <= 0.0 {
        info!(health = state.player.health, "player_health_depleted");
    }

    report
}

fn move_player(player: &mut Player, input: &InputSnapshot) {
    let step = player.speed / TILE_SIZE;

    // Fixed order: when several keys are held the last one applied sets facing.
    if input.is_down(InputAction::MoveUp) {
        player.position.y -= step;
        player.facing = Facing::Up;
    }
    if input.is_down(InputAction::MoveDown) {
        player.position.y += step;
        player.facing = Facing::Down;
    }
    if input.is_down(InputAction::MoveLeft) {
        player.position.x -= step;
        player.facing = Facing::Left;
    }
    if input.is_down(InputAction::MoveRight) {
        player.position.x += step;
        player.facing = Facing::Right;
    }
}

fn chase_player(enemies: &mut [Enemy], target: Vec2) {
    for enemy in enemies {
        let delta = Vec2::new(target.x - enemy.position.x, target.y - enemy.position.y);
        let distance = delta.length();
        if distance > 0.0 {
            let step = enemy.speed / TILE_SIZE;
            enemy.position.x += delta.x / distance * step;
            enemy.position.y += delta.y / distance * step;
        }
    }
}

fn apply_contact_damage(state: &mut GameState) -> u32 {
    let player_position = state.player.position;
    let touching = state
        .enemies
        .iter()
        .filter(|enemy| {
            (player_position.x - enemy.position.x).abs() < 1.0
                && (player_position.y - enemy.position.y).abs() < 1.0
        })
        .count() as u32;

    state.player.health -= state.contact_damage * touching as f32;
    touching
}

fn apply_sword_hits(state: &mut GameState) -> u32 {
    let Some(sword) = state.player.sword.active() else {
        return 0;
    };
    let hit_box = sword_hit_box(&state.player, sword.length);

    let mut hits = 0;
    for enemy in &mut state.enemies {
        if hit_box.overlaps(&enemy.pixel_rect()) {
            enemy.health -= state.sword_damage;
            hits += 1;
        }
    }
    hits
}

fn remove_defeated_enemies(enemies: &mut Vec<Enemy>) -> u32 {
    let before = enemies.len();
    enemies.retain(|enemy| {
        let alive = enemy.health > 0.0;
        if !alive {
            debug!(
                x = enemy.position.x,
                y = enemy.position.y,
                health = enemy.health,
                "enemy_removed"
            );
        }
        alive
    });
    (before - enemies.len()) as u32
}

/// Pixel-space strip in front of the player, centred on the player's midline.
/// The swing angle does not affect it.
fn sword_hit_box(player: &Player, length: f32) -> PixelRect {
    let center = player.pixel_center();
    let half_width = SWORD_HIT_BOX_WIDTH / 2.0;
    match player.facing {
        Facing::Up => PixelRect::new(
            center.x - half_width,
            center.y - length,
            SWORD_HIT_BOX_WIDTH,
            length,
        ),
        Facing::Down => PixelRect::new(center.x - half_width, center.y, SWORD_HIT_BOX_WIDTH, length),
        Facing::Left => PixelRect::new(
            center.x - length,
            center.y - half_width,
            length,
            SWORD_HIT_BOX_WIDTH,
        ),
        Facing::Right => PixelRect::new(center.x, center.y - half_width, length, SWORD_HIT_BOX_WIDTH),
    }
}
