fn draw_frame(canvas: &mut Canvas<'_>, state: &GameState) {
    canvas.clear(BACKGROUND_COLOR);

    let player = &state.player;
    let body = player.pixel_rect();
    canvas.fill_rect(body.x, body.y, body.width, body.height, PLAYER_COLOR);

    if let Some(sword) = player.sword.active() {
        draw_sword(canvas, player, sword);
    }

    for enemy in &state.enemies {
        let rect = enemy.pixel_rect();
        canvas.fill_rect(rect.x, rect.y, rect.width, rect.height, ENEMY_COLOR);
    }

    canvas.fill_text(
        HUD_TEXT_POSITION_PX.x,
        HUD_TEXT_POSITION_PX.y,
        &health_label(player.health),
        HUD_TEXT_COLOR,
    );
}

/// Hilt and blade are laid out along the local x axis for left/right facing
/// and along local y for up/down, then the whole assembly is rotated about
/// the player's centre.
fn draw_sword(canvas: &mut Canvas<'_>, player: &Player, sword: &Sword) {
    let center = player.pixel_center();
    let vertical = player.facing.is_vertical();

    canvas.save();
    canvas.translate(center.x, center.y);
    canvas.rotate(sword.angle * player.facing.swing_sign());

    if vertical {
        canvas.fill_rect(-2.0, -2.0, 8.0, 4.0, SWORD_HILT_COLOR);
    } else {
        canvas.fill_rect(-2.0, -2.0, 4.0, 8.0, SWORD_HILT_COLOR);
    }

    let mut offset = BLADE_SEGMENT_PX;
    while offset < sword.length {
        if vertical {
            canvas.fill_rect(0.0, offset, BLADE_SEGMENT_PX, BLADE_SEGMENT_PX, SWORD_BLADE_COLOR);
        } else {
            canvas.fill_rect(offset, 0.0, BLADE_SEGMENT_PX, BLADE_SEGMENT_PX, SWORD_BLADE_COLOR);
        }
        offset += BLADE_SEGMENT_PX;
    }

    canvas.restore();
}

fn health_label(health: f32) -> String {
    format!("Health: {}", health.floor() as i64)
}
