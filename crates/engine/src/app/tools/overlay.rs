use crate::app::rendering::{text_width_px, Canvas, Rgba, GLYPH_HEIGHT, LINE_ADVANCE, TEXT_SCALE};
use crate::app::LoopMetricsSnapshot;

const OVERLAY_PADDING: i32 = 6 * TEXT_SCALE;
const OVERLAY_PANEL_INSET_X: i32 = 4 * TEXT_SCALE;
const OVERLAY_PANEL_INSET_Y: i32 = 3 * TEXT_SCALE;
const OVERLAY_TEXT_PRIMARY_COLOR: Rgba = [244, 248, 252, 255];
const OVERLAY_TEXT_DIM_COLOR: Rgba = [176, 198, 220, 255];
const OVERLAY_PANEL_BG_COLOR: Rgba = [10, 12, 16, 210];
const OVERLAY_PANEL_BORDER_COLOR: Rgba = [92, 106, 126, 255];

#[derive(Debug, Clone)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub slow_frame_delay_ms: u64,
    pub scene_summary: Option<String>,
}

/// Draws the debug panel anchored to the top-right corner so it never covers
/// the scene's own HUD on the left.
pub(crate) fn draw_overlay(canvas: &mut Canvas<'_>, data: &OverlayData) {
    if canvas.width() == 0 || canvas.height() == 0 {
        return;
    }

    let lines = build_overlay_lines(data);
    let longest_line_px = lines
        .iter()
        .map(|line| text_width_px(line))
        .max()
        .unwrap_or(0);
    let panel_width = longest_line_px + OVERLAY_PANEL_INSET_X * 2;
    let panel_height = lines.len() as i32 * LINE_ADVANCE + OVERLAY_PANEL_INSET_Y * 2
        - (LINE_ADVANCE - GLYPH_HEIGHT * TEXT_SCALE);
    let panel_left = canvas.width() as i32 - OVERLAY_PADDING - panel_width;
    let panel_top = OVERLAY_PADDING - OVERLAY_PANEL_INSET_Y;

    canvas.fill_rect(
        panel_left as f32,
        panel_top as f32,
        panel_width as f32,
        panel_height as f32,
        OVERLAY_PANEL_BORDER_COLOR,
    );
    canvas.fill_rect(
        (panel_left + 1) as f32,
        (panel_top + 1) as f32,
        (panel_width - 2) as f32,
        (panel_height - 2) as f32,
        OVERLAY_PANEL_BG_COLOR,
    );

    let text_left = panel_left + OVERLAY_PANEL_INSET_X;
    for (index, line) in lines.iter().enumerate() {
        let color = if index == 0 {
            OVERLAY_TEXT_PRIMARY_COLOR
        } else {
            OVERLAY_TEXT_DIM_COLOR
        };
        let y = OVERLAY_PADDING + index as i32 * LINE_ADVANCE;
        canvas.fill_text(text_left as f32, y as f32, line, color);
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let mut lines = vec![
        format_fps_line(
            data.metrics.fps,
            data.render_fps_cap,
            data.slow_frame_delay_ms,
        ),
        format!("UPS: {:.1}", data.metrics.ups),
        format!("FRAME: {:.2} MS", data.metrics.frame_time_ms),
    ];
    if let Some(summary) = &data.scene_summary {
        lines.push(summary.clone());
    }
    lines
}

fn format_fps_line(current_fps: f32, cap: Option<u32>, slow_frame_delay_ms: u64) -> String {
    let cap_text = match cap {
        Some(value) => value.to_string(),
        None => "OFF".to_string(),
    };
    let mut line = format!("FPS: {current_fps:.1} CAP: {cap_text}");
    if slow_frame_delay_ms > 0 {
        line.push_str(&format!(" SLOW: {slow_frame_delay_ms} MS"));
    }
    line
}
