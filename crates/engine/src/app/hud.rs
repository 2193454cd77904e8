use super::scene::HudView;

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;
const TEXT_SCALE: i32 = 2;
const GLYPH_ADVANCE: i32 = (GLYPH_WIDTH + 1) * TEXT_SCALE;
const LINE_HEIGHT: i32 = GLYPH_HEIGHT * TEXT_SCALE;
const MESSAGE_TOP_MARGIN: i32 = 14;
const PANEL_INSET_X: i32 = 10;
const PANEL_INSET_Y: i32 = 6;
const COUNTER_MARGIN: i32 = 8;
const MESSAGE_TEXT_COLOR: [u8; 4] = [92, 38, 54, 255];
const MESSAGE_PANEL_BG_COLOR: [u8; 4] = [255, 244, 247, 255];
const MESSAGE_PANEL_BORDER_COLOR: [u8; 4] = [233, 69, 96, 255];
const COUNTER_TEXT_COLOR: [u8; 4] = [233, 69, 96, 255];

/// Draws the text layer: collected counter in the top-right corner and, when
/// one is showing, the message bubble centered along the top edge. A shown
/// message with empty text draws nothing, matching how the message pool's
/// empty entry behaves.
pub(crate) fn draw_hud(frame: &mut [u8], width: u32, height: u32, hud: &HudView) {
    if width == 0 || height == 0 {
        return;
    }

    let counter = format!("{}/{}", hud.collected, hud.total);
    let counter_x = width as i32 - text_width_px(&counter) - COUNTER_MARGIN;
    draw_text(
        frame,
        width,
        height,
        counter_x,
        COUNTER_MARGIN,
        &counter,
        COUNTER_TEXT_COLOR,
    );

    let Some(message) = hud.message.as_deref() else {
        return;
    };
    if message.is_empty() {
        return;
    }

    let panel_w = text_width_px(message) + PANEL_INSET_X * 2;
    let panel_h = LINE_HEIGHT + PANEL_INSET_Y * 2;
    let panel_x = (width as i32 - panel_w) / 2;
    let panel_y = MESSAGE_TOP_MARGIN;
    fill_rect(
        frame,
        width,
        height,
        panel_x,
        panel_y,
        panel_w,
        panel_h,
        MESSAGE_PANEL_BG_COLOR,
    );
    outline_rect(
        frame,
        width,
        height,
        panel_x,
        panel_y,
        panel_w,
        panel_h,
        MESSAGE_PANEL_BORDER_COLOR,
    );
    draw_text(
        frame,
        width,
        height,
        panel_x + PANEL_INSET_X,
        panel_y + PANEL_INSET_Y,
        message,
        MESSAGE_TEXT_COLOR,
    );
}

fn text_width_px(text: &str) -> i32 {
    text.chars().count() as i32 * GLYPH_ADVANCE
}

fn draw_text(
    frame: &mut [u8],
    width: u32,
    height: u32,
    mut x: i32,
    y: i32,
    text: &str,
    color: [u8; 4],
) {
    for ch in text.chars() {
        draw_glyph(frame, width, height, x, y, glyph_rows(ch), color);
        x += GLYPH_ADVANCE;
    }
}

fn draw_glyph(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rows: [u8; 5],
    color: [u8; 4],
) {
    for (row_index, row_bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            fill_rect(
                frame,
                width,
                height,
                x + col * TEXT_SCALE,
                y + row_index as i32 * TEXT_SCALE,
                TEXT_SCALE,
                TEXT_SCALE,
                color,
            );
        }
    }
}

const FALLBACK_GLYPH: [u8; 5] = [0b111, 0b111, 0b111, 0b111, 0b111];

/// 3x5 glyph rows for the character, case-insensitive. Anything outside the
/// supported set renders as a solid block so missing glyphs are visible
/// instead of silently dropped.
fn glyph_rows(ch: char) -> [u8; 5] {
    match ch.to_ascii_uppercase() {
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b010, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b110, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '~' => [0b000, 0b011, 0b110, 0b000, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b110, 0b001, 0b010, 0b000, 0b010],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        _ => FALLBACK_GLYPH,
    }
}

fn fill_rect(
    frame: &mut [u8],
    frame_width: u32,
    frame_height: u32,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    color: [u8; 4],
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = (x + w).min(frame_width as i32);
    let end_y = (y + h).min(frame_height as i32);
    for py in start_y..end_y {
        for px in start_x..end_x {
            let offset = (py as usize * frame_width as usize + px as usize) * 4;
            if let Some(slice) = frame.get_mut(offset..offset + 4) {
                slice.copy_from_slice(&color);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn outline_rect(
    frame: &mut [u8],
    frame_width: u32,
    frame_height: u32,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    color: [u8; 4],
) {
    if w <= 1 || h <= 1 {
        return;
    }
    fill_rect(frame, frame_width, frame_height, x, y, w, 1, color);
    fill_rect(frame, frame_width, frame_height, x, y + h - 1, w, 1, color);
    fill_rect(frame, frame_width, frame_height, x, y, 1, h, color);
    fill_rect(frame, frame_width, frame_height, x + w - 1, y, 1, h, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_frame(width: u32, height: u32) -> Vec<u8> {
        vec![0u8; (width * height * 4) as usize]
    }

    #[test]
    fn glyph_lookup_is_case_insensitive() {
        assert_eq!(glyph_rows('a'), glyph_rows('A'));
        assert_eq!(glyph_rows('z'), glyph_rows('Z'));
    }

    #[test]
    fn unsupported_characters_fall_back_to_a_solid_block() {
        assert_eq!(glyph_rows('€'), FALLBACK_GLYPH);
        assert_eq!(glyph_rows('@'), FALLBACK_GLYPH);
    }

    #[test]
    fn text_width_counts_characters() {
        assert_eq!(text_width_px(""), 0);
        assert_eq!(text_width_px("3/10"), 4 * GLYPH_ADVANCE);
    }

    #[test]
    fn counter_is_always_drawn() {
        let mut frame = blank_frame(200, 100);
        let hud = HudView {
            message: None,
            collected: 3,
            total: 10,
        };
        draw_hud(&mut frame, 200, 100, &hud);
        assert!(frame.iter().any(|byte| *byte != 0));
    }

    #[test]
    fn empty_message_draws_no_panel() {
        let mut with_empty = blank_frame(200, 100);
        let mut without = blank_frame(200, 100);
        draw_hud(
            &mut with_empty,
            200,
            100,
            &HudView {
                message: Some(String::new()),
                collected: 0,
                total: 10,
            },
        );
        draw_hud(
            &mut without,
            200,
            100,
            &HudView {
                message: None,
                collected: 0,
                total: 10,
            },
        );
        assert_eq!(with_empty, without);
    }

    #[test]
    fn message_panel_adds_pixels_over_the_counter_alone() {
        let mut with_message = blank_frame(400, 100);
        let mut counter_only = blank_frame(400, 100);
        draw_hud(
            &mut with_message,
            400,
            100,
            &HudView {
                message: Some("HELLO".to_string()),
                collected: 1,
                total: 10,
            },
        );
        draw_hud(
            &mut counter_only,
            400,
            100,
            &HudView {
                message: None,
                collected: 1,
                total: 10,
            },
        );
        let lit = |frame: &[u8]| frame.iter().filter(|byte| **byte != 0).count();
        assert!(lit(&with_message) > lit(&counter_only));
    }

    #[test]
    fn draw_hud_survives_a_tiny_frame() {
        let mut frame = blank_frame(8, 8);
        draw_hud(
            &mut frame,
            8,
            8,
            &HudView {
                message: Some("A LONG MESSAGE THAT CANNOT FIT".to_string()),
                collected: 999,
                total: 999,
            },
        );
    }
}
