use std::path::Path;
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::{info, warn};
use winit::window::Window;

use crate::app::hud;
use crate::app::scene::{CollectibleView, FrameView, PlayerView};

const BACKGROUND_TOP_COLOR: [u8; 4] = [240, 248, 255, 255];
const BACKGROUND_BOTTOM_COLOR: [u8; 4] = [230, 243, 255, 255];
const BACKGROUND_GRID_COLOR: [u8; 4] = [224, 224, 224, 255];
const BACKGROUND_GRID_STEP: u32 = 32;
const PLAYER_FALLBACK_COLOR: [u8; 4] = [74, 144, 226, 255];
const COLLECTIBLE_FALLBACK_COLOR: [u8; 4] = [233, 69, 96, 255];
const ALPHA_OPAQUE_THRESHOLD: u8 = 128;

const PLAYER_IDLE_SPRITE: &str = "player.png";
const PLAYER_WALK_SPRITES: [&str; 2] = ["player_walk_1.png", "player_walk_2.png"];
const COLLECTIBLE_SPRITE: &str = "heart.png";
const BACKGROUND_SPRITE: &str = "background.png";

struct LoadedSprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

/// Sprite slots for everything the game draws. Any slot may be empty, either
/// because no asset root was found or a file failed to load; drawing then
/// falls back to vector shapes so the game stays playable before or without
/// art.
#[derive(Default)]
struct SpriteSet {
    player_idle: Option<LoadedSprite>,
    player_walk: [Option<LoadedSprite>; 2],
    collectible: Option<LoadedSprite>,
    background: Option<LoadedSprite>,
}

impl SpriteSet {
    fn load(assets_dir: &Path) -> Self {
        let set = Self {
            player_idle: load_sprite(&assets_dir.join(PLAYER_IDLE_SPRITE)),
            player_walk: [
                load_sprite(&assets_dir.join(PLAYER_WALK_SPRITES[0])),
                load_sprite(&assets_dir.join(PLAYER_WALK_SPRITES[1])),
            ],
            collectible: load_sprite(&assets_dir.join(COLLECTIBLE_SPRITE)),
            background: load_sprite(&assets_dir.join(BACKGROUND_SPRITE)),
        };
        info!(
            player = set.player_idle.is_some(),
            walk_frames =
                set.player_walk.iter().filter(|frame| frame.is_some()).count(),
            collectible = set.collectible.is_some(),
            background = set.background.is_some(),
            "sprites_loaded"
        );
        set
    }

    fn player_frame(&self, moving: bool, walk_frame: u8) -> Option<&LoadedSprite> {
        if moving {
            // Fall back to the idle frame when a walk frame is missing.
            self.player_walk[usize::from(walk_frame.min(1))]
                .as_ref()
                .or(self.player_idle.as_ref())
        } else {
            self.player_idle.as_ref()
        }
    }
}

fn load_sprite(path: &Path) -> Option<LoadedSprite> {
    let reader = match ImageReader::open(path) {
        Ok(reader) => reader,
        Err(error) => {
            warn!(path = %path.display(), error = %error, "sprite_unavailable");
            return None;
        }
    };
    match reader.decode() {
        Ok(decoded) => {
            let rgba = decoded.to_rgba8();
            let (width, height) = rgba.dimensions();
            Some(LoadedSprite {
                width,
                height,
                rgba: rgba.into_raw(),
            })
        }
        Err(error) => {
            warn!(path = %path.display(), error = %error, "sprite_decode_failed");
            None
        }
    }
}

/// Software renderer over a fixed-size logical framebuffer. The surface layer
/// scales the buffer into the window, preserving aspect ratio (letterboxed),
/// which is all the responsive sizing this game needs.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    surface_width: u32,
    surface_height: u32,
    sprites: SpriteSet,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        surface_width: u32,
        surface_height: u32,
        assets_dir: Option<&Path>,
    ) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = build_pixels(
            Arc::clone(&window),
            size.width.max(1),
            size.height.max(1),
            surface_width,
            surface_height,
        )?;
        let sprites = assets_dir.map(SpriteSet::load).unwrap_or_default();
        Ok(Self {
            window,
            pixels,
            surface_width,
            surface_height,
            sprites,
        })
    }

    pub fn resize(&mut self, window_width: u32, window_height: u32) -> Result<(), Error> {
        if window_width == 0 || window_height == 0 {
            return Ok(());
        }
        self.pixels = build_pixels(
            Arc::clone(&self.window),
            window_width,
            window_height,
            self.surface_width,
            self.surface_height,
        )?;
        Ok(())
    }

    pub fn render(&mut self, view: &FrameView) -> Result<(), Error> {
        let width = self.surface_width;
        let height = self.surface_height;
        let frame = self.pixels.frame_mut();

        draw_background(frame, width, height, self.sprites.background.as_ref());
        for collectible in &view.collectibles {
            draw_collectible(
                frame,
                width,
                height,
                collectible,
                self.sprites.collectible.as_ref(),
            );
        }
        draw_player(
            frame,
            width,
            height,
            &view.player,
            self.sprites
                .player_frame(view.player.moving, view.player.walk_frame),
        );
        hud::draw_hud(frame, width, height, &view.hud);

        self.pixels.render()
    }
}

fn build_pixels(
    window: Arc<Window>,
    window_width: u32,
    window_height: u32,
    surface_width: u32,
    surface_height: u32,
) -> Result<Pixels<'static>, Error> {
    let surface = SurfaceTexture::new(window_width, window_height, window);
    Pixels::new(surface_width, surface_height, surface)
}

fn draw_background(frame: &mut [u8], width: u32, height: u32, sprite: Option<&LoadedSprite>) {
    if let Some(sprite) = sprite {
        // The background stretches to the whole surface, ignoring its own
        // aspect ratio.
        blit_scaled(
            frame,
            width,
            height,
            sprite,
            BlitRect {
                x: 0,
                y: 0,
                w: width as i32,
                h: height as i32,
            },
            false,
        );
        return;
    }

    for y in 0..height {
        let color = background_row_color(y, height);
        for x in 0..width {
            put_pixel(frame, width, x as i32, y as i32, color);
        }
    }
    let mut x = 0;
    while x <= width {
        fill_rect(frame, width, height, x as i32, 0, 1, height as i32, BACKGROUND_GRID_COLOR);
        x += BACKGROUND_GRID_STEP;
    }
    let mut y = 0;
    while y <= height {
        fill_rect(frame, width, height, 0, y as i32, width as i32, 1, BACKGROUND_GRID_COLOR);
        y += BACKGROUND_GRID_STEP;
    }
}

fn background_row_color(y: u32, height: u32) -> [u8; 4] {
    let t = if height <= 1 {
        0.0
    } else {
        y as f32 / (height - 1) as f32
    };
    let mut color = [0u8; 4];
    for channel in 0..4 {
        let top = BACKGROUND_TOP_COLOR[channel] as f32;
        let bottom = BACKGROUND_BOTTOM_COLOR[channel] as f32;
        color[channel] = (top + (bottom - top) * t).round() as u8;
    }
    color
}

fn draw_collectible(
    frame: &mut [u8],
    width: u32,
    height: u32,
    view: &CollectibleView,
    sprite: Option<&LoadedSprite>,
) {
    let size = view.size.round() as i32;
    let x = view.x.round() as i32;
    let y = view.y.round() as i32;

    if let Some(sprite) = sprite {
        let dest = aspect_fit(x, y, size, sprite.width, sprite.height);
        blit_scaled(frame, width, height, sprite, dest, false);
        return;
    }

    for py in 0..size {
        for px in 0..size {
            if heart_mask(px, py, size) {
                put_pixel(frame, width, x + px, y + py, COLLECTIBLE_FALLBACK_COLOR);
            }
        }
    }
}

/// Unit-space membership test for the fallback heart shape: two round lobes
/// over a triangular tip.
fn heart_mask(px: i32, py: i32, size: i32) -> bool {
    if size <= 0 {
        return false;
    }
    let u = (px as f32 + 0.5) / size as f32;
    let v = (py as f32 + 0.5) / size as f32;

    let in_lobe = |cx: f32| {
        let dx = u - cx;
        let dy = v - 0.32;
        dx * dx + dy * dy <= 0.26 * 0.26
    };
    if in_lobe(0.3) || in_lobe(0.7) {
        return true;
    }

    if !(0.42..=0.98).contains(&v) {
        return false;
    }
    let half_width = 0.46 * (0.98 - v) / (0.98 - 0.42);
    (u - 0.5).abs() <= half_width
}

fn draw_player(
    frame: &mut [u8],
    width: u32,
    height: u32,
    player: &PlayerView,
    sprite: Option<&LoadedSprite>,
) {
    let size = player.size.round() as i32;
    let x = player.x.round() as i32;
    let y = player.y.round() as i32;

    match sprite {
        Some(sprite) => {
            let dest = aspect_fit(x, y, size, sprite.width, sprite.height);
            blit_scaled(
                frame,
                width,
                height,
                sprite,
                dest,
                player.facing.mirrors_horizontally(),
            );
        }
        None => {
            fill_rect(frame, width, height, x, y, size, size, PLAYER_FALLBACK_COLOR);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlitRect {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

/// Largest centered rectangle inside a square box that preserves the sprite's
/// aspect ratio.
fn aspect_fit(box_x: i32, box_y: i32, box_size: i32, sprite_width: u32, sprite_height: u32) -> BlitRect {
    if sprite_width == 0 || sprite_height == 0 || box_size <= 0 {
        return BlitRect {
            x: box_x,
            y: box_y,
            w: 0,
            h: 0,
        };
    }
    let scale = (box_size as f32 / sprite_width as f32).min(box_size as f32 / sprite_height as f32);
    let w = ((sprite_width as f32 * scale).round() as i32).max(1);
    let h = ((sprite_height as f32 * scale).round() as i32).max(1);
    BlitRect {
        x: box_x + (box_size - w) / 2,
        y: box_y + (box_size - h) / 2,
        w,
        h,
    }
}

/// Nearest-neighbor blit with a hard alpha cutoff. `mirror_x` flips the
/// source horizontally, used for the left-facing player.
fn blit_scaled(
    frame: &mut [u8],
    frame_width: u32,
    frame_height: u32,
    sprite: &LoadedSprite,
    dest: BlitRect,
    mirror_x: bool,
) {
    if dest.w <= 0 || dest.h <= 0 {
        return;
    }
    for dy in 0..dest.h {
        let py = dest.y + dy;
        if py < 0 || py >= frame_height as i32 {
            continue;
        }
        let sy = (dy as u32 * sprite.height / dest.h as u32).min(sprite.height - 1);
        for dx in 0..dest.w {
            let px = dest.x + dx;
            if px < 0 || px >= frame_width as i32 {
                continue;
            }
            let mut sx = (dx as u32 * sprite.width / dest.w as u32).min(sprite.width - 1);
            if mirror_x {
                sx = sprite.width - 1 - sx;
            }
            let offset = ((sy * sprite.width + sx) * 4) as usize;
            let texel: [u8; 4] = match sprite.rgba.get(offset..offset + 4) {
                Some(slice) => [slice[0], slice[1], slice[2], slice[3]],
                None => continue,
            };
            if texel[3] < ALPHA_OPAQUE_THRESHOLD {
                continue;
            }
            put_pixel(frame, frame_width, px, py, texel);
        }
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
            put_pixel(frame, frame_width, px, py, color);
        }
    }
}

fn put_pixel(frame: &mut [u8], frame_width: u32, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x >= frame_width as i32 {
        return;
    }
    let offset = (y as usize * frame_width as usize + x as usize) * 4;
    if let Some(slice) = frame.get_mut(offset..offset + 4) {
        slice.copy_from_slice(&color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_fit_centers_a_wide_sprite_vertically() {
        let dest = aspect_fit(0, 0, 64, 100, 50);
        assert_eq!(dest.w, 64);
        assert_eq!(dest.h, 32);
        assert_eq!(dest.x, 0);
        assert_eq!(dest.y, 16);
    }

    #[test]
    fn aspect_fit_centers_a_tall_sprite_horizontally() {
        let dest = aspect_fit(10, 10, 64, 32, 64);
        assert_eq!(dest.w, 32);
        assert_eq!(dest.h, 64);
        assert_eq!(dest.x, 10 + 16);
        assert_eq!(dest.y, 10);
    }

    #[test]
    fn aspect_fit_square_sprite_fills_the_box() {
        let dest = aspect_fit(5, 7, 64, 16, 16);
        assert_eq!(
            dest,
            BlitRect {
                x: 5,
                y: 7,
                w: 64,
                h: 64
            }
        );
    }

    #[test]
    fn heart_mask_is_left_right_symmetric() {
        let size = 32;
        for py in 0..size {
            for px in 0..size {
                assert_eq!(
                    heart_mask(px, py, size),
                    heart_mask(size - 1 - px, py, size),
                    "asymmetry at ({px},{py})"
                );
            }
        }
    }

    #[test]
    fn heart_mask_fills_center_and_leaves_corners_empty() {
        let size = 32;
        assert!(heart_mask(size / 2, size / 2, size));
        assert!(!heart_mask(0, 0, size));
        assert!(!heart_mask(size - 1, 0, size));
        assert!(!heart_mask(0, size - 1, size));
        assert!(!heart_mask(size - 1, size - 1, size));
    }

    #[test]
    fn background_gradient_hits_both_end_colors() {
        assert_eq!(background_row_color(0, 600), BACKGROUND_TOP_COLOR);
        assert_eq!(background_row_color(599, 600), BACKGROUND_BOTTOM_COLOR);
    }

    #[test]
    fn put_pixel_ignores_out_of_bounds_writes() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        put_pixel(&mut frame, 4, -1, 0, [255; 4]);
        put_pixel(&mut frame, 4, 0, 17, [255; 4]);
        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn fill_rect_clips_to_the_frame() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        fill_rect(&mut frame, 4, 4, -2, -2, 8, 8, [9, 9, 9, 9]);
        assert!(frame.iter().all(|byte| *byte == 9));
    }
}
