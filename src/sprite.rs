//! Artwork decoding and half-block rendering
//!
//! Each terminal cell shows two vertically stacked pixels: the upper one as
//! the foreground of `▀`, the lower one as its background.

use image::GenericImageView;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const ALPHA_CUTOFF: u8 = 96;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteData {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA.
    pub pixels: Vec<[u8; 4]>,
}

impl SpriteData {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    fn opaque(&self, x: u32, y: u32) -> Option<Color> {
        let [r, g, b, a] = self.pixel(x, y)?;
        (a >= ALPHA_CUTOFF).then_some(Color::Rgb(r, g, b))
    }

    /// Largest (cols, rows) that fits the area while keeping the aspect ratio.
    pub fn fit(&self, max_cols: u16, max_rows: u16) -> (u16, u16) {
        if self.width == 0 || self.height == 0 || max_cols == 0 || max_rows == 0 {
            return (0, 0);
        }
        // one row holds two pixels
        let max_px_h = max_rows as u32 * 2;
        let scale_w = max_cols as f32 / self.width as f32;
        let scale_h = max_px_h as f32 / self.height as f32;
        let scale = scale_w.min(scale_h);
        let cols = ((self.width as f32 * scale).round() as u16).clamp(1, max_cols);
        let px_h = ((self.height as f32 * scale).round() as u32).max(1);
        let rows = (px_h.div_ceil(2) as u16).clamp(1, max_rows);
        (cols, rows)
    }

    /// Nearest-neighbour scale into `cols` x `rows` half-block lines.
    pub fn to_lines(&self, cols: u16, rows: u16) -> Vec<Line<'static>> {
        if cols == 0 || rows == 0 || self.width == 0 || self.height == 0 {
            return Vec::new();
        }
        let px_h = rows as u32 * 2;
        let sample = |cx: u32, py: u32| {
            let sx = cx * self.width / cols as u32;
            let sy = py * self.height / px_h;
            self.opaque(sx, sy)
        };

        (0..rows as u32)
            .map(|row| {
                let spans: Vec<Span<'static>> = (0..cols as u32)
                    .map(|col| {
                        let top = sample(col, row * 2);
                        let bottom = sample(col, row * 2 + 1);
                        match (top, bottom) {
                            (Some(top), Some(bottom)) => {
                                Span::styled("▀", Style::default().fg(top).bg(bottom))
                            }
                            (Some(top), None) => Span::styled("▀", Style::default().fg(top)),
                            (None, Some(bottom)) => {
                                Span::styled("▄", Style::default().fg(bottom))
                            }
                            (None, None) => Span::raw(" "),
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Decodes PNG bytes and crops away the fully transparent margin.
pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, image::ImageError> {
    let image = image::load_from_memory(bytes)?;
    let (width, height) = image.dimensions();
    let rgba = image.to_rgba8();

    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;
    for (x, y, pixel) in rgba.enumerate_pixels() {
        if pixel.0[3] >= ALPHA_CUTOFF {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if min_x > max_x || min_y > max_y {
        return Ok(SpriteData {
            width,
            height,
            pixels: rgba.pixels().map(|pixel| pixel.0).collect(),
        });
    }

    let crop_w = max_x - min_x + 1;
    let crop_h = max_y - min_y + 1;
    let mut pixels = Vec::with_capacity((crop_w * crop_h) as usize);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            pixels.push(rgba.get_pixel(x, y).0);
        }
    }
    Ok(SpriteData {
        width: crop_w,
        height: crop_h,
        pixels,
    })
}
