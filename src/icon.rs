//! Tray icon rendering.
//!
//! The icon is a single glyph drawn on a transparent 50x50 canvas. Which glyph
//! and colour are used depends only on the connection state and the charge.

use std::path::{Path, PathBuf};

use crate::error::TrayError;
use crate::headset::CHARGE_CHARGING;

pub const ICON_SIZE: u32 = 50;

/// File name of the PNG copy written to the cache directory.
pub const ICON_FILE_NAME: &str = "headsetcontrol_tray_icon.png";

pub type Rgba = [u8; 4];

pub const RED: Rgba = [255, 0, 0, 255];
pub const TEAL: Rgba = [0, 255, 150, 255];
pub const GREEN: Rgba = [0, 255, 0, 255];
pub const YELLOW_GREEN: Rgba = [234, 255, 0, 255];
pub const ORANGE: Rgba = [255, 90, 0, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Disconnected,
    Plug,
    Battery,
}

/// Glyph and colour for a headset state.
pub fn icon_style(connected: bool, charge: i32) -> (Glyph, Rgba) {
    if !connected {
        return (Glyph::Disconnected, RED);
    }
    if charge == CHARGE_CHARGING {
        return (Glyph::Plug, TEAL);
    }
    let color = if charge > 80 {
        GREEN
    } else if charge > 40 {
        YELLOW_GREEN
    } else if charge > 20 {
        ORANGE
    } else {
        RED
    };
    (Glyph::Battery, color)
}

/// Square RGBA bitmap, row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    size: u32,
    rgba: Vec<u8>,
}

impl Bitmap {
    pub fn transparent(size: u32) -> Self {
        Self {
            size,
            rgba: vec![0; (size * size * 4) as usize],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let i = self.index(x, y);
        [
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ]
    }

    fn put(&mut self, x: u32, y: u32, color: Rgba) {
        if x < self.size && y < self.size {
            let i = self.index(x, y);
            self.rgba[i..i + 4].copy_from_slice(&color);
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y * self.size + x) * 4) as usize
    }

    /// Paints every pixel whose centre satisfies `inside`.
    fn paint(&mut self, color: Rgba, inside: impl Fn(f32, f32) -> bool) {
        for y in 0..self.size {
            for x in 0..self.size {
                if inside(x as f32 + 0.5, y as f32 + 0.5) {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Colours of all opaque pixels, deduplicated.
    pub fn opaque_colors(&self) -> Vec<Rgba> {
        let mut colors: Vec<Rgba> = Vec::new();
        for px in self.rgba.chunks_exact(4) {
            let c = [px[0], px[1], px[2], px[3]];
            if c[3] != 0 && !colors.contains(&c) {
                colors.push(c);
            }
        }
        colors
    }

    /// Pixel data in the ARGB32 network byte order StatusNotifierItem expects.
    pub fn to_argb32(&self) -> Vec<u8> {
        let mut argb = Vec::with_capacity(self.rgba.len());
        for px in self.rgba.chunks_exact(4) {
            argb.extend_from_slice(&[px[3], px[0], px[1], px[2]]);
        }
        argb
    }

    pub fn to_ksni(&self) -> ksni::Icon {
        ksni::Icon {
            width: self.size as i32,
            height: self.size as i32,
            data: self.to_argb32(),
        }
    }

    /// Writes the bitmap as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), TrayError> {
        let image = image::RgbaImage::from_raw(self.size, self.size, self.rgba.clone()).ok_or(
            TrayError::IconSize {
                width: self.size,
                height: self.size,
            },
        )?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Renders the tray icon for a headset state.
pub fn render(connected: bool, charge: i32) -> Bitmap {
    let (glyph, color) = icon_style(connected, charge);
    let mut bitmap = Bitmap::transparent(ICON_SIZE);
    match glyph {
        Glyph::Disconnected => draw_frown(&mut bitmap, color),
        Glyph::Plug => draw_plug(&mut bitmap, color),
        Glyph::Battery => draw_battery(&mut bitmap, color),
    }
    bitmap
}

fn in_rect(x: f32, y: f32, x0: f32, y0: f32, x1: f32, y1: f32) -> bool {
    x >= x0 && x < x1 && y >= y0 && y < y1
}

fn dist(x: f32, y: f32, cx: f32, cy: f32) -> f32 {
    ((x - cx).powi(2) + (y - cy).powi(2)).sqrt()
}

/// Horizontal full battery: outlined body, filled core, terminal on the right.
fn draw_battery(bitmap: &mut Bitmap, color: Rgba) {
    bitmap.paint(color, |x, y| {
        let body = in_rect(x, y, 3.0, 14.0, 43.0, 36.0);
        let hollow = in_rect(x, y, 6.0, 17.0, 40.0, 33.0);
        let core = in_rect(x, y, 9.0, 20.0, 37.0, 30.0);
        let terminal = in_rect(x, y, 43.0, 20.0, 47.0, 30.0);
        (body && !hollow) || core || terminal
    });
}

/// Two prongs, a rounded head and a cord.
fn draw_plug(bitmap: &mut Bitmap, color: Rgba) {
    bitmap.paint(color, |x, y| {
        let prongs = in_rect(x, y, 16.0, 3.0, 21.0, 16.0) || in_rect(x, y, 29.0, 3.0, 34.0, 16.0);
        let head = in_rect(x, y, 11.0, 16.0, 39.0, 28.0) || (y >= 28.0 && dist(x, y, 25.0, 28.0) <= 14.0);
        let cord = in_rect(x, y, 22.5, 40.0, 27.5, 48.0);
        prongs || head || cord
    });
}

/// Ring face with two eyes and a downturned mouth.
fn draw_frown(bitmap: &mut Bitmap, color: Rgba) {
    bitmap.paint(color, |x, y| {
        let r = dist(x, y, 25.0, 25.0);
        let ring = (19.0..=22.0).contains(&r);
        let eyes = dist(x, y, 18.0, 19.0) <= 3.0 || dist(x, y, 32.0, 19.0) <= 3.0;
        let m = dist(x, y, 25.0, 41.0);
        let mouth = (9.0..=11.5).contains(&m) && y < 35.0 && (x - 25.0).abs() <= 9.0;
        ring || eyes || mouth
    });
}

/// Path of the icon cache file.
///
/// `XDG_CACHE_HOME` wins; otherwise the file is hidden directly in `HOME`.
/// Empty values count as unset.
pub fn icon_cache_path(
    xdg_cache_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf, TrayError> {
    let non_empty = |p: Option<PathBuf>| p.filter(|p| !p.as_os_str().is_empty());
    if let Some(cache) = non_empty(xdg_cache_home) {
        return Ok(cache.join(ICON_FILE_NAME));
    }
    if let Some(home) = non_empty(home) {
        return Ok(home.join(format!(".{ICON_FILE_NAME}")));
    }
    Err(TrayError::MissingCacheDir)
}
