use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};

use super::{ClockStyle, DrawingBackend, RenderError, Rgb};
use crate::alarm::AlarmTime;

const HOUR_HAND_RATIO: f32 = 0.5;
const MINUTE_HAND_RATIO: f32 = 0.75;
const STROKE_RATIO: f32 = 0.1;

/// Everything needed to draw one clock face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockFace {
    pub style: ClockStyle,
    pub color: Rgb,
    pub time: AlarmTime,
}

/// A clock icon that can be drawn at any size and updated in place.
#[derive(Debug)]
pub struct RasterClock {
    face: Mutex<ClockFace>,
    size: u32,
}

impl RasterClock {
    fn lock(&self) -> MutexGuard<'_, ClockFace> {
        self.face.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn face(&self) -> ClockFace {
        *self.lock()
    }

    /// Pixel size the backend was configured with.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn draw(&self, size: u32) -> RgbaImage {
        draw_face(&self.face(), size)
    }

    pub fn save_png(&self, path: &Path, size: u32) -> Result<()> {
        self.draw(size)
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("Failed to write clock icon to {}", path.display()))
    }
}

/// Default drawing capability: square RGBA clock faces.
#[derive(Debug, Clone, Copy)]
pub struct RasterClockBackend {
    size: u32,
}

impl RasterClockBackend {
    pub fn new(size: u32) -> Self {
        Self { size }
    }
}

impl DrawingBackend for RasterClockBackend {
    type Icon = RasterClock;

    fn render(&self, style: ClockStyle, color: Rgb, time: AlarmTime) -> Result<RasterClock, RenderError> {
        if self.size == 0 {
            return Err(RenderError::InvalidSize(self.size));
        }
        Ok(RasterClock {
            face: Mutex::new(ClockFace { style, color, time }),
            size: self.size,
        })
    }

    fn mutate(&self, icon: &RasterClock, time: AlarmTime) {
        icon.lock().time = time;
    }

    fn restyle(&self, icon: &RasterClock, color: Rgb) {
        icon.lock().color = color;
    }
}

/// Hand angles in degrees, clockwise from twelve o'clock.
fn hand_angles(time: AlarmTime) -> (f32, f32) {
    let minute = f32::from(time.minute());
    let hour = f32::from(time.hour() % 12) + minute / 60.0;
    (hour * 30.0, minute * 6.0)
}

fn hand_tip(center: f32, length: f32, degrees: f32) -> (f32, f32) {
    let rad = degrees.to_radians();
    (center + length * rad.sin(), center - length * rad.cos())
}

fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

pub fn draw_face(face: &ClockFace, size: u32) -> RgbaImage {
    let mut img = RgbaImage::new(size, size);
    let extent = size as f32;
    let center = extent / 2.0;
    let radius = center - 0.5;
    let stroke = (extent * STROKE_RATIO).max(1.0);
    let ink = Rgba([face.color.r, face.color.g, face.color.b, 0xff]);

    let (hour_deg, minute_deg) = hand_angles(face.time);
    let origin = (center, center);
    let hour_tip = hand_tip(center, radius * HOUR_HAND_RATIO, hour_deg);
    let minute_tip = hand_tip(center, radius * MINUTE_HAND_RATIO, minute_deg);

    for (x, y, px) in img.enumerate_pixels_mut() {
        let p = (x as f32 + 0.5, y as f32 + 0.5);
        let from_center = distance_to_segment(p, origin, origin);
        if from_center > radius {
            continue;
        }

        let on_hand = distance_to_segment(p, origin, hour_tip) <= stroke / 2.0
            || distance_to_segment(p, origin, minute_tip) <= stroke / 2.0;

        let filled = match face.style {
            ClockStyle::Aosp => on_hand || from_center >= radius - stroke,
            ClockStyle::TouchWiz => !on_hand,
        };
        if filled {
            *px = ink;
        }
    }

    img
}
