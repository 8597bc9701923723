// File: crates/vizbind-core/src/types.rs
// Summary: Shared types and constants (surface size, margins, points, plot rect, colors).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default surface width in pixels.
pub const WIDTH: u32 = 800;
/// Default surface height in pixels.
pub const HEIGHT: u32 = 600;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left.saturating_add(self.right) }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top.saturating_add(self.bottom) }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(100, 50, 50, 100)
    }
}

/// A position in render-target pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(lerp_f32(self.x, other.x, t), lerp_f32(self.y, other.y, t))
    }
}

/// Plot area left after applying margins to the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PlotRect {
    pub fn from_surface(width: u32, height: u32, insets: &Insets) -> Self {
        let right = width.saturating_sub(insets.right).max(insets.left);
        let bottom = height.saturating_sub(insets.bottom).max(insets.top);
        Self {
            left: insets.left as f32,
            top: insets.top as f32,
            right: right as f32,
            bottom: bottom as f32,
        }
    }
    pub fn width(&self) -> f32 { self.right - self.left }
    pub fn height(&self) -> f32 { self.bottom - self.top }
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
    /// Horizontal pixel range, left to right.
    pub fn x_range(&self) -> (f32, f32) { (self.left, self.right) }
    /// Vertical pixel range, bottom to top (values grow upwards).
    pub fn y_range(&self) -> (f32, f32) { (self.bottom, self.top) }
}

/// 8-bit RGBA color. Serialized as `#rrggbb` or `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `0xRRGGBB`
    pub const fn hex(v: u32) -> Self {
        Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let ch = |a: u8, b: u8| lerp_f32(a as f32, b as f32, t).round().clamp(0.0, 255.0) as u8;
        Rgba {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
            a: ch(self.a, other.a),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let hex = s.trim().trim_start_matches('#');
        let byte = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| format!("invalid color '{s}'"))
        };
        match hex.len() {
            6 => Ok(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: byte(6)? }),
            _ => Err(format!("invalid color '{s}'")),
        }
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_string()
    }
}

#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_roundtrip() {
        let c = Rgba::try_from(String::from("#66c2a5")).unwrap();
        assert_eq!(c, Rgba::hex(0x66c2a5));
        assert_eq!(String::from(c), "#66c2a5");
        assert!(Rgba::try_from(String::from("#12")).is_err());
    }

    #[test]
    fn plot_rect_applies_margins() {
        let r = PlotRect::from_surface(800, 600, &Insets::new(100, 50, 50, 100));
        assert_eq!(r.width(), 650.0);
        assert_eq!(r.height(), 450.0);
        assert_eq!(r.y_range(), (500.0, 50.0));
    }

    #[test]
    fn inset_sums_saturate() {
        let huge = Insets::new(u32::MAX, 10, u32::MAX - 1, 5);
        assert_eq!(huge.hsum(), u32::MAX);
        assert_eq!(huge.vsum(), u32::MAX);
        assert_eq!(Insets::default().hsum(), 150);
    }
}
