//! Paint command set recorded while drawing a certificate

use crate::rendering::layout::TextLayer;
use std::fmt;
use std::str::FromStr;

/// Straight-alpha 8-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const BLACK: Rgba = Rgba(0, 0, 0, 255);

    /// Parse any CSS color string (hex, named, `rgb()`/`rgba()`).
    pub fn parse(s: &str) -> Option<Self> {
        let c = svgtypes::Color::from_str(s.trim()).ok()?;
        Some(Rgba(c.red, c.green, c.blue, c.alpha))
    }

    /// Parse `value` when present, otherwise (or when it is not a valid
    /// color) parse `default`.
    pub fn resolve(value: Option<&str>, default: &str) -> Self {
        value
            .and_then(|v| {
                let parsed = Rgba::parse(v);
                if parsed.is_none() {
                    log::debug!("ignoring invalid color {:?}, using {}", v, default);
                }
                parsed
            })
            .or_else(|| Rgba::parse(default))
            .unwrap_or(Rgba::BLACK)
    }

    /// Same color with alpha scaled by `opacity`
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (self.3 as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Rgba(self.0, self.1, self.2, a)
    }

    pub fn to_skia(self) -> resvg::tiny_skia::Color {
        resvg::tiny_skia::Color::from_rgba8(self.0, self.1, self.2, self.3)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)?;
        if self.3 != 255 {
            write!(f, "{:02x}", self.3)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// An asset drawn scaled into a rectangle
    Image {
        source: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// A linear gradient filling the whole surface
    LinearGradient {
        from: (f32, f32),
        to: (f32, f32),
        start: Rgba,
        end: Rgba,
    },
    /// A repeating pattern filling the whole surface
    Pattern { source: String, opacity: f32 },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
        color: Rgba,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Rgba,
        opacity: f32,
    },
    Text(TextLayer),
}

impl fmt::Display for PaintCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaintCommand::Image { source, x, y, width, height } => {
                write!(f, "image {:?} at ({}, {}) size {}x{}", source, x, y, width, height)
            }
            PaintCommand::LinearGradient { from, to, start, end } => write!(
                f,
                "linear-gradient ({}, {}) -> ({}, {}) stops [0: {}, 1: {}]",
                from.0, from.1, to.0, to.1, start, end
            ),
            PaintCommand::Pattern { source, opacity } => {
                write!(f, "pattern {:?} repeat opacity {}", source, opacity)
            }
            PaintCommand::StrokeRect { x, y, width, height, line_width, color } => write!(
                f,
                "stroke-rect ({}, {}) size {}x{} width {} color {}",
                x, y, width, height, line_width, color
            ),
            PaintCommand::Circle { cx, cy, radius, color, opacity } => write!(
                f,
                "circle ({:.1}, {:.1}) r {:.1} fill {} opacity {}",
                cx, cy, radius, color, opacity
            ),
            PaintCommand::Text(layer) => write!(
                f,
                "text {:?} at ({}, {}) align {} font {:?} color {}",
                layer.text, layer.x, layer.y, layer.align, layer.font.to_string(), layer.color
            ),
        }
    }
}
