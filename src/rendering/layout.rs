//! Text layout for the certificate content stage

use crate::concept::{defaults, DesignConcept};
use crate::rendering::paint::Rgba;
use crate::Viewport;
use std::fmt;

/// Family used when a font shorthand names none
pub const DEFAULT_FAMILY: &str = "Arial";
/// Fixed font of the recipient placeholder line
pub const PLACEHOLDER_FONT: &str = "bold 28px Arial";

pub const PRESENTED_TO: &str = "This certificate is proudly presented to";
pub const RECIPIENT_PLACEHOLDER: &str = "[Recipient Name]";
pub const DESCRIPTION: &str = "For outstanding achievement and completion of the program";
pub const DATE_LINE: &str = "Date: __________";
pub const SIGNATURE_LINE: &str = "Signature: __________";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// SVG `text-anchor` value
    pub fn anchor(self) -> &'static str {
        match self {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        }
    }
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

/// A parsed CSS font shorthand (`[style] [weight] <size> [family]`)
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub style: FontStyle,
    pub weight: u16,
    pub size_px: f32,
    pub families: Vec<String>,
}

impl FontSpec {
    /// Parse a font shorthand such as `bold 36px Arial` or
    /// `italic 36px Georgia`. Variant and stretch keywords are accepted and
    /// ignored; a missing family means [`DEFAULT_FAMILY`].
    pub fn parse(shorthand: &str) -> Option<Self> {
        let mut style = FontStyle::Normal;
        let mut weight = 400u16;
        let mut rest = shorthand.trim();

        loop {
            let (token, remainder) = match rest.find(char::is_whitespace) {
                Some(i) => (&rest[..i], rest[i..].trim_start()),
                None => (rest, ""),
            };
            if token.is_empty() {
                return None;
            }

            if let Some(size_px) = parse_size(token) {
                let families = parse_families(remainder);
                return Some(Self {
                    style,
                    weight,
                    size_px,
                    families,
                });
            }

            match token {
                "normal" | "small-caps" | "condensed" | "semi-condensed" | "expanded" | "semi-expanded" => {}
                "italic" => style = FontStyle::Italic,
                "oblique" => style = FontStyle::Oblique,
                "bold" | "bolder" => weight = 700,
                "lighter" => weight = 300,
                other => match other.parse::<u16>() {
                    Ok(w) if (1..=1000).contains(&w) => weight = w,
                    _ => return None,
                },
            }
            rest = remainder;
        }
    }

    /// Parse `value` when present, otherwise (or when it does not parse)
    /// parse `default`.
    pub fn resolve(value: Option<&str>, default: &str) -> Self {
        value
            .and_then(|v| {
                let parsed = FontSpec::parse(v);
                if parsed.is_none() {
                    log::debug!("ignoring invalid font {:?}, using {}", v, default);
                }
                parsed
            })
            .or_else(|| FontSpec::parse(default))
            .unwrap_or_else(|| FontSpec {
                style: FontStyle::Normal,
                weight: 400,
                size_px: 10.0,
                families: vec![DEFAULT_FAMILY.to_string()],
            })
    }

    /// Value for an SVG `font-family` attribute, with a generic fallback.
    pub fn family_list(&self) -> String {
        let mut out: Vec<String> = self.families.iter().map(|f| format!("'{}'", f)).collect();
        out.push("sans-serif".to_string());
        out.join(", ")
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            FontStyle::Normal => {}
            FontStyle::Italic => f.write_str("italic ")?,
            FontStyle::Oblique => f.write_str("oblique ")?,
        }
        match self.weight {
            400 => {}
            700 => f.write_str("bold ")?,
            w => write!(f, "{} ", w)?,
        }
        let families: Vec<String> = self
            .families
            .iter()
            .map(|fam| {
                if fam.contains(' ') {
                    format!("\"{}\"", fam)
                } else {
                    fam.clone()
                }
            })
            .collect();
        write!(f, "{}px {}", self.size_px, families.join(", "))
    }
}

fn parse_size(token: &str) -> Option<f32> {
    // `16px/1.5` carries a line height we have no use for
    let token = token.split('/').next()?;
    let (number, scale) = if let Some(n) = token.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = token.strip_suffix("pt") {
        (n, 4.0 / 3.0)
    } else if let Some(n) = token.strip_suffix("rem").or_else(|| token.strip_suffix("em")) {
        (n, 16.0)
    } else {
        return None;
    };
    let value: f32 = number.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value * scale)
}

fn parse_families(list: &str) -> Vec<String> {
    let families: Vec<String> = list
        .split(',')
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();
    if families.is_empty() {
        vec![DEFAULT_FAMILY.to_string()]
    } else {
        families
    }
}

/// One line of text placed on the surface; `y` is the alphabetic baseline
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub align: TextAlign,
    pub font: FontSpec,
    pub color: Rgba,
}

/// Lay out the fixed certificate content for `category` and `concept`.
///
/// The returned layers are in draw order: title, presentation line,
/// recipient placeholder, description, date and signature.
pub fn content_layers(category: &str, concept: &DesignConcept, viewport: Viewport) -> Vec<TextLayer> {
    let width = viewport.width as f32;
    let center = width / 2.0;

    let title_font = FontSpec::resolve(concept.title_font(), defaults::TITLE_FONT);
    let body_font = FontSpec::resolve(concept.body_font(), defaults::BODY_FONT);
    let title_color = Rgba::resolve(concept.primary(), defaults::PRIMARY);
    let description_color = Rgba(0x55, 0x55, 0x55, 255);

    let layer = |text: &str, x: f32, y: f32, align: TextAlign, font: &FontSpec, color: Rgba| TextLayer {
        text: text.to_string(),
        x,
        y,
        align,
        font: font.clone(),
        color,
    };

    vec![
        layer(category, center, 150.0, TextAlign::Center, &title_font, title_color),
        layer(PRESENTED_TO, center, 220.0, TextAlign::Center, &body_font, Rgba(0x33, 0x33, 0x33, 255)),
        layer(
            RECIPIENT_PLACEHOLDER,
            center,
            280.0,
            TextAlign::Center,
            &FontSpec::resolve(None, PLACEHOLDER_FONT),
            Rgba::BLACK,
        ),
        layer(DESCRIPTION, center, 330.0, TextAlign::Center, &body_font, description_color),
        // Date and signature keep the description's font and color
        layer(DATE_LINE, 150.0, 450.0, TextAlign::Left, &body_font, description_color),
        layer(SIGNATURE_LINE, width - 150.0, 450.0, TextAlign::Right, &body_font, description_color),
    ]
}
