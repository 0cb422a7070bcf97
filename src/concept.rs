//! Design concept records
//!
//! A `DesignConcept` is the bundle of stylistic hints that drives one
//! certificate: colors, a free-form style label, visual elements, fonts and
//! special effects. Every field is optional because the remote generator is
//! not guaranteed to populate all of them; the renderer falls back to the
//! constants in [`defaults`] field by field.

use serde::{Deserialize, Serialize};

/// Fallback values used whenever a concept field is absent.
pub mod defaults {
    /// Title color, gradient start and geometric pattern fill
    pub const PRIMARY: &str = "#3498db";
    /// Gradient end stop
    pub const GRADIENT_END: &str = "#2980b9";
    /// Border stroke
    pub const BORDER: &str = "#000000";
    pub const TITLE_FONT: &str = "bold 36px Arial";
    pub const BODY_FONT: &str = "18px Arial";
}

/// Effect label enabling the gradient stage (exact match)
pub const EFFECT_GRADIENT: &str = "gradient background";
/// Effect label enabling the texture stage (exact match)
pub const EFFECT_TEXTURE: &str = "texture";
/// Visual element label enabling the border (exact match)
pub const ELEMENT_BORDER: &str = "border";
/// Visual element label enabling the circle pattern (exact match)
pub const ELEMENT_GEOMETRIC: &str = "geometric patterns";
/// Substring that enables the corner icon when found in any visual element
pub const ELEMENT_ICON: &str = "icon";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Typography {
    /// CSS font shorthand for the title line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// CSS font shorthand for the body lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// One certificate design concept, in the JSON shape requested from the
/// remote generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignConcept {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<ColorScheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_elements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<Typography>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_effects: Option<Vec<String>>,
}

impl DesignConcept {
    /// True when no field at all is present.
    pub fn is_empty(&self) -> bool {
        self == &DesignConcept::default()
    }

    /// Style label, or the empty string when absent.
    pub fn style(&self) -> &str {
        self.design_style.as_deref().unwrap_or("")
    }

    pub fn primary(&self) -> Option<&str> {
        self.color_scheme.as_ref()?.primary.as_deref()
    }

    pub fn secondary(&self) -> Option<&str> {
        self.color_scheme.as_ref()?.secondary.as_deref()
    }

    pub fn title_font(&self) -> Option<&str> {
        self.typography.as_ref()?.title.as_deref()
    }

    pub fn body_font(&self) -> Option<&str> {
        self.typography.as_ref()?.body.as_deref()
    }

    /// Exact match against `specialEffects`.
    pub fn has_effect(&self, effect: &str) -> bool {
        self.special_effects
            .as_ref()
            .is_some_and(|effects| effects.iter().any(|e| e == effect))
    }

    /// Exact match against `visualElements`.
    pub fn has_element(&self, element: &str) -> bool {
        self.visual_elements
            .as_ref()
            .is_some_and(|elements| elements.iter().any(|e| e == element))
    }

    /// Substring match against any entry of `visualElements`.
    pub fn has_element_containing(&self, needle: &str) -> bool {
        self.visual_elements
            .as_ref()
            .is_some_and(|elements| elements.iter().any(|e| e.contains(needle)))
    }
}
