//! The fixed, read-only asset catalog
//!
//! The catalog maps slots, icon kinds and texture themes to asset
//! identifiers. Identifiers are paths relative to the assets root and are
//! resolved by an [`AssetSource`](crate::assets::AssetSource).

use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// Corner icon variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    Badge,
    Medal,
    Ribbon,
    Seal,
}

impl IconKind {
    pub const ALL: [IconKind; 4] = [IconKind::Badge, IconKind::Medal, IconKind::Ribbon, IconKind::Seal];

    /// Pick the icon for a style label. First matching keyword wins.
    pub fn for_style(style: &str) -> Self {
        if style.contains("elegant") {
            IconKind::Ribbon
        } else if style.contains("professional") {
            IconKind::Seal
        } else if style.contains("achievement") {
            IconKind::Medal
        } else {
            IconKind::Badge
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IconKind::Badge => "badge",
            IconKind::Medal => "medal",
            IconKind::Ribbon => "ribbon",
            IconKind::Seal => "seal",
        }
    }
}

impl fmt::Display for IconKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Texture overlay themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTheme {
    /// Parchment
    Vintage,
    Watercolor,
    /// Linen
    Default,
}

impl TextureTheme {
    pub const ALL: [TextureTheme; 3] = [TextureTheme::Vintage, TextureTheme::Watercolor, TextureTheme::Default];

    /// Pick the texture theme for a style label. First matching keyword wins.
    pub fn for_style(style: &str) -> Self {
        if style.contains("vintage") {
            TextureTheme::Vintage
        } else if style.contains("watercolor") {
            TextureTheme::Watercolor
        } else {
            TextureTheme::Default
        }
    }
}

/// Immutable catalog of certificate assets.
///
/// Construct it once (usually with [`AssetCatalog::standard`]) and share it
/// between renderers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    backgrounds: Vec<String>,
    icons: HashMap<IconKind, String>,
    textures: HashMap<TextureTheme, String>,
}

impl AssetCatalog {
    /// Build a catalog from explicit tables.
    ///
    /// Every icon kind and texture theme must be mapped and at least one
    /// background is required.
    pub fn new(
        backgrounds: Vec<String>,
        icons: HashMap<IconKind, String>,
        textures: HashMap<TextureTheme, String>,
    ) -> Result<Self> {
        if backgrounds.is_empty() {
            return Err(Error::Config("asset catalog needs at least one background".into()));
        }
        if let Some(kind) = IconKind::ALL.iter().find(|k| !icons.contains_key(*k)) {
            return Err(Error::Config(format!("asset catalog has no {} icon", kind)));
        }
        if let Some(theme) = TextureTheme::ALL.iter().find(|t| !textures.contains_key(*t)) {
            return Err(Error::Config(format!("asset catalog has no {:?} texture", theme)));
        }
        Ok(Self {
            backgrounds,
            icons,
            textures,
        })
    }

    /// The stock catalog shipped under `assets/`.
    ///
    /// The last four backgrounds reuse the texture images so the cycle is
    /// eight entries long.
    pub fn standard() -> Self {
        let backgrounds = [
            "backgrounds/background1.png",
            "backgrounds/background2.png",
            "backgrounds/background3.png",
            "backgrounds/background4.png",
            "textures/linen.png",
            "textures/watercolor.png",
            "textures/parchment.png",
            "textures/subtle-noise.png",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let icons = IconKind::ALL
            .into_iter()
            .map(|k| (k, format!("icons/{}.svg", k.name())))
            .collect();

        let textures = HashMap::from([
            (TextureTheme::Vintage, "textures/parchment.png".to_string()),
            (TextureTheme::Watercolor, "textures/watercolor.png".to_string()),
            (TextureTheme::Default, "textures/linen.png".to_string()),
        ]);

        Self {
            backgrounds,
            icons,
            textures,
        }
    }

    pub fn backgrounds(&self) -> &[String] {
        &self.backgrounds
    }

    /// Background for a slot, cycling through the list.
    pub fn background_for_slot(&self, slot: usize) -> &str {
        &self.backgrounds[slot % self.backgrounds.len()]
    }

    pub fn icon(&self, kind: IconKind) -> &str {
        // `new` and `standard` guarantee every kind is present
        self.icons.get(&kind).map(String::as_str).unwrap_or_default()
    }

    pub fn texture(&self, theme: TextureTheme) -> &str {
        self.textures.get(&theme).map(String::as_str).unwrap_or_default()
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_cycles_eight_backgrounds() {
        let c = AssetCatalog::standard();
        assert_eq!(c.backgrounds().len(), 8);
        assert_eq!(c.background_for_slot(0), "backgrounds/background1.png");
        assert_eq!(c.background_for_slot(8), c.background_for_slot(0));
        assert_eq!(c.background_for_slot(13), c.background_for_slot(5));
    }

    #[test]
    fn icon_keywords_follow_priority() {
        assert_eq!(IconKind::for_style("elegant"), IconKind::Ribbon);
        assert_eq!(IconKind::for_style("professional achievement"), IconKind::Seal);
        assert_eq!(IconKind::for_style("elegant professional"), IconKind::Ribbon);
        assert_eq!(IconKind::for_style("achievement"), IconKind::Medal);
        assert_eq!(IconKind::for_style("playful"), IconKind::Badge);
        assert_eq!(IconKind::for_style("Elegant"), IconKind::Badge);
        assert_eq!(IconKind::for_style(""), IconKind::Badge);
    }

    #[test]
    fn texture_keywords_follow_priority() {
        assert_eq!(TextureTheme::for_style("vintage watercolor"), TextureTheme::Vintage);
        assert_eq!(TextureTheme::for_style("soft watercolor"), TextureTheme::Watercolor);
        assert_eq!(TextureTheme::for_style("modern"), TextureTheme::Default);
        let c = AssetCatalog::standard();
        assert_eq!(c.texture(TextureTheme::Vintage), "textures/parchment.png");
        assert_eq!(c.texture(TextureTheme::Default), "textures/linen.png");
        assert_eq!(c.icon(IconKind::Seal), "icons/seal.svg");
    }

    #[test]
    fn new_rejects_incomplete_tables() {
        let icons: HashMap<_, _> = IconKind::ALL.into_iter().map(|k| (k, k.name().to_string())).collect();
        let textures: HashMap<_, _> = TextureTheme::ALL.into_iter().map(|t| (t, format!("{:?}", t))).collect();

        assert!(matches!(
            AssetCatalog::new(vec![], icons.clone(), textures.clone()),
            Err(Error::Config(_))
        ));

        let mut missing = icons.clone();
        missing.remove(&IconKind::Medal);
        let err = AssetCatalog::new(vec!["bg.png".into()], missing, textures.clone()).unwrap_err();
        assert!(err.to_string().contains("medal"));

        let ok = AssetCatalog::new(vec!["bg.png".into()], icons, textures).unwrap();
        assert_eq!(ok.background_for_slot(4), "bg.png");
    }
}
