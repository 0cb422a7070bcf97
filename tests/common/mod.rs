//! Shared fixtures: an in-memory copy of the standard catalog with solid
//! color backgrounds so pixels can be traced back to their stage.

#![allow(dead_code)]

use certforge::{AssetCatalog, CertificateRenderer, IconKind, MemoryAssetSource, TextureTheme, Viewport};
use resvg::tiny_skia::{Color, Pixmap};
use resvg::usvg;
use std::sync::Arc;

/// Background color for catalog entry `i`
pub fn background_color(i: usize) -> (u8, u8, u8) {
    (10 + i as u8 * 30, 200 - i as u8 * 20, 60)
}

pub fn solid_png(r: u8, g: u8, b: u8) -> Vec<u8> {
    let mut p = Pixmap::new(4, 4).unwrap();
    p.fill(Color::from_rgba8(r, g, b, 255));
    p.encode_png().unwrap()
}

pub fn icon_svg(fill: &str) -> Vec<u8> {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="40"><circle cx="20" cy="20" r="18" fill="{}"/></svg>"#,
        fill
    )
    .into_bytes()
}

/// Every catalog asset, backgrounds in distinct solid colors and white
/// textures.
pub fn full_assets() -> MemoryAssetSource {
    let catalog = AssetCatalog::standard();
    let mut src = MemoryAssetSource::new();
    for (i, id) in catalog.backgrounds().iter().enumerate() {
        let (r, g, b) = background_color(i);
        src.insert(id.clone(), solid_png(r, g, b));
    }
    for theme in TextureTheme::ALL {
        // textures double as backgrounds 4..7; the texture stage sees white
        src.insert(catalog.texture(theme).to_string(), solid_png(255, 255, 255));
    }
    for kind in IconKind::ALL {
        src.insert(catalog.icon(kind).to_string(), icon_svg("gold"));
    }
    src
}

/// Every background in a distinct color and no icons. Backgrounds 4..7
/// are texture images, so those textures load as solid colors.
pub fn backgrounds_only() -> MemoryAssetSource {
    let mut src = MemoryAssetSource::new();
    for (i, id) in AssetCatalog::standard().backgrounds().iter().enumerate() {
        let (r, g, b) = background_color(i);
        src.insert(id.clone(), solid_png(r, g, b));
    }
    src
}

/// A renderer without system fonts so output does not depend on the host.
pub fn renderer(assets: MemoryAssetSource) -> CertificateRenderer<MemoryAssetSource> {
    CertificateRenderer::with_svg_options(
        Arc::new(AssetCatalog::standard()),
        assets,
        Viewport::default(),
        usvg::Options::default(),
    )
}

pub fn rgba_at(cert: &certforge::Certificate, x: u32, y: u32) -> (u8, u8, u8, u8) {
    let p = cert.pixmap().pixel(x, y).unwrap().demultiply();
    (p.red(), p.green(), p.blue(), p.alpha())
}
