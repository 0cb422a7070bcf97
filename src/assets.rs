//! Asset sources and decoding
//!
//! An [`AssetSource`] resolves a catalog identifier to raw bytes. Loading is
//! a single awaited call per asset; decoding turns the bytes into either a
//! raster pixmap (PNG, JPEG) or a parsed SVG tree.

use crate::{Error, Result};
use async_trait::async_trait;
use log::debug;
use resvg::tiny_skia::{IntSize, Pixmap};
use resvg::usvg;
use std::collections::HashMap;
use std::path::PathBuf;

/// Resolves asset identifiers to bytes (allows mocking in tests)
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch the raw bytes behind `id`
    async fn fetch(&self, id: &str) -> Result<Vec<u8>>;
}

/// Reads assets from a directory on disk
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AssetSource for FsAssetSource {
    async fn fetch(&self, id: &str) -> Result<Vec<u8>> {
        let path = self.root.join(id);
        debug!("reading asset {}", path.display());
        tokio::fs::read(&path).await.map_err(|e| Error::asset(id, e))
    }
}

/// Serves assets from memory; handy for tests and embedded catalogs
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(id.into(), bytes.into());
    }

    pub fn with(mut self, id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(id, bytes);
        self
    }
}

#[async_trait]
impl AssetSource for MemoryAssetSource {
    async fn fetch(&self, id: &str) -> Result<Vec<u8>> {
        self.files
            .get(id)
            .cloned()
            .ok_or_else(|| Error::asset(id, "not found"))
    }
}

/// A decoded asset ready to be drawn
pub enum Asset {
    Raster(Pixmap),
    Vector(usvg::Tree),
}

impl Asset {
    /// Decode `bytes`; identifiers ending in `.svg` are parsed as SVG,
    /// everything else goes through the raster decoders.
    pub fn decode(id: &str, bytes: &[u8], svg_options: &usvg::Options) -> Result<Self> {
        if id.to_ascii_lowercase().ends_with(".svg") {
            let tree = usvg::Tree::from_data(bytes, svg_options).map_err(|e| Error::asset(id, e))?;
            return Ok(Asset::Vector(tree));
        }
        let image = image::load_from_memory(bytes).map_err(|e| Error::asset(id, e))?;
        let pixmap = rgba_to_pixmap(&image.to_rgba8()).ok_or_else(|| Error::asset(id, "empty image"))?;
        Ok(Asset::Raster(pixmap))
    }

    /// Intrinsic size in pixels
    pub fn size(&self) -> (f32, f32) {
        match self {
            Asset::Raster(p) => (p.width() as f32, p.height() as f32),
            Asset::Vector(t) => (t.size().width(), t.size().height()),
        }
    }
}

/// Convert straight-alpha RGBA into a premultiplied tiny-skia pixmap.
pub(crate) fn rgba_to_pixmap(rgba: &image::RgbaImage) -> Option<Pixmap> {
    let (width, height) = rgba.dimensions();
    let size = IntSize::from_wh(width, height)?;

    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        data.push((r as f32 * alpha).round() as u8);
        data.push((g as f32 * alpha).round() as u8);
        data.push((b as f32 * alpha).round() as u8);
        data.push(a);
    }

    Pixmap::from_vec(data, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let mut p = Pixmap::new(4, 2).unwrap();
        p.fill(resvg::tiny_skia::Color::from_rgba8(10, 20, 30, 255));
        p.encode_png().unwrap()
    }

    #[tokio::test]
    async fn memory_source_serves_and_misses() {
        let src = MemoryAssetSource::new().with("a.png", tiny_png());
        assert!(src.fetch("a.png").await.is_ok());
        let err = src.fetch("b.png").await.unwrap_err();
        assert!(matches!(err, Error::AssetLoad { ref path, .. } if path == "b.png"));
    }

    #[tokio::test]
    async fn fs_source_reports_missing_file() {
        let src = FsAssetSource::new("/definitely/not/here");
        let err = src.fetch("backgrounds/background1.png").await.unwrap_err();
        assert!(matches!(err, Error::AssetLoad { .. }));
    }

    #[test]
    fn decodes_png_as_raster() {
        let asset = Asset::decode("bg.png", &tiny_png(), &usvg::Options::default()).unwrap();
        assert_eq!(asset.size(), (4.0, 2.0));
        match asset {
            Asset::Raster(p) => {
                let px = p.pixel(0, 0).unwrap();
                assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (10, 20, 30, 255));
            }
            Asset::Vector(_) => panic!("expected raster"),
        }
    }

    #[test]
    fn decodes_svg_as_vector() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="32"><rect width="64" height="32" fill="red"/></svg>"#;
        let asset = Asset::decode("icons/badge.svg", svg, &usvg::Options::default()).unwrap();
        assert!(matches!(asset, Asset::Vector(_)));
        assert_eq!(asset.size(), (64.0, 32.0));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(Asset::decode("bg.jpg", b"not an image", &usvg::Options::default()).is_err());
        assert!(Asset::decode("x.svg", b"<nope", &usvg::Options::default()).is_err());
    }
}
