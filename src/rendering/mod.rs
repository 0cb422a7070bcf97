//! Rendering: layout of the fixed content, the paint command set and the
//! tiny-skia rasterizer, plus the finished [`Certificate`] type.

pub mod layout;
pub mod paint;
pub mod raster;

use crate::concept::DesignConcept;
use crate::{Error, Result};
use base64::Engine as _;
use resvg::tiny_skia::Pixmap;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

pub use layout::{FontSpec, TextAlign, TextLayer};
pub use paint::{PaintCommand, Rgba};
pub use raster::Canvas;

/// A finished certificate: the composited surface and the commands that
/// built it. Nothing mutates it after rendering completes.
#[derive(Debug, Clone)]
pub struct Certificate {
    slot: usize,
    category: String,
    concept: DesignConcept,
    pixmap: Pixmap,
    commands: Vec<PaintCommand>,
}

impl Certificate {
    pub(crate) fn new(slot: usize, category: &str, concept: &DesignConcept, canvas: Canvas) -> Self {
        let (pixmap, commands) = canvas.into_parts();
        Self {
            slot,
            category: category.to_string(),
            concept: concept.clone(),
            pixmap,
            commands,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn concept(&self) -> &DesignConcept {
        &self.concept
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA surface
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Encode the surface as PNG
    pub fn png_data(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| Error::Render(format!("PNG encoding failed: {}", e)))
    }

    /// `data:image/png;base64,...` URL for embedding in HTML
    pub fn data_url(&self) -> Result<String> {
        let png = self.png_data()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }

    /// SHA-256 of the raw pixel buffer, hex encoded
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.pixmap.data()))
    }

    /// Human-readable listing of every draw operation, in order
    pub fn listing(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "// Certificate {} - {}", self.slot + 1, self.category);
        let _ = writeln!(out, "surface {}x{}", self.width(), self.height());
        for cmd in &self.commands {
            let _ = writeln!(out, "{}", cmd);
        }
        out
    }
}
