//! Certificate renderer
//!
//! Draws one certificate in fixed stage order: background, gradient,
//! texture, decorations, content. Each later stage composites over the
//! output of every earlier one, so the order never changes; stages whose
//! triggering concept field is absent are skipped.

use crate::assets::{Asset, AssetSource};
use crate::catalog::{AssetCatalog, IconKind, TextureTheme};
use crate::concept::{
    defaults, DesignConcept, EFFECT_GRADIENT, EFFECT_TEXTURE, ELEMENT_BORDER, ELEMENT_GEOMETRIC, ELEMENT_ICON,
};
use crate::rendering::layout::content_layers;
use crate::rendering::{Canvas, Certificate, Rgba};
use crate::{Result, Viewport};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use resvg::usvg;
use std::sync::Arc;

pub const TEXTURE_OPACITY: f32 = 0.3;
pub const BORDER_INSET: f32 = 50.0;
pub const BORDER_WIDTH: f32 = 10.0;
pub const PATTERN_CIRCLES: usize = 20;
pub const PATTERN_OPACITY: f32 = 0.2;
pub const PATTERN_MIN_RADIUS: f32 = 10.0;
pub const PATTERN_MAX_RADIUS: f32 = 40.0;
pub const ICON_SIZE: f32 = 80.0;
/// Distance of the icon's top-left corner from the right and bottom edges
pub const ICON_OFFSET: f32 = 120.0;

/// Renders certificates from design concepts.
///
/// The renderer owns no mutable state: the catalog is shared read-only and
/// every call to [`render`](Self::render) starts from a fresh surface.
pub struct CertificateRenderer<S: AssetSource> {
    catalog: Arc<AssetCatalog>,
    assets: S,
    viewport: Viewport,
    svg_options: usvg::Options<'static>,
    pattern_seed: Option<u64>,
}

impl<S: AssetSource> CertificateRenderer<S> {
    /// Create a renderer; system fonts are loaded once here for text.
    pub fn new(catalog: Arc<AssetCatalog>, assets: S, viewport: Viewport) -> Self {
        let mut svg_options = usvg::Options::default();
        svg_options.font_family = crate::rendering::layout::DEFAULT_FAMILY.to_string();
        svg_options.fontdb_mut().load_system_fonts();
        debug!("loaded {} font faces", svg_options.fontdb.len());
        Self::with_svg_options(catalog, assets, viewport, svg_options)
    }

    /// Create a renderer with explicit SVG/font options.
    pub fn with_svg_options(
        catalog: Arc<AssetCatalog>,
        assets: S,
        viewport: Viewport,
        svg_options: usvg::Options<'static>,
    ) -> Self {
        Self {
            catalog,
            assets,
            viewport,
            svg_options,
            pattern_seed: None,
        }
    }

    /// Seed the geometric pattern; slot `i` uses `seed + i`.
    pub fn with_pattern_seed(mut self, seed: Option<u64>) -> Self {
        self.pattern_seed = seed;
        self
    }

    /// Render one certificate.
    ///
    /// Fails only when the surface cannot be created, the background cannot
    /// be loaded, or text cannot be laid out. Texture and icon failures are
    /// logged and the stage is skipped.
    pub async fn render(&self, category: &str, concept: &DesignConcept, slot: usize) -> Result<Certificate> {
        let mut canvas = Canvas::new(self.viewport)?;

        self.draw_background(&mut canvas, slot).await?;

        if concept.has_effect(EFFECT_GRADIENT) {
            self.draw_gradient(&mut canvas, concept)?;
        }

        if concept.has_effect(EFFECT_TEXTURE) {
            if let Err(e) = self.draw_texture(&mut canvas, concept).await {
                warn!("slot {}: skipping texture: {}", slot, e);
            }
        }

        self.draw_decorations(&mut canvas, concept, slot).await;

        for layer in content_layers(category, concept, self.viewport) {
            canvas.fill_text(&layer, &self.svg_options)?;
        }

        debug!("slot {}: rendered {} paint commands", slot, canvas.commands().len());
        Ok(Certificate::new(slot, category, concept, canvas))
    }

    async fn load(&self, id: &str) -> Result<Asset> {
        let bytes = self.assets.fetch(id).await?;
        Asset::decode(id, &bytes, &self.svg_options)
    }

    async fn draw_background(&self, canvas: &mut Canvas, slot: usize) -> Result<()> {
        let id = self.catalog.background_for_slot(slot);
        let asset = self.load(id).await?;
        let (w, h) = (canvas.width(), canvas.height());
        canvas.draw_image(id, &asset, 0.0, 0.0, w, h);
        Ok(())
    }

    fn draw_gradient(&self, canvas: &mut Canvas, concept: &DesignConcept) -> Result<()> {
        let start = Rgba::resolve(concept.primary(), defaults::PRIMARY);
        let end = Rgba::resolve(concept.secondary(), defaults::GRADIENT_END);
        let to = (canvas.width(), canvas.height());
        canvas.fill_linear_gradient((0.0, 0.0), to, start, end)
    }

    async fn draw_texture(&self, canvas: &mut Canvas, concept: &DesignConcept) -> Result<()> {
        let id = self.catalog.texture(TextureTheme::for_style(concept.style()));
        let asset = self.load(id).await?;
        canvas.fill_pattern(id, &asset, TEXTURE_OPACITY)
    }

    async fn draw_decorations(&self, canvas: &mut Canvas, concept: &DesignConcept, slot: usize) {
        let (w, h) = (canvas.width(), canvas.height());

        if concept.has_element(ELEMENT_BORDER) {
            let color = Rgba::resolve(concept.secondary(), defaults::BORDER);
            canvas.stroke_rect(
                BORDER_INSET,
                BORDER_INSET,
                w - 2.0 * BORDER_INSET,
                h - 2.0 * BORDER_INSET,
                BORDER_WIDTH,
                color,
            );
        }

        if concept.has_element(ELEMENT_GEOMETRIC) {
            let color = Rgba::resolve(concept.primary(), defaults::PRIMARY);
            let mut rng = match self.pattern_seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(slot as u64)),
                None => StdRng::from_entropy(),
            };
            for _ in 0..PATTERN_CIRCLES {
                let x = rng.gen_range(0.0..w);
                let y = rng.gen_range(0.0..h);
                let radius = rng.gen_range(PATTERN_MIN_RADIUS..PATTERN_MAX_RADIUS);
                canvas.fill_circle(x, y, radius, color, PATTERN_OPACITY);
            }
        }

        if concept.has_element_containing(ELEMENT_ICON) {
            let kind = IconKind::for_style(concept.style());
            let id = self.catalog.icon(kind);
            match self.load(id).await {
                Ok(asset) => canvas.draw_image(id, &asset, w - ICON_OFFSET, h - ICON_OFFSET, ICON_SIZE, ICON_SIZE),
                Err(e) => warn!("slot {}: skipping {} icon: {}", slot, kind, e),
            }
        }
    }
}
