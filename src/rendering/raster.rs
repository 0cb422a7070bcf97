//! Rasterizer: a tiny-skia surface that records every paint command it runs

use crate::assets::Asset;
use crate::rendering::layout::{FontStyle, TextLayer};
use crate::rendering::paint::{PaintCommand, Rgba};
use crate::{Error, Result, Viewport};
use resvg::tiny_skia::{
    FillRule, FilterQuality, GradientStop, LinearGradient, Paint, PathBuilder, Pattern, Pixmap, PixmapPaint, Point,
    Rect, SpreadMode, Stroke, Transform,
};
use resvg::usvg;

/// Drawing surface for one certificate
pub struct Canvas {
    pixmap: Pixmap,
    commands: Vec<PaintCommand>,
}

impl Canvas {
    /// A fresh, fully transparent surface
    pub fn new(viewport: Viewport) -> Result<Self> {
        let pixmap = Pixmap::new(viewport.width, viewport.height).ok_or_else(|| {
            Error::Render(format!(
                "cannot allocate a {}x{} surface",
                viewport.width, viewport.height
            ))
        })?;
        Ok(Self {
            pixmap,
            commands: Vec::new(),
        })
    }

    pub fn width(&self) -> f32 {
        self.pixmap.width() as f32
    }

    pub fn height(&self) -> f32 {
        self.pixmap.height() as f32
    }

    fn full_rect(&self) -> Option<Rect> {
        Rect::from_xywh(0.0, 0.0, self.width(), self.height())
    }

    /// Draw `asset` scaled into the given rectangle.
    pub fn draw_image(&mut self, source: &str, asset: &Asset, x: f32, y: f32, width: f32, height: f32) {
        let (img_w, img_h) = asset.size();
        let scale_x = width / img_w;
        let scale_y = height / img_h;
        if !scale_x.is_finite() || !scale_y.is_finite() {
            log::warn!("skipping degenerate image {}", source);
            return;
        }
        let transform = Transform::from_row(scale_x, 0.0, 0.0, scale_y, x, y);

        match asset {
            Asset::Raster(pixmap) => {
                let paint = PixmapPaint {
                    quality: FilterQuality::Bilinear,
                    ..PixmapPaint::default()
                };
                self.pixmap.draw_pixmap(0, 0, pixmap.as_ref(), &paint, transform, None);
            }
            Asset::Vector(tree) => {
                resvg::render(tree, transform, &mut self.pixmap.as_mut());
            }
        }

        self.commands.push(PaintCommand::Image {
            source: source.to_string(),
            x,
            y,
            width,
            height,
        });
    }

    /// Fill the whole surface with a two-stop linear gradient.
    pub fn fill_linear_gradient(&mut self, from: (f32, f32), to: (f32, f32), start: Rgba, end: Rgba) -> Result<()> {
        let shader = LinearGradient::new(
            Point::from_xy(from.0, from.1),
            Point::from_xy(to.0, to.1),
            vec![GradientStop::new(0.0, start.to_skia()), GradientStop::new(1.0, end.to_skia())],
            SpreadMode::Pad,
            Transform::identity(),
        )
        .ok_or_else(|| Error::Render("invalid gradient geometry".into()))?;

        let mut paint = Paint::default();
        paint.shader = shader;
        if let Some(rect) = self.full_rect() {
            self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }

        self.commands.push(PaintCommand::LinearGradient { from, to, start, end });
        Ok(())
    }

    /// Tile `asset` across the whole surface at `opacity`.
    pub fn fill_pattern(&mut self, source: &str, asset: &Asset, opacity: f32) -> Result<()> {
        let owned;
        let tile = match asset {
            Asset::Raster(pixmap) => pixmap,
            Asset::Vector(tree) => {
                owned = rasterize_tree(tree).ok_or_else(|| Error::asset(source, "empty SVG texture"))?;
                &owned
            }
        };

        let mut paint = Paint::default();
        paint.shader = Pattern::new(
            tile.as_ref(),
            SpreadMode::Repeat,
            FilterQuality::Nearest,
            opacity,
            Transform::identity(),
        );
        if let Some(rect) = self.full_rect() {
            self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }

        self.commands.push(PaintCommand::Pattern {
            source: source.to_string(),
            opacity,
        });
        Ok(())
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32, color: Rgba) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            log::warn!("skipping degenerate rectangle {}x{}", width, height);
            return;
        };
        let path = PathBuilder::from_rect(rect);

        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        let stroke = Stroke {
            width: line_width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);

        self.commands.push(PaintCommand::StrokeRect {
            x,
            y,
            width,
            height,
            line_width,
            color,
        });
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba, opacity: f32) {
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color.with_opacity(opacity).to_skia());
        paint.anti_alias = true;
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

        self.commands.push(PaintCommand::Circle {
            cx,
            cy,
            radius,
            color,
            opacity,
        });
    }

    /// Draw one text layer. Glyphs come from `svg_options.fontdb`; text
    /// whose families are unavailable falls back to any sans-serif face,
    /// and is dropped silently when no fonts are installed at all.
    pub fn fill_text(&mut self, layer: &TextLayer, svg_options: &usvg::Options) -> Result<()> {
        let svg = text_svg(layer, self.pixmap.width(), self.pixmap.height());
        let tree = usvg::Tree::from_str(&svg, svg_options)
            .map_err(|e| Error::Render(format!("text layer {:?}: {}", layer.text, e)))?;
        resvg::render(&tree, Transform::identity(), &mut self.pixmap.as_mut());

        self.commands.push(PaintCommand::Text(layer.clone()));
        Ok(())
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    pub fn into_parts(self) -> (Pixmap, Vec<PaintCommand>) {
        (self.pixmap, self.commands)
    }
}

fn rasterize_tree(tree: &usvg::Tree) -> Option<Pixmap> {
    let size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(size.width(), size.height())?;
    resvg::render(tree, Transform::identity(), &mut pixmap.as_mut());
    Some(pixmap)
}

fn text_svg(layer: &TextLayer, width: u32, height: u32) -> String {
    let style = match layer.font.style {
        FontStyle::Normal => "normal",
        FontStyle::Italic => "italic",
        FontStyle::Oblique => "oblique",
    };
    let Rgba(r, g, b, a) = layer.color;
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\
         <text x=\"{x}\" y=\"{y}\" text-anchor=\"{anchor}\" font-family=\"{family}\" font-size=\"{size}\" \
         font-weight=\"{weight}\" font-style=\"{style}\" fill=\"rgb({r},{g},{b})\" fill-opacity=\"{opacity}\" \
         xml:space=\"preserve\">{text}</text></svg>",
        x = layer.x,
        y = layer.y,
        anchor = layer.align.anchor(),
        family = escape_xml(&layer.font.family_list()),
        size = layer.font.size_px,
        weight = layer.font.weight,
        opacity = a as f32 / 255.0,
        text = escape_xml(&layer.text),
    )
}

/// Escape markup and drop characters XML 1.0 cannot carry at all.
fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c < '\u{20}' || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::layout::{FontSpec, TextAlign};

    fn small() -> Viewport {
        Viewport { width: 40, height: 30 }
    }

    fn solid(r: u8, g: u8, b: u8, w: u32, h: u32) -> Asset {
        let mut p = Pixmap::new(w, h).unwrap();
        p.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, 255));
        Asset::Raster(p)
    }

    fn rgba_at(canvas: &Canvas, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let p = canvas.pixmap.pixel(x, y).unwrap().demultiply();
        (p.red(), p.green(), p.blue(), p.alpha())
    }

    #[test]
    fn new_canvas_is_transparent() {
        let c = Canvas::new(small()).unwrap();
        assert_eq!(rgba_at(&c, 5, 5), (0, 0, 0, 0));
        assert!(c.commands().is_empty());
    }

    #[test]
    fn zero_sized_canvas_is_an_error() {
        assert!(matches!(
            Canvas::new(Viewport { width: 0, height: 10 }),
            Err(Error::Render(_))
        ));
    }

    #[test]
    fn image_is_stretched_over_target() {
        let mut c = Canvas::new(small()).unwrap();
        c.draw_image("bg.png", &solid(200, 10, 10, 2, 2), 0.0, 0.0, 40.0, 30.0);
        assert_eq!(rgba_at(&c, 0, 0), (200, 10, 10, 255));
        assert_eq!(rgba_at(&c, 39, 29), (200, 10, 10, 255));
        assert_eq!(c.commands().len(), 1);
    }

    #[test]
    fn gradient_runs_from_start_to_end() {
        let mut c = Canvas::new(small()).unwrap();
        c.fill_linear_gradient((0.0, 0.0), (40.0, 30.0), Rgba(255, 0, 0, 255), Rgba(0, 0, 255, 255))
            .unwrap();
        let (r0, _, b0, _) = rgba_at(&c, 0, 0);
        let (r1, _, b1, _) = rgba_at(&c, 39, 29);
        assert!(r0 > 240 && b0 < 15);
        assert!(b1 > 240 && r1 < 15);
    }

    #[test]
    fn pattern_blends_at_requested_opacity() {
        let mut c = Canvas::new(small()).unwrap();
        c.draw_image("bg.png", &solid(0, 0, 0, 1, 1), 0.0, 0.0, 40.0, 30.0);
        c.fill_pattern("tex.png", &solid(255, 255, 255, 3, 3), 0.3).unwrap();
        let (r, g, b, a) = rgba_at(&c, 17, 11);
        assert_eq!(a, 255);
        for v in [r, g, b] {
            assert!((74..=79).contains(&v), "got {}", v);
        }
    }

    #[test]
    fn stroke_rect_leaves_interior_untouched() {
        let mut c = Canvas::new(Viewport { width: 100, height: 80 }).unwrap();
        c.stroke_rect(10.0, 10.0, 80.0, 60.0, 4.0, Rgba::BLACK);
        assert_eq!(rgba_at(&c, 10, 40).3, 255);
        assert_eq!(rgba_at(&c, 50, 40).3, 0);
    }

    #[test]
    fn circle_uses_reduced_opacity() {
        let mut c = Canvas::new(small()).unwrap();
        c.fill_circle(20.0, 15.0, 10.0, Rgba(0, 0, 255, 255), 0.2);
        let (_, _, _, a) = rgba_at(&c, 20, 15);
        assert!((50..=52).contains(&a), "alpha {}", a);
    }

    #[test]
    fn text_layer_is_recorded_even_without_fonts() {
        let mut c = Canvas::new(small()).unwrap();
        let layer = TextLayer {
            text: "A & <B>".into(),
            x: 20.0,
            y: 20.0,
            align: TextAlign::Center,
            font: FontSpec::parse("bold 12px Arial").unwrap(),
            color: Rgba::BLACK,
        };
        c.fill_text(&layer, &usvg::Options::default()).unwrap();
        assert!(matches!(c.commands()[0], PaintCommand::Text(ref l) if l.text == "A & <B>"));
    }

    #[test]
    fn text_svg_escapes_content() {
        let layer = TextLayer {
            text: "R&D <team>".into(),
            x: 1.0,
            y: 2.0,
            align: TextAlign::Right,
            font: FontSpec::parse(r#"italic 10px "Courier New""#).unwrap(),
            color: Rgba(1, 2, 3, 255),
        };
        let svg = text_svg(&layer, 10, 10);
        assert!(svg.contains("R&amp;D &lt;team&gt;"));
        assert!(svg.contains("text-anchor=\"end\""));
        assert!(svg.contains("font-style=\"italic\""));
        assert!(svg.contains("'Courier New', sans-serif"));
        assert!(svg.contains("fill=\"rgb(1,2,3)\""));
    }

    #[test]
    fn escape_drops_non_xml_characters() {
        assert_eq!(escape_xml("Team\u{8}Spirit"), "TeamSpirit");
        assert_eq!(escape_xml("a\u{0}b\u{1f}c\u{FFFE}d\u{FFFF}"), "abcd");
        assert_eq!(escape_xml("tab\tline\nret\r"), "tab\tline\nret\r");
        assert_eq!(escape_xml("é ✓"), "é ✓");
    }

    #[test]
    fn control_characters_in_text_do_not_fail_the_layer() {
        let mut c = Canvas::new(small()).unwrap();
        let layer = TextLayer {
            text: "Team\u{8}Spirit\u{1b}".into(),
            x: 20.0,
            y: 20.0,
            align: TextAlign::Center,
            font: FontSpec::parse("bold 12px Arial").unwrap(),
            color: Rgba::BLACK,
        };
        c.fill_text(&layer, &usvg::Options::default()).unwrap();
        assert!(matches!(c.commands()[0], PaintCommand::Text(ref l) if l.text == "Team\u{8}Spirit\u{1b}"));
    }
}
