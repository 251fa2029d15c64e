//! # Compositor
//!
//! Rasterizes substituted SVG markup and draws overlays on top of it.
//!
//! ## Pipeline
//!
//! ```text
//! markup ──usvg/resvg──▶ base RGBA ──overlay × N──▶ PNG
//!                           ▲
//!           logo slots ─────┤ (resolved concurrently, stacked in slot order)
//!           text overlays ──┘ (legacy templates only)
//! ```
//!
//! Overlays are blended with the "over" operator in list order, so later
//! entries cover earlier ones. Parts that fall outside the canvas are
//! clipped.
//!
//! ## Fonts
//!
//! `<text>` faces are resolved against the font database with generic
//! fallbacks appended to every query. When nothing matches, the first loaded
//! face is used, so text renders on any host with at least one font.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage, imageops};
use resvg::tiny_skia;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{PlacardError, Result};
use crate::legacy::TextOverlay;
use crate::logo::LogoResolver;
use crate::request::Variables;
use crate::substitute::escape_xml;
use crate::template::LogoSlot;

/// Largest canvas side we agree to allocate.
const MAX_DIM: u32 = 16_384;

/// A raster positioned on the base canvas.
#[derive(Clone)]
pub struct Overlay {
    pub raster: RgbaImage,
    pub top: i64,
    pub left: i64,
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("dimensions", &self.raster.dimensions())
            .field("top", &self.top)
            .field("left", &self.left)
            .finish()
    }
}

/// Final PNG output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// SVG rasterizer and overlay compositor.
///
/// Cheap to clone; the font database is shared.
#[derive(Clone)]
pub struct Compositor {
    fontdb: Arc<usvg::fontdb::Database>,
    resources_dir: Option<PathBuf>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("fonts", &self.fontdb.len())
            .field("resources_dir", &self.resources_dir)
            .finish()
    }
}

impl Compositor {
    pub fn new(fontdb: Arc<usvg::fontdb::Database>, resources_dir: Option<PathBuf>) -> Self {
        Self {
            fontdb,
            resources_dir,
        }
    }

    /// Compositor for templates under `root`: system fonts plus `root/fonts`,
    /// with relative `href`s resolved against `root`.
    pub fn for_template_root(root: &Path) -> Self {
        Self::new(load_fonts(root), Some(root.to_path_buf()))
    }

    /// Render markup at its intrinsic size.
    pub fn rasterize(&self, markup: &str) -> Result<RgbaImage> {
        let options = usvg::Options {
            resources_dir: self.resources_dir.clone(),
            fontdb: self.fontdb.clone(),
            font_resolver: font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(markup, &options)
            .map_err(|e| PlacardError::Rasterization(format!("Failed to parse markup: {}", e)))?;

        let size = tree.size().to_int_size();
        let (width, height) = (size.width(), size.height());
        if width > MAX_DIM || height > MAX_DIM {
            return Err(PlacardError::Rasterization(format!(
                "canvas too large: {}x{} (max {}x{})",
                width, height, MAX_DIM, MAX_DIM
            )));
        }

        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            PlacardError::Rasterization(format!("failed to allocate {}x{} canvas", width, height))
        })?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap_to_rgba(&pixmap))
    }

    /// Rasterize a synthesized text fragment into a positioned overlay.
    pub fn text_overlay(&self, overlay: &TextOverlay) -> Result<Overlay> {
        let raster = self.rasterize(&text_fragment(overlay))?;
        Ok(Overlay {
            raster,
            top: overlay.top,
            left: overlay.left,
        })
    }

    /// Rasterize `markup`, draw `overlays` in order and encode as PNG.
    pub fn render(&self, markup: &str, overlays: &[Overlay]) -> Result<RenderedImage> {
        let mut base = self.rasterize(markup)?;
        composite(&mut base, overlays);
        let (width, height) = base.dimensions();
        let png = encode_png(base)?;
        Ok(RenderedImage { png, width, height })
    }
}

/// Resolve every slot that has a supplied source.
///
/// Slots are fetched concurrently; the result keeps slot order. Slots without
/// a value are skipped. The first failure aborts the remaining fetches.
pub async fn logo_overlays(
    slots: &[LogoSlot],
    variables: &Variables,
    resolver: &LogoResolver,
) -> Result<Vec<Overlay>> {
    let mut handles = Vec::with_capacity(slots.len());
    for slot in slots {
        let Some(source) = variables.logo_source(&slot.name) else {
            tracing::debug!(slot = %slot.name, "no logo supplied, skipping slot");
            continue;
        };

        let resolver = resolver.clone();
        let source = source.to_string();
        let slot = slot.clone();
        handles.push(tokio::spawn(async move {
            let raster = resolver.resolve(&source, slot.width, slot.height).await?;
            Ok::<_, PlacardError>(Overlay {
                raster,
                top: slot.top,
                left: slot.left,
            })
        }));
    }

    let mut overlays = Vec::with_capacity(handles.len());
    let mut pending = handles.into_iter();
    while let Some(handle) = pending.next() {
        let result = handle
            .await
            .map_err(|e| PlacardError::Task(e.to_string()))
            .and_then(|overlay| overlay);
        match result {
            Ok(overlay) => overlays.push(overlay),
            Err(e) => {
                for rest in pending.by_ref() {
                    rest.abort();
                }
                return Err(e);
            }
        }
    }
    Ok(overlays)
}

/// Draw overlays onto `base` in list order.
pub fn composite(base: &mut RgbaImage, overlays: &[Overlay]) {
    for overlay in overlays {
        imageops::overlay(base, &overlay.raster, overlay.left, overlay.top);
    }
}

pub fn encode_png(image: RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| PlacardError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Standalone SVG document holding a single line of text.
pub fn text_fragment(overlay: &TextOverlay) -> String {
    let style = &overlay.style;
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}"><text x="0" y="{baseline}" font-family="{family}" font-size="{size}" fill="{fill}">{text}</text></svg>"#,
        w = style.width,
        h = style.height,
        baseline = style.font_size,
        family = style.font_family,
        size = style.font_size,
        fill = style.fill,
        text = escape_xml(&overlay.text),
    )
}

/// Convert resvg's premultiplied pixmap into straight-alpha RGBA.
fn pixmap_to_rgba(pixmap: &tiny_skia::Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

/// Face selection for `<text>`: the requested families, then the generic
/// ones, then any loaded face.
fn font_resolver() -> usvg::FontResolver<'static> {
    use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => Family::Serif,
                    usvg::FontFamily::SansSerif => Family::SansSerif,
                    usvg::FontFamily::Cursive => Family::Cursive,
                    usvg::FontFamily::Fantasy => Family::Fantasy,
                    usvg::FontFamily::Monospace => Family::Monospace,
                    usvg::FontFamily::Named(name) => Family::Name(name),
                })
                .collect();
            families.extend([Family::SansSerif, Family::Serif, Family::Monospace]);

            let stretch = match font.stretch() {
                usvg::FontStretch::UltraCondensed => Stretch::UltraCondensed,
                usvg::FontStretch::ExtraCondensed => Stretch::ExtraCondensed,
                usvg::FontStretch::Condensed => Stretch::Condensed,
                usvg::FontStretch::SemiCondensed => Stretch::SemiCondensed,
                usvg::FontStretch::Normal => Stretch::Normal,
                usvg::FontStretch::SemiExpanded => Stretch::SemiExpanded,
                usvg::FontStretch::Expanded => Stretch::Expanded,
                usvg::FontStretch::ExtraExpanded => Stretch::ExtraExpanded,
                usvg::FontStretch::UltraExpanded => Stretch::UltraExpanded,
            };
            let style = match font.style() {
                usvg::FontStyle::Normal => Style::Normal,
                usvg::FontStyle::Italic => Style::Italic,
                usvg::FontStyle::Oblique => Style::Oblique,
            };

            let query = Query {
                families: &families,
                weight: Weight(font.weight()),
                stretch,
                style,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|face| face.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

/// Font database: system fonts plus any font files in `root/fonts`.
pub fn load_fonts(root: &Path) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    load_fonts_from_dir(&mut db, &root.join("fonts"));
    tracing::debug!(faces = db.len(), "font database loaded");
    Arc::new(db)
}

/// Load every `.ttf`/`.otf`/`.ttc` file in `dir`. A missing directory is not an error.
pub fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if !matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc") {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}
