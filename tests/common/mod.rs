//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use placard::{
    Renderer,
    compose::{self, Compositor},
    error::Result,
    legacy::LegacyPolicy,
    logo::{LogoFetcher, LogoResolver},
    template::TemplateStore,
};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// 300x200 canvas: the background color is a placeholder so substitution is
/// observable in the rendered pixels.
pub const MATCH_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="200">
  <rect width="300" height="200" fill="{{COR}}"/>
  <text x="150" y="180" font-size="24" text-anchor="middle">{{TITULO}}</text>
</svg>"##;

pub const MATCH_JSON: &str = r##"{
  "defaultVariables": { "TITULO": "GAME", "COR": "#ff0000" },
  "logos": [
    { "name": "logo1", "width": 100, "height": 100, "top": 10, "left": 10 },
    { "name": "logo2", "width": 50, "height": 50, "top": 60, "left": 60 }
  ]
}"##;

/// Legacy template: no JSON config, background driven by `{{COR1}}`.
pub const LEGACY_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="1080" height="1080">
  <rect width="1080" height="1080" fill="{{COR1}}"/>
  <text x="540" y="200" font-size="64">{{TITULO}}</text>
  <text x="540" y="300" font-size="32">{{DATA}} {{HORA}}</text>
</svg>"##;

pub const BLUE: [u8; 4] = [0, 0, 255, 255];
pub const GREEN: [u8; 4] = [0, 255, 0, 255];
pub const RED: [u8; 4] = [255, 0, 0, 255];

/// Serves the same bytes for every URL.
pub struct StaticFetcher(pub Vec<u8>);

#[async_trait]
impl LogoFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
        Ok(self.0.clone())
    }
}

pub fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

pub fn data_uri(width: u32, height: u32, color: [u8; 4]) -> String {
    format!(
        "data:image/png;base64,{}",
        STANDARD.encode(png_bytes(width, height, color))
    )
}

/// Template root containing `match.svg` (+config) and `legacy.svg` (no config).
pub fn template_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "match.svg", MATCH_SVG);
    write(dir.path(), "match.json", MATCH_JSON);
    write(dir.path(), "legacy.svg", LEGACY_SVG);
    dir
}

pub fn write(root: &Path, name: &str, content: &str) {
    fs::write(root.join(name), content).unwrap();
}

/// Renderer with no system fonts and a fetcher that always serves `remote_logo`.
pub fn renderer(root: &Path, remote_logo: Vec<u8>, legacy: LegacyPolicy) -> Renderer {
    Renderer::new(
        TemplateStore::new(root),
        LogoResolver::new(Arc::new(StaticFetcher(remote_logo))),
        Compositor::new(Arc::new(usvg::fontdb::Database::new()), None),
        legacy,
    )
}

/// Renderer like [`renderer`] but with the bundled test font loaded, so
/// `<text>` produces glyphs.
pub fn font_renderer(root: &Path, legacy: LegacyPolicy) -> Renderer {
    let mut db = usvg::fontdb::Database::new();
    compose::load_fonts_from_dir(&mut db, &Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fonts"));
    assert!(db.len() > 0, "bundled test font missing");
    Renderer::new(
        TemplateStore::new(root),
        LogoResolver::new(Arc::new(StaticFetcher(Vec::new()))),
        Compositor::new(Arc::new(db), None),
        legacy,
    )
}

/// Renderer that performs real HTTP fetches.
pub fn http_renderer(root: &Path, legacy: LegacyPolicy) -> Renderer {
    Renderer::new(
        TemplateStore::new(root),
        LogoResolver::http(Duration::from_secs(2)).unwrap(),
        Compositor::new(Arc::new(usvg::fontdb::Database::new()), None),
        legacy,
    )
}

pub fn decode(png: &[u8]) -> RgbaImage {
    image::load_from_memory(png).unwrap().to_rgba8()
}

/// Pixels that differ between `a` and `b` inside the given rectangle.
pub fn differing_pixels(a: &RgbaImage, b: &RgbaImage, x: u32, y: u32, w: u32, h: u32) -> usize {
    let mut count = 0;
    for py in y..y + h {
        for px in x..x + w {
            if a.get_pixel(px, py) != b.get_pixel(px, py) {
                count += 1;
            }
        }
    }
    count
}
