//! Render Runtime - Process-Wide Font Database
//!
//! Rasterizing text needs a font database. It is loaded exactly once by an
//! explicit `initialize` call before any render, then only read. Rendering
//! before that fails with `RuntimeNotReady`.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use image::{Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};
use tracing::{debug, info};

use crate::error::{LogoError, Result};

static RUNTIME: OnceLock<RenderRuntime> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Load fonts installed on the host.
    pub system_fonts: bool,
    /// Extra directory of font files. Must exist when set.
    pub font_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { system_fonts: true, font_dir: None }
    }
}

pub struct RenderRuntime {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl RenderRuntime {
    fn load(config: &RuntimeConfig) -> Result<Self> {
        let mut db = usvg::fontdb::Database::new();
        if config.system_fonts {
            db.load_system_fonts();
        }
        if let Some(dir) = &config.font_dir {
            if !dir.is_dir() {
                return Err(LogoError::FontDirMissing(dir.clone()));
            }
            db.load_fonts_dir(dir);
        }
        let rt = Self { fontdb: Arc::new(db) };
        // Without a single face every text element would rasterize to nothing.
        if rt.font_faces() == 0 {
            return Err(LogoError::NoFonts);
        }
        info!(faces = rt.font_faces(), "Render runtime ready");
        Ok(rt)
    }

    pub fn font_faces(&self) -> usize {
        self.fontdb.len()
    }

    /// Rasterize an SVG document to a `width` x `height` RGBA buffer.
    pub fn rasterize(&self, svg: &str, width: u32, height: u32) -> Result<RgbaImage> {
        let options = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| LogoError::Rasterize(e.to_string()))?;

        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| {
                LogoError::InvalidParams(format!("cannot allocate {width}x{height} canvas"))
            })?;
        let size = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        // tiny-skia stores premultiplied alpha; image expects straight alpha.
        let mut image = RgbaImage::new(width, height);
        for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(image)
    }
}

/// Load the runtime. The first successful call wins; later calls return it unchanged.
pub fn initialize(config: &RuntimeConfig) -> Result<&'static RenderRuntime> {
    if let Some(rt) = RUNTIME.get() {
        debug!("Render runtime already initialized");
        return Ok(rt);
    }
    let rt = RenderRuntime::load(config)?;
    // A concurrent initializer may have won the race; either instance is equivalent.
    let _ = RUNTIME.set(rt);
    RUNTIME.get().ok_or(LogoError::RuntimeNotReady)
}

pub fn is_ready() -> bool {
    RUNTIME.get().is_some()
}

pub fn get() -> Result<&'static RenderRuntime> {
    RUNTIME.get().ok_or(LogoError::RuntimeNotReady)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_dir_is_resource_error() {
        let config = RuntimeConfig {
            system_fonts: false,
            font_dir: Some(PathBuf::from("/definitely/not/a/font/dir")),
        };
        let err = RenderRuntime::load(&config).err().unwrap();
        assert_eq!(err.kind(), crate::ErrorKind::ResourceLoad);
    }

    fn bare() -> RenderRuntime {
        RenderRuntime { fontdb: Arc::new(usvg::fontdb::Database::new()) }
    }

    #[test]
    fn test_no_fonts_is_resource_error() {
        let config = RuntimeConfig { system_fonts: false, font_dir: None };
        let err = RenderRuntime::load(&config).err().unwrap();
        assert!(matches!(err, LogoError::NoFonts));
        assert_eq!(err.kind(), crate::ErrorKind::ResourceLoad);
    }

    #[test]
    fn test_loaded_runtime_has_faces() {
        let rt = initialize(&RuntimeConfig::default()).unwrap();
        assert!(rt.font_faces() > 0);
    }

    #[test]
    fn test_rasterize_solid_rect() {
        let rt = bare();
        let svg = concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10">"#,
            r##"<rect width="10" height="10" fill="#ff0000"/></svg>"##,
        );
        let img = rt.rasterize(svg, 10, 10).unwrap();
        assert_eq!(img.dimensions(), (10, 10));
        assert_eq!(img.get_pixel(5, 5), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_rasterize_rejects_garbage() {
        let rt = bare();
        assert!(matches!(rt.rasterize("not svg", 10, 10), Err(LogoError::Rasterize(_))));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let a = initialize(&RuntimeConfig::default()).unwrap() as *const RenderRuntime;
        let other = RuntimeConfig { system_fonts: false, font_dir: None };
        let b = initialize(&other).unwrap() as *const RenderRuntime;
        assert_eq!(a, b);
        assert!(is_ready());
    }
}
