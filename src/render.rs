//! Render Pipeline - Single Entry Point
//!
//! `render` ALWAYS validates first. An invalid parameter set never reaches the
//! rasterizer, and nothing here touches the disk.

use std::borrow::Cow;

use image::RgbaImage;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{LogoError, Result};
use crate::hashing::image_digest;
use crate::runtime;
use crate::scene;
use crate::templates::{TemplateId, TemplateParams};
use crate::validation::{ValidationResult, Validator};

/// One rasterized logo plus the SVG master it was drawn from.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    template: TemplateId,
    svg: String,
    pixels: RgbaImage,
    validation: ValidationResult,
}

impl GeneratedImage {
    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Warnings raised while validating the parameters.
    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    pub fn digest(&self) -> String {
        image_digest(&self.pixels)
    }

    pub fn summary(&self) -> ImageSummary {
        ImageSummary {
            template: self.template,
            width: self.width(),
            height: self.height(),
            sha256: self.digest(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageSummary {
    pub template: TemplateId,
    pub width: u32,
    pub height: u32,
    pub sha256: String,
}

/// Validate `params` against every rule.
pub fn validate_params(params: &TemplateParams) -> ValidationResult {
    Validator::new().validate(params)
}

/// Render `params` with `template`. `template` wins over `params.template`.
pub fn render(template: TemplateId, params: &TemplateParams) -> Result<GeneratedImage> {
    let params = if params.template == template {
        Cow::Borrowed(params)
    } else {
        Cow::Owned(params.clone().with_template(template))
    };

    // MANDATORY: validation runs on every render.
    let validation = validate_params(&params);
    if !validation.valid {
        return Err(LogoError::InvalidParams(validation.error_summary()));
    }
    for w in validation.warnings() {
        warn!(template = %template, rule = %w.rule, actual = ?w.actual, "{}", w.message);
    }

    let rt = runtime::get()?;
    let svg = scene::compose(template, &params);
    let pixels = rt.rasterize(&svg, params.size, params.size)?;
    debug!(template = %template, size = params.size, "Rendered logo");

    Ok(GeneratedImage { template, svg, pixels, validation })
}

/// Parse `name` as a template id, then render. Unknown names are configuration errors.
pub fn render_named(name: &str, params: &TemplateParams) -> Result<GeneratedImage> {
    let template: TemplateId = name.parse()?;
    render(template, params)
}

/// The same design at several square sizes, in the order given. Stroke width
/// scales with the canvas.
pub fn render_size_variants(params: &TemplateParams, sizes: &[u32]) -> Result<Vec<GeneratedImage>> {
    sizes
        .iter()
        .map(|&size| {
            let mut variant = params.clone().with_size(size);
            variant.stroke_width = params.stroke_width * size as f64 / params.size.max(1) as f64;
            render(params.template, &variant)
        })
        .collect()
}
