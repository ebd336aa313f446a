//! LogoForge Core - Procedural Logo Generator
//!
//! # Pipeline
//! 1. Color harmony: base hue + rule -> palette
//! 2. Template: palette + text -> SVG master
//! 3. Runtime: SVG master -> RGBA pixels
//! 4. Batch: N diverse renders, fail-fast, reproducible from one seed
//!
//! `composer` builds free-form logos from z-ordered layers over the same scene.

pub mod batch;
pub mod carousel;
pub mod color;
pub mod composer;
pub mod error;
pub mod export;
pub mod hashing;
pub mod logging;
pub mod render;
pub mod runtime;
pub mod scene;
pub mod templates;
pub mod validation;

mod rng;

pub use batch::{
    generate_batch, generate_batch_with, random_params, regenerate_similar, Batch, BatchEntry,
    BatchOptions,
};
pub use carousel::Carousel;
pub use color::{generate_palette, generate_palette_seeded, Color, HarmonyRule, Palette, Preset};
pub use composer::LogoComposer;
pub use error::{ErrorKind, LogoError};
pub use render::{render, render_named, render_size_variants, GeneratedImage};
pub use runtime::RuntimeConfig;
pub use templates::{stroke_for_size, Background, Effect, Pattern, TemplateId, TemplateParams};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_CANVAS_SIZE: u32 = 500;
pub const MIN_CANVAS_SIZE: u32 = 16;
pub const MAX_CANVAS_SIZE: u32 = 4096;
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;
pub const DEFAULT_FONT_FAMILY: &str = "Arial, Helvetica, DejaVu Sans, sans-serif";
/// WCAG ratio below which brand text draws a legibility warning.
pub const MIN_TEXT_CONTRAST: f64 = 2.0;
pub const DEFAULT_OUTPUT_FILE: &str = "random_logo.png";
pub const LOADED_OUTPUT_FILE: &str = "loaded_logo.png";
pub const COMPOSED_OUTPUT_FILE: &str = "composed_logo.png";
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Square sizes rendered by the size-variant mode.
pub const SIZE_VARIANTS: [u32; 5] = [64, 128, 256, 512, 1024];
