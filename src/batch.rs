//! Batch Generator - N Diverse Variations
//!
//! Templates are sampled without replacement: the set is shuffled and dealt
//! in order, reshuffling only when a batch asks for more entries than there
//! are templates. Every other choice comes from the same seeded stream, so a
//! seed fully determines a batch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::color::{generate_palette_seeded, HarmonyRule};
use crate::error::{LogoError, Result};
use crate::hashing::compute_manifest_hash;
use crate::render::{render, GeneratedImage, ImageSummary};
use crate::rng::Xorshift64;
use crate::templates::{
    Background, Effect, GradientDirection, Pattern, TemplateId, TemplateParams,
};
use crate::{DEFAULT_BATCH_SIZE, DEFAULT_CANVAS_SIZE};

const FONT_FAMILIES: [&str; 4] = ["Arial", "Helvetica", "Georgia", "Verdana"];

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub count: usize,
    pub seed: Option<u64>,
    pub size: u32,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_BATCH_SIZE,
            seed: None,
            size: DEFAULT_CANVAS_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub params: TemplateParams,
    pub image: GeneratedImage,
}

/// Ordered logos from one generation request. Position is display order.
#[derive(Debug, Clone)]
pub struct Batch {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Effective seed; passing it back reproduces the batch.
    pub seed: u64,
    entries: Vec<BatchEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryManifest<'a> {
    pub index: usize,
    pub params: &'a TemplateParams,
    pub image: ImageSummary,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BatchEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn images(&self) -> impl Iterator<Item = &GeneratedImage> {
        self.entries.iter().map(|e| &e.image)
    }

    pub fn templates(&self) -> Vec<TemplateId> {
        self.entries.iter().map(|e| e.params.template).collect()
    }

    pub fn entry_manifests(&self) -> Vec<EntryManifest<'_>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, e)| EntryManifest { index, params: &e.params, image: e.image.summary() })
            .collect()
    }

    /// Hash over every entry's params and pixels. Ignores id and timestamp.
    pub fn fingerprint(&self) -> Result<String> {
        Ok(compute_manifest_hash(&self.entry_manifests())?)
    }
}

/// Seed drawn from a fresh v4 UUID when the caller gives none.
fn entropy_seed() -> u64 {
    let v = Uuid::new_v4().as_u128();
    (v >> 64) as u64 ^ v as u64
}

/// Draw one full parameter set for `template`.
fn draw_params(
    rng: &mut Xorshift64,
    brand_text: &str,
    template: TemplateId,
    size: u32,
) -> TemplateParams {
    let base_hue = rng.range(0.0, 360.0);
    let rule = *rng.pick(&HarmonyRule::ALL);
    let palette = generate_palette_seeded(base_hue, rule, Some(rng.next_u64()));

    let background = match rng.below(4) {
        0 => Background::Solid,
        1 => Background::Radial,
        _ => Background::Linear(*rng.pick(&[
            GradientDirection::Vertical,
            GradientDirection::Horizontal,
            GradientDirection::Diagonal,
        ])),
    };
    let pattern = *rng.pick(&Pattern::ALL);

    let mut effects = Effect::ALL.to_vec();
    rng.shuffle(&mut effects);
    effects.truncate(rng.below(3));

    let mut params = TemplateParams::new(brand_text, palette, template)
        .with_size(size)
        .with_scaled_stroke();
    params.background = background;
    params.pattern = pattern;
    params.effects = effects;
    params.decorations = rng.chance();
    params.font_family = format!("{}, DejaVu Sans, sans-serif", rng.pick(&FONT_FAMILIES));
    params.detail_seed = rng.next_u64();
    params
}

fn render_all(params: Vec<TemplateParams>) -> Result<Vec<BatchEntry>> {
    // Fail fast: the first render error drops every entry rendered so far.
    params
        .into_iter()
        .enumerate()
        .map(|(i, params)| {
            let image = render(params.template, &params)?;
            debug!(index = i, template = %params.template, "Batch entry rendered");
            Ok(BatchEntry { params, image })
        })
        .collect()
}

/// One random parameter set without rendering. Returns the seed actually used.
pub fn random_params(brand_text: &str, seed: Option<u64>, size: u32) -> (u64, TemplateParams) {
    let seed = seed.unwrap_or_else(entropy_seed);
    let mut rng = Xorshift64::new(seed);
    let template = *rng.pick(&TemplateId::ALL);
    (seed, draw_params(&mut rng, brand_text, template, size))
}

/// `count` logos for `brand_text`, distinct templates while the set lasts.
pub fn generate_batch(brand_text: &str, count: usize, seed: Option<u64>) -> Result<Batch> {
    generate_batch_with(brand_text, &BatchOptions { count, seed, ..BatchOptions::default() })
}

pub fn generate_batch_with(brand_text: &str, options: &BatchOptions) -> Result<Batch> {
    if options.count == 0 {
        return Err(LogoError::InvalidBatchSize(0));
    }
    let seed = options.seed.unwrap_or_else(entropy_seed);
    let mut rng = Xorshift64::new(seed);
    info!(count = options.count, seed, size = options.size, "Generating batch");

    let mut deck: Vec<TemplateId> = Vec::new();
    let mut params = Vec::with_capacity(options.count);
    for _ in 0..options.count {
        if deck.is_empty() {
            deck = TemplateId::ALL.to_vec();
            rng.shuffle(&mut deck);
        }
        let template = deck.remove(0);
        params.push(draw_params(&mut rng, brand_text, template, options.size));
    }

    let entries = render_all(params)?;
    let batch = Batch {
        id: Uuid::new_v4().to_string(),
        created_at: Utc::now(),
        seed,
        entries,
    };
    info!(id = %batch.id, entries = batch.len(), "Batch complete");
    Ok(batch)
}

/// Variations on one design: same template and text, drifted palette,
/// fresh pattern and decorations.
pub fn regenerate_similar(base: &TemplateParams, count: usize, seed: Option<u64>) -> Result<Batch> {
    if count == 0 {
        return Err(LogoError::InvalidBatchSize(0));
    }
    let seed = seed.unwrap_or_else(entropy_seed);
    let mut rng = Xorshift64::new(seed);
    info!(count, seed, template = %base.template, "Regenerating similar");

    let params = (0..count)
        .map(|_| {
            let mut p = base.clone();
            p.palette = base.palette.varied(rng.next_u64());
            p.pattern = *rng.pick(&Pattern::ALL);
            p.decorations = rng.chance();
            p.detail_seed = rng.next_u64();
            p
        })
        .collect();

    Ok(Batch {
        id: Uuid::new_v4().to_string(),
        created_at: Utc::now(),
        seed,
        entries: render_all(params)?,
    })
}
