//! Template System - Closed Set of Logo Layouts
//!
//! Each template is an independent drawing routine over a fresh scene. Geometry
//! is derived from the canvas size only, so every template scales cleanly.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::color::{Color, Palette};
use crate::error::LogoError;
use crate::scene::{regular_polygon, star, Paint, Scene};
use crate::{DEFAULT_CANVAS_SIZE, DEFAULT_FONT_FAMILY, DEFAULT_STROKE_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    MinimalCircle,
    ShieldBadge,
    GeometricAbstract,
    Monogram,
    TechHexagon,
    CircularBadge,
}

impl TemplateId {
    pub const ALL: [TemplateId; 6] = [
        TemplateId::MinimalCircle,
        TemplateId::ShieldBadge,
        TemplateId::GeometricAbstract,
        TemplateId::Monogram,
        TemplateId::TechHexagon,
        TemplateId::CircularBadge,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::MinimalCircle => "minimal_circle",
            Self::ShieldBadge => "shield_badge",
            Self::GeometricAbstract => "geometric_abstract",
            Self::Monogram => "monogram",
            Self::TechHexagon => "tech_hexagon",
            Self::CircularBadge => "circular_badge",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::MinimalCircle => "Two concentric discs with centered text",
            Self::ShieldBadge => "Outlined shield with centered text",
            Self::GeometricAbstract => "Three overlapping translucent discs, caption below",
            Self::Monogram => "Diamond with the first two letters",
            Self::TechHexagon => "Hexagon with inner ring and spokes",
            Self::CircularBadge => "Ringed badge with dots, star and caption",
        }
    }

    /// Paint this template's shapes and brand text onto `scene`.
    pub(crate) fn draw(&self, scene: &mut Scene, params: &TemplateParams) {
        let (palette, text, stroke) = (&params.palette, &params.brand_text, params.stroke_width);
        match self {
            Self::MinimalCircle => minimal_circle(scene, palette, text),
            Self::ShieldBadge => shield_badge(scene, palette, text, stroke),
            Self::GeometricAbstract => geometric_abstract(scene, palette, text),
            Self::Monogram => monogram(scene, palette, text, stroke),
            Self::TechHexagon => tech_hexagon(scene, palette, text, stroke),
            Self::CircularBadge => circular_badge(scene, palette, text, stroke),
        }
    }

    /// (text color, color the text sits on) for contrast checks.
    pub(crate) fn text_pair(&self, palette: &Palette) -> (Color, Color) {
        match self {
            Self::MinimalCircle => (palette.accent(), palette.secondary()),
            Self::GeometricAbstract => (palette.primary(), palette.background()),
            Self::CircularBadge => (palette.primary(), palette.secondary()),
            _ => (palette.accent(), palette.primary()),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateId {
    type Err = LogoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.name() == key)
            .ok_or_else(|| LogoError::UnknownTemplate(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    #[default]
    Vertical,
    Horizontal,
    Diagonal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    #[default]
    Solid,
    Linear(GradientDirection),
    Radial,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    #[default]
    None,
    Dots,
    Lines,
    Grid,
    Concentric,
    Hexagon,
    Wave,
}

impl Pattern {
    pub const ALL: [Pattern; 7] = [
        Pattern::Dots,
        Pattern::Lines,
        Pattern::Grid,
        Pattern::Concentric,
        Pattern::Hexagon,
        Pattern::Wave,
        Pattern::None,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Dots => "dots",
            Self::Lines => "lines",
            Self::Grid => "grid",
            Self::Concentric => "concentric",
            Self::Hexagon => "hexagon",
            Self::Wave => "wave",
        }
    }
}

impl FromStr for Pattern {
    type Err = LogoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == key)
            .ok_or_else(|| LogoError::UnknownPattern(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Glow,
    Particles,
    LensFlare,
}

impl Effect {
    pub const ALL: [Effect; 3] = [Effect::Glow, Effect::Particles, Effect::LensFlare];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEffect {
    #[default]
    None,
    Shadow,
    Outline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    pub text: String,
    #[serde(default)]
    pub effect: TextEffect,
}

/// Everything one render needs. Rendering is a pure function of this value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateParams {
    pub brand_text: String,
    pub palette: Palette,
    pub template: TemplateId,
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub pattern: Pattern,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub decorations: bool,
    #[serde(default)]
    pub subtitle: Option<Subtitle>,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Seeds particles, decorations and lens flare placement.
    #[serde(default)]
    pub detail_seed: u64,
}

/// Stroke width proportional to the canvas, never below one pixel.
/// Stays inside the stroke bound for every valid canvas size.
pub fn stroke_for_size(size: u32) -> f64 {
    (size as f64 * 0.006).max(1.0)
}

fn default_size() -> u32 { DEFAULT_CANVAS_SIZE }
fn default_stroke_width() -> f64 { DEFAULT_STROKE_WIDTH }
fn default_font_family() -> String { DEFAULT_FONT_FAMILY.to_string() }

impl TemplateParams {
    pub fn new(brand_text: impl Into<String>, palette: Palette, template: TemplateId) -> Self {
        Self {
            brand_text: brand_text.into(),
            palette,
            template,
            size: default_size(),
            stroke_width: default_stroke_width(),
            background: Background::default(),
            pattern: Pattern::default(),
            effects: vec![],
            decorations: false,
            subtitle: None,
            font_family: default_font_family(),
            detail_seed: 0,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Replace the stroke width with `stroke_for_size` of the current size.
    pub fn with_scaled_stroke(mut self) -> Self {
        self.stroke_width = stroke_for_size(self.size);
        self
    }

    pub fn with_template(mut self, template: TemplateId) -> Self {
        self.template = template;
        self
    }
}

// --- Drawing routines ---

fn minimal_circle(scene: &mut Scene, palette: &Palette, text: &str) {
    let c = scene.center();
    let radius = scene.min_side() * 0.3;

    scene.circle(c, radius, &Paint::fill(palette.primary()));
    scene.circle(c, radius * 0.7, &Paint::fill(palette.secondary()));
    scene.text(text, c, radius * 0.5, &Paint::fill(palette.accent()));
}

fn shield_badge(scene: &mut Scene, palette: &Palette, text: &str, stroke_width: f64) {
    let (cx, cy) = scene.center();
    let size = scene.min_side() * 0.35;

    let outline = [
        (0.0, -size),
        (size * 0.8, -size * 0.5),
        (size * 0.8, size * 0.3),
        (0.0, size),
        (-size * 0.8, size * 0.3),
        (-size * 0.8, -size * 0.5),
    ]
    .map(|(x, y)| (cx + x, cy + y));
    let paint = Paint::fill(palette.primary()).with_stroke(palette.secondary(), stroke_width);
    scene.polygon(&outline, &paint);
    scene.text(text, (cx, cy), size * 0.35, &Paint::fill(palette.accent()));
}

fn geometric_abstract(scene: &mut Scene, palette: &Palette, text: &str) {
    let (cx, cy) = scene.center();
    let size = scene.min_side() * 0.25;

    for i in 0..3 {
        let angle = i as f64 * 2.0 * PI / 3.0;
        let at = (cx + size * 0.3 * angle.cos(), cy + size * 0.3 * angle.sin());
        scene.circle(at, size * 0.5, &Paint::fill(palette.cycle(i)).with_opacity(0.7));
    }
    scene.text(text, (cx, cy + size * 0.9), size * 0.4, &Paint::fill(palette.primary()));
}

fn monogram(scene: &mut Scene, palette: &Palette, text: &str, stroke_width: f64) {
    let c = scene.center();
    let size = scene.min_side() * 0.35;

    let diamond = regular_polygon(c, size, 4, -PI / 2.0);
    scene.polygon(&diamond, &Paint::fill(palette.primary()));
    scene.polygon(&diamond, &Paint::stroke(palette.secondary(), stroke_width * 2.0 / 3.0));

    let initials: String = text.chars().take(2).collect();
    scene.text(&initials, c, size * 0.7, &Paint::fill(palette.accent()));
}

fn tech_hexagon(scene: &mut Scene, palette: &Palette, text: &str, stroke_width: f64) {
    let c = scene.center();
    let size = scene.min_side() * 0.32;
    let rotation = -PI / 6.0;

    let outer = regular_polygon(c, size, 6, rotation);
    let inner = regular_polygon(c, size * 0.7, 6, rotation);
    scene.polygon(&outer, &Paint::fill(palette.primary()));
    scene.polygon(&inner, &Paint::stroke(palette.secondary(), stroke_width * 2.0 / 3.0));
    for (a, b) in inner.iter().zip(outer.iter()) {
        scene.line(*a, *b, palette.secondary(), stroke_width / 3.0, 1.0);
    }
    scene.text(text, c, size * 0.35, &Paint::fill(palette.accent()));
}

fn circular_badge(scene: &mut Scene, palette: &Palette, text: &str, stroke_width: f64) {
    let (cx, cy) = scene.center();
    let radius = scene.min_side() * 0.35;

    scene.circle((cx, cy), radius, &Paint::fill(palette.primary()));
    let ring = Paint::stroke(palette.secondary(), stroke_width * 2.0 / 3.0);
    scene.circle((cx, cy), radius * 0.85, &ring);
    scene.circle((cx, cy), radius * 0.75, &Paint::fill(palette.secondary()));

    let dot = Paint::fill(palette.accent());
    for i in 0..12 {
        let a = (30.0 * i as f64).to_radians();
        let at = (cx + radius * 0.8 * a.cos(), cy + radius * 0.8 * a.sin());
        scene.circle(at, (radius * 0.017).max(1.5), &dot);
    }

    let points = star((cx, cy), 5, radius * 0.3, radius * 0.15);
    scene.polygon(&points, &Paint::fill(palette.accent()));
    scene.text(text, (cx, cy + radius * 0.55), radius * 0.2, &Paint::fill(palette.primary()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{generate_palette, HarmonyRule};

    fn draw(template: TemplateId, text: &str) -> String {
        let palette = generate_palette(200.0, HarmonyRule::Triadic);
        let params = TemplateParams::new(text, palette, template)
            .with_size(200);
        let mut scene = Scene::new(200, 200, &params.font_family);
        template.draw(&mut scene, &params);
        scene.finish()
    }

    #[test]
    fn test_parse_known_and_unknown() {
        for t in TemplateId::ALL {
            assert_eq!(t.name().parse::<TemplateId>().unwrap(), t);
        }
        assert_eq!("Tech-Hexagon".parse::<TemplateId>().unwrap(), TemplateId::TechHexagon);
        let err = "spiral_galaxy".parse::<TemplateId>().unwrap_err();
        assert!(matches!(err, LogoError::UnknownTemplate(ref s) if s == "spiral_galaxy"));
    }

    #[test]
    fn test_every_template_draws_shapes() {
        for t in TemplateId::ALL {
            let svg = draw(t, "ACME");
            assert!(svg.contains("<circle") || svg.contains("<polygon"), "{t} drew nothing");
            assert!(svg.contains(">ACME<") || t == TemplateId::Monogram, "{t} lost its text");
        }
    }

    #[test]
    fn test_monogram_uses_first_two_chars() {
        let svg = draw(TemplateId::Monogram, "Ärger");
        assert!(svg.contains(">Är<"));
    }

    #[test]
    fn test_geometric_abstract_skips_empty_text() {
        let svg = draw(TemplateId::GeometricAbstract, "");
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn test_params_serde_defaults() {
        let json = serde_json::json!({
            "brand_text": "Acme",
            "palette": { "source": { "kind": "preset", "name": "ocean" }, "colors": [] },
            "template": "shield_badge"
        });
        let params: TemplateParams = serde_json::from_value(json).unwrap();
        assert_eq!(params.size, DEFAULT_CANVAS_SIZE);
        assert_eq!(params.pattern, Pattern::None);
        assert_eq!(params.background, Background::Solid);
    }
}
