//! Color Harmony - Base Hue to Palette
//!
//! Palettes are built in HSL: hues come from the harmony rule, saturation and
//! lightness from a fixed band tuned so the first three slots (fill, inner
//! fill, text) stay distinguishable. Everything is range-clamped; nothing here
//! can fail except parsing a rule or preset name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LogoError;
use crate::rng::Xorshift64;

/// Wrap any finite hue into [0, 360). NaN and infinities map to 0.
pub fn normalize_hue(hue: f64) -> f64 {
    if !hue.is_finite() {
        return 0.0;
    }
    let h = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negatives
    if h >= 360.0 { 0.0 } else { h }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Color {
    pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue: normalize_hue(hue),
            saturation: unit(saturation),
            lightness: unit(lightness),
        }
    }

    pub const WHITE: Color = Color { hue: 0.0, saturation: 0.0, lightness: 1.0 };
    pub const BLACK: Color = Color { hue: 0.0, saturation: 0.0, lightness: 0.0 };

    /// Build from RGB channels in [0, 1].
    pub fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        let (r, g, b) = (unit(r), unit(g), unit(b));
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;
        let delta = max - min;
        if delta <= f64::EPSILON {
            return Self::hsl(0.0, 0.0, lightness);
        }
        let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());
        let hue = if max == r {
            60.0 * ((g - b) / delta)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        Self::hsl(hue, saturation, lightness)
    }

    /// RGB channels in [0, 1].
    pub fn to_rgb(&self) -> (f64, f64, f64) {
        let c = (1.0 - (2.0 * self.lightness - 1.0).abs()) * self.saturation;
        let h = self.hue / 60.0;
        let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = self.lightness - c / 2.0;
        (unit(r + m), unit(g + m), unit(b + m))
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        let (r, g, b) = self.to_rgb();
        [r, g, b].map(|c| (c * 255.0).round() as u8)
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Scale each RGB channel by `factor`, clamped. 0.3 gives the usual dark backdrop.
    pub fn adjust_brightness(&self, factor: f64) -> Self {
        let (r, g, b) = self.to_rgb();
        Self::from_rgb(r * factor, g * factor, b * factor)
    }

    /// Linear RGB mix; `t = 0` is `self`, `t = 1` is `other`.
    pub fn mix(&self, other: &Color, t: f64) -> Self {
        let t = unit(t);
        let (r1, g1, b1) = self.to_rgb();
        let (r2, g2, b2) = other.to_rgb();
        Self::from_rgb(r1 + (r2 - r1) * t, g1 + (g2 - g1) * t, b1 + (b2 - b1) * t)
    }

    /// WCAG 2.1 relative luminance.
    pub fn relative_luminance(&self) -> f64 {
        fn linear(c: f64) -> f64 {
            if c <= 0.039_28 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
        }
        let (r, g, b) = self.to_rgb();
        0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
    }

    /// WCAG contrast ratio in [1, 21], symmetric.
    pub fn contrast_ratio(&self, other: &Color) -> f64 {
        let (a, b) = (self.relative_luminance(), other.relative_luminance());
        let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
        (hi + 0.05) / (lo + 0.05)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonyRule {
    Triadic,
    Analogous,
    Monochromatic,
    Complementary,
    SplitComplementary,
    Tetradic,
}

impl HarmonyRule {
    pub const ALL: [HarmonyRule; 6] = [
        HarmonyRule::Triadic,
        HarmonyRule::Analogous,
        HarmonyRule::Monochromatic,
        HarmonyRule::Complementary,
        HarmonyRule::SplitComplementary,
        HarmonyRule::Tetradic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Triadic => "triadic",
            Self::Analogous => "analogous",
            Self::Monochromatic => "monochromatic",
            Self::Complementary => "complementary",
            Self::SplitComplementary => "split_complementary",
            Self::Tetradic => "tetradic",
        }
    }

    pub fn color_count(&self) -> usize {
        match self {
            Self::Complementary => 2,
            Self::Tetradic => 4,
            _ => 3,
        }
    }

    /// (hue offset, saturation, lightness) per palette slot.
    fn slots(&self) -> &'static [(f64, f64, f64)] {
        match self {
            Self::Triadic => &[(0.0, 0.70, 0.50), (120.0, 0.65, 0.32), (240.0, 0.75, 0.78)],
            Self::Analogous => &[(0.0, 0.70, 0.48), (30.0, 0.60, 0.28), (-30.0, 0.70, 0.80)],
            Self::Monochromatic => &[(0.0, 0.65, 0.50), (0.0, 0.60, 0.25), (0.0, 0.55, 0.85)],
            Self::Complementary => &[(0.0, 0.70, 0.45), (180.0, 0.70, 0.75)],
            Self::SplitComplementary => {
                &[(0.0, 0.70, 0.48), (150.0, 0.60, 0.28), (210.0, 0.70, 0.80)]
            }
            Self::Tetradic => &[
                (0.0, 0.70, 0.48),
                (90.0, 0.60, 0.28),
                (180.0, 0.70, 0.80),
                (270.0, 0.65, 0.60),
            ],
        }
    }
}

impl fmt::Display for HarmonyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HarmonyRule {
    type Err = LogoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|r| r.name() == key)
            .ok_or_else(|| LogoError::UnknownHarmony(s.to_string()))
    }
}

/// Where a palette came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum PaletteSource {
    Harmony(HarmonyRule),
    Preset(Preset),
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub source: PaletteSource,
    pub colors: Vec<Color>,
}

impl Palette {
    pub fn custom(colors: Vec<Color>) -> Self {
        Self { source: PaletteSource::Custom, colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn primary(&self) -> Color {
        self.slot(0)
    }

    pub fn secondary(&self) -> Color {
        self.slot(1)
    }

    pub fn accent(&self) -> Color {
        self.slot(2)
    }

    pub fn last(&self) -> Color {
        self.colors.last().copied().unwrap_or(Color::WHITE)
    }

    /// Slot `i`, or white when the palette is shorter.
    pub fn slot(&self, i: usize) -> Color {
        self.colors.get(i).copied().unwrap_or(Color::WHITE)
    }

    /// Slot `i` wrapping around the palette.
    pub fn cycle(&self, i: usize) -> Color {
        if self.colors.is_empty() {
            Color::WHITE
        } else {
            self.colors[i % self.colors.len()]
        }
    }

    pub fn background(&self) -> Color {
        self.primary().adjust_brightness(0.3)
    }

    /// Small saturation/lightness drift for "regenerate similar".
    pub fn varied(&self, seed: u64) -> Self {
        let mut rng = Xorshift64::new(seed);
        let colors = self
            .colors
            .iter()
            .map(|c| {
                Color::hsl(
                    c.hue,
                    c.saturation + rng.range(-0.1, 0.1),
                    c.lightness + rng.range(-0.1, 0.1),
                )
            })
            .collect();
        Self { source: self.source, colors }
    }
}

/// Deterministic palette for `(base_hue, rule)`.
pub fn generate_palette(base_hue: f64, rule: HarmonyRule) -> Palette {
    generate_palette_seeded(base_hue, rule, None)
}

/// Like `generate_palette`; a seed adds up to ±0.1 reproducible jitter to
/// saturation and lightness.
pub fn generate_palette_seeded(base_hue: f64, rule: HarmonyRule, seed: Option<u64>) -> Palette {
    let base = normalize_hue(base_hue);
    let mut rng = seed.map(Xorshift64::new);
    let colors = rule
        .slots()
        .iter()
        .map(|&(offset, s, l)| {
            let (ds, dl) = match rng.as_mut() {
                Some(rng) => (rng.range(-0.1, 0.1), rng.range(-0.1, 0.1)),
                None => (0.0, 0.0),
            };
            Color::hsl(base + offset, s + ds, l + dl)
        })
        .collect();
    Palette { source: PaletteSource::Harmony(rule), colors }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Sunset,
    Ocean,
    Forest,
    Neon,
    Pastel,
    Corporate,
    Retro,
    DarkElegance,
}

impl Preset {
    pub const ALL: [Preset; 8] = [
        Preset::Sunset,
        Preset::Ocean,
        Preset::Forest,
        Preset::Neon,
        Preset::Pastel,
        Preset::Corporate,
        Preset::Retro,
        Preset::DarkElegance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sunset => "sunset",
            Self::Ocean => "ocean",
            Self::Forest => "forest",
            Self::Neon => "neon",
            Self::Pastel => "pastel",
            Self::Corporate => "corporate",
            Self::Retro => "retro",
            Self::DarkElegance => "dark_elegance",
        }
    }

    fn rgb(&self) -> [(f64, f64, f64); 4] {
        match self {
            Self::Sunset => [(0.98, 0.4, 0.2), (0.95, 0.6, 0.1), (0.85, 0.2, 0.3), (0.4, 0.1, 0.3)],
            Self::Ocean => [(0.0, 0.3, 0.6), (0.1, 0.5, 0.8), (0.2, 0.7, 0.9), (0.0, 0.2, 0.4)],
            Self::Forest => [(0.1, 0.4, 0.1), (0.2, 0.6, 0.2), (0.4, 0.7, 0.3), (0.05, 0.3, 0.05)],
            Self::Neon => [(1.0, 0.0, 0.5), (0.0, 1.0, 0.8), (0.5, 0.0, 1.0), (1.0, 1.0, 0.0)],
            Self::Pastel => [(0.9, 0.7, 0.7), (0.7, 0.9, 0.7), (0.7, 0.7, 0.9), (0.9, 0.9, 0.7)],
            Self::Corporate => {
                [(0.1, 0.2, 0.5), (0.2, 0.4, 0.7), (0.8, 0.8, 0.85), (0.95, 0.95, 0.95)]
            }
            Self::Retro => [(0.9, 0.5, 0.2), (0.7, 0.3, 0.3), (0.3, 0.5, 0.5), (0.9, 0.8, 0.6)],
            Self::DarkElegance => {
                [(0.1, 0.1, 0.15), (0.8, 0.7, 0.4), (0.3, 0.25, 0.3), (0.6, 0.5, 0.3)]
            }
        }
    }

    pub fn palette(&self) -> Palette {
        Palette {
            source: PaletteSource::Preset(*self),
            colors: self.rgb().iter().map(|&(r, g, b)| Color::from_rgb(r, g, b)).collect(),
        }
    }
}

impl FromStr for Preset {
    type Err = LogoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|p| p.name() == key)
            .ok_or_else(|| LogoError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_counts_and_hue_range() {
        for rule in HarmonyRule::ALL {
            for step in 0..720 {
                let hue = step as f64 * 0.5;
                let palette = generate_palette(hue, rule);
                assert_eq!(palette.len(), rule.color_count(), "{rule} at {hue}");
                assert!((2..=4).contains(&palette.len()));
                for c in &palette.colors {
                    assert!((0.0..360.0).contains(&c.hue), "{rule} at {hue}: {}", c.hue);
                }
            }
        }
    }

    #[test]
    fn test_triadic_spacing() {
        let p = generate_palette(350.0, HarmonyRule::Triadic);
        let hues: Vec<f64> = p.colors.iter().map(|c| c.hue).collect();
        assert_eq!(hues, vec![350.0, 110.0, 230.0]);
    }

    #[test]
    fn test_analogous_within_30() {
        let p = generate_palette(10.0, HarmonyRule::Analogous);
        for c in &p.colors {
            let d = (c.hue - 10.0).rem_euclid(360.0);
            assert!(d <= 30.0 || d >= 330.0);
        }
    }

    #[test]
    fn test_monochromatic_single_hue() {
        let p = generate_palette(200.0, HarmonyRule::Monochromatic);
        assert!(p.colors.iter().all(|c| c.hue == 200.0));
        let mut ls: Vec<f64> = p.colors.iter().map(|c| c.lightness).collect();
        ls.dedup();
        assert_eq!(ls.len(), 3);
    }

    #[test]
    fn test_input_clamping() {
        assert_eq!(normalize_hue(-30.0), 330.0);
        assert_eq!(normalize_hue(720.0), 0.0);
        assert_eq!(normalize_hue(f64::NAN), 0.0);
        assert_eq!(normalize_hue(-1e-18), 0.0);
        let p = generate_palette(f64::INFINITY, HarmonyRule::Triadic);
        assert_eq!(p.primary().hue, 0.0);
    }

    #[test]
    fn test_seeded_jitter_deterministic() {
        let a = generate_palette_seeded(42.0, HarmonyRule::Tetradic, Some(9));
        let b = generate_palette_seeded(42.0, HarmonyRule::Tetradic, Some(9));
        let c = generate_palette_seeded(42.0, HarmonyRule::Tetradic, Some(10));
        assert_eq!(a, b);
        assert_ne!(a, c);
        let plain = generate_palette(42.0, HarmonyRule::Tetradic);
        assert_eq!(plain, generate_palette(42.0, HarmonyRule::Tetradic));
    }

    #[test]
    fn test_rgb_round_trip_primaries() {
        assert_eq!(Color::from_rgb(1.0, 0.0, 0.0).to_hex(), "#ff0000");
        assert_eq!(Color::from_rgb(0.0, 0.0, 1.0).hue, 240.0);
        assert_eq!(Color::WHITE.to_hex(), "#ffffff");
    }

    #[test]
    fn test_mix_endpoints_and_midpoint() {
        let red = Color::from_rgb(1.0, 0.0, 0.0);
        assert_eq!(red.mix(&Color::BLACK, 0.0).to_hex(), "#ff0000");
        assert_eq!(red.mix(&Color::BLACK, 1.0).to_hex(), "#000000");
        assert_eq!(red.mix(&Color::WHITE, 0.5).to_hex(), "#ff8080");
        assert_eq!(red.mix(&Color::BLACK, 7.0), red.mix(&Color::BLACK, 1.0));
    }

    #[test]
    fn test_contrast_ratio_extremes() {
        let r = Color::WHITE.contrast_ratio(&Color::BLACK);
        assert!((r - 21.0).abs() < 0.01);
        assert!((Color::WHITE.contrast_ratio(&Color::WHITE) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_names() {
        let rule: HarmonyRule = "split-complementary".parse().unwrap();
        assert_eq!(rule, HarmonyRule::SplitComplementary);
        assert!(matches!("plaid".parse::<HarmonyRule>(), Err(LogoError::UnknownHarmony(_))));
        assert_eq!("Dark_Elegance".parse::<Preset>().unwrap(), Preset::DarkElegance);
    }

    #[test]
    fn test_short_palette_falls_back_to_white() {
        let p = generate_palette(0.0, HarmonyRule::Complementary);
        assert_eq!(p.accent(), Color::WHITE);
        assert_eq!(p.cycle(3), p.secondary());
    }
}
