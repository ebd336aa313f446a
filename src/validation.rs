//! Validation System - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Errors block the render; warnings are reported and logged.

use serde::{Deserialize, Serialize};

use crate::templates::TemplateParams;
use crate::{MAX_CANVAS_SIZE, MIN_CANVAS_SIZE, MIN_TEXT_CONTRAST};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationViolation> {
        self.violations.iter().filter(|v| v.severity == ViolationSeverity::Warning)
    }

    /// "rule: message" for every error, joined for display.
    pub fn error_summary(&self) -> String {
        self.violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Error)
            .map(|v| format!("{}: {}", v.rule, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, params: &TemplateParams) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

pub struct CanvasSizeRule;

impl ValidationRule for CanvasSizeRule {
    fn name(&self) -> &'static str { "canvas_size" }

    fn validate(&self, params: &TemplateParams) -> Vec<ValidationViolation> {
        if (MIN_CANVAS_SIZE..=MAX_CANVAS_SIZE).contains(&params.size) {
            return vec![];
        }
        vec![ValidationViolation {
            rule: self.name().to_string(),
            severity: ViolationSeverity::Error,
            message: "Canvas size out of range".to_string(),
            expected: Some(format!("{}..={}", MIN_CANVAS_SIZE, MAX_CANVAS_SIZE)),
            actual: Some(params.size.to_string()),
        }]
    }
}

pub struct StrokeWidthRule;

impl ValidationRule for StrokeWidthRule {
    fn name(&self) -> &'static str { "stroke_width" }

    fn validate(&self, params: &TemplateParams) -> Vec<ValidationViolation> {
        let max = params.size as f64 / 10.0;
        let w = params.stroke_width;
        if w.is_finite() && w > 0.0 && w <= max {
            return vec![];
        }
        vec![ValidationViolation {
            rule: self.name().to_string(),
            severity: ViolationSeverity::Error,
            message: "Stroke width must be positive and at most a tenth of the canvas".to_string(),
            expected: Some(format!("(0, {:.1}]", max)),
            actual: Some(format!("{}", w)),
        }]
    }
}

pub struct PaletteRule;

impl ValidationRule for PaletteRule {
    fn name(&self) -> &'static str { "palette" }

    fn validate(&self, params: &TemplateParams) -> Vec<ValidationViolation> {
        let n = params.palette.len();
        if (2..=4).contains(&n) {
            return vec![];
        }
        vec![ValidationViolation {
            rule: self.name().to_string(),
            severity: ViolationSeverity::Error,
            message: "Palette must hold 2 to 4 colors".to_string(),
            expected: Some("2..=4 colors".to_string()),
            actual: Some(format!("{} colors", n)),
        }]
    }
}

/// Heuristic legibility check between the brand text and what it sits on.
pub struct TextContrastRule;

impl ValidationRule for TextContrastRule {
    fn name(&self) -> &'static str { "text_contrast" }

    fn validate(&self, params: &TemplateParams) -> Vec<ValidationViolation> {
        if params.brand_text.trim().is_empty() {
            return vec![];
        }
        let (text, surface) = params.template.text_pair(&params.palette);
        let ratio = text.contrast_ratio(&surface);
        if ratio >= MIN_TEXT_CONTRAST {
            return vec![];
        }
        vec![ValidationViolation {
            rule: self.name().to_string(),
            severity: ViolationSeverity::Warning,
            message: "Brand text may be hard to read".to_string(),
            expected: Some(format!(">= {:.1}:1", MIN_TEXT_CONTRAST)),
            actual: Some(format!("{:.2}:1", ratio)),
        }]
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(CanvasSizeRule),
                Box::new(StrokeWidthRule),
                Box::new(PaletteRule),
                Box::new(TextContrastRule),
            ],
        }
    }

    pub fn validate(&self, params: &TemplateParams) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(params))
            .collect();
        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult { valid, violations }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{generate_palette, Color, HarmonyRule, Palette};
    use crate::templates::TemplateId;

    fn params() -> TemplateParams {
        let palette = generate_palette(10.0, HarmonyRule::Triadic);
        TemplateParams::new("Acme", palette, TemplateId::ShieldBadge)
    }

    #[test]
    fn test_defaults_pass() {
        let result = Validator::new().validate(&params());
        assert!(result.valid, "{:?}", result.violations);
    }

    #[test]
    fn test_size_bounds() {
        let v = Validator::new();
        assert!(!v.validate(&params().with_size(0)).valid);
        assert!(!v.validate(&params().with_size(MAX_CANVAS_SIZE + 1)).valid);
        let mut smallest = params().with_size(MIN_CANVAS_SIZE);
        smallest.stroke_width = 1.0;
        assert!(v.validate(&smallest).valid);
    }

    #[test]
    fn test_stroke_width_bounds() {
        let mut p = params();
        p.stroke_width = 0.0;
        let result = Validator::new().validate(&p);
        assert!(!result.valid);
        assert!(result.error_summary().contains("stroke_width"));
        p.stroke_width = f64::NAN;
        assert!(!Validator::new().validate(&p).valid);
    }

    #[test]
    fn test_palette_length() {
        let mut p = params();
        p.palette = Palette::custom(vec![Color::WHITE]);
        assert!(!Validator::new().validate(&p).valid);
    }

    #[test]
    fn test_low_contrast_only_warns() {
        let mut p = params();
        let grey = Color::hsl(0.0, 0.0, 0.5);
        p.palette = Palette::custom(vec![grey, grey, grey]);
        let result = Validator::new().validate(&p);
        assert!(result.valid);
        assert_eq!(result.warnings().count(), 1);
        assert!(!result.has_errors());
    }
}
