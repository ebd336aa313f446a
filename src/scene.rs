//! Scene Builder - The SVG Master
//!
//! Every logo is composed as an SVG document first and rasterized afterwards.
//! Layers are painted in a fixed order: background, pattern, glow, template,
//! decorations, subtitle, post effects. `Scene` and `Paint` are public so
//! callers can paint their own layers through `LogoComposer`.

use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;

use crate::color::{Color, Palette};
use crate::rng::Xorshift64;
use crate::templates::{
    Background, Effect, GradientDirection, Pattern, Subtitle, TemplateId, TemplateParams,
    TextEffect,
};

#[derive(Debug, Clone)]
enum Fill {
    None,
    Solid(Color),
    Url(&'static str),
}

#[derive(Debug, Clone)]
pub struct Paint {
    fill: Fill,
    stroke: Option<(Color, f64)>,
    opacity: f64,
}

impl Paint {
    pub fn fill(color: Color) -> Self {
        Self { fill: Fill::Solid(color), stroke: None, opacity: 1.0 }
    }

    pub fn stroke(color: Color, width: f64) -> Self {
        Self { fill: Fill::None, stroke: Some((color, width)), opacity: 1.0 }
    }

    pub fn url(id: &'static str) -> Self {
        Self { fill: Fill::Url(id), stroke: None, opacity: 1.0 }
    }

    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = Some((color, width));
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    fn attrs(&self) -> String {
        let mut out = match &self.fill {
            Fill::None => String::from(r#"fill="none""#),
            Fill::Solid(c) => format!(r#"fill="{}""#, c.to_hex()),
            Fill::Url(id) => format!(r#"fill="url(#{id})""#),
        };
        if let Some((c, w)) = &self.stroke {
            let _ = write!(
                out,
                r#" stroke="{}" stroke-width="{:.2}" stroke-linejoin="round""#,
                c.to_hex(),
                w
            );
        }
        if self.opacity < 1.0 {
            let _ = write!(out, r#" opacity="{:.3}""#, self.opacity);
        }
        out
    }
}

/// Escape text for use inside an SVG text node or attribute.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{:.2},{:.2}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Regular polygon vertices around `center`, first vertex at `rotation` radians.
pub fn regular_polygon(
    center: (f64, f64),
    radius: f64,
    sides: usize,
    rotation: f64,
) -> Vec<(f64, f64)> {
    (0..sides)
        .map(|i| {
            let a = TAU * i as f64 / sides as f64 + rotation;
            (center.0 + radius * a.cos(), center.1 + radius * a.sin())
        })
        .collect()
}

/// Star vertices alternating outer/inner radius, first point straight up.
pub fn star(center: (f64, f64), points: usize, outer: f64, inner: f64) -> Vec<(f64, f64)> {
    (0..points * 2)
        .map(|i| {
            let a = PI * i as f64 / points as f64 - PI / 2.0;
            let r = if i % 2 == 0 { outer } else { inner };
            (center.0 + r * a.cos(), center.1 + r * a.sin())
        })
        .collect()
}

pub struct Scene {
    width: f64,
    height: f64,
    font_family: String,
    defs: String,
    body: String,
}

impl Scene {
    pub fn new(width: u32, height: u32, font_family: &str) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            font_family: escape_xml(font_family),
            defs: String::new(),
            body: String::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        let _ = writeln!(
            self.body,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" {}/>"#,
            x, y, w, h, paint.attrs()
        );
    }

    pub fn circle(&mut self, center: (f64, f64), r: f64, paint: &Paint) {
        let _ = writeln!(
            self.body,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" {}/>"#,
            center.0, center.1, r, paint.attrs()
        );
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], paint: &Paint) {
        let pts = points_attr(points);
        let _ = writeln!(self.body, r#"<polygon points="{}" {}/>"#, pts, paint.attrs());
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], color: Color, width: f64, opacity: f64) {
        let paint = Paint::stroke(color, width).with_opacity(opacity);
        let pts = points_attr(points);
        let _ = writeln!(self.body, r#"<polyline points="{}" {}/>"#, pts, paint.attrs());
    }

    pub fn line(&mut self, a: (f64, f64), b: (f64, f64), color: Color, width: f64, opacity: f64) {
        self.polyline(&[a, b], color, width, opacity);
    }

    /// Centered bold text. Empty text paints nothing.
    pub fn text(&mut self, text: &str, center: (f64, f64), size: f64, paint: &Paint) {
        if text.is_empty() {
            return;
        }
        let _ = writeln!(
            self.body,
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" font-weight="bold" text-anchor="middle" dominant-baseline="central" {}>{}</text>"#,
            center.0,
            center.1,
            self.font_family,
            size,
            paint.attrs(),
            escape_xml(text)
        );
    }

    pub fn linear_gradient(
        &mut self,
        id: &'static str,
        from: Color,
        to: Color,
        direction: GradientDirection,
    ) {
        let (x2, y2) = match direction {
            GradientDirection::Vertical => (0, 1),
            GradientDirection::Horizontal => (1, 0),
            GradientDirection::Diagonal => (1, 1),
        };
        let _ = writeln!(
            self.defs,
            r#"<linearGradient id="{id}" x1="0" y1="0" x2="{x2}" y2="{y2}"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient>"#,
            from.to_hex(),
            to.to_hex()
        );
    }

    pub fn radial_gradient(&mut self, id: &'static str, inner: (Color, f64), outer: (Color, f64)) {
        let _ = writeln!(
            self.defs,
            r#"<radialGradient id="{id}" cx="0.5" cy="0.5" r="0.5"><stop offset="0" stop-color="{}" stop-opacity="{:.3}"/><stop offset="1" stop-color="{}" stop-opacity="{:.3}"/></radialGradient>"#,
            inner.0.to_hex(),
            inner.1,
            outer.0.to_hex(),
            outer.1
        );
    }

    pub fn finish(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        svg.push('\n');
        if !self.defs.is_empty() {
            svg.push_str("<defs>\n");
            svg.push_str(&self.defs);
            svg.push_str("</defs>\n");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }
}

// --- Layers ---

pub(crate) fn paint_background(scene: &mut Scene, params: &TemplateParams) {
    let palette = &params.palette;
    let (w, h) = (scene.width(), scene.height());
    scene.rect(0.0, 0.0, w, h, &Paint::fill(palette.background()));

    match params.background {
        Background::Solid => {}
        Background::Linear(direction) if palette.len() >= 2 => {
            scene.linear_gradient("bg", palette.primary(), palette.last(), direction);
            scene.rect(0.0, 0.0, w, h, &Paint::url("bg"));
        }
        Background::Radial if palette.len() >= 2 => {
            scene.radial_gradient("bg", (palette.primary(), 1.0), (palette.last(), 1.0));
            let r = w.max(h) * 0.8;
            let (cx, cy) = scene.center();
            scene.rect(cx - r, cy - r, r * 2.0, r * 2.0, &Paint::url("bg"));
        }
        _ => {}
    }
}

pub(crate) fn paint_pattern(scene: &mut Scene, pattern: Pattern, palette: &Palette) {
    let color = palette.primary().adjust_brightness(0.5);
    let alpha = 0.15;
    let (w, h) = (scene.width(), scene.height());

    match pattern {
        Pattern::None => {}
        Pattern::Dots => {
            let spacing = 25.0;
            let mut y = 0.0;
            while y <= h + spacing {
                let mut x = 0.0;
                while x <= w + spacing {
                    scene.circle((x, y), 2.0, &Paint::fill(color).with_opacity(alpha));
                    x += spacing;
                }
                y += spacing;
            }
        }
        Pattern::Lines => {
            let spacing = 20.0;
            let length = w.max(h) * 2.0;
            let angle = PI / 4.0;
            let mut offset = -length;
            while offset < length {
                let end = (offset + length * angle.cos(), length * angle.sin());
                scene.line((offset, 0.0), end, color, 1.0, alpha);
                offset += spacing;
            }
        }
        Pattern::Grid => {
            let spacing = 30.0;
            let mut x = 0.0;
            while x <= w + spacing {
                scene.line((x, 0.0), (x, h), color, 0.5, alpha);
                x += spacing;
            }
            let mut y = 0.0;
            while y <= h + spacing {
                scene.line((0.0, y), (w, y), color, 0.5, alpha);
                y += spacing;
            }
        }
        Pattern::Concentric => {
            let max_r = w.max(h) * 0.6;
            let count = 10;
            for i in 1..=count {
                let r = max_r * i as f64 / count as f64;
                scene.circle(scene.center(), r, &Paint::stroke(color, 1.0).with_opacity(alpha));
            }
        }
        Pattern::Hexagon => {
            let size = 25.0;
            let hex_h = size * 3f64.sqrt();
            let rows = (h / hex_h) as i32 + 2;
            let cols = (w / (size * 1.5)) as i32 + 2;
            for row in -1..rows {
                for col in -1..cols {
                    let cx = col as f64 * size * 1.5;
                    let cy = row as f64 * hex_h + (col.rem_euclid(2)) as f64 * hex_h / 2.0;
                    let pts = regular_polygon((cx, cy), size, 6, 0.0);
                    scene.polygon(&pts, &Paint::stroke(color, 0.5).with_opacity(alpha));
                }
            }
        }
        Pattern::Wave => {
            let (amplitude, frequency) = (10.0, 0.05);
            let mut y_off = 0.0;
            while y_off <= h + 40.0 {
                let mut pts = Vec::new();
                let mut x = 0.0;
                while x <= w + 5.0 {
                    pts.push((x, y_off + amplitude * (frequency * x * TAU).sin()));
                    x += 5.0;
                }
                scene.polyline(&pts, color, 1.0, alpha);
                y_off += 20.0;
            }
        }
    }
}

pub(crate) fn paint_glow(scene: &mut Scene, palette: &Palette) {
    let r = scene.min_side() * 0.45;
    scene.radial_gradient("glow", (palette.primary(), 0.55), (palette.primary(), 0.0));
    scene.circle(scene.center(), r, &Paint::url("glow"));
}

/// Small shapes scattered on a ring around the logo.
pub(crate) fn paint_decorations(scene: &mut Scene, palette: &Palette, rng: &mut Xorshift64) {
    let (cx, cy) = scene.center();
    let m = scene.min_side();
    let count = 3 + rng.below(6);
    for _ in 0..count {
        let angle = rng.range(0.0, TAU);
        let dist = rng.range(m * 0.35, m * 0.45);
        let at = (cx + dist * angle.cos(), cy + dist * angle.sin());
        let color = palette.cycle(rng.below(palette.len().max(1)));
        let paint = Paint::fill(color).with_opacity(rng.range(0.3, 0.7));
        let size = rng.range(3.0, 10.0);
        match rng.below(4) {
            0 => scene.circle(at, size, &paint),
            1 => {
                let pts = regular_polygon(at, size * 2f64.sqrt(), 4, rng.range(0.0, PI));
                scene.polygon(&pts, &paint);
            }
            2 => {
                let pts = regular_polygon(at, size, 4, 0.0);
                scene.polygon(&pts, &paint);
            }
            _ => {
                let pts = regular_polygon(at, size, 3, -PI / 2.0);
                scene.polygon(&pts, &paint);
            }
        }
    }
}

pub(crate) fn paint_subtitle(scene: &mut Scene, subtitle: &Subtitle, palette: &Palette) {
    let at = (scene.width() / 2.0, scene.height() * 0.82);
    let size = (scene.min_side() * 0.036).max(8.0);
    let color = palette.last();
    match subtitle.effect {
        TextEffect::None => {}
        TextEffect::Shadow => {
            let offset = (at.0 + 2.0, at.1 + 2.0);
            scene.text(&subtitle.text, offset, size, &Paint::fill(Color::BLACK).with_opacity(0.5));
        }
        TextEffect::Outline => {
            let paint = Paint::fill(Color::BLACK).with_stroke(Color::BLACK, 2.0);
            scene.text(&subtitle.text, at, size, &paint);
        }
    }
    scene.text(&subtitle.text, at, size, &Paint::fill(color));
}

pub(crate) fn paint_particles(scene: &mut Scene, palette: &Palette, rng: &mut Xorshift64) {
    let (cx, cy) = scene.center();
    let max_r = scene.min_side() * 0.45;
    for _ in 0..40 {
        let angle = rng.range(0.0, TAU);
        let dist = rng.range(10.0, max_r);
        let at = (cx + dist * angle.cos(), cy + dist * angle.sin());
        let color = palette.cycle(rng.below(palette.len().max(1)));
        let paint = Paint::fill(color).with_opacity(rng.range(0.3, 1.0));
        scene.circle(at, rng.range(1.0, 4.0), &paint);
    }
}

pub(crate) fn paint_lens_flare(scene: &mut Scene, rng: &mut Xorshift64) {
    let (cx, cy) = scene.center();
    let at = (
        cx + rng.range(-0.2, 0.2) * scene.width(),
        cy + rng.range(-0.2, 0.2) * scene.height(),
    );
    let flare = Color::from_rgb(1.0, 1.0, 0.8);
    let size = scene.min_side() * 0.06;
    for i in (1..=5).rev() {
        let paint = Paint::fill(flare).with_opacity(0.1 * i as f64 / 5.0);
        scene.circle(at, size * i as f64 / 3.0, &paint);
    }
    for step in 0..12 {
        let a = (step as f64 * 30.0).to_radians();
        let end = (at.0 + size * 1.5 * a.cos(), at.1 + size * 1.5 * a.sin());
        scene.line(at, end, flare, 1.0, 0.15);
    }
}

/// Compose the full scene. The template routine paints the middle layer.
pub(crate) fn compose(template: TemplateId, params: &TemplateParams) -> String {
    let mut scene = Scene::new(params.size, params.size, &params.font_family);
    let mut rng = Xorshift64::new(params.detail_seed);

    paint_background(&mut scene, params);
    paint_pattern(&mut scene, params.pattern, &params.palette);
    if params.effects.contains(&Effect::Glow) {
        paint_glow(&mut scene, &params.palette);
    }

    template.draw(&mut scene, params);

    if params.decorations {
        paint_decorations(&mut scene, &params.palette, &mut rng);
    }
    if let Some(subtitle) = &params.subtitle {
        paint_subtitle(&mut scene, subtitle, &params.palette);
    }
    if params.effects.contains(&Effect::Particles) {
        paint_particles(&mut scene, &params.palette, &mut rng);
    }
    if params.effects.contains(&Effect::LensFlare) {
        paint_lens_flare(&mut scene, &mut rng);
    }

    scene.finish()
}
