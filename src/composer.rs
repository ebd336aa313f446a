//! Layer Composer - Free-Form Logos From Z-Ordered Layers
//!
//! A composer holds painting closures tagged with a z-index. Composition
//! paints a solid backdrop, then every layer in ascending z order. Layers with
//! equal z keep insertion order.

use image::RgbaImage;
use tracing::debug;

use crate::color::{Color, Palette};
use crate::error::{LogoError, Result};
use crate::rng::Xorshift64;
use crate::runtime;
use crate::scene::{paint_particles, paint_pattern, star, Paint, Scene};
use crate::templates::{GradientDirection, Pattern};
use crate::{DEFAULT_FONT_FAMILY, MAX_CANVAS_SIZE, MIN_CANVAS_SIZE};

type PaintFn = Box<dyn Fn(&mut Scene)>;

struct Layer {
    z_index: i32,
    paint: PaintFn,
}

pub struct LogoComposer {
    width: u32,
    height: u32,
    background: Color,
    font_family: String,
    layers: Vec<Layer>,
}

impl LogoComposer {
    /// Empty composer over a dark slate backdrop.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Color::from_rgb(0.1, 0.1, 0.15),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            layers: Vec::new(),
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn add_layer(&mut self, z_index: i32, paint: impl Fn(&mut Scene) + 'static) -> &mut Self {
        self.layers.push(Layer { z_index, paint: Box::new(paint) });
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// The SVG master: backdrop, then layers by ascending z.
    pub fn to_svg(&self) -> String {
        let mut scene = Scene::new(self.width, self.height, &self.font_family);
        scene.rect(0.0, 0.0, scene.width(), scene.height(), &Paint::fill(self.background));

        let mut order: Vec<&Layer> = self.layers.iter().collect();
        order.sort_by_key(|l| l.z_index);
        for layer in order {
            (layer.paint)(&mut scene);
        }
        scene.finish()
    }

    /// Compose and rasterize. The canvas must satisfy the usual size bounds.
    pub fn render(&self) -> Result<RgbaImage> {
        for side in [self.width, self.height] {
            if !(MIN_CANVAS_SIZE..=MAX_CANVAS_SIZE).contains(&side) {
                return Err(LogoError::InvalidParams(format!(
                    "canvas_size: {}x{} outside {}..={}",
                    self.width, self.height, MIN_CANVAS_SIZE, MAX_CANVAS_SIZE
                )));
            }
        }
        let rt = runtime::get()?;
        let svg = self.to_svg();
        debug!(
            layers = self.layers.len(),
            width = self.width,
            height = self.height,
            "Composed logo"
        );
        rt.rasterize(&svg, self.width, self.height)
    }
}

/// Five-layer showcase: gradient, hexagon pattern, emblem, shadowed text,
/// particle burst. `seed` places the particles.
pub fn showcase(palette: &Palette, text: &str, size: u32, seed: u64) -> LogoComposer {
    let mut composer = LogoComposer::new(size, size);

    let primary = palette.primary();
    composer.add_layer(0, move |scene| {
        let (w, h) = (scene.width(), scene.height());
        scene.linear_gradient(
            "composed_bg",
            primary.adjust_brightness(0.3),
            primary.adjust_brightness(0.6),
            GradientDirection::Diagonal,
        );
        scene.rect(0.0, 0.0, w, h, &Paint::url("composed_bg"));
    });

    let pattern_palette = palette.clone();
    composer.add_layer(1, move |scene| paint_pattern(scene, Pattern::Hexagon, &pattern_palette));

    let (outer, inner, emblem) = (palette.primary(), palette.secondary(), palette.accent());
    composer.add_layer(2, move |scene| {
        let c = scene.center();
        let m = scene.min_side();
        scene.circle(c, m * 0.16, &Paint::fill(outer));
        scene.circle(c, m * 0.12, &Paint::fill(inner));
        scene.polygon(&star(c, 6, m * 0.08, m * 0.04), &Paint::fill(emblem));
    });

    let text = text.to_string();
    let shadow_color = palette.primary().mix(&Color::BLACK, 0.8);
    composer.add_layer(3, move |scene| {
        let m = scene.min_side();
        let at = (scene.width() / 2.0, scene.height() * 0.7);
        let size = m * 0.056;
        let shadow = (at.0 + m * 0.006, at.1 + m * 0.006);
        scene.text(&text, shadow, size, &Paint::fill(shadow_color));
        scene.text(&text, at, size, &Paint::fill(Color::WHITE));
    });

    let particle_palette = palette.clone();
    composer.add_layer(4, move |scene| {
        let mut rng = Xorshift64::new(seed);
        paint_particles(scene, &particle_palette, &mut rng);
    });

    composer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{generate_palette, HarmonyRule};
    use crate::runtime::{initialize, RuntimeConfig};
    use image::Rgba;

    const RED: Color = Color { hue: 0.0, saturation: 1.0, lightness: 0.5 };
    const BLUE: Color = Color { hue: 240.0, saturation: 1.0, lightness: 0.5 };

    fn full_rect(color: Color) -> impl Fn(&mut Scene) {
        move |scene: &mut Scene| {
            let (w, h) = (scene.width(), scene.height());
            scene.rect(0.0, 0.0, w, h, &Paint::fill(color));
        }
    }

    #[test]
    fn test_z_index_decides_paint_order() {
        initialize(&RuntimeConfig::default()).unwrap();
        let mut composer = LogoComposer::new(32, 32);
        composer.add_layer(2, full_rect(RED));
        composer.add_layer(1, full_rect(BLUE));

        let svg = composer.to_svg();
        let blue = svg.find("#0000ff").unwrap();
        let red = svg.find("#ff0000").unwrap();
        assert!(blue < red);

        let pixels = composer.render().unwrap();
        assert_eq!(pixels.get_pixel(16, 16), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_equal_z_keeps_insertion_order() {
        let mut composer = LogoComposer::new(32, 32);
        composer.add_layer(0, full_rect(RED)).add_layer(0, full_rect(BLUE));
        let svg = composer.to_svg();
        assert!(svg.find("#ff0000").unwrap() < svg.find("#0000ff").unwrap());
    }

    #[test]
    fn test_backdrop_without_layers() {
        initialize(&RuntimeConfig::default()).unwrap();
        let composer = LogoComposer::new(16, 16).with_background(BLUE);
        assert!(composer.is_empty());
        let pixels = composer.render().unwrap();
        assert_eq!(pixels.get_pixel(8, 8), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_rejects_out_of_range_canvas() {
        let err = LogoComposer::new(8, 64).render().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn test_showcase_has_five_layers() {
        let palette = generate_palette(200.0, HarmonyRule::Triadic);
        let mut composer = showcase(&palette, "COMPOSED", 128, 7);
        assert_eq!(composer.len(), 5);
        let svg = composer.to_svg();
        assert!(svg.contains("composed_bg"));
        assert_eq!(svg.matches(">COMPOSED<").count(), 2);
        composer.clear();
        assert!(composer.is_empty());
    }
}
