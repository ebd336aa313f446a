//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use std::collections::HashSet;

use logoforge_core::{
    export, generate_batch, generate_batch_with, generate_palette, regenerate_similar, render,
    render_named, runtime, BatchOptions, Carousel, ErrorKind, HarmonyRule, LogoError, Preset,
    RuntimeConfig, TemplateId, TemplateParams, MIN_CANVAS_SIZE,
};

fn ready() {
    runtime::initialize(&RuntimeConfig::default()).unwrap();
}

fn small_batch(text: &str, count: usize, seed: Option<u64>) -> logoforge_core::Batch {
    generate_batch_with(text, &BatchOptions { count, seed, size: 64 }).unwrap()
}

#[test]
fn invariant_palette_size_matches_rule() {
    for rule in HarmonyRule::ALL {
        for hue in [0.0, 45.5, 180.0, 359.9, 720.0, -30.0] {
            let palette = generate_palette(hue, rule);
            assert_eq!(palette.len(), rule.color_count(), "{} at {}", rule, hue);
            assert!((2..=4).contains(&palette.len()));
            for c in &palette.colors {
                assert!((0.0..360.0).contains(&c.hue), "hue {} out of range", c.hue);
                assert!((0.0..=1.0).contains(&c.saturation));
                assert!((0.0..=1.0).contains(&c.lightness));
            }
        }
    }
}

#[test]
fn invariant_batch_renders_any_text() {
    ready();
    for text in ["", "Café ☕ 株式会社", "<Acme & \"Sons\">"] {
        let batch = small_batch(text, 5, Some(3));
        assert_eq!(batch.len(), 5);
        for image in batch.images() {
            assert_eq!((image.width(), image.height()), (64, 64));
            assert!(image.svg().starts_with("<svg"));
        }
    }
}

#[test]
fn invariant_same_seed_same_batch() {
    ready();
    let a = small_batch("Repeat", 4, Some(1234));
    let b = small_batch("Repeat", 4, Some(1234));
    assert_ne!(a.id, b.id);
    assert_eq!(a.templates(), b.templates());
    assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
}

#[test]
fn invariant_unseeded_batches_differ() {
    ready();
    let a = small_batch("Fresh", 3, None);
    let b = small_batch("Fresh", 3, None);
    assert_ne!(a.seed, b.seed);
    assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
}

#[test]
fn invariant_batch_uses_distinct_templates() {
    ready();
    let batch = generate_batch("Acme", 5, Some(42)).unwrap();
    let unique: HashSet<TemplateId> = batch.templates().into_iter().collect();
    assert_eq!(unique.len(), 5);

    // Past the template count every template shows up.
    let long = small_batch("Acme", TemplateId::ALL.len() + 2, Some(42));
    let unique: HashSet<TemplateId> = long.templates().into_iter().collect();
    assert_eq!(unique.len(), TemplateId::ALL.len());
}

#[test]
fn invariant_zero_count_is_rejected() {
    assert!(matches!(generate_batch("X", 0, Some(1)), Err(LogoError::InvalidBatchSize(0))));
}

#[test]
fn invariant_unknown_template_writes_nothing() {
    ready();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("logo.png");
    let params =
        TemplateParams::new("Acme", Preset::Ocean.palette(), TemplateId::Monogram).with_size(64);

    let result =
        render_named("no_such_template", &params).and_then(|image| export::save_png(&image, &out));
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(!out.exists());
}

#[test]
fn invariant_invalid_params_block_render() {
    ready();
    let mut params = TemplateParams::new("Acme", Preset::Sunset.palette(), TemplateId::ShieldBadge)
        .with_size(64);
    params.size = 8;
    let err = render(params.template, &params).unwrap_err();
    assert!(matches!(err, LogoError::InvalidParams(_)));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn invariant_smallest_canvases_render_every_template() {
    ready();
    for size in [MIN_CANVAS_SIZE, 20, 29] {
        for template in TemplateId::ALL {
            let params = TemplateParams::new("Tiny", Preset::Ocean.palette(), template)
                .with_size(size)
                .with_scaled_stroke();
            let image = render(template, &params).unwrap();
            assert_eq!(image.width(), size);
        }
    }
}

#[test]
fn invariant_carousel_index_in_bounds() {
    ready();
    let mut carousel = Carousel::new(small_batch("Nav", 5, Some(9)));
    let moves = [
        true, true, false, true, true, true, true, true, false, false, false, false, false, false,
    ];
    for forward in moves {
        if forward {
            carousel.next();
        } else {
            carousel.previous();
        }
        assert!(carousel.index() < carousel.len());
        assert!(carousel.current().is_some());
    }
    assert_eq!(carousel.index(), 0);
}

#[test]
fn invariant_regenerate_keeps_template_and_text() {
    ready();
    let base = TemplateParams::new("Keep", Preset::Forest.palette(), TemplateId::TechHexagon)
        .with_size(64);
    let batch = regenerate_similar(&base, 3, Some(5)).unwrap();
    assert_eq!(batch.len(), 3);
    for entry in batch.entries() {
        assert_eq!(entry.params.template, TemplateId::TechHexagon);
        assert_eq!(entry.params.brand_text, "Keep");
        assert_eq!(entry.params.palette.len(), base.palette.len());
    }
}

#[test]
fn invariant_params_file_round_trip_renders_same_pixels() {
    ready();
    let dir = tempfile::tempdir().unwrap();
    let batch = small_batch("Saved", 1, Some(77));
    let entry = batch.get(0).unwrap();

    let path = dir.path().join("random_logo_config.json");
    export::save_params(&entry.params, &path).unwrap();
    let loaded = export::load_params(&path).unwrap();
    assert_eq!(loaded, entry.params);

    let again = render(loaded.template, &loaded).unwrap();
    assert_eq!(again.digest(), entry.image.digest());
}

#[test]
fn invariant_batch_export_writes_files_and_manifest() {
    ready();
    let dir = tempfile::tempdir().unwrap();
    let batch = small_batch("Export", 3, Some(11));
    let files = export::write_batch(&batch, dir.path(), "logo").unwrap();

    assert_eq!(files.len(), 3);
    for (i, file) in files.iter().enumerate() {
        let name = file.file_name().unwrap().to_str().unwrap();
        assert_eq!(name, format!("logo_{:03}.png", i + 1));
        let bytes = std::fs::read(file).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    let raw = std::fs::read_to_string(dir.path().join("manifest.json")).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(manifest["seed"], 11);
    assert_eq!(manifest["entries"].as_array().unwrap().len(), 3);
    assert_eq!(manifest["manifest_hash"].as_str().unwrap().len(), 64);
}
