//! Export - PNG, SVG, Parameter Files and Manifests
//!
//! Every writer encodes fully in memory before touching the disk, so a failed
//! encode never leaves a partial file behind. Existing files are overwritten.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::batch::{Batch, EntryManifest};
use crate::error::{LogoError, Result};
use crate::hashing::compute_manifest_hash;
use crate::render::GeneratedImage;
use crate::templates::TemplateParams;
use crate::ENGINE_VERSION;

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LogoError::io(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| LogoError::io(path, e))
}

pub fn encode_png(pixels: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    pixels.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

pub fn save_png(image: &GeneratedImage, path: impl AsRef<Path>) -> Result<()> {
    save_pixels(image.pixels(), path)
}

/// PNG for a raw buffer, e.g. a composed logo.
pub fn save_pixels(pixels: &RgbaImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode_png(pixels)?;
    write_bytes(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "Saved PNG");
    Ok(())
}

pub fn save_svg(image: &GeneratedImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_bytes(path, image.svg().as_bytes())?;
    info!(path = %path.display(), "Saved SVG");
    Ok(())
}

/// On-disk form of a parameter set, stamped with the engine that wrote it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamsFile {
    pub engine_version: String,
    pub params: TemplateParams,
}

pub fn save_params(params: &TemplateParams, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = ParamsFile {
        engine_version: ENGINE_VERSION.to_string(),
        params: params.clone(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    write_bytes(path, json.as_bytes())?;
    info!(path = %path.display(), "Saved parameters");
    Ok(())
}

pub fn load_params(path: impl AsRef<Path>) -> Result<TemplateParams> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| LogoError::io(path, e))?;
    let file: ParamsFile = serde_json::from_str(&content)?;
    check_engine_version(&file.engine_version)?;
    Ok(file.params)
}

/// Files from an engine with a newer major version may use fields we cannot read.
fn check_engine_version(found: &str) -> Result<()> {
    let mismatch = || LogoError::EngineVersionMismatch {
        found: found.to_string(),
        current: ENGINE_VERSION.to_string(),
    };
    let current = semver::Version::parse(ENGINE_VERSION).map_err(|_| mismatch())?;
    let written = semver::Version::parse(found).map_err(|_| mismatch())?;
    if written.major > current.major {
        return Err(mismatch());
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BatchManifest<'a> {
    pub batch_id: &'a str,
    pub created_at: DateTime<Utc>,
    pub seed: u64,
    pub engine_version: &'static str,
    pub entries: Vec<EntryManifest<'a>>,
    pub files: Vec<String>,
    pub manifest_hash: String,
}

/// Write every entry as `<prefix>_NNN.png` under `dir`, then `manifest.json`.
/// Returns the written image paths in batch order.
pub fn write_batch(batch: &Batch, dir: impl AsRef<Path>, prefix: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut paths = Vec::with_capacity(batch.len());
    for (i, image) in batch.images().enumerate() {
        let path = dir.join(format!("{}_{:03}.png", prefix, i + 1));
        save_png(image, &path)?;
        paths.push(path);
    }

    let mut manifest = BatchManifest {
        batch_id: &batch.id,
        created_at: batch.created_at,
        seed: batch.seed,
        engine_version: ENGINE_VERSION,
        entries: batch.entry_manifests(),
        files: paths
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect(),
        manifest_hash: String::new(),
    };
    // Hash everything but the hash itself.
    manifest.manifest_hash = compute_manifest_hash(&manifest)?;

    let json = serde_json::to_string_pretty(&manifest)?;
    write_bytes(&dir.join("manifest.json"), json.as_bytes())?;
    info!(dir = %dir.display(), files = paths.len(), "Batch written");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version_gate() {
        assert!(check_engine_version(ENGINE_VERSION).is_ok());
        assert!(check_engine_version("0.9.0").is_ok());
        assert!(matches!(
            check_engine_version("99.0.0"),
            Err(LogoError::EngineVersionMismatch { .. })
        ));
        assert!(check_engine_version("not-a-version").is_err());
    }

    #[test]
    fn test_save_pixels_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.png");
        let pixels = RgbaImage::from_pixel(4, 4, image::Rgba([9, 8, 7, 255]));
        save_pixels(&pixels, &path).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes, encode_png(&pixels).unwrap());
    }

    #[test]
    fn test_load_params_missing_file_is_io() {
        let err = load_params("/no/such/params.json").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
    }
}
