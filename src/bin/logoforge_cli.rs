//! LogoForge CLI
//!
//! Mode comes from LOGO_CHOICE (or --mode), brand text from LOGO_TEXT.
//! Outputs a JSON summary to stdout.
//! Exit codes: 0 success, 1 resource or I/O failure, 2 configuration error.

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use logoforge_core::{
    composer, export, generate_batch_with, generate_palette_seeded, logging, render,
    render_size_variants, runtime, Background, BatchOptions, ErrorKind, GeneratedImage,
    HarmonyRule, LogoError, Palette, Pattern, Preset, RuntimeConfig, TemplateId, TemplateParams,
    COMPOSED_OUTPUT_FILE, DEFAULT_OUTPUT_FILE, LOADED_OUTPUT_FILE, SIZE_VARIANTS,
};
use logoforge_core::templates::{GradientDirection, Subtitle, TextEffect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// One random logo written to --output
    #[value(alias = "2")]
    Random,
    /// A batch of logos plus manifest.json in --out-dir
    #[value(alias = "3")]
    Batch,
    /// One preview per template
    #[value(alias = "4")]
    Templates,
    /// One preview per background pattern
    #[value(alias = "5")]
    Patterns,
    /// One preview per preset palette
    #[value(alias = "6")]
    Palettes,
    /// Render a saved parameter file (--config)
    #[value(alias = "7")]
    Config,
    /// The same design at several sizes
    #[value(alias = "8")]
    Sizes,
    /// Free-form logo from z-ordered layers
    #[value(alias = "9")]
    Composed,
}

#[derive(Parser)]
#[command(name = "logoforge-cli")]
#[command(about = "LogoForge CLI - Procedural Logo Generator")]
struct Cli {
    /// Generation mode
    #[arg(short, long, env = "LOGO_CHOICE", value_enum, default_value_t = Mode::Random)]
    mode: Mode,

    /// Brand text
    #[arg(short, long, env = "LOGO_TEXT", default_value = "LOGO")]
    text: String,

    /// Seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,

    /// Force a template (random mode)
    #[arg(long)]
    template: Option<String>,

    /// Force a harmony rule (random mode)
    #[arg(long)]
    harmony: Option<String>,

    /// Use a preset palette instead of a harmony rule (random mode)
    #[arg(long, conflicts_with = "harmony")]
    preset: Option<String>,

    /// Force a background pattern (random mode)
    #[arg(long)]
    pattern: Option<String>,

    /// Canvas size in pixels
    #[arg(long, default_value_t = logoforge_core::DEFAULT_CANVAS_SIZE)]
    size: u32,

    /// Number of logos (batch mode)
    #[arg(short, long, default_value_t = logoforge_core::DEFAULT_BATCH_SIZE)]
    count: usize,

    /// Output file for random, config and composed modes
    /// [default: random_logo.png, loaded_logo.png, composed_logo.png]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output directory (batch and demo modes)
    #[arg(long, default_value = "logos")]
    out_dir: PathBuf,

    /// Parameter file (config mode)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra font directory
    #[arg(long, env = "LOGOFORGE_FONT_DIR")]
    font_dir: Option<PathBuf>,

    /// Skip loading host fonts
    #[arg(long)]
    no_system_fonts: bool,

    /// Debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let config = RuntimeConfig {
        system_fonts: !cli.no_system_fonts,
        font_dir: cli.font_dir.clone(),
    };
    if let Err(e) = runtime::initialize(&config) {
        return fail(&e);
    }

    match run(&cli) {
        Ok(output) => {
            let output = serde_json::json!({
                "success": true,
                "mode": format!("{:?}", cli.mode).to_lowercase(),
                "result": output,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn fail(e: &LogoError) -> ExitCode {
    tracing::error!(error = %e, "Generation failed");
    let output = serde_json::json!({ "success": false, "error": e.to_string() });
    println!("{}", serde_json::to_string(&output).unwrap_or_default());
    match e.kind() {
        ErrorKind::Configuration => ExitCode::from(2),
        ErrorKind::ResourceLoad | ErrorKind::Io => ExitCode::FAILURE,
    }
}

fn run(cli: &Cli) -> Result<serde_json::Value, LogoError> {
    match cli.mode {
        Mode::Random => random(cli),
        Mode::Batch => {
            let options = BatchOptions { count: cli.count, seed: cli.seed, size: cli.size };
            let batch = generate_batch_with(&cli.text, &options)?;
            let files = export::write_batch(&batch, &cli.out_dir, "logo")?;
            Ok(serde_json::json!({
                "batch_id": batch.id,
                "seed": batch.seed,
                "files": paths(&files),
                "templates": batch.templates(),
            }))
        }
        Mode::Templates => {
            let palette = generate_palette_seeded(hue(cli), HarmonyRule::Triadic, cli.seed);
            let dir = cli.out_dir.join("demo_templates");
            let mut files = vec![];
            for template in TemplateId::ALL {
                let mut params = demo_params(cli, palette.clone(), template);
                params.background = Background::Linear(GradientDirection::Vertical);
                params.subtitle = Some(subtitle(template.name(), TextEffect::Shadow));
                let image = render(template, &params)?;
                files.push(serde_json::json!({
                    "template": template,
                    "description": template.description(),
                    "file": save(&image, dir.join(format!("{}.png", template.name())))?,
                }));
            }
            Ok(serde_json::json!({ "files": files }))
        }
        Mode::Patterns => {
            let dir = cli.out_dir.join("demo_patterns");
            let mut files = vec![];
            for pattern in Pattern::ALL {
                let mut params =
                    demo_params(cli, Preset::Corporate.palette(), TemplateId::MinimalCircle);
                params.pattern = pattern;
                params.subtitle = Some(subtitle(pattern.name(), TextEffect::None));
                let image = render(params.template, &params)?;
                files.push(save(&image, dir.join(format!("{}.png", pattern.name())))?);
            }
            Ok(serde_json::json!({ "files": files }))
        }
        Mode::Palettes => {
            let dir = cli.out_dir.join("demo_palettes");
            let mut files = vec![];
            for preset in Preset::ALL {
                let mut params = demo_params(cli, preset.palette(), TemplateId::TechHexagon);
                params.brand_text = preset.name().chars().take(4).collect();
                params.brand_text.make_ascii_uppercase();
                params.background = Background::Linear(GradientDirection::Vertical);
                params.decorations = true;
                params.subtitle = Some(subtitle(preset.name(), TextEffect::Shadow));
                let image = render(params.template, &params)?;
                files.push(save(&image, dir.join(format!("{}.png", preset.name())))?);
            }
            Ok(serde_json::json!({ "files": files }))
        }
        Mode::Config => {
            let path = cli.config.as_deref().ok_or_else(|| {
                LogoError::InvalidParams("config mode needs --config <file>".into())
            })?;
            let params = export::load_params(path)?;
            let image = render(params.template, &params)?;
            let file = save(&image, output_path(cli))?;
            Ok(serde_json::json!({ "file": file, "image": image.summary() }))
        }
        Mode::Sizes => {
            let params = random_params(cli)?;
            let images = render_size_variants(&params, &SIZE_VARIANTS)?;
            let dir = cli.out_dir.join("sizes");
            let mut files = vec![];
            for image in &images {
                let name = format!("logo_{}x{}.png", image.width(), image.height());
                files.push(save(image, dir.join(name))?);
            }
            Ok(serde_json::json!({ "files": files }))
        }
        Mode::Composed => {
            let palette = generate_palette_seeded(hue(cli), HarmonyRule::Triadic, cli.seed);
            let composer =
                composer::showcase(&palette, &cli.text, cli.size, cli.seed.unwrap_or_default());
            let pixels = composer.render()?;
            let path = output_path(cli);
            export::save_pixels(&pixels, &path)?;
            Ok(serde_json::json!({ "file": path.display().to_string(), "layers": composer.len() }))
        }
    }
}

/// Random mode: one logo plus `<stem>_config.json` next to it.
fn random(cli: &Cli) -> Result<serde_json::Value, LogoError> {
    // Names are parsed before rendering so a bad one never leaves a file behind.
    let params = random_params(cli)?;
    let image = render(params.template, &params)?;
    let output = output_path(cli);
    let file = save(&image, &output)?;

    let config_path = sibling_config(&output);
    export::save_params(&params, &config_path)?;
    Ok(serde_json::json!({
        "file": file,
        "config": config_path.display().to_string(),
        "image": image.summary(),
    }))
}

fn random_params(cli: &Cli) -> Result<TemplateParams, LogoError> {
    let forced_template = cli.template.as_deref().map(str::parse::<TemplateId>).transpose()?;
    let forced_rule = cli.harmony.as_deref().map(str::parse::<HarmonyRule>).transpose()?;
    let forced_preset = cli.preset.as_deref().map(str::parse::<Preset>).transpose()?;
    let forced_pattern = cli.pattern.as_deref().map(str::parse::<Pattern>).transpose()?;

    let (seed, mut params) = logoforge_core::random_params(&cli.text, cli.seed, cli.size);
    tracing::info!(seed, template = %params.template, "Drew random parameters");
    if let Some(template) = forced_template {
        params.template = template;
    }
    if let Some(rule) = forced_rule {
        let hue = params.palette.primary().hue;
        params.palette = generate_palette_seeded(hue, rule, Some(params.detail_seed));
    }
    if let Some(preset) = forced_preset {
        params.palette = preset.palette();
    }
    if let Some(pattern) = forced_pattern {
        params.pattern = pattern;
    }
    Ok(params)
}

fn demo_params(cli: &Cli, palette: Palette, template: TemplateId) -> TemplateParams {
    TemplateParams::new(cli.text.clone(), palette, template)
        .with_size(cli.size)
        .with_scaled_stroke()
}

fn subtitle(name: &str, effect: TextEffect) -> Subtitle {
    Subtitle { text: name.replace('_', " "), effect }
}

/// `--output`, or the mode's own default file.
fn output_path(cli: &Cli) -> PathBuf {
    let default = match cli.mode {
        Mode::Config => LOADED_OUTPUT_FILE,
        Mode::Composed => COMPOSED_OUTPUT_FILE,
        _ => DEFAULT_OUTPUT_FILE,
    };
    cli.output.clone().unwrap_or_else(|| PathBuf::from(default))
}

fn hue(cli: &Cli) -> f64 {
    cli.seed.map_or(210.0, |s| (s % 360) as f64)
}

fn save(image: &GeneratedImage, path: impl AsRef<Path>) -> Result<String, LogoError> {
    let path = path.as_ref();
    if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("svg")) {
        export::save_svg(image, path)?;
    } else {
        export::save_png(image, path)?;
    }
    Ok(path.display().to_string())
}

fn sibling_config(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "logo".into());
    output.with_file_name(format!("{}_config.json", stem))
}

fn paths(files: &[PathBuf]) -> Vec<String> {
    files.iter().map(|p| p.display().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use logoforge_core::render::validate_params;
    use logoforge_core::MIN_CANVAS_SIZE;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("logoforge-cli").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_digit_aliases_select_modes() {
        assert_eq!(parse(&["--mode", "2"]).mode, Mode::Random);
        assert_eq!(parse(&["--mode", "7"]).mode, Mode::Config);
        assert_eq!(parse(&["--mode", "9"]).mode, Mode::Composed);
        assert_eq!(parse(&["--mode", "composed"]).mode, Mode::Composed);
    }

    #[test]
    fn test_each_mode_has_its_own_default_output() {
        let out = |args: &[&str]| output_path(&parse(args));
        assert_eq!(out(&["--mode", "random"]), PathBuf::from("random_logo.png"));
        assert_eq!(out(&["--mode", "config"]), PathBuf::from("loaded_logo.png"));
        assert_eq!(out(&["--mode", "composed"]), PathBuf::from("composed_logo.png"));
        assert_eq!(out(&["--mode", "config", "-o", "x.png"]), PathBuf::from("x.png"));
    }

    #[test]
    fn test_demo_params_valid_at_small_sizes() {
        for size in MIN_CANVAS_SIZE..30 {
            let cli = parse(&["--mode", "templates", "--size", &size.to_string()]);
            for template in TemplateId::ALL {
                let params = demo_params(&cli, Preset::Ocean.palette(), template);
                let result = validate_params(&params);
                assert!(result.valid, "{template} at {size}: {}", result.error_summary());
            }
        }
    }

    #[test]
    fn test_sibling_config_name() {
        let path = sibling_config(Path::new("out/brand.png"));
        assert_eq!(path, PathBuf::from("out/brand_config.json"));
    }
}
