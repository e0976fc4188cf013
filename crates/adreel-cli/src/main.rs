mod media;
mod remote_assets;

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use adreel_core::{hash, AdreelConfig};
use adreel_ir::{
    validate_composition, AssetReport, CompositionProps, EffectType, RenderSettings, Severity,
    TextAnimation, TransitionType,
};
use adreel_render::audio::{concat_buffers, music_volume_at};
use adreel_render::RenderPipeline;

const DEFAULT_CONFIG: &str = "adreel.toml";

#[derive(Parser)]
#[command(
    name = "adreel",
    version,
    about = "adreel: deterministic scene compositor for marketing videos",
    long_about = "adreel turns a composition of scenes, captions, brand assets and sound design\ninto frames and audio. Every frame is a pure function of the props."
)]
struct Cli {
    /// Config file (default: ./adreel.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a composition JSON file
    Check {
        /// Path to the composition props JSON
        #[arg()]
        file: PathBuf,
    },

    /// Show the timeline and the layer plan of one frame
    Inspect {
        /// Path to the composition props JSON
        #[arg()]
        file: PathBuf,

        /// Frame to evaluate
        #[arg(long, short)]
        frame: Option<u64>,

        /// Print the frame plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the audio cue sheet
    Audio {
        /// Path to the composition props JSON
        #[arg()]
        file: PathBuf,
    },

    /// Render frames and the soundtrack
    Render {
        /// Path to the composition props JSON
        #[arg()]
        file: PathBuf,

        /// Output directory (default: output/<name>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Frame range to render, e.g. 0..90 (default: whole composition)
        #[arg(long)]
        frames: Option<String>,

        /// Image output format
        #[arg(long, value_enum, default_value_t = ImageFormat::Png)]
        format: ImageFormat,

        /// Override the canvas width
        #[arg(long)]
        width: Option<u32>,

        /// Override the canvas height
        #[arg(long)]
        height: Option<u32>,

        /// Only use assets already in the cache
        #[arg(long)]
        no_fetch: bool,

        /// Draw the debug overlay
        #[arg(long)]
        debug: bool,
    },

    /// Display version and supported effects
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ImageFormat {
    /// One PNG per frame
    Png,
    /// A single animated PNG
    Apng,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check { file } => cmd_check(&file),
        Commands::Inspect { file, frame, json } => cmd_inspect(&file, &config, frame, json),
        Commands::Audio { file } => cmd_audio(&file, &config),
        Commands::Render {
            file,
            output,
            frames,
            format,
            width,
            height,
            no_fetch,
            debug,
        } => cmd_render(
            &file,
            config,
            RenderOptions {
                output,
                frames,
                format,
                width,
                height,
                no_fetch,
                debug,
            },
        ),
        Commands::Info => cmd_info(),
    }
}

fn load_config(path: Option<&Path>) -> Result<AdreelConfig> {
    match path {
        Some(path) => AdreelConfig::load_from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => AdreelConfig::load_or_default(Path::new(DEFAULT_CONFIG))
            .with_context(|| format!("failed to load {DEFAULT_CONFIG}")),
    }
}

fn load_props(file: &Path) -> Result<CompositionProps> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read file: {}", file.display()))?;
    CompositionProps::from_json(&source)
        .with_context(|| format!("failed to parse composition JSON: {}", file.display()))
}

fn cmd_check(file: &Path) -> Result<()> {
    println!("🔍 Checking {}", file.display());
    let props = load_props(file)?;
    println!("   ✓ Parse OK ({} scenes)", props.scene_count());

    let diagnostics = validate_composition(&props);
    for diag in diagnostics.iter() {
        let icon = match diag.severity {
            Severity::Warning => "⚠️",
            Severity::Error => "❌",
        };
        println!("   {icon} {}", diag.message);
    }

    let report = AssetReport::collect(&props);
    let unusable: Vec<_> = report.unusable().collect();
    println!(
        "   Assets: {} referenced, {} usable",
        report.count(),
        report.count() - unusable.len()
    );
    for asset in unusable {
        println!(
            "     ↳ [{}] {} is {}; falls back",
            asset.kind, asset.location, asset.status
        );
    }

    if diagnostics.has_errors() {
        anyhow::bail!("composition has errors");
    }
    println!();
    println!("   ✅ No errors found.");
    Ok(())
}

fn cmd_inspect(file: &Path, config: &AdreelConfig, frame: Option<u64>, json: bool) -> Result<()> {
    let props = load_props(file)?;
    let settings = RenderSettings::resolve(&props, config);
    let pipeline = RenderPipeline::new(props, settings);
    let settings = pipeline.settings();

    if let Some(f) = frame {
        let plan = pipeline.plan(f)?;
        if json {
            println!("{}", plan.to_json()?);
            return Ok(());
        }
        print_timeline(&pipeline);
        println!();
        println!(
            "⏱️  Frame {f} ({:.2}s) plan {}",
            f as f64 / settings.fps.as_f64(),
            plan.plan_hash()?.short()
        );
        if let Some(scene) = &plan.scene {
            println!(
                "├── 🎞️  Scene '{}' [{}] local {}/{} {}",
                scene.scene_id, scene.scene_type, scene.local_frame, scene.scene_frames, scene.phase
            );
            println!(
                "│   transition: opacity {:.3}, translate ({:.3}, {:.3}), scale {:.3}, blur {:.1}",
                scene.transition.opacity,
                scene.transition.translate.x,
                scene.transition.translate.y,
                scene.transition.scale,
                scene.transition.blur
            );
        }
        for layer in plan.all_layers() {
            println!(
                "│   {:?} {:<18} opacity {:.3} scale {:.3}",
                layer.z, layer.label, layer.style.opacity, layer.style.scale
            );
        }
        let audio = pipeline.audio_plan(f)?;
        if audio.is_silent() {
            println!("└── 🔇 Audio (silent)");
        } else {
            println!("└── 🔊 Audio ({} cues)", audio.cues.len());
        }
        for cue in &audio.cues {
            println!(
                "    {:<15} vol {:.3} at {:.3}s {}",
                cue.source.to_string(),
                cue.volume,
                cue.offset_seconds,
                cue.url
            );
        }
    } else {
        print_timeline(&pipeline);
        println!(
            "   Music volume at frame 0: {:.3}",
            music_volume_at(pipeline.props(), settings, 0)
        );
    }
    Ok(())
}

fn print_timeline(pipeline: &RenderPipeline) {
    let settings = pipeline.settings();
    let timeline = pipeline.timeline();
    println!(
        "📦 Composition: {}x{} @ {}fps, {} frames ({:.2}s)",
        settings.width,
        settings.height,
        settings.fps.get(),
        timeline.total_frames(),
        timeline.duration_seconds()
    );
    println!("🎬 Scenes ({} total)", timeline.scene_count());
    for (scene, window) in pipeline.props().scenes.iter().zip(timeline.windows()) {
        println!(
            "   {:>3} {:<16} {:<12} frames {:>5}..{:<5}",
            window.index, scene.id, scene.kind.label(), window.start, window.end
        );
    }
}

fn cmd_audio(file: &Path, config: &AdreelConfig) -> Result<()> {
    let props = load_props(file)?;
    let settings = RenderSettings::resolve(&props, config);
    let pipeline = RenderPipeline::new(props, settings);

    println!("🔊 Cue sheet ({} cues)", pipeline.cue_sheet().len());
    for cue in pipeline.cue_sheet() {
        let scene = cue
            .scene_index
            .map(|i| format!("scene {i}"))
            .unwrap_or_else(|| "global".to_string());
        println!(
            "   {:<15} {:<9} frames {:>5}..{:<5} vol {:.3}{} {}",
            cue.source.to_string(),
            scene,
            cue.start,
            cue.end,
            cue.volume,
            if cue.looping { " loop" } else { "" },
            cue.url
        );
    }
    Ok(())
}

struct RenderOptions {
    output: Option<PathBuf>,
    frames: Option<String>,
    format: ImageFormat,
    width: Option<u32>,
    height: Option<u32>,
    no_fetch: bool,
    debug: bool,
}

/// Resolve settings for a render, with CLI flags winning over config.
fn render_settings(
    props: &CompositionProps,
    config: &AdreelConfig,
    opts: &RenderOptions,
) -> RenderSettings {
    let settings =
        RenderSettings::resolve(props, config).with_debug(opts.debug || config.render.debug);
    if opts.width.is_none() && opts.height.is_none() {
        return settings;
    }
    let (width, height) = (
        opts.width.unwrap_or(settings.width),
        opts.height.unwrap_or(settings.height),
    );
    settings.with_size(width, height)
}

fn cmd_render(file: &Path, mut config: AdreelConfig, opts: RenderOptions) -> Result<()> {
    let start = Instant::now();
    println!("🎬 adreel v{}", env!("CARGO_PKG_VERSION"));
    println!("   Source: {}", file.display());

    let props = load_props(file)?;
    for diag in validate_composition(&props).warnings() {
        tracing::warn!("{}", diag.message);
    }

    let settings = render_settings(&props, &config, &opts);

    if opts.no_fetch {
        config.assets.fetch_remote = false;
    }
    let report = AssetReport::collect(&props);
    let fetched = remote_assets::fetch_remote_assets(&report, &config)?;
    println!(
        "   ✓ Assets: {} downloaded, {} cached, {} failed",
        fetched.downloaded, fetched.reused_from_cache, fetched.failed
    );
    let (assets, media) = media::load_assets(&report, &fetched, &config);
    println!(
        "   ✓ Decoded {} images, {} audio tracks, {} fonts",
        media.images, media.audio, media.fonts
    );

    let pipeline = RenderPipeline::new(props, settings);
    let total = pipeline.total_frames();
    let range = match opts.frames.as_deref() {
        Some(spec) => parse_frame_range(spec, total)?,
        None => 0..total,
    };

    let render_start = Instant::now();
    let rendered = pipeline.render_range(range.clone(), &assets)?;
    let render_secs = render_start.elapsed().as_secs_f64();
    println!(
        "   ✓ Rendered {} frames in {:.2}s ({:.1} fps)",
        rendered.len(),
        render_secs,
        rendered.len() as f64 / render_secs.max(1e-9)
    );

    let out_dir = opts.output.unwrap_or_else(|| {
        let stem = file.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from("output").join(stem.as_ref())
    });
    let audio = concat_buffers(&rendered.iter().map(|f| f.audio.clone()).collect::<Vec<_>>());
    let images: Vec<_> = rendered.into_iter().map(|f| f.image).collect();
    let settings = pipeline.settings();

    match opts.format {
        ImageFormat::Png => {
            adreel_encode::PngSequenceWriter::write(&images, &out_dir, "frame", range.start)?;
            println!("   ✓ Frames → {}", out_dir.display());
        }
        ImageFormat::Apng => {
            let path = out_dir.join("preview.png");
            adreel_encode::ApngEncoder::encode(
                &images,
                settings.width,
                settings.height,
                settings.fps.get(),
                &path,
                None,
            )?;
            println!("   ✓ APNG → {}", path.display());
        }
    }
    let wav = out_dir.join("audio.wav");
    adreel_encode::WavWriter::write(&audio.samples, audio.channels, audio.sample_rate, &wav)?;
    println!("   ✓ Audio → {}", wav.display());

    let mut hasher = hash::RenderHasher::new();
    for image in &images {
        hasher.frame(image);
    }
    hasher.audio(&audio.samples);
    println!("   Content hash: {}", hash::hash_frames(&images).to_hex());
    println!("   Render hash:  {}", hasher.finish().to_hex());
    println!("   ⚡ Done in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Parse `a..b` (end exclusive), `a..` or a single frame `n`, clamped to
/// the composition.
fn parse_frame_range(spec: &str, total: u64) -> Result<Range<u64>> {
    let spec = spec.trim();
    let parse = |s: &str| -> Result<u64> {
        s.trim()
            .parse::<u64>()
            .with_context(|| format!("invalid frame number '{s}'"))
    };
    let range = match spec.split_once("..") {
        Some((a, b)) => {
            let start = if a.trim().is_empty() { 0 } else { parse(a)? };
            let end = if b.trim().is_empty() { total } else { parse(b)? };
            start..end.min(total)
        }
        None => {
            let f = parse(spec)?;
            f..f.saturating_add(1)
        }
    };
    if range.start >= range.end || range.end > total {
        anyhow::bail!("frame range '{spec}' is empty or outside 0..{total}");
    }
    Ok(range)
}

fn cmd_info() -> Result<()> {
    println!("🎬 adreel compositor");
    println!("   Version:     {}", env!("CARGO_PKG_VERSION"));
    println!("   Renderer:    CPU (rayon, frame-parallel)");
    println!("   Output:      PNG sequence, APNG, 16-bit WAV");
    println!(
        "   Transitions: {}",
        TransitionType::ALL.map(|t| t.label()).join(", ")
    );
    println!(
        "   Effects:     {}",
        EffectType::ALL.map(|e| e.label()).join(", ")
    );
    println!(
        "   Text:        {}",
        TextAnimation::ALL.map(|a| a.label()).join(", ")
    );
    Ok(())
}
