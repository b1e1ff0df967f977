//! 2XKO gameplay analyzer binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use xko_analyzer::{
    init_tracing, render, write_report, AnalysisSession, AnalyzerConfig, StaticCatalog,
    SyntheticMoveRecognizer,
};
use xko_media::VideoSource;

#[derive(Parser, Debug)]
#[command(name = "xko-analyzer")]
#[command(about = "Analyze 2XKO gameplay footage for mistakes and missed punishes")]
#[command(version)]
struct Args {
    /// Gameplay video to analyze
    #[arg(short, long)]
    video: PathBuf,

    /// Matchup type (only "mirror" is supported)
    #[arg(short, long, default_value = "mirror")]
    matchup: String,

    /// Character played by both players
    #[arg(short, long, default_value = "Blitzcrank")]
    character: String,

    /// Write the report as JSON to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Cut an annotated clip for every mistake
    #[arg(long, default_value_t = false)]
    clips: bool,

    /// Analyze every Nth frame (overrides XKO_FRAME_STRIDE)
    #[arg(long)]
    stride: Option<usize>,

    /// Character catalog JSON replacing the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Attach seeded random move observations (demo only, report is marked synthetic)
    #[arg(long)]
    synthetic_seed: Option<u64>,
}

fn run(args: Args) -> Result<()> {
    let mut config = AnalyzerConfig::from_env();
    if let Some(stride) = args.stride.filter(|s| *s > 0) {
        config.frame_stride = stride;
    }

    let catalog = match &args.catalog {
        Some(path) => StaticCatalog::from_json_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => StaticCatalog::builtin(),
    };

    let hit_rate = config.synthetic_hit_rate;
    let mut session = AnalysisSession::new(config, &catalog, &args.character, &args.matchup)
        .context("Invalid analysis setup")?;
    if let Some(seed) = args.synthetic_seed {
        session = session.with_recognizer(Box::new(SyntheticMoveRecognizer::new(seed, hit_rate)));
    }

    let mut source = VideoSource::open(&args.video)
        .with_context(|| format!("Failed to open video {}", args.video.display()))?;
    let outcome = session.run(&mut source).context("Analysis failed")?;

    print!("{}", render(&outcome.report));

    if let Some(path) = &args.output {
        write_report(&outcome.report, path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        println!("\nReport saved to {}", path.display());
    }

    if args.clips {
        let clips = session
            .generate_clips(&mut source, &outcome)
            .context("Clip generation failed")?;
        println!(
            "\nGenerated {} clips in {}",
            clips.len(),
            session.config().clips_dir().display()
        );
    }

    source.close();
    info!("Done");
    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}
