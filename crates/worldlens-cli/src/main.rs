//! worldlens — extract a speaker's worldview from a directory of
//! transcripts.

use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::EnvFilter;

use worldlens_core::{Depth, PipelineConfig};
use worldlens_runtime::{load_directory, Pipeline};

struct Options {
    transcripts: PathBuf,
    subject: String,
    depth: Depth,
    output: Option<PathBuf>,
    n_points: Option<usize>,
    k: Option<usize>,
    model: Option<String>,
    max_themes: usize,
}

fn print_usage() {
    println!("worldlens — worldview extraction from transcripts");
    println!();
    println!("Usage: worldlens <command> <transcripts-dir> [options]");
    println!();
    println!("Commands:");
    println!("  quotes      Score and rank quotable sentences");
    println!("  contrast    Contrarian quotes only");
    println!("  themes      Group top quotes into themes");
    println!("  extract     Run term extraction");
    println!("  cluster     Extract terms and cluster them");
    println!("  synthesize  Full pipeline: extract, cluster, synthesize");
    println!("  beliefs     Quote-grounded synthesis (requires a generative backend)");
    println!();
    println!("Options:");
    println!("  --subject <name>        Subject of the analysis");
    println!("  --depth <quick|medium|deep>");
    println!("  --out <dir>             Persist stage artifacts as JSON");
    println!("  --points <n>            Number of worldview points");
    println!("  --k <n>                 Fixed cluster count (default: auto)");
    println!("  --model <name>          Generative model for deep synthesis");
    println!("  --max-themes <n>        Theme count for the themes command");
}

fn parse_options(args: &[String]) -> anyhow::Result<Options> {
    let transcripts = PathBuf::from(
        args.first()
            .context("missing <transcripts-dir> argument")?,
    );

    let mut options = Options {
        transcripts,
        subject: String::new(),
        depth: Depth::Medium,
        output: None,
        n_points: None,
        k: None,
        model: None,
        max_themes: 5,
    };

    let mut iter = args[1..].iter();
    while let Some(flag) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .with_context(|| format!("{name} requires a value"))
                .cloned()
        };
        match flag.as_str() {
            "--subject" => options.subject = value("--subject")?,
            "--depth" => {
                options.depth = match value("--depth")?.as_str() {
                    "quick" => Depth::Quick,
                    "medium" => Depth::Medium,
                    "deep" => Depth::Deep,
                    other => bail!("unknown depth: {other}"),
                }
            }
            "--out" => options.output = Some(PathBuf::from(value("--out")?)),
            "--points" => options.n_points = Some(value("--points")?.parse()?),
            "--k" => options.k = Some(value("--k")?.parse()?),
            "--model" => options.model = Some(value("--model")?),
            "--max-themes" => options.max_themes = value("--max-themes")?.parse()?,
            other => bail!("unknown option: {other}"),
        }
    }
    Ok(options)
}

fn build_pipeline(options: &Options) -> Pipeline {
    let mut config = PipelineConfig::default();
    if let Some(n) = options.n_points {
        config.synth.n_points = n;
    }
    if let Some(k) = options.k {
        config.cluster.n_clusters = k;
    }
    if let Some(model) = &options.model {
        config.synth.model = model.clone();
    }

    let pipeline = Pipeline::new(config);

    #[cfg(feature = "ollama")]
    let pipeline = {
        let model = options.model.clone().unwrap_or_else(|| "llama3".to_string());
        pipeline.with_generator(Box::new(worldlens_synth::OllamaGenerator::new(model)))
    };

    pipeline
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().cloned() else {
        print_usage();
        std::process::exit(1);
    };

    if matches!(command.as_str(), "--help" | "-h" | "help") {
        print_usage();
        return Ok(());
    }

    let options = parse_options(&args[1..])?;
    let pipeline = build_pipeline(&options);
    let documents = load_directory(&options.transcripts)?;
    info!(documents = documents.len(), "corpus loaded");

    if let Some(dir) = &options.output {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    match command.as_str() {
        "quotes" => {
            let collection = pipeline.run_quotes(&documents);
            print_json(&collection)?;
        }
        "contrast" => {
            let collection = pipeline.run_quotes(&documents);
            print_json(&collection.contrarian())?;
        }
        "themes" => {
            let themes = pipeline.run_themes(&documents, options.max_themes);
            print_json(&themes)?;
        }
        "extract" => {
            let extraction = pipeline.run_extraction(&documents)?;
            print_json(&extraction)?;
        }
        "cluster" => {
            let extraction = pipeline.run_extraction(&documents)?;
            let clusters = pipeline.run_clustering(&extraction)?;
            print_json(&clusters)?;
        }
        "synthesize" => {
            let run = pipeline.run(
                &documents,
                &options.subject,
                options.depth,
                options.output.as_deref(),
            )?;
            if run.outcome.degraded() {
                eprintln!("note: deep synthesis degraded to the statistical path");
            }
            print_json(run.worldview())?;
        }
        "beliefs" => {
            let outcome = pipeline.run_quote_grounded(&documents, &options.subject);
            print_json(&outcome)?;
        }
        other => {
            eprintln!("unknown command: {other}");
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
