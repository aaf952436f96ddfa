//! Folio CLI
//!
//! Replay scroll sweeps against a scene file and inspect what the scroll
//! tracker and parallax engine produce, without a browser.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use folio_cli::{check, jump, simulate, visibility, Sample, Scene};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Folio scroll and parallax simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep the page top to bottom and report each step
    Simulate {
        /// Scene file
        scene: PathBuf,

        /// Scroll distance per step in pixels
        #[arg(short, long, default_value = "100")]
        step: f32,

        /// Emit one JSON object per step instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show how much of each section is visible at an offset
    Visibility {
        /// Scene file
        scene: PathBuf,

        /// Scroll offset in pixels
        #[arg(short, long, default_value = "0")]
        offset: f32,
    },

    /// Resolve where scrolling to a section lands
    Jump {
        /// Scene file
        scene: PathBuf,

        /// Section id
        section: String,

        /// Starting scroll offset in pixels
        #[arg(long, default_value = "0")]
        from: f32,

        /// Space kept clear above the section (defaults to the scene's header offset)
        #[arg(long)]
        header: Option<f32>,
    },

    /// Validate a scene file
    Check {
        /// Scene file
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate { scene, step, json } => cmd_simulate(&scene, step, json),

        Commands::Visibility { scene, offset } => cmd_visibility(&scene, offset),

        Commands::Jump {
            scene,
            section,
            from,
            header,
        } => cmd_jump(&scene, &section, from, header),

        Commands::Check { scene } => cmd_check(&scene),
    }
}

fn cmd_simulate(path: &Path, step: f32, json: bool) -> Result<()> {
    let scene = Scene::load(path)?;
    let samples = simulate(&scene, step)?;

    if json {
        for sample in &samples {
            println!("{}", serde_json::to_string(sample)?);
        }
        return Ok(());
    }

    print_table(&scene, &samples);
    Ok(())
}

fn print_table(scene: &Scene, samples: &[Sample]) {
    print!(
        "{:>8} {:>7} {:>8} {:>6} {:>5} {:<14}",
        "offset", "t(ms)", "progress", "dir", "live", "section"
    );
    for element in &scene.elements {
        print!(" {}", element.name);
    }
    println!();

    for sample in samples {
        print!(
            "{:>8.0} {:>7} {:>8.3} {:>6} {:>5} {:<14}",
            sample.offset,
            sample.at_ms,
            sample.progress,
            sample.direction,
            if sample.is_scrolling { "yes" } else { "no" },
            sample.current_section.as_deref().unwrap_or("-"),
        );
        for element in &sample.elements {
            match element.progress {
                Some(progress) => print!(
                    " [{progress:.2}] {} @ {:.2}",
                    element.transform, element.opacity
                ),
                None => print!(" [culled]"),
            }
        }
        println!();
    }
}

fn cmd_visibility(path: &Path, offset: f32) -> Result<()> {
    let scene = Scene::load(path)?;
    info!("Section visibility at {}px", offset);

    for (id, visible) in visibility(&scene, offset)? {
        println!("{:<20} {:>5.1}%", id, visible * 100.0);
    }
    Ok(())
}

fn cmd_jump(path: &Path, section: &str, from: f32, header: Option<f32>) -> Result<()> {
    let scene = Scene::load(path)?;

    match jump(&scene, from, section, header)? {
        Some(target) => {
            println!("{section}: {from}px -> {target}px");
            Ok(())
        }
        None => anyhow::bail!(
            "No section '{}' in {}. Known sections: {:?}",
            section,
            path.display(),
            scene.section_ids()
        ),
    }
}

fn cmd_check(path: &Path) -> Result<()> {
    let scene = Scene::load(path)?;
    info!("Checking scene: {}", path.display());

    let results = check::check_scene(&scene);
    check::print_results(&results);

    if check::has_errors(&results) {
        std::process::exit(1);
    }

    Ok(())
}
