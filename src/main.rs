use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use screwsort::classify::BatchClassifier;
use screwsort::config::{self, ClassifierConfig, SetupConfig};
use screwsort::setup::Bootstrapper;
use screwsort::setup::environment::PythonVenv;
use screwsort::{RtenScorer, Verdict};

#[derive(Parser)]
#[command(name = "screwsort")]
#[command(about = "Sort screw images into good/bad with a pretrained classifier")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify every image in the test directory into good/ and bad/
    Classify {
        /// Serialized model (.rten or .onnx)
        #[arg(long, value_name = "FILE")]
        model: Option<PathBuf>,

        /// Directory of images to classify
        #[arg(long, value_name = "DIR")]
        test_dir: Option<PathBuf>,

        /// Directory receiving good/ and bad/
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Save resized model inputs to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,
    },

    /// Create the virtual environment, install packages and fetch the dataset
    Setup {
        /// Directory of the virtual environment
        #[arg(long, value_name = "DIR")]
        venv_dir: Option<PathBuf>,

        /// Skip the dataset download
        #[arg(long)]
        skip_dataset: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Classify {
            model,
            test_dir,
            output_dir,
            debug_out,
        } => {
            let cwd = std::env::current_dir()?;
            let root = config::resolve_project_root(&cwd);
            tracing::info!("Working directory: {}", root.display());

            let defaults = ClassifierConfig::rooted_at(&root);
            let classifier_config = ClassifierConfig {
                model_path: model.unwrap_or(defaults.model_path),
                test_dir: test_dir.unwrap_or(defaults.test_dir),
                output_dir: output_dir.unwrap_or(defaults.output_dir),
            };

            let scorer = RtenScorer::load(&classifier_config.model_path)?;
            let mut classifier = BatchClassifier::new(scorer, classifier_config);
            if let Some(debug_dir) = debug_out {
                classifier = classifier.with_debug(debug_dir)?;
            }

            let summary = classifier.run()?;

            if args.verbose {
                println!("\n=== Classification Results ===");
                for item in &summary.classifications {
                    println!("  {} -> {} ({:.4})", item.file_name, item.verdict, item.probability);
                }
            }
            println!(
                "Done! {} images classified ({} {}, {} {}) and saved.",
                summary.total(),
                summary.good(),
                Verdict::Good,
                summary.bad(),
                Verdict::Bad
            );
        }
        Command::Setup {
            venv_dir,
            skip_dataset,
        } => {
            let mut setup_config = SetupConfig::default();
            if let Some(dir) = venv_dir {
                setup_config.venv_dir = dir;
            }

            let manager = PythonVenv::new(setup_config.venv_dir.clone());
            let bootstrapper = Bootstrapper::new(manager, setup_config);

            let report = bootstrapper.run_with(!skip_dataset)?;
            if !report.packages.failed.is_empty() {
                tracing::warn!("Packages not installed: {}", report.packages.failed.join(", "));
            }
        }
    }

    Ok(())
}
