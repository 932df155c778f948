pub mod model;
pub mod preprocessing;
pub mod routing;

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ClassifierConfig;
use crate::models::{Classification, RunSummary};
use model::Scorer;
use routing::Verdict;

/// Sequential good/bad sorter over a directory of test images
pub struct BatchClassifier<S: Scorer> {
    scorer: S,
    config: ClassifierConfig,
    debug_dir: Option<PathBuf>,
}

impl<S: Scorer> BatchClassifier<S> {
    pub fn new(scorer: S, config: ClassifierConfig) -> Self {
        Self {
            scorer,
            config,
            debug_dir: None,
        }
    }

    /// Save every resized model input as PNG under `output_dir`.
    /// The directory must be empty or non-existent.
    pub fn with_debug(mut self, output_dir: PathBuf) -> anyhow::Result<Self> {
        if output_dir.exists() {
            let entries = fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                anyhow::bail!("Debug directory is not empty: {}", output_dir.display());
            }
        } else {
            fs::create_dir_all(&output_dir)?;
        }

        self.debug_dir = Some(output_dir);
        Ok(self)
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a single file and return its probability
    pub fn classify_file(&self, path: &Path) -> anyhow::Result<f32> {
        let resized = preprocessing::load_resized(path)?;

        if let Some(debug_dir) = &self.debug_dir {
            // Full file name as key: screw.png and screw.jpg stay distinct
            let mut name = path.file_name().unwrap_or_default().to_os_string();
            name.push(".png");
            let out = debug_dir.join(name);
            resized
                .save(&out)
                .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
            tracing::debug!("Debug: saved {}", out.display());
        }

        let tensor = preprocessing::to_tensor(&resized);
        self.scorer
            .score(&tensor)
            .with_context(|| format!("Failed to classify {}", path.display()))
    }

    /// Classify every regular file in the test directory and copy it into
    /// `good/` or `bad/`. The first failure aborts the run; files copied
    /// before it stay where they are.
    pub fn run(&self) -> anyhow::Result<RunSummary> {
        let good_dir = self.config.good_dir();
        let bad_dir = self.config.bad_dir();
        fs::create_dir_all(&good_dir)
            .with_context(|| format!("Failed to create {}", good_dir.display()))?;
        fs::create_dir_all(&bad_dir)
            .with_context(|| format!("Failed to create {}", bad_dir.display()))?;

        let files = list_regular_files(&self.config.test_dir)?;
        tracing::info!(
            "Classifying {} files from {}",
            files.len(),
            self.config.test_dir.display()
        );

        let mut summary = RunSummary::default();

        for (i, path) in files.iter().enumerate() {
            let Some(raw_name) = path.file_name() else {
                continue;
            };
            // Lossy only for reporting; the copy keeps the exact name
            let file_name = raw_name.to_string_lossy().into_owned();

            let probability = self.classify_file(path)?;
            let verdict = Verdict::from_probability(probability);
            let dest = self.config.output_dir.join(verdict.dir_name()).join(raw_name);

            fs::copy(path, &dest).with_context(|| {
                format!("Failed to copy {} to {}", path.display(), dest.display())
            })?;

            tracing::debug!(
                file = %file_name,
                probability,
                verdict = %verdict,
                "Classified {} of {}",
                i + 1,
                files.len()
            );

            summary.push(Classification {
                file_name,
                probability,
                verdict,
            });
        }

        tracing::info!(good = summary.good(), bad = summary.bad(), "Classification finished");
        Ok(summary)
    }
}

/// Regular files directly inside `dir`, sorted by name. Subdirectories and
/// other entries are skipped.
pub fn list_regular_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read test directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
