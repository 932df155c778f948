//! Fixed project layout and the config structs built from it.
//!
//! All paths are relative to the project root. The classifier threshold is
//! deliberately not part of any config struct.

use std::path::{Path, PathBuf};

pub const CHECKPOINT_DIR: &str = "checkpoints";
pub const MODEL_FILE: &str = "resnet50_screw_finetuned_augmented.rten";
pub const ARCHIVE_DIR: &str = "data/raw/archive";
pub const TEST_DIR: &str = "data/raw/archive/test";
pub const OUTPUT_DIR: &str = "data/processed/ResNet50";

/// Probability at or above which a screw is routed to `bad`.
pub const THRESHOLD: f32 = 0.5;

/// Side length of the square model input.
pub const TARGET_SIZE: u32 = 224;

pub const VENV_DIR: &str = "screws_venv";
pub const REQUIREMENTS: &[&str] = &[
    // Core
    "numpy",
    "pandas",
    "matplotlib",
    "tqdm",
    "Pillow",
    "pathlib",
    // TensorFlow / Keras
    "tensorflow",
    "scikit-learn",
    "scikeras",
    "xgboost",
    "lightgbm",
    // Dataset download helper
    "gdown",
];
pub const DATA_URL: &str = "https://drive.google.com/uc?id=1z-57McRCQ5PT6UYbF640BafBJmP3L_Jj";
pub const DATA_PATH: &str = "data/raw/anomaly_dataset.zip";
pub const DATA_DIR: &str = "data/raw";

/// Pick the directory relative paths are resolved against.
///
/// Scripts may be launched from a subdirectory of the project (e.g. `scripts/`),
/// so when the dataset is not visible from `cwd` but is from its parent, the
/// parent wins. Otherwise `cwd` is returned unchanged.
pub fn resolve_project_root(cwd: &Path) -> PathBuf {
    if cwd.join(ARCHIVE_DIR).exists() {
        return cwd.to_path_buf();
    }
    match cwd.parent() {
        Some(parent) if parent.join(ARCHIVE_DIR).exists() => parent.to_path_buf(),
        _ => cwd.to_path_buf(),
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    pub test_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl ClassifierConfig {
    /// Default layout rooted at `root`
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            model_path: root.join(CHECKPOINT_DIR).join(MODEL_FILE),
            test_dir: root.join(TEST_DIR),
            output_dir: root.join(OUTPUT_DIR),
        }
    }

    pub fn good_dir(&self) -> PathBuf {
        self.output_dir.join("good")
    }

    pub fn bad_dir(&self) -> PathBuf {
        self.output_dir.join("bad")
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::rooted_at(Path::new(""))
    }
}

#[derive(Debug, Clone)]
pub struct SetupConfig {
    pub venv_dir: PathBuf,
    pub requirements: Vec<String>,
    pub data_url: String,
    pub data_path: PathBuf,
    pub data_dir: PathBuf,
}

impl SetupConfig {
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            venv_dir: root.join(VENV_DIR),
            requirements: REQUIREMENTS.iter().map(|s| s.to_string()).collect(),
            data_url: DATA_URL.to_string(),
            data_path: root.join(DATA_PATH),
            data_dir: root.join(DATA_DIR),
        }
    }
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self::rooted_at(Path::new(""))
    }
}
