mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from screwsort for tests
pub use screwsort::config::{ClassifierConfig, SetupConfig};
pub use screwsort::setup::environment::PackageManager;
pub use screwsort::{
    BatchClassifier, Bootstrapper, DatasetStatus, ImageTensor, RunSummary, Scorer, SetupError,
    Verdict,
};
