pub mod classify;
pub mod config;
pub mod models;
pub mod setup;

pub use classify::BatchClassifier;
pub use classify::model::{RtenScorer, Scorer};
pub use classify::preprocessing::ImageTensor;
pub use classify::routing::Verdict;
pub use config::{ClassifierConfig, SetupConfig};
pub use models::{Classification, RunSummary};
pub use setup::{Bootstrapper, DatasetStatus, InstallReport, SetupError};
